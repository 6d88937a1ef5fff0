// SPDX-FileCopyrightText: 2026 Logram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Telegram Bot API.
//!
//! Every call is a single attempt bounded by the configured timeout. A non-2xx
//! status or an `ok: false` envelope becomes [`LogramError::Delivery`].

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use logram_config::TelegramConfig;
use logram_core::{ButtonLayout, ComposedMessage, Delivery, LogramError};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

/// Envelope wrapping every Bot API response.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
}

/// Bot API client bound to one bot token.
#[derive(Clone)]
pub struct TelegramClient {
    client: reqwest::Client,
    /// `{api_base_url}/bot{token}`; never logged.
    base_url: String,
}

impl fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramClient")
            .field("base_url", &"[REDACTED]")
            .finish()
    }
}

impl TelegramClient {
    /// Creates a client for `token` against `api_base_url`.
    pub fn new(token: &str, api_base_url: &str, timeout: Duration) -> Result<Self, LogramError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LogramError::Delivery {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: format!("{}/bot{token}", api_base_url.trim_end_matches('/')),
        })
    }

    /// Creates a client from the `[telegram]` section.
    ///
    /// Fails with [`LogramError::Config`] when no bot token is configured.
    pub fn from_config(config: &TelegramConfig) -> Result<Self, LogramError> {
        let token = config
            .token()
            .ok_or_else(|| LogramError::Config("telegram.bot_token is not configured".into()))?;
        Self::new(token, &config.api_base_url, config.timeout())
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/{method}", self.base_url)
    }

    /// `sendMessage` with form fields. Returns the sent message object.
    pub async fn send_message(
        &self,
        chat_id: &str,
        text: &str,
        parse_mode: Option<&str>,
        buttons: Option<&ButtonLayout>,
    ) -> Result<Value, LogramError> {
        let mut form: Vec<(&str, String)> = vec![
            ("chat_id", chat_id.to_string()),
            ("text", text.to_string()),
        ];
        if let Some(mode) = parse_mode.filter(|m| !m.is_empty()) {
            form.push(("parse_mode", mode.to_string()));
        }
        if let Some(layout) = buttons {
            form.push(("reply_markup", layout.to_reply_markup().to_string()));
        }

        let request = self.client.post(self.endpoint("sendMessage")).form(&form);
        self.execute("sendMessage", request).await
    }

    /// Raw `getUpdates` response body, envelope included.
    pub async fn get_updates_raw(&self, limit: u32) -> Result<Value, LogramError> {
        let response = self
            .client
            .get(self.endpoint("getUpdates"))
            .query(&[("limit", limit)])
            .send()
            .await
            .map_err(transport_error)?;
        response.json::<Value>().await.map_err(transport_error)
    }

    /// `getUpdates`, returning the update objects.
    pub async fn get_updates(&self, limit: u32) -> Result<Vec<Value>, LogramError> {
        let request = self
            .client
            .get(self.endpoint("getUpdates"))
            .query(&[("limit", limit)]);
        self.execute("getUpdates", request).await
    }

    /// `setWebhook`. `secret_token` makes Telegram send
    /// `X-Telegram-Bot-Api-Secret-Token` with every update.
    pub async fn set_webhook(
        &self,
        url: &str,
        secret_token: Option<&str>,
    ) -> Result<bool, LogramError> {
        let mut form = vec![("url", url.to_string())];
        if let Some(secret) = secret_token.filter(|s| !s.is_empty()) {
            form.push(("secret_token", secret.to_string()));
        }
        let request = self.client.post(self.endpoint("setWebhook")).form(&form);
        self.execute("setWebhook", request).await
    }

    /// `deleteWebhook`.
    pub async fn delete_webhook(&self, drop_pending_updates: bool) -> Result<bool, LogramError> {
        let request = self
            .client
            .post(self.endpoint("deleteWebhook"))
            .form(&[("drop_pending_updates", drop_pending_updates.to_string())]);
        self.execute("deleteWebhook", request).await
    }

    /// `getWebhookInfo`, returned as-is.
    pub async fn get_webhook_info(&self) -> Result<Value, LogramError> {
        let request = self.client.get(self.endpoint("getWebhookInfo"));
        self.execute("getWebhookInfo", request).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, LogramError> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;
        debug!(method, status = %status, "bot api response received");

        let envelope: Option<ApiResponse<T>> = serde_json::from_str(&body).ok();
        match envelope {
            Some(ApiResponse {
                ok: true,
                result: Some(result),
                ..
            }) if status.is_success() => Ok(result),
            Some(ApiResponse { description, .. }) => Err(LogramError::delivery(format!(
                "{method} failed with HTTP {}: {}",
                status.as_u16(),
                description.unwrap_or_else(|| "no description".into())
            ))),
            None => Err(LogramError::delivery(format!(
                "{method} failed with HTTP {}: unexpected response body",
                status.as_u16()
            ))),
        }
    }
}

/// Transport failure, with the token-bearing URL stripped from the message.
fn transport_error(e: reqwest::Error) -> LogramError {
    let e = e.without_url();
    if e.is_timeout() {
        LogramError::delivery(format!("request timed out: {e}"))
    } else {
        LogramError::Delivery {
            message: format!("HTTP request failed: {e}"),
            source: Some(Box::new(e)),
        }
    }
}

#[async_trait]
impl Delivery for TelegramClient {
    async fn send(
        &self,
        chat_id: &str,
        message: &ComposedMessage,
        parse_mode: Option<&str>,
    ) -> Result<(), LogramError> {
        self.send_message(chat_id, &message.body, parse_mode, message.buttons.as_ref())
            .await
            .map(|_| ())
    }
}

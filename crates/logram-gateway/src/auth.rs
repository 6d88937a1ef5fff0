// SPDX-FileCopyrightText: 2026 Logram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared-secret header check for the webhook and diagnostics routes.
//!
//! A route with no secret configured is open. Otherwise one of the guard's
//! headers must carry the exact secret, or the request is answered with 403
//! and a JSON error before any handler runs.

use axum::{
    Json,
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Sent by Telegram when the webhook was registered with `secret_token`.
pub const TELEGRAM_SECRET_HEADER: &str = "x-telegram-bot-api-secret-token";
/// Set by proxies or manual callers of the webhook.
pub const CALLBACK_SECRET_HEADER: &str = "x-telegram-callback-secret";
pub const HEALTH_SECRET_HEADER: &str = "x-telegram-log-health-secret";

#[derive(Clone)]
pub struct SecretGuard {
    expected: Option<String>,
    headers: &'static [&'static str],
    error: &'static str,
}

impl SecretGuard {
    /// Guard for the webhook. Either Telegram's header or the callback
    /// header is accepted.
    pub fn callback(secret: Option<String>) -> Self {
        Self {
            expected: secret.filter(|s| !s.is_empty()),
            headers: &[TELEGRAM_SECRET_HEADER, CALLBACK_SECRET_HEADER],
            error: "Invalid secret",
        }
    }

    pub fn health(secret: Option<String>) -> Self {
        Self {
            expected: secret.filter(|s| !s.is_empty()),
            headers: &[HEALTH_SECRET_HEADER],
            error: "Invalid health secret",
        }
    }

    pub fn accepts(&self, headers: &HeaderMap) -> bool {
        let Some(expected) = &self.expected else {
            return true;
        };
        self.headers.iter().any(|name| {
            headers
                .get(*name)
                .and_then(|v| v.to_str().ok())
                .is_some_and(|v| v == expected)
        })
    }
}

impl std::fmt::Debug for SecretGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretGuard")
            .field("expected", &self.expected.as_ref().map(|_| "[redacted]"))
            .field("headers", &self.headers)
            .finish()
    }
}

pub async fn secret_middleware(
    State(guard): State<SecretGuard>,
    request: Request,
    next: Next,
) -> Response {
    if guard.accepts(request.headers()) {
        return next.run(request).await;
    }
    tracing::debug!(path = %request.uri().path(), "rejected request with bad secret");
    (
        StatusCode::FORBIDDEN,
        Json(json!({ "ok": false, "error": guard.error })),
    )
        .into_response()
}

// SPDX-FileCopyrightText: 2026 Logram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Logram.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use logram_core::Severity;
use serde::{Deserialize, Serialize};

/// Top-level Logram configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogramConfig {
    /// Process logging and the producer-side delivery mode.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Bot API credentials and message defaults.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Pending queue and flush loop settings.
    #[serde(default)]
    pub buffer: BufferConfig,

    /// Inbound callback webhook.
    #[serde(default)]
    pub callback: CallbackConfig,

    /// Diagnostics endpoint.
    #[serde(default)]
    pub health: HealthConfig,

    /// HTTP listener for the webhook and diagnostics routes.
    #[serde(default)]
    pub server: ServerConfig,

    /// Static action to handler bindings.
    #[serde(default)]
    pub callbacks: CallbacksConfig,
}

/// How the producer side hands entries to the chat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMode {
    /// Send every entry immediately.
    #[default]
    Instant,
    /// Push entries to the pending queue for the flush loop.
    Buffered,
}

impl std::fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryMode::Instant => f.write_str("instant"),
            DeliveryMode::Buffered => f.write_str("buffered"),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Process log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Producer-side delivery mode.
    #[serde(default)]
    pub mode: DeliveryMode,

    /// Lowest severity forwarded to the chat by the tracing layer.
    #[serde(default = "default_min_level")]
    pub min_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            mode: DeliveryMode::default(),
            min_level: default_min_level(),
        }
    }
}

impl LoggingConfig {
    /// Parsed `min_level`. Validation guarantees it parses; falls back to
    /// `Warning` for unvalidated configs.
    pub fn min_severity(&self) -> Severity {
        Severity::from_str(&self.min_level).unwrap_or(Severity::Warning)
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_min_level() -> String {
    "warn".to_string()
}

/// Telegram Bot API configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Bot API token. Required for every outbound call.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Destination chat for log messages.
    #[serde(default)]
    pub chat_id: Option<String>,

    /// `parse_mode` sent with every message. Empty sends plain text.
    #[serde(default = "default_parse_mode")]
    pub parse_mode: String,

    /// Bot API base URL.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Per-request HTTP timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Label of the button attached to entries that carry none.
    #[serde(default)]
    pub default_button_text: Option<String>,

    /// Target URL of the default button.
    #[serde(default)]
    pub default_button_url: Option<String>,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            chat_id: None,
            parse_mode: default_parse_mode(),
            api_base_url: default_api_base_url(),
            timeout_secs: default_timeout_secs(),
            default_button_text: None,
            default_button_url: None,
        }
    }
}

impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &self.bot_token.as_ref().map(|_| "[REDACTED]"))
            .field("chat_id", &self.chat_id)
            .field("parse_mode", &self.parse_mode)
            .field("api_base_url", &self.api_base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("default_button_text", &self.default_button_text)
            .field("default_button_url", &self.default_button_url)
            .finish()
    }
}

impl TelegramConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// `parse_mode` as sent on the wire; `None` when empty.
    pub fn parse_mode(&self) -> Option<&str> {
        let mode = self.parse_mode.trim();
        (!mode.is_empty()).then_some(mode)
    }

    /// The bot token, treating an empty string as unset.
    pub fn token(&self) -> Option<&str> {
        self.bot_token.as_deref().filter(|t| !t.trim().is_empty())
    }

    /// The chat id, treating an empty string as unset.
    pub fn chat(&self) -> Option<&str> {
        self.chat_id.as_deref().filter(|c| !c.trim().is_empty())
    }
}

fn default_parse_mode() -> String {
    "HTML".to_string()
}

fn default_api_base_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_timeout_secs() -> u64 {
    5
}

/// Pending queue and flush loop configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BufferConfig {
    /// Whether `buffered` mode may use the queue at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// SQLite database file holding the queue.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Queue identifier; several independent queues may share one file.
    #[serde(default = "default_queue_key")]
    pub queue_key: String,

    /// Maximum entries drained into one message.
    #[serde(default = "default_max_batch")]
    pub max_batch: usize,

    /// Body length cap in characters, before the truncation marker.
    #[serde(default = "default_max_message_len")]
    pub max_message_len: usize,

    /// Sleep after an empty drain in loop mode, in milliseconds.
    #[serde(default = "default_idle_interval_ms")]
    pub idle_interval_ms: u64,

    /// Sleep after each flushed batch in loop mode, in seconds.
    #[serde(default = "default_batch_interval_secs")]
    pub batch_interval_secs: u64,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            database_path: default_database_path(),
            queue_key: default_queue_key(),
            max_batch: default_max_batch(),
            max_message_len: default_max_message_len(),
            idle_interval_ms: default_idle_interval_ms(),
            batch_interval_secs: default_batch_interval_secs(),
        }
    }
}

impl BufferConfig {
    pub fn idle_interval(&self) -> Duration {
        Duration::from_millis(self.idle_interval_ms)
    }

    pub fn batch_interval(&self) -> Duration {
        Duration::from_secs(self.batch_interval_secs)
    }
}

fn default_true() -> bool {
    true
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("logram").join("queue.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("logram-queue.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_queue_key() -> String {
    "telegram_log:queue".to_string()
}

fn default_max_batch() -> usize {
    20
}

fn default_max_message_len() -> usize {
    3500
}

fn default_idle_interval_ms() -> u64 {
    500
}

fn default_batch_interval_secs() -> u64 {
    30
}

/// Inbound callback webhook configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CallbackConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Route the webhook is mounted on.
    #[serde(default = "default_callback_path")]
    pub path: String,

    /// Shared secret expected in the request headers. Unset disables the check.
    #[serde(default)]
    pub secret: Option<String>,
}

impl Default for CallbackConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_callback_path(),
            secret: None,
        }
    }
}

impl fmt::Debug for CallbackConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackConfig")
            .field("enabled", &self.enabled)
            .field("path", &self.path)
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

fn default_callback_path() -> String {
    "/telegram/callback".to_string()
}

/// Diagnostics endpoint configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HealthConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_health_path")]
    pub path: String,

    #[serde(default)]
    pub secret: Option<String>,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_health_path(),
            secret: None,
        }
    }
}

impl fmt::Debug for HealthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HealthConfig")
            .field("enabled", &self.enabled)
            .field("path", &self.path)
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

fn default_health_path() -> String {
    "/telegram/log/health".to_string()
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Externally reachable base URL, used to build the webhook URL.
    #[serde(default)]
    pub public_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            public_url: None,
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Action to handler-id bindings loaded into the callback registry at startup.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CallbacksConfig {
    #[serde(default)]
    pub map: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = LogramConfig::default();
        assert_eq!(config.logging.mode, DeliveryMode::Instant);
        assert_eq!(config.logging.min_severity(), Severity::Warning);
        assert_eq!(config.telegram.parse_mode(), Some("HTML"));
        assert_eq!(config.telegram.timeout(), Duration::from_secs(5));
        assert_eq!(config.buffer.queue_key, "telegram_log:queue");
        assert_eq!(config.buffer.max_batch, 20);
        assert_eq!(config.buffer.max_message_len, 3500);
        assert_eq!(config.buffer.idle_interval(), Duration::from_millis(500));
        assert_eq!(config.buffer.batch_interval(), Duration::from_secs(30));
        assert!(config.buffer.database_path.ends_with("queue.db"));
        assert!(config.callback.enabled);
        assert_eq!(config.callback.path, "/telegram/callback");
        assert!(!config.health.enabled);
        assert_eq!(config.health.path, "/telegram/log/health");
        assert_eq!(config.server.port, 8080);
        assert!(config.callbacks.map.is_empty());
    }

    #[test]
    fn empty_credentials_count_as_unset() {
        let telegram = TelegramConfig {
            bot_token: Some("  ".into()),
            chat_id: Some(String::new()),
            parse_mode: String::new(),
            ..TelegramConfig::default()
        };
        assert!(telegram.token().is_none());
        assert!(telegram.chat().is_none());
        assert!(telegram.parse_mode().is_none());
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let telegram = TelegramConfig {
            bot_token: Some("123:SECRET".into()),
            ..TelegramConfig::default()
        };
        let out = format!("{telegram:?}");
        assert!(!out.contains("SECRET"));
        assert!(out.contains("[REDACTED]"));

        let callback = CallbackConfig {
            secret: Some("hunter2".into()),
            ..CallbackConfig::default()
        };
        assert!(!format!("{callback:?}").contains("hunter2"));
    }
}

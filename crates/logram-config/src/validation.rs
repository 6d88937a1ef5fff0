// SPDX-FileCopyrightText: 2026 Logram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Every rule is checked; all failures are returned together.

use std::str::FromStr;

use logram_core::Severity;

use crate::diagnostic::ConfigError;
use crate::model::LogramConfig;

/// `parse_mode` values the Bot API accepts. Empty sends plain text.
pub const PARSE_MODES: &[&str] = &["HTML", "MarkdownV2", "Markdown", ""];

/// Hard Bot API limit on message text length.
pub const TELEGRAM_MAX_MESSAGE_LEN: usize = 4096;

/// Checks semantic constraints serde cannot express.
pub fn validate_config(config: &LogramConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let addr = config.server.bind_address.trim();
    if addr.is_empty() {
        errors.push(ConfigError::validation(
            "server.bind_address must not be empty",
        ));
    } else {
        let is_ip = addr.parse::<std::net::IpAddr>().is_ok();
        let is_hostname = addr
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_ip && !is_hostname {
            errors.push(ConfigError::validation(format!(
                "server.bind_address `{addr}` is not a valid IP address or hostname"
            )));
        }
    }

    if config.buffer.database_path.trim().is_empty() {
        errors.push(ConfigError::validation(
            "buffer.database_path must not be empty",
        ));
    }

    if config.buffer.queue_key.trim().is_empty() {
        errors.push(ConfigError::validation("buffer.queue_key must not be empty"));
    }

    if config.buffer.max_batch < 1 {
        errors.push(ConfigError::validation(
            "buffer.max_batch must be at least 1, got 0",
        ));
    }

    let len = config.buffer.max_message_len;
    if !(1..=TELEGRAM_MAX_MESSAGE_LEN).contains(&len) {
        errors.push(ConfigError::validation(format!(
            "buffer.max_message_len must be between 1 and {TELEGRAM_MAX_MESSAGE_LEN}, got {len}"
        )));
    }

    if config.telegram.timeout_secs == 0 {
        errors.push(ConfigError::validation(
            "telegram.timeout_secs must be at least 1",
        ));
    }

    if !PARSE_MODES.contains(&config.telegram.parse_mode.as_str()) {
        errors.push(ConfigError::validation(format!(
            "telegram.parse_mode `{}` is not one of HTML, MarkdownV2, Markdown or empty",
            config.telegram.parse_mode
        )));
    }

    match (
        &config.telegram.default_button_text,
        &config.telegram.default_button_url,
    ) {
        (Some(_), None) => errors.push(ConfigError::validation(
            "telegram.default_button_text is set but telegram.default_button_url is not",
        )),
        (None, Some(_)) => errors.push(ConfigError::validation(
            "telegram.default_button_url is set but telegram.default_button_text is not",
        )),
        _ => {}
    }

    if Severity::from_str(&config.logging.min_level).is_err() {
        errors.push(ConfigError::validation(format!(
            "logging.min_level `{}` is not a known level",
            config.logging.min_level
        )));
    }

    for (name, path) in [
        ("callback.path", &config.callback.path),
        ("health.path", &config.health.path),
    ] {
        if !path.starts_with('/') {
            errors.push(ConfigError::validation(format!(
                "{name} `{path}` must start with `/`"
            )));
        }
    }

    if config.callback.path == config.health.path {
        errors.push(ConfigError::validation(format!(
            "callback.path and health.path must differ, both are `{}`",
            config.callback.path
        )));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

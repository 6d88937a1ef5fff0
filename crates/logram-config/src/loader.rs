// SPDX-FileCopyrightText: 2026 Logram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with Figment.
//!
//! Merge order, later wins: compiled defaults, `/etc/logram/logram.toml`,
//! `~/.config/logram/logram.toml`, `./logram.toml`, then `LOGRAM_*`
//! environment variables.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::LogramConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/logram/logram.toml";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "logram.toml";

/// Sections reachable through `LOGRAM_<SECTION>_<KEY>` variables.
const ENV_SECTIONS: &[&str] = &[
    "logging", "telegram", "buffer", "callback", "health", "server",
];

/// Per-user config file under the XDG config dir, if one can be determined.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("logram").join(LOCAL_CONFIG_FILE))
}

/// Loads the full XDG hierarchy plus environment overrides.
pub fn load_config() -> Result<LogramConfig, figment::Error> {
    build_figment().extract()
}

/// Loads defaults plus a TOML string. No files, no environment.
pub fn load_config_from_str(toml_content: &str) -> Result<LogramConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LogramConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Loads defaults, one explicit file, then environment overrides.
pub fn load_config_from_path(path: &Path) -> Result<LogramConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LogramConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// The un-extracted Figment for the standard hierarchy.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(LogramConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// `LOGRAM_TELEGRAM_BOT_TOKEN` maps to `telegram.bot_token`.
///
/// Only the first underscore after a known section name becomes a dot, so
/// keys that contain underscores survive intact.
fn env_provider() -> Env {
    Env::prefixed("LOGRAM_").map(|key| map_env_key(key.as_str()).into())
}

fn map_env_key(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    for section in ENV_SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|r| r.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_map_to_sections() {
        assert_eq!(map_env_key("telegram_bot_token"), "telegram.bot_token");
        assert_eq!(map_env_key("buffer_max_message_len"), "buffer.max_message_len");
        assert_eq!(map_env_key("callback_secret"), "callback.secret");
        assert_eq!(map_env_key("server_public_url"), "server.public_url");
        assert_eq!(map_env_key("TELEGRAM_CHAT_ID"), "telegram.chat_id");
    }

    #[test]
    fn plural_section_prefix_does_not_match_singular() {
        assert_eq!(map_env_key("callbacks_map"), "callbacks_map");
    }
}

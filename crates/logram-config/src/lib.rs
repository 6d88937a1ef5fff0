// SPDX-FileCopyrightText: 2026 Logram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for Logram.
//!
//! TOML parsing with strict key checking (`deny_unknown_fields`), XDG file
//! lookup, `LOGRAM_*` environment overrides, and miette diagnostics with typo
//! suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use logram_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("queue: {}", config.buffer.queue_key);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{
    BufferConfig, CallbackConfig, CallbacksConfig, DeliveryMode, HealthConfig, LogramConfig,
    LoggingConfig, ServerConfig, TelegramConfig,
};

/// Loads the standard hierarchy and validates the result.
///
/// Figment failures become diagnostics with source spans; validation failures
/// are returned all at once.
pub fn load_and_validate() -> Result<LogramConfig, Vec<ConfigError>> {
    finish(loader::load_config(), collect_toml_sources)
}

/// Loads one explicit file plus environment overrides, then validates.
pub fn load_and_validate_from_path(path: &Path) -> Result<LogramConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_path(path), || {
        std::fs::read_to_string(path)
            .map(|content| vec![(path.display().to_string(), content)])
            .unwrap_or_default()
    })
}

/// Loads a TOML string over the defaults, then validates.
pub fn load_and_validate_str(toml_content: &str) -> Result<LogramConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_str(toml_content), || {
        vec![("<inline>".to_string(), toml_content.to_string())]
    })
}

fn finish(
    loaded: Result<LogramConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<(String, String)>,
) -> Result<LogramConfig, Vec<ConfigError>> {
    match loaded {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err, &sources())),
    }
}

/// Reads whichever hierarchy files exist, for span resolution.
fn collect_toml_sources() -> Vec<(String, String)> {
    let local = std::env::current_dir()
        .map(|d| d.join(loader::LOCAL_CONFIG_FILE))
        .unwrap_or_else(|_| loader::LOCAL_CONFIG_FILE.into());

    [
        Some(local),
        loader::user_config_path(),
        Some(loader::SYSTEM_CONFIG_PATH.into()),
    ]
    .into_iter()
    .flatten()
    .filter_map(|path| {
        std::fs::read_to_string(&path)
            .ok()
            .map(|content| (path.display().to_string(), content))
    })
    .collect()
}

// SPDX-FileCopyrightText: 2026 Logram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for Logram.

use thiserror::Error;

/// The primary error type used across all Logram crates.
#[derive(Debug, Error)]
pub enum LogramError {
    /// Configuration errors (missing bot token, missing chat id, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Pending queue backend errors (database open, query failure).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A queue entry could not be encoded or decoded.
    #[error("codec error: {message}")]
    Codec {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Outbound delivery to the Bot API failed (transport or remote rejection).
    #[error("delivery error: {message}")]
    Delivery {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A callback handler failed while processing an action.
    #[error("callback `{action}` failed: {message}")]
    Callback { action: String, message: String },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl LogramError {
    /// Shorthand for a delivery error without an underlying source.
    pub fn delivery(message: impl Into<String>) -> Self {
        LogramError::Delivery {
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for a callback failure.
    pub fn callback(action: impl Into<String>, message: impl Into<String>) -> Self {
        LogramError::Callback {
            action: action.into(),
            message: message.into(),
        }
    }
}

// SPDX-FileCopyrightText: 2026 Logram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Logram.
//!
//! This crate holds the error type, the queue entry model and its codec, and
//! the two traits every backend implements: [`PendingQueue`] for the durable
//! buffer and [`Delivery`] for the outbound chat client.

pub mod codec;
pub mod error;
pub mod traits;
pub mod types;

pub use codec::{decode_entry, encode_entry, timestamp_now};
pub use error::LogramError;
pub use traits::{Delivery, PendingQueue};
pub use types::{Batch, Button, ButtonLayout, ComposedMessage, LogRecord, QueueEntry, Severity};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logram_error_variants_render() {
        let config = LogramError::Config("telegram.bot_token is not set".into());
        assert_eq!(
            config.to_string(),
            "configuration error: telegram.bot_token is not set"
        );

        let storage = LogramError::Storage {
            source: Box::new(std::io::Error::other("disk")),
        };
        assert_eq!(storage.to_string(), "storage error: disk");

        let delivery = LogramError::delivery("HTTP 400: chat not found");
        assert_eq!(delivery.to_string(), "delivery error: HTTP 400: chat not found");

        let cb = LogramError::callback("ban_user", "no such user");
        assert_eq!(cb.to_string(), "callback `ban_user` failed: no such user");

        let _timeout = LogramError::Timeout {
            duration: std::time::Duration::from_secs(5),
        };
        let _internal = LogramError::Internal("test".into());
    }

    #[test]
    fn traits_are_object_safe() {
        fn _queue(_: &dyn PendingQueue) {}
        fn _delivery(_: &dyn Delivery) {}
    }
}

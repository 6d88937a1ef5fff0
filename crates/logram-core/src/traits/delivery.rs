// SPDX-FileCopyrightText: 2026 Logram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery client trait.

use async_trait::async_trait;

use crate::error::LogramError;
use crate::types::ComposedMessage;

/// Sends one composed message to a chat.
///
/// Best-effort: implementations make a single attempt and report failure as
/// [`LogramError::Delivery`]. Callers never retry.
#[async_trait]
pub trait Delivery: Send + Sync {
    /// Delivers `message` to `chat_id`. An empty or absent `parse_mode` sends
    /// plain text.
    async fn send(
        &self,
        chat_id: &str,
        message: &ComposedMessage,
        parse_mode: Option<&str>,
    ) -> Result<(), LogramError>;
}

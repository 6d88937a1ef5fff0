// SPDX-FileCopyrightText: 2026 Logram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pending queue trait.

use async_trait::async_trait;

use crate::error::LogramError;

/// An ordered FIFO of serialized entries shared by producers and consumers.
///
/// `pop` must be atomic across processes: a payload is handed to at most one
/// caller.
#[async_trait]
pub trait PendingQueue: Send + Sync {
    /// Appends a payload at the tail.
    async fn push(&self, payload: &str) -> Result<(), LogramError>;

    /// Removes and returns the head, or `None` when empty.
    async fn pop(&self) -> Result<Option<String>, LogramError>;

    /// Number of payloads currently waiting.
    async fn len(&self) -> Result<usize, LogramError>;

    async fn is_empty(&self) -> Result<bool, LogramError> {
        Ok(self.len().await? == 0)
    }
}

// SPDX-FileCopyrightText: 2026 Logram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process pending queue.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use logram_core::{LogramError, PendingQueue};

/// A FIFO held in memory. Clones share the same contents.
#[derive(Clone, Default)]
pub struct MemoryQueue {
    items: Arc<Mutex<VecDeque<String>>>,
}

impl MemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// A queue pre-filled with `payloads`, first element at the head.
    pub fn with_payloads<I, S>(payloads: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            items: Arc::new(Mutex::new(payloads.into_iter().map(Into::into).collect())),
        }
    }

    /// Current contents, head first, without consuming them.
    pub async fn snapshot(&self) -> Vec<String> {
        self.items.lock().await.iter().cloned().collect()
    }
}

#[async_trait]
impl PendingQueue for MemoryQueue {
    async fn push(&self, payload: &str) -> Result<(), LogramError> {
        self.items.lock().await.push_back(payload.to_string());
        Ok(())
    }

    async fn pop(&self) -> Result<Option<String>, LogramError> {
        Ok(self.items.lock().await.pop_front())
    }

    async fn len(&self) -> Result<usize, LogramError> {
        Ok(self.items.lock().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fifo_order() {
        let queue = MemoryQueue::with_payloads(["a", "b"]);
        queue.push("c").await.unwrap();
        assert_eq!(queue.snapshot().await, vec!["a", "b", "c"]);
        assert_eq!(queue.pop().await.unwrap().as_deref(), Some("a"));
        assert_eq!(queue.len().await.unwrap(), 2);
    }
}

// SPDX-FileCopyrightText: 2026 Logram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery doubles that record or reject sends.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use logram_core::{ComposedMessage, Delivery, LogramError};

/// One captured `send()` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub chat_id: String,
    pub message: ComposedMessage,
    pub parse_mode: Option<String>,
}

/// Records every message instead of sending it.
#[derive(Clone, Default)]
pub struct MockDelivery {
    sent: Arc<Mutex<Vec<SentMessage>>>,
    notify: Arc<Notify>,
}

impl MockDelivery {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent_messages(&self) -> Vec<SentMessage> {
        self.sent.lock().await.clone()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    /// Waits until at least `count` messages were captured, or `timeout`
    /// elapses. Returns whatever was captured.
    pub async fn wait_for(&self, count: usize, timeout: Duration) -> Vec<SentMessage> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            {
                let sent = self.sent.lock().await;
                if sent.len() >= count {
                    return sent.clone();
                }
            }
            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                return self.sent.lock().await.clone();
            }
        }
    }
}

#[async_trait]
impl Delivery for MockDelivery {
    async fn send(
        &self,
        chat_id: &str,
        message: &ComposedMessage,
        parse_mode: Option<&str>,
    ) -> Result<(), LogramError> {
        self.sent.lock().await.push(SentMessage {
            chat_id: chat_id.to_string(),
            message: message.clone(),
            parse_mode: parse_mode.map(str::to_string),
        });
        self.notify.notify_waiters();
        Ok(())
    }
}

/// Fails every send with a fixed delivery error and counts attempts.
#[derive(Clone)]
pub struct FailingDelivery {
    message: String,
    attempts: Arc<Mutex<usize>>,
}

impl FailingDelivery {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            attempts: Arc::new(Mutex::new(0)),
        }
    }

    pub async fn attempts(&self) -> usize {
        *self.attempts.lock().await
    }
}

#[async_trait]
impl Delivery for FailingDelivery {
    async fn send(
        &self,
        _chat_id: &str,
        _message: &ComposedMessage,
        _parse_mode: Option<&str>,
    ) -> Result<(), LogramError> {
        *self.attempts.lock().await += 1;
        Err(LogramError::delivery(self.message.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn captures_sends() {
        let delivery = MockDelivery::new();
        delivery
            .send("1", &ComposedMessage::new("hi"), Some("HTML"))
            .await
            .unwrap();
        let sent = delivery.wait_for(1, Duration::from_millis(10)).await;
        assert_eq!(sent[0].message.body, "hi");
        assert_eq!(sent[0].parse_mode.as_deref(), Some("HTML"));
    }

    #[tokio::test]
    async fn wait_for_returns_after_timeout() {
        let delivery = MockDelivery::new();
        let sent = delivery.wait_for(1, Duration::from_millis(20)).await;
        assert!(sent.is_empty());
    }

    #[tokio::test]
    async fn failing_delivery_counts_attempts() {
        let delivery = FailingDelivery::new("boom");
        assert!(delivery.send("1", &ComposedMessage::new("x"), None).await.is_err());
        assert_eq!(delivery.attempts().await, 1);
    }
}

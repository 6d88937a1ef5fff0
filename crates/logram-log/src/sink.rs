// SPDX-FileCopyrightText: 2026 Logram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Non-blocking log sink.
//!
//! `emit` never fails and never waits: records go through a bounded channel
//! and are dropped when it is full. A single forwarder task drains the
//! channel and either queues or sends each record. Errors on that path are
//! swallowed with a `debug!`; this crate's own targets are excluded from
//! [`crate::TelegramLogLayer`], so those events never loop back.

use std::sync::Arc;

use logram_buffer::truncate_chars;
use logram_config::{DeliveryMode, LogramConfig};
use logram_core::{
    Button, ButtonLayout, ComposedMessage, Delivery, LogRecord, LogramError, PendingQueue,
    QueueEntry, encode_entry,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Records held before `emit` starts dropping.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Where the forwarder puts records.
#[derive(Clone)]
pub enum SinkTarget {
    /// Buffered mode: encode and push to the pending queue.
    Queue(Arc<dyn PendingQueue>),
    /// Instant mode: send each record as its own message.
    Direct {
        delivery: Arc<dyn Delivery>,
        chat_id: String,
        parse_mode: Option<String>,
        max_message_len: usize,
    },
}

/// Whether `config` routes records through the pending queue.
pub fn uses_queue(config: &LogramConfig) -> bool {
    config.logging.mode == DeliveryMode::Buffered && config.buffer.enabled
}

impl SinkTarget {
    /// Picks the target for `config.logging.mode`. Buffered mode needs
    /// `buffer.enabled`; otherwise instant delivery is used.
    ///
    /// Fails with [`LogramError::Config`] when the chosen target is missing
    /// its queue, its delivery client, or a chat id.
    pub fn from_config(
        config: &LogramConfig,
        queue: Option<Arc<dyn PendingQueue>>,
        delivery: Option<Arc<dyn Delivery>>,
    ) -> Result<Self, LogramError> {
        if uses_queue(config) {
            return queue
                .map(SinkTarget::Queue)
                .ok_or_else(|| LogramError::Config("buffered mode needs a pending queue".into()));
        }
        let delivery = delivery
            .ok_or_else(|| LogramError::Config("telegram.bot_token is not configured".into()))?;
        let chat_id = config
            .telegram
            .chat()
            .ok_or_else(|| LogramError::Config("telegram.chat_id is not configured".into()))?;
        Ok(SinkTarget::Direct {
            delivery,
            chat_id: chat_id.to_string(),
            parse_mode: config.telegram.parse_mode().map(str::to_string),
            max_message_len: config.buffer.max_message_len,
        })
    }
}

/// Cloneable producer handle. The forwarder stops once every clone is gone.
#[derive(Clone)]
pub struct LogSink {
    tx: mpsc::Sender<LogRecord>,
    default_buttons: Option<ButtonLayout>,
}

impl LogSink {
    /// Starts the forwarder on the current runtime.
    pub fn spawn(target: SinkTarget, capacity: usize) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let handle = tokio::spawn(forward(rx, target));
        (
            Self {
                tx,
                default_buttons: None,
            },
            handle,
        )
    }

    /// Attaches a single URL button to records that carry none.
    pub fn with_default_button(mut self, text: impl Into<String>, url: impl Into<String>) -> Self {
        self.default_buttons = Some(ButtonLayout::single(Button::url(text, url)));
        self
    }

    /// Applies `telegram.default_button_*` when both are set.
    pub fn with_config_defaults(self, config: &LogramConfig) -> Self {
        match (
            &config.telegram.default_button_text,
            &config.telegram.default_button_url,
        ) {
            (Some(text), Some(url)) => self.with_default_button(text, url),
            _ => self,
        }
    }

    /// Hands `record` to the forwarder. Drops it if the channel is full or
    /// the forwarder has stopped.
    pub fn emit(&self, mut record: LogRecord) {
        if record.buttons.is_none() {
            record.buttons = self.default_buttons.clone();
        }
        if let Err(e) = self.tx.try_send(record) {
            let reason = match e {
                mpsc::error::TrySendError::Full(_) => "channel full",
                mpsc::error::TrySendError::Closed(_) => "forwarder stopped",
            };
            debug!(reason, "log record dropped");
        }
    }
}

async fn forward(mut rx: mpsc::Receiver<LogRecord>, target: SinkTarget) {
    while let Some(record) = rx.recv().await {
        match &target {
            SinkTarget::Queue(queue) => {
                let entry = QueueEntry::from(record);
                let result = match encode_entry(&entry) {
                    Ok(payload) => queue.push(&payload).await,
                    Err(e) => Err(e),
                };
                if let Err(e) = result {
                    debug!(error = %e, "failed to enqueue log record");
                }
            }
            SinkTarget::Direct {
                delivery,
                chat_id,
                parse_mode,
                max_message_len,
            } => {
                let message = ComposedMessage {
                    body: truncate_chars(&record.text, *max_message_len),
                    buttons: record.buttons,
                };
                if let Err(e) = delivery
                    .send(chat_id, &message, parse_mode.as_deref())
                    .await
                {
                    debug!(error = %e, "failed to deliver log record");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logram_core::{Severity, decode_entry};
    use logram_test_utils::{FailingDelivery, MemoryQueue, MockDelivery};

    #[tokio::test]
    async fn buffered_records_are_queued_with_level_and_time() {
        let queue = MemoryQueue::new();
        let (sink, handle) = LogSink::spawn(SinkTarget::Queue(Arc::new(queue.clone())), 8);

        sink.emit(LogRecord::now(Severity::Error, "db down"));
        drop(sink);
        handle.await.unwrap();

        let payloads = queue.snapshot().await;
        assert_eq!(payloads.len(), 1);
        let entry = decode_entry(&payloads[0]).unwrap();
        assert_eq!(entry.text, "db down");
        assert_eq!(entry.level.as_deref(), Some("ERROR"));
        assert!(entry.time.is_some());
        assert!(entry.buttons.is_none());
    }

    #[tokio::test]
    async fn default_button_fills_missing_layout() {
        let queue = MemoryQueue::new();
        let (sink, handle) = LogSink::spawn(SinkTarget::Queue(Arc::new(queue.clone())), 8);
        let sink = sink.with_default_button("Dashboard", "https://grafana");

        sink.emit(LogRecord::now(Severity::Warning, "slow"));
        let mut explicit = LogRecord::now(Severity::Warning, "explicit");
        explicit.buttons = Some(ButtonLayout::single(Button::callback("Ack", "ack")));
        sink.emit(explicit);
        drop(sink);
        handle.await.unwrap();

        let payloads = queue.snapshot().await;
        let first = decode_entry(&payloads[0]).unwrap();
        let second = decode_entry(&payloads[1]).unwrap();
        assert_eq!(
            first.buttons,
            Some(ButtonLayout::single(Button::url("Dashboard", "https://grafana")))
        );
        assert_eq!(
            second.buttons,
            Some(ButtonLayout::single(Button::callback("Ack", "ack")))
        );
    }

    #[tokio::test]
    async fn instant_mode_sends_truncated_text_without_prefix() {
        let delivery = MockDelivery::new();
        let target = SinkTarget::Direct {
            delivery: Arc::new(delivery.clone()),
            chat_id: "-5".into(),
            parse_mode: Some("HTML".into()),
            max_message_len: 4,
        };
        let (sink, handle) = LogSink::spawn(target, 8);

        sink.emit(LogRecord::now(Severity::Critical, "overflowing"));
        drop(sink);
        handle.await.unwrap();

        let sent = delivery.sent_messages().await;
        assert_eq!(sent[0].chat_id, "-5");
        assert_eq!(sent[0].message.body, "over\n\n...[truncated]");
    }

    #[tokio::test]
    async fn full_channel_drops_instead_of_blocking() {
        let delivery = MockDelivery::new();
        let target = SinkTarget::Direct {
            delivery: Arc::new(delivery.clone()),
            chat_id: "1".into(),
            parse_mode: None,
            max_message_len: 100,
        };
        let (sink, handle) = LogSink::spawn(target, 1);

        // The forwarder cannot run until this task yields.
        for i in 0..3 {
            sink.emit(LogRecord::now(Severity::Info, format!("m{i}")));
        }
        drop(sink);
        handle.await.unwrap();

        let sent = delivery.sent_messages().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].message.body, "m0");
    }

    #[tokio::test]
    async fn delivery_errors_are_swallowed() {
        let delivery = FailingDelivery::new("offline");
        let target = SinkTarget::Direct {
            delivery: Arc::new(delivery.clone()),
            chat_id: "1".into(),
            parse_mode: None,
            max_message_len: 100,
        };
        let (sink, handle) = LogSink::spawn(target, 4);
        sink.emit(LogRecord::now(Severity::Error, "a"));
        sink.emit(LogRecord::now(Severity::Error, "b"));
        drop(sink);
        handle.await.unwrap();
        assert_eq!(delivery.attempts().await, 2);
    }

    #[test]
    fn target_follows_configured_mode() {
        let mut config = LogramConfig::default();
        let queue: Arc<dyn PendingQueue> = Arc::new(MemoryQueue::new());
        let delivery: Arc<dyn Delivery> = Arc::new(MockDelivery::new());

        let missing_chat = SinkTarget::from_config(&config, None, Some(delivery.clone()));
        assert!(matches!(missing_chat, Err(LogramError::Config(_))));
        assert!(matches!(
            SinkTarget::from_config(&config, None, None),
            Err(LogramError::Config(_))
        ));

        config.telegram.chat_id = Some("-9".into());
        assert!(matches!(
            SinkTarget::from_config(&config, Some(queue.clone()), Some(delivery.clone())),
            Ok(SinkTarget::Direct { .. })
        ));

        config.logging.mode = DeliveryMode::Buffered;
        assert!(uses_queue(&config));
        assert!(matches!(
            SinkTarget::from_config(&config, Some(queue.clone()), None),
            Ok(SinkTarget::Queue(_))
        ));
        assert!(matches!(
            SinkTarget::from_config(&config, None, Some(delivery.clone())),
            Err(LogramError::Config(_))
        ));

        config.buffer.enabled = false;
        assert!(!uses_queue(&config));
        assert!(matches!(
            SinkTarget::from_config(&config, Some(queue), Some(delivery)),
            Ok(SinkTarget::Direct { .. })
        ));
    }
}

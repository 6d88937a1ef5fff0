// SPDX-FileCopyrightText: 2026 Logram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The flush loop: drain, compose, send, repeat.
//!
//! Delivery is single-attempt. A failed batch is logged, announced on the
//! bus, and abandoned; it is never pushed back onto the queue.

use std::sync::Arc;
use std::time::Duration;

use logram_bus::{BatchFailed, BatchFlushed, BusEvent, EventBus};
use logram_config::LogramConfig;
use logram_core::{Delivery, LogramError, PendingQueue};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::compose::compose;
use crate::drain::drain;

/// Parameters for one flush loop.
#[derive(Debug, Clone)]
pub struct FlushSettings {
    pub chat_id: String,
    pub parse_mode: Option<String>,
    pub max_batch: usize,
    pub max_message_len: usize,
    /// Pause after an empty drain in loop mode.
    pub idle_interval: Duration,
    /// Pause after each delivered or failed batch in loop mode.
    pub batch_interval: Duration,
}

impl FlushSettings {
    /// Settings from a loaded config. Fails when token or chat id is missing.
    pub fn from_config(config: &LogramConfig) -> Result<Self, LogramError> {
        let chat_id = match (config.telegram.token(), config.telegram.chat()) {
            (Some(_), Some(chat)) => chat.to_string(),
            _ => {
                return Err(LogramError::Config(
                    "Telegram bot_token or chat_id is not configured.".into(),
                ));
            }
        };

        Ok(Self {
            chat_id,
            parse_mode: config.telegram.parse_mode().map(str::to_string),
            max_batch: config.buffer.max_batch,
            max_message_len: config.buffer.max_message_len,
            idle_interval: config.buffer.idle_interval(),
            batch_interval: config.buffer.batch_interval(),
        })
    }
}

/// Result of a single drain-compose-send cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlushOutcome {
    /// Nothing decodable was waiting. `dropped` counts undecodable slots.
    Empty { dropped: usize },
    /// The batch was delivered.
    Flushed { count: usize, dropped: usize },
    /// The send failed and the batch was abandoned.
    Failed { count: usize, error: String },
}

/// Totals across every cycle a loop ran.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlushSummary {
    pub cycles: usize,
    pub batches_flushed: usize,
    pub entries_flushed: usize,
    pub batches_failed: usize,
    pub entries_dropped: usize,
}

impl FlushSummary {
    fn record(&mut self, outcome: &FlushOutcome) {
        self.cycles += 1;
        match outcome {
            FlushOutcome::Empty { dropped } => self.entries_dropped += dropped,
            FlushOutcome::Flushed { count, dropped } => {
                self.batches_flushed += 1;
                self.entries_flushed += count;
                self.entries_dropped += dropped;
            }
            FlushOutcome::Failed { .. } => self.batches_failed += 1,
        }
    }
}

/// Moves entries from a pending queue to a delivery client.
pub struct FlushLoop {
    queue: Arc<dyn PendingQueue>,
    delivery: Arc<dyn Delivery>,
    bus: Option<EventBus>,
    settings: FlushSettings,
}

impl FlushLoop {
    pub fn new(
        queue: Arc<dyn PendingQueue>,
        delivery: Arc<dyn Delivery>,
        settings: FlushSettings,
    ) -> Self {
        Self {
            queue,
            delivery,
            bus: None,
            settings,
        }
    }

    /// Publishes `BatchFlushed` / `BatchFailed` on `bus`.
    pub fn with_bus(mut self, bus: EventBus) -> Self {
        self.bus = Some(bus);
        self
    }

    pub fn settings(&self) -> &FlushSettings {
        &self.settings
    }

    /// One cycle. Only queue errors are returned; delivery errors become
    /// [`FlushOutcome::Failed`].
    pub async fn run_once(&self) -> Result<FlushOutcome, LogramError> {
        let batch = drain(self.queue.as_ref(), self.settings.max_batch).await?;

        let Some(message) = compose(&batch.entries, self.settings.max_message_len) else {
            debug!(dropped = batch.dropped, "queue drained empty");
            return Ok(FlushOutcome::Empty {
                dropped: batch.dropped,
            });
        };

        let count = batch.len();
        let chat_id = self.settings.chat_id.as_str();
        let parse_mode = self.settings.parse_mode.as_deref();

        match self.delivery.send(chat_id, &message, parse_mode).await {
            Ok(()) => {
                info!(count, dropped = batch.dropped, "telegram log batch flushed");
                self.publish(BusEvent::BatchFlushed(BatchFlushed::new(
                    batch.entries,
                    message.body,
                    chat_id.to_string(),
                    self.settings.parse_mode.clone(),
                )));
                Ok(FlushOutcome::Flushed {
                    count,
                    dropped: batch.dropped,
                })
            }
            Err(e) => {
                error!(error = %e, count, "Error sending Telegram log batch");
                let error = e.to_string();
                self.publish(BusEvent::BatchFailed(BatchFailed {
                    count,
                    chat_id: chat_id.to_string(),
                    error: error.clone(),
                }));
                Ok(FlushOutcome::Failed { count, error })
            }
        }
    }

    /// Runs one cycle, or cycles until `cancel` fires when `looping`.
    ///
    /// In single-shot mode a queue error is returned. In loop mode it is
    /// logged and the loop carries on after the idle pause.
    pub async fn run(
        &self,
        looping: bool,
        cancel: CancellationToken,
    ) -> Result<FlushSummary, LogramError> {
        let mut summary = FlushSummary::default();

        loop {
            let pause = match self.run_once().await {
                Ok(outcome) => {
                    summary.record(&outcome);
                    match outcome {
                        FlushOutcome::Empty { .. } if !looping => {
                            info!("No buffered Telegram log messages to flush.");
                            break;
                        }
                        FlushOutcome::Empty { .. } => self.settings.idle_interval,
                        _ => self.settings.batch_interval,
                    }
                }
                Err(e) if !looping => return Err(e),
                Err(e) => {
                    warn!(error = %e, "queue unavailable, retrying after idle interval");
                    self.settings.idle_interval
                }
            };

            if !looping {
                break;
            }

            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!(cycles = summary.cycles, "flush loop cancelled");
                    break;
                }
                _ = tokio::time::sleep(pause) => {}
            }
        }

        Ok(summary)
    }

    fn publish(&self, event: BusEvent) {
        if let Some(bus) = &self.bus {
            bus.publish(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logram_core::{Button, ButtonLayout, QueueEntry, encode_entry};
    use logram_test_utils::{FailingDelivery, MemoryQueue, MockDelivery};
    use tracing_test::traced_test;

    fn settings() -> FlushSettings {
        FlushSettings {
            chat_id: "-100".into(),
            parse_mode: Some("HTML".into()),
            max_batch: 20,
            max_message_len: 3500,
            idle_interval: Duration::from_millis(5),
            batch_interval: Duration::from_millis(5),
        }
    }

    fn payload(level: Option<&str>, text: &str) -> String {
        let mut entry = QueueEntry::text(text);
        entry.level = level.map(str::to_string);
        encode_entry(&entry).unwrap()
    }

    #[tokio::test]
    async fn flushes_batch_as_single_message() {
        let queue = MemoryQueue::with_payloads([
            payload(None, "a"),
            payload(Some("warning"), "b"),
            payload(Some("error"), "c"),
        ]);
        let delivery = MockDelivery::new();
        let flush = FlushLoop::new(Arc::new(queue.clone()), Arc::new(delivery.clone()), settings());

        let outcome = flush.run_once().await.unwrap();
        assert_eq!(outcome, FlushOutcome::Flushed { count: 3, dropped: 0 });

        let sent = delivery.sent_messages().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].chat_id, "-100");
        assert_eq!(sent[0].parse_mode.as_deref(), Some("HTML"));
        assert_eq!(sent[0].message.body, "a\n\n[warning] b\n\n[error] c");
        assert!(queue.is_empty().await.unwrap());
    }

    #[tokio::test]
    #[traced_test]
    async fn empty_queue_reports_nothing_to_flush() {
        let delivery = MockDelivery::new();
        let flush = FlushLoop::new(Arc::new(MemoryQueue::new()), Arc::new(delivery.clone()), settings());

        let summary = flush.run(false, CancellationToken::new()).await.unwrap();
        assert_eq!(summary.cycles, 1);
        assert_eq!(delivery.sent_count().await, 0);
        assert!(logs_contain("No buffered Telegram log messages to flush."));
    }

    #[tokio::test]
    async fn batch_is_capped_at_max_batch() {
        let queue = MemoryQueue::with_payloads((0..25).map(|i| payload(None, &i.to_string())));
        let delivery = MockDelivery::new();
        let mut s = settings();
        s.max_batch = 10;
        let flush = FlushLoop::new(Arc::new(queue.clone()), Arc::new(delivery.clone()), s);

        assert_eq!(
            flush.run_once().await.unwrap(),
            FlushOutcome::Flushed { count: 10, dropped: 0 }
        );
        assert_eq!(queue.len().await.unwrap(), 15);
    }

    #[tokio::test]
    async fn failed_send_abandons_batch_and_publishes() {
        let queue = MemoryQueue::with_payloads([payload(None, "lost")]);
        let delivery = FailingDelivery::new("HTTP 502");
        let bus = EventBus::new();
        let mut events = bus.subscribe();
        let flush = FlushLoop::new(Arc::new(queue.clone()), Arc::new(delivery.clone()), settings())
            .with_bus(bus);

        let outcome = flush.run_once().await.unwrap();
        assert!(matches!(outcome, FlushOutcome::Failed { count: 1, .. }));
        assert_eq!(delivery.attempts().await, 1);
        assert!(queue.is_empty().await.unwrap(), "failed batch must not be requeued");

        match events.recv().await.unwrap() {
            BusEvent::BatchFailed(failed) => {
                assert_eq!(failed.count, 1);
                assert!(failed.error.contains("HTTP 502"));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn successful_send_publishes_batch_flushed() {
        let layout = ButtonLayout::single(Button::url("Open", "https://x"));
        let entry = QueueEntry::text("with button").with_buttons(layout.clone());
        let queue = MemoryQueue::with_payloads([encode_entry(&entry).unwrap()]);
        let bus = EventBus::new();
        let mut events = bus.subscribe();
        let delivery = MockDelivery::new();
        let flush = FlushLoop::new(Arc::new(queue), Arc::new(delivery.clone()), settings()).with_bus(bus);

        flush.run_once().await.unwrap();

        match events.recv().await.unwrap() {
            BusEvent::BatchFlushed(flushed) => {
                assert_eq!(flushed.count, 1);
                assert_eq!(flushed.body, "with button");
                assert_eq!(flushed.chat_id, "-100");
                assert_eq!(flushed.parse_mode.as_deref(), Some("HTML"));
                assert_eq!(flushed.entries[0].buttons, Some(layout.clone()));
            }
            other => panic!("unexpected event {other:?}"),
        }
        assert_eq!(delivery.sent_messages().await[0].message.buttons, Some(layout));
    }

    #[tokio::test]
    async fn only_malformed_entries_count_as_empty() {
        let queue = MemoryQueue::with_payloads(["garbage", "42"]);
        let delivery = MockDelivery::new();
        let flush = FlushLoop::new(Arc::new(queue), Arc::new(delivery.clone()), settings());

        assert_eq!(
            flush.run_once().await.unwrap(),
            FlushOutcome::Empty { dropped: 2 }
        );
        assert_eq!(delivery.sent_count().await, 0);
    }

    #[tokio::test]
    async fn loop_keeps_flushing_until_cancelled() {
        let queue = MemoryQueue::new();
        let delivery = MockDelivery::new();
        let flush = Arc::new(FlushLoop::new(
            Arc::new(queue.clone()),
            Arc::new(delivery.clone()),
            settings(),
        ));
        let cancel = CancellationToken::new();

        let handle = {
            let flush = Arc::clone(&flush);
            let cancel = cancel.clone();
            tokio::spawn(async move { flush.run(true, cancel).await })
        };

        queue.push(&payload(None, "first")).await.unwrap();
        delivery.wait_for(1, Duration::from_secs(5)).await;
        queue.push(&payload(None, "second")).await.unwrap();
        let sent = delivery.wait_for(2, Duration::from_secs(5)).await;

        cancel.cancel();
        let summary = handle.await.unwrap().unwrap();

        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].message.body, "second");
        assert_eq!(summary.entries_flushed, 2);
        assert!(summary.cycles >= 2);
    }

    #[test]
    fn settings_require_token_and_chat() {
        let mut config = LogramConfig::default();
        config.telegram.bot_token = Some("1:A".into());
        let err = FlushSettings::from_config(&config).unwrap_err();
        assert_eq!(
            err.to_string(),
            "configuration error: Telegram bot_token or chat_id is not configured."
        );

        config.telegram.chat_id = Some("-100".into());
        let settings = FlushSettings::from_config(&config).unwrap();
        assert_eq!(settings.max_batch, 20);
        assert_eq!(settings.parse_mode.as_deref(), Some("HTML"));
    }
}

// SPDX-FileCopyrightText: 2026 Logram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Internal typed event bus.
//!
//! The flush loop publishes one event per delivered or failed batch. Any
//! number of subscribers may listen; publishing never blocks and never fails
//! when nobody is listening.

pub mod events;

use tokio::sync::broadcast;
use tracing::trace;

pub use events::{BatchFailed, BatchFlushed, BusEvent};

/// Buffered events per subscriber before the slowest one starts lagging.
const DEFAULT_CAPACITY: usize = 256;

/// Cloneable handle to a broadcast channel of [`BusEvent`]s.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<BusEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Sends `event` to current subscribers. Returns how many received it.
    pub fn publish(&self, event: BusEvent) -> usize {
        let kind = event.kind();
        match self.tx.send(event) {
            Ok(n) => n,
            Err(_) => {
                trace!(kind, "bus event published with no subscribers");
                0
            }
        }
    }

    /// A receiver for events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<BusEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logram_core::QueueEntry;

    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let bus = EventBus::new();
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();

        let event = BusEvent::BatchFlushed(BatchFlushed::new(
            vec![QueueEntry::text("x")],
            "x".into(),
            "-100".into(),
            Some("HTML".into()),
        ));
        assert_eq!(bus.publish(event), 2);

        for rx in [&mut a, &mut b] {
            match rx.recv().await.unwrap() {
                BusEvent::BatchFlushed(flushed) => assert_eq!(flushed.count, 1),
                other => panic!("unexpected event {other:?}"),
            }
        }
    }

    #[test]
    fn publish_without_subscribers_is_harmless() {
        let bus = EventBus::new();
        let sent = bus.publish(BusEvent::BatchFailed(BatchFailed {
            count: 3,
            chat_id: "-100".into(),
            error: "timeout".into(),
        }));
        assert_eq!(sent, 0);
        assert_eq!(bus.subscriber_count(), 0);
    }
}

// SPDX-FileCopyrightText: 2026 Logram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `logram flush [--loop]`.

use std::sync::Arc;

use logram_buffer::{FlushLoop, FlushSettings};
use logram_bus::{BusEvent, EventBus};
use logram_config::{DeliveryMode, LogramConfig};
use logram_core::LogramError;
use logram_storage::{Database, SqliteQueue};
use logram_telegram::TelegramClient;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::output;
use crate::shutdown::install_signal_handler;

pub async fn run_flush(config: &LogramConfig, looping: bool) -> Result<(), LogramError> {
    if config.logging.mode != DeliveryMode::Buffered {
        output::warn(&format!(
            "logging.mode is not \"buffered\" (current: {}). Messages may not be enqueued.",
            config.logging.mode
        ));
    }

    let settings = FlushSettings::from_config(config)?;
    let client = TelegramClient::from_config(&config.telegram)?;
    let db = Database::open(&config.buffer.database_path).await?;
    let queue = SqliteQueue::new(db.clone(), config.buffer.queue_key.clone());

    let cancel = if looping {
        install_signal_handler()
    } else {
        CancellationToken::new()
    };

    let bus = EventBus::new();
    let reporter = spawn_reporter(bus.subscribe());

    let flush = FlushLoop::new(Arc::new(queue), Arc::new(client), settings).with_bus(bus);
    let result = flush.run(looping, cancel).await;
    // Last sender gone: the reporter drains what is left and stops.
    drop(flush);
    if let Err(e) = reporter.await {
        debug!(error = %e, "flush reporter stopped abnormally");
    }
    db.close().await?;

    let summary = result?;
    if looping {
        info!(
            cycles = summary.cycles,
            batches = summary.batches_flushed,
            entries = summary.entries_flushed,
            failed = summary.batches_failed,
            dropped = summary.entries_dropped,
            "flush loop stopped"
        );
    }
    Ok(())
}

/// Console line for a bus event. `Ok` lines go to stdout, `Err` to stderr.
pub(crate) fn describe(event: &BusEvent) -> Result<String, String> {
    match event {
        BusEvent::BatchFlushed(flushed) => {
            Ok(format!("Flushed {} Telegram log entries.", flushed.count))
        }
        BusEvent::BatchFailed(failed) => Err(format!(
            "Failed to send {} Telegram log entries: {}",
            failed.count, failed.error
        )),
    }
}

/// Prints every flush event until the bus closes. Resolves to the number of
/// events printed.
pub(crate) fn spawn_reporter(mut rx: broadcast::Receiver<BusEvent>) -> JoinHandle<usize> {
    tokio::spawn(async move {
        let mut printed = 0;
        loop {
            match rx.recv().await {
                Ok(event) => {
                    match describe(&event) {
                        Ok(line) => output::success(&line),
                        Err(line) => output::error(&line),
                    }
                    printed += 1;
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!(skipped, "flush reporter lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
        printed
    })
}

// SPDX-FileCopyrightText: 2026 Logram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `logram log`, plus the sink wiring shared with `serve`.

use std::sync::Arc;

use logram_config::LogramConfig;
use logram_core::{Delivery, LogramError, PendingQueue, Severity};
use logram_log::{ButtonBuilder, DEFAULT_CAPACITY, LogSink, SinkTarget, uses_queue};
use logram_storage::{Database, SqliteQueue};
use logram_telegram::TelegramClient;
use tokio::task::JoinHandle;

use crate::output;

/// A running sink plus what it needs to shut down cleanly.
pub struct SinkHandle {
    pub sink: LogSink,
    task: JoinHandle<()>,
    db: Option<Database>,
}

impl SinkHandle {
    /// Opens the queue (buffered mode) or the Bot API client (instant mode)
    /// and starts the forwarder.
    pub async fn open(config: &LogramConfig) -> Result<Self, LogramError> {
        let (db, queue, delivery) = if uses_queue(config) {
            let db = Database::open(&config.buffer.database_path).await?;
            let queue: Arc<dyn PendingQueue> =
                Arc::new(SqliteQueue::new(db.clone(), config.buffer.queue_key.clone()));
            (Some(db), Some(queue), None)
        } else {
            let client: Arc<dyn Delivery> = Arc::new(TelegramClient::from_config(&config.telegram)?);
            (None, None, Some(client))
        };

        let target = SinkTarget::from_config(config, queue, delivery)?;
        let (sink, task) = LogSink::spawn(target, DEFAULT_CAPACITY);
        Ok(Self {
            sink: sink.with_config_defaults(config),
            task,
            db,
        })
    }

    /// Drops the producer, waits for queued records to be forwarded, then
    /// closes the database.
    pub async fn finish(self) -> Result<(), LogramError> {
        let SinkHandle { sink, task, db } = self;
        drop(sink);
        task.await
            .map_err(|e| LogramError::Internal(format!("log forwarder panicked: {e}")))?;
        if let Some(db) = db {
            db.close().await?;
        }
        Ok(())
    }
}

/// Parses `TEXT=VALUE`. Splits at the first `=` so URLs may carry queries.
pub fn parse_pair(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((text, value)) if !text.is_empty() && !value.is_empty() => {
            Ok((text.to_string(), value.to_string()))
        }
        _ => Err(format!("expected TEXT=VALUE, got `{raw}`")),
    }
}

/// Buttons for one `logram log` call.
#[derive(Debug, Default, Clone)]
pub struct ButtonArgs {
    pub urls: Vec<(String, String)>,
    pub callbacks: Vec<(String, String)>,
    /// One button per row instead of a single shared row.
    pub row_per_button: bool,
}

impl ButtonArgs {
    fn apply<'a>(&self, mut builder: ButtonBuilder<'a>) -> ButtonBuilder<'a> {
        for (text, url) in &self.urls {
            if self.row_per_button {
                builder = builder.new_row();
            }
            builder = builder.url(text, url);
        }
        for (text, data) in &self.callbacks {
            if self.row_per_button {
                builder = builder.new_row();
            }
            builder = builder.callback(text, data);
        }
        builder
    }
}

pub async fn run_log(
    config: &LogramConfig,
    level: Severity,
    message: String,
    buttons: ButtonArgs,
) -> Result<(), LogramError> {
    let handle = SinkHandle::open(config).await?;
    buttons
        .apply(ButtonBuilder::new(&handle.sink))
        .send(level, message);
    handle.finish().await?;

    if uses_queue(config) {
        output::success(&format!(
            "Queued {level} entry under `{}`.",
            config.buffer.queue_key
        ));
    } else {
        output::success(&format!("Sent {level} entry."));
    }
    Ok(())
}

// SPDX-FileCopyrightText: 2026 Logram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event payloads carried on the bus.

use chrono::{DateTime, Utc};
use logram_core::QueueEntry;
use serde::Serialize;
use uuid::Uuid;

/// Everything the bus can carry.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BusEvent {
    BatchFlushed(BatchFlushed),
    BatchFailed(BatchFailed),
}

impl BusEvent {
    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            BusEvent::BatchFlushed(_) => "batch_flushed",
            BusEvent::BatchFailed(_) => "batch_failed",
        }
    }
}

/// A batch was accepted by the Bot API.
#[derive(Debug, Clone, Serialize)]
pub struct BatchFlushed {
    pub id: Uuid,
    pub at: DateTime<Utc>,
    /// Decoded entries, oldest first.
    pub entries: Vec<QueueEntry>,
    /// The composed message text as sent.
    pub body: String,
    pub count: usize,
    pub chat_id: String,
    pub parse_mode: Option<String>,
}

impl BatchFlushed {
    pub fn new(
        entries: Vec<QueueEntry>,
        body: String,
        chat_id: String,
        parse_mode: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            at: Utc::now(),
            count: entries.len(),
            entries,
            body,
            chat_id,
            parse_mode,
        }
    }
}

/// A batch was abandoned after a failed send.
#[derive(Debug, Clone, Serialize)]
pub struct BatchFailed {
    pub count: usize,
    pub chat_id: String,
    pub error: String,
}

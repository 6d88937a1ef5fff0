// SPDX-FileCopyrightText: 2026 Logram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tracing` layer that forwards events to a [`LogSink`].

use std::fmt::Write as _;

use logram_core::{LogRecord, Severity};
use tracing::field::{Field, Visit};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

use crate::sink::LogSink;

/// Target prefixes never forwarded. Logram's own crates and the transport
/// stack log on the delivery path; forwarding them would feed back.
const IGNORED_TARGETS: &[&str] = &[
    "logram",
    "reqwest",
    "hyper",
    "h2",
    "rustls",
    "rusqlite",
    "tokio_rusqlite",
    "refinery",
    "tower",
    "axum",
];

/// Forwards every event at or above `min_level` to a sink.
pub struct TelegramLogLayer {
    sink: LogSink,
    min_level: Severity,
}

impl TelegramLogLayer {
    pub fn new(sink: LogSink, min_level: Severity) -> Self {
        Self { sink, min_level }
    }
}

fn is_ignored(target: &str) -> bool {
    IGNORED_TARGETS.iter().any(|prefix| target.starts_with(prefix))
}

/// Collects the `message` field and renders the rest as `key=value` lines.
#[derive(Default)]
struct FieldVisitor {
    message: String,
    fields: String,
}

impl FieldVisitor {
    fn push_field(&mut self, field: &Field, value: &dyn std::fmt::Display) {
        let _ = write!(self.fields, "\n{}={}", field.name(), value);
    }

    fn into_text(self) -> String {
        let mut text = self.message;
        text.push_str(&self.fields);
        text.trim().to_string()
    }
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            let _ = write!(self.fields, "\n{}={:?}", field.name(), value);
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.push_field(field, &value);
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push_field(field, &value);
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push_field(field, &value);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push_field(field, &value);
    }
}

impl<S: tracing::Subscriber> Layer<S> for TelegramLogLayer {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        if is_ignored(meta.target()) {
            return;
        }
        let severity = Severity::from(meta.level());
        if severity < self.min_level {
            return;
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        self.sink.emit(LogRecord::now(severity, visitor.into_text()));
    }
}

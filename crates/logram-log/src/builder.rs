// SPDX-FileCopyrightText: 2026 Logram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fluent builder for a single log message with inline buttons.
//!
//! ```ignore
//! ButtonBuilder::new(&sink)
//!     .url("Open order", "https://shop.example/orders/42")
//!     .new_row()
//!     .callback("Refund", "refund:42")
//!     .with_context("order_id", 42)
//!     .error("Payment capture failed");
//! ```

use std::fmt::Display;

use logram_core::{Button, ButtonLayout, LogRecord, Severity};

use crate::sink::LogSink;

/// Collects button rows and context for one message. Consumed by `send`.
pub struct ButtonBuilder<'a> {
    sink: &'a LogSink,
    rows: Vec<Vec<Button>>,
    context: Vec<(String, String)>,
}

impl<'a> ButtonBuilder<'a> {
    pub fn new(sink: &'a LogSink) -> Self {
        Self {
            sink,
            rows: Vec::new(),
            context: Vec::new(),
        }
    }

    /// Starts a new row. Following buttons go into it.
    pub fn new_row(mut self) -> Self {
        self.rows.push(Vec::new());
        self
    }

    pub fn url(self, text: impl Into<String>, url: impl Into<String>) -> Self {
        self.push(Button::url(text, url))
    }

    pub fn callback(self, text: impl Into<String>, data: impl Into<String>) -> Self {
        self.push(Button::callback(text, data))
    }

    /// Adds a `key=value` line below the message. Pairs keep insertion order.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.context.push((key.into(), value.to_string()));
        self
    }

    fn push(mut self, button: Button) -> Self {
        match self.rows.last_mut() {
            Some(row) => row.push(button),
            None => self.rows.push(vec![button]),
        }
        self
    }

    /// Assembles the record without emitting it.
    pub fn build(self, level: Severity, message: impl Into<String>) -> LogRecord {
        let mut text = message.into();
        for (key, value) in &self.context {
            text.push('\n');
            text.push_str(key);
            text.push('=');
            text.push_str(value);
        }
        let mut record = LogRecord::now(level, text);
        record.buttons = ButtonLayout::new(self.rows);
        record
    }

    pub fn send(self, level: Severity, message: impl Into<String>) {
        let sink = self.sink;
        sink.emit(self.build(level, message));
    }

    pub fn info(self, message: impl Into<String>) {
        self.send(Severity::Info, message);
    }

    pub fn warning(self, message: impl Into<String>) {
        self.send(Severity::Warning, message);
    }

    pub fn error(self, message: impl Into<String>) {
        self.send(Severity::Error, message);
    }

    pub fn critical(self, message: impl Into<String>) {
        self.send(Severity::Critical, message);
    }
}

// SPDX-FileCopyrightText: 2026 Logram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Producer side of Logram.
//!
//! - [`LogSink`] accepts [`logram_core::LogRecord`]s without blocking and
//!   forwards them to the pending queue (buffered mode) or straight to the
//!   chat (instant mode) from a background task.
//! - [`TelegramLogLayer`] feeds `tracing` events into a sink.
//! - [`ButtonBuilder`] attaches inline buttons to a single message.

pub mod builder;
pub mod layer;
pub mod sink;

pub use builder::ButtonBuilder;
pub use layer::TelegramLogLayer;
pub use sink::{DEFAULT_CAPACITY, LogSink, SinkTarget, uses_queue};

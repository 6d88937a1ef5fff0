// SPDX-FileCopyrightText: 2026 Logram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Consumer side of the buffered pipeline.
//!
//! [`drain`] pops a batch from a [`logram_core::PendingQueue`], [`compose`]
//! turns it into one chat message, and [`FlushLoop`] repeats both and hands
//! the result to a [`logram_core::Delivery`].

pub mod compose;
pub mod drain;
pub mod flush;

pub use compose::{TRUNCATION_MARKER, compose, format_line, truncate_chars};
pub use drain::drain;
pub use flush::{FlushLoop, FlushOutcome, FlushSettings, FlushSummary};

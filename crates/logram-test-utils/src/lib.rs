// SPDX-FileCopyrightText: 2026 Logram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test doubles for Logram.
//!
//! In-memory stand-ins for the two backend traits, so pipeline tests run
//! without SQLite or network access.
//!
//! - [`MemoryQueue`]: a [`logram_core::PendingQueue`] over a `VecDeque`
//! - [`MockDelivery`]: captures every message passed to `send()`
//! - [`FailingDelivery`]: rejects every send

pub mod memory_queue;
pub mod mock_delivery;

pub use memory_queue::MemoryQueue;
pub use mock_delivery::{FailingDelivery, MockDelivery, SentMessage};

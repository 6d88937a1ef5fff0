// SPDX-FileCopyrightText: 2026 Logram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Seams between the pipeline and its backends.
//!
//! Both traits use `#[async_trait]` so they can be held as `Arc<dyn _>`.

pub mod delivery;
pub mod queue;

pub use delivery::Delivery;
pub use queue::PendingQueue;

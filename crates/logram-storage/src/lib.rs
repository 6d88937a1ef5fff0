// SPDX-FileCopyrightText: 2026 Logram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence for the Logram pending queue.
//!
//! WAL-mode SQLite with embedded migrations, accessed through
//! `tokio-rusqlite`. Several processes may open the same file; pops are single
//! atomic statements so no payload is handed out twice.

pub mod database;
pub mod migrations;
pub mod queue;

pub use database::Database;
pub use queue::SqliteQueue;

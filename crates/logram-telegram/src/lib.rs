// SPDX-FileCopyrightText: 2026 Logram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram Bot API client for Logram.
//!
//! [`TelegramClient`] posts composed log messages with `sendMessage` and
//! implements [`logram_core::Delivery`]. It also wraps the handful of Bot API
//! methods the CLI and diagnostics endpoint need.

pub mod client;
pub mod updates;

pub use client::TelegramClient;
pub use updates::{ChatSummary, chats_from_updates};

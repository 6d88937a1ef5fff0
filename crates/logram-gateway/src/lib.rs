// SPDX-FileCopyrightText: 2026 Logram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP surface of Logram: the Telegram webhook that dispatches button
//! presses and an optional diagnostics endpoint.

pub mod auth;
pub mod handlers;
pub mod server;

pub use auth::{
    CALLBACK_SECRET_HEADER, HEALTH_SECRET_HEADER, SecretGuard, TELEGRAM_SECRET_HEADER,
    secret_middleware,
};
pub use server::{GatewayState, build_router, start_server};

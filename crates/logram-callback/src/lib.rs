// SPDX-FileCopyrightText: 2026 Logram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Routing of inline-button presses to application handlers.
//!
//! Callback data has the form `action:payload`. The action selects a
//! [`Handler`] from the [`CallbackRegistry`]; [`dispatch`] runs it for one
//! webhook update.

pub mod catalog;
pub mod dispatch;
pub mod handler;
pub mod registry;

pub use catalog::{HandlerCatalog, HandlerFactory, LOG_HANDLER_ID, LogHandler};
pub use dispatch::{DispatchOutcome, callback_data, dispatch};
pub use handler::{CallbackHandler, InlineHandler, ParsedCallbackHandler, split_callback_data};
pub use registry::{Binding, CallbackRegistry, Handler};

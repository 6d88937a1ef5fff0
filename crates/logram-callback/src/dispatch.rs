// SPDX-FileCopyrightText: 2026 Logram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Runs the handler for one webhook update.

use serde_json::Value;
use tracing::{debug, warn};

use crate::handler::split_callback_data;
use crate::registry::CallbackRegistry;

/// Result of [`dispatch`]. Handler failures are logged, not reported here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// `callback_query.data` is missing or not a string.
    NoCallbackData,
    /// A handler ran for `action`.
    Handled { action: String },
    /// Nothing is bound to `action`.
    Unhandled { action: String },
}

/// `callback_query.data` when present and a string.
pub fn callback_data(update: &Value) -> Option<&str> {
    update.get("callback_query")?.get("data")?.as_str()
}

pub async fn dispatch(registry: &CallbackRegistry, update: &Value) -> DispatchOutcome {
    let Some(data) = callback_data(update) else {
        return DispatchOutcome::NoCallbackData;
    };
    let (action, _) = split_callback_data(data);
    let action = action.to_string();

    let Some(handler) = registry.resolve(&action) else {
        debug!(action = %action, "no handler for callback action");
        return DispatchOutcome::Unhandled { action };
    };

    if let Err(e) = handler.handle(update, data).await {
        warn!(action = %action, error = %e, "callback handler failed");
    }
    DispatchOutcome::Handled { action }
}

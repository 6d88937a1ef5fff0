// SPDX-FileCopyrightText: 2026 Logram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Route handlers.

use axum::{Json, body::Bytes, extract::State};
use logram_callback::{DispatchOutcome, dispatch};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::server::GatewayState;

/// `POST {callback.path}`. Always answers 200; the body says whether the
/// update carried callback data.
pub async fn post_callback(State(state): State<GatewayState>, body: Bytes) -> Json<Value> {
    let update: Value = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            debug!(error = %e, "malformed webhook payload");
            return Json(json!({ "ok": false, "error": "Malformed payload" }));
        }
    };

    match dispatch(&state.registry, &update).await {
        DispatchOutcome::NoCallbackData => {
            Json(json!({ "ok": false, "error": "No callback data" }))
        }
        DispatchOutcome::Handled { .. } | DispatchOutcome::Unhandled { .. } => {
            Json(json!({ "ok": true }))
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub config: ConfigSummary,
    pub callbacks: CallbackSummary,
    pub webhook: Value,
}

#[derive(Debug, Serialize)]
pub struct ConfigSummary {
    pub bot_token_set: bool,
    pub chat_id_set: bool,
    pub callback_enabled: bool,
}

#[derive(Debug, Serialize)]
pub struct CallbackSummary {
    /// Configured pairs whose handler id exists.
    pub configured: Vec<ActionBinding>,
    /// Configured pairs whose handler id is unknown.
    pub missing_handlers: Vec<ActionBinding>,
    /// Live registry contents, inline handlers included.
    pub registered: Vec<ActionBinding>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ActionBinding {
    pub action: String,
    pub handler: String,
}

/// `GET {health.path}`.
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    let config = &state.config;

    let (configured, missing_handlers): (Vec<ActionBinding>, Vec<ActionBinding>) = config
        .callbacks
        .map
        .iter()
        .map(|(action, handler)| ActionBinding {
            action: action.clone(),
            handler: handler.clone(),
        })
        .partition(|b| state.registry.catalog().contains(&b.handler));

    let registered = state
        .registry
        .list()
        .into_iter()
        .map(|b| ActionBinding {
            handler: b.handler.describe().to_string(),
            action: b.action,
        })
        .collect();

    let webhook = match &state.telegram {
        Some(client) => match client.get_webhook_info().await {
            Ok(info) => info,
            Err(e) => json!({ "error": e.to_string() }),
        },
        None => Value::Null,
    };

    Json(HealthResponse {
        ok: true,
        config: ConfigSummary {
            bot_token_set: config.telegram.token().is_some(),
            chat_id_set: config.telegram.chat().is_some(),
            callback_enabled: config.callback.enabled,
        },
        callbacks: CallbackSummary {
            configured,
            missing_handlers,
            registered,
        },
        webhook,
    })
}

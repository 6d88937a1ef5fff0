// SPDX-FileCopyrightText: 2026 Logram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Router assembly and the listening loop.

use std::sync::Arc;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use logram_callback::CallbackRegistry;
use logram_config::LogramConfig;
use logram_core::LogramError;
use logram_telegram::TelegramClient;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use crate::auth::{SecretGuard, secret_middleware};
use crate::handlers;

/// Shared state for request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub config: Arc<LogramConfig>,
    pub registry: Arc<CallbackRegistry>,
    /// Present when a bot token is configured; used for `getWebhookInfo`.
    pub telegram: Option<TelegramClient>,
}

impl GatewayState {
    pub fn new(config: Arc<LogramConfig>, registry: Arc<CallbackRegistry>) -> Result<Self, LogramError> {
        let telegram = match config.telegram.token() {
            Some(_) => Some(TelegramClient::from_config(&config.telegram)?),
            None => None,
        };
        Ok(Self {
            config,
            registry,
            telegram,
        })
    }
}

/// Builds the application router. Disabled routes are not mounted and so
/// answer 404.
pub fn build_router(state: GatewayState) -> Router {
    let mut app = Router::new();

    if state.config.callback.enabled {
        let guard = SecretGuard::callback(state.config.callback.secret.clone());
        let callback_routes = Router::new()
            .route(&state.config.callback.path, post(handlers::post_callback))
            .route_layer(axum_middleware::from_fn_with_state(guard, secret_middleware))
            .with_state(state.clone());
        app = app.merge(callback_routes);
    }

    if state.config.health.enabled {
        let guard = SecretGuard::health(state.config.health.secret.clone());
        let health_routes = Router::new()
            .route(&state.config.health.path, get(handlers::get_health))
            .route_layer(axum_middleware::from_fn_with_state(guard, secret_middleware))
            .with_state(state.clone());
        app = app.merge(health_routes);
    }

    app.layer(TraceLayer::new_for_http())
}

/// Serves until `cancel` fires, then drains in-flight requests.
pub async fn start_server(state: GatewayState, cancel: CancellationToken) -> Result<(), LogramError> {
    let addr = format!(
        "{}:{}",
        state.config.server.bind_address, state.config.server.port
    );
    let callback_path = state
        .config
        .callback
        .enabled
        .then(|| state.config.callback.path.clone());
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| LogramError::Internal(format!("failed to bind {addr}: {e}")))?;

    tracing::info!(callback = ?callback_path, "Logram server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
        .map_err(|e| LogramError::Internal(format!("server error: {e}")))?;

    tracing::info!("Logram server stopped");
    Ok(())
}

// SPDX-FileCopyrightText: 2026 Logram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `logram serve`: webhook and diagnostics server.

use std::sync::Arc;

use logram_callback::CallbackRegistry;
use logram_config::LogramConfig;
use logram_core::LogramError;
use logram_gateway::{GatewayState, start_server};
use tracing::{info, warn};

use crate::shutdown::install_signal_handler;

pub async fn run_serve(config: LogramConfig) -> Result<(), LogramError> {
    if !config.callback.enabled && !config.health.enabled {
        warn!("callback and health routes are both disabled; every request will get 404");
    }

    let registry = Arc::new(CallbackRegistry::default());
    let loaded = registry.load_from_config(&config.callbacks.map);
    info!(
        loaded,
        configured = config.callbacks.map.len(),
        "callback handlers registered"
    );

    let state = GatewayState::new(Arc::new(config), registry)?;
    let cancel = install_signal_handler();
    start_server(state, cancel).await
}

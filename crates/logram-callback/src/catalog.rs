// SPDX-FileCopyrightText: 2026 Logram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Catalog of named handler factories.
//!
//! `[callbacks.map]` binds actions to handler ids. An id resolves to a fresh
//! handler through the factory registered under it here.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use logram_core::LogramError;
use serde_json::Value;
use tracing::info;

use crate::handler::{CallbackHandler, ParsedCallbackHandler};

/// Id of the built-in [`LogHandler`].
pub const LOG_HANDLER_ID: &str = "log";

/// Creates handler instances for one handler id.
pub trait HandlerFactory: Send + Sync {
    /// Returns `None` when the handler cannot be built.
    fn create(&self) -> Option<Arc<dyn CallbackHandler>>;
}

impl<F> HandlerFactory for F
where
    F: Fn() -> Option<Arc<dyn CallbackHandler>> + Send + Sync,
{
    fn create(&self) -> Option<Arc<dyn CallbackHandler>> {
        self()
    }
}

/// Handler factories keyed by id.
#[derive(Default)]
pub struct HandlerCatalog {
    factories: HashMap<String, Arc<dyn HandlerFactory>>,
}

impl HandlerCatalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog holding the built-in handlers.
    pub fn with_builtins() -> Self {
        let mut catalog = Self::new();
        catalog.register(LOG_HANDLER_ID, || {
            Some(Arc::new(LogHandler) as Arc<dyn CallbackHandler>)
        });
        catalog
    }

    /// Adds or replaces the factory for `id`.
    pub fn register(&mut self, id: impl Into<String>, factory: impl HandlerFactory + 'static) {
        self.factories.insert(id.into(), Arc::new(factory));
    }

    pub fn contains(&self, id: &str) -> bool {
        self.factories.contains_key(id)
    }

    /// Builds a handler for `id`.
    pub fn create(&self, id: &str) -> Option<Arc<dyn CallbackHandler>> {
        self.factories.get(id)?.create()
    }

    /// Registered ids, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.factories.keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl std::fmt::Debug for HandlerCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerCatalog")
            .field("ids", &self.ids())
            .finish()
    }
}

/// Logs every press it receives.
pub struct LogHandler;

#[async_trait]
impl ParsedCallbackHandler for LogHandler {
    async fn handle_parsed(
        &self,
        update: &Value,
        action: &str,
        payload: &str,
    ) -> Result<(), LogramError> {
        let from = update
            .pointer("/callback_query/from/username")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        info!(action, payload, from, "Telegram callback received");
        Ok(())
    }
}

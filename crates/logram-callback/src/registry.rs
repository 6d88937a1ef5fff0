// SPDX-FileCopyrightText: 2026 Logram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Action to handler bindings.
//!
//! One registry is created per process and shared through `Arc`. Bindings
//! come from code ([`CallbackRegistry::on`], [`CallbackRegistry::register`])
//! and from `[callbacks.map]` via [`CallbackRegistry::load_from_config`].

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::DashMap;
use logram_core::LogramError;
use serde_json::Value;
use tracing::{debug, warn};

use crate::catalog::HandlerCatalog;
use crate::handler::{CallbackHandler, InlineHandler};

/// What an action is bound to.
#[derive(Debug, Clone)]
pub enum Handler {
    /// A closure registered in code.
    Inline(Arc<InlineHandler>),
    /// A handler id resolved through the registry's catalog on each press.
    Named(String),
}

impl Handler {
    pub fn inline<F, Fut>(f: F) -> Self
    where
        F: Fn(Value, String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), LogramError>> + Send + 'static,
    {
        Handler::Inline(Arc::new(InlineHandler::new(f)))
    }

    pub fn named(id: impl Into<String>) -> Self {
        Handler::Named(id.into())
    }

    /// Label used in listings.
    pub fn describe(&self) -> &str {
        match self {
            Handler::Inline(_) => "<inline>",
            Handler::Named(id) => id,
        }
    }
}

/// One row of [`CallbackRegistry::list`].
#[derive(Debug, Clone)]
pub struct Binding {
    pub action: String,
    pub handler: Handler,
}

pub struct CallbackRegistry {
    bindings: DashMap<String, Handler>,
    catalog: HandlerCatalog,
    config_loaded: AtomicBool,
}

impl CallbackRegistry {
    pub fn new(catalog: HandlerCatalog) -> Self {
        Self {
            bindings: DashMap::new(),
            catalog,
            config_loaded: AtomicBool::new(false),
        }
    }

    /// Binds `action`, replacing any previous binding.
    pub fn register(&self, action: impl Into<String>, handler: Handler) {
        let action = action.into();
        debug!(action = %action, handler = handler.describe(), "callback registered");
        self.bindings.insert(action, handler);
    }

    /// Binds `action` to a closure.
    pub fn on<F, Fut>(&self, action: impl Into<String>, f: F)
    where
        F: Fn(Value, String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), LogramError>> + Send + 'static,
    {
        self.register(action, Handler::inline(f));
    }

    /// Returns a runnable handler for `action`, or `None` when the action is
    /// unbound or its handler id cannot be built.
    pub fn resolve(&self, action: &str) -> Option<Arc<dyn CallbackHandler>> {
        let handler = self.bindings.get(action)?.value().clone();
        match handler {
            Handler::Inline(inline) => Some(inline),
            Handler::Named(id) => self.catalog.create(&id),
        }
    }

    /// All bindings, sorted by action.
    pub fn list(&self) -> Vec<Binding> {
        let mut bindings: Vec<Binding> = self
            .bindings
            .iter()
            .map(|entry| Binding {
                action: entry.key().clone(),
                handler: entry.value().clone(),
            })
            .collect();
        bindings.sort_by(|a, b| a.action.cmp(&b.action));
        bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn catalog(&self) -> &HandlerCatalog {
        &self.catalog
    }

    /// Registers the `{action: handler-id}` pairs from configuration.
    ///
    /// Only the first call on a registry does anything; later calls return 0.
    /// Pairs whose id is not in the catalog are skipped. Returns the number
    /// of bindings added.
    pub fn load_from_config(&self, map: &BTreeMap<String, String>) -> usize {
        if self.config_loaded.swap(true, Ordering::SeqCst) {
            return 0;
        }

        let mut added = 0;
        for (action, id) in map {
            if !self.catalog.contains(id) {
                warn!(action = %action, handler = %id, "unknown callback handler, skipping");
                continue;
            }
            self.register(action.clone(), Handler::named(id.clone()));
            added += 1;
        }
        added
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new(HandlerCatalog::with_builtins())
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("bindings", &self.bindings.len())
            .field("catalog", &self.catalog)
            .field("config_loaded", &self.config_loaded.load(Ordering::Relaxed))
            .finish()
    }
}

// SPDX-FileCopyrightText: 2026 Logram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Handler capability traits.

use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;
use logram_core::LogramError;
use serde_json::Value;

/// Application logic bound to a callback action.
#[async_trait]
pub trait CallbackHandler: Send + Sync {
    /// Handles one update. `data` is the raw `callback_query.data`.
    async fn handle(&self, update: &Value, data: &str) -> Result<(), LogramError>;
}

/// A handler that wants the callback data already split.
///
/// Every implementor is a [`CallbackHandler`] through a blanket impl.
#[async_trait]
pub trait ParsedCallbackHandler: Send + Sync {
    async fn handle_parsed(
        &self,
        update: &Value,
        action: &str,
        payload: &str,
    ) -> Result<(), LogramError>;
}

#[async_trait]
impl<T: ParsedCallbackHandler> CallbackHandler for T {
    async fn handle(&self, update: &Value, data: &str) -> Result<(), LogramError> {
        let (action, payload) = split_callback_data(data);
        self.handle_parsed(update, action, payload).await
    }
}

/// Splits `action:payload` at the first colon. Without a colon the whole
/// string is the action and the payload is empty.
pub fn split_callback_data(data: &str) -> (&str, &str) {
    data.split_once(':').unwrap_or((data, ""))
}

type HandlerFuture = Pin<Box<dyn Future<Output = Result<(), LogramError>> + Send>>;

/// A closure registered with [`crate::CallbackRegistry::on`].
///
/// The closure receives owned copies of the update and the raw data so the
/// returned future can be `'static`.
pub struct InlineHandler {
    f: Box<dyn Fn(Value, String) -> HandlerFuture + Send + Sync>,
}

impl InlineHandler {
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(Value, String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), LogramError>> + Send + 'static,
    {
        Self {
            f: Box::new(move |update, data| Box::pin(f(update, data))),
        }
    }
}

impl std::fmt::Debug for InlineHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("InlineHandler")
    }
}

#[async_trait]
impl CallbackHandler for InlineHandler {
    async fn handle(&self, update: &Value, data: &str) -> Result<(), LogramError> {
        (self.f)(update.clone(), data.to_string()).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use tokio::sync::Mutex;

    use super::*;

    #[test]
    fn split_at_first_colon_only() {
        assert_eq!(split_callback_data("ban_user:42"), ("ban_user", "42"));
        assert_eq!(split_callback_data("noop"), ("noop", ""));
        assert_eq!(split_callback_data("a:b:c"), ("a", "b:c"));
        assert_eq!(split_callback_data("trailing:"), ("trailing", ""));
        assert_eq!(split_callback_data(":x"), ("", "x"));
    }

    struct Recorder {
        seen: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl ParsedCallbackHandler for Recorder {
        async fn handle_parsed(
            &self,
            _update: &Value,
            action: &str,
            payload: &str,
        ) -> Result<(), LogramError> {
            self.seen
                .lock()
                .await
                .push((action.to_string(), payload.to_string()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn parsed_handler_receives_split_data() {
        let recorder = Recorder {
            seen: Mutex::new(Vec::new()),
        };
        recorder.handle(&json!({}), "test_action:123").await.unwrap();
        assert_eq!(
            recorder.seen.lock().await.as_slice(),
            &[("test_action".to_string(), "123".to_string())]
        );
    }

    #[tokio::test]
    async fn inline_handler_gets_update_and_raw_data() {
        let captured = Arc::new(Mutex::new(None));
        let sink = captured.clone();
        let handler = InlineHandler::new(move |update, data| {
            let sink = sink.clone();
            async move {
                *sink.lock().await = Some((update, data));
                Ok(())
            }
        });

        let update = json!({"callback_query": {"data": "test:payload"}});
        handler.handle(&update, "test:payload").await.unwrap();
        assert_eq!(
            *captured.lock().await,
            Some((update, "test:payload".to_string()))
        );
    }
}

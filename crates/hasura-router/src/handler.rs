//! Name-keyed handler tables.
//!
//! Handlers are plain async functions `(context, payload) -> Result<T, E>`.
//! On registration each one is wrapped into an object-safe form that encodes
//! the success value to JSON and normalizes the error into a [`HasuraError`],
//! so the routers only ever see `Result<Vec<u8>, HasuraError>`.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use hasura_protocol::HasuraError;
use serde::Serialize;

/// Future returned by a boxed handler: the JSON-encoded result or the error to send back.
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<Vec<u8>, HasuraError>> + Send>>;

/// Object-safe handler, shared by every request routed to its name.
pub type BoxedHandler<C, P> = Arc<dyn Fn(C, P) -> HandlerFuture + Send + Sync>;

/// Routing table from name to handler. Built before the router and never
/// mutated once the router owns it.
pub struct HandlerTable<C, P> {
    handlers: HashMap<String, BoxedHandler<C, P>>,
}

impl<C, P> HandlerTable<C, P>
where
    C: Send + 'static,
    P: Send + 'static,
{
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register `handler` under `name`, builder style.
    pub fn register<F, Fut, T, E>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(C, P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Serialize + Send + 'static,
        E: Into<anyhow::Error> + 'static,
    {
        self.insert(name, handler);
        self
    }

    /// Register `handler` under `name`, replacing any previous handler with that name.
    pub fn insert<F, Fut, T, E>(&mut self, name: impl Into<String>, handler: F)
    where
        F: Fn(C, P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Serialize + Send + 'static,
        E: Into<anyhow::Error> + 'static,
    {
        let boxed: BoxedHandler<C, P> = Arc::new(move |ctx: C, payload: P| {
            let fut = handler(ctx, payload);
            Box::pin(async move {
                let value = fut
                    .await
                    .map_err(|e| HasuraError::from_handler(e.into()))?;
                serde_json::to_vec(&value).map_err(|e| HasuraError::internal(e.to_string()))
            }) as HandlerFuture
        });
        self.handlers.insert(name.into(), boxed);
    }

    pub fn get(&self, name: &str) -> Option<&BoxedHandler<C, P>> {
        self.handlers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<C, P> Default for HandlerTable<C, P>
where
    C: Send + 'static,
    P: Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

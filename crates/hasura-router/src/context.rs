//! Request contexts handed to handlers and notification sinks.
//!
//! A context is built fresh for every request. The `tracer` is a handle onto
//! the request's single [`Tracer`]; fields a handler adds through it show up
//! in the router's success/error notification.

use axum::http::HeaderMap;
use hasura_protocol::SessionVariables;

use crate::tracer::Tracer;

/// Context for one action request.
#[derive(Debug, Clone)]
pub struct ActionContext {
    /// Raw HTTP headers of the webhook call.
    pub headers: HeaderMap,
    /// Session variables from the request body. Empty until the body is decoded.
    pub session_variables: SessionVariables,
    pub tracer: Tracer,
    /// The GraphQL query the client sent to the engine.
    pub request_query: String,
}

/// Context for one event trigger request.
#[derive(Debug, Clone)]
pub struct EventContext {
    pub headers: HeaderMap,
    /// `event.session_variables` from the request body.
    pub session_variables: SessionVariables,
    pub tracer: Tracer,
}

/// Context for one cron trigger request.
///
/// Cron calls carry no end-user session, so `session_variables` is derived
/// from the HTTP headers the trigger was configured to send.
#[derive(Debug, Clone)]
pub struct CronContext {
    pub headers: HeaderMap,
    pub session_variables: SessionVariables,
    pub tracer: Tracer,
}

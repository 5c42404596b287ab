//! Success/error notifications.
//!
//! Routers report every request outcome to a [`NotificationSink`] together
//! with the request's trace fields. [`LogSink`] is the default: one structured
//! log event per request. Applications that want alerting or metrics supply
//! their own sink when building the router.

use std::sync::Arc;

use hasura_protocol::HasuraError;
use hasura_transport::WebhookResponse;
use serde_json::{Map, Value};
use tracing::{error, info};

use crate::tracer::Tracer;

/// Receives the outcome of every request handled by a router.
///
/// `fields` is a snapshot of the request's trace fields, including
/// `request_id` and the `measurement` block.
///
/// Both callbacks run inline on the request task, after the reply has been
/// shaped and before the router hands it to the HTTP layer. A slow sink
/// delays the reply and a panicking sink drops it; hand long work such as
/// network calls to `tokio::spawn`.
pub trait NotificationSink<C>: Send + Sync {
    /// Called with the exact body of the `200` reply.
    fn on_success(&self, ctx: &C, response: &[u8], fields: Map<String, Value>);

    /// Called on every failure path, before the `400` response is returned.
    fn on_error(&self, ctx: &C, err: &HasuraError, fields: Map<String, Value>);
}

/// Default sink: logs one `tracing` event per request.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl<C> NotificationSink<C> for LogSink {
    fn on_success(&self, _ctx: &C, _response: &[u8], fields: Map<String, Value>) {
        let kind = field_str(&fields, "type").unwrap_or("webhook").to_string();
        let request_id = field_str(&fields, "request_id").unwrap_or_default().to_string();
        let fields = Value::Object(fields);
        info!(
            request_id = %request_id,
            fields = %fields,
            "executed {kind} successfully"
        );
    }

    fn on_error(&self, _ctx: &C, err: &HasuraError, fields: Map<String, Value>) {
        let request_id = field_str(&fields, "request_id").unwrap_or_default().to_string();
        let fields = Value::Object(fields);
        error!(
            request_id = %request_id,
            code = %err.code(),
            fields = %fields,
            "{}",
            err.message()
        );
    }
}

fn field_str<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    fields.get(key).and_then(Value::as_str)
}

/// Shared sink handle held by a router.
pub type SharedSink<C> = Arc<dyn NotificationSink<C>>;

/// Report `err` and shape it as the `400` reply.
pub(crate) fn reject<C>(
    sink: &dyn NotificationSink<C>,
    ctx: &C,
    tracer: &Tracer,
    err: HasuraError,
) -> WebhookResponse {
    sink.on_error(ctx, &err, tracer.values());
    WebhookResponse::error(&err)
}

/// Shape the `200` reply, then report it.
pub(crate) fn accept<C>(
    sink: &dyn NotificationSink<C>,
    ctx: &C,
    tracer: &Tracer,
    body: Vec<u8>,
) -> WebhookResponse {
    let response = WebhookResponse::ok(body);
    sink.on_success(ctx, response.body(), tracer.values());
    response
}

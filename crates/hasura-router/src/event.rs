//! Event trigger router — dispatches database change events by `trigger.name`.

use std::sync::Arc;

use axum::body::Bytes;
use axum::http::HeaderMap;
use hasura_protocol::{EventTriggerPayload, HasuraError, SessionVariables};
use hasura_transport::{Webhook, WebhookResponse, request_id};
use tracing::debug;

use crate::context::EventContext;
use crate::error::RouterError;
use crate::handler::HandlerTable;
use crate::sink::{LogSink, NotificationSink, SharedSink, accept, reject};
use crate::tracer::{Tracer, header_fields};

/// Handlers receive the context and the full decoded envelope.
pub type EventHandlers = HandlerTable<EventContext, EventTriggerPayload>;

/// Routes event trigger webhooks to registered handlers.
pub struct EventRouter {
    handlers: EventHandlers,
    sink: SharedSink<EventContext>,
    debug: bool,
}

impl EventRouter {
    pub fn new(handlers: EventHandlers) -> Result<Self, RouterError> {
        if handlers.is_empty() {
            return Err(RouterError::NoHandlers { kind: "event" });
        }

        Ok(Self {
            handlers,
            sink: Arc::new(LogSink),
            debug: false,
        })
    }

    /// In debug mode the old and new row images are recorded as trace fields.
    /// They may contain user data; do not enable in production logging.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_sink(mut self, sink: impl NotificationSink<EventContext> + 'static) -> Self {
        self.sink = Arc::new(sink);
        self
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn handlers(&self) -> &EventHandlers {
        &self.handlers
    }

    async fn route(
        &self,
        ctx: &EventContext,
        payload: EventTriggerPayload,
    ) -> Result<Vec<u8>, HasuraError> {
        let name = payload.trigger.name.as_str();
        let handler = self
            .handlers
            .get(name)
            .ok_or_else(|| HasuraError::bad_request(format!("unknown event {name}")))?;

        debug!(trigger = %name, op = %payload.event.op, "Dispatching event");
        handler(ctx.clone(), payload).await
    }
}

impl Webhook for EventRouter {
    async fn serve(&self, headers: HeaderMap, body: Bytes) -> WebhookResponse {
        let tracer = Tracer::new(request_id(&headers));
        tracer
            .with_field("type", "event-trigger")
            .with_field("http_headers", header_fields(&headers));

        let mut ctx = EventContext {
            headers,
            session_variables: SessionVariables::new(),
            tracer: tracer.clone(),
        };

        let payload: EventTriggerPayload = match serde_json::from_slice(&body) {
            Ok(payload) => payload,
            Err(e) => {
                let err = HasuraError::bad_request(format!("json body could not be decoded: {e}"));
                return reject(self.sink.as_ref(), &ctx, &tracer, err);
            }
        };

        if !payload.id.is_empty() {
            tracer.set_request_id(payload.id.as_str());
        }
        tracer
            .with_field("event_name", payload.trigger.name.as_str())
            .with_field("op", payload.event.op.as_str())
            .with_json("session_variables", &payload.event.session_variables)
            .with_field("table_schema", payload.table.schema.as_str())
            .with_field("table_name", payload.table.name.as_str())
            .with_field("created_at", payload.created_at.as_str())
            .with_field("max_retries", payload.delivery_info.max_retries)
            .with_field("current_retry", payload.delivery_info.current_retry);
        if let Some(trace) = &payload.event.trace_context {
            tracer.with_field("trace_id", trace.trace_id.as_str());
        }
        if self.debug {
            tracer
                .with_field("data_old", payload.event.data.old.get())
                .with_field("data_new", payload.event.data.new.get());
        }

        ctx.session_variables = payload.event.session_variables.clone();

        if let Err(err) = ctx.session_variables.require_role() {
            return reject(self.sink.as_ref(), &ctx, &tracer, err);
        }

        match self.route(&ctx, payload).await {
            Ok(body) => accept(self.sink.as_ref(), &ctx, &tracer, body),
            Err(err) => reject(self.sink.as_ref(), &ctx, &tracer, err),
        }
    }
}

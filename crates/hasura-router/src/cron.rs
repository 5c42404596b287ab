//! Cron trigger router — dispatches scheduled events by `name`.
//!
//! Cron calls are system-originated, so no role is required. Every lookup or
//! execution failure is reported to the engine as `bad_request`; the sink
//! still receives the original error with its own code.

use std::sync::Arc;

use axum::body::Bytes;
use axum::http::HeaderMap;
use hasura_protocol::{CronPayload, HasuraError, SessionVariables};
use hasura_transport::{Webhook, WebhookResponse, request_id};
use tracing::debug;

use crate::context::CronContext;
use crate::error::RouterError;
use crate::handler::HandlerTable;
use crate::sink::{LogSink, NotificationSink, SharedSink, accept, reject};
use crate::tracer::{Tracer, header_fields};

/// Handlers receive the context and the full decoded envelope.
pub type CronHandlers = HandlerTable<CronContext, CronPayload>;

/// Routes cron trigger webhooks to registered handlers.
pub struct CronRouter {
    handlers: CronHandlers,
    sink: SharedSink<CronContext>,
    debug: bool,
}

impl CronRouter {
    pub fn new(handlers: CronHandlers) -> Result<Self, RouterError> {
        if handlers.is_empty() {
            return Err(RouterError::NoHandlers { kind: "cron" });
        }

        Ok(Self {
            handlers,
            sink: Arc::new(LogSink),
            debug: false,
        })
    }

    /// In debug mode the trigger `payload` is recorded as a trace field.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_sink(mut self, sink: impl NotificationSink<CronContext> + 'static) -> Self {
        self.sink = Arc::new(sink);
        self
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn handlers(&self) -> &CronHandlers {
        &self.handlers
    }

    async fn route(&self, ctx: &CronContext, payload: CronPayload) -> Result<Vec<u8>, HasuraError> {
        let name = payload.name.as_str();
        let handler = self
            .handlers
            .get(name)
            .ok_or_else(|| HasuraError::bad_request(format!("unknown event {name}")))?;

        debug!(trigger = %name, "Dispatching cron event");
        handler(ctx.clone(), payload).await
    }
}

impl Webhook for CronRouter {
    async fn serve(&self, headers: HeaderMap, body: Bytes) -> WebhookResponse {
        let tracer = Tracer::new(request_id(&headers));
        tracer
            .with_field("type", "cron-trigger")
            .with_field("http_headers", header_fields(&headers));

        let ctx = CronContext {
            session_variables: SessionVariables::from_headers(&headers),
            headers,
            tracer: tracer.clone(),
        };

        let payload: CronPayload = match serde_json::from_slice(&body) {
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
            .with_field("event_name", payload.name.as_str())
            .with_field("scheduled_time", payload.scheduled_time.to_rfc3339());
        if let Some(comment) = &payload.comment {
            tracer.with_field("comment", comment.as_str());
        }
        if self.debug {
            tracer.with_field("payload", payload.payload.get());
        }

        match self.route(&ctx, payload).await {
            Ok(body) => accept(self.sink.as_ref(), &ctx, &tracer, body),
            Err(err) => {
                self.sink.on_error(&ctx, &err, tracer.values());
                WebhookResponse::error(&HasuraError::bad_request(format!(
                    "error in executing event: {}",
                    err.message()
                )))
            }
        }
    }
}

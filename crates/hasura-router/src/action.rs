//! Action router — dispatches custom action webhooks by `action.name`.

use std::sync::Arc;

use axum::body::Bytes;
use axum::http::HeaderMap;
use hasura_protocol::{ActionPayload, HasuraError, SessionVariables};
use hasura_transport::{Webhook, WebhookResponse, request_id};
use serde_json::value::RawValue;
use tracing::debug;

use crate::context::ActionContext;
use crate::error::RouterError;
use crate::handler::HandlerTable;
use crate::sink::{LogSink, NotificationSink, SharedSink, accept, reject};
use crate::tracer::{Tracer, header_fields};

/// Handlers receive the context and the action's `input` exactly as the
/// engine sent it. Decode it with `serde_json::from_str(input.get())`.
pub type ActionHandlers = HandlerTable<ActionContext, Box<RawValue>>;

/// Routes action webhooks to registered handlers.
///
/// The handler table, sink and debug flag are fixed at construction; share
/// the router behind an `Arc` to serve concurrent requests.
pub struct ActionRouter {
    handlers: ActionHandlers,
    sink: SharedSink<ActionContext>,
    debug: bool,
}

impl ActionRouter {
    pub fn new(handlers: ActionHandlers) -> Result<Self, RouterError> {
        if handlers.is_empty() {
            return Err(RouterError::NoHandlers { kind: "action" });
        }

        Ok(Self {
            handlers,
            sink: Arc::new(LogSink),
            debug: false,
        })
    }

    /// In debug mode the raw `input` is recorded as a trace field.
    /// It may contain user data; do not enable in production logging.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_sink(mut self, sink: impl NotificationSink<ActionContext> + 'static) -> Self {
        self.sink = Arc::new(sink);
        self
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn handlers(&self) -> &ActionHandlers {
        &self.handlers
    }

    async fn route(
        &self,
        ctx: &ActionContext,
        name: &str,
        input: Box<RawValue>,
    ) -> Result<Vec<u8>, HasuraError> {
        let handler = self
            .handlers
            .get(name)
            .ok_or_else(|| HasuraError::not_found(format!("unknown action {name}")))?;

        debug!(action = %name, "Dispatching action");
        handler(ctx.clone(), input).await
    }
}

impl Webhook for ActionRouter {
    async fn serve(&self, headers: HeaderMap, body: Bytes) -> WebhookResponse {
        let tracer = Tracer::new(request_id(&headers));
        tracer
            .with_field("type", "action")
            .with_field("http_headers", header_fields(&headers));

        let mut ctx = ActionContext {
            headers,
            session_variables: SessionVariables::new(),
            tracer: tracer.clone(),
            request_query: String::new(),
        };

        let payload: ActionPayload = match serde_json::from_slice(&body) {
            Ok(payload) => payload,
            Err(e) => {
                let err = HasuraError::bad_request(format!("json body could not be decoded: {e}"));
                return reject(self.sink.as_ref(), &ctx, &tracer, err);
            }
        };

        tracer
            .with_field("action", payload.action.name.as_str())
            .with_json("session_variables", &payload.session_variables)
            .with_field("request_query", payload.request_query.as_str());
        if self.debug {
            tracer.with_field("input", payload.input.get());
        }

        ctx.request_query = payload.request_query;
        ctx.session_variables = payload.session_variables;

        if let Err(err) = ctx.session_variables.require_role() {
            return reject(self.sink.as_ref(), &ctx, &tracer, err);
        }

        match self.route(&ctx, &payload.action.name, payload.input).await {
            Ok(body) => accept(self.sink.as_ref(), &ctx, &tracer, body),
            Err(err) => reject(self.sink.as_ref(), &ctx, &tracer, err),
        }
    }
}

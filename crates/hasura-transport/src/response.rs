//! Webhook response shaping.
//!
//! Every webhook reply is JSON: `200` with the handler's encoded result, or
//! `400` with a `{code, message, extensions?}` body. The status never varies
//! by error kind; the engine reads the code from the body.

use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use hasura_protocol::{HasuraError, Headers};

/// A fully-shaped reply to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookResponse {
    status: StatusCode,
    body: Bytes,
}

impl WebhookResponse {
    /// `200` with an already-encoded JSON body.
    pub fn ok(body: impl Into<Bytes>) -> Self {
        Self {
            status: StatusCode::OK,
            body: body.into(),
        }
    }

    /// `400` with the error body.
    pub fn error(err: &HasuraError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: Bytes::from(err.to_body()),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

impl IntoResponse for WebhookResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            self.body,
        )
            .into_response()
    }
}

/// The caller-supplied `x-request-id`, if present and non-empty.
pub fn request_id(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(Headers::X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}

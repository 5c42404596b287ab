//! Webhook error taxonomy and the `{code, message, extensions}` error body.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Error codes understood by the Hasura engine, plus application codes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HasuraErrorCode {
    // Router errors
    BadRequest,
    NotFound,
    Internal,
    Unauthorized,

    // Fallback for handler errors outside the taxonomy
    Unknown,

    // Application-defined code (e.g. "action_failure")
    Custom(String),
}

impl HasuraErrorCode {
    pub fn as_str(&self) -> &str {
        match self {
            Self::BadRequest => "bad_request",
            Self::NotFound => "not_found",
            Self::Internal => "internal_error",
            Self::Unauthorized => "unauthorized",
            Self::Unknown => "unknown",
            Self::Custom(c) => c,
        }
    }

    pub fn from_code(code: &str) -> Self {
        match code {
            "bad_request" => Self::BadRequest,
            "not_found" => Self::NotFound,
            "internal_error" => Self::Internal,
            "unauthorized" => Self::Unauthorized,
            "unknown" => Self::Unknown,
            c => Self::Custom(c.to_string()),
        }
    }
}

impl fmt::Display for HasuraErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned to the Hasura engine.
///
/// Serializes as `{"code": ..., "message": ...}`; `extensions` is only
/// emitted when it holds at least one entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HasuraError {
    code: String,
    message: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    extensions: Map<String, Value>,
}

impl HasuraError {
    pub fn new(code: HasuraErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.as_str().to_string(),
            message: message.into(),
            extensions: Map::new(),
        }
    }

    /// Attach a diagnostic entry to `extensions`.
    pub fn with_extension(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extensions.insert(key.into(), value);
        self
    }

    pub fn with_extensions(mut self, extensions: Map<String, Value>) -> Self {
        self.extensions.extend(extensions);
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(HasuraErrorCode::BadRequest, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(HasuraErrorCode::NotFound, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(HasuraErrorCode::Internal, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(HasuraErrorCode::Unauthorized, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(HasuraErrorCode::Unknown, message)
    }

    /// Normalize an error raised by a handler.
    ///
    /// A `HasuraError`, bare or wrapped in `anyhow` context, is returned as-is;
    /// anything else becomes an `unknown` error carrying the full message chain.
    pub fn from_handler(err: anyhow::Error) -> Self {
        match err.downcast::<HasuraError>() {
            Ok(err) => err,
            Err(other) => Self::unknown(format!("{other:#}")),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn error_code(&self) -> HasuraErrorCode {
        HasuraErrorCode::from_code(&self.code)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn extensions(&self) -> &Map<String, Value> {
        &self.extensions
    }

    /// Serialize to the JSON error body.
    pub fn to_body(&self) -> Vec<u8> {
        match serde_json::to_vec(self) {
            Ok(bytes) => bytes,
            Err(e) => serde_json::json!({ "message": format!("ERROR: {e}") })
                .to_string()
                .into_bytes(),
        }
    }
}

impl fmt::Display for HasuraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.code.is_empty() {
            return f.write_str(&self.message);
        }
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for HasuraError {}

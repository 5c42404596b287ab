//! Per-request trace field accumulator.
//!
//! Each request owns exactly one [`Tracer`]. Clones are handles onto the same
//! field set, so a handler that adds fields through its context's tracer is
//! visible to the router's success/error notification. `with_field` mutates in
//! place and returns `&Self` for chaining; it never produces a copy.

use std::sync::Arc;
use std::time::Instant;

use axum::http::HeaderMap;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::{Map, Value, json};

#[derive(Debug)]
struct TracerState {
    request_id: String,
    fields: Map<String, Value>,
}

/// Structured key/value fields collected while handling one request.
#[derive(Debug, Clone)]
pub struct Tracer {
    state: Arc<Mutex<TracerState>>,
    started: Instant,
    started_at: DateTime<Utc>,
}

impl Tracer {
    /// Start a tracer. A missing or empty `request_id` is replaced by a fresh UUID v4.
    pub fn new(request_id: Option<&str>) -> Self {
        let request_id = match request_id {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => uuid::Uuid::new_v4().to_string(),
        };

        Self {
            state: Arc::new(Mutex::new(TracerState {
                request_id,
                fields: Map::new(),
            })),
            started: Instant::now(),
            started_at: Utc::now(),
        }
    }

    pub fn request_id(&self) -> String {
        self.state.lock().request_id.clone()
    }

    pub fn set_request_id(&self, request_id: impl Into<String>) {
        self.state.lock().request_id = request_id.into();
    }

    pub fn with_field(&self, key: impl Into<String>, value: impl Into<Value>) -> &Self {
        self.state.lock().fields.insert(key.into(), value.into());
        self
    }

    /// Record any serializable value; values that fail to serialize are stored as `null`.
    pub fn with_json<T: Serialize + ?Sized>(&self, key: impl Into<String>, value: &T) -> &Self {
        let value = serde_json::to_value(value).unwrap_or(Value::Null);
        self.with_field(key, value)
    }

    pub fn with_fields<I, K>(&self, fields: I) -> &Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let mut state = self.state.lock();
        for (key, value) in fields {
            state.fields.insert(key.into(), value);
        }
        drop(state);
        self
    }

    /// Milliseconds since the tracer was created.
    pub fn elapsed_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }

    /// Snapshot of all fields plus `request_id` and a `measurement` block
    /// (`start`, `end`, `total_time` in milliseconds) computed at call time.
    pub fn values(&self) -> Map<String, Value> {
        let elapsed = self.started.elapsed();
        let end = self.started_at
            + chrono::Duration::from_std(elapsed).unwrap_or_else(|_| chrono::Duration::zero());

        let state = self.state.lock();
        let mut values = state.fields.clone();
        values.insert("request_id".into(), Value::String(state.request_id.clone()));
        values.insert(
            "measurement".into(),
            json!({
                "start": self.started_at.to_rfc3339(),
                "end": end.to_rfc3339(),
                "total_time": elapsed.as_secs_f64() * 1000.0,
            }),
        );
        values
    }
}

/// HTTP headers as a `name -> [values]` JSON object, for the `http_headers` field.
pub fn header_fields(headers: &HeaderMap) -> Value {
    let mut fields = Map::new();
    for name in headers.keys() {
        let values: Vec<Value> = headers
            .get_all(name)
            .iter()
            .map(|v| Value::String(String::from_utf8_lossy(v.as_bytes()).into_owned()))
            .collect();
        fields.insert(name.as_str().to_string(), Value::Array(values));
    }
    Value::Object(fields)
}

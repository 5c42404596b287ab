//! Event trigger webhook envelope.
//!
//! See <https://hasura.io/docs/latest/event-triggers/payload/>.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::session::SessionVariables;

/// Operation that fired the trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OpName {
    Insert,
    Update,
    Delete,
    Manual,
}

impl OpName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Manual => "MANUAL",
        }
    }
}

impl fmt::Display for OpName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Row images before and after the change, kept as the raw JSON the engine
/// sent. Either side may be `null`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventData {
    #[serde(default = "crate::raw_null")]
    pub old: Box<RawValue>,
    #[serde(default = "crate::raw_null")]
    pub new: Box<RawValue>,
}

impl Default for EventData {
    fn default() -> Self {
        Self {
            old: crate::raw_null(),
            new: crate::raw_null(),
        }
    }
}

/// W3C-style trace context the engine attaches when tracing is enabled.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraceContext {
    #[serde(default)]
    pub trace_id: String,
    #[serde(default)]
    pub span_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub session_variables: SessionVariables,
    pub op: OpName,
    #[serde(default)]
    pub data: EventData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_context: Option<TraceContext>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TriggerInfo {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventTable {
    pub schema: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DeliveryInfo {
    #[serde(default)]
    pub max_retries: u32,
    #[serde(default)]
    pub current_retry: u32,
}

/// Request body posted for a database event trigger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventTriggerPayload {
    pub event: Event,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub id: String,
    pub trigger: TriggerInfo,
    #[serde(default)]
    pub table: EventTable,
    #[serde(default)]
    pub delivery_info: DeliveryInfo,
}

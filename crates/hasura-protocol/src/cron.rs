//! Scheduled (cron) trigger webhook envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

/// Request body posted for a cron or one-off scheduled event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CronPayload {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub scheduled_time: DateTime<Utc>,
    /// Payload configured on the trigger, forwarded byte for byte.
    #[serde(default = "crate::raw_null")]
    pub payload: Box<RawValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

//! Hasura webhook protocol types.
//!
//! Wire envelopes for the three webhook kinds the engine sends (actions,
//! event triggers, cron triggers), the case-insensitive session variable map,
//! and the `{code, message, extensions}` error taxonomy returned to the engine.

pub mod action;
pub mod cron;
pub mod error;
pub mod event;
pub mod headers;
pub mod session;

pub use action::{ActionInfo, ActionPayload};
pub use cron::CronPayload;
pub use error::{HasuraError, HasuraErrorCode};
pub use event::{
    DeliveryInfo, Event, EventData, EventTable, EventTriggerPayload, OpName, TraceContext,
    TriggerInfo,
};
pub use headers::{Headers, ROLE_ADMIN};
pub use session::SessionVariables;

/// A raw JSON `null`, used when an opaque field is absent from the body.
pub(crate) fn raw_null() -> Box<serde_json::value::RawValue> {
    serde_json::value::RawValue::NULL.to_owned()
}

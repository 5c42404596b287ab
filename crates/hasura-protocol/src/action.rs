//! Action webhook envelope.
//!
//! See <https://hasura.io/docs/latest/actions/action-handlers/> for the
//! payload the engine posts to an action handler.

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::session::SessionVariables;

/// Action name block of the request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionInfo {
    pub name: String,
}

/// Request body posted for a custom action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionPayload {
    pub action: ActionInfo,
    /// Action arguments, forwarded to the handler byte for byte.
    #[serde(default = "crate::raw_null")]
    pub input: Box<RawValue>,
    #[serde(default)]
    pub session_variables: SessionVariables,
    /// The GraphQL query the client sent.
    #[serde(default)]
    pub request_query: String,
}

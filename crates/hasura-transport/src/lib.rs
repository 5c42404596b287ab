//! Hasura Webhook Transport Layer
//!
//! Provides the HTTP surface for the webhook routers. The transport handles:
//! - Mounting a router at a path, for any HTTP method
//! - Shaping replies (`200` JSON result, `400` JSON error body)
//! - Request ID extraction
//! - Server lifecycle (bind, `/health`, graceful stop)
//!
//! The transport is decoupled from routing logic via the `Webhook` trait.

pub mod response;
pub mod server;

pub use response::{WebhookResponse, request_id};
pub use server::{ServerConfig, TransportError, Webhook, WebhookServer, mount, webhook_route};

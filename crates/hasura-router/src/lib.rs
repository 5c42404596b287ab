//! Hasura webhook routers.
//!
//! Three routers share one shape: an immutable name → handler table, a
//! [`NotificationSink`] for success/error reporting, and a debug flag.
//!
//! | Router | Routing key | Role required |
//! |--------|-------------|---------------|
//! | [`ActionRouter`] | `action.name` | yes |
//! | [`EventRouter`] | `trigger.name` | yes |
//! | [`CronRouter`] | `name` | no |
//!
//! Each router implements [`hasura_transport::Webhook`], so it can be mounted
//! on any path with [`hasura_transport::mount`].

pub mod action;
pub mod context;
pub mod cron;
pub mod error;
pub mod event;
pub mod handler;
pub mod sink;
pub mod tracer;

pub use action::{ActionHandlers, ActionRouter};
pub use context::{ActionContext, CronContext, EventContext};
pub use cron::{CronHandlers, CronRouter};
pub use error::RouterError;
pub use event::{EventHandlers, EventRouter};
pub use handler::{BoxedHandler, HandlerFuture, HandlerTable};
pub use sink::{LogSink, NotificationSink, SharedSink};
pub use tracer::{Tracer, header_fields};

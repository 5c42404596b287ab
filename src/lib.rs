//! Demo webhook server for the Hasura routers.
//!
//! The handlers in [`demo`] exercise every path of the three routers and are
//! used both by the `hasura-router-server` binary and the end-to-end tests.

pub mod demo;

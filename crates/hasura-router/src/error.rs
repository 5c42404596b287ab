//! Router construction errors.

/// Errors raised while building a router.
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    #[error("there should be at least one {kind} handler")]
    NoHandlers { kind: &'static str },
}

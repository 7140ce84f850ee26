//! Error types for eon-policy.

use thiserror::Error;

/// Errors raised while resolving policy configuration.  Routing blocks are
/// outcomes, not errors — see [`Outcome`](crate::Outcome).
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("unknown routing policy '{0}'")]
    UnknownPolicy(String),
}

pub type PolicyResult<T> = Result<T, PolicyError>;

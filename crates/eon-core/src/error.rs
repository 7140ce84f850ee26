//! Framework error type.
//!
//! Sub-crates define their own error enums and convert into `EonError` via
//! `From` impls where they cross the scheduler boundary.  Routing blocks are
//! never errors — they are recorded outcomes; only configuration mistakes
//! and invariant violations surface here.

use thiserror::Error;

use crate::{LinkId, NodeId};

/// The top-level error type for `eon-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum EonError {
    #[error("{0} not found")]
    NodeNotFound(NodeId),

    #[error("{0} not found")]
    LinkNotFound(LinkId),

    #[error("configuration error: {0}")]
    Config(String),

    /// A broken internal invariant (e.g. releasing slots that were free).
    /// The simulator aborts rather than produce untrusted metrics.
    #[error("invariant violated: {0}")]
    Invariant(String),
}

/// Shorthand result type for all `eon-*` crates.
pub type EonResult<T> = Result<T, EonError>;

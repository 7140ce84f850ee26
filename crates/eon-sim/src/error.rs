//! Error types for eon-sim.

use eon_core::EonError;
use eon_disaster::DisasterError;
use eon_policy::PolicyError;
use thiserror::Error;

/// Fatal errors of a simulation run.  Routing blocks and disruptions never
/// appear here — they are recorded outcomes.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("scenario configuration error: {0}")]
    Config(String),

    #[error("policy configuration: {0}")]
    Policy(#[from] PolicyError),

    #[error("disaster configuration: {0}")]
    Disaster(#[from] DisasterError),

    /// Invariant violations bubbling up from the spectrum grid.
    #[error("{0}")]
    Core(#[from] EonError),
}

pub type SimResult<T> = Result<T, SimError>;

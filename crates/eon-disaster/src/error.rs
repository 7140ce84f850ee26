//! Error types for eon-disaster.

use eon_core::{NodeId, SimTime};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DisasterError {
    #[error("disaster epicenter {0} is outside the graph")]
    EpicenterNotFound(NodeId),

    #[error("disaster interval ends before it starts ({start} > {end})")]
    BadInterval { start: SimTime, end: SimTime },
}

pub type DisasterResult<T> = Result<T, DisasterError>;

//! Per-request lifecycle record.

use eon_core::{Demand, SimTime};
use eon_net::{Path, Window};
use eon_policy::BlockReason;

/// The spectrum a request currently holds.
#[derive(Clone, Debug)]
pub struct Allocation {
    pub path:   Path,
    pub window: Window,
}

/// Lifecycle state of a request.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum RequestStatus {
    /// Created but not yet routed (transient within the arrival handler).
    Pending,
    /// Admitted and holding spectrum.
    Active,
    /// Survived a disruption: re-routed onto a fresh allocation.
    Rerouted,
    /// Departed normally; spectrum released.
    Completed,
    /// Admission failed with the recorded reason.
    Blocked(BlockReason),
    /// Lost its allocation to the disaster and could not be re-routed
    /// (a blocking subtype).
    Disrupted,
}

impl RequestStatus {
    /// `true` while the request holds spectrum.
    #[inline]
    pub fn is_active(self) -> bool {
        matches!(self, RequestStatus::Active | RequestStatus::Rerouted)
    }

    /// `true` once the request can never change state again.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RequestStatus::Completed | RequestStatus::Blocked(_) | RequestStatus::Disrupted
        )
    }
}

/// The immutable demand plus its mutable allocation record.
#[derive(Clone, Debug)]
pub struct Request {
    pub demand:      Demand,
    pub status:      RequestStatus,
    pub alloc:       Option<Allocation>,
    pub admitted_at: Option<SimTime>,
    /// Departure instant (`admitted_at + holding`); `NEVER` until admission
    /// or for infinite holding times.  A reroute keeps the original value.
    pub ends_at:     SimTime,
    pub released_at: Option<SimTime>,
    /// Bumped on every disruption.  Departure events carry the epoch they
    /// were scheduled under; a stale epoch means the event was cancelled.
    pub epoch:       u32,
}

impl Request {
    pub fn new(demand: Demand) -> Self {
        Self {
            demand,
            status:      RequestStatus::Pending,
            alloc:       None,
            admitted_at: None,
            ends_at:     SimTime::NEVER,
            released_at: None,
            epoch:       0,
        }
    }
}

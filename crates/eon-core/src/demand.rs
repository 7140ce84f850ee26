//! The immutable half of a request: what is being asked for.
//!
//! The mutable allocation record (path, window, status) lives with the
//! scheduler in `eon-sim`; routing policies only ever see a `Demand`.

use crate::{IspId, NodeId, RequestId};

/// Service class of a demand.
///
/// Migration-class demands are the datacenter evacuation transfers started
/// by an ISP when it reacts to the disaster; disaster-aware admission
/// control shields their future spectrum.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrafficClass {
    /// Ordinary bandwidth request between two nodes.
    #[default]
    Datapath,
    /// Datacenter evacuation transfer (long-lived, high slot demand).
    Migration,
}

impl TrafficClass {
    /// Human-readable label, useful for CSV column values.
    pub fn as_str(self) -> &'static str {
        match self {
            TrafficClass::Datapath  => "datapath",
            TrafficClass::Migration => "migration",
        }
    }
}

impl std::fmt::Display for TrafficClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable bandwidth demand.
///
/// `holding_micros` is a duration; `u64::MAX` means the request never
/// departs on its own (used by saturation tests).
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Demand {
    pub id:            RequestId,
    pub src:           NodeId,
    pub dst:           NodeId,
    /// Contiguous spectrum slots required on every link of the path.
    pub width:         u16,
    /// Holding time in microseconds; `u64::MAX` = infinite.
    pub holding_micros: u64,
    pub class:         TrafficClass,
    /// The ISP owning this demand for its entire lifetime.
    pub isp:           IspId,
}

impl Demand {
    #[inline]
    pub fn is_migration(&self) -> bool {
        self.class == TrafficClass::Migration
    }
}

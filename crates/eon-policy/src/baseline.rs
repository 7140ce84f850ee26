//! Baseline (disaster-oblivious) policy variants.

use eon_core::Demand;
use eon_net::{SlotRange, Topology};

use crate::fit::{all_paths, fit_and_allocate, member_paths, Fit};
use crate::outcome::{BlockReason, Outcome};
use crate::policy::RoutingPolicy;
use crate::registry::PolicyId;

/// Full-grid zone for the current topology.
#[inline]
pub(crate) fn full_zone(topo: &Topology) -> SlotRange {
    SlotRange::full(topo.slots_per_link())
}

// ── FirstFit ──────────────────────────────────────────────────────────────────

/// Catalogue order, lowest-index window.  The deterministic baseline every
/// other variant is compared against.
pub struct FirstFit;

impl RoutingPolicy for FirstFit {
    fn id(&self) -> PolicyId {
        PolicyId::FirstFit
    }

    fn route(&self, demand: &Demand, topo: &mut Topology) -> Outcome {
        let paths = all_paths(topo, demand);
        let zone = full_zone(topo);
        fit_and_allocate(demand, topo, &paths, zone, Fit::First, BlockReason::NoPath)
    }
}

// ── BestFit ───────────────────────────────────────────────────────────────────

/// Catalogue order, tightest adequate free run per path.
pub struct BestFit;

impl RoutingPolicy for BestFit {
    fn id(&self) -> PolicyId {
        PolicyId::BestFit
    }

    fn route(&self, demand: &Demand, topo: &mut Topology) -> Outcome {
        let paths = all_paths(topo, demand);
        let zone = full_zone(topo);
        fit_and_allocate(demand, topo, &paths, zone, Fit::Best, BlockReason::NoPath)
    }
}

// ── SlidingWindow ─────────────────────────────────────────────────────────────

/// Static spectrum isolation: first-fit restricted to the owning ISP's slot
/// zone.  Paths range over the whole graph.
pub struct SlidingWindow {
    pub(crate) zone: SlotRange,
}

impl RoutingPolicy for SlidingWindow {
    fn id(&self) -> PolicyId {
        PolicyId::SlidingWindow
    }

    fn route(&self, demand: &Demand, topo: &mut Topology) -> Outcome {
        let paths = all_paths(topo, demand);
        fit_and_allocate(demand, topo, &paths, self.zone, Fit::First, BlockReason::NoPath)
    }
}

// ── Subnet ────────────────────────────────────────────────────────────────────

/// Graph + spectrum isolation: an intra-ISP demand (src and dst both
/// members) is first-fit within the ISP's subgraph and zone; cross-ISP
/// demands fall through to plain first-fit over the whole graph and grid.
pub struct Subnet {
    pub(crate) zone:    SlotRange,
    /// Node-count-sized membership mask of the owning ISP.
    pub(crate) members: Vec<bool>,
}

impl Subnet {
    #[inline]
    pub(crate) fn is_intra(&self, demand: &Demand) -> bool {
        self.members[demand.src.index()] && self.members[demand.dst.index()]
    }
}

impl RoutingPolicy for Subnet {
    fn id(&self) -> PolicyId {
        PolicyId::Subnet
    }

    fn route(&self, demand: &Demand, topo: &mut Topology) -> Outcome {
        if self.is_intra(demand) {
            let paths = member_paths(topo, demand, &self.members);
            fit_and_allocate(demand, topo, &paths, self.zone, Fit::First, BlockReason::NoPath)
        } else {
            FirstFit.route(demand, topo)
        }
    }
}

//! The ISP: a routing domain with a policy pair and a one-way reaction
//! state machine.

use eon_core::{IspId, NodeId};
use eon_net::Topology;
use eon_policy::RoutingPolicy;

/// Reaction state.  `Normal → Reacted` exactly once per run; there is no
/// way back.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum IspPhase {
    Normal,
    Reacted,
}

/// One Internet Service Provider.
///
/// Membership is immutable after construction and member sets of distinct
/// ISPs partition the node set (enforced by the scenario validator).  The
/// current policy is a single swapped field — the policies themselves never
/// know which ISP holds them.
pub struct Isp {
    id:                    IspId,
    /// Member nodes, ascending (deterministic iteration).
    members:               Vec<NodeId>,
    datacenter:            NodeId,
    reaction_delay_micros: u64,
    normal:                Box<dyn RoutingPolicy>,
    disaster:              Box<dyn RoutingPolicy>,
    phase:                 IspPhase,
    migration_width:       u16,
    migration_gbits:       f64,
}

impl Isp {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id:                    IspId,
        mut members:           Vec<NodeId>,
        datacenter:            NodeId,
        reaction_delay_micros: u64,
        normal:                Box<dyn RoutingPolicy>,
        disaster:              Box<dyn RoutingPolicy>,
        migration_width:       u16,
        migration_gbits:       f64,
    ) -> Self {
        members.sort_unstable();
        Self {
            id,
            members,
            datacenter,
            reaction_delay_micros,
            normal,
            disaster,
            phase: IspPhase::Normal,
            migration_width,
            migration_gbits,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> IspId {
        self.id
    }

    #[inline]
    pub fn members(&self) -> &[NodeId] {
        &self.members
    }

    #[inline]
    pub fn datacenter(&self) -> NodeId {
        self.datacenter
    }

    #[inline]
    pub fn reaction_delay_micros(&self) -> u64 {
        self.reaction_delay_micros
    }

    #[inline]
    pub fn phase(&self) -> IspPhase {
        self.phase
    }

    #[inline]
    pub fn migration_width(&self) -> u16 {
        self.migration_width
    }

    #[inline]
    pub fn migration_gbits(&self) -> f64 {
        self.migration_gbits
    }

    /// The policy currently answering `route`/`reroute` for this ISP.
    pub fn active_policy(&self) -> &dyn RoutingPolicy {
        match self.phase {
            IspPhase::Normal  => self.normal.as_ref(),
            IspPhase::Reacted => self.disaster.as_ref(),
        }
    }

    /// Switch to the disaster policy.  Monotonic: calling again is a no-op.
    pub fn react(&mut self) {
        self.phase = IspPhase::Reacted;
    }

    /// The migration destination: the member node at maximum catalogued
    /// graph distance from `epicenter`.
    ///
    /// A member unreachable from the epicenter counts as infinitely far
    /// (it is the safest place available); ties resolve to the lowest node
    /// id.  The datacenter itself is excluded — an ISP whose only member is
    /// its datacenter gets `None` and starts no migration.
    pub fn migration_destination(&self, topo: &Topology, epicenter: NodeId) -> Option<NodeId> {
        let mut best: Option<(u64, NodeId)> = None;
        for &v in &self.members {
            if v == self.datacenter {
                continue;
            }
            let d = topo.graph_distance(epicenter, v).unwrap_or(u64::MAX);
            // Strict > with ascending members keeps the lowest id on ties.
            if best.map_or(true, |(bd, _)| d > bd) {
                best = Some((d, v));
            }
        }
        best.map(|(_, v)| v)
    }
}

//! The `RoutingPolicy` trait — the seam between the scheduler and the
//! routing strategies.
//!
//! The scheduler holds policies as `Box<dyn RoutingPolicy>` and swaps the
//! active one when an ISP reacts to the disaster.  Policies are stateless
//! apart from their construction parameters (zone, member mask, θ); the
//! only mutable state is the admission-refusal tally of the
//! migration-shielding variant, drained through
//! [`take_refusals`](RoutingPolicy::take_refusals).

use eon_core::Demand;
use eon_net::Topology;

use crate::outcome::Outcome;
use crate::registry::PolicyId;

/// A routing-and-spectrum-assignment strategy.
///
/// Every implementation honors spectrum continuity (one window, identical
/// on every link of the path) and returns the FIRST acceptable result under
/// its own candidate ordering.  `Topology::try_allocate` is the sole
/// admission gate: a returned `Accepted` means the grid already holds the
/// allocation.
pub trait RoutingPolicy: Send {
    /// The identifier this policy was built from (for logs and snapshots).
    fn id(&self) -> PolicyId;

    /// Route a fresh demand.
    fn route(&self, demand: &Demand, topo: &mut Topology) -> Outcome;

    /// Re-route a demand whose allocation was lost to the disaster.
    ///
    /// The caller MUST have released the old allocation first.  The default
    /// is the same search as [`route`](Self::route).
    fn reroute(&self, demand: &Demand, topo: &mut Topology) -> Outcome {
        self.route(demand, topo)
    }

    /// Drain the count of admission-control candidate refusals since the
    /// last call.  Zero for every policy without admission control.
    fn take_refusals(&self) -> u64 {
        0
    }
}

//! Failure-timeline generation and progressive application.
//!
//! # Contract
//!
//! The timeline is computed ONCE at construction from the disaster seed:
//! victims are every node within the damage radius of the epicenter plus
//! every link touching one, each with a failure time drawn uniformly inside
//! the disaster interval.  The sorted timeline is immutable afterwards, so
//! replays of the same scenario yield identical disruption sequences.
//!
//! Applying failures is separated from generating them:
//! [`announce`](Disaster::announce) publishes the whole schedule at t₀
//! (disaster-aware policies start routing around doomed resources), while
//! [`advance`](Disaster::advance) marks due physical failures on the
//! topology and returns them; identifying disrupted requests and driving
//! re-routes is the scheduler's job.

use eon_core::{LinkId, NodeId, SimRng, SimTime};
use eon_net::{FiberGraph, Topology};

use crate::error::{DisasterError, DisasterResult};

// ── Spec and resources ────────────────────────────────────────────────────────

/// The disaster descriptor handed in by the scenario.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DisasterSpec {
    pub epicenter: NodeId,
    /// Damage radius around the epicenter, metres.
    pub radius_m:  f32,
    /// First possible failure instant (t₀).
    pub start:     SimTime,
    /// Last possible failure instant (t₁).
    pub end:       SimTime,
    /// Seed of the failure schedule; independent of the traffic seed.
    pub seed:      u64,
}

/// A resource taken down by the disaster.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum ResourceFailure {
    Node(NodeId),
    Link(LinkId),
}

impl std::fmt::Display for ResourceFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceFailure::Node(n) => write!(f, "node {}", n.0),
            ResourceFailure::Link(l) => write!(f, "link {}", l.0),
        }
    }
}

/// One timeline entry: `resource` fails at `at`.
#[derive(Copy, Clone, Debug)]
pub struct FailureEvent {
    pub at:       SimTime,
    pub resource: ResourceFailure,
}

// ── Disaster ──────────────────────────────────────────────────────────────────

/// The materialized disaster: an immutable, time-sorted failure timeline
/// plus a cursor over what has been applied so far.
#[derive(Debug)]
pub struct Disaster {
    spec:      DisasterSpec,
    timeline:  Vec<FailureEvent>,
    applied:   usize,
    announced: bool,
}

impl Disaster {
    /// Select victims and draw the failure schedule.
    ///
    /// Sort order is `(time, node-before-link, id)` so identical draws
    /// still replay bit-stably.
    pub fn build(spec: DisasterSpec, graph: &FiberGraph) -> DisasterResult<Self> {
        if spec.epicenter.index() >= graph.node_count() {
            return Err(DisasterError::EpicenterNotFound(spec.epicenter));
        }
        if spec.start > spec.end {
            return Err(DisasterError::BadInterval { start: spec.start, end: spec.end });
        }

        let center = graph.node_pos(spec.epicenter);
        let victim_nodes = graph.nodes_within_radius(center, spec.radius_m);

        let mut mask = vec![false; graph.node_count()];
        for &n in &victim_nodes {
            mask[n.index()] = true;
        }
        let victim_links = graph.links_touching(&mask);

        let span = spec.end - spec.start;
        let mut rng = SimRng::new(spec.seed);
        let mut draw = |resource| {
            let offset = if span == 0 { 0 } else { rng.gen_range(0..=span) };
            FailureEvent { at: spec.start.offset(offset), resource }
        };

        // Draw order is fixed (nodes by distance, then links by id) so the
        // schedule is a pure function of the seed and the graph.
        let mut timeline: Vec<FailureEvent> =
            Vec::with_capacity(victim_nodes.len() + victim_links.len());
        for &n in &victim_nodes {
            timeline.push(draw(ResourceFailure::Node(n)));
        }
        for &l in &victim_links {
            timeline.push(draw(ResourceFailure::Link(l)));
        }

        timeline.sort_by_key(|e| {
            let (kind, id) = match e.resource {
                ResourceFailure::Node(n) => (0u8, n.0),
                ResourceFailure::Link(l) => (1u8, l.0),
            };
            (e.at, kind, id)
        });

        Ok(Self { spec, timeline, applied: 0, announced: false })
    }

    #[inline]
    pub fn spec(&self) -> &DisasterSpec {
        &self.spec
    }

    /// The full timeline, in application order.
    #[inline]
    pub fn timeline(&self) -> &[FailureEvent] {
        &self.timeline
    }

    /// Distinct failure timestamps, ascending — one scheduler event each.
    pub fn failure_times(&self) -> Vec<SimTime> {
        let mut times: Vec<SimTime> = self.timeline.iter().map(|e| e.at).collect();
        times.dedup();
        times
    }

    /// Publish the full failure schedule on the topology.
    ///
    /// The schedule becomes public at t₀ — this is a *pre*-disaster
    /// simulator, so disaster-aware policies route around resources that
    /// are going to fail, not only ones that already have.  Idempotent.
    pub fn announce(&mut self, topo: &mut Topology) {
        if self.announced {
            return;
        }
        self.announced = true;
        for e in &self.timeline {
            match e.resource {
                ResourceFailure::Node(n) => topo.announce_node(n),
                ResourceFailure::Link(l) => topo.announce_link(l),
            }
        }
    }

    /// Apply every not-yet-applied failure with `at <= now` to the
    /// topology, in timeline order, and return the newly failed resources.
    ///
    /// Idempotent per instant: a second call at the same `now` returns
    /// nothing.
    pub fn advance(&mut self, now: SimTime, topo: &mut Topology) -> Vec<ResourceFailure> {
        let mut newly_failed = Vec::new();
        while self.applied < self.timeline.len() && self.timeline[self.applied].at <= now {
            let resource = self.timeline[self.applied].resource;
            match resource {
                ResourceFailure::Node(n) => topo.fail_node(n),
                ResourceFailure::Link(l) => topo.fail_link(l),
            }
            newly_failed.push(resource);
            self.applied += 1;
        }
        newly_failed
    }

    /// `true` once every scheduled failure has been applied.
    pub fn exhausted(&self) -> bool {
        self.applied == self.timeline.len()
    }
}

//! The `Sim` struct and its event loop.
//!
//! Single logical thread: every mutation of the topology, the ISPs, and
//! the metrics happens inside one event handler, so no data race is
//! possible by construction.  Events are totally ordered by
//! `(timestamp, kind rank, sequence)` — see [`events`](crate::events).

use eon_core::{Demand, IspId, LinkId, NodeId, RequestId, SimTime, TrafficClass, MICROS_PER_SEC};
use eon_disaster::{Disaster, ResourceFailure};
use eon_net::Topology;
use eon_policy::Outcome;
use rustc_hash::FxHashSet;

use crate::error::SimResult;
use crate::events::{Event, EventQueue};
use crate::isp::Isp;
use crate::metrics::Metrics;
use crate::observer::SimObserver;
use crate::request::{Allocation, Request, RequestStatus};
use crate::traffic::{ArrivalDraw, TrafficSource};

/// A fully-assembled simulation run.
///
/// Create via [`SimBuilder`](crate::SimBuilder); drive with
/// [`run`](Sim::run).  The run ends when the event heap drains — after the
/// configured arrivals have been emitted and every departure or blocking
/// has been accounted.
pub struct Sim {
    topo:        Topology,
    disaster:    Disaster,
    isps:        Vec<Isp>,
    node_to_isp: Vec<IspId>,
    /// Every request ever created, indexed by `RequestId` (arrival order).
    requests:    Vec<Request>,
    queue:       EventQueue,
    source:      TrafficSource,
    metrics:     Metrics,
    slot_gbps:   f64,
    /// Metrics sampling interval in microseconds, if periodic sampling is on.
    sample_interval: Option<u64>,
    next_sample: SimTime,
    now:         SimTime,
}

impl Sim {
    /// Wire up an assembled run.  Called by the builder only.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn assemble(
        topo:            Topology,
        disaster:        Disaster,
        isps:            Vec<Isp>,
        node_to_isp:     Vec<IspId>,
        queue:           EventQueue,
        source:          TrafficSource,
        metrics:         Metrics,
        slot_gbps:       f64,
        sample_interval: Option<u64>,
    ) -> Self {
        let next_sample = SimTime(sample_interval.unwrap_or(u64::MAX));
        Self {
            topo,
            disaster,
            isps,
            node_to_isp,
            requests: Vec::new(),
            queue,
            source,
            metrics,
            slot_gbps,
            sample_interval,
            next_sample,
            now: SimTime::ZERO,
        }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Run to completion, invoking observer hooks along the way.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        while let Some((at, event)) = self.queue.pop() {
            debug_assert!(at >= self.now, "event queue went backwards");
            self.emit_samples_until(at, observer);
            self.now = at;

            match event {
                Event::DisasterStep         => self.handle_disaster_step(observer)?,
                Event::IspReaction(isp)     => self.handle_reaction(isp),
                Event::Departure { request, epoch } => {
                    self.handle_departure(request, epoch)?
                }
                Event::Arrival(draw)        => self.handle_arrival(draw, observer),
            }
        }
        observer.on_sim_end(self.now, &self.metrics);
        Ok(())
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn requests(&self) -> &[Request] {
        &self.requests
    }

    pub fn topology(&self) -> &Topology {
        &self.topo
    }

    pub fn isps(&self) -> &[Isp] {
        &self.isps
    }

    pub fn now(&self) -> SimTime {
        self.now
    }

    /// The ISP owning `node`.
    pub fn isp_of(&self, node: NodeId) -> IspId {
        self.node_to_isp[node.index()]
    }

    // ── Sampling ──────────────────────────────────────────────────────────

    /// Emit periodic snapshots for every sample instant that falls at or
    /// before `upto`.  A sample at exactly an event's timestamp reflects
    /// the state BEFORE that event — the sample boundary belongs to the
    /// preceding interval.
    fn emit_samples_until<O: SimObserver>(&mut self, upto: SimTime, observer: &mut O) {
        let Some(interval) = self.sample_interval else { return };
        while self.next_sample <= upto {
            let snapshot = self.metrics.snapshot(self.next_sample);
            observer.on_snapshot(&snapshot);
            self.next_sample = self.next_sample.offset(interval);
        }
    }

    // ── Arrival ───────────────────────────────────────────────────────────

    fn handle_arrival<O: SimObserver>(&mut self, draw: ArrivalDraw, observer: &mut O) {
        let id = RequestId(self.requests.len() as u32);
        let demand = Demand {
            id,
            src:            draw.src,
            dst:            draw.dst,
            width:          draw.width,
            holding_micros: draw.holding_micros,
            class:          draw.class,
            isp:            draw.isp,
        };
        let mut request = Request::new(demand);
        self.metrics.record_arrival(draw.isp, draw.class);

        let isp = &self.isps[draw.isp.index()];
        let outcome = isp.active_policy().route(&request.demand, &mut self.topo);
        self.metrics.record_refusals(isp.active_policy().take_refusals());

        match outcome {
            Outcome::Accepted { path, window } => {
                request.status = RequestStatus::Active;
                request.alloc = Some(Allocation { path, window });
                request.admitted_at = Some(self.now);
                request.ends_at = self.now.offset(request.demand.holding_micros);

                let gbits = self.carried_gbits(&request.demand);
                self.metrics.record_admission(draw.isp, draw.class, gbits);

                self.queue.push(
                    request.ends_at,
                    Event::Departure { request: id, epoch: request.epoch },
                );
            }
            Outcome::Blocked(reason) => {
                request.status = RequestStatus::Blocked(reason);
                request.released_at = Some(self.now);
                self.metrics.record_block(draw.isp, draw.class, reason);
            }
        }

        observer.on_outcome(self.now, &request);
        self.requests.push(request);

        // Chain the next draw of the source stream.  Migration arrivals are
        // injected by reactions, not drawn — they must not advance the stream.
        if draw.class == TrafficClass::Datapath {
            if let Some((at, next)) = self.source.next() {
                self.queue.push(at, Event::Arrival(next));
            }
        }
    }

    /// Gigabits a migration admission will carry over its lifetime; zero
    /// for datapath admissions (their volume is not tracked).
    fn carried_gbits(&self, demand: &Demand) -> f64 {
        if demand.class != TrafficClass::Migration || demand.holding_micros == u64::MAX {
            return 0.0;
        }
        let holding_secs = demand.holding_micros as f64 / MICROS_PER_SEC as f64;
        holding_secs * demand.width as f64 * self.slot_gbps
    }

    // ── Departure ─────────────────────────────────────────────────────────

    fn handle_departure(&mut self, id: RequestId, epoch: u32) -> SimResult<()> {
        let request = &mut self.requests[id.index()];
        // A bumped epoch means this departure was cancelled by a disruption.
        if request.epoch != epoch || !request.status.is_active() {
            return Ok(());
        }
        if let Some(alloc) = request.alloc.take() {
            self.topo.release(&alloc.path, alloc.window)?;
        }
        request.status = RequestStatus::Completed;
        request.released_at = Some(self.now);
        self.metrics
            .record_completion(request.demand.isp, request.demand.class);
        Ok(())
    }

    // ── ISP reaction ──────────────────────────────────────────────────────

    fn handle_reaction(&mut self, id: IspId) {
        let epicenter = self.disaster.spec().epicenter;
        let isp = &mut self.isps[id.index()];
        isp.react();

        // Best-effort evacuation: datacenter → the member farthest from the
        // epicenter, injected as an immediate arrival so it is routed by
        // the freshly-activated disaster policy.
        let Some(dst) = isp.migration_destination(&self.topo, epicenter) else {
            return;
        };
        let width = isp.migration_width();
        let rate_gbps = width as f64 * self.slot_gbps;
        let holding_secs = isp.migration_gbits() / rate_gbps;
        let holding_micros =
            eon_core::micros_from_secs_f64(holding_secs).unwrap_or(u64::MAX);

        let draw = ArrivalDraw {
            src: isp.datacenter(),
            dst,
            width,
            holding_micros,
            class: TrafficClass::Migration,
            isp: id,
        };
        self.queue.push(self.now, Event::Arrival(draw));
    }

    // ── Disaster step ─────────────────────────────────────────────────────

    fn handle_disaster_step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        // The first step (t₀) publishes the full failure schedule.
        self.disaster.announce(&mut self.topo);

        let failed = self.disaster.advance(self.now, &mut self.topo);
        if failed.is_empty() {
            return Ok(());
        }

        // O(1)-membership view of this batch of failures.
        let mut failed_nodes: FxHashSet<NodeId> = FxHashSet::default();
        let mut failed_links: FxHashSet<LinkId> = FxHashSet::default();
        for f in &failed {
            match *f {
                ResourceFailure::Node(node) => {
                    failed_nodes.insert(node);
                }
                ResourceFailure::Link(link) => {
                    failed_links.insert(link);
                }
            }
        }

        // Disrupted requests are processed in ascending arrival order.
        let mut hit = Vec::new();
        for (i, request) in self.requests.iter().enumerate() {
            if !request.status.is_active() {
                continue;
            }
            let Some(alloc) = &request.alloc else { continue };
            let crosses = alloc.path.nodes.iter().any(|n| failed_nodes.contains(n))
                || alloc.path.links.iter().any(|l| failed_links.contains(l));
            if crosses {
                hit.push(RequestId(i as u32));
            }
        }

        for id in hit {
            self.disrupt(id, observer)?;
        }
        Ok(())
    }

    /// Release a disrupted request and try its owner's active policy for a
    /// replacement path.  Success keeps the original departure instant.
    fn disrupt<O: SimObserver>(&mut self, id: RequestId, observer: &mut O) -> SimResult<()> {
        let request = &mut self.requests[id.index()];
        let Some(alloc) = request.alloc.take() else {
            return Ok(());
        };
        self.topo.release(&alloc.path, alloc.window)?;
        // Cancel the pending departure; a successful reroute schedules a
        // fresh one under the new epoch.
        request.epoch += 1;

        let demand = request.demand.clone();
        let isp = &self.isps[demand.isp.index()];
        let outcome = isp.active_policy().reroute(&demand, &mut self.topo);
        self.metrics.record_refusals(isp.active_policy().take_refusals());

        let request = &mut self.requests[id.index()];
        let rerouted = match outcome {
            Outcome::Accepted { path, window } => {
                request.status = RequestStatus::Rerouted;
                request.alloc = Some(Allocation { path, window });
                self.queue.push(
                    request.ends_at,
                    Event::Departure { request: id, epoch: request.epoch },
                );
                self.metrics.record_reroute(demand.isp, demand.class);
                true
            }
            Outcome::Blocked(_) => {
                request.status = RequestStatus::Disrupted;
                request.released_at = Some(self.now);
                self.metrics.record_disruption(demand.isp, demand.class);
                false
            }
        };
        observer.on_disruption(self.now, &self.requests[id.index()], rerouted);
        Ok(())
    }
}

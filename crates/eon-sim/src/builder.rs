//! Scenario validation and `Sim` assembly.
//!
//! Everything that can be wrong with a scenario is caught here, before the
//! first event fires — a run that starts never dies on configuration.

use std::str::FromStr;

use eon_core::{micros_from_secs_f64, IspId, SimRng, SimTime, TrafficClass};
use eon_disaster::{Disaster, DisasterSpec};
use eon_net::{FiberGraphBuilder, SlotRange, Topology};
use eon_policy::{registry, PolicyId, PolicyParams};

use crate::error::{SimError, SimResult};
use crate::events::{Event, EventQueue};
use crate::isp::Isp;
use crate::metrics::Metrics;
use crate::scenario::{Scenario, TrafficSpec};
use crate::sim::Sim;
use crate::traffic::{ArrivalDraw, PoissonTraffic, TrafficSource};

/// Validate a [`Scenario`] and assemble a ready-to-run [`Sim`].
pub struct SimBuilder {
    scenario: Scenario,
}

impl SimBuilder {
    pub fn from_scenario(scenario: Scenario) -> Self {
        Self { scenario }
    }

    pub fn build(self) -> SimResult<Sim> {
        let sc = self.scenario;

        // ── Graph ─────────────────────────────────────────────────────────
        if sc.nodes.is_empty() {
            return Err(SimError::Config("scenario has no nodes".into()));
        }
        if sc.slots_per_link == 0 {
            return Err(SimError::Config("slots_per_link must be positive".into()));
        }
        if sc.k_paths == 0 {
            return Err(SimError::Config("k_paths must be positive".into()));
        }
        if !(sc.slot_gbps.is_finite() && sc.slot_gbps > 0.0) {
            return Err(SimError::Config("slot_gbps must be positive".into()));
        }

        let n = sc.nodes.len();
        let mut gb = FiberGraphBuilder::with_capacity(n, sc.links.len());
        for node in &sc.nodes {
            gb.add_node(node.pos);
        }
        for (i, link) in sc.links.iter().enumerate() {
            if link.a.index() >= n || link.b.index() >= n {
                return Err(SimError::Config(format!(
                    "link {i} references a node outside the graph"
                )));
            }
            if link.a == link.b {
                return Err(SimError::Config(format!("link {i} is a self-loop")));
            }
            gb.add_link(link.a, link.b, link.weight);
        }
        let topo = Topology::new(gb.build(), sc.slots_per_link, sc.k_paths);

        // ── ISPs: membership partition, policies, zones ───────────────────
        if sc.isps.is_empty() {
            return Err(SimError::Config("scenario has no ISPs".into()));
        }
        let zone_width = sc.slots_per_link / sc.isps.len() as u16;
        if zone_width == 0 {
            return Err(SimError::Config(format!(
                "{} ISPs cannot partition {} slots",
                sc.isps.len(),
                sc.slots_per_link
            )));
        }

        let mut node_to_isp = vec![IspId::INVALID; n];
        for (i, spec) in sc.isps.iter().enumerate() {
            for &m in &spec.members {
                if m.index() >= n {
                    return Err(SimError::Config(format!(
                        "ISP {i} member {m} is outside the graph"
                    )));
                }
                if node_to_isp[m.index()].is_valid() {
                    return Err(SimError::Config(format!(
                        "{m} belongs to more than one ISP"
                    )));
                }
                node_to_isp[m.index()] = IspId(i as u16);
            }
        }
        if let Some(orphan) = node_to_isp.iter().position(|&i| !i.is_valid()) {
            return Err(SimError::Config(format!(
                "node {orphan} belongs to no ISP"
            )));
        }

        let mut isps = Vec::with_capacity(sc.isps.len());
        for (i, spec) in sc.isps.iter().enumerate() {
            if !spec.members.contains(&spec.datacenter) {
                return Err(SimError::Config(format!(
                    "ISP {i} datacenter {} is not one of its members",
                    spec.datacenter
                )));
            }
            if spec.migration_width == 0 || spec.migration_width > sc.slots_per_link {
                return Err(SimError::Config(format!(
                    "ISP {i} migration width {} does not fit the grid",
                    spec.migration_width
                )));
            }
            if !(spec.migration_gbits.is_finite() && spec.migration_gbits >= 0.0) {
                return Err(SimError::Config(format!(
                    "ISP {i} migration volume must be finite and non-negative"
                )));
            }
            let reaction_delay = micros_from_secs_f64(spec.reaction_delay_secs)
                .ok_or_else(|| {
                    SimError::Config(format!("ISP {i} reaction delay is not a valid duration"))
                })?;

            // Zones partition the grid in ISP order; the last zone absorbs
            // the division remainder.
            let zone_start = i as u16 * zone_width;
            let zone_end = if i == sc.isps.len() - 1 {
                sc.slots_per_link
            } else {
                zone_start + zone_width
            };
            let members_mask = {
                let mut mask = vec![false; n];
                for &m in &spec.members {
                    mask[m.index()] = true;
                }
                mask
            };
            let params = PolicyParams {
                zone:            SlotRange::new(zone_start, zone_end),
                members:         members_mask,
                migration_width: spec.migration_width,
                theta:           sc.theta,
            };
            let normal = registry::build(PolicyId::from_str(&spec.normal_policy)?, &params);
            let disaster = registry::build(PolicyId::from_str(&spec.disaster_policy)?, &params);

            isps.push(Isp::new(
                IspId(i as u16),
                spec.members.clone(),
                spec.datacenter,
                reaction_delay,
                normal,
                disaster,
                spec.migration_width,
                spec.migration_gbits,
            ));
        }

        // ── Disaster ──────────────────────────────────────────────────────
        if !(sc.disaster.radius_m.is_finite() && sc.disaster.radius_m >= 0.0) {
            return Err(SimError::Config("disaster radius must be non-negative".into()));
        }
        let d_start = SimTime::from_secs_f64(sc.disaster.start_secs)
            .ok_or_else(|| SimError::Config("disaster start is not a valid time".into()))?;
        let d_end = SimTime::from_secs_f64(sc.disaster.end_secs)
            .ok_or_else(|| SimError::Config("disaster end is not a valid time".into()))?;
        let disaster = Disaster::build(
            DisasterSpec {
                epicenter: sc.disaster.epicenter,
                radius_m:  sc.disaster.radius_m,
                start:     d_start,
                end:       d_end,
                seed:      sc.disaster.seed,
            },
            topo.graph(),
        )?;

        // ── Traffic source ────────────────────────────────────────────────
        let mut source = match sc.traffic {
            TrafficSpec::Replay(specs) => {
                let mut list = Vec::with_capacity(specs.len());
                for (i, r) in specs.iter().enumerate() {
                    if r.src.index() >= n || r.dst.index() >= n {
                        return Err(SimError::Config(format!(
                            "request {i} references a node outside the graph"
                        )));
                    }
                    if r.width == 0 || r.width > sc.slots_per_link {
                        return Err(SimError::Config(format!(
                            "request {i} width {} does not fit the grid",
                            r.width
                        )));
                    }
                    let at = SimTime::from_secs_f64(r.at_secs).ok_or_else(|| {
                        SimError::Config(format!("request {i} arrival is not a valid time"))
                    })?;
                    let holding_micros = match r.holding_secs {
                        None => u64::MAX,
                        Some(h) => micros_from_secs_f64(h).ok_or_else(|| {
                            SimError::Config(format!(
                                "request {i} holding time is not a valid duration"
                            ))
                        })?,
                    };
                    list.push((at, ArrivalDraw {
                        src:            r.src,
                        dst:            r.dst,
                        width:          r.width,
                        holding_micros,
                        class:          TrafficClass::Datapath,
                        isp:            node_to_isp[r.src.index()],
                    }));
                }
                // Stable by time so ties keep list order.
                list.sort_by_key(|&(at, _)| at);
                TrafficSource::Replay { list, next: 0 }
            }
            TrafficSpec::Poisson { lambda_per_sec, mean_holding_secs, widths, count, seed } => {
                if !(lambda_per_sec.is_finite() && lambda_per_sec > 0.0) {
                    return Err(SimError::Config("arrival rate λ must be positive".into()));
                }
                if !(mean_holding_secs.is_finite() && mean_holding_secs > 0.0) {
                    return Err(SimError::Config("mean holding time must be positive".into()));
                }
                if n < 2 {
                    return Err(SimError::Config(
                        "Poisson traffic needs at least two nodes".into(),
                    ));
                }
                if widths.is_empty() {
                    return Err(SimError::Config("slot-demand table is empty".into()));
                }
                for &(w, weight) in &widths {
                    if w == 0 || w > sc.slots_per_link {
                        return Err(SimError::Config(format!(
                            "slot demand {w} does not fit the grid"
                        )));
                    }
                    if !(weight.is_finite() && weight >= 0.0) {
                        return Err(SimError::Config("slot-demand weight is invalid".into()));
                    }
                }
                if widths.iter().map(|&(_, w)| w).sum::<f64>() <= 0.0 {
                    return Err(SimError::Config("slot-demand weights sum to zero".into()));
                }
                TrafficSource::Poisson(PoissonTraffic::new(
                    lambda_per_sec,
                    mean_holding_secs,
                    widths,
                    node_to_isp.clone(),
                    count,
                    SimRng::new(seed),
                ))
            }
        };

        // ── Sampling ──────────────────────────────────────────────────────
        let sample_interval = match sc.sample_interval_secs {
            None => None,
            Some(s) => {
                let micros = micros_from_secs_f64(s)
                    .filter(|&m| m > 0)
                    .ok_or_else(|| {
                        SimError::Config("sample interval must be a positive duration".into())
                    })?;
                Some(micros)
            }
        };

        // ── Seed the event queue ──────────────────────────────────────────
        let mut queue = EventQueue::new();
        // Schedule announcement at t₀, then one step per failure instant.
        queue.push(d_start, Event::DisasterStep);
        for t in disaster.failure_times() {
            if t != d_start {
                queue.push(t, Event::DisasterStep);
            }
        }
        for isp in &isps {
            queue.push(
                d_start.offset(isp.reaction_delay_micros()),
                Event::IspReaction(isp.id()),
            );
        }
        if let Some((at, draw)) = source.next() {
            queue.push(at, Event::Arrival(draw));
        }

        let metrics = Metrics::new(isps.len(), sc.theta);

        Ok(Sim::assemble(
            topo,
            disaster,
            isps,
            node_to_isp,
            queue,
            source,
            metrics,
            sc.slot_gbps,
            sample_interval,
        ))
    }
}

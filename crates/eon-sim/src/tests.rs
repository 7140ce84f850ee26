//! Unit and scenario tests for eon-sim.

use eon_core::{GeoPoint, IspId, NodeId, RequestId, SimTime, TrafficClass};
use eon_net::Window;
use eon_policy::BlockReason;

use crate::{
    DisasterConfig, Event, EventQueue, IspSpec, LinkSpec, MetricsSnapshot, NodeSpec,
    RequestSpec, Scenario, Sim, SimBuilder, SimError, SimObserver, RequestStatus,
    TrafficSpec,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Nodes spread ~110 km apart along a parallel.
fn geo(i: usize) -> GeoPoint {
    GeoPoint::new(40.0, -100.0 + i as f32 * 1.3)
}

fn nodes(count: usize) -> Vec<NodeSpec> {
    (0..count).map(|i| NodeSpec { pos: geo(i) }).collect()
}

fn link(a: u32, b: u32, weight: u64) -> LinkSpec {
    LinkSpec { a: NodeId(a), b: NodeId(b), weight }
}

fn isp(members: &[u32], datacenter: u32, normal: &str, disaster: &str) -> IspSpec {
    IspSpec {
        members:             members.iter().map(|&m| NodeId(m)).collect(),
        datacenter:          NodeId(datacenter),
        reaction_delay_secs: 0.0,
        normal_policy:       normal.into(),
        disaster_policy:     disaster.into(),
        migration_width:     1,
        migration_gbits:     12.5,
    }
}

fn request(at_secs: f64, src: u32, dst: u32, width: u16) -> RequestSpec {
    RequestSpec {
        at_secs,
        src: NodeId(src),
        dst: NodeId(dst),
        width,
        holding_secs: None,
    }
}

/// A scenario skeleton; tests override the parts they exercise.
fn base_scenario() -> Scenario {
    Scenario {
        nodes:          nodes(2),
        links:          vec![link(0, 1, 1)],
        slots_per_link: 4,
        slot_gbps:      12.5,
        k_paths:        5,
        isps:           vec![isp(&[0, 1], 0, "first_fit", "first_fit_da")],
        disaster:       DisasterConfig {
            epicenter:  NodeId(1),
            radius_m:   1.0,
            start_secs: 1_000.0,
            end_secs:   1_100.0,
            seed:       3,
        },
        traffic:        TrafficSpec::Replay(vec![]),
        theta:          1,
        sample_interval_secs: None,
    }
}

fn run(scenario: Scenario) -> Sim {
    let mut sim = SimBuilder::from_scenario(scenario).build().unwrap();
    sim.run(&mut crate::NoopObserver).unwrap();
    sim
}

/// Observer that records everything for assertions.
#[derive(Default)]
struct Recording {
    outcomes:    Vec<(RequestStatus, Option<Window>)>,
    disruptions: Vec<(RequestId, bool)>,
    snapshots:   Vec<MetricsSnapshot>,
}

impl SimObserver for Recording {
    fn on_outcome(&mut self, _now: SimTime, request: &crate::Request) {
        self.outcomes
            .push((request.status, request.alloc.as_ref().map(|a| a.window)));
    }

    fn on_disruption(&mut self, _now: SimTime, request: &crate::Request, rerouted: bool) {
        self.disruptions.push((request.demand.id, rerouted));
    }

    fn on_snapshot(&mut self, snapshot: &MetricsSnapshot) {
        self.snapshots.push(snapshot.clone());
    }
}

// ── Event queue ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod events {
    use super::*;
    use crate::traffic::ArrivalDraw;

    fn draw() -> ArrivalDraw {
        ArrivalDraw {
            src:            NodeId(0),
            dst:            NodeId(1),
            width:          1,
            holding_micros: 0,
            class:          TrafficClass::Datapath,
            isp:            IspId(0),
        }
    }

    #[test]
    fn orders_by_time_then_kind_then_fifo() {
        let mut q = EventQueue::new();
        let t = SimTime(100);
        q.push(t, Event::Arrival(draw()));
        q.push(t, Event::Departure { request: RequestId(0), epoch: 0 });
        q.push(t, Event::IspReaction(IspId(0)));
        q.push(t, Event::DisasterStep);
        q.push(SimTime(50), Event::Arrival(draw()));

        // Earlier timestamp wins outright.
        assert!(matches!(q.pop(), Some((SimTime(50), Event::Arrival(_)))));
        // Same timestamp: failures < reactions < departures < arrivals.
        assert!(matches!(q.pop(), Some((_, Event::DisasterStep))));
        assert!(matches!(q.pop(), Some((_, Event::IspReaction(_)))));
        assert!(matches!(q.pop(), Some((_, Event::Departure { .. }))));
        assert!(matches!(q.pop(), Some((_, Event::Arrival(_)))));
        assert!(q.pop().is_none());
    }

    #[test]
    fn equal_keys_are_fifo() {
        let mut q = EventQueue::new();
        let t = SimTime(7);
        q.push(t, Event::Departure { request: RequestId(1), epoch: 0 });
        q.push(t, Event::Departure { request: RequestId(2), epoch: 0 });
        match (q.pop(), q.pop()) {
            (
                Some((_, Event::Departure { request: a, .. })),
                Some((_, Event::Departure { request: b, .. })),
            ) => {
                assert_eq!(a, RequestId(1));
                assert_eq!(b, RequestId(2));
            }
            other => panic!("unexpected pops: {other:?}"),
        }
    }

    #[test]
    fn never_events_are_dropped() {
        let mut q = EventQueue::new();
        q.push(SimTime::NEVER, Event::DisasterStep);
        assert!(q.is_empty());
    }
}

// ── Scenario validation ───────────────────────────────────────────────────────

#[cfg(test)]
mod validation {
    use super::*;

    fn expect_config_err(scenario: Scenario) {
        match SimBuilder::from_scenario(scenario).build() {
            Err(SimError::Config(_)) => {}
            Err(other) => panic!("expected Config error, got {other}"),
            Ok(_) => panic!("expected Config error, got a sim"),
        }
    }

    #[test]
    fn empty_graph() {
        let mut sc = base_scenario();
        sc.nodes.clear();
        sc.links.clear();
        expect_config_err(sc);
    }

    #[test]
    fn unknown_policy() {
        let mut sc = base_scenario();
        sc.isps[0].normal_policy = "round_robin".into();
        match SimBuilder::from_scenario(sc).build() {
            Err(SimError::Policy(_)) => {}
            other => panic!("expected Policy error, got {:?}", other.is_ok()),
        }
    }

    #[test]
    fn overlapping_membership() {
        let mut sc = base_scenario();
        sc.isps = vec![
            isp(&[0, 1], 0, "first_fit", "first_fit_da"),
            isp(&[1], 1, "first_fit", "first_fit_da"),
        ];
        expect_config_err(sc);
    }

    #[test]
    fn orphan_node() {
        let mut sc = base_scenario();
        sc.isps = vec![isp(&[0], 0, "first_fit", "first_fit_da")];
        expect_config_err(sc);
    }

    #[test]
    fn datacenter_outside_members() {
        let mut sc = base_scenario();
        sc.isps[0].datacenter = NodeId(5);
        expect_config_err(sc);
    }

    #[test]
    fn more_isps_than_zone_slots() {
        let mut sc = base_scenario();
        sc.nodes = nodes(3);
        sc.links = vec![link(0, 1, 1), link(1, 2, 1)];
        sc.slots_per_link = 2;
        sc.isps = vec![
            isp(&[0], 0, "first_fit", "first_fit_da"),
            isp(&[1], 1, "first_fit", "first_fit_da"),
            isp(&[2], 2, "first_fit", "first_fit_da"),
        ];
        expect_config_err(sc);
    }

    #[test]
    fn negative_arrival_time() {
        let mut sc = base_scenario();
        sc.traffic = TrafficSpec::Replay(vec![request(-1.0, 0, 1, 1)]);
        expect_config_err(sc);
    }

    #[test]
    fn oversized_width() {
        let mut sc = base_scenario();
        sc.traffic = TrafficSpec::Replay(vec![request(0.0, 0, 1, 99)]);
        expect_config_err(sc);
    }

    #[test]
    fn self_loop_link() {
        let mut sc = base_scenario();
        sc.links.push(link(0, 0, 1));
        expect_config_err(sc);
    }
}

// ── Single-link saturation, disruption, and migration accounting ──────────────

#[cfg(test)]
mod saturation {
    use super::*;

    /// Five unit demands with infinite holding against S=4: four admitted
    /// into slots 0..3, the fifth blocked; the disaster then takes the only
    /// link down and disrupts all four without a reroute.
    #[test]
    fn full_lifecycle_counters() {
        let mut sc = base_scenario();
        sc.traffic = TrafficSpec::Replay(
            (0..5).map(|i| request(1.0 + i as f64, 0, 1, 1)).collect(),
        );

        let mut obs = Recording::default();
        let mut sim = SimBuilder::from_scenario(sc).build().unwrap();
        sim.run(&mut obs).unwrap();

        // Admission pattern: first-fit packs slots 0..3 in arrival order.
        let windows: Vec<Option<Window>> =
            obs.outcomes.iter().take(5).map(|&(_, w)| w).collect();
        assert_eq!(
            windows,
            vec![
                Some(Window::new(0, 1)),
                Some(Window::new(1, 1)),
                Some(Window::new(2, 1)),
                Some(Window::new(3, 1)),
                None,
            ]
        );
        assert_eq!(
            obs.outcomes[4].0,
            RequestStatus::Blocked(BlockReason::NoWindow)
        );

        let dp = &sim.metrics().isp(IspId(0)).datapath;
        assert_eq!(dp.arrivals, 5);
        assert_eq!(dp.admitted, 4);
        assert_eq!(dp.blocked_no_window, 1);
        assert_eq!(dp.disrupted, 4);
        assert_eq!(dp.rerouted, 0);
        assert_eq!(dp.completed, 0);

        // The reaction injected one migration; its only path crosses the
        // announced failure, so it blocks as no_safe_path.
        let mig = &sim.metrics().isp(IspId(0)).migration;
        assert_eq!(mig.arrivals, 1);
        assert_eq!(mig.blocked_no_safe_path, 1);
        let migration_req = &sim.requests()[5];
        assert_eq!(migration_req.demand.class, TrafficClass::Migration);
        assert_eq!(
            migration_req.status,
            RequestStatus::Blocked(BlockReason::NoSafePath)
        );

        // Admission accounting closes: admitted + blocked == arrivals.
        let m = sim.metrics();
        assert_eq!(m.admitted_total() + m.blocked_total(), m.arrivals_total());

        // Every slot was given back when the disruptions released them.
        assert_eq!(sim.topology().grid().occupied_slots(), 0);
        assert_eq!(obs.disruptions.len(), 4);
        assert!(obs.disruptions.iter().all(|&(_, rerouted)| !rerouted));
    }
}

// ── Disruption and migration injection (chain topology) ───────────────────────

#[cfg(test)]
mod disruption {
    use super::*;

    /// Chain A-B-C; the disaster razes C.  The active A→C request is
    /// disrupted with no alternative, its A-B slots are freed, and the
    /// reaction migrates the datacenter toward the safe end.
    fn chain_scenario() -> Scenario {
        let mut sc = base_scenario();
        sc.nodes = nodes(3);
        sc.links = vec![link(0, 1, 1), link(1, 2, 1)];
        sc.slots_per_link = 8;
        sc.isps = vec![IspSpec {
            reaction_delay_secs: 5.0,
            migration_width:     2,
            migration_gbits:     25.0,
            ..isp(&[0, 1, 2], 0, "first_fit", "first_fit_da")
        }];
        sc.disaster = DisasterConfig {
            epicenter:  NodeId(2),
            radius_m:   1.0,
            start_secs: 10.0,
            end_secs:   10.0, // zero span: everything fails at t₀
            seed:       9,
        };
        sc.traffic = TrafficSpec::Replay(vec![request(0.0, 0, 2, 2)]);
        sc
    }

    #[test]
    fn disrupts_and_releases() {
        let mut obs = Recording::default();
        let mut sim = SimBuilder::from_scenario(chain_scenario()).build().unwrap();
        sim.run(&mut obs).unwrap();

        let dp = &sim.metrics().isp(IspId(0)).datapath;
        assert_eq!(dp.admitted, 1);
        assert_eq!(dp.disrupted, 1);
        assert_eq!(sim.requests()[0].status, RequestStatus::Disrupted);
        assert_eq!(obs.disruptions, vec![(RequestId(0), false)]);

        // Slots on the surviving link A-B were released with the rest.
        assert_eq!(sim.topology().grid().occupied_slots(), 0);
    }

    #[test]
    fn migration_targets_farthest_member_and_completes() {
        let mut sim = SimBuilder::from_scenario(chain_scenario()).build().unwrap();
        sim.run(&mut crate::NoopObserver).unwrap();

        // Reaction at t=15: datacenter A evacuates to B (the farthest
        // member from the epicenter C that isn't the datacenter), routed by
        // the disaster policy around the announced ruins.
        let mig_req = &sim.requests()[1];
        assert_eq!(mig_req.demand.class, TrafficClass::Migration);
        assert_eq!(mig_req.demand.src, NodeId(0));
        assert_eq!(mig_req.demand.dst, NodeId(1));
        assert_eq!(mig_req.status, RequestStatus::Completed);

        // 25 Gbit over 2 slots × 12.5 Gbit/s = 1 s of holding; the carried
        // volume equals the configured evacuation volume.
        assert_eq!(mig_req.demand.holding_micros, 1_000_000);
        let mig = &sim.metrics().isp(IspId(0)).migration;
        assert_eq!(mig.admitted, 1);
        assert_eq!(mig.completed, 1);
        assert!((mig.migration_gbits - 25.0).abs() < 1e-9);
    }
}

// ── Policy switch at reaction time ────────────────────────────────────────────

#[cfg(test)]
mod policy_switch {
    use super::*;

    /// Before its reaction an ISP admits over a doomed link; one event
    /// later the identical demand blocks as no_safe_path — the failure
    /// schedule is public, the link just hasn't burned yet.
    #[test]
    fn doomed_link_blocks_only_after_reaction() {
        let mut sc = base_scenario();
        sc.nodes = nodes(4);
        sc.links = vec![link(0, 1, 1), link(2, 3, 1), link(1, 2, 10)];
        sc.slots_per_link = 8;
        sc.isps = vec![
            isp(&[0, 1], 0, "first_fit", "first_fit_da"),
            isp(&[2, 3], 3, "first_fit", "first_fit_da"),
        ];
        // Schedule publishes at t₀=20; failures land much later (the huge
        // interval keeps every draw far beyond the probes below).
        sc.disaster = DisasterConfig {
            epicenter:  NodeId(1),
            radius_m:   1.0,
            start_secs: 20.0,
            end_secs:   1.0e9,
            seed:       5,
        };
        sc.traffic = TrafficSpec::Replay(vec![
            RequestSpec {
                at_secs: 19.0,
                src: NodeId(0),
                dst: NodeId(1),
                width: 1,
                holding_secs: Some(0.5),
            },
            RequestSpec {
                at_secs: 21.0,
                src: NodeId(0),
                dst: NodeId(1),
                width: 1,
                holding_secs: Some(0.5),
            },
        ]);

        let mut obs = Recording::default();
        let mut sim = SimBuilder::from_scenario(sc).build().unwrap();
        sim.run(&mut obs).unwrap();

        // Outcome order: t=19 probe, both t=20 migrations, t=21 probe.
        assert_eq!(obs.outcomes.len(), 4);
        // t=19: pre-reaction, first_fit admits straight through the link
        // that is going to fail.
        assert_eq!(obs.outcomes[0].1, Some(Window::new(0, 1)));
        // t=21: post-reaction, first_fit_da refuses the announced link.
        assert_eq!(
            obs.outcomes[3].0,
            RequestStatus::Blocked(BlockReason::NoSafePath)
        );

        // The switch is monotonic.
        assert_eq!(sim.isps()[0].phase(), crate::IspPhase::Reacted);
    }
}

// ── Zone partitioning through the scheduler ───────────────────────────────────

#[cfg(test)]
mod zones {
    use super::*;

    #[test]
    fn second_isp_allocates_in_its_own_zone() {
        let mut sc = base_scenario();
        sc.slots_per_link = 8;
        sc.isps = vec![
            isp(&[0], 0, "sliding_window", "best_fit_sw_da"),
            isp(&[1], 1, "sliding_window", "best_fit_sw_da"),
        ];
        // Push the disaster far out so the probe runs undisturbed.
        sc.disaster.start_secs = 1.0e6;
        sc.disaster.end_secs = 1.0e6;
        sc.traffic = TrafficSpec::Replay(vec![RequestSpec {
            at_secs: 1.0,
            src: NodeId(1),
            dst: NodeId(0),
            width: 2,
            holding_secs: Some(1.0),
        }]);

        let mut obs = Recording::default();
        let mut sim = SimBuilder::from_scenario(sc).build().unwrap();
        sim.run(&mut obs).unwrap();

        // ISP 1 owns the upper half of the grid: [4, 8).
        assert_eq!(obs.outcomes[0].1, Some(Window::new(4, 2)));
        assert_eq!(sim.metrics().isp(IspId(1)).datapath.admitted, 1);
    }
}

// ── Determinism and accounting over generated traffic ─────────────────────────

#[cfg(test)]
mod determinism {
    use super::*;

    /// Six-node ring, two ISPs, Poisson traffic through a mid-run disaster.
    fn ring_scenario() -> Scenario {
        Scenario {
            nodes:          nodes(6),
            links:          vec![
                link(0, 1, 1),
                link(1, 2, 1),
                link(2, 3, 1),
                link(3, 4, 1),
                link(4, 5, 1),
                link(0, 5, 2),
            ],
            slots_per_link: 16,
            slot_gbps:      12.5,
            k_paths:        3,
            isps:           vec![
                IspSpec {
                    reaction_delay_secs: 2.0,
                    migration_width:     4,
                    migration_gbits:     100.0,
                    ..isp(&[0, 1, 2], 0, "first_fit", "best_fit_da")
                },
                IspSpec {
                    reaction_delay_secs: 6.0,
                    migration_width:     4,
                    migration_gbits:     100.0,
                    ..isp(&[3, 4, 5], 3, "best_fit", "da_with_blocking")
                },
            ],
            disaster:       DisasterConfig {
                epicenter:  NodeId(2),
                radius_m:   150_000.0,
                start_secs: 5.0,
                end_secs:   25.0,
                seed:       7,
            },
            traffic:        TrafficSpec::Poisson {
                lambda_per_sec:    5.0,
                mean_holding_secs: 2.0,
                widths:            vec![(1, 0.6), (2, 0.3), (4, 0.1)],
                count:             150,
                seed:              11,
            },
            theta:          1,
            sample_interval_secs: None,
        }
    }

    #[test]
    fn identical_scenarios_replay_identically() {
        let a = run(ring_scenario());
        let b = run(ring_scenario());

        assert_eq!(
            a.metrics().snapshot(a.now()),
            b.metrics().snapshot(b.now())
        );
        let statuses = |s: &Sim| -> Vec<RequestStatus> {
            s.requests().iter().map(|r| r.status).collect()
        };
        assert_eq!(statuses(&a), statuses(&b));
        assert_eq!(a.requests().len(), b.requests().len());
    }

    #[test]
    fn accounting_closes() {
        let sim = run(ring_scenario());
        let m = sim.metrics();

        // 150 generated arrivals plus up to two injected migrations.
        assert!(m.arrivals_total() >= 150);
        assert_eq!(m.admitted_total() + m.blocked_total(), m.arrivals_total());
        assert!(m.disrupted_total() <= m.admitted_total());

        // Every request reached a terminal state (all holdings finite),
        // and their statuses reconcile with the counters.
        let mut completed = 0;
        let mut blocked = 0;
        let mut disrupted = 0;
        for r in sim.requests() {
            match r.status {
                RequestStatus::Completed => completed += 1,
                RequestStatus::Blocked(_) => blocked += 1,
                RequestStatus::Disrupted => disrupted += 1,
                other => panic!("non-terminal status at end of run: {other:?}"),
            }
        }
        assert_eq!(blocked as u64, m.blocked_total());
        assert_eq!(disrupted as u64, m.disrupted_total());
        assert_eq!(completed as u64 + disrupted as u64, m.admitted_total());

        // Everything admitted was eventually released.
        assert_eq!(sim.topology().grid().occupied_slots(), 0);
    }

    #[test]
    fn different_traffic_seed_changes_the_run() {
        let a = run(ring_scenario());
        let mut sc = ring_scenario();
        if let TrafficSpec::Poisson { seed, .. } = &mut sc.traffic {
            *seed = 12;
        }
        let b = run(sc);
        // Same arrival count, different draws.
        assert_ne!(
            a.metrics().snapshot(SimTime::ZERO),
            b.metrics().snapshot(SimTime::ZERO)
        );
    }
}

// ── Periodic sampling ─────────────────────────────────────────────────────────

#[cfg(test)]
mod sampling {
    use super::*;

    #[test]
    fn snapshots_are_periodic_and_monotonic() {
        let mut sc = base_scenario();
        sc.disaster.start_secs = 100.0;
        sc.disaster.end_secs = 100.0;
        sc.sample_interval_secs = Some(1.0);
        sc.traffic = TrafficSpec::Replay(
            (0..4)
                .map(|i| RequestSpec {
                    at_secs: 1.0 + i as f64,
                    src: NodeId(0),
                    dst: NodeId(1),
                    width: 1,
                    holding_secs: Some(0.25),
                })
                .collect(),
        );

        let mut obs = Recording::default();
        let mut sim = SimBuilder::from_scenario(sc).build().unwrap();
        sim.run(&mut obs).unwrap();

        assert!(!obs.snapshots.is_empty());
        // Strictly increasing sample instants, one second apart.
        for pair in obs.snapshots.windows(2) {
            assert!((pair[1].at_secs - pair[0].at_secs - 1.0).abs() < 1e-9);
        }
        // Counters never decrease across samples.
        let arrivals: Vec<u64> = obs
            .snapshots
            .iter()
            .map(|s| s.isps.iter().map(|i| i.datapath.arrivals).sum::<u64>())
            .collect();
        assert!(arrivals.windows(2).all(|w| w[0] <= w[1]));
        // A sample taken at an arrival's exact instant reflects the state
        // before it: the t=1 s sample still shows zero arrivals.
        assert_eq!(arrivals[0], 0);
    }
}

// ── Scenario persistence (serde) ──────────────────────────────────────────────

#[cfg(all(test, feature = "serde"))]
mod persistence {
    use super::*;
    use super::determinism_support::*;

    #[test]
    fn scenario_roundtrip_replays_identically() {
        let sc = ring_scenario_for_serde();
        let json = serde_json::to_string(&sc).unwrap();
        let reloaded: Scenario = serde_json::from_str(&json).unwrap();

        let a = run(sc);
        let b = run(reloaded);
        assert_eq!(
            a.metrics().snapshot(a.now()),
            b.metrics().snapshot(b.now())
        );
    }
}

#[cfg(all(test, feature = "serde"))]
mod determinism_support {
    use super::*;

    /// A compact generated scenario for the serde round-trip.
    pub fn ring_scenario_for_serde() -> Scenario {
        let mut sc = base_scenario();
        sc.disaster.start_secs = 3.0;
        sc.disaster.end_secs = 8.0;
        sc.traffic = TrafficSpec::Poisson {
            lambda_per_sec:    3.0,
            mean_holding_secs: 1.0,
            widths:            vec![(1, 0.7), (2, 0.3)],
            count:             40,
            seed:              21,
        };
        sc
    }
}

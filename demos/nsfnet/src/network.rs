//! The NSFNET-14 backbone as a two-ISP disaster scenario.

use eon_core::GeoPoint;
use eon_core::NodeId;
use eon_sim::{
    DisasterConfig, IspSpec, LinkSpec, NodeSpec, Scenario, TrafficSpec,
    DEFAULT_K_PATHS, DEFAULT_SLOTS_PER_LINK, DEFAULT_SLOT_GBPS, DEFAULT_THETA,
};

/// (lat, lon) of the 14 NSFNET sites.
const SITES: [(f32, f32); 14] = [
    (47.61, -122.33), // 0  Seattle
    (37.44, -122.14), // 1  Palo Alto
    (32.72, -117.16), // 2  San Diego
    (40.76, -111.89), // 3  Salt Lake City
    (40.01, -105.27), // 4  Boulder
    (29.76, -95.36),  // 5  Houston
    (40.81, -96.68),  // 6  Lincoln
    (40.11, -88.27),  // 7  Champaign
    (40.44, -79.99),  // 8  Pittsburgh
    (42.28, -83.74),  // 9  Ann Arbor
    (42.44, -76.50),  // 10 Ithaca
    (38.99, -76.94),  // 11 College Park
    (33.75, -84.39),  // 12 Atlanta
    (40.35, -74.66),  // 13 Princeton
];

/// Fiber spans, weight = approximate route length in km.
const SPANS: [(u32, u32, u64); 21] = [
    (0, 1, 1_100),
    (0, 2, 1_600),
    (0, 3, 1_200),
    (1, 2, 700),
    (1, 3, 950),
    (2, 5, 2_100),
    (3, 4, 600),
    (4, 5, 1_500),
    (4, 6, 780),
    (5, 11, 1_900),
    (5, 12, 1_100),
    (6, 7, 900),
    (6, 9, 1_000),
    (7, 8, 700),
    (7, 12, 1_000),
    (8, 10, 500),
    (8, 11, 300),
    (9, 10, 700),
    (9, 13, 900),
    (10, 13, 320),
    (11, 13, 300),
];

/// Build the scenario: a Midwest disaster centred on Champaign while a
/// west-coast and an east-coast ISP carry Poisson traffic.
///
/// Both ISPs start on `normal_policy` and switch to `disaster_policy` at
/// their reaction times; all randomness comes from the fixed seeds, so two
/// scenarios built with the same arguments replay identically.
pub fn nsfnet_scenario(normal_policy: &str, disaster_policy: &str) -> Scenario {
    let nodes = SITES
        .iter()
        .map(|&(lat, lon)| NodeSpec { pos: GeoPoint::new(lat, lon) })
        .collect();
    let links = SPANS
        .iter()
        .map(|&(a, b, weight)| LinkSpec { a: NodeId(a), b: NodeId(b), weight })
        .collect();

    let west = IspSpec {
        members:             (0..6).map(NodeId).collect(),
        datacenter:          NodeId(1), // Palo Alto
        reaction_delay_secs: 30.0,
        normal_policy:       normal_policy.into(),
        disaster_policy:     disaster_policy.into(),
        migration_width:     8,
        migration_gbits:     4_000.0,
    };
    let east = IspSpec {
        members:             (6..14).map(NodeId).collect(),
        datacenter:          NodeId(11), // College Park
        reaction_delay_secs: 90.0,
        normal_policy:       normal_policy.into(),
        disaster_policy:     disaster_policy.into(),
        migration_width:     8,
        migration_gbits:     4_000.0,
    };

    Scenario {
        nodes,
        links,
        slots_per_link: DEFAULT_SLOTS_PER_LINK,
        slot_gbps:      DEFAULT_SLOT_GBPS,
        k_paths:        DEFAULT_K_PATHS,
        isps:           vec![west, east],
        disaster:       DisasterConfig {
            epicenter:  NodeId(7), // Champaign
            radius_m:   500_000.0,
            start_secs: 120.0,
            end_secs:   600.0,
            seed:       1_337,
        },
        traffic:        TrafficSpec::Poisson {
            lambda_per_sec:    8.0,
            mean_holding_secs: 10.0,
            widths:            vec![(1, 0.5), (2, 0.25), (4, 0.15), (8, 0.1)],
            count:             10_000,
            seed:              42,
        },
        theta:          DEFAULT_THETA,
        sample_interval_secs: Some(30.0),
    }
}

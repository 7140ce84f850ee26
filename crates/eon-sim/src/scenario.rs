//! The materialized scenario — the one input a run needs.
//!
//! A `Scenario` is a plain value: whatever produced it (a generator, a
//! deserialized blob) is outside the core.  With the `serde` feature a
//! persisted scenario reloads to an identical value, and identical values
//! replay to identical metrics.
//!
//! All times at this boundary are f64 seconds; the builder converts them to
//! the internal microsecond counter and rejects negative or non-finite
//! values as configuration errors.

use eon_core::{GeoPoint, NodeId};

/// Default slots per link (12.5 GHz grid across C-band).
pub const DEFAULT_SLOTS_PER_LINK: u16 = 128;

/// Default catalogued paths per node pair.
pub const DEFAULT_K_PATHS: usize = 5;

/// Default per-slot line rate, Gbit/s.
pub const DEFAULT_SLOT_GBPS: f64 = 12.5;

/// Default admission-control free-run threshold θ.
pub const DEFAULT_THETA: u32 = 1;

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scenario {
    pub nodes:          Vec<NodeSpec>,
    pub links:          Vec<LinkSpec>,
    pub slots_per_link: u16,
    /// Per-slot line rate (Gbit/s); sizes migration holding times.
    pub slot_gbps:      f64,
    /// K of the K-shortest-path catalogue.
    pub k_paths:        usize,
    pub isps:           Vec<IspSpec>,
    pub disaster:       DisasterConfig,
    pub traffic:        TrafficSpec,
    /// Admission-control free-run threshold θ.
    pub theta:          u32,
    /// Metrics sampling interval in seconds; `None` = no periodic samples.
    pub sample_interval_secs: Option<f64>,
}

#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeSpec {
    pub pos: GeoPoint,
}

#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkSpec {
    pub a:      NodeId,
    pub b:      NodeId,
    /// Physical length in integer length units (the routing weight).
    pub weight: u64,
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IspSpec {
    pub members:             Vec<NodeId>,
    pub datacenter:          NodeId,
    pub reaction_delay_secs: f64,
    /// Policy identifier from the closed registry set.
    pub normal_policy:       String,
    pub disaster_policy:     String,
    /// Slot demand of the migration transfer started at reaction.
    pub migration_width:     u16,
    /// Datacenter volume to evacuate, Gbit.
    pub migration_gbits:     f64,
}

#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DisasterConfig {
    pub epicenter:  NodeId,
    pub radius_m:   f32,
    pub start_secs: f64,
    pub end_secs:   f64,
    /// Failure-schedule seed, independent of the traffic seed.
    pub seed:       u64,
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrafficSpec {
    /// Play back a materialized request list.
    Replay(Vec<RequestSpec>),
    /// Generate arrivals on the fly.
    Poisson {
        lambda_per_sec:    f64,
        mean_holding_secs: f64,
        /// `(width, weight)` slot-demand distribution.
        widths:            Vec<(u16, f64)>,
        /// Total arrivals to emit before the run winds down.
        count:             u64,
        seed:              u64,
    },
}

#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RequestSpec {
    pub at_secs:      f64,
    pub src:          NodeId,
    pub dst:          NodeId,
    pub width:        u16,
    /// `None` = the request never departs on its own.
    pub holding_secs: Option<f64>,
}

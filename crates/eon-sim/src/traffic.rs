//! Arrival generation.
//!
//! No coroutine machinery: each arrival handler asks the source for the
//! next draw and pushes it back onto the event heap.  Both source kinds
//! are deterministic — a replay list plays back verbatim, and the Poisson
//! generator derives every draw from the traffic seed.

use eon_core::{micros_from_secs_f64, IspId, NodeId, SimRng, SimTime, TrafficClass};

/// One arrival, everything but its `RequestId` — ids are assigned when the
/// arrival is processed, so ascending id equals ascending arrival time even
/// with migration injections in between.
#[derive(Clone, Debug)]
pub struct ArrivalDraw {
    pub src:            NodeId,
    pub dst:            NodeId,
    pub width:          u16,
    pub holding_micros: u64,
    pub class:          TrafficClass,
    pub isp:            IspId,
}

/// Where arrivals come from.
pub enum TrafficSource {
    /// A pre-materialized list (replayable scenarios).
    Replay { list: Vec<(SimTime, ArrivalDraw)>, next: usize },
    /// Poisson arrivals with exponential holding times.
    Poisson(PoissonTraffic),
}

impl TrafficSource {
    /// The next arrival in stream order, if the source has one left.
    ///
    /// Called once when the queue is seeded and then once from every
    /// source-driven arrival handler.
    pub fn next(&mut self) -> Option<(SimTime, ArrivalDraw)> {
        match self {
            TrafficSource::Replay { list, next } => {
                let item = list.get(*next).cloned();
                *next += 1;
                item
            }
            TrafficSource::Poisson(p) => p.next(),
        }
    }
}

/// Seeded Poisson arrival process.
///
/// - inter-arrival gaps ~ Exp(λ)
/// - holding times ~ Exp(1/μ) (mean μ seconds)
/// - slot widths drawn from a weighted table
/// - (src, dst) uniform over ordered pairs of distinct nodes
pub struct PoissonTraffic {
    lambda_per_sec:    f64,
    mean_holding_secs: f64,
    /// `(width, weight)` table for the slot-demand distribution.
    widths:            Vec<(u16, f64)>,
    width_weights:     Vec<f64>,
    /// Node → owning ISP, for stamping the draw's owner.
    node_to_isp:       Vec<IspId>,
    remaining:         u64,
    clock:             SimTime,
    rng:               SimRng,
}

impl PoissonTraffic {
    pub fn new(
        lambda_per_sec:    f64,
        mean_holding_secs: f64,
        widths:            Vec<(u16, f64)>,
        node_to_isp:       Vec<IspId>,
        count:             u64,
        rng:               SimRng,
    ) -> Self {
        let width_weights = widths.iter().map(|&(_, w)| w).collect();
        Self {
            lambda_per_sec,
            mean_holding_secs,
            widths,
            width_weights,
            node_to_isp,
            remaining: count,
            clock: SimTime::ZERO,
            rng,
        }
    }

    fn next(&mut self) -> Option<(SimTime, ArrivalDraw)> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let gap_secs = self.rng.exp(self.lambda_per_sec);
        // Validated positive and finite at the scenario boundary.
        let gap = micros_from_secs_f64(gap_secs).unwrap_or(u64::MAX);
        self.clock = self.clock.offset(gap);

        let n = self.node_to_isp.len();
        let src = self.rng.gen_range(0..n);
        // Uniform over the n-1 other nodes.
        let mut dst = self.rng.gen_range(0..n - 1);
        if dst >= src {
            dst += 1;
        }

        let width = self.widths[self.rng.pick_weighted(&self.width_weights)].0;
        let holding_secs = self.rng.exp(1.0 / self.mean_holding_secs);
        let holding_micros = micros_from_secs_f64(holding_secs).unwrap_or(u64::MAX);

        let draw = ArrivalDraw {
            src:            NodeId(src as u32),
            dst:            NodeId(dst as u32),
            width,
            holding_micros,
            class:          TrafficClass::Datapath,
            isp:            self.node_to_isp[src],
        };
        Some((self.clock, draw))
    }
}

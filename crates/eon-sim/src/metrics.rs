//! Per-run metrics.
//!
//! One `Metrics` value per simulation run, threaded through construction —
//! never a global.  Counters are strictly monotonic; a snapshot can be
//! taken at any instant to support time-series sampling across the
//! disaster interval.

use eon_core::{IspId, SimTime, TrafficClass};
use eon_policy::BlockReason;

/// Monotonic counters for one (ISP, traffic class) pair.
#[derive(Clone, Default, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassCounters {
    pub arrivals:                  u64,
    pub admitted:                  u64,
    pub completed:                 u64,
    pub rerouted:                  u64,
    pub disrupted:                 u64,
    pub blocked_no_path:           u64,
    pub blocked_no_window:         u64,
    pub blocked_no_safe_path:      u64,
    pub blocked_admission_refused: u64,
    /// Gigabits carried by admitted migration transfers
    /// (holding × width × per-slot rate).  Zero for the datapath class.
    pub migration_gbits:           f64,
}

impl ClassCounters {
    pub fn blocked_total(&self) -> u64 {
        self.blocked_no_path
            + self.blocked_no_window
            + self.blocked_no_safe_path
            + self.blocked_admission_refused
    }

    fn blocked_mut(&mut self, reason: BlockReason) -> &mut u64 {
        match reason {
            BlockReason::NoPath           => &mut self.blocked_no_path,
            BlockReason::NoWindow         => &mut self.blocked_no_window,
            BlockReason::NoSafePath       => &mut self.blocked_no_safe_path,
            BlockReason::AdmissionRefused => &mut self.blocked_admission_refused,
        }
    }
}

/// Counters for one ISP, split by class.
#[derive(Clone, Default, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IspCounters {
    pub datapath:  ClassCounters,
    pub migration: ClassCounters,
}

impl IspCounters {
    fn class_mut(&mut self, class: TrafficClass) -> &mut ClassCounters {
        match class {
            TrafficClass::Datapath  => &mut self.datapath,
            TrafficClass::Migration => &mut self.migration,
        }
    }

    pub fn class(&self, class: TrafficClass) -> &ClassCounters {
        match class {
            TrafficClass::Datapath  => &self.datapath,
            TrafficClass::Migration => &self.migration,
        }
    }
}

/// The per-run metrics sink.
pub struct Metrics {
    theta:              u32,
    per_isp:            Vec<IspCounters>,
    admission_refusals: u64,
}

impl Metrics {
    pub fn new(isp_count: usize, theta: u32) -> Self {
        Self {
            theta,
            per_isp: vec![IspCounters::default(); isp_count],
            admission_refusals: 0,
        }
    }

    fn counters(&mut self, isp: IspId, class: TrafficClass) -> &mut ClassCounters {
        self.per_isp[isp.index()].class_mut(class)
    }

    // ── Recording (all monotonic) ─────────────────────────────────────────

    pub fn record_arrival(&mut self, isp: IspId, class: TrafficClass) {
        self.counters(isp, class).arrivals += 1;
    }

    pub fn record_admission(&mut self, isp: IspId, class: TrafficClass, gbits: f64) {
        let c = self.counters(isp, class);
        c.admitted += 1;
        c.migration_gbits += gbits;
    }

    pub fn record_block(&mut self, isp: IspId, class: TrafficClass, reason: BlockReason) {
        *self.counters(isp, class).blocked_mut(reason) += 1;
    }

    pub fn record_completion(&mut self, isp: IspId, class: TrafficClass) {
        self.counters(isp, class).completed += 1;
    }

    pub fn record_reroute(&mut self, isp: IspId, class: TrafficClass) {
        self.counters(isp, class).rerouted += 1;
    }

    pub fn record_disruption(&mut self, isp: IspId, class: TrafficClass) {
        self.counters(isp, class).disrupted += 1;
    }

    /// Fold in admission-control candidate refusals drained from a policy.
    pub fn record_refusals(&mut self, count: u64) {
        self.admission_refusals += count;
    }

    // ── Aggregates ────────────────────────────────────────────────────────

    pub fn isp(&self, isp: IspId) -> &IspCounters {
        &self.per_isp[isp.index()]
    }

    pub fn arrivals_total(&self) -> u64 {
        self.fold(|c| c.arrivals)
    }

    pub fn admitted_total(&self) -> u64 {
        self.fold(|c| c.admitted)
    }

    pub fn blocked_total(&self) -> u64 {
        self.fold(ClassCounters::blocked_total)
    }

    pub fn disrupted_total(&self) -> u64 {
        self.fold(|c| c.disrupted)
    }

    /// Blocked / arrivals over everything; 0 when nothing arrived yet.
    pub fn blocking_probability(&self) -> f64 {
        let arrivals = self.arrivals_total();
        if arrivals == 0 {
            return 0.0;
        }
        self.blocked_total() as f64 / arrivals as f64
    }

    fn fold(&self, f: impl Fn(&ClassCounters) -> u64) -> u64 {
        self.per_isp
            .iter()
            .map(|i| f(&i.datapath) + f(&i.migration))
            .sum()
    }

    /// Immutable copy of every counter at `at`.
    pub fn snapshot(&self, at: SimTime) -> MetricsSnapshot {
        MetricsSnapshot {
            at_secs:            at.as_secs_f64(),
            theta:              self.theta,
            admission_refusals: self.admission_refusals,
            isps:               self.per_isp.clone(),
        }
    }
}

/// A serializable point-in-time copy of the metrics.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricsSnapshot {
    pub at_secs:            f64,
    /// Admission-control free-run threshold of this run.
    pub theta:              u32,
    pub admission_refusals: u64,
    /// Indexed by `IspId`.
    pub isps:               Vec<IspCounters>,
}

//! Simulation observer trait for progress reporting and data collection.

use eon_core::SimTime;

use crate::metrics::{Metrics, MetricsSnapshot};
use crate::request::Request;

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points of the
/// event loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
pub trait SimObserver {
    /// An arrival was routed; `request.status` carries the outcome.
    fn on_outcome(&mut self, _now: SimTime, _request: &Request) {}

    /// An active request lost a resource.  `rerouted` tells whether the
    /// owner's policy found a replacement path.
    fn on_disruption(&mut self, _now: SimTime, _request: &Request, _rerouted: bool) {}

    /// Periodic metrics sample (every `sample_interval_secs`).
    fn on_snapshot(&mut self, _snapshot: &MetricsSnapshot) {}

    /// Called once after the event queue drains.
    fn on_sim_end(&mut self, _now: SimTime, _metrics: &Metrics) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run`
/// but don't want callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

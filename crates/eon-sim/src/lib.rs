//! `eon-sim` — the discrete-event core of the eon elastic-optical-network
//! simulator.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`request`]  | `Request`, `Allocation`, `RequestStatus`                  |
//! | [`isp`]      | `Isp` — policy pair, `Normal → Reacted` state machine     |
//! | [`events`]   | `Event`, `EventQueue` (time, kind rank, FIFO)             |
//! | [`traffic`]  | `TrafficSource` — replay list or Poisson generator        |
//! | [`metrics`]  | `Metrics`, `MetricsSnapshot` — per-run, per-ISP × class   |
//! | [`scenario`] | `Scenario` — the materialized run input                   |
//! | [`builder`]  | `SimBuilder` — validation + assembly                      |
//! | [`sim`]      | `Sim` — the event loop and its handlers                   |
//! | [`observer`] | `SimObserver`, `NoopObserver`                             |
//! | [`error`]    | `SimError`, `SimResult<T>`                                |
//!
//! # Determinism
//!
//! A scenario carries every seed a run consumes (traffic, failure
//! schedule); events at equal timestamps are ordered by kind rank then
//! FIFO.  Two runs of the same scenario therefore produce identical
//! metrics and identical per-request outcomes.

pub mod builder;
pub mod error;
pub mod events;
pub mod isp;
pub mod metrics;
pub mod observer;
pub mod request;
pub mod scenario;
pub mod sim;
pub mod traffic;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use events::{Event, EventQueue};
pub use isp::{Isp, IspPhase};
pub use metrics::{ClassCounters, IspCounters, Metrics, MetricsSnapshot};
pub use observer::{NoopObserver, SimObserver};
pub use request::{Allocation, Request, RequestStatus};
pub use scenario::{
    DisasterConfig, IspSpec, LinkSpec, NodeSpec, RequestSpec, Scenario, TrafficSpec,
    DEFAULT_K_PATHS, DEFAULT_SLOTS_PER_LINK, DEFAULT_SLOT_GBPS, DEFAULT_THETA,
};
pub use sim::Sim;
pub use traffic::{ArrivalDraw, PoissonTraffic, TrafficSource};

//! `eon-core` — foundational types for the eon elastic-optical-network
//! simulator.
//!
//! This crate is a dependency of every other `eon-*` crate.  It intentionally
//! has no `eon-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                            |
//! |------------|-----------------------------------------------------|
//! | [`ids`]    | `NodeId`, `LinkId`, `IspId`, `RequestId`            |
//! | [`time`]   | `SimTime` (µs counter), boundary conversions        |
//! | [`rng`]    | `SimRng` — seeded SmallRng + sampling helpers       |
//! | [`geo`]    | `GeoPoint`, haversine distance                      |
//! | [`demand`] | `Demand`, `TrafficClass`                            |
//! | [`error`]  | `EonError`, `EonResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                    |
//! |---------|-----------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.       |
//!           | Required for scenario persistence and replay.             |

pub mod demand;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use demand::{Demand, TrafficClass};
pub use error::{EonError, EonResult};
pub use geo::GeoPoint;
pub use ids::{IspId, LinkId, NodeId, RequestId};
pub use rng::SimRng;
pub use time::{micros_from_secs_f64, SimTime, MICROS_PER_SEC};

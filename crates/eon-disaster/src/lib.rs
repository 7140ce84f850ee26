//! `eon-disaster` — localized disaster modelling.
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`timeline`] | `DisasterSpec`, `Disaster`, `ResourceFailure`, timeline    |
//! | [`error`]    | `DisasterError`, `DisasterResult<T>`                       |
//!
//! The disaster exists for the whole run but its effects materialize
//! progressively: the scheduler pre-enqueues one event per distinct failure
//! timestamp and calls [`Disaster::advance`] from the handler, so failures
//! become visible before same-instant ISP reactions, departures, and
//! arrivals.

pub mod error;
pub mod timeline;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{DisasterError, DisasterResult};
pub use timeline::{Disaster, DisasterSpec, FailureEvent, ResourceFailure};

//! `eon-net` — fiber graph, spectrum grid, and path catalogue.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`graph`]     | `FiberGraph` (undirected CSR) + builder + R-tree queries  |
//! | [`spectrum`]  | `SpectrumGrid`, `Window`, `SlotRange`                     |
//! | [`path`]      | `Path` — a simple node/link sequence                      |
//! | [`catalogue`] | `PathCatalogue` — Yen's K-shortest, dense per-pair cache  |
//! | [`topology`]  | `Topology` — the facade the scheduler and policies use    |
//!
//! # Design notes
//!
//! All mutation goes through `Topology` in the single scheduler thread;
//! `try_allocate` is the sole admission gate and is atomic within an event
//! handler.  The catalogue is immutable after construction — failures only
//! add filter marks, they never rebuild paths.

pub mod catalogue;
pub mod graph;
pub mod path;
pub mod spectrum;
pub mod topology;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use catalogue::PathCatalogue;
pub use graph::{FiberGraph, FiberGraphBuilder};
pub use path::Path;
pub use spectrum::{SlotRange, SpectrumGrid, Window};
pub use topology::Topology;

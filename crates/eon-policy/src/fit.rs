//! Shared spectrum-fit machinery used by every policy variant.
//!
//! Candidate paths are cloned out of the catalogue before allocation so the
//! borrow of `Topology` can be dropped; paths are a handful of ids each and
//! the catalogue holds at most K of them per pair.

use eon_core::Demand;
use eon_net::{Path, SlotRange, Topology, Window};

use crate::outcome::{BlockReason, Outcome};

/// Window-selection strategy within one path's free runs.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Fit {
    /// Lowest-index window that fits.
    First,
    /// Tightest adequate free run (minimal `len - width`), lowest start on
    /// ties, placed at the run start.  Interior placements are never
    /// candidates — a best-fit window is always anchored against an
    /// occupied neighbor or a boundary.
    Best,
}

/// Pick a window of `width` slots for `path` within `zone`, or `None`.
pub fn pick_window(
    topo:  &Topology,
    path:  &Path,
    width: u16,
    zone:  SlotRange,
    fit:   Fit,
) -> Option<Window> {
    let runs = topo.free_runs(path, zone);
    let adequate = runs.iter().filter(|&&(_, len)| len >= width);
    let run = match fit {
        Fit::First => adequate.min_by_key(|&&(start, _)| start),
        Fit::Best  => adequate.min_by_key(|&&(start, len)| (len - width, start)),
    };
    run.map(|&(start, _)| Window::new(start, width))
}

/// Try each candidate path in order; allocate the first that yields a
/// window.  `no_candidates` is the reason reported when `paths` is empty
/// (`NoPath` for structural emptiness, `NoSafePath` after disaster
/// filtering).
pub fn fit_and_allocate(
    demand:        &Demand,
    topo:          &mut Topology,
    paths:         &[Path],
    zone:          SlotRange,
    fit:           Fit,
    no_candidates: BlockReason,
) -> Outcome {
    if paths.is_empty() {
        return Outcome::Blocked(no_candidates);
    }
    for path in paths {
        if let Some(window) = pick_window(topo, path, demand.width, zone, fit) {
            let ok = topo.try_allocate(path, window);
            debug_assert!(ok, "window vanished between scan and allocate");
            if ok {
                return Outcome::Accepted { path: path.clone(), window };
            }
        }
    }
    Outcome::Blocked(BlockReason::NoWindow)
}

// ── Candidate-path selection ──────────────────────────────────────────────────

/// All catalogued paths for the demand, cloned in catalogue order.
pub fn all_paths(topo: &Topology, demand: &Demand) -> Vec<Path> {
    topo.paths(demand.src, demand.dst).to_vec()
}

/// Catalogued paths that avoid every announced-failed node and link.
pub fn safe_paths(topo: &Topology, demand: &Demand) -> Vec<Path> {
    topo.paths(demand.src, demand.dst)
        .iter()
        .filter(|p| topo.is_usable(p))
        .cloned()
        .collect()
}

/// Catalogued paths whose every node belongs to the owning ISP
/// (`members` is a node-count-sized mask).
pub fn member_paths(topo: &Topology, demand: &Demand, members: &[bool]) -> Vec<Path> {
    topo.paths(demand.src, demand.dst)
        .iter()
        .filter(|p| p.nodes.iter().all(|n| members[n.index()]))
        .cloned()
        .collect()
}

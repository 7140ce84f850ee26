//! Disaster-aware policy variants.
//!
//! All variants here filter the catalogue down to paths that avoid every
//! resource in the announced failure schedule (`Topology::is_usable`).  The
//! schedule is published at the disaster's start, so after an ISP reacts
//! its policy routes around resources that are *going* to fail, not only
//! ones that already have.  Before anything is announced the filter passes
//! everything through, so a disaster-aware policy installed as a normal
//! policy simply behaves like its baseline.

use std::cell::Cell;

use eon_core::{Demand, LinkId};
use eon_net::{Path, SlotRange, Topology, Window};

use crate::baseline::full_zone;
use crate::fit::{fit_and_allocate, member_paths, safe_paths, Fit};
use crate::outcome::{BlockReason, Outcome};
use crate::policy::RoutingPolicy;
use crate::registry::PolicyId;

/// Resolve the block reason for an empty safe-path set: an empty catalogue
/// is structural (`NoPath`); a catalogue emptied by the failure filter is
/// `NoSafePath`.
fn empty_reason(topo: &Topology, demand: &Demand) -> BlockReason {
    if topo.paths(demand.src, demand.dst).is_empty() {
        BlockReason::NoPath
    } else {
        BlockReason::NoSafePath
    }
}

// ── FirstFitDa ────────────────────────────────────────────────────────────────

/// First-fit over disaster-filtered paths.
pub struct FirstFitDa;

impl RoutingPolicy for FirstFitDa {
    fn id(&self) -> PolicyId {
        PolicyId::FirstFitDa
    }

    fn route(&self, demand: &Demand, topo: &mut Topology) -> Outcome {
        let paths = safe_paths(topo, demand);
        let reason = empty_reason(topo, demand);
        let zone = full_zone(topo);
        fit_and_allocate(demand, topo, &paths, zone, Fit::First, reason)
    }
}

// ── BestFitDa ─────────────────────────────────────────────────────────────────

/// Best-fit over disaster-filtered paths.
pub struct BestFitDa;

impl RoutingPolicy for BestFitDa {
    fn id(&self) -> PolicyId {
        PolicyId::BestFitDa
    }

    fn route(&self, demand: &Demand, topo: &mut Topology) -> Outcome {
        let paths = safe_paths(topo, demand);
        let reason = empty_reason(topo, demand);
        let zone = full_zone(topo);
        fit_and_allocate(demand, topo, &paths, zone, Fit::Best, reason)
    }
}

// ── BestFitSwDa ───────────────────────────────────────────────────────────────

/// Disaster filter + ISP spectrum zone + best-fit within the zone.
pub struct BestFitSwDa {
    pub(crate) zone: SlotRange,
}

impl RoutingPolicy for BestFitSwDa {
    fn id(&self) -> PolicyId {
        PolicyId::BestFitSwDa
    }

    fn route(&self, demand: &Demand, topo: &mut Topology) -> Outcome {
        let paths = safe_paths(topo, demand);
        let reason = empty_reason(topo, demand);
        fit_and_allocate(demand, topo, &paths, self.zone, Fit::Best, reason)
    }
}

// ── SubnetDa ──────────────────────────────────────────────────────────────────

/// Subnet restriction + disaster filter; cross-ISP demands use
/// [`FirstFitDa`] over the whole graph.
pub struct SubnetDa {
    pub(crate) zone:    SlotRange,
    pub(crate) members: Vec<bool>,
}

impl RoutingPolicy for SubnetDa {
    fn id(&self) -> PolicyId {
        PolicyId::SubnetDa
    }

    fn route(&self, demand: &Demand, topo: &mut Topology) -> Outcome {
        let intra =
            self.members[demand.src.index()] && self.members[demand.dst.index()];
        if !intra {
            return FirstFitDa.route(demand, topo);
        }

        let member = member_paths(topo, demand, &self.members);
        if member.is_empty() {
            // The subnet filter is structural, not disaster-driven.
            return Outcome::Blocked(BlockReason::NoPath);
        }
        let safe: Vec<Path> = member.into_iter().filter(|p| topo.is_usable(p)).collect();
        if safe.is_empty() {
            return Outcome::Blocked(BlockReason::NoSafePath);
        }
        fit_and_allocate(demand, topo, &safe, self.zone, Fit::First, BlockReason::NoSafePath)
    }
}

// ── DaWithBlocking ────────────────────────────────────────────────────────────

/// Disaster-aware best-fit with migration-shielding admission control.
///
/// A candidate (path, window) is refused when hypothetically occupying it
/// would reduce the total count — over the path's links — of free runs
/// wide enough for a migration by more than θ.  If every candidate is
/// refused, a single second-chance pass of plain disaster-aware best-fit
/// runs so the policy cannot starve the network outright; refusal tallies
/// are drained by the scheduler into the metrics.
pub struct DaWithBlocking {
    pub(crate) theta:           u32,
    pub(crate) migration_width: u16,
    pub(crate) refusals:        Cell<u64>,
}

impl DaWithBlocking {
    pub(crate) fn new(theta: u32, migration_width: u16) -> Self {
        Self { theta, migration_width, refusals: Cell::new(0) }
    }

    /// Net loss of migration-capable free runs across the path's links if
    /// `window` were occupied.  Splitting a huge run in two can make the
    /// count go up, hence the signed result.
    fn migration_run_loss(&self, topo: &Topology, path: &Path, window: Window) -> i64 {
        let m = self.migration_width;
        let mut loss = 0i64;
        for &link in &path.links {
            let before = topo.runs_at_least(link, m) as i64;
            let after = runs_at_least_excluding(topo, link, m, window) as i64;
            loss += before - after;
        }
        loss
    }
}

/// Free runs of length ≥ `min_len` on `link` if `window` were additionally
/// occupied.  `window` is known to be free on the link (it came from the
/// path's free-run intersection), so it splits exactly one run.
fn runs_at_least_excluding(
    topo:    &Topology,
    link:    LinkId,
    min_len: u16,
    window:  Window,
) -> usize {
    let zone = SlotRange::full(topo.slots_per_link());
    topo.grid()
        .free_runs_in(link, zone)
        .iter()
        .flat_map(|&(start, len)| {
            let end = start + len;
            if window.start >= start && window.end() <= end {
                // Split into the fragments left and right of the window.
                [(start, window.start - start), (window.end(), end - window.end())]
            } else {
                [(start, len), (0, 0)]
            }
        })
        .filter(|&(_, len)| len > 0 && len >= min_len)
        .count()
}

impl RoutingPolicy for DaWithBlocking {
    fn id(&self) -> PolicyId {
        PolicyId::DaWithBlocking
    }

    fn route(&self, demand: &Demand, topo: &mut Topology) -> Outcome {
        let safe = safe_paths(topo, demand);
        if safe.is_empty() {
            return Outcome::Blocked(empty_reason(topo, demand));
        }

        let zone = full_zone(topo);
        let mut saw_candidate = false;

        // First pass: best-fit candidate enumeration with the harm check.
        for path in &safe {
            let runs = topo.free_runs(path, zone);
            let mut adequate: Vec<(u16, u16)> = runs
                .into_iter()
                .filter(|&(_, len)| len >= demand.width)
                .collect();
            adequate.sort_unstable_by_key(|&(start, len)| (len - demand.width, start));

            for &(start, _) in &adequate {
                saw_candidate = true;
                let window = Window::new(start, demand.width);
                if self.migration_run_loss(topo, path, window) > self.theta as i64 {
                    self.refusals.set(self.refusals.get() + 1);
                    continue;
                }
                let ok = topo.try_allocate(path, window);
                debug_assert!(ok, "window vanished between scan and allocate");
                if ok {
                    return Outcome::Accepted { path: path.clone(), window };
                }
            }
        }

        if !saw_candidate {
            return Outcome::Blocked(BlockReason::NoWindow);
        }

        // Second chance: every candidate was refused — fall back to plain
        // disaster-aware best-fit rather than starve the demand class.
        match fit_and_allocate(demand, topo, &safe, zone, Fit::Best, BlockReason::NoSafePath) {
            Outcome::Accepted { path, window } => Outcome::Accepted { path, window },
            // Unreachable in practice (the fallback scans the same windows),
            // but keep the honest reason if it ever fires.
            Outcome::Blocked(_) => Outcome::Blocked(BlockReason::AdmissionRefused),
        }
    }

    fn take_refusals(&self) -> u64 {
        self.refusals.replace(0)
    }
}

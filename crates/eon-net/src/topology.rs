//! The `Topology` facade: graph + spectrum grid + path catalogue + failure
//! marks, with the one and only admission gate.
//!
//! # Failure vs. announcement
//!
//! A resource can be in two distinct bad states:
//!
//! - **announced** — it appears in the disaster's published failure
//!   schedule.  Disaster-aware policies consult [`is_usable`](Topology::is_usable)
//!   to route around announced resources *before* they physically fail.
//! - **failed** — the failure has actually occurred.  From that instant
//!   [`try_allocate`](Topology::try_allocate) refuses any path crossing it,
//!   for every policy.
//!
//! `fail_*` implies announced; `announce_*` does not imply failed.  Both
//! marks are monotone within a run.
//!
//! # Invariants
//!
//! - At any instant, every (link, slot) pair is occupied by at most one
//!   active allocation; [`try_allocate`](Topology::try_allocate) is atomic —
//!   either every slot of the window on every link is taken, or nothing is.
//! - [`release`](Topology::release) of slots not held by an allocation is a
//!   fatal invariant error, never silently absorbed.
//! - Physical failure does NOT auto-release existing allocations;
//!   disruption accounting is the disaster component's job.

use eon_core::{EonResult, LinkId, NodeId};

use crate::catalogue::PathCatalogue;
use crate::graph::FiberGraph;
use crate::path::Path;
use crate::spectrum::{SlotRange, SpectrumGrid, Window};

pub struct Topology {
    graph:           FiberGraph,
    grid:            SpectrumGrid,
    catalogue:       PathCatalogue,
    failed_nodes:    Vec<bool>,
    failed_links:    Vec<bool>,
    announced_nodes: Vec<bool>,
    announced_links: Vec<bool>,
}

impl Topology {
    /// Build a topology with `slots_per_link` slots on every link and a
    /// dense K-shortest-path catalogue.
    pub fn new(graph: FiberGraph, slots_per_link: u16, k: usize) -> Self {
        let catalogue = PathCatalogue::build(&graph, k);
        let grid = SpectrumGrid::new(graph.link_count(), slots_per_link);
        let failed_nodes = vec![false; graph.node_count()];
        let failed_links = vec![false; graph.link_count()];
        let announced_nodes = failed_nodes.clone();
        let announced_links = failed_links.clone();
        Self {
            graph,
            grid,
            catalogue,
            failed_nodes,
            failed_links,
            announced_nodes,
            announced_links,
        }
    }

    // ── Read access ───────────────────────────────────────────────────────

    #[inline]
    pub fn graph(&self) -> &FiberGraph {
        &self.graph
    }

    #[inline]
    pub fn grid(&self) -> &SpectrumGrid {
        &self.grid
    }

    #[inline]
    pub fn slots_per_link(&self) -> u16 {
        self.grid.slots_per_link()
    }

    /// Catalogued paths for the pair, shortest first.  Never recomputed;
    /// empty for `src == dst` or a disconnected pair.
    #[inline]
    pub fn paths(&self, src: NodeId, dst: NodeId) -> &[Path] {
        self.catalogue.k_shortest(src, dst)
    }

    /// Weight of the best catalogued path between two nodes, `None` when
    /// disconnected.  `Some(0)` for `a == b`.
    pub fn graph_distance(&self, a: NodeId, b: NodeId) -> Option<u64> {
        if a == b {
            return Some(0);
        }
        self.paths(a, b).first().map(|p| p.weight)
    }

    // ── Failure and announcement marks ────────────────────────────────────

    #[inline]
    pub fn node_failed(&self, node: NodeId) -> bool {
        self.failed_nodes[node.index()]
    }

    #[inline]
    pub fn link_failed(&self, link: LinkId) -> bool {
        self.failed_links[link.index()]
    }

    /// Mark a node physically failed (implies announced).
    pub fn fail_node(&mut self, node: NodeId) {
        self.failed_nodes[node.index()] = true;
        self.announced_nodes[node.index()] = true;
    }

    /// Mark a link physically failed (implies announced).
    pub fn fail_link(&mut self, link: LinkId) {
        self.failed_links[link.index()] = true;
        self.announced_links[link.index()] = true;
    }

    /// Publish a node in the failure schedule without failing it yet.
    pub fn announce_node(&mut self, node: NodeId) {
        self.announced_nodes[node.index()] = true;
    }

    /// Publish a link in the failure schedule without failing it yet.
    pub fn announce_link(&mut self, link: LinkId) {
        self.announced_links[link.index()] = true;
    }

    /// `true` iff no resource of `path` is announced (or already failed).
    /// This is the disaster-aware path filter.
    pub fn is_usable(&self, path: &Path) -> bool {
        path.nodes.iter().all(|&n| !self.announced_nodes[n.index()])
            && path.links.iter().all(|&l| !self.announced_links[l.index()])
    }

    /// `true` iff no resource of `path` has physically failed.  A doomed
    /// (announced) path is still intact until its failure instant; oblivious
    /// policies keep allocating on it.
    pub fn is_intact(&self, path: &Path) -> bool {
        path.nodes.iter().all(|&n| !self.failed_nodes[n.index()])
            && path.links.iter().all(|&l| !self.failed_links[l.index()])
    }

    // ── Spectrum operations ───────────────────────────────────────────────

    /// Atomically occupy `window` on every link of `path`.
    ///
    /// Returns `false` — leaving the grid untouched — if any slot of the
    /// window is taken on any link, or if the path crosses a physically
    /// failed resource.  This is the sole admission gate: a `true` return
    /// IS the allocation.
    pub fn try_allocate(&mut self, path: &Path, window: Window) -> bool {
        if !self.is_intact(path) {
            return false;
        }
        if !path.links.iter().all(|&l| self.grid.window_free(l, window)) {
            return false;
        }
        for &link in &path.links {
            self.grid.occupy(link, window);
        }
        true
    }

    /// Free `window` on every link of `path`.
    ///
    /// The slots must have been occupied by this exact allocation; a free
    /// slot encountered mid-release is a fatal invariant error.
    pub fn release(&mut self, path: &Path, window: Window) -> EonResult<()> {
        for &link in &path.links {
            self.grid.clear(link, window)?;
        }
        Ok(())
    }

    // ── Policy support ────────────────────────────────────────────────────

    /// Maximal runs of slots free on EVERY link of `path` within `zone` —
    /// the spectrum-continuity intersection the fit strategies scan.
    ///
    /// Returns no runs for a physically broken path: a policy that does not
    /// filter announced failures simply finds no window there and moves on.
    pub fn free_runs(&self, path: &Path, zone: SlotRange) -> Vec<(u16, u16)> {
        if !self.is_intact(path) || path.links.is_empty() {
            return vec![];
        }
        let mut runs = Vec::new();
        let mut run_start = None;
        for s in zone.start..zone.end {
            let free = path.links.iter().all(|&l| !self.grid.is_occupied(l, s));
            match (free, run_start) {
                (true, None)         => run_start = Some(s),
                (false, Some(start)) => {
                    runs.push((start, s - start));
                    run_start = None;
                }
                _ => {}
            }
        }
        if let Some(start) = run_start {
            runs.push((start, zone.end - start));
        }
        runs
    }

    /// Count of free runs of length ≥ `min_len` on a single link, whole
    /// grid.  Used by migration-shielding admission control.
    #[inline]
    pub fn runs_at_least(&self, link: LinkId, min_len: u16) -> usize {
        self.grid
            .runs_at_least(link, min_len, SlotRange::full(self.grid.slots_per_link()))
    }
}

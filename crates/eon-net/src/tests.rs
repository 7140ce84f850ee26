//! Unit tests for eon-net.

use eon_core::{GeoPoint, LinkId, NodeId};

use crate::{FiberGraph, FiberGraphBuilder, SlotRange, SpectrumGrid, Topology, Window};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Linear chain 0-1-2 with unit weights.
fn chain3() -> FiberGraph {
    let mut b = FiberGraphBuilder::new();
    let a = b.add_node(GeoPoint::new(40.0, -100.0));
    let m = b.add_node(GeoPoint::new(40.0, -99.0));
    let c = b.add_node(GeoPoint::new(40.0, -98.0));
    b.add_link(a, m, 1);
    b.add_link(m, c, 1);
    b.build()
}

/// The 4-node diamond: A-B=1, A-C=1, B-D=1, C-D=1, B-C=3.
fn diamond() -> FiberGraph {
    let mut b = FiberGraphBuilder::new();
    let a = b.add_node(GeoPoint::new(40.0, -100.0));
    let bb = b.add_node(GeoPoint::new(41.0, -100.0));
    let c = b.add_node(GeoPoint::new(39.0, -100.0));
    let d = b.add_node(GeoPoint::new(40.0, -99.0));
    b.add_link(a, bb, 1);
    b.add_link(a, c, 1);
    b.add_link(bb, d, 1);
    b.add_link(c, d, 1);
    b.add_link(bb, c, 3);
    b.build()
}

fn node_seq(path: &crate::Path) -> Vec<u32> {
    path.nodes.iter().map(|n| n.0).collect()
}

// ── FiberGraph ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod graph {
    use super::*;

    #[test]
    fn csr_adjacency() {
        let g = chain3();
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.link_count(), 2);
        assert_eq!(g.degree(NodeId(0)), 1);
        assert_eq!(g.degree(NodeId(1)), 2);

        // Middle node sees both neighbors in ascending order.
        let n: Vec<_> = g.neighbors(NodeId(1)).collect();
        assert_eq!(n, vec![(NodeId(0), LinkId(0)), (NodeId(2), LinkId(1))]);
    }

    #[test]
    fn link_ids_keep_insertion_order() {
        let g = diamond();
        assert_eq!(g.link_endpoints(LinkId(0)), (NodeId(0), NodeId(1)));
        assert_eq!(g.link_endpoints(LinkId(4)), (NodeId(1), NodeId(2)));
        assert_eq!(g.link_weight(LinkId(4)), 3);
    }

    #[test]
    fn radius_query_sorted_by_distance() {
        let mut b = FiberGraphBuilder::new();
        let center = b.add_node(GeoPoint::new(40.0, -100.0));
        let near   = b.add_node(GeoPoint::new(40.3, -100.0)); // ~33 km
        let far    = b.add_node(GeoPoint::new(41.0, -100.0)); // ~111 km
        b.add_link(center, near, 1);
        b.add_link(near, far, 1);
        let g = b.build();

        let hits = g.nodes_within_radius(GeoPoint::new(40.0, -100.0), 50_000.0);
        assert_eq!(hits, vec![center, near]);

        let all = g.nodes_within_radius(GeoPoint::new(40.0, -100.0), 200_000.0);
        assert_eq!(all, vec![center, near, far]);
    }

    #[test]
    fn links_touching_mask() {
        let g = chain3();
        // Only the middle node flagged: both links touch it.
        let links = g.links_touching(&[false, true, false]);
        assert_eq!(links, vec![LinkId(0), LinkId(1)]);

        let links = g.links_touching(&[true, false, false]);
        assert_eq!(links, vec![LinkId(0)]);
    }
}

// ── SpectrumGrid ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod spectrum {
    use super::*;

    #[test]
    fn occupy_and_clear() {
        let mut grid = SpectrumGrid::new(2, 8);
        let w = Window::new(2, 3);
        assert!(grid.window_free(LinkId(0), w));
        grid.occupy(LinkId(0), w);
        assert!(!grid.window_free(LinkId(0), w));
        assert!(grid.is_occupied(LinkId(0), 2));
        assert!(!grid.is_occupied(LinkId(0), 5));
        // The other link is untouched.
        assert!(grid.window_free(LinkId(1), w));

        grid.clear(LinkId(0), w).unwrap();
        assert!(grid.window_free(LinkId(0), w));
        assert_eq!(grid.occupied_slots(), 0);
    }

    #[test]
    fn clear_of_free_slot_is_invariant_error() {
        let mut grid = SpectrumGrid::new(1, 8);
        grid.occupy(LinkId(0), Window::new(0, 2));
        // Window [1, 3) includes free slot 2.
        let err = grid.clear(LinkId(0), Window::new(1, 2));
        assert!(err.is_err());
        // Nothing was cleared by the failed call.
        assert!(grid.is_occupied(LinkId(0), 0));
        assert!(grid.is_occupied(LinkId(0), 1));
    }

    #[test]
    fn free_runs() {
        let mut grid = SpectrumGrid::new(1, 8);
        grid.occupy(LinkId(0), Window::new(0, 2)); // 0..2 taken
        grid.occupy(LinkId(0), Window::new(6, 2)); // 6..8 taken
        let runs = grid.free_runs_in(LinkId(0), SlotRange::full(8));
        assert_eq!(runs, vec![(2, 4)]);

        assert_eq!(grid.runs_at_least(LinkId(0), 4, SlotRange::full(8)), 1);
        assert_eq!(grid.runs_at_least(LinkId(0), 5, SlotRange::full(8)), 0);
    }

    #[test]
    fn free_runs_respect_zone() {
        let mut grid = SpectrumGrid::new(1, 16);
        grid.occupy(LinkId(0), Window::new(4, 2));
        let runs = grid.free_runs_in(LinkId(0), SlotRange::new(0, 8));
        assert_eq!(runs, vec![(0, 4), (6, 2)]);
        let runs = grid.free_runs_in(LinkId(0), SlotRange::new(8, 16));
        assert_eq!(runs, vec![(8, 8)]);
    }

    #[test]
    fn wide_grid_crosses_word_boundary() {
        let mut grid = SpectrumGrid::new(1, 128);
        let w = Window::new(60, 10); // spans the 64-bit word seam
        grid.occupy(LinkId(0), w);
        assert!(grid.is_occupied(LinkId(0), 63));
        assert!(grid.is_occupied(LinkId(0), 64));
        assert_eq!(grid.occupied_slots(), 10);
        grid.clear(LinkId(0), w).unwrap();
        assert_eq!(grid.occupied_slots(), 0);
    }
}

// ── PathCatalogue ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod catalogue {
    use super::*;
    use crate::PathCatalogue;

    #[test]
    fn diamond_k3_order() {
        // k_shortest(A, D) = [A-B-D, A-C-D, A-B-C-D]: the weight-2 pair is
        // ordered lexicographically, and so is the weight-5 pair (A-B-C-D
        // beats A-C-B-D).
        let g = diamond();
        let cat = PathCatalogue::build(&g, 3);
        let paths = cat.k_shortest(NodeId(0), NodeId(3));
        assert_eq!(paths.len(), 3);
        assert_eq!(node_seq(&paths[0]), vec![0, 1, 3]);
        assert_eq!(node_seq(&paths[1]), vec![0, 2, 3]);
        assert_eq!(node_seq(&paths[2]), vec![0, 1, 2, 3]);
        assert_eq!(paths[0].weight, 2);
        assert_eq!(paths[1].weight, 2);
        assert_eq!(paths[2].weight, 5);
    }

    #[test]
    fn paths_carry_consistent_links() {
        let g = diamond();
        let cat = PathCatalogue::build(&g, 3);
        for p in cat.k_shortest(NodeId(0), NodeId(3)) {
            assert_eq!(p.nodes.len(), p.links.len() + 1);
            for (i, &l) in p.links.iter().enumerate() {
                let (a, b) = g.link_endpoints(l);
                let (x, y) = (p.nodes[i], p.nodes[i + 1]);
                assert!((a, b) == (x, y) || (a, b) == (y, x));
            }
            let w: u64 = p.links.iter().map(|&l| g.link_weight(l)).sum();
            assert_eq!(w, p.weight);
        }
    }

    #[test]
    fn same_node_is_empty() {
        let g = chain3();
        let cat = PathCatalogue::build(&g, 5);
        assert!(cat.k_shortest(NodeId(1), NodeId(1)).is_empty());
    }

    #[test]
    fn disconnected_pair_is_empty() {
        let mut b = FiberGraphBuilder::new();
        let a = b.add_node(GeoPoint::new(40.0, -100.0));
        let c = b.add_node(GeoPoint::new(40.0, -99.0));
        let _lone = b.add_node(GeoPoint::new(40.0, -98.0));
        b.add_link(a, c, 1);
        let g = b.build();
        let cat = PathCatalogue::build(&g, 5);
        assert!(cat.k_shortest(NodeId(0), NodeId(2)).is_empty());
        assert_eq!(cat.k_shortest(NodeId(0), NodeId(1)).len(), 1);
    }

    #[test]
    fn fewer_than_k_paths_exist() {
        let g = chain3();
        let cat = PathCatalogue::build(&g, 5);
        // Only one loopless path across a chain.
        assert_eq!(cat.k_shortest(NodeId(0), NodeId(2)).len(), 1);
    }
}

// ── Topology ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod topology {
    use super::*;

    fn chain_topology(slots: u16) -> Topology {
        Topology::new(chain3(), slots, 3)
    }

    /// The single catalogued path 0-1-2.
    fn through_path(topo: &Topology) -> crate::Path {
        topo.paths(NodeId(0), NodeId(2))[0].clone()
    }

    #[test]
    fn allocate_spans_every_link() {
        let mut topo = chain_topology(8);
        let p = through_path(&topo);
        let w = Window::new(0, 2);
        assert!(topo.try_allocate(&p, w));
        // Same window on both links, per spectrum continuity.
        assert!(topo.grid().is_occupied(LinkId(0), 0));
        assert!(topo.grid().is_occupied(LinkId(1), 1));
        assert_eq!(topo.grid().occupied_slots(), 4);
    }

    #[test]
    fn allocate_is_atomic_on_conflict() {
        let mut topo = chain_topology(8);
        let p = through_path(&topo);
        // Occupy slot 1 on the second link only, via the one-hop path 1-2.
        let tail = topo.paths(NodeId(1), NodeId(2))[0].clone();
        assert!(topo.try_allocate(&tail, Window::new(1, 1)));

        // 0..2 collides on link 1; link 0 must remain untouched.
        assert!(!topo.try_allocate(&p, Window::new(0, 2)));
        assert!(!topo.grid().is_occupied(LinkId(0), 0));
        assert!(!topo.grid().is_occupied(LinkId(0), 1));
    }

    #[test]
    fn release_then_reallocate_is_noop() {
        let mut topo = chain_topology(8);
        let p = through_path(&topo);
        let w = Window::new(3, 2);
        assert!(topo.try_allocate(&p, w));
        let occupied = topo.grid().occupied_slots();
        topo.release(&p, w).unwrap();
        assert!(topo.try_allocate(&p, w));
        assert_eq!(topo.grid().occupied_slots(), occupied);
    }

    #[test]
    fn release_unheld_is_invariant_error() {
        let mut topo = chain_topology(8);
        let p = through_path(&topo);
        assert!(topo.release(&p, Window::new(0, 1)).is_err());
    }

    #[test]
    fn failed_link_blocks_allocation() {
        let mut topo = chain_topology(8);
        let p = through_path(&topo);
        topo.fail_link(LinkId(1));
        assert!(!topo.is_usable(&p));
        assert!(!topo.try_allocate(&p, Window::new(0, 1)));
        // The one-hop path over the healthy link still works.
        let head = topo.paths(NodeId(0), NodeId(1))[0].clone();
        assert!(topo.try_allocate(&head, Window::new(0, 1)));
    }

    #[test]
    fn announced_link_is_unusable_but_still_intact() {
        // Pre-disaster planning: a link in the published failure schedule
        // is filtered by disaster-aware policies (is_usable) but remains
        // allocatable (try_allocate) until it physically fails.
        let mut topo = chain_topology(8);
        let p = through_path(&topo);
        topo.announce_link(LinkId(1));
        assert!(!topo.is_usable(&p));
        assert!(topo.is_intact(&p));
        assert!(topo.try_allocate(&p, Window::new(0, 1)));
        assert!(!topo.link_failed(LinkId(1)));

        // The physical failure then flips is_intact too.
        topo.fail_link(LinkId(1));
        assert!(!topo.is_intact(&p));
    }

    #[test]
    fn failed_node_blocks_paths_through_it() {
        let mut topo = chain_topology(8);
        let p = through_path(&topo);
        topo.fail_node(NodeId(1));
        assert!(!topo.is_usable(&p));
        assert!(!topo.try_allocate(&p, Window::new(0, 1)));
    }

    #[test]
    fn failure_does_not_release_existing_allocation() {
        let mut topo = chain_topology(8);
        let p = through_path(&topo);
        assert!(topo.try_allocate(&p, Window::new(0, 2)));
        topo.fail_link(LinkId(1));
        // Slots stay occupied until the disaster accounting releases them.
        assert_eq!(topo.grid().occupied_slots(), 4);
    }

    #[test]
    fn free_runs_are_the_continuity_intersection() {
        let mut topo = chain_topology(8);
        let p = through_path(&topo);
        // Slot 0 taken on link 1 only; slot 5 taken on link 0 only.
        let head = topo.paths(NodeId(0), NodeId(1))[0].clone();
        let tail = topo.paths(NodeId(1), NodeId(2))[0].clone();
        assert!(topo.try_allocate(&tail, Window::new(0, 1)));
        assert!(topo.try_allocate(&head, Window::new(5, 1)));

        let runs = topo.free_runs(&p, SlotRange::full(8));
        assert_eq!(runs, vec![(1, 4), (6, 2)]);
    }

    #[test]
    fn graph_distance() {
        let topo = Topology::new(diamond(), 8, 3);
        assert_eq!(topo.graph_distance(NodeId(0), NodeId(3)), Some(2));
        assert_eq!(topo.graph_distance(NodeId(0), NodeId(0)), Some(0));
    }
}

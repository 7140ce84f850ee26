//! K-shortest-path catalogue.
//!
//! # Algorithm
//!
//! Yen's K-shortest loopless paths with Dijkstra as the inner shortest-path
//! routine, edge cost = physical link weight.  The catalogue is dense: built
//! once for every ordered (src, dst) pair at topology construction, and
//! never mutated afterwards — disaster-aware policies filter stale paths at
//! routing time instead of recomputing.
//!
//! # Determinism
//!
//! Equal-weight candidate paths are ordered by their node-id sequence
//! (lexicographic), so catalogue order is a pure function of the graph.
//! The Dijkstra heap breaks cost ties by `NodeId` as a secondary key.

use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap};

use eon_core::{LinkId, NodeId};

use crate::graph::FiberGraph;
use crate::path::Path;

/// Pre-computed K-shortest simple paths for every ordered node pair.
pub struct PathCatalogue {
    k:          usize,
    node_count: usize,
    /// Dense table indexed by `src * node_count + dst`.
    table:      Vec<Vec<Path>>,
}

impl PathCatalogue {
    pub const DEFAULT_K: usize = 5;

    /// Compute the catalogue for all O(|V|²) pairs.
    ///
    /// Acceptable for research-scale topologies (tens of nodes); larger
    /// graphs would memoize per pair on first query instead.
    pub fn build(graph: &FiberGraph, k: usize) -> Self {
        let n = graph.node_count();
        let mut table = Vec::with_capacity(n * n);
        for src in 0..n {
            for dst in 0..n {
                table.push(yen(graph, NodeId(src as u32), NodeId(dst as u32), k));
            }
        }
        Self { k, node_count: n, table }
    }

    #[inline]
    pub fn k(&self) -> usize {
        self.k
    }

    /// Up to K loopless paths from `src` to `dst`, ascending by weight.
    ///
    /// Empty when `src == dst` or the pair is disconnected.
    #[inline]
    pub fn k_shortest(&self, src: NodeId, dst: NodeId) -> &[Path] {
        &self.table[src.index() * self.node_count + dst.index()]
    }
}

// ── Yen's algorithm ───────────────────────────────────────────────────────────

/// Candidate key: ordering by (weight, node sequence) implements the
/// deterministic tie-break; the link list rides along for reconstruction.
type Candidate = (u64, Vec<NodeId>, Vec<LinkId>);

fn yen(graph: &FiberGraph, src: NodeId, dst: NodeId, k: usize) -> Vec<Path> {
    if src == dst || k == 0 {
        return vec![];
    }

    let n = graph.node_count();
    let mut banned_nodes = vec![false; n];
    let mut banned_links = vec![false; graph.link_count()];

    let Some(first) = dijkstra(graph, src, dst, &banned_nodes, &banned_links) else {
        return vec![];
    };

    let mut found = vec![first];
    let mut candidates: BTreeSet<Candidate> = BTreeSet::new();

    while found.len() < k {
        let prev = found.last().unwrap().clone();

        // One spur attempt per node of the previous path (except dst).
        for i in 0..prev.nodes.len() - 1 {
            let spur_node = prev.nodes[i];
            let root_nodes = &prev.nodes[..=i];

            banned_nodes.fill(false);
            banned_links.fill(false);

            // Ban the next link of every found path sharing this root, so
            // the spur must deviate here.
            for p in &found {
                if p.nodes.len() > i + 1 && p.nodes[..=i] == *root_nodes {
                    banned_links[p.links[i].index()] = true;
                }
            }
            // Ban root nodes (except the spur node) to keep paths loopless.
            for &node in &prev.nodes[..i] {
                banned_nodes[node.index()] = true;
            }

            if let Some(spur) = dijkstra(graph, spur_node, dst, &banned_nodes, &banned_links) {
                let root_weight: u64 =
                    prev.links[..i].iter().map(|&l| graph.link_weight(l)).sum();

                let mut nodes = root_nodes.to_vec();
                nodes.extend_from_slice(&spur.nodes[1..]);
                let mut links = prev.links[..i].to_vec();
                links.extend_from_slice(&spur.links);

                candidates.insert((root_weight + spur.weight, nodes, links));
            }
        }

        // Promote the best unseen candidate.
        let mut promoted = false;
        while let Some(cand) = candidates.pop_first() {
            let (weight, nodes, links) = cand;
            if found.iter().any(|p| p.nodes == nodes) {
                continue; // regenerated an already-promoted path
            }
            found.push(Path { nodes, links, weight });
            promoted = true;
            break;
        }
        if !promoted {
            break; // fewer than k loopless paths exist
        }
    }

    found
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

/// Shortest path avoiding banned nodes and links.  `src` itself is never
/// considered banned.  Returns `None` if `dst` is unreachable.
fn dijkstra(
    graph:        &FiberGraph,
    src:          NodeId,
    dst:          NodeId,
    banned_nodes: &[bool],
    banned_links: &[bool],
) -> Option<Path> {
    let n = graph.node_count();
    // dist[v] = best known cost to reach v.
    let mut dist = vec![u64::MAX; n];
    // prev[v] = (prior node, link taken); reconstruction walks this back.
    let mut prev = vec![(NodeId::INVALID, LinkId::INVALID); n];

    dist[src.index()] = 0;

    // Min-heap: Reverse makes BinaryHeap (max) behave as min-heap.
    // Secondary key NodeId ensures deterministic tie-breaking.
    let mut heap: BinaryHeap<Reverse<(u64, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((0, src)));

    while let Some(Reverse((cost, node))) = heap.pop() {
        if node == dst {
            return Some(reconstruct(&prev, src, dst, cost));
        }

        // Skip stale heap entries.
        if cost > dist[node.index()] {
            continue;
        }

        for (neighbor, link) in graph.neighbors(node) {
            if banned_links[link.index()] || banned_nodes[neighbor.index()] {
                continue;
            }
            let new_cost = cost.saturating_add(graph.link_weight(link));
            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev[neighbor.index()] = (node, link);
                heap.push(Reverse((new_cost, neighbor)));
            }
        }
    }

    None
}

fn reconstruct(
    prev:   &[(NodeId, LinkId)],
    src:    NodeId,
    dst:    NodeId,
    weight: u64,
) -> Path {
    let mut nodes = vec![dst];
    let mut links = Vec::new();
    let mut cur = dst;
    while cur != src {
        let (p, l) = prev[cur.index()];
        links.push(l);
        nodes.push(p);
        cur = p;
    }
    nodes.reverse();
    links.reverse();
    Path { nodes, links, weight }
}

//! Fiber graph representation and builder.
//!
//! # Data layout
//!
//! The graph is undirected but stored as **Compressed Sparse Row (CSR)**
//! adjacency over both traversal directions.  Given a `NodeId n`, its
//! adjacency entries occupy:
//!
//! ```text
//! adj_node[ adj_start[n] .. adj_start[n+1] ]   // neighbor of each entry
//! adj_link[ adj_start[n] .. adj_start[n+1] ]   // link of each entry
//! ```
//!
//! Both directions of a fiber share one `LinkId`; link-indexed arrays
//! (`link_a`, `link_b`, `link_weight`) are in insertion order, and the
//! spectrum grid is indexed by the same `LinkId`.  Iteration over a node's
//! neighbors is a contiguous memory scan — ideal for Dijkstra's inner loop.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps `(lat, lon)` to `NodeId`.  Used by the
//! disaster component to find every node inside the damage radius.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use eon_core::{GeoPoint, LinkId, NodeId};

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree spatial index: a 2-D `[lat, lon]` point with
/// the associated `NodeId`.
#[derive(Clone)]
struct NodeEntry {
    point: [f32; 2], // [lat, lon]
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared Euclidean distance in lat/lon space.  Only used as a coarse
    /// envelope filter; the exact haversine check happens afterwards.
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

// ── FiberGraph ────────────────────────────────────────────────────────────────

/// Undirected weighted fiber graph in CSR format plus a spatial index.
///
/// Do not construct directly; use [`FiberGraphBuilder`].
pub struct FiberGraph {
    /// Geographic position of each node.  Indexed by `NodeId`.
    node_pos: Vec<GeoPoint>,

    /// CSR row pointer.  Adjacency entries of node `n` are at
    /// `adj_start[n] .. adj_start[n+1]`.  Length = `node_count + 1`.
    adj_start: Vec<u32>,

    /// Neighbor node of each adjacency entry.
    adj_node: Vec<NodeId>,

    /// Link traversed by each adjacency entry.
    adj_link: Vec<LinkId>,

    // ── Link data (indexed by LinkId = insertion order) ───────────────────
    link_a: Vec<NodeId>,
    link_b: Vec<NodeId>,
    /// Physical length in integer length units.  Dijkstra edge cost.
    link_weight: Vec<u64>,

    spatial_idx: RTree<NodeEntry>,
}

impl FiberGraph {
    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn link_count(&self) -> usize {
        self.link_weight.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn node_pos(&self, node: NodeId) -> GeoPoint {
        self.node_pos[node.index()]
    }

    /// The two endpoints of a link, in insertion order.
    #[inline]
    pub fn link_endpoints(&self, link: LinkId) -> (NodeId, NodeId) {
        (self.link_a[link.index()], self.link_b[link.index()])
    }

    #[inline]
    pub fn link_weight(&self, link: LinkId) -> u64 {
        self.link_weight[link.index()]
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over `(neighbor, link)` pairs of `node`, in ascending
    /// neighbor order (deterministic relaxation order for Dijkstra).
    ///
    /// This is a contiguous index range — no heap allocation.
    #[inline]
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = (NodeId, LinkId)> + '_ {
        let start = self.adj_start[node.index()] as usize;
        let end   = self.adj_start[node.index() + 1] as usize;
        (start..end).map(|i| (self.adj_node[i], self.adj_link[i]))
    }

    /// Degree of `node` (number of incident links).
    #[inline]
    pub fn degree(&self, node: NodeId) -> usize {
        let start = self.adj_start[node.index()] as usize;
        let end   = self.adj_start[node.index() + 1] as usize;
        end - start
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Every node within `radius_m` metres of `center`, sorted by ascending
    /// haversine distance (ties by ascending id).
    ///
    /// The R-tree envelope query uses a conservative degree bound (valid up
    /// to ~60° latitude); candidates are then filtered exactly.
    pub fn nodes_within_radius(&self, center: GeoPoint, radius_m: f32) -> Vec<NodeId> {
        // 1 degree of longitude ≥ ~55.7 km at |lat| ≤ 60°.
        let deg = radius_m / 55_000.0;
        let mut hits: Vec<(u64, NodeId)> = self
            .spatial_idx
            .locate_within_distance([center.lat, center.lon], deg * deg)
            .filter_map(|e| {
                let d = self.node_pos[e.id.index()].great_circle_m(center);
                (d <= radius_m).then_some((d as u64, e.id))
            })
            .collect();
        hits.sort_unstable();
        hits.into_iter().map(|(_, id)| id).collect()
    }

    /// Every link with at least one endpoint flagged in `nodes`
    /// (a node-count-sized mask), in ascending `LinkId` order.
    pub fn links_touching(&self, nodes: &[bool]) -> Vec<LinkId> {
        (0..self.link_count())
            .filter(|&i| nodes[self.link_a[i].index()] || nodes[self.link_b[i].index()])
            .map(|i| LinkId(i as u32))
            .collect()
    }
}

// ── FiberGraphBuilder ─────────────────────────────────────────────────────────

/// Construct a [`FiberGraph`] incrementally, then call [`build`](Self::build).
///
/// Nodes and links may be added in any order.  `build()` sorts adjacency
/// entries, constructs the CSR arrays, and bulk-loads the R-tree.  `LinkId`s
/// are assigned in insertion order and survive the build unchanged.
///
/// # Example
///
/// ```
/// use eon_core::GeoPoint;
/// use eon_net::FiberGraphBuilder;
///
/// let mut b = FiberGraphBuilder::new();
/// let a = b.add_node(GeoPoint::new(40.71, -74.00));
/// let c = b.add_node(GeoPoint::new(41.88, -87.63));
/// b.add_link(a, c, 1_145);
/// let g = b.build();
/// assert_eq!(g.node_count(), 2);
/// assert_eq!(g.link_count(), 1);
/// assert_eq!(g.neighbors(a).count(), 1);
/// ```
pub struct FiberGraphBuilder {
    nodes: Vec<GeoPoint>,
    links: Vec<(NodeId, NodeId, u64)>,
}

impl FiberGraphBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new(), links: Vec::new() }
    }

    pub fn with_capacity(nodes: usize, links: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            links: Vec::with_capacity(links),
        }
    }

    /// Add a node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, pos: GeoPoint) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        id
    }

    /// Add an undirected fiber between `a` and `b` with the given physical
    /// length (integer length units, the Dijkstra cost).
    ///
    /// Self-loops are rejected by debug assertion; parallel links are not
    /// supported by the path catalogue and should not be added.
    pub fn add_link(&mut self, a: NodeId, b: NodeId, weight: u64) -> LinkId {
        debug_assert_ne!(a, b, "self-loop fiber");
        let id = LinkId(self.links.len() as u32);
        self.links.push((a, b, weight));
        id
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn link_count(&self) -> usize { self.links.len() }

    /// Consume the builder and produce a [`FiberGraph`].
    ///
    /// Time complexity: O(E log E) for the adjacency sort + O(N log N) for
    /// the R-tree bulk load.
    pub fn build(self) -> FiberGraph {
        let node_count = self.nodes.len();

        // Two directed adjacency entries per undirected link.
        let mut entries: Vec<(NodeId, NodeId, LinkId)> =
            Vec::with_capacity(self.links.len() * 2);
        for (i, &(a, b, _)) in self.links.iter().enumerate() {
            let link = LinkId(i as u32);
            entries.push((a, b, link));
            entries.push((b, a, link));
        }
        entries.sort_unstable_by_key(|&(from, to, link)| (from.0, to.0, link.0));

        let adj_node: Vec<NodeId> = entries.iter().map(|e| e.1).collect();
        let adj_link: Vec<LinkId> = entries.iter().map(|e| e.2).collect();

        // Build CSR row pointer.
        let mut adj_start = vec![0u32; node_count + 1];
        for e in &entries {
            adj_start[e.0.index() + 1] += 1;
        }
        for i in 1..=node_count {
            adj_start[i] += adj_start[i - 1];
        }
        debug_assert_eq!(adj_start[node_count] as usize, entries.len());

        let link_a:      Vec<NodeId> = self.links.iter().map(|l| l.0).collect();
        let link_b:      Vec<NodeId> = self.links.iter().map(|l| l.1).collect();
        let link_weight: Vec<u64>    = self.links.iter().map(|l| l.2).collect();

        // Bulk-load the R-tree for O(N log N) construction.
        let tree_entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, &pos)| NodeEntry {
                point: [pos.lat, pos.lon],
                id: NodeId(i as u32),
            })
            .collect();
        let spatial_idx = RTree::bulk_load(tree_entries);

        FiberGraph {
            node_pos: self.nodes,
            adj_start,
            adj_node,
            adj_link,
            link_a,
            link_b,
            link_weight,
            spatial_idx,
        }
    }
}

impl Default for FiberGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

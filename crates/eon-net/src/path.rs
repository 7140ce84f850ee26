//! A simple path through the fiber graph.

use eon_core::{LinkId, NodeId};

/// An ordered simple path: `nodes.len() == links.len() + 1`, and `links[i]`
/// connects `nodes[i]` to `nodes[i + 1]`.
///
/// Paths are produced by the catalogue at construction time and cloned into
/// allocation records; they never change once built.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Path {
    pub nodes:  Vec<NodeId>,
    pub links:  Vec<LinkId>,
    /// Total physical length (sum of link weights).
    pub weight: u64,
}

impl Path {
    #[inline]
    pub fn src(&self) -> NodeId {
        self.nodes[0]
    }

    #[inline]
    pub fn dst(&self) -> NodeId {
        *self.nodes.last().expect("empty path")
    }

    /// Number of links traversed.
    #[inline]
    pub fn hops(&self) -> usize {
        self.links.len()
    }

    pub fn contains_node(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }

    pub fn contains_link(&self, link: LinkId) -> bool {
        self.links.contains(&link)
    }
}

impl std::fmt::Display for Path {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, n) in self.nodes.iter().enumerate() {
            if i > 0 {
                write!(f, "-")?;
            }
            write!(f, "{}", n.0)?;
        }
        write!(f, " (w={})", self.weight)
    }
}

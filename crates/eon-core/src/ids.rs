//! Typed identifiers for the simulator's four kinds of resource.
//!
//! Ids are thin wrappers over dense array indices: every store in the
//! workspace (spectrum grid, catalogue table, request log, ownership map)
//! is a flat `Vec` indexed by `id.index()`.  The inner integer stays `pub`
//! for construction in scenarios and tests.

/// Declare one id type with its display label.
///
/// Each type gets exactly what the simulator needs from an id — `Ord + Hash`
/// so it can key sorted and hashed collections, an `INVALID` sentinel for
/// predecessor arrays and not-yet-assigned ownership slots, and a short
/// human label for error and log messages ("node 7", "isp 1").
macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident($repr:ty) = $label:literal;) => {
        $(#[$doc])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(pub $repr);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($label, " {}"), self.0)
            }
        }

        impl $name {
            /// Sentinel meaning "no such resource" / "not yet assigned".
            pub const INVALID: Self = Self(<$repr>::MAX);

            /// `false` for the [`INVALID`](Self::INVALID) sentinel.
            #[inline]
            pub fn is_valid(self) -> bool {
                self.0 != <$repr>::MAX
            }

            /// The id as a flat-array index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

id_type! {
    /// A node (optical cross-connect site) of the fiber graph.
    NodeId(u32) = "node";
}

id_type! {
    /// An undirected fiber link.  Both traversal directions share one
    /// `LinkId`; the spectrum grid is indexed by it.
    LinkId(u32) = "link";
}

id_type! {
    /// An ISP (routing domain).  `u16` keeps per-request headers compact;
    /// nobody simulates 65,000 providers.
    IspId(u16) = "isp";
}

id_type! {
    /// A request, numbered in arrival order — the disruption scan walks
    /// ascending `RequestId` to process hits oldest-first.
    RequestId(u32) = "request";
}

//! Routing outcomes.
//!
//! A block is a recorded outcome, not an error — it never unwinds past the
//! event handler that asked for the route.

use eon_net::{Path, Window};

/// Why a request could not be admitted.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum BlockReason {
    /// The catalogue has no path for the pair (or the subnet filter left none).
    NoPath,
    /// Paths exist but no contiguous window of the demanded width is free.
    NoWindow,
    /// Disaster-aware filtering removed every candidate path.
    NoSafePath,
    /// Admission control refused every candidate to shield future migrations.
    AdmissionRefused,
}

impl BlockReason {
    /// Stable label for metrics keys and CSV columns.
    pub fn as_str(self) -> &'static str {
        match self {
            BlockReason::NoPath           => "no_path",
            BlockReason::NoWindow         => "no_window",
            BlockReason::NoSafePath       => "no_safe_path",
            BlockReason::AdmissionRefused => "admission_refused",
        }
    }
}

impl std::fmt::Display for BlockReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The result of asking a policy to route (or re-route) a demand.
///
/// On `Accepted` the allocation has already been applied through
/// `Topology::try_allocate`; the path and window are the new allocation
/// record.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Outcome {
    Accepted { path: Path, window: Window },
    Blocked(BlockReason),
}

impl Outcome {
    #[inline]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted { .. })
    }
}

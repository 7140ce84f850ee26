//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing microsecond counter, `SimTime`.  Using
//! an integer as the canonical unit means event ordering is exact (no
//! floating-point drift in heap comparisons) and replays are bit-stable.
//! `f64` seconds exist only at the scenario boundary and in snapshot output;
//! both conversions live here.
//!
//! Durations are plain `u64` microsecond counts.  The special value
//! [`SimTime::NEVER`] marks a point that is never reached — it is the
//! departure time of a request with infinite holding time, and offsetting
//! any time by `u64::MAX` microseconds saturates to it.

use std::fmt;

/// Microseconds per second, for boundary conversions.
pub const MICROS_PER_SEC: u64 = 1_000_000;

/// An absolute simulation instant, in microseconds since run start.
///
/// At microsecond resolution a `u64` spans ~584,000 years of simulated
/// time, so saturating arithmetic only ever matters for [`NEVER`](Self::NEVER).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimTime(pub u64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);

    /// An instant that never arrives.  Used as the departure time of
    /// requests with infinite holding time; no event is scheduled for it.
    pub const NEVER: SimTime = SimTime(u64::MAX);

    /// Convert boundary seconds to an instant.
    ///
    /// Returns `None` for negative, non-finite, or overflowing inputs —
    /// the scenario validator turns that into a configuration error.
    pub fn from_secs_f64(secs: f64) -> Option<SimTime> {
        micros_from_secs_f64(secs).map(SimTime)
    }

    /// Seconds since run start, for snapshots and human-readable output.
    #[inline]
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / MICROS_PER_SEC as f64
    }

    /// The instant `micros` after `self`, saturating at [`NEVER`](Self::NEVER).
    #[inline]
    pub fn offset(self, micros: u64) -> SimTime {
        SimTime(self.0.saturating_add(micros))
    }

    /// `true` for the [`NEVER`](Self::NEVER) sentinel.
    #[inline]
    pub fn is_never(self) -> bool {
        self.0 == u64::MAX
    }

    /// Microseconds elapsed from `earlier` to `self`.
    ///
    /// # Panics
    /// Panics in debug mode if `earlier > self`.
    #[inline]
    pub fn since(self, earlier: SimTime) -> u64 {
        self.0 - earlier.0
    }
}

impl std::ops::Add<u64> for SimTime {
    type Output = SimTime;
    #[inline]
    fn add(self, rhs: u64) -> SimTime {
        SimTime(self.0 + rhs)
    }
}

impl std::ops::Sub for SimTime {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: SimTime) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_never() {
            write!(f, "t=never")
        } else {
            write!(f, "t={:.6}s", self.as_secs_f64())
        }
    }
}

/// Convert boundary seconds to a microsecond duration.
///
/// Returns `None` for negative, non-finite, or overflowing inputs.  Infinite
/// holding times are expressed as `u64::MAX` by the caller, not through this
/// conversion.
pub fn micros_from_secs_f64(secs: f64) -> Option<u64> {
    if !secs.is_finite() || secs < 0.0 {
        return None;
    }
    let micros = secs * MICROS_PER_SEC as f64;
    if micros >= u64::MAX as f64 {
        return None;
    }
    Some(micros.round() as u64)
}

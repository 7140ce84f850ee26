//! Node coordinates for the disaster's damage-radius query.
//!
//! Positions exist in this simulator for exactly one reason: deciding which
//! nodes sit inside the disaster radius, and how close to the epicenter
//! they are (nearer victims fail earlier).  Single-precision lat/lon is
//! orders of magnitude finer than any damage radius, so `f32` it is.

/// A WGS-84 coordinate, degrees.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f32,
    pub lon: f32,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f32, lon: f32) -> Self {
        Self { lat, lon }
    }

    /// Great-circle distance to `other`, metres.
    ///
    /// Haversine in its arcsine form.  The error budget is generous:
    /// backbone sites are tens of kilometres apart and damage radii are
    /// larger still, so being off by a few hundred metres cannot move a
    /// node across the victim boundary in any realistic scenario.
    pub fn great_circle_m(self, other: GeoPoint) -> f32 {
        const EARTH_RADIUS_M: f32 = 6.371e6;

        // hav(θ) for an angle given in degrees.
        let hav = |deg: f32| (deg.to_radians() * 0.5).sin().powi(2);

        let h = hav(other.lat - self.lat)
            + self.lat.to_radians().cos()
                * other.lat.to_radians().cos()
                * hav(other.lon - self.lon);

        // Clamp guards against sqrt(h) creeping past 1.0 in f32 for
        // near-antipodal pairs.
        2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
    }
}

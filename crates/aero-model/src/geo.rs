//! Geodesic helpers
//!
//! Spherical-earth approximations, good enough for VFR planning.

/// Mean earth radius in kilometres
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometres per nautical mile (one knot = 1.852 km/h)
pub const KM_PER_NM: f64 = 1.852;

/// Cruise speed assumed when none is given
pub const DEFAULT_CRUISE_SPEED_KT: f64 = 120.0;

/// Anything with a position on the map
pub trait Positioned {
    /// Latitude in degrees
    fn latitude(&self) -> f64;

    /// Longitude in degrees
    fn longitude(&self) -> f64;

    /// Short label for display (ICAO code, navaid ident, ...)
    fn label(&self) -> &str;

    /// Great-circle distance to another point, in kilometres
    fn distance_to<P: Positioned + ?Sized>(&self, other: &P) -> f64 {
        distance_km(
            self.latitude(),
            self.longitude(),
            other.latitude(),
            other.longitude(),
        )
    }
}

/// Great-circle distance in kilometres (haversine)
#[must_use]
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push `a` past 1 for antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Estimated flight time in minutes
///
/// `distance / (speed_knots * 1.852) * 60`. No wind, no climb.
#[must_use]
pub fn estimated_time_minutes(distance_km: f64, speed_knots: f64) -> f64 {
    distance_km / (speed_knots * KM_PER_NM) * 60.0
}

/// Estimated flight time at [`DEFAULT_CRUISE_SPEED_KT`]
#[inline]
#[must_use]
pub fn estimated_time_minutes_default(distance_km: f64) -> f64 {
    estimated_time_minutes(distance_km, DEFAULT_CRUISE_SPEED_KT)
}

/// Initial true bearing from point 1 to point 2, in `[0, 360)` degrees
#[must_use]
pub fn initial_bearing_deg(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let y = d_lon.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * d_lon.cos();

    let bearing = y.atan2(x).to_degrees().rem_euclid(360.0);
    // rem_euclid rounds tiny negatives up to exactly 360.0
    if bearing >= 360.0 {
        0.0
    } else {
        bearing
    }
}

/// Kilometres to nautical miles
#[inline]
#[must_use]
pub fn km_to_nm(km: f64) -> f64 {
    km / KM_PER_NM
}

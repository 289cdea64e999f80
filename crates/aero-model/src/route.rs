//! Flight-plan legs
//!
//! Turns an ordered list of points into legs with distance, bearing and
//! estimated time at a constant cruise speed.

use crate::airport::Airport;
use crate::geo::{self, Positioned};
use crate::waypoint::Waypoint;
use serde::{Deserialize, Serialize};

/// Labelled position, for routes mixing airports and navaids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePoint {
    /// Display label
    pub label: String,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

impl RoutePoint {
    /// Create route point
    #[inline]
    #[must_use]
    pub fn new(label: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            label: label.into(),
            latitude,
            longitude,
        }
    }

    /// Snapshot any positioned record
    #[must_use]
    pub fn from_positioned<P: Positioned + ?Sized>(point: &P) -> Self {
        Self::new(point.label(), point.latitude(), point.longitude())
    }
}

impl From<&Airport> for RoutePoint {
    fn from(airport: &Airport) -> Self {
        Self::from_positioned(airport)
    }
}

impl From<&Waypoint> for RoutePoint {
    fn from(waypoint: &Waypoint) -> Self {
        Self::from_positioned(waypoint)
    }
}

impl Positioned for RoutePoint {
    fn latitude(&self) -> f64 {
        self.latitude
    }

    fn longitude(&self) -> f64 {
        self.longitude
    }

    fn label(&self) -> &str {
        &self.label
    }
}

/// One leg between consecutive points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    /// Departure label
    pub from: String,
    /// Arrival label
    pub to: String,
    /// Great-circle distance in kilometres
    pub distance_km: f64,
    /// Same distance in nautical miles
    pub distance_nm: f64,
    /// Initial true bearing in degrees
    pub bearing_deg: f64,
    /// Estimated time in minutes
    pub minutes: f64,
}

/// Ordered legs plus totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePlan {
    /// Cruise speed used for every leg
    pub speed_knots: f64,
    /// Legs in flight order
    pub legs: Vec<Leg>,
    /// Sum of leg distances in kilometres
    pub total_km: f64,
    /// Sum of leg times in minutes
    pub total_minutes: f64,
}

impl RoutePlan {
    /// Build plan from ordered points
    ///
    /// Fewer than two points yields a plan with no legs.
    #[must_use]
    pub fn build<P: Positioned>(points: &[P], speed_knots: f64) -> Self {
        let legs: Vec<Leg> = points
            .windows(2)
            .map(|pair| {
                let (a, b) = (&pair[0], &pair[1]);
                let distance_km = a.distance_to(b);
                Leg {
                    from: a.label().to_string(),
                    to: b.label().to_string(),
                    distance_km,
                    distance_nm: geo::km_to_nm(distance_km),
                    bearing_deg: geo::initial_bearing_deg(
                        a.latitude(),
                        a.longitude(),
                        b.latitude(),
                        b.longitude(),
                    ),
                    minutes: geo::estimated_time_minutes(distance_km, speed_knots),
                }
            })
            .collect();

        let total_km = legs.iter().map(|l| l.distance_km).sum();
        let total_minutes = legs.iter().map(|l| l.minutes).sum();

        Self {
            speed_knots,
            legs,
            total_km,
            total_minutes,
        }
    }

    /// Build plan at the default cruise speed
    #[inline]
    #[must_use]
    pub fn build_default<P: Positioned>(points: &[P]) -> Self {
        Self::build(points, geo::DEFAULT_CRUISE_SPEED_KT)
    }

    /// Whether the plan has no legs
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }
}

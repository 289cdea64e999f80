//! Upstream item schema
//!
//! The provider's JSON is loosely typed. Each item is first deserialized into
//! a `Raw*` shape (which enforces required fields and primitive types), then
//! normalized into [`Airport`] or [`Waypoint`] with range checks applied.
//!
//! Batches are partial-success: [`collect_valid`] drops items that fail and
//! keeps the rest.

use crate::airport::Airport;
use crate::error::ValidationError;
use crate::waypoint::Waypoint;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Metres per foot
const METERS_PER_FOOT: f64 = 0.3048;

/// GeoJSON point geometry, `[longitude, latitude]`
#[derive(Debug, Clone, Deserialize)]
pub struct RawGeometry {
    /// Coordinate pair in GeoJSON order
    pub coordinates: [f64; 2],
}

impl RawGeometry {
    /// Validated `(latitude, longitude)` in degrees
    pub fn position(&self) -> Result<(f64, f64), ValidationError> {
        let [longitude, latitude] = self.coordinates;
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);

        if valid {
            Ok((latitude, longitude))
        } else {
            Err(ValidationError::InvalidCoordinates {
                latitude,
                longitude,
            })
        }
    }
}

/// Nested `{value, unit}` elevation
#[derive(Debug, Clone, Deserialize)]
pub struct RawElevation {
    /// Bare numeric elevation
    pub value: f64,
    /// Provider unit code
    #[serde(default)]
    pub unit: Option<i64>,
}

/// Number that may arrive as a JSON number or a numeric string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    /// Plain JSON number
    Number(f64),
    /// Numeric string such as `"118.500"`
    Text(String),
}

impl RawNumber {
    /// Coerce to a finite `f64`
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

/// Nested `{value, unit}` frequency
#[derive(Debug, Clone, Deserialize)]
pub struct RawFrequency {
    /// Frequency value, number or numeric string
    pub value: RawNumber,
    /// Provider unit code
    #[serde(default)]
    pub unit: Option<i64>,
}

/// Airport item as returned by `/airports`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAirport {
    /// Internal provider id
    #[serde(rename = "_id")]
    pub id: String,
    /// Display name
    pub name: String,
    /// ICAO location indicator
    pub icao_code: Option<String>,
    /// IATA code
    pub iata_code: Option<String>,
    /// City served
    pub city: Option<String>,
    /// ISO country code
    pub country: Option<String>,
    /// Position
    pub geometry: RawGeometry,
    /// Field elevation
    pub elevation: Option<RawElevation>,
}

/// Navaid item as returned by `/navaids`
#[derive(Debug, Clone, Deserialize)]
pub struct RawNavaid {
    /// Internal provider id
    #[serde(rename = "_id")]
    pub id: String,
    /// Published identifier, e.g. `"PGS"`
    pub identifier: String,
    /// Display name
    pub name: Option<String>,
    /// Integer navaid type code
    #[serde(rename = "type")]
    pub kind: i64,
    /// Position
    pub geometry: RawGeometry,
    /// Station elevation
    pub elevation: Option<RawElevation>,
    /// Operating frequency
    pub frequency: Option<RawFrequency>,
    /// ISO country code
    pub country: Option<String>,
}

/// Unit attached to an upstream elevation
///
/// The bare value is what records expose as `elevation`; the unit is kept so
/// callers do not have to assume metres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElevationUnit {
    /// Code 0
    Meters,
    /// Code 1
    Feet,
    /// Code 6
    FlightLevel,
    /// Any other provider code
    Unknown(i64),
}

impl ElevationUnit {
    /// Decode provider unit code
    #[inline]
    #[must_use]
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Meters,
            1 => Self::Feet,
            6 => Self::FlightLevel,
            other => Self::Unknown(other),
        }
    }

    /// Convert a value in this unit to metres
    ///
    /// Returns `None` for unknown units.
    #[must_use]
    pub fn to_meters(self, value: f64) -> Option<f64> {
        match self {
            Self::Meters => Some(value),
            Self::Feet => Some(value * METERS_PER_FOOT),
            Self::FlightLevel => Some(value * 100.0 * METERS_PER_FOOT),
            Self::Unknown(_) => None,
        }
    }
}

/// Split an optional raw elevation into value and unit
pub(crate) fn split_elevation(raw: Option<RawElevation>) -> (Option<f64>, Option<ElevationUnit>) {
    match raw {
        Some(elevation) => (
            Some(elevation.value),
            elevation.unit.map(ElevationUnit::from_code),
        ),
        None => (None, None),
    }
}

/// Drop empty strings so optional text fields are either meaningful or absent
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Validate and normalize one `/airports` item
pub fn parse_airport(item: &Value) -> Result<Airport, ValidationError> {
    let raw = RawAirport::deserialize(item)?;
    Airport::try_from(raw)
}

/// Validate and normalize one `/navaids` item
pub fn parse_waypoint(item: &Value) -> Result<Waypoint, ValidationError> {
    let raw = RawNavaid::deserialize(item)?;
    Waypoint::try_from(raw)
}

/// Parse the `items` array of a payload, dropping invalid entries
///
/// A payload without an `items` array yields an empty list.
pub fn collect_valid<T, F>(payload: &Value, parse: F) -> Vec<T>
where
    F: Fn(&Value) -> Result<T, ValidationError>,
{
    let Some(items) = payload.get("items").and_then(Value::as_array) else {
        tracing::warn!("upstream payload has no items array");
        return Vec::new();
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match parse(item) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(index, "dropping invalid upstream item: {}", e);
                None
            }
        })
        .collect()
}

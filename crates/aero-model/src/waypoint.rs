//! Normalized navaid record

use crate::error::ValidationError;
use crate::geo::Positioned;
use crate::schema::{non_empty, split_elevation, ElevationUnit, RawNavaid};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Navaid category decoded from the provider's integer table
///
/// Codes outside the table are kept as [`NavaidType::Unmapped`] and render as
/// `TYPE-<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavaidType {
    /// Code 0
    Vor,
    /// Code 1
    VorDme,
    /// Code 2
    Dme,
    /// Code 3
    Ndb,
    /// Code 4
    Tacan,
    /// Code 5
    Vortac,
    /// Code 6
    Locator,
    /// Code 7
    Ils,
    /// Code 8
    Other,
    /// Code not in the table
    Unmapped(i64),
}

impl NavaidType {
    /// Decode provider type code
    #[must_use]
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Vor,
            1 => Self::VorDme,
            2 => Self::Dme,
            3 => Self::Ndb,
            4 => Self::Tacan,
            5 => Self::Vortac,
            6 => Self::Locator,
            7 => Self::Ils,
            8 => Self::Other,
            n => Self::Unmapped(n),
        }
    }

    /// Provider type code
    #[must_use]
    pub fn code(self) -> i64 {
        match self {
            Self::Vor => 0,
            Self::VorDme => 1,
            Self::Dme => 2,
            Self::Ndb => 3,
            Self::Tacan => 4,
            Self::Vortac => 5,
            Self::Locator => 6,
            Self::Ils => 7,
            Self::Other => 8,
            Self::Unmapped(n) => n,
        }
    }
}

impl fmt::Display for NavaidType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Self::Vor => "VOR",
            Self::VorDme => "VOR-DME",
            Self::Dme => "DME",
            Self::Ndb => "NDB",
            Self::Tacan => "TACAN",
            Self::Vortac => "VORTAC",
            Self::Locator => "LOCATOR",
            Self::Ils => "ILS",
            Self::Other => "OTHER",
            Self::Unmapped(n) => return write!(f, "TYPE-{n}"),
        };
        f.write_str(tag)
    }
}

/// Unrecognized navaid tag
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown navaid type tag: '{0}'")]
pub struct UnknownNavaidTag(pub String);

impl FromStr for NavaidType {
    type Err = UnknownNavaidTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = match s {
            "VOR" => Self::Vor,
            "VOR-DME" => Self::VorDme,
            "DME" => Self::Dme,
            "NDB" => Self::Ndb,
            "TACAN" => Self::Tacan,
            "VORTAC" => Self::Vortac,
            "LOCATOR" => Self::Locator,
            "ILS" => Self::Ils,
            "OTHER" => Self::Other,
            other => {
                let code = other
                    .strip_prefix("TYPE-")
                    .and_then(|n| n.parse::<i64>().ok())
                    .ok_or_else(|| UnknownNavaidTag(other.to_string()))?;
                Self::Unmapped(code)
            }
        };
        Ok(parsed)
    }
}

impl Serialize for NavaidType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for NavaidType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        tag.parse().map_err(serde::de::Error::custom)
    }
}

/// Navigational aid as shown to users
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Provider id
    pub id: String,
    /// Published identifier
    pub ident: String,
    /// Display name, `ident` when the provider has none
    pub name: String,
    /// Navaid category
    #[serde(rename = "type")]
    pub kind: NavaidType,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Station elevation, bare value in `elevation_unit`
    pub elevation: Option<f64>,
    /// Unit of `elevation`
    pub elevation_unit: Option<ElevationUnit>,
    /// Frequency value as published
    pub frequency_khz: Option<f64>,
    /// Country for display (the provider only publishes codes)
    pub country: Option<String>,
    /// ISO country code
    pub country_code: Option<String>,
}

impl TryFrom<RawNavaid> for Waypoint {
    type Error = ValidationError;

    fn try_from(raw: RawNavaid) -> Result<Self, Self::Error> {
        if raw.id.trim().is_empty() {
            return Err(ValidationError::empty("_id"));
        }
        if raw.identifier.trim().is_empty() {
            return Err(ValidationError::empty("identifier"));
        }

        let (latitude, longitude) = raw.geometry.position()?;
        let (elevation, elevation_unit) = split_elevation(raw.elevation);
        let frequency_khz = match raw.frequency {
            Some(frequency) => {
                let value = frequency.value.as_f64();
                if value.is_none() {
                    tracing::debug!(ident = %raw.identifier, "unparseable navaid frequency");
                }
                value
            }
            None => None,
        };
        let name = non_empty(raw.name).unwrap_or_else(|| raw.identifier.clone());
        let country_code = non_empty(raw.country);

        Ok(Self {
            id: raw.id,
            ident: raw.identifier,
            name,
            kind: NavaidType::from_code(raw.kind),
            latitude,
            longitude,
            elevation,
            elevation_unit,
            frequency_khz,
            country: country_code.clone(),
            country_code,
        })
    }
}

impl Positioned for Waypoint {
    fn latitude(&self) -> f64 {
        self.latitude
    }

    fn longitude(&self) -> f64 {
        self.longitude
    }

    fn label(&self) -> &str {
        &self.ident
    }
}

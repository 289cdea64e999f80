//! Normalized airport record

use crate::error::ValidationError;
use crate::geo::Positioned;
use crate::schema::{non_empty, split_elevation, ElevationUnit, RawAirport};
use serde::{Deserialize, Serialize};

/// Prefix of the synthesized ICAO code for airports published without one
pub const UNKNOWN_ICAO_PREFIX: &str = "UNKNOWN-";

/// Number of id characters kept in a synthesized ICAO code
const SHORT_ID_LEN: usize = 6;

/// Airport as shown to users
///
/// `icao` is never empty: airports without an upstream ICAO code get
/// `UNKNOWN-<first six chars of id>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    /// Provider id
    pub id: String,
    /// ICAO code, or a synthesized placeholder
    pub icao: String,
    /// IATA code
    pub iata: Option<String>,
    /// Display name
    pub name: String,
    /// City served
    pub city: Option<String>,
    /// Country for display (the provider only publishes codes)
    pub country: Option<String>,
    /// ISO country code
    pub country_code: Option<String>,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Field elevation, bare value in `elevation_unit`
    pub elevation: Option<f64>,
    /// Unit of `elevation`
    pub elevation_unit: Option<ElevationUnit>,
}

impl Airport {
    /// Whether the ICAO code was synthesized
    #[inline]
    #[must_use]
    pub fn has_placeholder_icao(&self) -> bool {
        self.icao.starts_with(UNKNOWN_ICAO_PREFIX)
    }

    /// Elevation converted to metres, when the unit is known
    #[must_use]
    pub fn elevation_m(&self) -> Option<f64> {
        let value = self.elevation?;
        match self.elevation_unit {
            Some(unit) => unit.to_meters(value),
            None => Some(value),
        }
    }
}

/// Placeholder ICAO code derived from the provider id
#[must_use]
pub fn placeholder_icao(id: &str) -> String {
    let short: String = id.chars().take(SHORT_ID_LEN).collect();
    format!("{UNKNOWN_ICAO_PREFIX}{short}")
}

impl TryFrom<RawAirport> for Airport {
    type Error = ValidationError;

    fn try_from(raw: RawAirport) -> Result<Self, Self::Error> {
        if raw.id.trim().is_empty() {
            return Err(ValidationError::empty("_id"));
        }

        let (latitude, longitude) = raw.geometry.position()?;
        let (elevation, elevation_unit) = split_elevation(raw.elevation);
        let icao = non_empty(raw.icao_code).unwrap_or_else(|| placeholder_icao(&raw.id));
        let country_code = non_empty(raw.country);

        Ok(Self {
            id: raw.id,
            icao,
            iata: non_empty(raw.iata_code),
            name: raw.name,
            city: non_empty(raw.city),
            country: country_code.clone(),
            country_code,
            latitude,
            longitude,
            elevation,
            elevation_unit,
        })
    }
}

impl Positioned for Airport {
    fn latitude(&self) -> f64 {
        self.latitude
    }

    fn longitude(&self) -> f64 {
        self.longitude
    }

    fn label(&self) -> &str {
        &self.icao
    }
}

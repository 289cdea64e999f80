//! Validation errors for upstream records
//!
//! A `ValidationError` always concerns a single item. Batch parsing drops the
//! offending item and keeps going, so these never reach UI callers.

/// Why an upstream item was rejected
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// Item does not match the expected JSON shape
    #[error("schema mismatch: {0}")]
    Schema(#[from] serde_json::Error),

    /// Required identifier is present but empty
    #[error("empty {field}")]
    EmptyField {
        /// Name of the upstream field
        field: &'static str,
    },

    /// Coordinate pair is not a valid position
    #[error("invalid coordinates: lat {latitude}, lon {longitude}")]
    InvalidCoordinates {
        /// Latitude in degrees as received
        latitude: f64,
        /// Longitude in degrees as received
        longitude: f64,
    },
}

impl ValidationError {
    /// Create empty-field error
    #[inline]
    #[must_use]
    pub fn empty(field: &'static str) -> Self {
        Self::EmptyField { field }
    }
}

//! OpenAIP aviation data client
//!
//! Looks up airports and navaids against the OpenAIP REST API, caches raw
//! responses for a freshness window and normalizes items into
//! [`aero_model`] records.
//!
//! # Error policy
//!
//! - Not found is not an error: single lookups return `None`, searches `[]`.
//! - Malformed items are dropped and logged; the rest of the batch survives.
//! - Transport failures fall back to a cached (possibly stale) response and
//!   only propagate when nothing is cached.
//! - A missing API key fails every operation with
//!   [`ClientError::MissingApiKey`] before any network activity.
//!
//! # Example
//!
//! ```rust,ignore
//! use aero_client::{AviationClient, ClientConfig};
//!
//! # async fn example() -> Result<(), aero_client::ClientError> {
//! let client = AviationClient::new(ClientConfig::from_env())?;
//!
//! if let Some(airport) = client.airport_by_icao("LFPN").await? {
//!     println!("{} at {}, {}", airport.name, airport.latitude, airport.longitude);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod client;
pub mod config;
pub mod error;
pub mod transport;

pub use client::{AviationClient, AIRPORTS_PATH, NAVAIDS_PATH};
pub use config::{ClientConfig, API_KEY_ENV, BASE_URL_ENV, DEFAULT_BASE_URL};
pub use error::{ClientError, ClientResult, ConfigError, TransportError};
pub use transport::{ApiRequest, HttpTransport, ReqwestTransport, API_KEY_HEADER, API_KEY_PARAM};

pub use aero_cache::CacheStats;
pub use aero_model::{Airport, NavaidType, Waypoint};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the client
    pub use crate::{AviationClient, ClientConfig, ClientError, HttpTransport};
    pub use aero_model::prelude::*;
}

//! Aeronautical records
//!
//! Normalized shapes produced from the OpenAIP provider's loosely typed JSON:
//!
//! - [`Airport`]: aerodrome with ICAO code, position and optional elevation
//! - [`Waypoint`]: navigational aid (VOR, NDB, ...) with optional frequency
//!
//! Plus the pieces that turn upstream payloads into those records
//! ([`schema`]) and the pure geodesic helpers used by flight planning
//! ([`geo`], [`route`]).
//!
//! # Example
//!
//! ```rust
//! use aero_model::geo;
//!
//! let km = geo::distance_km(0.0, 0.0, 0.0, 1.0);
//! assert!((km - 111.19).abs() < 0.01);
//!
//! let minutes = geo::estimated_time_minutes(222.4, 120.0);
//! assert!((minutes - 60.0).abs() < 0.1);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod airport;
pub mod error;
pub mod geo;
pub mod route;
pub mod schema;
pub mod waypoint;

pub use airport::Airport;
pub use error::ValidationError;
pub use geo::Positioned;
pub use route::{Leg, RoutePlan, RoutePoint};
pub use schema::{collect_valid, parse_airport, parse_waypoint, ElevationUnit};
pub use waypoint::{NavaidType, UnknownNavaidTag, Waypoint};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with normalized records
    pub use crate::airport::Airport;
    pub use crate::geo::{self, Positioned};
    pub use crate::route::{RoutePlan, RoutePoint};
    pub use crate::waypoint::{NavaidType, Waypoint};
}

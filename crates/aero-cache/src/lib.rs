//! Response cache for the aviation data client
//!
//! Upstream responses are cached by [`RequestSignature`] (endpoint path plus
//! sorted query string) for a fixed freshness window.
//!
//! # Policy
//!
//! - Fresh entry: served without a network call.
//! - Missing or expired entry: fetched, stored, returned.
//! - Fetch failure with an entry present (even expired): the stale entry is
//!   served instead of the error.
//! - Fetch failure without an entry: the error propagates.
//!
//! Concurrent callers for the same signature share one fetch.
//!
//! # Example
//!
//! ```rust,ignore
//! use aero_cache::{QueryParams, RequestSignature, ResponseCache};
//!
//! # async fn example() -> Result<(), String> {
//! let cache = ResponseCache::default();
//! let params = QueryParams::new().with("search", "LFPG");
//! let signature = RequestSignature::new("/airports", &params);
//!
//! let payload = cache
//!     .get_or_fetch(&signature, || async { Ok::<_, String>(serde_json::json!({"items": []})) })
//!     .await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod cache;
pub mod signature;

pub use cache::{CacheStats, CachedResponse, Lookup, ResponseCache, DEFAULT_CAPACITY, DEFAULT_FRESHNESS};
pub use signature::{QueryParams, RequestSignature};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Request signatures
//!
//! A signature is `path?k1=v1&k2=v2` with keys sorted, so two requests with
//! the same parameters always map to the same cache entry regardless of the
//! order they were built in.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Query parameters in deterministic (sorted) order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(BTreeMap<String, String>);

impl QueryParams {
    /// Create empty parameter set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With parameter (builder style)
    #[inline]
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace parameter
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Get parameter value
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Iterate `(key, value)` pairs in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of parameters
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no parameters
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Serialize as `k1=v1&k2=v2` in key order
    ///
    /// Values are not percent-encoded; the result is a cache key, not a URL.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        self.iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Cache key for one upstream request
///
/// The query part carries the API key, so `Debug` and [`path`](Self::path)
/// only ever expose the endpoint path.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestSignature {
    key: Arc<str>,
    path_len: usize,
}

impl RequestSignature {
    /// Build signature from endpoint path and parameters
    #[must_use]
    pub fn new(path: &str, params: &QueryParams) -> Self {
        let key = format!("{path}?{}", params.to_query_string());
        Self {
            key: key.into(),
            path_len: path.len(),
        }
    }

    /// Endpoint path part
    #[inline]
    #[must_use]
    pub fn path(&self) -> &str {
        &self.key[..self.path_len]
    }

    /// Full signature, including parameter values
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.key
    }
}

impl fmt::Debug for RequestSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestSignature")
            .field("path", &self.path())
            .finish_non_exhaustive()
    }
}

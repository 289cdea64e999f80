//! Aviation data client
//!
//! Explicitly constructed and owned by the caller: the response cache lives
//! as long as the client and is shared by its clones.

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::transport::{ApiRequest, HttpTransport, ReqwestTransport, API_KEY_PARAM};
use aero_cache::{CacheStats, QueryParams, RequestSignature, ResponseCache};
use aero_model::{collect_valid, parse_airport, parse_waypoint, Airport, Waypoint};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Airports endpoint
pub const AIRPORTS_PATH: &str = "/airports";

/// Navaids endpoint
pub const NAVAIDS_PATH: &str = "/navaids";

/// Cached OpenAIP client
///
/// Generic over the transport so tests can run without a network.
pub struct AviationClient<T = ReqwestTransport> {
    config: ClientConfig,
    transport: Arc<T>,
    cache: ResponseCache,
}

impl AviationClient<ReqwestTransport> {
    /// Create client with a reqwest transport
    ///
    /// The API key is not checked here; operations fail with
    /// [`ClientError::MissingApiKey`] when it is absent.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let transport = ReqwestTransport::new(config.base_url.clone(), config.request_timeout())?;
        Ok(Self::with_transport(config, transport))
    }

    /// Create client configured from the process environment
    pub fn from_env() -> Result<Self, ClientError> {
        Self::new(ClientConfig::from_env())
    }
}

impl<T: HttpTransport> AviationClient<T> {
    /// Create client around any transport
    #[must_use]
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        let cache = ResponseCache::with_capacity(config.cache_capacity, config.freshness());
        Self {
            config,
            transport: Arc::new(transport),
            cache,
        }
    }

    /// Get configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get cache statistics
    #[inline]
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drop every cached response
    pub fn clear_cache(&self) {
        self.cache.invalidate_all();
    }

    /// Search airports by free text
    ///
    /// Queries shorter than `min_query_len` characters return `[]` without a
    /// network call.
    pub async fn search_airports(&self, query: &str) -> Result<Vec<Airport>, ClientError> {
        if !self.is_searchable(query) {
            tracing::debug!(query, "airport search too short, skipping");
            return Ok(Vec::new());
        }

        let payload = self.get_cached(AIRPORTS_PATH, self.search_params(query)).await?;
        Ok(collect_valid(&payload, parse_airport))
    }

    /// Fetch one airport by ICAO code
    ///
    /// Prefers an exact `icao` match, falls back to the first result.
    pub async fn airport_by_icao(&self, icao: &str) -> Result<Option<Airport>, ClientError> {
        let params = QueryParams::new()
            .with("search", icao)
            .with("searchOptLwc", "false");

        let payload = self.get_cached(AIRPORTS_PATH, params).await?;
        let airports = collect_valid(&payload, parse_airport);
        Ok(prefer_exact(airports, |a| a.icao == icao))
    }

    /// Fetch one airport by provider id
    pub async fn airport_by_id(&self, id: &str) -> Result<Option<Airport>, ClientError> {
        let params = QueryParams::new().with("id", id);

        let payload = self.get_cached(AIRPORTS_PATH, params).await?;
        Ok(collect_valid(&payload, parse_airport).into_iter().next())
    }

    /// Search navaids by identifier or name
    ///
    /// Same length guard as [`search_airports`](Self::search_airports).
    pub async fn search_waypoints(&self, query: &str) -> Result<Vec<Waypoint>, ClientError> {
        if !self.is_searchable(query) {
            tracing::debug!(query, "waypoint search too short, skipping");
            return Ok(Vec::new());
        }

        let params = self
            .search_params(query)
            .with("searchFields", "identifier,name");

        let payload = self.get_cached(NAVAIDS_PATH, params).await?;
        Ok(collect_valid(&payload, parse_waypoint))
    }

    /// Fetch one navaid by provider id
    pub async fn waypoint_by_id(&self, id: &str) -> Result<Option<Waypoint>, ClientError> {
        let params = QueryParams::new().with("id", id);

        let payload = self.get_cached(NAVAIDS_PATH, params).await?;
        Ok(collect_valid(&payload, parse_waypoint).into_iter().next())
    }

    /// Fetch one navaid by published identifier
    ///
    /// Prefers an exact `ident` match, falls back to the first result.
    pub async fn waypoint_by_ident(&self, ident: &str) -> Result<Option<Waypoint>, ClientError> {
        let params = QueryParams::new()
            .with("search", ident)
            .with("searchFields", "identifier")
            .with("searchOptLwc", "false");

        let payload = self.get_cached(NAVAIDS_PATH, params).await?;
        let waypoints = collect_valid(&payload, parse_waypoint);
        Ok(prefer_exact(waypoints, |w| w.ident == ident))
    }

    fn is_searchable(&self, query: &str) -> bool {
        query.chars().count() >= self.config.min_query_len
    }

    fn search_params(&self, query: &str) -> QueryParams {
        QueryParams::new()
            .with("search", query)
            .with("limit", self.config.search_limit.to_string())
            .with("page", "1")
    }

    /// GET through the cache; the API key joins the signature
    async fn get_cached(
        &self,
        path: &'static str,
        mut params: QueryParams,
    ) -> Result<Arc<Value>, ClientError> {
        let api_key = self.config.api_key()?.to_string();
        params.insert(API_KEY_PARAM, api_key.clone());

        let signature = RequestSignature::new(path, &params);
        let request = ApiRequest {
            path,
            params,
            api_key,
        };
        let transport = &self.transport;

        let payload = self
            .cache
            .get_or_fetch(&signature, || async move { transport.get_json(&request).await })
            .await?;
        Ok(payload)
    }
}

impl<T> Clone for AviationClient<T> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            transport: Arc::clone(&self.transport),
            cache: self.cache.clone(),
        }
    }
}

impl<T> fmt::Debug for AviationClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AviationClient")
            .field("config", &self.config)
            .field("cache", &self.cache.stats())
            .finish_non_exhaustive()
    }
}

/// First item satisfying `is_exact`, else the first item
fn prefer_exact<T>(items: Vec<T>, is_exact: impl Fn(&T) -> bool) -> Option<T> {
    match items.iter().position(&is_exact) {
        Some(index) => items.into_iter().nth(index),
        None => items.into_iter().next(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::transport::MockHttpTransport;
    use aero_model::NavaidType;
    use serde_json::json;
    use std::time::Duration;

    const KEY: &str = "test-key";

    fn config() -> ClientConfig {
        ClientConfig::new().with_api_key(KEY)
    }

    fn airport_item(id: &str, icao: Option<&str>, name: &str) -> Value {
        let mut item = json!({
            "_id": id,
            "name": name,
            "country": "FR",
            "geometry": {"type": "Point", "coordinates": [2.1, 48.7]}
        });
        if let Some(icao) = icao {
            item["icaoCode"] = json!(icao);
        }
        item
    }

    fn navaid_item(id: &str, ident: &str, kind: i64) -> Value {
        json!({
            "_id": id,
            "identifier": ident,
            "name": format!("{ident} station"),
            "type": kind,
            "geometry": {"type": "Point", "coordinates": [1.99, 48.65]},
            "frequency": {"value": "114.700", "unit": 2}
        })
    }

    fn items(list: Vec<Value>) -> Value {
        let total = list.len();
        json!({ "items": list, "totalCount": total })
    }

    #[tokio::test]
    async fn short_search_skips_network() {
        let mut mock = MockHttpTransport::new();
        mock.expect_get_json().never();
        let client = AviationClient::with_transport(config(), mock);

        assert!(client.search_airports("L").await.unwrap().is_empty());
        assert!(client.search_airports("").await.unwrap().is_empty());
        assert!(client.search_waypoints("P").await.unwrap().is_empty());
        assert_eq!(client.cache_stats().fetches, 0);
    }

    #[tokio::test]
    async fn missing_key_fails_before_network() {
        let mut mock = MockHttpTransport::new();
        mock.expect_get_json().never();
        let client = AviationClient::with_transport(ClientConfig::new(), mock);

        let err = client.airport_by_icao("LFPN").await.unwrap_err();
        assert!(matches!(err, ClientError::MissingApiKey));

        let err = client.search_waypoints("PGS").await.unwrap_err();
        assert!(err.is_configuration());
    }

    #[tokio::test]
    async fn search_airports_sends_expected_request() {
        let mut mock = MockHttpTransport::new();
        mock.expect_get_json()
            .withf(|req| {
                req.path == AIRPORTS_PATH
                    && req.api_key == KEY
                    && req.params.get("search") == Some("Paris")
                    && req.params.get("limit") == Some("10")
                    && req.params.get("page") == Some("1")
                    && req.params.get(API_KEY_PARAM) == Some(KEY)
            })
            .times(1)
            .returning(|_| {
                Ok(items(vec![
                    airport_item("aaaaaaaa1", Some("LFPG"), "Charles de Gaulle"),
                    json!({"_id": "broken", "name": "No geometry"}),
                    airport_item("bbbbbbbb2", Some("LFPO"), "Orly"),
                ]))
            });

        let client = AviationClient::with_transport(config(), mock);
        let airports = client.search_airports("Paris").await.unwrap();

        let codes: Vec<_> = airports.iter().map(|a| a.icao.as_str()).collect();
        assert_eq!(codes, vec!["LFPG", "LFPO"]);
    }

    #[tokio::test]
    async fn repeated_lookup_uses_cache() {
        let mut mock = MockHttpTransport::new();
        mock.expect_get_json()
            .times(1)
            .returning(|_| Ok(items(vec![airport_item("cccccc3", Some("LFPN"), "Toussus")])));

        let client = AviationClient::with_transport(config(), mock);
        let first = client.airport_by_icao("LFPN").await.unwrap();
        let second = client.airport_by_icao("LFPN").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(client.cache_stats().hits, 1);
    }

    #[tokio::test]
    async fn airport_by_icao_prefers_exact_match() {
        let mut mock = MockHttpTransport::new();
        mock.expect_get_json()
            .withf(|req| {
                req.params.get("search") == Some("LFPN")
                    && req.params.get("searchOptLwc") == Some("false")
            })
            .returning(|_| {
                Ok(items(vec![
                    airport_item("dddddd4", Some("LFPNX"), "Lookalike"),
                    airport_item("eeeeee5", Some("LFPN"), "Toussus-le-Noble"),
                ]))
            });

        let client = AviationClient::with_transport(config(), mock);
        let airport = client.airport_by_icao("LFPN").await.unwrap().unwrap();
        assert_eq!(airport.name, "Toussus-le-Noble");
    }

    #[tokio::test]
    async fn airport_by_icao_falls_back_to_first() {
        let mut mock = MockHttpTransport::new();
        mock.expect_get_json().returning(|_| {
            Ok(items(vec![
                airport_item("ffffff6", None, "Unnamed strip"),
                airport_item("gggggg7", Some("LFXX"), "Other"),
            ]))
        });

        let client = AviationClient::with_transport(config(), mock);
        let airport = client.airport_by_icao("LFZZ").await.unwrap().unwrap();
        assert_eq!(airport.icao, "UNKNOWN-ffffff");
    }

    #[tokio::test]
    async fn empty_result_is_none() {
        let mut mock = MockHttpTransport::new();
        mock.expect_get_json().returning(|_| Ok(items(vec![])));

        let client = AviationClient::with_transport(config(), mock);
        assert!(client.airport_by_icao("ZZZZ").await.unwrap().is_none());
        assert!(client.airport_by_id("nope").await.unwrap().is_none());
        assert!(client.waypoint_by_ident("XXX").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn all_invalid_items_is_none() {
        let mut mock = MockHttpTransport::new();
        mock.expect_get_json()
            .returning(|_| Ok(items(vec![json!({"_id": "x"}), json!("not an object")])));

        let client = AviationClient::with_transport(config(), mock);
        assert!(client.airport_by_id("x").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn airport_by_id_sends_id_param() {
        let mut mock = MockHttpTransport::new();
        mock.expect_get_json()
            .withf(|req| req.path == AIRPORTS_PATH && req.params.get("id") == Some("hhhhhh8"))
            .times(1)
            .returning(|_| Ok(items(vec![airport_item("hhhhhh8", Some("LFPT"), "Pontoise")])));

        let client = AviationClient::with_transport(config(), mock);
        let airport = client.airport_by_id("hhhhhh8").await.unwrap().unwrap();
        assert_eq!(airport.icao, "LFPT");
    }

    #[tokio::test]
    async fn search_waypoints_sends_search_fields() {
        let mut mock = MockHttpTransport::new();
        mock.expect_get_json()
            .withf(|req| {
                req.path == NAVAIDS_PATH
                    && req.params.get("searchFields") == Some("identifier,name")
                    && req.params.get("limit") == Some("10")
                    && req.params.get("page") == Some("1")
            })
            .times(1)
            .returning(|_| {
                Ok(items(vec![
                    navaid_item("n1", "RBT", 0),
                    navaid_item("n2", "PGS", 42),
                ]))
            });

        let client = AviationClient::with_transport(config(), mock);
        let waypoints = client.search_waypoints("Ra").await.unwrap();

        assert_eq!(waypoints.len(), 2);
        assert_eq!(waypoints[0].kind, NavaidType::Vor);
        assert_eq!(waypoints[0].frequency_khz, Some(114.7));
        assert_eq!(waypoints[1].kind.to_string(), "TYPE-42");
    }

    #[tokio::test]
    async fn waypoint_by_ident_prefers_exact_match() {
        let mut mock = MockHttpTransport::new();
        mock.expect_get_json()
            .withf(|req| {
                req.params.get("search") == Some("PGS")
                    && req.params.get("searchFields") == Some("identifier")
                    && req.params.get("searchOptLwc") == Some("false")
            })
            .returning(|_| {
                Ok(items(vec![
                    navaid_item("n3", "PGSX", 3),
                    navaid_item("n4", "PGS", 1),
                ]))
            });

        let client = AviationClient::with_transport(config(), mock);
        let waypoint = client.waypoint_by_ident("PGS").await.unwrap().unwrap();
        assert_eq!(waypoint.id, "n4");
        assert_eq!(waypoint.kind, NavaidType::VorDme);
    }

    #[tokio::test]
    async fn waypoint_by_id_returns_first() {
        let mut mock = MockHttpTransport::new();
        mock.expect_get_json()
            .withf(|req| req.path == NAVAIDS_PATH && req.params.get("id") == Some("n5"))
            .returning(|_| Ok(items(vec![navaid_item("n5", "CHW", 7)])));

        let client = AviationClient::with_transport(config(), mock);
        let waypoint = client.waypoint_by_id("n5").await.unwrap().unwrap();
        assert_eq!(waypoint.kind, NavaidType::Ils);
    }

    #[tokio::test]
    async fn transport_error_without_cache_propagates() {
        let mut mock = MockHttpTransport::new();
        mock.expect_get_json()
            .returning(|req| Err(TransportError::status(503, req.path)));

        let client = AviationClient::with_transport(config(), mock);
        let err = client.search_airports("Paris").await.unwrap_err();

        assert!(err.is_transport());
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test(start_paused = true)]
    async fn stale_response_served_when_upstream_fails() {
        let mut calls = 0;
        let mut mock = MockHttpTransport::new();
        mock.expect_get_json().times(2).returning(move |req| {
            calls += 1;
            if calls == 1 {
                Ok(items(vec![airport_item("iiiiii9", Some("LFPN"), "Toussus")]))
            } else {
                Err(TransportError::status(502, req.path))
            }
        });

        let client = AviationClient::with_transport(config(), mock);
        client.airport_by_icao("LFPN").await.unwrap();

        tokio::time::advance(Duration::from_secs(31 * 60)).await;
        let airport = client.airport_by_icao("LFPN").await.unwrap().unwrap();

        assert_eq!(airport.name, "Toussus");
        assert_eq!(client.cache_stats().stale_served, 1);
    }

    #[tokio::test]
    async fn clear_cache_forces_refetch() {
        let mut mock = MockHttpTransport::new();
        mock.expect_get_json()
            .times(2)
            .returning(|_| Ok(items(vec![navaid_item("n6", "RBT", 0)])));

        let client = AviationClient::with_transport(config(), mock);
        client.waypoint_by_ident("RBT").await.unwrap();
        client.clear_cache();
        client.waypoint_by_ident("RBT").await.unwrap();
    }

    #[test]
    fn prefer_exact_semantics() {
        assert_eq!(prefer_exact(vec![1, 2, 3], |n| *n == 2), Some(2));
        assert_eq!(prefer_exact(vec![1, 2, 3], |n| *n == 9), Some(1));
        assert_eq!(prefer_exact(Vec::<i32>::new(), |_| true), None);
    }

    #[test]
    fn debug_redacts_key() {
        let client = AviationClient::with_transport(config(), MockHttpTransport::new());
        assert!(!format!("{client:?}").contains(KEY));
    }
}

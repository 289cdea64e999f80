//! HTTP transport seam
//!
//! [`AviationClient`](crate::AviationClient) only needs "GET this path with
//! these parameters, give me JSON". Production uses [`ReqwestTransport`];
//! tests substitute scripted or mocked transports.

use crate::error::TransportError;
use aero_cache::QueryParams;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Header carrying the provider API key
pub const API_KEY_HEADER: &str = "x-openaip-api-key";

/// Query parameter duplicating the API key
pub const API_KEY_PARAM: &str = "apiKey";

/// One upstream GET request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    /// Endpoint path, e.g. `/airports`
    pub path: &'static str,
    /// Query parameters, `apiKey` included
    pub params: QueryParams,
    /// Key sent in the [`API_KEY_HEADER`] header
    pub api_key: String,
}

/// Performs upstream GET requests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// GET `request` and decode the body as JSON
    async fn get_json(&self, request: &ApiRequest) -> Result<Value, TransportError>;
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for Arc<T> {
    async fn get_json(&self, request: &ApiRequest) -> Result<Value, TransportError> {
        (**self).get_json(request).await
    }
}

/// Transport backed by a shared `reqwest::Client`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    /// Create transport with its own connection pool
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("aeronav/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create transport around an existing client
    #[must_use]
    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    /// Base URL without trailing slash
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get_json(&self, request: &ApiRequest) -> Result<Value, TransportError> {
        let query: Vec<(&str, &str)> = request.params.iter().collect();
        tracing::info!(path = request.path, "fetching from upstream");

        let response = self
            .http
            .get(self.url(request.path))
            .header(API_KEY_HEADER, request.api_key.as_str())
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::status(status.as_u16(), request.path));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

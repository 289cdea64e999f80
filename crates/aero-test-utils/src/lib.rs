//! Testing utilities for the aeronav workspace
//!
//! Upstream-shaped JSON fixtures and a scripted transport that records every
//! request it serves.

#![allow(missing_docs)]

use aero_client::{ApiRequest, ClientConfig, HttpTransport, TransportError};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

pub const TEST_API_KEY: &str = "test-key";

pub fn test_config() -> ClientConfig {
    ClientConfig::new().with_api_key(TEST_API_KEY)
}

pub fn airport_item(id: &str, icao: Option<&str>, name: &str, lat: f64, lon: f64) -> Value {
    let mut item = json!({
        "_id": id,
        "name": name,
        "type": 2,
        "country": "FR",
        "geometry": {"type": "Point", "coordinates": [lon, lat]},
        "elevation": {"value": 100, "unit": 0, "referenceDatum": 1}
    });
    if let Some(icao) = icao {
        item["icaoCode"] = json!(icao);
    }
    item
}

pub fn navaid_item(id: &str, ident: &str, kind: i64, lat: f64, lon: f64, frequency: Value) -> Value {
    json!({
        "_id": id,
        "identifier": ident,
        "name": format!("{ident} navaid"),
        "type": kind,
        "country": "FR",
        "geometry": {"type": "Point", "coordinates": [lon, lat]},
        "frequency": {"value": frequency, "unit": 2}
    })
}

pub fn items_payload(items: Vec<Value>) -> Value {
    let total = items.len();
    json!({ "limit": 10, "page": 1, "totalCount": total, "items": items })
}

pub fn lfpn() -> Value {
    airport_item("5a2b7c9d1e3f", Some("LFPN"), "Toussus-le-Noble", 48.7519, 2.1061)
}

pub fn lfpg() -> Value {
    airport_item("62614a1f1d3e", Some("LFPG"), "Paris Charles de Gaulle", 49.0097, 2.5479)
}

pub fn lfpo() -> Value {
    airport_item("7c8d9e0f1a2b", Some("LFPO"), "Paris Orly", 48.7233, 2.3794)
}

pub fn unnamed_strip() -> Value {
    airport_item("9f8e7d6c5b4a", None, "Private strip", 48.9, 1.9)
}

pub fn rbt_vor() -> Value {
    navaid_item("6261b2c4aa01", "RBT", 0, 48.6547, 1.9950, json!("114.700"))
}

pub fn pgs_ndb() -> Value {
    navaid_item("6261b2c4aa02", "PGS", 3, 49.0967, 2.0417, json!(415))
}

#[derive(Debug, Clone)]
enum Scripted {
    Ok(Value),
    Status(u16),
}

#[derive(Debug, Default)]
struct State {
    routes: HashMap<&'static str, VecDeque<Scripted>>,
    requests: Vec<ApiRequest>,
}

/// Transport answering from per-path scripts
///
/// Each path has a queue of responses; the last one repeats forever. Clones
/// share scripts and the request log.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
    state: Arc<Mutex<State>>,
    latency: Option<Duration>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn then_ok(self, path: &'static str, payload: Value) -> Self {
        self.push(path, Scripted::Ok(payload));
        self
    }

    pub fn then_status(self, path: &'static str, status: u16) -> Self {
        self.push(path, Scripted::Status(status));
        self
    }

    fn push(&self, path: &'static str, response: Scripted) {
        self.state
            .lock()
            .routes
            .entry(path)
            .or_default()
            .push_back(response);
    }

    pub fn calls(&self) -> usize {
        self.state.lock().requests.len()
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.state.lock().requests.clone()
    }

    fn next_response(&self, request: &ApiRequest) -> Scripted {
        let mut state = self.state.lock();
        state.requests.push(request.clone());

        let Some(queue) = state.routes.get_mut(request.path) else {
            return Scripted::Status(404);
        };
        if queue.len() > 1 {
            queue.pop_front().unwrap_or(Scripted::Status(500))
        } else {
            queue.front().cloned().unwrap_or(Scripted::Status(404))
        }
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn get_json(&self, request: &ApiRequest) -> Result<Value, TransportError> {
        let response = self.next_response(request);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        match response {
            Scripted::Ok(payload) => Ok(payload),
            Scripted::Status(status) => Err(TransportError::status(status, request.path)),
        }
    }
}

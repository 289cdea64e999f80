//! Running actions against a client

use crate::cli::Action;
use aero_client::{AviationClient, ClientConfig, HttpTransport};
use aero_model::{RoutePlan, RoutePoint};
use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use std::path::Path;

/// Config file picked up from the working directory
pub(crate) const DEFAULT_CONFIG_FILE: &str = "aeronav.toml";

/// Resolve configuration: file (explicit or default), then environment
pub(crate) fn load_config(explicit: Option<&Path>) -> Result<ClientConfig> {
    let config = match explicit {
        Some(path) => ClientConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
            tracing::debug!("using {}", DEFAULT_CONFIG_FILE);
            ClientConfig::load(DEFAULT_CONFIG_FILE)
                .with_context(|| format!("failed to load {DEFAULT_CONFIG_FILE}"))?
        }
        None => ClientConfig::new(),
    };
    Ok(config.with_env_overrides())
}

/// Execute `action`, producing the JSON document to print
pub(crate) async fn execute<T: HttpTransport>(
    client: &AviationClient<T>,
    action: Action,
) -> Result<Value> {
    let value = match action {
        Action::SearchAirports(query) => serde_json::to_value(client.search_airports(&query).await?)?,
        Action::AirportByIcao(code) => serde_json::to_value(client.airport_by_icao(&code).await?)?,
        Action::AirportById(id) => serde_json::to_value(client.airport_by_id(&id).await?)?,
        Action::SearchWaypoints(query) => {
            serde_json::to_value(client.search_waypoints(&query).await?)?
        }
        Action::WaypointById(id) => serde_json::to_value(client.waypoint_by_id(&id).await?)?,
        Action::WaypointByIdent(ident) => {
            serde_json::to_value(client.waypoint_by_ident(&ident).await?)?
        }
        Action::Distance {
            from,
            to,
            speed_knots,
        } => {
            let points = [
                RoutePoint::new("origin", from.0, from.1),
                RoutePoint::new("destination", to.0, to.1),
            ];
            let plan = RoutePlan::build(&points, speed_knots);
            serde_json::to_value(plan.legs.first())?
        }
        Action::Route { icaos, speed_knots } => {
            let mut points = Vec::with_capacity(icaos.len());
            for icao in &icaos {
                let airport = client
                    .airport_by_icao(icao)
                    .await?
                    .ok_or_else(|| anyhow!("airport {icao} not found"))?;
                points.push(RoutePoint::from(&airport));
            }
            serde_json::to_value(RoutePlan::build(&points, speed_knots))?
        }
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aero_client::{AIRPORTS_PATH, NAVAIDS_PATH};
    use aero_test_utils::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn client(transport: &ScriptedTransport) -> AviationClient<ScriptedTransport> {
        AviationClient::with_transport(test_config(), transport.clone())
    }

    #[tokio::test]
    async fn airport_lookup_prints_record() {
        let transport = ScriptedTransport::new().then_ok(AIRPORTS_PATH, items_payload(vec![lfpn()]));

        let value = execute(&client(&transport), Action::AirportByIcao("LFPN".into()))
            .await
            .unwrap();

        assert_eq!(value["icao"], "LFPN");
        assert_eq!(value["name"], "Toussus-le-Noble");
    }

    #[tokio::test]
    async fn not_found_prints_null() {
        let transport = ScriptedTransport::new().then_ok(NAVAIDS_PATH, items_payload(vec![]));

        let value = execute(&client(&transport), Action::WaypointByIdent("ZZZ".into()))
            .await
            .unwrap();

        assert_eq!(value, Value::Null);
    }

    #[tokio::test]
    async fn short_search_prints_empty_list() {
        let transport = ScriptedTransport::new();

        let value = execute(&client(&transport), Action::SearchWaypoints("R".into()))
            .await
            .unwrap();

        assert_eq!(value, serde_json::json!([]));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn distance_needs_no_network() {
        let transport = ScriptedTransport::new();
        let action = Action::Distance {
            from: (0.0, 0.0),
            to: (0.0, 1.0),
            speed_knots: 120.0,
        };

        let value = execute(&client(&transport), action).await.unwrap();

        let km = value["distance_km"].as_f64().unwrap();
        assert!((km - 111.19).abs() < 0.01);
        assert_eq!(value["from"], "origin");
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn route_through_airports() {
        let transport = ScriptedTransport::new().then_ok(AIRPORTS_PATH, items_payload(vec![lfpn(), lfpg(), lfpo()]));
        let action = Action::Route {
            icaos: vec!["LFPN".into(), "LFPG".into(), "LFPO".into()],
            speed_knots: 100.0,
        };

        let value = execute(&client(&transport), action).await.unwrap();

        let legs = value["legs"].as_array().unwrap();
        assert_eq!(legs.len(), 2);
        assert_eq!(legs[0]["from"], "LFPN");
        assert_eq!(legs[1]["to"], "LFPO");
        assert_eq!(value["speed_knots"], 100.0);
    }

    #[tokio::test]
    async fn route_with_unknown_airport_fails() {
        let transport = ScriptedTransport::new()
            .then_ok(AIRPORTS_PATH, items_payload(vec![lfpn()]))
            .then_ok(AIRPORTS_PATH, items_payload(vec![]));
        let action = Action::Route {
            icaos: vec!["LFPN".into(), "ZZZZ".into()],
            speed_knots: 120.0,
        };

        let err = execute(&client(&transport), action).await.unwrap_err();
        assert!(err.to_string().contains("ZZZZ"), "got {err}");
        assert!(!err.to_string().contains("LFPN"));
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn upstream_failure_is_an_error() {
        let transport = ScriptedTransport::new().then_status(AIRPORTS_PATH, 500);

        let result = execute(&client(&transport), Action::AirportById("abc".into())).await;
        assert!(result.is_err());
    }

    #[test]
    fn explicit_config_file_is_loaded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "search_limit = 25\nmin_query_len = 3").unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.search_limit, 25);
        assert_eq!(config.min_query_len, 3);
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let err = load_config(Some(Path::new("/nonexistent/aeronav.toml"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/aeronav.toml"));
    }
}

//! Argument definitions and parsing into [`Action`]s

use anyhow::{anyhow, Result};
use clap::{value_parser, Arg, ArgMatches, Command};
use std::path::PathBuf;

/// What the user asked for
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Action {
    SearchAirports(String),
    AirportByIcao(String),
    AirportById(String),
    SearchWaypoints(String),
    WaypointById(String),
    WaypointByIdent(String),
    Distance {
        from: (f64, f64),
        to: (f64, f64),
        speed_knots: f64,
    },
    Route {
        icaos: Vec<String>,
        speed_knots: f64,
    },
}

/// Parsed command line
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Invocation {
    pub(crate) config_path: Option<PathBuf>,
    pub(crate) action: Action,
}

fn speed_arg() -> Arg {
    Arg::new("speed")
        .long("speed")
        .default_value("120")
        .value_parser(value_parser!(f64))
        .help("Cruise speed in knots")
}

fn coordinate_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .required(true)
        .allow_negative_numbers(true)
        .value_parser(value_parser!(f64))
        .help(help)
}

fn text_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).required(true).help(help)
}

pub(crate) fn build() -> Command {
    Command::new("aeronav")
        .version(aero_client::VERSION)
        .about("Airport, navaid and route lookups against OpenAIP")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML config file (default: ./aeronav.toml if present)"),
        )
        .subcommand(
            Command::new("airports")
                .about("Look up airports")
                .subcommand_required(true)
                .subcommand(
                    Command::new("search")
                        .about("Free-text airport search")
                        .arg(text_arg("query", "Name, city or code fragment")),
                )
                .subcommand(
                    Command::new("icao")
                        .about("Airport by ICAO code")
                        .arg(text_arg("code", "Four-letter ICAO code")),
                )
                .subcommand(
                    Command::new("id")
                        .about("Airport by provider id")
                        .arg(text_arg("id", "OpenAIP record id")),
                ),
        )
        .subcommand(
            Command::new("waypoints")
                .about("Look up navaids")
                .subcommand_required(true)
                .subcommand(
                    Command::new("search")
                        .about("Search navaids by identifier or name")
                        .arg(text_arg("query", "Identifier or name fragment")),
                )
                .subcommand(
                    Command::new("id")
                        .about("Navaid by provider id")
                        .arg(text_arg("id", "OpenAIP record id")),
                )
                .subcommand(
                    Command::new("ident")
                        .about("Navaid by published identifier")
                        .arg(text_arg("ident", "Identifier, e.g. RBT")),
                ),
        )
        .subcommand(
            Command::new("distance")
                .about("Great-circle distance, bearing and time between two points")
                .arg(coordinate_arg("lat1", "Origin latitude"))
                .arg(coordinate_arg("lon1", "Origin longitude"))
                .arg(coordinate_arg("lat2", "Destination latitude"))
                .arg(coordinate_arg("lon2", "Destination longitude"))
                .arg(speed_arg()),
        )
        .subcommand(
            Command::new("route")
                .about("Plan a route through airports given by ICAO code")
                .arg(
                    Arg::new("icao")
                        .required(true)
                        .num_args(2..)
                        .help("ICAO codes in flight order"),
                )
                .arg(speed_arg()),
        )
}

fn value<'a, T>(args: &'a ArgMatches, name: &str) -> Result<&'a T>
where
    T: Clone + Send + Sync + 'static,
{
    args.get_one::<T>(name)
        .ok_or_else(|| anyhow!("missing argument <{name}>"))
}

fn text(args: &ArgMatches, name: &str) -> Result<String> {
    value::<String>(args, name).cloned()
}

fn speed(args: &ArgMatches) -> Result<f64> {
    let speed = *value::<f64>(args, "speed")?;
    if speed.is_finite() && speed > 0.0 {
        Ok(speed)
    } else {
        Err(anyhow!("speed must be a positive number of knots, got {speed}"))
    }
}

pub(crate) fn parse(matches: &ArgMatches) -> Result<Invocation> {
    let config_path = matches.get_one::<PathBuf>("config").cloned();

    let action = match matches.subcommand() {
        Some(("airports", sub)) => match sub.subcommand() {
            Some(("search", args)) => Action::SearchAirports(text(args, "query")?),
            Some(("icao", args)) => Action::AirportByIcao(text(args, "code")?),
            Some(("id", args)) => Action::AirportById(text(args, "id")?),
            _ => return Err(anyhow!("unknown airports command")),
        },
        Some(("waypoints", sub)) => match sub.subcommand() {
            Some(("search", args)) => Action::SearchWaypoints(text(args, "query")?),
            Some(("id", args)) => Action::WaypointById(text(args, "id")?),
            Some(("ident", args)) => Action::WaypointByIdent(text(args, "ident")?),
            _ => return Err(anyhow!("unknown waypoints command")),
        },
        Some(("distance", args)) => Action::Distance {
            from: (*value::<f64>(args, "lat1")?, *value::<f64>(args, "lon1")?),
            to: (*value::<f64>(args, "lat2")?, *value::<f64>(args, "lon2")?),
            speed_knots: speed(args)?,
        },
        Some(("route", args)) => Action::Route {
            icaos: args
                .get_many::<String>("icao")
                .map(|codes| codes.cloned().collect())
                .unwrap_or_default(),
            speed_knots: speed(args)?,
        },
        _ => return Err(anyhow!("no command given")),
    };

    Ok(Invocation {
        config_path,
        action,
    })
}

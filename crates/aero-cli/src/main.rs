//! `aeronav`: airport, navaid and route lookups from the command line
//!
//! Results are printed to stdout as pretty JSON; logs go to stderr and are
//! controlled with `RUST_LOG` (default `warn`).

mod cli;
mod commands;

use aero_client::AviationClient;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

async fn run() -> anyhow::Result<()> {
    let matches = cli::build().get_matches();
    let invocation = cli::parse(&matches)?;

    let config = commands::load_config(invocation.config_path.as_deref())?;
    let client = AviationClient::new(config)?;

    let value = commands::execute(&client, invocation.action).await?;
    println!("{}", serde_json::to_string_pretty(&value)?);

    let stats = client.cache_stats();
    tracing::debug!(
        fetches = stats.fetches,
        hits = stats.hits,
        stale_served = stats.stale_served,
        "cache usage"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

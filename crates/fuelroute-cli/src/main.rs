//! Fuel-stop planner CLI.
//!
//! Loads the station and reference-location catalogs from JSON files,
//! resolves them through OpenRouteService, plans the trip, and prints the
//! resulting plan as JSON.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fuelroute_core::{
    plan_trip, resolve_references, resolve_stations, CancelFlag, PlaceQuery, PlannerConfig,
    ReferenceRecord, StationRecord,
};
use fuelroute_ors::{OrsClient, OrsConfig};

#[derive(Parser, Debug)]
#[command(version, about = "Plan fuel stops along a driving route", long_about = None)]
struct Args {
    /// Start location as "State,City,Address"
    #[arg(long)]
    start: String,

    /// End location as "State,City,Address"
    #[arg(long)]
    end: String,

    /// Fuel station catalog (JSON array of records)
    #[arg(long, default_value = "data/stations.json")]
    stations: PathBuf,

    /// Reference city catalog (JSON array of records)
    #[arg(long, default_value = "data/locations.json")]
    locations: PathBuf,

    /// Spacing between sampled waypoints in miles
    #[arg(long, default_value_t = 25.0)]
    spacing_miles: f64,

    /// Vehicle range on a full tank in miles
    #[arg(long, default_value_t = 500.0)]
    vehicle_range: f64,

    /// Search radius around each waypoint in miles
    #[arg(long, default_value_t = 10.0)]
    search_radius: f64,

    /// Price advantage required to refuel early (0.1 = 10% cheaper)
    #[arg(long, default_value_t = 0.1)]
    cost_threshold: f64,

    /// Gallons assumed per fill when costing the trip
    #[arg(long, default_value_t = 50.0)]
    fill_gallons: f64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fuelroute=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let config = PlannerConfig {
        spacing_miles: args.spacing_miles,
        vehicle_range_miles: args.vehicle_range,
        search_radius_miles: args.search_radius,
        cost_threshold: args.cost_threshold,
        fill_gallons: args.fill_gallons,
        ..PlannerConfig::default()
    };
    config.validate()?;

    let start = parse_place(&args.start).context("invalid --start")?;
    let end = parse_place(&args.end).context("invalid --end")?;

    let station_records: Vec<StationRecord> = load_json(&args.stations)
        .with_context(|| format!("reading station catalog {}", args.stations.display()))?;
    let reference_records: Vec<ReferenceRecord> = load_json(&args.locations)
        .with_context(|| format!("reading location catalog {}", args.locations.display()))?;

    let client = OrsClient::new(&OrsConfig::from_env());

    tracing::info!(
        stations = station_records.len(),
        references = reference_records.len(),
        "resolving catalogs"
    );
    let stations = resolve_stations(&client, &station_records).await?;
    let references = resolve_references(&client, &reference_records).await?;

    let cancel = CancelFlag::new();
    let abort = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, cancelling planning run");
            abort.cancel();
        }
    });

    tracing::info!("planning {} -> {}", args.start, args.end);
    let plan = plan_trip(
        &client,
        &client,
        &stations,
        &references,
        &start,
        &end,
        &config,
        &cancel,
    )
    .await?;

    if plan.stranded_risk {
        tracing::warn!(
            waypoints = ?plan.stranded_at,
            "forced refuel found no station in reach; plan carries stranded risk"
        );
    }

    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}

fn parse_place(raw: &str) -> Result<PlaceQuery> {
    let parts: Vec<&str> = raw.splitn(3, ',').map(str::trim).collect();
    let [state, city, address] = parts[..] else {
        anyhow::bail!("expected \"State,City,Address\", got {raw:?}");
    };
    Ok(PlaceQuery {
        state: state.to_string(),
        city: city.to_string(),
        address: address.to_string(),
    })
}

fn load_json<T: serde::de::DeserializeOwned>(path: &PathBuf) -> Result<T> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

use std::sync::Arc;

use clap::{Parser, ValueEnum};
use dotenv::dotenv;
use log::info;
use wkt::ToWkt;

use tollway::geo::Coordinate;
use tollway::route::{RoutePlanner, RouteType, SyntheticGeometry};
use tollway::toll::{TollDataset, TollLocator};
use tollway::track::{ManualScheduler, MemoryLocationStore, SessionStatus, Tracker};
use tollway::util::seed::seed_for;
use tollway::{Config, FuelType, VehicleId};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Json,
    Wkt,
}

/// Plans the fastest, economy and scenic routes between two positions.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Start position, as `lat,lng`
    #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
    from: Coordinate,

    /// End position, as `lat,lng`
    #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
    to: Coordinate,

    #[arg(long, default_value = "petrol")]
    fuel: FuelType,

    /// Toll plazas to place along the direct line between the endpoints
    #[arg(long, default_value_t = 0)]
    plazas: usize,

    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Replays a tracking session along the chosen route, one line per tick
    #[arg(long)]
    track: Option<RouteType>,

    #[arg(long, default_value = "cli")]
    vehicle: String,
}

fn parse_coordinate(value: &str) -> Result<Coordinate, String> {
    let (lat, lng) = value
        .split_once(',')
        .ok_or_else(|| format!("expected `lat,lng`, got {value:?}"))?;

    let lat = lat.trim().parse::<f64>().map_err(|err| err.to_string())?;
    let lng = lng.trim().parse::<f64>().map_err(|err| err.to_string())?;

    Coordinate::from_degree(lat, lng).map_err(|err| err.to_string())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load `.env` file, if present
    dotenv().ok();

    #[cfg(feature = "tracing")]
    tollway::util::trace::initialize_tracer();
    #[cfg(not(feature = "tracing"))]
    env_logger::init();

    let args = Args::parse();
    let config = Config::from_env()?;
    info!("Planning with args: {args:?}");

    let seed = seed_for(&[args.from, args.to], "plazas");
    let tolls = TollDataset::seeded_plazas(&args.from, &args.to, args.plazas, seed);
    let locator = TollLocator::new(tolls).with_corridor(config.planner.corridor_km)?;
    let planner = RoutePlanner::new(SyntheticGeometry, locator).with_speeds(config.planner.speeds);

    let plans = planner.calculate_routes(&args.from, &args.to, args.fuel)?;

    match args.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&plans)?),
        Format::Wkt => {
            for plan in &plans {
                println!("{}\t{}", plan.route_type(), plan.linestring().wkt_string());
            }
        }
    }

    if let Some(route_type) = args.track {
        let chosen = plans
            .into_iter()
            .find(|plan| plan.route_type() == route_type)
            .ok_or("no plan for the chosen route type")?;

        replay(VehicleId::new(args.vehicle), chosen, &config)?;
    }

    Ok(())
}

/// Drives a session to completion on a manual clock, printing each position.
fn replay(
    vehicle: VehicleId,
    plan: tollway::RoutePlan,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let clock = ManualScheduler::new();
    let tracker = Tracker::new(clock.clone(), MemoryLocationStore::new(), config.tracking.tick);
    let handle = tracker.start_tracking(vehicle, Arc::new(plan))?;

    println!("{}", serde_json::to_string(&handle.latest())?);
    while handle.latest().status == SessionStatus::Active {
        if clock.advance(config.tracking.tick) == 0 {
            break;
        }

        println!("{}", serde_json::to_string(&handle.latest())?);
    }

    Ok(())
}

//! Runtime configuration, read from the environment.
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `TOLLWAY_CORRIDOR_KM` | `2.0` | toll corridor width, km |
//! | `TOLLWAY_SPEED_FASTEST` | `80` | km/h |
//! | `TOLLWAY_SPEED_ECONOMY` | `60` | km/h |
//! | `TOLLWAY_SPEED_SCENIC` | `50` | km/h |
//! | `TOLLWAY_TICK_MS` | `1000` | tracking cadence, ms |
//! | `TOLLWAY_BIND` | `127.0.0.1:8001` | server address |
//!
//! Binaries load a `.env` file with `dotenv` before reading these.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::route::{RouteType, Speeds};
use crate::toll::DEFAULT_CORRIDOR_KM;

pub const CORRIDOR_KM: &str = "TOLLWAY_CORRIDOR_KM";
pub const SPEED_FASTEST: &str = "TOLLWAY_SPEED_FASTEST";
pub const SPEED_ECONOMY: &str = "TOLLWAY_SPEED_ECONOMY";
pub const SPEED_SCENIC: &str = "TOLLWAY_SPEED_SCENIC";
pub const TICK_MS: &str = "TOLLWAY_TICK_MS";
pub const BIND: &str = "TOLLWAY_BIND";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: String, value: String },

    #[error("speeds must satisfy fastest > economy >= scenic > 0, given {fastest}, {economy}, {scenic}")]
    SpeedOrdering { fastest: f64, economy: f64, scenic: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannerConfig {
    pub corridor_km: f64,
    pub speeds: Speeds,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            corridor_km: DEFAULT_CORRIDOR_KM,
            speeds: Speeds::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackingConfig {
    pub tick: Duration,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub planner: PlannerConfig,
    pub tracking: TrackingConfig,
    pub bind_address: SocketAddr,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            planner: PlannerConfig::default(),
            tracking: TrackingConfig::default(),
            bind_address: SocketAddr::from(([127, 0, 0, 1], 8001)),
        }
    }
}

impl Config {
    /// Reads the process environment, falling back to defaults for unset variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Config::default();
        let default_speeds = defaults.planner.speeds;

        let corridor_km = parse(&lookup, CORRIDOR_KM)?.unwrap_or(defaults.planner.corridor_km);
        if !corridor_km.is_finite() || corridor_km < 0.0 {
            return Err(invalid(CORRIDOR_KM, corridor_km));
        }

        let speeds = Speeds::new(
            parse(&lookup, SPEED_FASTEST)?.unwrap_or(default_speeds.for_route(RouteType::Fastest)),
            parse(&lookup, SPEED_ECONOMY)?.unwrap_or(default_speeds.for_route(RouteType::Economy)),
            parse(&lookup, SPEED_SCENIC)?.unwrap_or(default_speeds.for_route(RouteType::Scenic)),
        )?;

        let tick = match parse::<u64>(&lookup, TICK_MS)? {
            Some(0) => return Err(invalid(TICK_MS, 0)),
            Some(ms) => Duration::from_millis(ms),
            None => defaults.tracking.tick,
        };

        let bind_address = parse(&lookup, BIND)?.unwrap_or(defaults.bind_address);

        Ok(Config {
            planner: PlannerConfig { corridor_km, speeds },
            tracking: TrackingConfig { tick },
            bind_address,
        })
    }
}

fn invalid(key: &str, value: impl ToString) -> ConfigError {
    ConfigError::Invalid {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn parse<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>, ConfigError> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| invalid(key, raw)),
    }
}

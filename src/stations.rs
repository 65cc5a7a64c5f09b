//! Fuel and charging stations around a position.
//!
//! Station data is synthesized: positions are drawn from a generator
//! seeded by the query, so the same query always yields the same stations.

use geo::{Destination, Haversine};
use rand::Rng;
use serde::{Deserialize, Serialize};
use strum::{Display as StrumDisplay, EnumString};

use crate::geo::{distance_km, Coordinate, GeoError, METERS_PER_KM};
use crate::util::seed::{seed_for, seeded_rng};
use crate::vehicle::FuelType;

pub const DEFAULT_RADIUS_KM: f64 = 50.0;
pub const DEFAULT_STATION_COUNT: usize = 5;
pub const MAX_STATION_COUNT: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum StationKind {
    PetrolPump,
    ChargingStation,
}

impl StationKind {
    /// The kind of station a vehicle refuels at.
    pub fn for_fuel(fuel: FuelType) -> Self {
        match fuel {
            FuelType::Electric => StationKind::ChargingStation,
            FuelType::Petrol | FuelType::Diesel | FuelType::Hybrid => StationKind::PetrolPump,
        }
    }

    pub fn amenities(&self) -> &'static [&'static str] {
        match self {
            StationKind::PetrolPump => &["24/7", "ATM", "Restroom"],
            StationKind::ChargingStation => &["Fast Charging", "Cafe", "Parking"],
        }
    }

    fn title(&self) -> &'static str {
        match self {
            StationKind::PetrolPump => "Petrol Pump",
            StationKind::ChargingStation => "Charging Station",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: StationKind,
    #[serde(flatten)]
    pub location: Coordinate,
    pub distance_km: f64,
    pub address: String,
    pub amenities: Vec<String>,
}

/// `count` stations of `kind` within `radius_km` of `center`,
/// nearest first. At most [`MAX_STATION_COUNT`] may be asked for.
///
/// ```rust
/// use tollway::geo::{distance_km, Coordinate};
/// use tollway::stations::{nearby_stations, StationKind};
///
/// let delhi = Coordinate::from_degree(28.6139, 77.2090).unwrap();
/// let stations = nearby_stations(&delhi, StationKind::ChargingStation, 10.0, 5).unwrap();
///
/// assert_eq!(stations.len(), 5);
/// assert!(stations.iter().all(|station| distance_km(&delhi, &station.location) <= 10.0 + 1e-6));
/// ```
pub fn nearby_stations(
    center: &Coordinate,
    kind: StationKind,
    radius_km: f64,
    count: usize,
) -> Result<Vec<Station>, GeoError> {
    if !radius_km.is_finite() || radius_km < 0.0 {
        return Err(GeoError::InvalidRadius(radius_km));
    }

    if count > MAX_STATION_COUNT {
        return Err(GeoError::TooManyResults {
            requested: count,
            max: MAX_STATION_COUNT,
        });
    }

    let seed = seed_for(&[*center], &format!("{kind}:{radius_km}"));
    let mut rng = seeded_rng(seed);

    let mut stations = (1..=count)
        .map(|i| {
            let bearing = rng.gen_range(0.0..360.0);
            // Square root spreads positions evenly over the disc
            let reach = radius_km * rng.gen::<f64>().sqrt();
            let point = Haversine.destination(center.point(), bearing, reach * METERS_PER_KM);
            let location = Coordinate::from_point_clamped(point);

            Station {
                name: format!("{} {i}", kind.title()),
                kind,
                location,
                distance_km: distance_km(center, &location),
                address: format!("Location {i} Address"),
                amenities: kind.amenities().iter().map(|a| a.to_string()).collect(),
            }
        })
        .collect::<Vec<_>>();

    stations.sort_by(|a, b| {
        a.distance_km
            .total_cmp(&b.distance_km)
            .then_with(|| a.name.cmp(&b.name))
    });

    Ok(stations)
}

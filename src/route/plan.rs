use geo::LineString;
use serde::{Deserialize, Serialize};
use strum::{Display as StrumDisplay, EnumIter, EnumString};

use crate::cost::CostEstimate;
use crate::geo::Coordinate;
use crate::route::RouteError;
use crate::toll::TollCharge;

/// The optimisation profile of a route.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    StrumDisplay,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum RouteType {
    Fastest,
    Economy,
    Scenic,
}

impl RouteType {
    /// Every profile, in the order plans are returned.
    pub const ALL: [RouteType; 3] = [RouteType::Fastest, RouteType::Economy, RouteType::Scenic];
}

/// `RoutePlan`
///
/// One candidate route: its geometry and the cost of driving it.
/// A plan is immutable once built, and is shared read-only with
/// tracking sessions.
///
/// On the wire, coordinates are `[lng, lat]` pairs:
/// ```json
/// {
///   "route_type": "fastest",
///   "distance": 14.2,
///   "duration": 10.65,
///   "fuel_consumption": 1.136,
///   "estimated_cost": 113.6,
///   "tolls": [],
///   "coordinates": [[77.209, 28.6139], [77.1025, 28.7041]]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "WireRoute", try_from = "WireRoute")]
pub struct RoutePlan {
    route_type: RouteType,
    path: Vec<Coordinate>,
    distance_km: f64,
    duration_min: f64,
    fuel_consumption_l: f64,
    estimated_cost: f64,
    tolls: Vec<TollCharge>,
}

impl RoutePlan {
    pub fn new(
        route_type: RouteType,
        path: Vec<Coordinate>,
        distance_km: f64,
        duration_min: f64,
        estimate: CostEstimate,
        tolls: Vec<TollCharge>,
    ) -> Result<Self, RouteError> {
        if path.len() < 2 {
            return Err(RouteError::InvalidPlan(format!(
                "path needs at least two points, found {}",
                path.len()
            )));
        }

        let positive = |value: f64| value.is_finite() && value > 0.0;
        let non_negative = |value: f64| value.is_finite() && value >= 0.0;

        if !positive(distance_km) {
            return Err(RouteError::InvalidPlan(format!(
                "distance must be positive. Given: {distance_km}"
            )));
        }

        if !positive(duration_min) {
            return Err(RouteError::InvalidPlan(format!(
                "duration must be positive. Given: {duration_min}"
            )));
        }

        if !non_negative(estimate.fuel_consumption_l) || !non_negative(estimate.estimated_cost) {
            return Err(RouteError::InvalidPlan(format!(
                "cost figures must be non-negative. Given: {estimate:?}"
            )));
        }

        if let Some(toll) = tolls.iter().find(|toll| !non_negative(toll.amount)) {
            return Err(RouteError::InvalidPlan(format!(
                "toll {:?} has an invalid amount {}",
                toll.name, toll.amount
            )));
        }

        Ok(Self {
            route_type,
            path,
            distance_km,
            duration_min,
            fuel_consumption_l: estimate.fuel_consumption_l,
            estimated_cost: estimate.estimated_cost,
            tolls,
        })
    }

    pub fn route_type(&self) -> RouteType {
        self.route_type
    }

    pub fn path(&self) -> &[Coordinate] {
        &self.path
    }

    pub fn start(&self) -> &Coordinate {
        &self.path[0]
    }

    pub fn end(&self) -> &Coordinate {
        &self.path[self.path.len() - 1]
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn duration_min(&self) -> f64 {
        self.duration_min
    }

    pub fn fuel_consumption_l(&self) -> f64 {
        self.fuel_consumption_l
    }

    pub fn estimated_cost(&self) -> f64 {
        self.estimated_cost
    }

    pub fn tolls(&self) -> &[TollCharge] {
        &self.tolls
    }

    pub fn toll_total(&self) -> f64 {
        self.tolls.iter().map(|toll| toll.amount).sum()
    }

    pub fn linestring(&self) -> LineString {
        self.path.iter().map(Coordinate::point).collect::<LineString>()
    }
}

#[derive(Serialize, Deserialize)]
struct WireRoute {
    route_type: RouteType,
    distance: f64,
    duration: f64,
    fuel_consumption: f64,
    estimated_cost: f64,
    tolls: Vec<TollCharge>,
    coordinates: Vec<[f64; 2]>,
}

impl From<RoutePlan> for WireRoute {
    fn from(plan: RoutePlan) -> Self {
        WireRoute {
            route_type: plan.route_type,
            distance: plan.distance_km,
            duration: plan.duration_min,
            fuel_consumption: plan.fuel_consumption_l,
            estimated_cost: plan.estimated_cost,
            coordinates: plan.path.iter().map(Coordinate::slice).collect(),
            tolls: plan.tolls,
        }
    }
}

impl TryFrom<WireRoute> for RoutePlan {
    type Error = RouteError;

    fn try_from(wire: WireRoute) -> Result<Self, Self::Error> {
        let path = wire
            .coordinates
            .into_iter()
            .map(|[lng, lat]| Coordinate::from_degree(lat, lng))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| RouteError::InvalidPlan(err.to_string()))?;

        RoutePlan::new(
            wire.route_type,
            path,
            wire.distance,
            wire.duration,
            CostEstimate {
                fuel_consumption_l: wire.fuel_consumption,
                estimated_cost: wire.estimated_cost,
            },
            wire.tolls,
        )
    }
}

use std::cmp::Ordering;

use log::debug;
use measure_time::debug_time;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::cost::{CostEstimate, CostEstimator};
use crate::error::Result;
use crate::geo::{distance_km, path_length_km, Coordinate, GeoError, Geocoder, SAME_POSITION_KM};
use crate::route::{GeometryProvider, RouteError, RoutePlan, RouteType};
use crate::toll::{TollCharge, TollLocator, TollLookup};
use crate::vehicle::FuelType;

/// Average travel speed per profile, in km/h.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Speeds {
    fastest: f64,
    economy: f64,
    scenic: f64,
}

impl Default for Speeds {
    fn default() -> Self {
        Self {
            fastest: 80.0,
            economy: 60.0,
            scenic: 50.0,
        }
    }
}

impl Speeds {
    /// Requires `fastest > economy >= scenic > 0`.
    pub fn new(fastest: f64, economy: f64, scenic: f64) -> std::result::Result<Self, ConfigError> {
        let finite = [fastest, economy, scenic]
            .iter()
            .all(|speed| speed.is_finite() && *speed > 0.0);

        if !finite || fastest <= economy || economy < scenic {
            return Err(ConfigError::SpeedOrdering {
                fastest,
                economy,
                scenic,
            });
        }

        Ok(Self {
            fastest,
            economy,
            scenic,
        })
    }

    pub fn for_route(&self, route_type: RouteType) -> f64 {
        match route_type {
            RouteType::Fastest => self.fastest,
            RouteType::Economy => self.economy,
            RouteType::Scenic => self.scenic,
        }
    }
}

/// A geometry alternative, measured, with its tolls located and priced.
struct Candidate {
    path: Vec<Coordinate>,
    distance_km: f64,
    duration_min: f64,
    tolls: Vec<TollCharge>,
    estimate: CostEstimate,
}

/// Produces the fastest, economy and scenic plans between two positions.
#[derive(Debug, Clone)]
pub struct RoutePlanner<G, T>
where
    G: GeometryProvider,
    T: TollLookup,
{
    geometry: G,
    tolls: TollLocator<T>,
    estimator: CostEstimator,
    speeds: Speeds,
}

impl<G, T> RoutePlanner<G, T>
where
    G: GeometryProvider,
    T: TollLookup,
{
    pub fn new(geometry: G, tolls: TollLocator<T>) -> Self {
        Self {
            geometry,
            tolls,
            estimator: CostEstimator::default(),
            speeds: Speeds::default(),
        }
    }

    pub fn with_estimator(mut self, estimator: CostEstimator) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn with_speeds(mut self, speeds: Speeds) -> Self {
        self.speeds = speeds;
        self
    }

    pub fn speeds(&self) -> &Speeds {
        &self.speeds
    }

    pub fn estimator(&self) -> &CostEstimator {
        &self.estimator
    }

    pub fn toll_locator(&self) -> &TollLocator<T> {
        &self.tolls
    }

    /// Produces one plan per [`RouteType`], ordered fastest, economy, scenic.
    ///
    /// Fails with [`GeoError::IdenticalEndpoints`] if the endpoints are
    /// the same position (per axis, or on the ground), and with [`RouteError::GenerationFailure`] if
    /// any single profile cannot be produced. No partial set is returned.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "info", skip(self), err))]
    pub fn calculate_routes(
        &self,
        start: &Coordinate,
        end: &Coordinate,
        fuel: FuelType,
    ) -> Result<[RoutePlan; 3]> {
        debug_time!("calculate_routes");

        if start.approx_eq(end) || distance_km(start, end) < SAME_POSITION_KM {
            return Err(GeoError::IdenticalEndpoints(start.to_string()).into());
        }

        let fastest = self.plan(start, end, RouteType::Fastest, fuel)?;
        let economy = self.plan(start, end, RouteType::Economy, fuel)?;
        let scenic = self.plan(start, end, RouteType::Scenic, fuel)?;

        for (a, b) in [(&fastest, &economy), (&fastest, &scenic), (&economy, &scenic)] {
            if a.path() == b.path() {
                return Err(RouteError::GenerationFailure {
                    route_type: b.route_type(),
                    reason: format!("path is identical to the {} route", a.route_type()),
                }
                .into());
            }
        }

        Ok([fastest, economy, scenic])
    }

    /// Resolves both addresses, then behaves as [`RoutePlanner::calculate_routes`].
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "info", skip(self, geocoder), err))]
    pub fn calculate_routes_between(
        &self,
        geocoder: &dyn Geocoder,
        start_address: &str,
        end_address: &str,
        fuel: FuelType,
    ) -> Result<[RoutePlan; 3]> {
        let start = geocoder.geocode(start_address)?;
        let end = geocoder.geocode(end_address)?;

        self.calculate_routes(&start, &end, fuel)
    }

    fn plan(
        &self,
        start: &Coordinate,
        end: &Coordinate,
        route_type: RouteType,
        fuel: FuelType,
    ) -> std::result::Result<RoutePlan, RouteError> {
        let failure = |reason: String| RouteError::GenerationFailure { route_type, reason };

        let candidates = self
            .geometry
            .alternatives(start, end, route_type)
            .map_err(|err| failure(err.to_string()))?
            .into_iter()
            .map(|path| self.measure(path, start, end, route_type, fuel))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(failure)?;

        let Candidate {
            path,
            distance_km,
            duration_min,
            tolls,
            estimate,
        } = Self::select(route_type, candidates)
            .ok_or_else(|| failure("geometry provider returned no paths".to_string()))?;

        debug!(
            "Generated {route_type} route: {} points, {distance_km:.3}km, {duration_min:.1}min, {} tolls, cost {}",
            path.len(),
            tolls.len(),
            estimate.estimated_cost
        );

        RoutePlan::new(route_type, path, distance_km, duration_min, estimate, tolls)
            .map_err(|err| failure(err.to_string()))
    }

    /// Checks a provider path is usable, pinning its ends to the exact
    /// requested positions, then prices it.
    fn measure(
        &self,
        mut path: Vec<Coordinate>,
        start: &Coordinate,
        end: &Coordinate,
        route_type: RouteType,
        fuel: FuelType,
    ) -> std::result::Result<Candidate, String> {
        if path.len() < 2 {
            return Err(format!("path has {} points, at least 2 required", path.len()));
        }

        let last = path.len() - 1;
        if !path[0].approx_eq(start) || !path[last].approx_eq(end) {
            return Err(format!(
                "path runs {} to {}, expected {start} to {end}",
                path[0], path[last]
            ));
        }

        path[0] = *start;
        path[last] = *end;

        let distance_km = path_length_km(&path);
        if !distance_km.is_finite() || distance_km <= 0.0 {
            return Err(format!("path has no length ({distance_km}km)"));
        }

        let tolls = self.tolls.locate_tolls(&path);
        let duration_min = distance_km / self.speeds.for_route(route_type) * 60.0;
        let estimate = self
            .estimator
            .estimate(distance_km, duration_min, fuel, &tolls)
            .map_err(|err| err.to_string())?;

        Ok(Candidate {
            path,
            distance_km,
            duration_min,
            tolls,
            estimate,
        })
    }

    /// Economy prefers the lowest total cost, then the shortest path.
    /// Fastest prefers the shortest path. Scenic takes the first offered.
    fn select(route_type: RouteType, candidates: Vec<Candidate>) -> Option<Candidate> {
        let shorter = |a: &Candidate, b: &Candidate| a.distance_km.total_cmp(&b.distance_km);

        match route_type {
            RouteType::Economy => candidates.into_iter().min_by(|a, b| {
                match a.estimate.estimated_cost.total_cmp(&b.estimate.estimated_cost) {
                    Ordering::Equal => shorter(a, b),
                    ordering => ordering,
                }
            }),
            RouteType::Fastest => candidates.into_iter().min_by(shorter),
            RouteType::Scenic => candidates.into_iter().next(),
        }
    }
}

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::alerts::{safety_alerts, SafetyAlert};
use crate::config::Config;
use crate::geo::Coordinate;
use crate::route::{RoutePlan, RoutePlanner, SyntheticGeometry};
use crate::stations::{nearby_stations, Station, StationKind, DEFAULT_RADIUS_KM, DEFAULT_STATION_COUNT};
use crate::toll::{TollDataset, TollLocator};
use crate::track::{MemoryLocationStore, Progress, StoredLocation, TokioScheduler, Tracker, TrackingError};
use crate::vehicle::{FuelType, VehicleId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteRequest {
    pub start: Coordinate,
    pub end: Coordinate,
    pub vehicle_fuel_type: FuelType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingStarted {
    pub vehicle_id: VehicleId,
    pub session_id: u64,
    pub progress: Progress,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NearbyQuery {
    pub lat: f64,
    pub lng: f64,
    #[serde(rename = "type")]
    pub kind: StationKind,
    pub radius: Option<f64>,
    pub count: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PositionQuery {
    pub lat: f64,
    pub lng: f64,
}

/// Everything the HTTP layer serves from: one planner, one tracker.
#[derive(Debug)]
pub struct RouteService {
    planner: RoutePlanner<SyntheticGeometry, TollDataset>,
    tracker: Tracker<TokioScheduler, MemoryLocationStore>,
}

impl RouteService {
    pub fn new(
        planner: RoutePlanner<SyntheticGeometry, TollDataset>,
        tracker: Tracker<TokioScheduler, MemoryLocationStore>,
    ) -> Self {
        Self { planner, tracker }
    }

    /// Builds the service from configuration, over a toll dataset.
    pub fn from_config(config: &Config, tolls: TollDataset, scheduler: TokioScheduler) -> crate::Result<Self> {
        let locator = TollLocator::new(tolls)
            .with_corridor(config.planner.corridor_km)
            .map_err(|err| crate::config::ConfigError::Invalid {
                key: crate::config::CORRIDOR_KM.to_string(),
                value: err.to_string(),
            })?;

        let planner = RoutePlanner::new(SyntheticGeometry, locator).with_speeds(config.planner.speeds);
        let tracker = Tracker::new(scheduler, MemoryLocationStore::new(), config.tracking.tick);

        Ok(Self::new(planner, tracker))
    }

    pub fn planner(&self) -> &RoutePlanner<SyntheticGeometry, TollDataset> {
        &self.planner
    }

    pub fn tracker(&self) -> &Tracker<TokioScheduler, MemoryLocationStore> {
        &self.tracker
    }

    pub fn router(self: Arc<Self>) -> Router {
        Router::new()
            .route("/", get(Self::health))
            .route("/api/routes/calculate", post(Self::calculate))
            .route("/api/tracking/:vehicle_id/start", post(Self::start_tracking))
            .route("/api/tracking/:vehicle_id/stop", post(Self::stop_tracking))
            .route("/api/tracking/:vehicle_id", get(Self::progress))
            .route("/api/vehicles/:vehicle_id/location", get(Self::location))
            .route("/api/locations/nearby", get(Self::nearby))
            .route("/api/safety/alerts", get(Self::alerts))
            .with_state(self)
    }

    pub(super) async fn health() -> StatusCode {
        StatusCode::OK
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, err))]
    pub(super) async fn calculate(
        State(state): State<Arc<Self>>,
        Json(request): Json<RouteRequest>,
    ) -> crate::Result<Json<[RoutePlan; 3]>> {
        let plans = state
            .planner
            .calculate_routes(&request.start, &request.end, request.vehicle_fuel_type)?;

        Ok(Json(plans))
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, err))]
    pub(super) async fn start_tracking(
        State(state): State<Arc<Self>>,
        Path(vehicle_id): Path<VehicleId>,
        Json(plan): Json<RoutePlan>,
    ) -> crate::Result<Json<TrackingStarted>> {
        let handle = state
            .tracker
            .start_tracking(vehicle_id.clone(), Arc::new(plan))?;

        Ok(Json(TrackingStarted {
            vehicle_id,
            session_id: handle.session_id(),
            progress: handle.latest(),
        }))
    }

    pub(super) async fn stop_tracking(
        State(state): State<Arc<Self>>,
        Path(vehicle_id): Path<VehicleId>,
    ) -> crate::Result<StatusCode> {
        state.tracker.stop_vehicle(&vehicle_id)?;
        Ok(StatusCode::NO_CONTENT)
    }

    pub(super) async fn progress(
        State(state): State<Arc<Self>>,
        Path(vehicle_id): Path<VehicleId>,
    ) -> crate::Result<Json<Progress>> {
        state
            .tracker
            .progress(&vehicle_id)
            .map(Json)
            .ok_or_else(|| TrackingError::UnknownVehicle(vehicle_id).into())
    }

    pub(super) async fn location(
        State(state): State<Arc<Self>>,
        Path(vehicle_id): Path<VehicleId>,
    ) -> crate::Result<Json<StoredLocation>> {
        state
            .tracker
            .store()
            .last_location(&vehicle_id)
            .map(Json)
            .ok_or_else(|| TrackingError::UnknownVehicle(vehicle_id).into())
    }

    pub(super) async fn nearby(Query(query): Query<NearbyQuery>) -> crate::Result<Json<Vec<Station>>> {
        let center = Coordinate::from_degree(query.lat, query.lng)?;
        let stations = nearby_stations(
            &center,
            query.kind,
            query.radius.unwrap_or(DEFAULT_RADIUS_KM),
            query.count.unwrap_or(DEFAULT_STATION_COUNT),
        )?;

        Ok(Json(stations))
    }

    pub(super) async fn alerts(Query(query): Query<PositionQuery>) -> crate::Result<Json<Vec<SafetyAlert>>> {
        let center = Coordinate::from_degree(query.lat, query.lng)?;
        Ok(Json(safety_alerts(&center)))
    }
}

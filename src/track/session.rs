use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display as StrumDisplay;

use crate::geo::Coordinate;
use crate::route::RoutePlan;
use crate::track::TrackingError;
use crate::vehicle::VehicleId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Idle,
    Active,
    Completed,
    Stopped,
}

impl SessionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::Stopped)
    }
}

/// A snapshot of a session, emitted on every tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub position_index: usize,
    pub coordinate: Coordinate,
    /// Fraction of the path's positions reached, in `[0, 1]`.
    pub completion_pct: f64,
    pub eta_min: f64,
    pub status: SessionStatus,
}

/// `TrackingSession`
///
/// One vehicle's simulated progress along a [`RoutePlan`]. Only the
/// position index moves, so every transition is O(1) in path length.
///
/// ```rust
/// # use std::sync::Arc;
/// # use tollway::route::{RoutePlanner, SyntheticGeometry};
/// # use tollway::toll::{TollDataset, TollLocator};
/// # use tollway::geo::Coordinate;
/// use tollway::track::{SessionStatus, TrackingSession};
/// # use tollway::FuelType;
/// # let planner = RoutePlanner::new(SyntheticGeometry, TollLocator::new(TollDataset::default()));
/// # let start = Coordinate::from_degree(28.6139, 77.2090).unwrap();
/// # let end = Coordinate::from_degree(28.7041, 77.1025).unwrap();
/// # let [fastest, ..] = planner.calculate_routes(&start, &end, FuelType::Petrol).unwrap();
///
/// let mut session = TrackingSession::new("KA-01".into(), Arc::new(fastest));
/// session.begin().unwrap();
///
/// while session.status() == SessionStatus::Active {
///     session.tick().unwrap();
/// }
///
/// assert_eq!(session.progress().completion_pct, 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct TrackingSession {
    vehicle_id: VehicleId,
    route: Arc<RoutePlan>,
    position_index: usize,
    status: SessionStatus,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
}

impl TrackingSession {
    pub fn new(vehicle_id: VehicleId, route: Arc<RoutePlan>) -> Self {
        Self {
            vehicle_id,
            route,
            position_index: 0,
            status: SessionStatus::Idle,
            started_at: None,
            finished_at: None,
        }
    }

    pub fn vehicle_id(&self) -> &VehicleId {
        &self.vehicle_id
    }

    pub fn route(&self) -> &Arc<RoutePlan> {
        &self.route
    }

    pub fn position_index(&self) -> usize {
        self.position_index
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    fn last_index(&self) -> usize {
        self.route.path().len() - 1
    }

    fn ensure(&self, expected: SessionStatus) -> Result<(), TrackingError> {
        if self.status != expected {
            return Err(TrackingError::InvalidState {
                expected,
                actual: self.status,
            });
        }

        Ok(())
    }

    /// Moves an idle session onto the first position of its route.
    pub fn begin(&mut self) -> Result<Progress, TrackingError> {
        self.ensure(SessionStatus::Idle)?;

        self.position_index = 0;
        self.status = SessionStatus::Active;
        self.started_at = Some(Utc::now());
        Ok(self.progress())
    }

    /// Advances one position. Reaching the final position completes the session.
    pub fn tick(&mut self) -> Result<Progress, TrackingError> {
        self.ensure(SessionStatus::Active)?;

        self.position_index = (self.position_index + 1).min(self.last_index());
        if self.position_index == self.last_index() {
            self.status = SessionStatus::Completed;
            self.finished_at = Some(Utc::now());
        }

        Ok(self.progress())
    }

    /// Stops an active session, returning whether it was active.
    /// Stopping any other session does nothing.
    pub fn stop(&mut self) -> bool {
        if self.status != SessionStatus::Active {
            return false;
        }

        self.status = SessionStatus::Stopped;
        self.finished_at = Some(Utc::now());
        true
    }

    pub fn progress(&self) -> Progress {
        let completion_pct = self.position_index as f64 / self.last_index() as f64;

        Progress {
            position_index: self.position_index,
            coordinate: self.route.path()[self.position_index],
            completion_pct,
            eta_min: self.route.duration_min() * (1.0 - completion_pct),
            status: self.status,
        }
    }
}

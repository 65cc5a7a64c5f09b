use thiserror::Error;

use crate::track::SessionStatus;
use crate::vehicle::VehicleId;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrackingError {
    #[error("session is {actual}, the operation requires {expected}")]
    InvalidState {
        expected: SessionStatus,
        actual: SessionStatus,
    },

    #[error("no tracking session for vehicle {0}")]
    UnknownVehicle(VehicleId),
}

/// A location write that did not land. Recovered by the caller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PersistenceError {
    #[error("location store unavailable: {0}")]
    Unavailable(String),

    #[error("location write rejected: {0}")]
    Rejected(String),
}

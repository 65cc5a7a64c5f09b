//! Where tracked positions are written.

use std::fmt::{Debug, Formatter};
use std::num::NonZeroUsize;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;
use crate::track::PersistenceError;
use crate::vehicle::VehicleId;

/// Receives every position a tracked vehicle reaches.
///
/// Called synchronously from the tick job, so implementations should
/// return promptly. Writes are best-effort: a failure is logged by the
/// tracker and the session carries on.
pub trait LocationStore: Send + Sync {
    fn persist(&self, vehicle_id: &VehicleId, coordinate: Coordinate) -> Result<(), PersistenceError>;
}

impl<T> LocationStore for Arc<T>
where
    T: LocationStore + ?Sized,
{
    fn persist(&self, vehicle_id: &VehicleId, coordinate: Coordinate) -> Result<(), PersistenceError> {
        (**self).persist(vehicle_id, coordinate)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StoredLocation {
    #[serde(flatten)]
    pub coordinate: Coordinate,
    pub recorded_at: DateTime<Utc>,
}

/// Keeps the last known location of every vehicle.
#[derive(Default)]
pub struct MemoryLocationStore {
    locations: scc::HashMap<VehicleId, StoredLocation>,
}

impl MemoryLocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_location(&self, vehicle_id: &VehicleId) -> Option<StoredLocation> {
        self.locations.read(vehicle_id, |_, location| *location)
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

impl Debug for MemoryLocationStore {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "MemoryLocationStore with Vehicles: {}", self.locations.len())
    }
}

impl LocationStore for MemoryLocationStore {
    fn persist(&self, vehicle_id: &VehicleId, coordinate: Coordinate) -> Result<(), PersistenceError> {
        self.locations.upsert(
            vehicle_id.clone(),
            StoredLocation {
                coordinate,
                recorded_at: Utc::now(),
            },
        );

        Ok(())
    }
}

/// Retries failed writes immediately, up to a fixed number of attempts.
///
/// Not used unless configured, the tracker's default is a single attempt.
#[derive(Debug)]
pub struct RetryingStore<L>
where
    L: LocationStore,
{
    inner: L,
    attempts: NonZeroUsize,
}

impl<L> RetryingStore<L>
where
    L: LocationStore,
{
    pub fn new(inner: L, attempts: NonZeroUsize) -> Self {
        Self { inner, attempts }
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }
}

impl<L> LocationStore for RetryingStore<L>
where
    L: LocationStore,
{
    fn persist(&self, vehicle_id: &VehicleId, coordinate: Coordinate) -> Result<(), PersistenceError> {
        let mut attempt = 1;

        loop {
            match self.inner.persist(vehicle_id, coordinate) {
                Ok(()) => return Ok(()),
                Err(err) if attempt >= self.attempts.get() => return Err(err),
                Err(err) => {
                    debug!("Location write {attempt} for {vehicle_id} failed, retrying: {err}");
                    attempt += 1;
                }
            }
        }
    }
}

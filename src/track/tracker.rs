use std::fmt::{Debug, Formatter};
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use log::{debug, info, warn};
use tokio::sync::watch;

use crate::route::RoutePlan;
use crate::track::{
    Job, LocationStore, Progress, Scheduler, SessionStatus, TimerHandle, TrackingError, TrackingSession,
};
use crate::vehicle::VehicleId;

/// A session and the channel its progress is published on.
/// Shared between the tracker and the session's tick job.
struct SessionCell {
    session: Mutex<TrackingSession>,
    updates: watch::Sender<Progress>,
}

impl SessionCell {
    fn lock(&self) -> MutexGuard<'_, TrackingSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

struct RunningSession {
    id: u64,
    cell: Arc<SessionCell>,
    timer: TimerHandle,
}

impl RunningSession {
    /// Stops the session and revokes its timer. Holding the session lock
    /// while doing so means no tick can persist after this returns.
    fn stop(&self) -> bool {
        let mut session = self.cell.lock();
        let stopped = session.stop();
        self.timer.cancel();

        if stopped {
            self.cell.updates.send_replace(session.progress());
        }

        stopped
    }
}

#[derive(Default)]
struct VehicleSlot {
    current: Option<RunningSession>,
}

/// Returned by [`Tracker::start_tracking`], identifies one session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    vehicle_id: VehicleId,
    session_id: u64,
    updates: watch::Receiver<Progress>,
}

impl SessionHandle {
    pub fn vehicle_id(&self) -> &VehicleId {
        &self.vehicle_id
    }

    pub fn session_id(&self) -> u64 {
        self.session_id
    }

    /// The most recently published progress.
    pub fn latest(&self) -> Progress {
        self.updates.borrow().clone()
    }

    /// A receiver notified on every tick and on stop.
    pub fn updates(&self) -> watch::Receiver<Progress> {
        self.updates.clone()
    }
}

/// `Tracker`
///
/// Owns at most one running session per vehicle. Starting and stopping
/// are serialized per vehicle, vehicles never contend with each other.
///
/// ```rust
/// use std::sync::Arc;
/// use std::time::Duration;
/// use tollway::geo::Coordinate;
/// use tollway::route::{RoutePlanner, SyntheticGeometry};
/// use tollway::toll::{TollDataset, TollLocator};
/// use tollway::track::{ManualScheduler, MemoryLocationStore, SessionStatus, Tracker};
/// use tollway::{FuelType, VehicleId};
///
/// let planner = RoutePlanner::new(SyntheticGeometry, TollLocator::new(TollDataset::default()));
/// let start = Coordinate::from_degree(28.6139, 77.2090).unwrap();
/// let end = Coordinate::from_degree(28.7041, 77.1025).unwrap();
/// let [fastest, ..] = planner.calculate_routes(&start, &end, FuelType::Petrol).unwrap();
///
/// let clock = ManualScheduler::new();
/// let tracker = Tracker::new(clock.clone(), MemoryLocationStore::new(), Duration::from_secs(1));
///
/// let vehicle = VehicleId::from("DL-3C-1234");
/// let handle = tracker.start_tracking(vehicle.clone(), Arc::new(fastest)).unwrap();
///
/// clock.advance(Duration::from_secs(60));
/// assert_eq!(handle.latest().status, SessionStatus::Completed);
/// assert_eq!(tracker.store().last_location(&vehicle).unwrap().coordinate, end);
/// ```
pub struct Tracker<S, L>
where
    S: Scheduler,
    L: LocationStore + 'static,
{
    scheduler: S,
    store: Arc<L>,
    period: Duration,
    slots: scc::HashMap<VehicleId, Arc<Mutex<VehicleSlot>>>,
    sequence: AtomicU64,
}

impl<S, L> Tracker<S, L>
where
    S: Scheduler,
    L: LocationStore + 'static,
{
    pub fn new(scheduler: S, store: L, period: Duration) -> Self {
        Self {
            scheduler,
            store: Arc::new(store),
            period,
            slots: scc::HashMap::default(),
            sequence: AtomicU64::new(1),
        }
    }

    pub fn store(&self) -> &L {
        &self.store
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    fn slot(&self, vehicle_id: &VehicleId) -> Arc<Mutex<VehicleSlot>> {
        self.slots
            .entry(vehicle_id.clone())
            .or_insert_with(Default::default)
            .get()
            .clone()
    }

    fn existing_slot(&self, vehicle_id: &VehicleId) -> Option<Arc<Mutex<VehicleSlot>>> {
        self.slots.read(vehicle_id, |_, slot| slot.clone())
    }

    fn lock(slot: &Mutex<VehicleSlot>) -> MutexGuard<'_, VehicleSlot> {
        slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Starts following `route` from its first position.
    ///
    /// An active session of the same vehicle is stopped first, so two
    /// sessions never publish positions for one vehicle.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "info", skip(self, route), err))]
    pub fn start_tracking(
        &self,
        vehicle_id: VehicleId,
        route: Arc<RoutePlan>,
    ) -> Result<SessionHandle, TrackingError> {
        let slot = self.slot(&vehicle_id);
        let mut slot = Self::lock(&slot);

        if let Some(previous) = slot.current.take() {
            if previous.stop() {
                info!("Superseded session {} of vehicle {vehicle_id}", previous.id);
            }
        }

        let mut session = TrackingSession::new(vehicle_id.clone(), route);
        let initial = session.begin()?;
        let (updates, receiver) = watch::channel(initial);

        let session_id = self.sequence.fetch_add(1, Ordering::Relaxed);
        let cell = Arc::new(SessionCell {
            session: Mutex::new(session),
            updates,
        });

        let job = Self::tick_job(cell.clone(), self.store.clone(), vehicle_id.clone(), session_id);
        let timer = self.scheduler.schedule(self.period, job);

        slot.current = Some(RunningSession {
            id: session_id,
            cell,
            timer,
        });

        info!("Started session {session_id} for vehicle {vehicle_id}");
        Ok(SessionHandle {
            vehicle_id,
            session_id,
            updates: receiver,
        })
    }

    /// Stops the session behind `handle`, if it is still the vehicle's
    /// current session. Calling this again has no effect.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "info", skip_all))]
    pub fn stop_tracking(&self, handle: &SessionHandle) {
        let Some(slot) = self.existing_slot(&handle.vehicle_id) else {
            return;
        };

        let slot = Self::lock(&slot);
        if let Some(running) = slot
            .current
            .as_ref()
            .filter(|running| running.id == handle.session_id)
        {
            if running.stop() {
                info!("Stopped session {} of vehicle {}", running.id, handle.vehicle_id);
            }
        }
    }

    /// Stops whichever session the vehicle is running.
    pub fn stop_vehicle(&self, vehicle_id: &VehicleId) -> Result<Progress, TrackingError> {
        let slot = self
            .existing_slot(vehicle_id)
            .ok_or_else(|| TrackingError::UnknownVehicle(vehicle_id.clone()))?;

        let slot = Self::lock(&slot);
        let running = slot
            .current
            .as_ref()
            .ok_or_else(|| TrackingError::UnknownVehicle(vehicle_id.clone()))?;

        if running.stop() {
            info!("Stopped session {} of vehicle {vehicle_id}", running.id);
        }

        let progress = running.cell.lock().progress();
        Ok(progress)
    }

    /// Progress of the vehicle's most recent session.
    pub fn progress(&self, vehicle_id: &VehicleId) -> Option<Progress> {
        let slot = self.existing_slot(vehicle_id)?;
        let slot = Self::lock(&slot);
        let running = slot.current.as_ref()?;

        let progress = running.cell.lock().progress();
        Some(progress)
    }

    /// Subscribes to the vehicle's current session.
    pub fn subscribe(&self, vehicle_id: &VehicleId) -> Option<watch::Receiver<Progress>> {
        let slot = self.existing_slot(vehicle_id)?;
        let slot = Self::lock(&slot);
        slot.current.as_ref().map(|running| running.cell.updates.subscribe())
    }

    pub fn active_count(&self) -> usize {
        let mut active = 0;
        self.slots.scan(|_, slot| {
            let slot = Self::lock(slot);
            if let Some(running) = &slot.current {
                if running.cell.lock().status() == SessionStatus::Active {
                    active += 1;
                }
            }
        });

        active
    }

    /// Drops vehicles whose session has finished. Returns how many were removed.
    pub fn prune(&self) -> usize {
        let before = self.slots.len();
        self.slots.retain(|_, slot| {
            let slot = Self::lock(slot);
            slot.current
                .as_ref()
                .is_some_and(|running| !running.cell.lock().status().is_terminal())
        });

        let removed = before.saturating_sub(self.slots.len());
        debug!("Pruned {removed} finished tracking sessions");
        removed
    }

    fn tick_job(cell: Arc<SessionCell>, store: Arc<L>, vehicle_id: VehicleId, session_id: u64) -> Job {
        Box::new(move || {
            let mut session = cell.lock();
            if session.status() != SessionStatus::Active {
                return ControlFlow::Break(());
            }

            let progress = match session.tick() {
                Ok(progress) => progress,
                Err(err) => {
                    warn!("Session {session_id} of vehicle {vehicle_id} could not advance: {err}");
                    return ControlFlow::Break(());
                }
            };

            if let Err(err) = store.persist(&vehicle_id, progress.coordinate) {
                warn!("Failed to persist location of vehicle {vehicle_id}, continuing: {err}");
            }

            debug!(
                "Vehicle {vehicle_id} at position {} ({:.1}%), eta {:.1}min",
                progress.position_index,
                progress.completion_pct * 100.0,
                progress.eta_min
            );

            let completed = progress.status == SessionStatus::Completed;
            cell.updates.send_replace(progress);

            if completed {
                info!("Session {session_id} of vehicle {vehicle_id} completed");
                return ControlFlow::Break(());
            }

            ControlFlow::Continue(())
        })
    }
}

impl<S, L> Drop for Tracker<S, L>
where
    S: Scheduler,
    L: LocationStore + 'static,
{
    fn drop(&mut self) {
        self.slots.scan(|_, slot| {
            if let Some(running) = &Self::lock(slot).current {
                running.timer.cancel();
            }
        });
    }
}

impl<S, L> Debug for Tracker<S, L>
where
    S: Scheduler,
    L: LocationStore + 'static,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Tracker with Vehicles: {}, period {:?}",
            self.slots.len(),
            self.period
        )
    }
}

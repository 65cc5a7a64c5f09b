use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use approx::assert_relative_eq;

use crate::cost::CostEstimate;
use crate::geo::Coordinate;
use crate::route::{RoutePlan, RouteType};
use crate::track::*;
use crate::vehicle::VehicleId;

const PERIOD: Duration = Duration::from_secs(1);

fn coord(lat: f64, lng: f64) -> Coordinate {
    Coordinate::from_degree(lat, lng).expect("valid coordinate")
}

/// A five-point route along the equator, taking 40 minutes.
fn route() -> Arc<RoutePlan> {
    let path = (0..5).map(|i| coord(0.0, i as f64 * 0.1)).collect::<Vec<_>>();
    let estimate = CostEstimate {
        fuel_consumption_l: 3.5,
        estimated_cost: 350.0,
    };

    Arc::new(RoutePlan::new(RouteType::Fastest, path, 44.5, 40.0, estimate, vec![]).expect("valid plan"))
}

#[derive(Default)]
struct RecordingStore {
    writes: AtomicUsize,
    failing: AtomicBool,
    seen: Mutex<Vec<(VehicleId, Coordinate)>>,
}

impl RecordingStore {
    fn failing() -> Self {
        let store = Self::default();
        store.failing.store(true, Ordering::SeqCst);
        store
    }

    fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn writes_for(&self, vehicle_id: &VehicleId) -> usize {
        self.seen
            .lock()
            .expect("not poisoned")
            .iter()
            .filter(|(id, _)| id == vehicle_id)
            .count()
    }
}

impl LocationStore for RecordingStore {
    fn persist(&self, vehicle_id: &VehicleId, coordinate: Coordinate) -> Result<(), PersistenceError> {
        self.writes.fetch_add(1, Ordering::SeqCst);

        if self.failing.load(Ordering::SeqCst) {
            return Err(PersistenceError::Unavailable("store is down".to_string()));
        }

        self.seen
            .lock()
            .expect("not poisoned")
            .push((vehicle_id.clone(), coordinate));
        Ok(())
    }
}

/// Fails the first `failures` writes, then succeeds.
struct FlakyStore {
    failures: usize,
    calls: AtomicUsize,
}

impl LocationStore for FlakyStore {
    fn persist(&self, _: &VehicleId, _: Coordinate) -> Result<(), PersistenceError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) < self.failures {
            return Err(PersistenceError::Rejected("timeout".to_string()));
        }

        Ok(())
    }
}

fn manual_tracker<L: LocationStore + 'static>(store: L) -> (ManualScheduler, Tracker<ManualScheduler, L>) {
    let clock = ManualScheduler::new();
    let tracker = Tracker::new(clock.clone(), store, PERIOD);
    (clock, tracker)
}

#[test]
fn session_walks_every_position() {
    let route = route();
    let mut session = TrackingSession::new("KA-01".into(), route.clone());

    assert_eq!(session.status(), SessionStatus::Idle);
    let initial = session.begin().expect("idle sessions begin");
    assert_eq!(initial.position_index, 0);
    assert_eq!(initial.completion_pct, 0.0);
    assert_eq!(initial.eta_min, 40.0);
    assert!(session.started_at().is_some());

    for index in 1..route.path().len() {
        let progress = session.tick().expect("active sessions tick");
        assert_eq!(progress.position_index, index);
        assert_eq!(progress.coordinate, route.path()[index]);
    }

    let last = session.progress();
    assert_eq!(last.status, SessionStatus::Completed);
    assert_eq!(last.completion_pct, 1.0);
    assert_eq!(last.eta_min, 0.0);
    assert!(session.finished_at().is_some());
}

#[test]
fn progress_reports_fraction_and_eta() {
    let mut session = TrackingSession::new("KA-01".into(), route());
    session.begin().expect("idle sessions begin");

    let progress = session.tick().expect("active sessions tick");
    assert_relative_eq!(progress.completion_pct, 0.25);
    assert_relative_eq!(progress.eta_min, 30.0);
    assert_eq!(progress.status, SessionStatus::Active);
}

#[test]
fn transitions_outside_active_are_rejected() {
    let mut session = TrackingSession::new("KA-01".into(), route());

    assert_eq!(
        session.tick(),
        Err(TrackingError::InvalidState {
            expected: SessionStatus::Active,
            actual: SessionStatus::Idle,
        })
    );
    assert!(!session.stop(), "idle sessions do not stop");

    session.begin().expect("idle sessions begin");
    assert!(session.begin().is_err());

    while session.status() == SessionStatus::Active {
        session.tick().expect("active sessions tick");
    }

    assert!(session.tick().is_err());
    assert!(!session.stop(), "completed sessions stay completed");
    assert_eq!(session.status(), SessionStatus::Completed);
    assert_eq!(session.position_index(), 4);
}

#[test]
fn stop_is_idempotent() {
    let mut session = TrackingSession::new("KA-01".into(), route());
    session.begin().expect("idle sessions begin");
    session.tick().expect("active sessions tick");

    assert!(session.stop());
    assert!(!session.stop());
    assert_eq!(session.status(), SessionStatus::Stopped);
    assert_eq!(session.position_index(), 1);
}

#[test_log::test]
fn tracked_route_completes_after_final_tick() {
    let (clock, tracker) = manual_tracker(RecordingStore::default());
    let vehicle = VehicleId::from("DL-01");
    let route = route();

    let handle = tracker
        .start_tracking(vehicle.clone(), route.clone())
        .expect("tracking starts");
    assert_eq!(handle.latest().position_index, 0);

    let runs = clock.advance(PERIOD * 60);

    // L - 1 ticks, and none scheduled past completion.
    assert_eq!(runs, route.path().len() - 1);
    assert_eq!(clock.pending(), 0);
    assert_eq!(tracker.store().writes(), route.path().len() - 1);

    let latest = handle.latest();
    assert_eq!(latest.status, SessionStatus::Completed);
    assert_eq!(latest.completion_pct, 1.0);
    assert_eq!(latest.coordinate, *route.end());
    assert_eq!(tracker.active_count(), 0);
}

#[test]
fn ticks_follow_the_period() {
    let (clock, tracker) = manual_tracker(RecordingStore::default());
    let handle = tracker
        .start_tracking("DL-01".into(), route())
        .expect("tracking starts");

    assert_eq!(clock.advance(PERIOD / 2), 0);
    assert_eq!(clock.advance(PERIOD / 2), 1);
    assert_eq!(clock.advance(PERIOD * 2), 2);
    assert_eq!(handle.latest().position_index, 3);
}

#[test]
fn stopping_halts_persistence() {
    let (clock, tracker) = manual_tracker(RecordingStore::default());
    let handle = tracker
        .start_tracking("DL-01".into(), route())
        .expect("tracking starts");

    clock.advance(PERIOD * 2);
    tracker.stop_tracking(&handle);

    let writes = tracker.store().writes();
    assert_eq!(writes, 2);

    assert_eq!(clock.advance(PERIOD * 10), 0);
    assert_eq!(tracker.store().writes(), writes);
    assert_eq!(handle.latest().status, SessionStatus::Stopped);
    assert_eq!(handle.latest().position_index, 2);

    // Stopping again changes nothing.
    tracker.stop_tracking(&handle);
    assert_eq!(handle.latest().status, SessionStatus::Stopped);
}

#[test_log::test]
fn restarting_supersedes_the_active_session() {
    let (clock, tracker) = manual_tracker(RecordingStore::default());
    let vehicle = VehicleId::from("DL-01");

    let first = tracker
        .start_tracking(vehicle.clone(), route())
        .expect("tracking starts");
    clock.advance(PERIOD * 2);

    let second = tracker
        .start_tracking(vehicle.clone(), route())
        .expect("tracking restarts");

    assert_ne!(first.session_id(), second.session_id());
    assert_eq!(first.latest().status, SessionStatus::Stopped);
    assert_eq!(second.latest().position_index, 0);
    assert_eq!(second.latest().status, SessionStatus::Active);
    assert_eq!(tracker.active_count(), 1);

    // Only the new session ticks from here on.
    assert_eq!(clock.advance(PERIOD), 1);
    assert_eq!(first.latest().position_index, 2);
    assert_eq!(second.latest().position_index, 1);
    assert_eq!(tracker.progress(&vehicle).map(|p| p.position_index), Some(1));
}

#[test]
fn stale_handles_do_not_stop_newer_sessions() {
    let (clock, tracker) = manual_tracker(RecordingStore::default());
    let vehicle = VehicleId::from("DL-01");

    let stale = tracker
        .start_tracking(vehicle.clone(), route())
        .expect("tracking starts");
    let current = tracker
        .start_tracking(vehicle.clone(), route())
        .expect("tracking restarts");

    tracker.stop_tracking(&stale);
    clock.advance(PERIOD);

    assert_eq!(current.latest().status, SessionStatus::Active);
    assert_eq!(current.latest().position_index, 1);
}

#[test_log::test]
fn failed_writes_never_stop_ticking() {
    let (clock, tracker) = manual_tracker(RecordingStore::failing());
    let handle = tracker
        .start_tracking("DL-01".into(), route())
        .expect("tracking starts");

    clock.advance(PERIOD * 10);

    assert_eq!(handle.latest().status, SessionStatus::Completed);
    assert_eq!(tracker.store().writes(), 4);
}

#[test]
fn vehicles_track_independently() {
    let (clock, tracker) = manual_tracker(RecordingStore::default());
    let a = VehicleId::from("DL-01");
    let b = VehicleId::from("DL-02");

    let first = tracker.start_tracking(a.clone(), route()).expect("tracking starts");
    clock.advance(PERIOD);
    let second = tracker.start_tracking(b.clone(), route()).expect("tracking starts");
    clock.advance(PERIOD);

    assert_eq!(tracker.active_count(), 2);
    tracker.stop_tracking(&first);
    clock.advance(PERIOD);

    assert_eq!(first.latest().position_index, 2);
    assert_eq!(second.latest().position_index, 2);
    assert_eq!(tracker.store().writes_for(&a), 2);
    assert_eq!(tracker.store().writes_for(&b), 2);
}

#[test]
fn stopping_an_unknown_vehicle_fails() {
    let (_, tracker) = manual_tracker(RecordingStore::default());
    let ghost = VehicleId::from("ghost");

    assert_eq!(
        tracker.stop_vehicle(&ghost),
        Err(TrackingError::UnknownVehicle(ghost.clone()))
    );
    assert!(tracker.progress(&ghost).is_none());
}

#[test]
fn stop_vehicle_reports_final_progress() {
    let (clock, tracker) = manual_tracker(RecordingStore::default());
    let vehicle = VehicleId::from("DL-01");

    tracker.start_tracking(vehicle.clone(), route()).expect("tracking starts");
    clock.advance(PERIOD);

    let progress = tracker.stop_vehicle(&vehicle).expect("vehicle is tracked");
    assert_eq!(progress.status, SessionStatus::Stopped);
    assert_eq!(progress.position_index, 1);
}

#[test]
fn finished_sessions_are_pruned() {
    let (clock, tracker) = manual_tracker(RecordingStore::default());

    tracker.start_tracking("DL-01".into(), route()).expect("tracking starts");
    tracker.start_tracking("DL-02".into(), route()).expect("tracking starts");
    tracker.stop_vehicle(&"DL-02".into()).expect("vehicle is tracked");

    assert_eq!(tracker.prune(), 1);
    assert_eq!(tracker.active_count(), 1);

    clock.advance(PERIOD * 10);
    assert_eq!(tracker.prune(), 1);
    assert!(tracker.progress(&"DL-01".into()).is_none());
}

#[test]
fn memory_store_keeps_last_location() {
    let (clock, tracker) = manual_tracker(MemoryLocationStore::new());
    let vehicle = VehicleId::from("DL-01");
    let route = route();

    tracker.start_tracking(vehicle.clone(), route.clone()).expect("tracking starts");
    assert!(tracker.store().last_location(&vehicle).is_none());

    clock.advance(PERIOD * 2);
    let stored = tracker.store().last_location(&vehicle).expect("position stored");
    assert_eq!(stored.coordinate, route.path()[2]);
    assert_eq!(tracker.store().len(), 1);
}

#[test]
fn retrying_store_recovers_flaky_writes() {
    let flaky = FlakyStore {
        failures: 2,
        calls: AtomicUsize::new(0),
    };
    let store = RetryingStore::new(flaky, NonZeroUsize::new(3).expect("non-zero"));

    assert!(store.persist(&"DL-01".into(), coord(0.0, 0.0)).is_ok());
    assert_eq!(store.inner().calls.load(Ordering::SeqCst), 3);
}

#[test]
fn retrying_store_gives_up_after_attempts() {
    let flaky = FlakyStore {
        failures: 10,
        calls: AtomicUsize::new(0),
    };
    let store = RetryingStore::new(flaky, NonZeroUsize::new(2).expect("non-zero"));

    assert_eq!(
        store.persist(&"DL-01".into(), coord(0.0, 0.0)),
        Err(PersistenceError::Rejected("timeout".to_string()))
    );
    assert_eq!(store.inner().calls.load(Ordering::SeqCst), 2);
}

#[test]
fn cancelled_manual_timers_never_run() {
    let clock = ManualScheduler::new();
    let runs = Arc::new(AtomicUsize::new(0));
    let counter = runs.clone();

    let timer = clock.schedule(
        PERIOD,
        Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            std::ops::ControlFlow::Continue(())
        }),
    );

    assert_eq!(clock.advance(PERIOD * 3), 3);
    timer.cancel();
    assert!(timer.is_cancelled());
    assert_eq!(clock.advance(PERIOD * 3), 0);
    assert_eq!(runs.load(Ordering::SeqCst), 3);
    assert_eq!(clock.pending(), 0);
}

#[tokio::test(start_paused = true)]
async fn tokio_scheduler_drives_sessions_to_completion() {
    let scheduler = TokioScheduler::current().expect("inside a runtime");
    let tracker = Tracker::new(scheduler, MemoryLocationStore::new(), PERIOD);
    let vehicle = VehicleId::from("DL-01");
    let route = route();

    let handle = tracker
        .start_tracking(vehicle.clone(), route.clone())
        .expect("tracking starts");

    tokio::time::sleep(PERIOD * 4 + PERIOD / 2).await;

    assert_eq!(handle.latest().status, SessionStatus::Completed);
    assert_eq!(
        tracker.store().last_location(&vehicle).map(|stored| stored.coordinate),
        Some(*route.end())
    );
}

#[tokio::test(start_paused = true)]
async fn tokio_scheduler_stops_synchronously() {
    let scheduler = TokioScheduler::current().expect("inside a runtime");
    let tracker = Tracker::new(scheduler, RecordingStore::default(), PERIOD);

    let handle = tracker
        .start_tracking("DL-01".into(), route())
        .expect("tracking starts");
    let mut updates = handle.updates();

    updates.changed().await.expect("first tick published");
    assert_eq!(updates.borrow().position_index, 1);

    tracker.stop_tracking(&handle);
    let writes = tracker.store().writes();

    tokio::time::sleep(PERIOD * 10).await;
    assert_eq!(tracker.store().writes(), writes);
    assert_eq!(handle.latest().status, SessionStatus::Stopped);
}

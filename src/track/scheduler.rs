//! Periodic execution of tracking jobs.
//!
//! A job is invoked once per period until it returns
//! [`ControlFlow::Break`] or its [`TimerHandle`] is cancelled.

use std::fmt::{Debug, Formatter};
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tokio::time::MissedTickBehavior;

pub type Job = Box<dyn FnMut() -> ControlFlow<()> + Send + 'static>;

/// Shortest period a job may be scheduled at.
const MIN_PERIOD: Duration = Duration::from_millis(1);

pub trait Scheduler: Send + Sync {
    fn schedule(&self, period: Duration, job: Job) -> TimerHandle;
}

/// Revokes a scheduled job.
///
/// Once [`TimerHandle::cancel`] returns, the job is never started again.
/// A run already in progress finishes normally.
pub struct TimerHandle {
    cancelled: Arc<AtomicBool>,
    task: Option<AbortHandle>,
}

impl TimerHandle {
    fn new(cancelled: Arc<AtomicBool>, task: Option<AbortHandle>) -> Self {
        Self { cancelled, task }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);

        if let Some(task) = &self.task {
            task.abort();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

impl Debug for TimerHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerHandle")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Runs each job on its own task, paced by [`tokio::time::interval`].
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Uses the runtime the caller is running within, if any.
    pub fn current() -> Option<Self> {
        Handle::try_current().ok().map(Self::new)
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, period: Duration, mut job: Job) -> TimerHandle {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = cancelled.clone();

        let task = self.handle.spawn(async move {
            let mut interval = tokio::time::interval(period.max(MIN_PERIOD));
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            // The first tick completes immediately, jobs start one period in.
            interval.tick().await;

            loop {
                interval.tick().await;

                if flag.load(Ordering::Acquire) || job().is_break() {
                    break;
                }
            }
        });

        TimerHandle::new(cancelled, Some(task.abort_handle()))
    }
}

struct ManualTimer {
    id: u64,
    period: Duration,
    due: Duration,
    cancelled: Arc<AtomicBool>,
    job: Job,
}

#[derive(Default)]
struct ManualClock {
    now: Duration,
    timers: Vec<ManualTimer>,
}

/// A fake timer for tests and replays, time only moves through
/// [`ManualScheduler::advance`].
///
/// Jobs run on the caller's thread, outside the scheduler's own lock,
/// so a job may block on locks held by code that schedules.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    clock: Arc<Mutex<ManualClock>>,
    sequence: Arc<AtomicU64>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn clock(&self) -> std::sync::MutexGuard<'_, ManualClock> {
        self.clock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn now(&self) -> Duration {
        self.clock().now
    }

    /// Number of jobs that are still scheduled.
    pub fn pending(&self) -> usize {
        self.clock()
            .timers
            .iter()
            .filter(|timer| !timer.cancelled.load(Ordering::Acquire))
            .count()
    }

    /// Moves time forward, running every job that falls due in order.
    /// Returns the number of job runs.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now() + by;
        let mut runs = 0;

        loop {
            let next = {
                let mut clock = self.clock();
                clock
                    .timers
                    .retain(|timer| !timer.cancelled.load(Ordering::Acquire));

                let earliest = clock
                    .timers
                    .iter()
                    .enumerate()
                    .filter(|(_, timer)| timer.due <= target)
                    .min_by_key(|(_, timer)| (timer.due, timer.id))
                    .map(|(index, _)| index);

                match earliest {
                    Some(index) => {
                        let timer = clock.timers.swap_remove(index);
                        clock.now = timer.due;
                        Some(timer)
                    }
                    None => {
                        clock.now = target;
                        None
                    }
                }
            };

            let Some(mut timer) = next else {
                break;
            };

            runs += 1;
            let flow = (timer.job)();

            if flow.is_continue() && !timer.cancelled.load(Ordering::Acquire) {
                timer.due += timer.period;
                self.clock().timers.push(timer);
            }
        }

        runs
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, period: Duration, job: Job) -> TimerHandle {
        let cancelled = Arc::new(AtomicBool::new(false));
        let period = period.max(MIN_PERIOD);

        let mut clock = self.clock();
        let due = clock.now + period;
        clock.timers.push(ManualTimer {
            id: self.sequence.fetch_add(1, Ordering::Relaxed),
            period,
            due,
            cancelled: cancelled.clone(),
            job,
        });

        TimerHandle::new(cancelled, None)
    }
}

impl Debug for ManualScheduler {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("now", &self.now())
            .field("pending", &self.pending())
            .finish()
    }
}

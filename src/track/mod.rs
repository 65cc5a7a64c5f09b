//! Simulated live tracking of a vehicle along a chosen route.
//!
//! ## Structure
//! A [`TrackingSession`] is a plain state machine, advanced one path
//! position per [`TrackingSession::tick`]. The [`Tracker`] owns one session
//! per vehicle and drives it with a periodic job on a [`Scheduler`],
//! forwarding every position to a [`LocationStore`].
//!
//! ```text
//!  Idle ──begin──► Active ──tick (last position)──► Completed
//!                    │
//!                    └──stop──► Stopped
//! ```
//!
//! Stopping is synchronous. Once [`Tracker::stop_tracking`] returns, the
//! session's timer is cancelled and its store receives no further writes.

#[doc(hidden)]
pub mod error;
pub mod scheduler;
#[doc(hidden)]
pub mod session;
pub mod store;
#[doc(hidden)]
pub mod tracker;

#[cfg(test)]
mod test;

#[doc(inline)]
pub use error::{PersistenceError, TrackingError};
#[doc(inline)]
pub use scheduler::{Job, ManualScheduler, Scheduler, TimerHandle, TokioScheduler};
#[doc(inline)]
pub use session::{Progress, SessionStatus, TrackingSession};
#[doc(inline)]
pub use store::{LocationStore, MemoryLocationStore, RetryingStore, StoredLocation};
#[doc(inline)]
pub use tracker::{SessionHandle, Tracker};

//! Locating the toll plazas a route passes through.
//!
//! Toll data is owned by an external dataset, reached through the
//! [`TollLookup`] trait. The [`TollLocator`] refines whatever the
//! dataset returns into a deterministic, corridor-filtered list
//! ordered by the distance travelled before reaching each plaza.

#[doc(hidden)]
pub mod charge;
#[doc(hidden)]
pub mod dataset;
#[doc(hidden)]
pub mod error;
#[doc(hidden)]
pub mod locator;

#[cfg(test)]
mod test;

/// Default lateral distance from the path within which a plaza is on the route.
pub const DEFAULT_CORRIDOR_KM: f64 = 2.0;

#[doc(inline)]
pub use charge::TollCharge;
#[doc(inline)]
pub use dataset::TollDataset;
#[doc(inline)]
pub use error::TollError;
#[doc(inline)]
pub use locator::{TollLocator, TollLookup};

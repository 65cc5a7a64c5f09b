//! Fuel and toll costing of a finished route.
//!
//! ## Structure
//! Per-fuel consumption and price live in a [`FuelTable`], which
//! is supplied to the [`CostEstimator`]. The estimator is a pure
//! function over `(distance, duration, fuel, tolls)`.
//!
//! ```rust
//! use tollway::cost::{CostEstimator, FuelTable};
//! use tollway::FuelType;
//!
//! let estimator = CostEstimator::new(FuelTable::default());
//! let estimate = estimator.estimate(100.0, 75.0, FuelType::Petrol, &[]).unwrap();
//!
//! // 100km at 0.08 L/km, priced at 100 per litre
//! assert_eq!(estimate.fuel_consumption_l, 8.0);
//! assert_eq!(estimate.estimated_cost, 800.0);
//! ```
//!
//! ### Energy equivalence
//! Electric and hybrid vehicles are costed in litre-equivalents, so
//! consumption figures stay comparable across every [`FuelType`].
//!
//! [`FuelType`]: crate::vehicle::FuelType

#[doc(hidden)]
pub mod error;
#[doc(hidden)]
pub mod estimator;
#[doc(hidden)]
pub mod fuel;


#[doc(inline)]
pub use error::CostError;
#[doc(inline)]
pub use estimator::{round2, CostEstimate, CostEstimator};
#[doc(inline)]
pub use fuel::{FuelRate, FuelTable};

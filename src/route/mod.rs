//! Generating the three route alternatives between two positions.
//!
//! ## Structure
//! A [`RoutePlanner`] asks its [`GeometryProvider`] for a path per
//! [`RouteType`], finds the tolls along each path with a
//! [`TollLocator`](crate::toll::TollLocator), and prices the result
//! with a [`CostEstimator`](crate::cost::CostEstimator).
//!
//! ```rust
//! use tollway::geo::Coordinate;
//! use tollway::route::{RoutePlanner, RouteType, SyntheticGeometry};
//! use tollway::toll::{TollDataset, TollLocator};
//! use tollway::FuelType;
//!
//! let start = Coordinate::from_degree(28.6139, 77.2090).unwrap();
//! let end = Coordinate::from_degree(28.7041, 77.1025).unwrap();
//!
//! let planner = RoutePlanner::new(SyntheticGeometry, TollLocator::new(TollDataset::default()));
//! let [fastest, economy, scenic] = planner.calculate_routes(&start, &end, FuelType::Petrol).unwrap();
//!
//! assert_eq!(fastest.route_type(), RouteType::Fastest);
//! assert!(scenic.distance_km() > fastest.distance_km());
//! assert!(economy.duration_min() > 0.0);
//! ```
//!
//! Generation is all-or-nothing: if any profile fails, no plan is returned.

#[doc(hidden)]
pub mod error;
#[doc(hidden)]
pub mod generator;
pub mod geometry;
#[doc(hidden)]
pub mod plan;


#[doc(inline)]
pub use error::RouteError;
#[doc(inline)]
pub use generator::{RoutePlanner, Speeds};
#[doc(inline)]
pub use geometry::{GeometryProvider, SyntheticGeometry};
#[doc(inline)]
pub use plan::{RoutePlan, RouteType};

//! Geographic primitives.
//!
//! Every position handled by the crate is a validated [`Coordinate`].
//! Distances are great-circle (haversine) distances, expressed in
//! kilometres unless the name says otherwise.

/// Two coordinates closer than this on both axes are the same position.
pub const COORDINATE_EPSILON: f64 = 1e-6;

/// Positions closer than this on the ground are the same position,
/// even when their axes differ (near the poles).
pub const SAME_POSITION_KM: f64 = 1e-6;

pub const METERS_PER_KM: f64 = 1000.0;

#[doc(hidden)]
pub mod coord;
pub mod distance;
#[doc(hidden)]
pub mod error;
pub mod geocode;

#[cfg(test)]
mod test;

#[doc(inline)]
pub use coord::latlng::{Coordinate, Degree};
#[doc(inline)]
pub use distance::{distance_km, path_length_km, project_onto_path, PathProjection};
#[doc(inline)]
pub use error::{GeoError, GeocodeError};
#[doc(inline)]
pub use geocode::{Geocoder, StaticGeocoder};

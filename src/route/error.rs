use thiserror::Error;

use crate::route::RouteType;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouteError {
    /// A single profile could not be produced, which fails the whole batch.
    #[error("could not generate the {route_type} route: {reason}")]
    GenerationFailure { route_type: RouteType, reason: String },

    #[error("geometry unavailable: {0}")]
    GeometryUnavailable(String),

    #[error("invalid route plan: {0}")]
    InvalidPlan(String),
}

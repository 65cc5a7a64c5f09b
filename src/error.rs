use thiserror::Error;

use crate::config::ConfigError;
use crate::cost::CostError;
use crate::geo::{GeoError, GeocodeError};
use crate::route::RouteError;
use crate::track::TrackingError;

/// The crate-level error, every submodule error converts into it.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Geo(#[from] GeoError),

    #[error(transparent)]
    Geocode(#[from] GeocodeError),

    #[error(transparent)]
    Route(#[from] RouteError),

    #[error(transparent)]
    Cost(#[from] CostError),

    #[error(transparent)]
    Tracking(#[from] TrackingError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;

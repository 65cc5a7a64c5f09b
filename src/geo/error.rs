use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeoError {
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("start and end resolve to the same position {0}")]
    IdenticalEndpoints(String),

    #[error("search radius must be finite and non-negative. Given: {0}")]
    InvalidRadius(f64),

    #[error("at most {max} results may be requested. Given: {requested}")]
    TooManyResults { requested: usize, max: usize },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeocodeError {
    #[error("no position found for address {0:?}")]
    NotFound(String),

    #[error("geocoder unavailable: {0}")]
    Unavailable(String),
}

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TollError {
    #[error("toll dataset could not be read: {0}")]
    ReadFailure(String),

    #[error("corridor width must be finite and non-negative. Given: {0}")]
    InvalidCorridor(f64),
}

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CostError {
    #[error("distance must be a finite, non-negative number of kilometres. Given: {0}")]
    InvalidDistance(f64),

    #[error("duration must be a finite, non-negative number of minutes. Given: {0}")]
    InvalidDuration(f64),

    #[error("toll {name:?} has an invalid amount {amount}")]
    InvalidToll { name: String, amount: f64 },

    #[error("fuel rate for {0} must be finite and non-negative")]
    InvalidRate(String),
}

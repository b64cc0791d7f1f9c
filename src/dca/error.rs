//! Error taxonomy for the optimization engine

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DcaError {
    /// Empty, too short, non-finite or non-positive price series
    #[error("Invalid price data: {0}")]
    InvalidPriceData(String),

    /// Non-positive amount/duration or unrecognized risk tolerance
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Not enough finite returns to estimate volatility or run the simulation
    #[error("Insufficient returns: need at least {required}, got {available}")]
    InsufficientReturns { required: usize, available: usize },

    /// Post-condition violated after an otherwise successful computation
    #[error("Invalid result: {0}")]
    InvalidResult(String),
}

pub type DcaResult<T> = Result<T, DcaError>;

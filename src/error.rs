//! Error types for the revenue-forecast library.

use thiserror::Error;

/// Result type alias for forecast operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors that can occur during forecasting operations.
///
/// Only precondition violations are surfaced to callers; numerical
/// degeneracies inside a strategy degrade to a best-effort forecast
/// instead of failing after partial computation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Not enough historical data points to forecast.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// A historical revenue value is invalid (negative or non-finite).
    #[error("invalid revenue data: {0}")]
    InvalidRevenueData(String),

    /// Invalid configuration parameter.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// No strategy registered under the requested method name.
    #[error("unknown forecast method: {0}")]
    UnknownMethod(String),

    /// Computation error (e.g. every ensemble member failed).
    #[error("computation error: {0}")]
    ComputationError(String),
}

impl ForecastError {
    /// Stable machine-readable code for downstream alerting consumers.
    pub fn code(&self) -> &'static str {
        match self {
            ForecastError::InsufficientData { .. } => "INSUFFICIENT_DATA",
            ForecastError::InvalidRevenueData(_) => "INVALID_REVENUE_DATA",
            ForecastError::InvalidParameter(_) => "INVALID_PARAMETER",
            ForecastError::UnknownMethod(_) => "UNKNOWN_METHOD",
            ForecastError::ComputationError(_) => "COMPUTATION_ERROR",
        }
    }
}

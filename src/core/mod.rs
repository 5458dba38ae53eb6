//! Core data model: historical input, configuration, and forecast output.

pub mod config;
pub mod history;
pub mod output;

pub use config::{ForecastConfig, ForecastMethod, ForecastOverrides, ServiceConfig};
pub use history::{Granularity, HistoricalRevenueInput, HistoricalRevenuePoint};
pub use output::{
    ConfidenceInterval, ForecastConfidence, ForecastedRevenuePoint, ModelFitStatistics,
    RevenueForecastOutput, TrendAnalysis, TrendDirection,
};

//! Forecast output records.
//!
//! Everything here is a plain immutable value type, constructed fresh per
//! call and returned by value. Fields are additive-only for downstream
//! reporting and alerting consumers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::history::Granularity;

/// Interval expected to contain the true future value at `level` probability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
    /// Coverage probability, e.g. 0.95.
    pub level: f64,
}

impl ConfidenceInterval {
    /// Interval width.
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// One forecasted future period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastedRevenuePoint {
    pub date: NaiveDate,
    /// Point estimate, never negative.
    pub predicted: f64,
    pub confidence_interval: ConfidenceInterval,
    /// Multiplicative seasonal factor applied, when seasonality is on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seasonal_factor: Option<f64>,
    /// Trend contribution at this horizon, for strategies that model one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend_component: Option<f64>,
    /// Set when the interval is wide relative to the point estimate.
    pub high_uncertainty: bool,
}

/// In-sample goodness-of-fit measures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFitStatistics {
    /// Variance explained, clamped to [0, 1].
    pub r_squared: f64,
    /// Mean absolute error.
    pub mae: f64,
    /// Mean absolute percentage error (over non-zero actuals).
    pub mape: f64,
    /// Root mean squared error.
    pub rmse: f64,
    /// Akaike Information Criterion, for likelihood-based models.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aic: Option<f64>,
    pub data_points_used: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degrees_of_freedom: Option<usize>,
}

/// Direction of the historical revenue trend.
///
/// Closed enum: every consumer matches exhaustively, so a new direction
/// is a compile error until handled everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrendDirection {
    Growing,
    Stable,
    Declining,
    Volatile,
}

/// Trend diagnostics computed from the raw series, independent of the
/// forecasting method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendAnalysis {
    pub direction: TrendDirection,
    /// Per-period growth rate as a percentage of mean revenue.
    pub monthly_growth_rate: f64,
    /// 12-period compounded growth rate, percent.
    pub annualized_growth_rate: f64,
    /// Whether growth exceeds the volatility-scaled noise floor.
    pub is_significant: bool,
    /// Coefficient of variation, percent.
    pub volatility: f64,
}

/// Overall confidence classification for a forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ForecastConfidence {
    High,
    Medium,
    Low,
}

/// Complete forecast result for one clinic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueForecastOutput {
    pub clinic_id: String,
    pub currency: String,
    pub granularity: Granularity,
    /// Resolved method name (registry key) that produced the forecast.
    pub method: String,
    pub model_version: String,
    pub forecasts: Vec<ForecastedRevenuePoint>,
    pub model_fit: ModelFitStatistics,
    pub trend: TrendAnalysis,
    pub confidence: ForecastConfidence,
    pub summary: String,
    pub recommended_actions: Vec<String>,
}

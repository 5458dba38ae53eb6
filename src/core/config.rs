//! Service-level defaults and per-call forecast configuration.

use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, Result};

/// Forecasting method selector.
///
/// The built-in variants map onto the strategies registered by default;
/// `Custom` addresses any strategy registered under another name, so the
/// method set stays open even though the defaults are a closed enum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastMethod {
    MovingAverage,
    ExponentialSmoothing,
    LinearRegression,
    Arima,
    /// Run every registered strategy and combine them by fit quality.
    Ensemble,
    /// A strategy registered under a custom name.
    #[serde(untagged)]
    Custom(String),
}

impl ForecastMethod {
    /// Registry key for this method.
    pub fn name(&self) -> &str {
        match self {
            ForecastMethod::MovingAverage => "moving_average",
            ForecastMethod::ExponentialSmoothing => "exponential_smoothing",
            ForecastMethod::LinearRegression => "linear_regression",
            ForecastMethod::Arima => "arima",
            ForecastMethod::Ensemble => "ensemble",
            ForecastMethod::Custom(name) => name,
        }
    }
}

/// Fully resolved per-call configuration.
///
/// Built once per `forecast` call by merging [`ServiceConfig`] defaults
/// with [`ForecastOverrides`]; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    pub method: ForecastMethod,
    /// Number of future periods to forecast. Must be positive.
    pub forecast_periods: usize,
    /// Interval coverage probability, strictly between 0 and 1.
    pub confidence_level: f64,
    /// Whether to apply the multiplicative monthly seasonal table.
    pub apply_seasonality: bool,
    /// Custom 12-slot seasonal table; `None` uses the built-in default.
    pub seasonal_factors: Option<[f64; 12]>,
    /// Window size for the moving-average strategy.
    pub moving_average_window: usize,
    /// Level smoothing parameter for exponential smoothing, in (0, 1).
    pub smoothing_alpha: f64,
    /// Whether exponential smoothing tracks a trend component.
    pub include_trend: bool,
    /// Minimum number of historical points required to forecast.
    pub min_data_points: usize,
}

impl ForecastConfig {
    /// Check parameter ranges, returning `InvalidParameter` on misuse.
    pub fn validate(&self) -> Result<()> {
        if self.forecast_periods == 0 {
            return Err(ForecastError::InvalidParameter(
                "forecast_periods must be positive".to_string(),
            ));
        }
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "confidence_level must be in (0, 1), got {}",
                self.confidence_level
            )));
        }
        if !(self.smoothing_alpha > 0.0 && self.smoothing_alpha < 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "smoothing_alpha must be in (0, 1), got {}",
                self.smoothing_alpha
            )));
        }
        if self.moving_average_window == 0 {
            return Err(ForecastError::InvalidParameter(
                "moving_average_window must be positive".to_string(),
            ));
        }
        if let Some(factors) = &self.seasonal_factors {
            if factors.iter().any(|f| *f <= 0.0 || !f.is_finite()) {
                return Err(ForecastError::InvalidParameter(
                    "seasonal factors must be positive and finite".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Per-call overrides; any `None` field falls back to the service default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastOverrides {
    pub method: Option<ForecastMethod>,
    pub forecast_periods: Option<usize>,
    pub confidence_level: Option<f64>,
    pub apply_seasonality: Option<bool>,
    pub seasonal_factors: Option<[f64; 12]>,
    pub moving_average_window: Option<usize>,
    pub smoothing_alpha: Option<f64>,
    pub include_trend: Option<bool>,
}

/// Constructor-level defaults for [`RevenueForecastingService`].
///
/// [`RevenueForecastingService`]: crate::service::RevenueForecastingService
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub default_method: ForecastMethod,
    pub default_forecast_periods: usize,
    pub default_confidence_level: f64,
    pub apply_seasonality: bool,
    pub moving_average_window: usize,
    pub smoothing_alpha: f64,
    pub include_trend: bool,
    pub min_data_points: usize,
    /// Version tag attached to every output for attribution.
    pub model_version: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_method: ForecastMethod::Ensemble,
            default_forecast_periods: 6,
            default_confidence_level: 0.95,
            apply_seasonality: false,
            moving_average_window: 3,
            smoothing_alpha: 0.3,
            include_trend: true,
            min_data_points: 6,
            model_version: "revenue-forecast/1".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Resolve the effective per-call configuration.
    pub fn resolve(&self, overrides: Option<&ForecastOverrides>) -> ForecastConfig {
        let o = overrides.cloned().unwrap_or_default();
        ForecastConfig {
            method: o.method.unwrap_or_else(|| self.default_method.clone()),
            forecast_periods: o.forecast_periods.unwrap_or(self.default_forecast_periods),
            confidence_level: o.confidence_level.unwrap_or(self.default_confidence_level),
            apply_seasonality: o.apply_seasonality.unwrap_or(self.apply_seasonality),
            seasonal_factors: o.seasonal_factors,
            moving_average_window: o.moving_average_window.unwrap_or(self.moving_average_window),
            smoothing_alpha: o.smoothing_alpha.unwrap_or(self.smoothing_alpha),
            include_trend: o.include_trend.unwrap_or(self.include_trend),
            min_data_points: self.min_data_points,
        }
    }
}

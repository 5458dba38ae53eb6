//! Forecasting strategies and the strategy registry.

mod exponential_smoothing;
mod linear_regression;
mod moving_average;

pub mod arima;

pub use arima::ArimaStrategy;
pub use exponential_smoothing::ExponentialSmoothingStrategy;
pub use linear_regression::LinearRegressionStrategy;
pub use moving_average::MovingAverageStrategy;

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::core::{
    ConfidenceInterval, ForecastConfig, ForecastedRevenuePoint, HistoricalRevenueInput,
    ModelFitStatistics,
};
use crate::error::Result;

/// Result of one strategy run: forecast points plus in-sample fit.
#[derive(Debug, Clone)]
pub struct StrategyForecast {
    pub points: Vec<ForecastedRevenuePoint>,
    pub model_fit: ModelFitStatistics,
}

/// Common interface for all forecasting strategies.
///
/// Implementations are pure and deterministic: no side effects, no state
/// between calls, so one instance can serve concurrent callers. Inputs
/// arrive chronologically sorted and validated. Numerical degeneracy
/// (zero variance, singular systems) must degrade to a best-effort
/// result (e.g. `r_squared = 0`), not an error.
pub trait ForecastStrategy: Send + Sync {
    /// Registry key, e.g. `"moving_average"`.
    fn name(&self) -> &'static str;

    /// Forecast `config.forecast_periods` future periods.
    fn calculate(
        &self,
        input: &HistoricalRevenueInput,
        values: &[f64],
        config: &ForecastConfig,
    ) -> Result<StrategyForecast>;
}

/// Name-keyed strategy registry.
///
/// `BTreeMap` keeps iteration order deterministic, so ensemble joins are
/// order-stable by construction. The ensemble runs every registered
/// strategy; adding an algorithm requires only registration.
pub struct StrategyRegistry {
    strategies: BTreeMap<String, Box<dyn ForecastStrategy>>,
}

impl StrategyRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            strategies: BTreeMap::new(),
        }
    }

    /// Registry with the four built-in strategies.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(MovingAverageStrategy));
        registry.register(Box::new(ExponentialSmoothingStrategy));
        registry.register(Box::new(LinearRegressionStrategy));
        registry.register(Box::new(ArimaStrategy));
        registry
    }

    /// Register a strategy under its own name, replacing any previous
    /// strategy with that name.
    pub fn register(&mut self, strategy: Box<dyn ForecastStrategy>) {
        self.strategies
            .insert(strategy.name().to_string(), strategy);
    }

    /// Look up a strategy by name.
    pub fn get(&self, name: &str) -> Option<&dyn ForecastStrategy> {
        self.strategies.get(name).map(|s| s.as_ref())
    }

    /// Iterate strategies in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn ForecastStrategy)> {
        self.strategies.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Build one forecast point from a pre-seasonal base estimate and
/// interval half-width, enforcing `0 ≤ lower ≤ predicted ≤ upper`.
pub(crate) fn forecast_point(
    date: NaiveDate,
    base: f64,
    half_width: f64,
    seasonal: f64,
    level: f64,
    trend_component: Option<f64>,
    seasonality_applied: bool,
) -> ForecastedRevenuePoint {
    let predicted = (base * seasonal).max(0.0);
    let lower = ((base - half_width) * seasonal).clamp(0.0, predicted);
    let upper = ((base + half_width) * seasonal).max(predicted);

    let width = upper - lower;
    let high_uncertainty = if predicted > 0.0 {
        width > 0.5 * predicted
    } else {
        width > 0.0
    };

    ForecastedRevenuePoint {
        date,
        predicted,
        confidence_interval: ConfidenceInterval {
            lower,
            upper,
            level,
        },
        seasonal_factor: seasonality_applied.then_some(seasonal),
        trend_component,
        high_uncertainty,
    }
}

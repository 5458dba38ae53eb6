//! Holt's level + trend exponential smoother.

use crate::core::{ForecastConfig, HistoricalRevenueInput};
use crate::error::{ForecastError, Result};
use crate::strategies::{forecast_point, ForecastStrategy, StrategyForecast};
use crate::utils::fit_statistics;
use crate::utils::seasonal::seasonal_factor;
use crate::utils::stats::z_score;

/// Fixed trend smoothing parameter.
const BETA: f64 = 0.1;

/// Holt's linear trend forecaster.
///
/// The model equations are:
/// - Level: `l_t = α × y_t + (1-α) × (l_{t-1} + b_{t-1})`
/// - Trend: `b_t = β × (l_t - l_{t-1}) + (1-β) × b_{t-1}`
/// - Forecast: `ŷ_{t+h} = l_t + h × b_t`
///
/// `α` comes from the config; `β` is fixed at 0.1. With trend disabled
/// the trend state starts and stays at zero, reducing to simple
/// exponential smoothing.
pub struct ExponentialSmoothingStrategy;

impl ForecastStrategy for ExponentialSmoothingStrategy {
    fn name(&self) -> &'static str {
        "exponential_smoothing"
    }

    fn calculate(
        &self,
        input: &HistoricalRevenueInput,
        values: &[f64],
        config: &ForecastConfig,
    ) -> Result<StrategyForecast> {
        let n = values.len();
        let last_date = input
            .last_date()
            .ok_or_else(|| ForecastError::InsufficientData { needed: 1, got: 0 })?;

        let alpha = config.smoothing_alpha;
        let mut level = values[0];
        let mut trend = if config.include_trend && n > 1 {
            values[1] - values[0]
        } else {
            0.0
        };

        let mut fitted = Vec::with_capacity(n);
        fitted.push(level);

        for &y in values.iter().skip(1) {
            let one_step = level + trend;
            fitted.push(one_step);

            let prev_level = level;
            level = alpha * y + (1.0 - alpha) * (level + trend);
            if config.include_trend {
                trend = BETA * (level - prev_level) + (1.0 - BETA) * trend;
            }
        }

        // One-step residual standard error drives the interval width.
        let residual_sq_sum: f64 = values
            .iter()
            .zip(&fitted)
            .skip(1)
            .map(|(y, f)| (y - f).powi(2))
            .sum();
        let se = if n > 1 {
            (residual_sq_sum / (n - 1) as f64).sqrt()
        } else {
            0.0
        };

        let z = z_score(config.confidence_level);
        let dates = input
            .granularity
            .forecast_dates(last_date, config.forecast_periods);

        let points = dates
            .into_iter()
            .enumerate()
            .map(|(i, date)| {
                let h = (i + 1) as f64;
                let base = level + trend * h;
                let half_width = z * se * (1.0 + 0.1 * h).sqrt();
                let seasonal = seasonal_factor(date, config);
                let trend_component = config.include_trend.then_some(trend * h);
                forecast_point(
                    date,
                    base,
                    half_width,
                    seasonal,
                    config.confidence_level,
                    trend_component,
                    config.apply_seasonality,
                )
            })
            .collect();

        Ok(StrategyForecast {
            points,
            model_fit: fit_statistics(values, &fitted, 2),
        })
    }
}

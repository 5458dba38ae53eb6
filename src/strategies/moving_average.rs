//! Windowed-mean baseline strategy.

use crate::core::{ForecastConfig, HistoricalRevenueInput};
use crate::error::{ForecastError, Result};
use crate::strategies::{forecast_point, ForecastStrategy, StrategyForecast};
use crate::utils::fit_statistics;
use crate::utils::seasonal::seasonal_factor;
use crate::utils::stats::{mean, std_dev, z_score};

/// Moving-average forecaster.
///
/// The mean of the last `min(window, n)` observations is the flat point
/// estimate at every horizon. The standard deviation of that window
/// drives a z-score interval whose half-width scales by
/// `sqrt(1 + h/window)`, widening monotonically with horizon.
pub struct MovingAverageStrategy;

impl ForecastStrategy for MovingAverageStrategy {
    fn name(&self) -> &'static str {
        "moving_average"
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

        let window = config.moving_average_window.min(n).max(1);
        let tail = &values[n - window..];
        let window_mean = mean(tail);
        let window_sd = std_dev(tail);
        let z = z_score(config.confidence_level);

        let dates = input
            .granularity
            .forecast_dates(last_date, config.forecast_periods);

        let points = dates
            .into_iter()
            .enumerate()
            .map(|(i, date)| {
                let h = (i + 1) as f64;
                let half_width = z * window_sd * (1.0 + h / window as f64).sqrt();
                let seasonal = seasonal_factor(date, config);
                forecast_point(
                    date,
                    window_mean,
                    half_width,
                    seasonal,
                    config.confidence_level,
                    None,
                    config.apply_seasonality,
                )
            })
            .collect();

        // In-sample: expanding mean until the window fills, rolling after.
        let fitted: Vec<f64> = (0..n)
            .map(|i| {
                if i < window {
                    mean(&values[..=i])
                } else {
                    mean(&values[i + 1 - window..=i])
                }
            })
            .collect();

        Ok(StrategyForecast {
            points,
            model_fit: fit_statistics(values, &fitted, 1),
        })
    }
}

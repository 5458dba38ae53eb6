//! Ordinary least squares trend-line strategy.

use crate::core::{ForecastConfig, HistoricalRevenueInput};
use crate::error::{ForecastError, Result};
use crate::strategies::{forecast_point, ForecastStrategy, StrategyForecast};
use crate::utils::fit_statistics;
use crate::utils::seasonal::seasonal_factor;
use crate::utils::stats::z_score;

/// Closed-form OLS of revenue on period index.
///
/// Prediction intervals use the classical formula
/// `se · sqrt(1 + 1/n + (x - x̄)² / Sxx)`, so they widen super-linearly
/// with extrapolation distance rather than by a heuristic scaling.
pub struct LinearRegressionStrategy;

impl ForecastStrategy for LinearRegressionStrategy {
    fn name(&self) -> &'static str {
        "linear_regression"
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

        let n_f = n as f64;
        let sum_x: f64 = (0..n).map(|i| i as f64).sum();
        let sum_y: f64 = values.iter().sum();
        let sum_xy: f64 = values.iter().enumerate().map(|(i, &y)| i as f64 * y).sum();
        let sum_x2: f64 = (0..n).map(|i| (i * i) as f64).sum();

        let mean_x = sum_x / n_f;
        let mean_y = sum_y / n_f;
        let s_xx = sum_x2 - n_f * mean_x * mean_x;
        let s_xy = sum_xy - n_f * mean_x * mean_y;

        // s_xx is zero only for a single observation; indices are distinct.
        let slope = if s_xx.abs() > f64::EPSILON {
            s_xy / s_xx
        } else {
            0.0
        };
        let intercept = mean_y - slope * mean_x;

        let fitted: Vec<f64> = (0..n).map(|i| intercept + slope * i as f64).collect();

        let ss_res: f64 = values
            .iter()
            .zip(&fitted)
            .map(|(y, f)| (y - f).powi(2))
            .sum();
        let se = if n > 2 {
            (ss_res / (n - 2) as f64).sqrt()
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
                let x = (n - 1) as f64 + h;
                let base = intercept + slope * x;

                let leverage = if s_xx.abs() > f64::EPSILON {
                    (x - mean_x).powi(2) / s_xx
                } else {
                    0.0
                };
                let half_width = z * se * (1.0 + 1.0 / n_f + leverage).sqrt();

                let seasonal = seasonal_factor(date, config);
                forecast_point(
                    date,
                    base,
                    half_width,
                    seasonal,
                    config.confidence_level,
                    Some(slope * h),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Granularity, HistoricalRevenuePoint, ServiceConfig};
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn make_input(revenues: &[f64]) -> HistoricalRevenueInput {
        let mut current = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let points = revenues
            .iter()
            .map(|&r| {
                let p = HistoricalRevenuePoint::new(current, r, 30, 8);
                current = Granularity::Monthly.next_date(current);
                p
            })
            .collect();
        HistoricalRevenueInput {
            clinic_id: "clinic-1".to_string(),
            data_points: points,
            granularity: Granularity::Monthly,
            currency: "USD".to_string(),
        }
    }

    #[test]
    fn exact_linear_series_is_recovered() {
        let values: Vec<f64> = (0..12).map(|i| 1000.0 + 100.0 * i as f64).collect();
        let input = make_input(&values);
        let config = ServiceConfig::default().resolve(None);
        let result = LinearRegressionStrategy
            .calculate(&input, &values, &config)
            .unwrap();

        // Next period continues the line exactly: 1000 + 100*12
        assert_relative_eq!(result.points[0].predicted, 2200.0, epsilon = 1e-6);
        assert_relative_eq!(result.points[5].predicted, 2700.0, epsilon = 1e-6);
        assert_relative_eq!(result.model_fit.r_squared, 1.0, epsilon = 1e-9);
        assert_relative_eq!(result.model_fit.rmse, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn trend_component_scales_with_horizon() {
        let values: Vec<f64> = (0..12).map(|i| 1000.0 + 100.0 * i as f64).collect();
        let input = make_input(&values);
        let config = ServiceConfig::default().resolve(None);
        let result = LinearRegressionStrategy
            .calculate(&input, &values, &config)
            .unwrap();

        for (i, point) in result.points.iter().enumerate() {
            let h = (i + 1) as f64;
            assert_relative_eq!(point.trend_component.unwrap(), 100.0 * h, epsilon = 1e-6);
        }
    }

    #[test]
    fn intervals_widen_superlinearly_with_extrapolation() {
        let values = vec![
            9000.0, 10500.0, 9800.0, 11000.0, 10200.0, 9600.0, 10800.0, 9900.0, 10100.0,
            10400.0, 9700.0, 10300.0,
        ];
        let input = make_input(&values);
        let mut config = ServiceConfig::default().resolve(None);
        config.forecast_periods = 8;
        let result = LinearRegressionStrategy
            .calculate(&input, &values, &config)
            .unwrap();

        let widths: Vec<f64> = result
            .points
            .iter()
            .map(|p| p.confidence_interval.width())
            .collect();
        for w in widths.windows(2) {
            assert!(w[1] > w[0]);
        }
        // Increments themselves grow: leverage term is quadratic in x
        let d1 = widths[1] - widths[0];
        let d7 = widths[7] - widths[6];
        assert!(d7 > d1);
    }

    #[test]
    fn flat_series_reports_zero_slope() {
        let values = vec![10000.0; 12];
        let input = make_input(&values);
        let config = ServiceConfig::default().resolve(None);
        let result = LinearRegressionStrategy
            .calculate(&input, &values, &config)
            .unwrap();

        for point in &result.points {
            assert_relative_eq!(point.predicted, 10000.0, epsilon = 1e-6);
            assert_relative_eq!(point.trend_component.unwrap(), 0.0, epsilon = 1e-9);
        }
        // Zero-variance series degrades to r² = 0 rather than failing
        assert_eq!(result.model_fit.r_squared, 0.0);
    }

    #[test]
    fn declining_series_clamps_at_zero_revenue() {
        let values: Vec<f64> = (0..12).map(|i| 1100.0 - 100.0 * i as f64).collect();
        let input = make_input(&values);
        let mut config = ServiceConfig::default().resolve(None);
        config.forecast_periods = 12;
        let result = LinearRegressionStrategy
            .calculate(&input, &values, &config)
            .unwrap();

        for point in &result.points {
            assert!(point.predicted >= 0.0);
            assert!(point.confidence_interval.lower >= 0.0);
            assert!(point.confidence_interval.lower <= point.predicted);
            assert!(point.confidence_interval.upper >= point.predicted);
        }
        // Far enough out the line is below zero and the estimate clamps
        assert_eq!(result.points[11].predicted, 0.0);
    }
}

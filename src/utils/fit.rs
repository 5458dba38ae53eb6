//! In-sample fit statistics.

use crate::core::ModelFitStatistics;
use crate::utils::stats::mean;

/// Compute fit statistics from in-sample fitted vs actual values.
///
/// `num_params` is the number of fitted model parameters, used for the
/// degrees of freedom. R² is clamped to [0, 1]; a zero-variance series
/// reports `r_squared = 0` so degenerate inputs degrade instead of
/// failing. MAPE averages over non-zero actuals only.
pub fn fit_statistics(actual: &[f64], fitted: &[f64], num_params: usize) -> ModelFitStatistics {
    let n = actual.len().min(fitted.len());
    if n == 0 {
        return ModelFitStatistics {
            r_squared: 0.0,
            mae: 0.0,
            mape: 0.0,
            rmse: 0.0,
            aic: None,
            data_points_used: 0,
            degrees_of_freedom: None,
        };
    }

    let actual = &actual[..n];
    let fitted = &fitted[..n];

    let mae = actual
        .iter()
        .zip(fitted)
        .map(|(a, f)| (a - f).abs())
        .sum::<f64>()
        / n as f64;

    let mse = actual
        .iter()
        .zip(fitted)
        .map(|(a, f)| (a - f).powi(2))
        .sum::<f64>()
        / n as f64;
    let rmse = mse.sqrt();

    let mut mape_sum = 0.0;
    let mut mape_count = 0usize;
    for (a, f) in actual.iter().zip(fitted) {
        if a.abs() > f64::EPSILON {
            mape_sum += ((a - f) / a).abs();
            mape_count += 1;
        }
    }
    let mape = if mape_count > 0 {
        100.0 * mape_sum / mape_count as f64
    } else {
        0.0
    };

    let mean_actual = mean(actual);
    let ss_tot: f64 = actual.iter().map(|a| (a - mean_actual).powi(2)).sum();
    let ss_res: f64 = actual
        .iter()
        .zip(fitted)
        .map(|(a, f)| (a - f).powi(2))
        .sum();
    let r_squared = if ss_tot <= f64::EPSILON {
        0.0
    } else {
        (1.0 - ss_res / ss_tot).clamp(0.0, 1.0)
    };

    ModelFitStatistics {
        r_squared,
        mae,
        mape,
        rmse,
        aic: None,
        data_points_used: n,
        degrees_of_freedom: Some(n.saturating_sub(num_params)),
    }
}

//! Trend diagnostics over the raw revenue series.
//!
//! Computed once per forecast call, independently of the chosen
//! forecasting method.

use crate::core::{TrendAnalysis, TrendDirection};
use crate::utils::stats::{mean, std_dev};

/// Volatility (coefficient of variation, percent) above which the trend
/// is classified as volatile.
const VOLATILITY_THRESHOLD: f64 = 30.0;
/// Absolute per-period growth (percent) separating growing/declining
/// from stable.
const GROWTH_THRESHOLD: f64 = 2.0;

/// Analyze direction, growth, and volatility of a revenue series.
///
/// Growth is the OLS slope expressed as a percentage of mean revenue per
/// period; the annualized figure compounds it over 12 periods. The
/// significance flag uses the `|growth| > volatility/sqrt(n)` heuristic
/// (kept as-is for parity with downstream thresholds, not a formal
/// test).
pub fn analyze_trend(values: &[f64]) -> TrendAnalysis {
    let n = values.len();
    let mean_revenue = mean(values);

    let slope = ols_slope(values);
    let monthly_growth_rate = if mean_revenue.abs() > f64::EPSILON {
        slope / mean_revenue * 100.0
    } else {
        0.0
    };
    let annualized_growth_rate = ((1.0 + monthly_growth_rate / 100.0).powi(12) - 1.0) * 100.0;

    let volatility = if mean_revenue.abs() > f64::EPSILON {
        std_dev(values) / mean_revenue * 100.0
    } else {
        0.0
    };

    let direction = if volatility > VOLATILITY_THRESHOLD {
        TrendDirection::Volatile
    } else if monthly_growth_rate > GROWTH_THRESHOLD {
        TrendDirection::Growing
    } else if monthly_growth_rate < -GROWTH_THRESHOLD {
        TrendDirection::Declining
    } else {
        TrendDirection::Stable
    };

    let is_significant = if n > 0 {
        monthly_growth_rate.abs() > volatility / (n as f64).sqrt()
    } else {
        false
    };

    TrendAnalysis {
        direction,
        monthly_growth_rate,
        annualized_growth_rate,
        is_significant,
        volatility,
    }
}

/// OLS slope of the series on its period index.
fn ols_slope(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let n_f = n as f64;

    let sum_x: f64 = (0..n).map(|i| i as f64).sum();
    let sum_y: f64 = values.iter().sum();
    let sum_xy: f64 = values.iter().enumerate().map(|(i, &y)| i as f64 * y).sum();
    let sum_x2: f64 = (0..n).map(|i| (i * i) as f64).sum();

    let mean_x = sum_x / n_f;
    let mean_y = sum_y / n_f;
    let s_xx = sum_x2 - n_f * mean_x * mean_x;
    let s_xy = sum_xy - n_f * mean_x * mean_y;

    if s_xx.abs() < f64::EPSILON {
        0.0
    } else {
        s_xy / s_xx
    }
}

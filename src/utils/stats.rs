//! Statistical utility functions.

use statrs::distribution::{ContinuousCDF, Normal};

/// Two-sided z-score for a confidence level.
///
/// # Example
/// ```
/// use revenue_forecast::utils::z_score;
///
/// // 95% confidence level -> z ≈ 1.96
/// let z = z_score(0.95);
/// assert!((z - 1.96).abs() < 0.01);
/// ```
pub fn z_score(confidence_level: f64) -> f64 {
    // Out-of-range levels are rejected by config validation; clamping
    // keeps the lookup total for internal callers.
    let level = confidence_level.clamp(1e-9, 1.0 - 1e-9);
    let normal = Normal::new(0.0, 1.0).unwrap();
    normal.inverse_cdf((1.0 + level) / 2.0)
}

/// Calculate the mean of a slice. Returns 0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample variance (n-1 denominator). Returns 0 for fewer than 2 values.
pub fn variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|x| (x - m).powi(2)).sum();
    sum_sq / (values.len() - 1) as f64
}

/// Sample standard deviation.
pub fn std_dev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

/// Sample autocorrelation at a given lag.
pub fn autocorrelation(values: &[f64], lag: usize) -> f64 {
    if values.len() <= lag {
        return 0.0;
    }
    let m = mean(values);
    let n = values.len();

    let mut numerator = 0.0;
    let mut denominator = 0.0;

    for i in 0..n {
        denominator += (values[i] - m).powi(2);
        if i >= lag {
            numerator += (values[i] - m) * (values[i - lag] - m);
        }
    }

    if denominator == 0.0 {
        return 0.0;
    }
    numerator / denominator
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn z_score_known_values() {
        assert_relative_eq!(z_score(0.95), 1.96, epsilon = 0.01);
        assert_relative_eq!(z_score(0.90), 1.645, epsilon = 0.01);
        assert_relative_eq!(z_score(0.99), 2.576, epsilon = 0.01);
    }

    #[test]
    fn z_score_clamps_degenerate_levels() {
        assert!(z_score(0.0).is_finite());
        assert!(z_score(1.0).is_finite());
        assert!(z_score(1.0) > z_score(0.99));
    }

    #[test]
    fn mean_calculates_correctly() {
        assert_relative_eq!(mean(&[1.0, 2.0, 3.0, 4.0, 5.0]), 3.0, epsilon = 1e-10);
        assert_relative_eq!(mean(&[10.0]), 10.0, epsilon = 1e-10);
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn variance_calculates_correctly() {
        // Sample variance of [1, 2, 3, 4, 5] = 2.5
        assert_relative_eq!(variance(&[1.0, 2.0, 3.0, 4.0, 5.0]), 2.5, epsilon = 1e-10);
        assert_eq!(variance(&[1.0]), 0.0);
    }

    #[test]
    fn std_dev_is_sqrt_of_variance() {
        assert_relative_eq!(
            std_dev(&[1.0, 2.0, 3.0, 4.0, 5.0]),
            2.5_f64.sqrt(),
            epsilon = 1e-10
        );
    }

    #[test]
    fn autocorrelation_of_constant_series_is_zero() {
        assert_eq!(autocorrelation(&[5.0; 10], 1), 0.0);
    }

    #[test]
    fn autocorrelation_lag_zero_is_one() {
        let values = vec![1.0, 3.0, 2.0, 5.0, 4.0, 6.0];
        assert_relative_eq!(autocorrelation(&values, 0), 1.0, epsilon = 1e-10);
    }

    #[test]
    fn autocorrelation_detects_alternation() {
        // Alternating series has strong negative lag-1 autocorrelation
        let values = vec![1.0, -1.0, 1.0, -1.0, 1.0, -1.0, 1.0, -1.0];
        assert!(autocorrelation(&values, 1) < -0.5);
    }
}

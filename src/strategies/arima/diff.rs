//! Differencing utilities.
//!
//! Differencing replaces values with successive differences to remove
//! trend; the last value at each differencing level is retained so that
//! forecasts generated on the differenced scale can be reversed back
//! (`undifference`) by cumulative summation.

/// A differenced series together with the tail values needed to reverse
/// the transform.
#[derive(Debug, Clone, PartialEq)]
pub struct DifferencedSeries {
    /// The d-times differenced values.
    pub values: Vec<f64>,
    /// Last value of the series at each differencing level `0..d`.
    pub tails: Vec<f64>,
}

/// Apply d-th order differencing, retaining per-level tail values.
pub fn difference(series: &[f64], d: usize) -> DifferencedSeries {
    let mut values = series.to_vec();
    let mut tails = Vec::with_capacity(d);

    for _ in 0..d {
        if values.len() <= 1 {
            break;
        }
        tails.push(*values.last().unwrap_or(&0.0));
        values = values.windows(2).map(|w| w[1] - w[0]).collect();
    }

    DifferencedSeries { values, tails }
}

/// Reverse differencing: cumulatively sum `forecasts` onto the retained
/// tails, innermost level first.
pub fn undifference(forecasts: &[f64], tails: &[f64]) -> Vec<f64> {
    let mut values = forecasts.to_vec();
    for &tail in tails.iter().rev() {
        let mut last = tail;
        for v in values.iter_mut() {
            last += *v;
            *v = last;
        }
    }
    values
}

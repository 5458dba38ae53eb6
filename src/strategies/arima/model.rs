//! ARIMA(p,d,q) strategy: order selection, iterative coefficient
//! fitting, and psi-weight error propagation.

use crate::core::{ForecastConfig, HistoricalRevenueInput};
use crate::error::{ForecastError, Result};
use crate::strategies::arima::diff::{difference, undifference};
use crate::strategies::arima::linalg::{levinson_durbin, solve_linear_system};
use crate::strategies::{forecast_point, ForecastStrategy, StrategyForecast};
use crate::utils::fit_statistics;
use crate::utils::seasonal::seasonal_factor;
use crate::utils::stats::{autocorrelation, mean, std_dev, z_score};

/// Hard cap on coefficient-fitting passes.
const MAX_ITERATIONS: usize = 100;
/// Convergence tolerance on the residual variance between passes.
const CONVERGENCE_TOLERANCE: f64 = 1e-6;
/// MA coefficients stay inside (-0.99, 0.99) for invertibility.
const MA_BOUND: f64 = 0.99;
/// Step size for the MA gradient update.
const MA_STEP: f64 = 0.1;
/// Below this many observations the order is forced to (1,1,1).
const MIN_OBS_FOR_SEARCH: usize = 12;

/// Fixed candidate set for order selection.
const CANDIDATE_ORDERS: [(usize, usize, usize); 6] = [
    (1, 1, 1),
    (2, 1, 1),
    (1, 1, 2),
    (2, 1, 2),
    (1, 0, 1),
    (2, 0, 2),
];

/// ARIMA forecaster with bounded automatic order selection.
///
/// Orders are chosen from a fixed candidate grid by AIC; coefficients
/// are fitted iteratively (Yule-Walker initialization, then alternating
/// AR least-squares and MA gradient steps). Interval variance follows
/// the MA(∞) psi-weight law rather than a heuristic horizon scaling.
pub struct ArimaStrategy;

/// A fully fitted ARIMA model on the differenced scale.
struct FittedArima {
    p: usize,
    d: usize,
    q: usize,
    ar: Vec<f64>,
    ma: Vec<f64>,
    constant: f64,
    /// Residuals on the differenced scale, zero before `max(p, q)`.
    residuals: Vec<f64>,
    sigma2: f64,
    aic: f64,
    differenced: Vec<f64>,
    tails: Vec<f64>,
}

impl FittedArima {
    /// Fit the given order on `values`, or `None` when the differenced
    /// series is too short for the candidate.
    fn fit(values: &[f64], p: usize, d: usize, q: usize) -> Option<Self> {
        let diffed = difference(values, d);
        let z = diffed.values;
        let n = z.len();
        if n < p + q + 2 {
            return None;
        }

        let z_mean = mean(&z);
        let start = p.max(q);

        // Yule-Walker initialization for the AR part
        let mut acf = Vec::with_capacity(p + 1);
        acf.push(1.0);
        for lag in 1..=p {
            acf.push(autocorrelation(&z, lag));
        }
        let mut ar = levinson_durbin(&acf, p);
        let mut ma = vec![0.1; q];
        let mut constant = z_mean;

        let mut residuals = vec![0.0; n];
        let mut sigma2 = f64::MAX;

        for _ in 0..MAX_ITERATIONS {
            // Recompute residuals under the current coefficients
            for t in 0..n {
                if t < start {
                    residuals[t] = 0.0;
                    continue;
                }
                let mut pred = constant;
                for (i, &phi) in ar.iter().enumerate() {
                    pred += phi * z[t - 1 - i];
                }
                for (j, &theta) in ma.iter().enumerate() {
                    pred += theta * residuals[t - 1 - j];
                }
                residuals[t] = z[t] - pred;
            }

            let new_sigma2 = residuals[start..]
                .iter()
                .map(|r| r * r)
                .sum::<f64>()
                / (n - start) as f64;

            if (new_sigma2 - sigma2).abs() < CONVERGENCE_TOLERANCE {
                sigma2 = new_sigma2;
                break;
            }
            sigma2 = new_sigma2;

            // AR re-estimation: least squares on the lagged de-meaned design
            if p > 0 {
                if let Some(phi) = Self::estimate_ar(&z, z_mean, p) {
                    ar = phi;
                }
            }

            // MA update: one gradient step on the residual lag covariance
            if q > 0 && sigma2 > f64::EPSILON {
                for (j, theta) in ma.iter_mut().enumerate() {
                    let mut cov = 0.0;
                    for t in j + 1..n {
                        cov += residuals[t] * residuals[t - 1 - j];
                    }
                    cov /= n as f64;
                    *theta = (*theta + MA_STEP * cov / sigma2).clamp(-MA_BOUND, MA_BOUND);
                }
            }

            constant = z_mean * (1.0 - ar.iter().sum::<f64>());
        }

        let k = (p + q + 1) as f64;
        let aic = n as f64 * sigma2.max(1e-12).ln() + 2.0 * k;

        Some(Self {
            p,
            d,
            q,
            ar,
            ma,
            constant,
            residuals,
            sigma2,
            aic,
            differenced: z,
            tails: diffed.tails,
        })
    }

    /// Solve the AR normal equations on a lagged, de-meaned design
    /// matrix. Returns `None` on a near-singular system so the caller
    /// keeps its previous coefficients.
    fn estimate_ar(z: &[f64], z_mean: f64, p: usize) -> Option<Vec<f64>> {
        let n = z.len();
        if n <= p {
            return None;
        }

        let mut xtx = vec![vec![0.0; p]; p];
        let mut xty = vec![0.0; p];
        for t in p..n {
            let y = z[t] - z_mean;
            for i in 0..p {
                let xi = z[t - 1 - i] - z_mean;
                xty[i] += xi * y;
                for j in 0..p {
                    let xj = z[t - 1 - j] - z_mean;
                    xtx[i][j] += xi * xj;
                }
            }
        }

        solve_linear_system(xtx, xty)
    }

    /// Select the best candidate order by AIC.
    ///
    /// Fewer than [`MIN_OBS_FOR_SEARCH`] observations forces (1,1,1);
    /// candidates whose differenced series is too short are skipped.
    fn select(values: &[f64]) -> Option<Self> {
        if values.len() < MIN_OBS_FOR_SEARCH {
            return Self::fit(values, 1, 1, 1);
        }

        let mut best: Option<Self> = None;
        for (p, d, q) in CANDIDATE_ORDERS {
            let Some(candidate) = Self::fit(values, p, d, q) else {
                continue;
            };
            let better = best
                .as_ref()
                .map(|b| candidate.aic < b.aic)
                .unwrap_or(true);
            if better {
                best = Some(candidate);
            }
        }
        best.or_else(|| Self::fit(values, 1, 1, 1))
    }

    /// Recursively project the differenced series, treating future
    /// residuals as zero, then reverse the differencing.
    fn forecast(&self, horizon: usize) -> Vec<f64> {
        let mut extended = self.differenced.clone();
        let mut extended_res = self.residuals.clone();

        for _ in 0..horizon {
            let t = extended.len();
            let mut pred = self.constant;
            for (i, &phi) in self.ar.iter().enumerate() {
                if t > i {
                    pred += phi * extended[t - 1 - i];
                }
            }
            for (j, &theta) in self.ma.iter().enumerate() {
                if t > j {
                    pred += theta * extended_res[t - 1 - j];
                }
            }
            extended.push(pred);
            extended_res.push(0.0);
        }

        let future = &extended[self.differenced.len()..];
        undifference(future, &self.tails)
    }

    /// MA(∞) psi weights `ψ_1..ψ_{horizon-1}` derived from the fitted
    /// AR/MA coefficients (`ψ_0 = 1` implicitly).
    fn psi_weights(&self, horizon: usize) -> Vec<f64> {
        let count = horizon.saturating_sub(1);
        let mut psi = Vec::with_capacity(count);
        for j in 1..=count {
            let mut value = if j <= self.q { self.ma[j - 1] } else { 0.0 };
            for i in 1..=self.p.min(j) {
                let prev = if j - i == 0 { 1.0 } else { psi[j - i - 1] };
                value += self.ar[i - 1] * prev;
            }
            psi.push(value);
        }
        psi
    }

    /// Forecast-error standard deviation at each horizon step:
    /// `sqrt(σ²(1 + Σ_{i<h} ψᵢ²))`.
    fn horizon_std_errors(&self, horizon: usize) -> Vec<f64> {
        let psi = self.psi_weights(horizon);
        let mut cumulative = 1.0;
        let mut errors = Vec::with_capacity(horizon);
        for h in 1..=horizon {
            if h > 1 {
                cumulative += psi[h - 2] * psi[h - 2];
            }
            errors.push((self.sigma2 * cumulative).sqrt());
        }
        errors
    }

    /// In-sample fitted values reconstructed on the original scale.
    ///
    /// A differenced-scale residual equals the original-scale residual,
    /// so the fitted value is the actual minus the aligned residual.
    fn fitted_original_scale(&self, values: &[f64]) -> Vec<f64> {
        values
            .iter()
            .enumerate()
            .map(|(t, &v)| {
                if t >= self.d {
                    v - self.residuals[t - self.d]
                } else {
                    v
                }
            })
            .collect()
    }
}

impl ForecastStrategy for ArimaStrategy {
    fn name(&self) -> &'static str {
        "arima"
    }

    fn calculate(
        &self,
        input: &HistoricalRevenueInput,
        values: &[f64],
        config: &ForecastConfig,
    ) -> Result<StrategyForecast> {
        let last_date = input
            .last_date()
            .ok_or_else(|| ForecastError::InsufficientData { needed: 1, got: 0 })?;

        let z = z_score(config.confidence_level);
        let dates = input
            .granularity
            .forecast_dates(last_date, config.forecast_periods);

        let Some(model) = FittedArima::select(values) else {
            // Degenerate input: degrade to a flat mean forecast
            let base = mean(values);
            let sd = std_dev(values);
            let points = dates
                .into_iter()
                .map(|date| {
                    let seasonal = seasonal_factor(date, config);
                    forecast_point(
                        date,
                        base,
                        z * sd,
                        seasonal,
                        config.confidence_level,
                        None,
                        config.apply_seasonality,
                    )
                })
                .collect();
            let flat = vec![base; values.len()];
            return Ok(StrategyForecast {
                points,
                model_fit: fit_statistics(values, &flat, 1),
            });
        };

        let predictions = model.forecast(config.forecast_periods);
        let std_errors = model.horizon_std_errors(config.forecast_periods);

        let points = dates
            .into_iter()
            .zip(predictions.iter().zip(&std_errors))
            .map(|(date, (&base, &se))| {
                let seasonal = seasonal_factor(date, config);
                forecast_point(
                    date,
                    base,
                    z * se,
                    seasonal,
                    config.confidence_level,
                    None,
                    config.apply_seasonality,
                )
            })
            .collect();

        let fitted = model.fitted_original_scale(values);
        let mut model_fit = fit_statistics(values, &fitted, model.p + model.q + 1);
        model_fit.aic = Some(model.aic);

        Ok(StrategyForecast { points, model_fit })
    }
}

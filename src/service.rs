//! Revenue forecasting service: validation, strategy dispatch, ensemble
//! combination, and output assembly.

use crate::core::{
    ConfidenceInterval, ForecastConfidence, ForecastConfig, ForecastMethod,
    ForecastOverrides, ForecastedRevenuePoint, HistoricalRevenueInput, ModelFitStatistics,
    RevenueForecastOutput, ServiceConfig, TrendAnalysis, TrendDirection,
};
use crate::error::{ForecastError, Result};
use crate::strategies::{ForecastStrategy, StrategyForecast, StrategyRegistry};
use crate::trend::analyze_trend;

/// Minimum ensemble weight contribution per strategy, before
/// normalization. Keeps a poorly fitting model from being zeroed out.
const ENSEMBLE_WEIGHT_FLOOR: f64 = 0.1;

/// Average periodic revenue below which a clinic counts as small.
const SMALL_REVENUE_THRESHOLD: f64 = 25_000.0;

/// Orchestrates the forecasting strategies.
///
/// Stateless between calls: each `forecast` invocation validates its
/// input, resolves configuration, and produces a fresh output, so one
/// service instance can serve concurrent callers.
pub struct RevenueForecastingService {
    config: ServiceConfig,
    registry: StrategyRegistry,
}

impl RevenueForecastingService {
    /// Service with the default strategy registry.
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            config,
            registry: StrategyRegistry::with_defaults(),
        }
    }

    /// Service with a caller-provided registry.
    pub fn with_registry(config: ServiceConfig, registry: StrategyRegistry) -> Self {
        Self { config, registry }
    }

    /// Register an additional strategy. The ensemble picks it up
    /// automatically; no other orchestration change is needed.
    pub fn register_strategy(&mut self, strategy: Box<dyn ForecastStrategy>) {
        self.registry.register(strategy);
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Produce a forecast for one clinic.
    ///
    /// Precondition violations (too little history, negative revenue,
    /// bad parameters, unknown method) fail before any computation;
    /// afterwards every call yields a complete output.
    pub fn forecast(
        &self,
        input: &HistoricalRevenueInput,
        overrides: Option<&ForecastOverrides>,
    ) -> Result<RevenueForecastOutput> {
        let config = self.config.resolve(overrides);
        config.validate()?;
        validate_input(input, &config)?;

        let sorted = input.sorted();
        let values = sorted.revenue_values();

        let run = match &config.method {
            ForecastMethod::Ensemble => self.ensemble_forecast(&sorted, &values, &config)?,
            method => {
                let strategy = self
                    .registry
                    .get(method.name())
                    .ok_or_else(|| ForecastError::UnknownMethod(method.name().to_string()))?;
                strategy.calculate(&sorted, &values, &config)?
            }
        };

        let trend = analyze_trend(&values);
        let confidence = classify_confidence(&run.model_fit, values.len());
        let summary = build_summary(&sorted, &trend, confidence, &values);
        let recommended_actions = recommended_actions(&trend, confidence, &values);

        Ok(RevenueForecastOutput {
            clinic_id: sorted.clinic_id.clone(),
            currency: sorted.currency.clone(),
            granularity: sorted.granularity,
            method: config.method.name().to_string(),
            model_version: self.config.model_version.clone(),
            forecasts: run.points,
            model_fit: run.model_fit,
            trend,
            confidence,
            summary,
            recommended_actions,
        })
    }

    /// Run every registered strategy and combine by fit quality.
    ///
    /// Weights are `max(0.1, R²)` normalized over all members, so order
    /// of execution never affects the result and no member is zeroed
    /// out entirely.
    fn ensemble_forecast(
        &self,
        input: &HistoricalRevenueInput,
        values: &[f64],
        config: &ForecastConfig,
    ) -> Result<StrategyForecast> {
        // Name order from the registry keeps the join deterministic.
        let runs: Vec<StrategyForecast> = self
            .registry
            .iter()
            .filter_map(|(_, strategy)| strategy.calculate(input, values, config).ok())
            .filter(|run| run.points.len() == config.forecast_periods)
            .collect();

        if runs.is_empty() {
            return Err(ForecastError::ComputationError(
                "no registered strategy produced a forecast".to_string(),
            ));
        }

        let raw: Vec<f64> = runs
            .iter()
            .map(|r| r.model_fit.r_squared.max(ENSEMBLE_WEIGHT_FLOOR))
            .collect();
        let total: f64 = raw.iter().sum();
        let weights: Vec<f64> = raw.iter().map(|w| w / total).collect();

        let horizon = config.forecast_periods;
        let mut points = Vec::with_capacity(horizon);
        for h in 0..horizon {
            let mut predicted = 0.0;
            let mut lower = 0.0;
            let mut upper = 0.0;
            let mut trend_component = 0.0;
            let mut has_trend = false;

            for (run, &w) in runs.iter().zip(&weights) {
                let p = &run.points[h];
                predicted += w * p.predicted;
                lower += w * p.confidence_interval.lower;
                upper += w * p.confidence_interval.upper;
                if let Some(t) = p.trend_component {
                    trend_component += w * t;
                    has_trend = true;
                }
            }

            let template = &runs[0].points[h];
            let width = upper - lower;
            let high_uncertainty = if predicted > 0.0 {
                width > 0.5 * predicted
            } else {
                width > 0.0
            };

            points.push(ForecastedRevenuePoint {
                date: template.date,
                predicted,
                confidence_interval: ConfidenceInterval {
                    lower,
                    upper,
                    level: config.confidence_level,
                },
                seasonal_factor: template.seasonal_factor,
                trend_component: has_trend.then_some(trend_component),
                high_uncertainty,
            });
        }

        let model_fit = combine_fit_statistics(&runs, &weights, values.len());

        Ok(StrategyForecast { points, model_fit })
    }
}

impl Default for RevenueForecastingService {
    fn default() -> Self {
        Self::new(ServiceConfig::default())
    }
}

/// Precondition checks, run before any computation.
fn validate_input(input: &HistoricalRevenueInput, config: &ForecastConfig) -> Result<()> {
    if input.data_points.len() < config.min_data_points {
        return Err(ForecastError::InsufficientData {
            needed: config.min_data_points,
            got: input.data_points.len(),
        });
    }
    for (index, point) in input.data_points.iter().enumerate() {
        if !point.revenue.is_finite() || point.revenue < 0.0 {
            return Err(ForecastError::InvalidRevenueData(format!(
                "revenue {} at index {index} ({})",
                point.revenue, point.date
            )));
        }
    }
    Ok(())
}

/// Weighted combination of the member fit statistics.
fn combine_fit_statistics(
    runs: &[StrategyForecast],
    weights: &[f64],
    n: usize,
) -> ModelFitStatistics {
    let mut r_squared = 0.0;
    let mut mae = 0.0;
    let mut mape = 0.0;
    let mut rmse = 0.0;
    for (run, &w) in runs.iter().zip(weights) {
        r_squared += w * run.model_fit.r_squared;
        mae += w * run.model_fit.mae;
        mape += w * run.model_fit.mape;
        rmse += w * run.model_fit.rmse;
    }
    ModelFitStatistics {
        r_squared,
        mae,
        mape,
        rmse,
        aic: None,
        data_points_used: n,
        degrees_of_freedom: None,
    }
}

/// Confidence classification from fit quality and history length.
fn classify_confidence(fit: &ModelFitStatistics, n: usize) -> ForecastConfidence {
    if fit.r_squared >= 0.8 && n >= 12 {
        ForecastConfidence::High
    } else if fit.r_squared >= 0.6 && n >= 6 {
        ForecastConfidence::Medium
    } else {
        ForecastConfidence::Low
    }
}

fn confidence_phrase(confidence: ForecastConfidence) -> &'static str {
    match confidence {
        ForecastConfidence::High => "high confidence",
        ForecastConfidence::Medium => "moderate confidence",
        ForecastConfidence::Low => "low confidence",
    }
}

/// One-paragraph deterministic summary keyed by trend, confidence, and
/// revenue magnitude.
fn build_summary(
    input: &HistoricalRevenueInput,
    trend: &TrendAnalysis,
    confidence: ForecastConfidence,
    values: &[f64],
) -> String {
    let avg = crate::utils::mean(values);
    let scale = if avg < SMALL_REVENUE_THRESHOLD {
        "a small revenue base"
    } else {
        "an established revenue base"
    };

    let direction = match trend.direction {
        TrendDirection::Growing => format!(
            "revenue is growing about {:.1}% per period ({:.1}% annualized)",
            trend.monthly_growth_rate, trend.annualized_growth_rate
        ),
        TrendDirection::Declining => format!(
            "revenue is declining about {:.1}% per period ({:.1}% annualized)",
            trend.monthly_growth_rate.abs(),
            trend.annualized_growth_rate.abs()
        ),
        TrendDirection::Stable => "revenue is stable period over period".to_string(),
        TrendDirection::Volatile => format!(
            "revenue is volatile (coefficient of variation {:.0}%)",
            trend.volatility
        ),
    };

    format!(
        "Clinic {} has {} averaging {:.0} {} per period; {}. Forecast carries {}.",
        input.clinic_id,
        scale,
        avg,
        input.currency,
        direction,
        confidence_phrase(confidence)
    )
}

/// Deterministic action templates keyed by trend x confidence x
/// magnitude. The trend match is exhaustive: a new direction will not
/// compile until handled here.
fn recommended_actions(
    trend: &TrendAnalysis,
    confidence: ForecastConfidence,
    values: &[f64],
) -> Vec<String> {
    let avg = crate::utils::mean(values);
    let mut actions: Vec<String> = match trend.direction {
        TrendDirection::Growing => vec![
            "Maintain the initiatives driving current growth".to_string(),
            "Plan staffing and chair capacity for sustained volume".to_string(),
        ],
        TrendDirection::Stable => vec![
            "Revenue is steady; focus on incremental case-acceptance gains".to_string(),
            "Review fee schedules against projected flat revenue".to_string(),
        ],
        TrendDirection::Declining => vec![
            "Investigate drivers behind the revenue decline".to_string(),
            "Review scheduling utilization and patient reactivation".to_string(),
        ],
        TrendDirection::Volatile => vec![
            "Stabilize scheduling and collections before acting on point forecasts".to_string(),
            "Use interval bounds, not point estimates, for cash planning".to_string(),
        ],
    };

    match confidence {
        ForecastConfidence::High => {}
        ForecastConfidence::Medium => {
            actions.push("Revisit the forecast as new periods close to tighten intervals".to_string());
        }
        ForecastConfidence::Low => {
            actions.push(
                "Treat projections as indicative only; accumulate more history before committing budgets"
                    .to_string(),
            );
        }
    }

    if avg < SMALL_REVENUE_THRESHOLD {
        actions.push(
            "Small revenue base: individual cases can move totals; monitor weekly".to_string(),
        );
    }

    actions
}

//! Property-based tests for the forecasting engine.
//!
//! These verify invariants that should hold for all valid inputs, using
//! randomly generated revenue series.

use chrono::NaiveDate;
use proptest::prelude::*;
use revenue_forecast::core::{
    ForecastMethod, ForecastOverrides, Granularity, HistoricalRevenueInput,
    HistoricalRevenuePoint,
};
use revenue_forecast::service::RevenueForecastingService;
use revenue_forecast::strategies::arima::{difference, undifference};

fn make_input(revenues: &[f64]) -> HistoricalRevenueInput {
    let mut current = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
    let data_points = revenues
        .iter()
        .map(|&r| {
            let p = HistoricalRevenuePoint::new(current, r, 30, 8);
            current = Granularity::Monthly.next_date(current);
            p
        })
        .collect();
    HistoricalRevenueInput {
        clinic_id: "clinic-1".to_string(),
        data_points,
        granularity: Granularity::Monthly,
        currency: "USD".to_string(),
    }
}

/// Valid revenue series: non-negative, bounded, with mild index drift so
/// series are not all-constant.
fn revenue_series(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    (min_len..max_len).prop_flat_map(|len| {
        prop::collection::vec(100.0..100_000.0_f64, len).prop_map(|mut v| {
            for (i, val) in v.iter_mut().enumerate() {
                *val += i as f64 * 0.01;
            }
            v
        })
    })
}

fn any_method() -> impl Strategy<Value = ForecastMethod> {
    prop_oneof![
        Just(ForecastMethod::MovingAverage),
        Just(ForecastMethod::ExponentialSmoothing),
        Just(ForecastMethod::LinearRegression),
        Just(ForecastMethod::Arima),
        Just(ForecastMethod::Ensemble),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn forecast_count_matches_requested_periods(
        revenues in revenue_series(6, 30),
        periods in 1usize..13,
        method in any_method()
    ) {
        let input = make_input(&revenues);
        let service = RevenueForecastingService::default();
        let overrides = ForecastOverrides {
            method: Some(method),
            forecast_periods: Some(periods),
            ..Default::default()
        };
        let output = service.forecast(&input, Some(&overrides)).unwrap();
        prop_assert_eq!(output.forecasts.len(), periods);
    }

    #[test]
    fn forecast_dates_are_strictly_increasing(
        revenues in revenue_series(6, 30),
        method in any_method()
    ) {
        let input = make_input(&revenues);
        let last = input.data_points.last().unwrap().date;
        let service = RevenueForecastingService::default();
        let overrides = ForecastOverrides { method: Some(method), ..Default::default() };
        let output = service.forecast(&input, Some(&overrides)).unwrap();

        prop_assert!(output.forecasts[0].date > last);
        for w in output.forecasts.windows(2) {
            prop_assert!(w[1].date > w[0].date);
        }
    }

    #[test]
    fn bounds_bracket_the_point_estimate(
        revenues in revenue_series(6, 30),
        method in any_method(),
        seasonality in any::<bool>()
    ) {
        let input = make_input(&revenues);
        let service = RevenueForecastingService::default();
        let overrides = ForecastOverrides {
            method: Some(method),
            apply_seasonality: Some(seasonality),
            ..Default::default()
        };
        let output = service.forecast(&input, Some(&overrides)).unwrap();

        for point in &output.forecasts {
            prop_assert!(point.confidence_interval.lower >= 0.0);
            prop_assert!(point.confidence_interval.lower <= point.predicted);
            prop_assert!(point.predicted <= point.confidence_interval.upper);
        }
    }

    #[test]
    fn fit_statistics_stay_in_range(
        revenues in revenue_series(6, 30),
        method in any_method()
    ) {
        let input = make_input(&revenues);
        let service = RevenueForecastingService::default();
        let overrides = ForecastOverrides { method: Some(method), ..Default::default() };
        let output = service.forecast(&input, Some(&overrides)).unwrap();

        let fit = &output.model_fit;
        prop_assert!((0.0..=1.0).contains(&fit.r_squared));
        prop_assert!(fit.mae >= 0.0);
        prop_assert!(fit.mape >= 0.0);
        prop_assert!(fit.rmse >= 0.0);
        prop_assert_eq!(fit.data_points_used, revenues.len());
    }

    #[test]
    fn forecasts_are_deterministic(
        revenues in revenue_series(6, 24),
        method in any_method()
    ) {
        let input = make_input(&revenues);
        let service = RevenueForecastingService::default();
        let overrides = ForecastOverrides { method: Some(method), ..Default::default() };

        let a = service.forecast(&input, Some(&overrides)).unwrap();
        let b = service.forecast(&input, Some(&overrides)).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn differencing_round_trips_exactly(
        series in prop::collection::vec(-1000.0..1000.0_f64, 8..32),
        d in 1usize..3
    ) {
        let split = series.len() - 3;
        let head = difference(&series[..split], d);
        let full = difference(&series, d);
        let restored = undifference(&full.values[split - d..], &head.tails);

        prop_assert_eq!(restored.len(), 3);
        for (r, expected) in restored.iter().zip(&series[split..]) {
            prop_assert!((r - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn volatile_flat_and_trending_directions_are_consistent(
        base in 5000.0..50_000.0_f64,
        slope_pct in 0.03_f64..0.08
    ) {
        // A clean trend at slope_pct of base per period must not be Volatile
        let revenues: Vec<f64> = (0..12).map(|i| base * (1.0 + slope_pct * i as f64)).collect();
        let input = make_input(&revenues);
        let service = RevenueForecastingService::default();
        let output = service.forecast(&input, None).unwrap();
        prop_assert_eq!(
            output.trend.direction,
            revenue_forecast::core::TrendDirection::Growing
        );
    }
}

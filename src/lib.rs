//! # revenue-forecast
//!
//! Multi-strategy revenue forecasting engine for periodic clinic
//! revenue. Provides four forecasting strategies (moving average,
//! Holt exponential smoothing, OLS linear regression, ARIMA with
//! automatic order selection) behind a shared strategy trait, plus an
//! ensemble orchestrator that weights members by fit quality and
//! produces point forecasts, confidence intervals, trend diagnostics,
//! and recommended actions.
//!
//! ```
//! use chrono::NaiveDate;
//! use revenue_forecast::prelude::*;
//!
//! let mut date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let data_points = (0..12)
//!     .map(|i| {
//!         let point = HistoricalRevenuePoint::new(date, 10000.0 + 250.0 * i as f64, 40, 10);
//!         date = Granularity::Monthly.next_date(date);
//!         point
//!     })
//!     .collect();
//!
//! let input = HistoricalRevenueInput {
//!     clinic_id: "clinic-1".to_string(),
//!     data_points,
//!     granularity: Granularity::Monthly,
//!     currency: "USD".to_string(),
//! };
//!
//! let service = RevenueForecastingService::default();
//! let output = service.forecast(&input, None).unwrap();
//! assert_eq!(output.forecasts.len(), 6);
//! ```

#![allow(clippy::needless_range_loop)]

pub mod core;
pub mod error;
pub mod service;
pub mod strategies;
pub mod trend;
pub mod utils;

pub use error::{ForecastError, Result};

pub mod prelude {
    pub use crate::core::{
        ForecastConfig, ForecastMethod, ForecastOverrides, Granularity, HistoricalRevenueInput,
        HistoricalRevenuePoint, RevenueForecastOutput, ServiceConfig, TrendDirection,
    };
    pub use crate::error::{ForecastError, Result};
    pub use crate::service::RevenueForecastingService;
    pub use crate::strategies::{ForecastStrategy, StrategyRegistry};
}

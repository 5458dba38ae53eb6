//! Multiplicative monthly seasonal factors.

use chrono::{Datelike, NaiveDate};

use crate::core::ForecastConfig;

/// Default 12-slot seasonal table (January..December).
///
/// Reflects the usual elective-care demand curve: strong start of year
/// when insurance benefits reset, a summer dip, and an autumn recovery.
/// Slots average to 1.0 so seasonality is revenue-neutral over a year.
pub const DEFAULT_SEASONAL_FACTORS: [f64; 12] = [
    1.08, 1.02, 1.05, 1.00, 0.98, 0.95, 0.90, 0.95, 1.02, 1.05, 1.02, 0.98,
];

/// Seasonal multiplier for a forecast date under the given config.
///
/// Returns 1.0 when seasonality is disabled. The table is indexed by
/// calendar month regardless of granularity.
pub fn seasonal_factor(date: NaiveDate, config: &ForecastConfig) -> f64 {
    if !config.apply_seasonality {
        return 1.0;
    }
    let table = config
        .seasonal_factors
        .as_ref()
        .unwrap_or(&DEFAULT_SEASONAL_FACTORS);
    table[date.month0() as usize]
}

//! Historical revenue observations and period granularity.

use chrono::{Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Reporting period length of the historical series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
}

impl Granularity {
    /// Step a date forward by one period of this granularity.
    ///
    /// Monthly and quarterly stepping is calendar-aware (end-of-month
    /// dates are clamped by `chrono`).
    pub fn next_date(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Granularity::Daily => date + Duration::days(1),
            Granularity::Weekly => date + Duration::days(7),
            Granularity::Monthly => date
                .checked_add_months(Months::new(1))
                .unwrap_or(date + Duration::days(30)),
            Granularity::Quarterly => date
                .checked_add_months(Months::new(3))
                .unwrap_or(date + Duration::days(91)),
        }
    }

    /// Number of periods in a calendar year.
    pub fn periods_per_year(&self) -> u32 {
        match self {
            Granularity::Daily => 365,
            Granularity::Weekly => 52,
            Granularity::Monthly => 12,
            Granularity::Quarterly => 4,
        }
    }

    /// Generate `count` consecutive forecast dates starting one period
    /// after `last`.
    pub fn forecast_dates(&self, last: NaiveDate, count: usize) -> Vec<NaiveDate> {
        let mut dates = Vec::with_capacity(count);
        let mut current = last;
        for _ in 0..count {
            current = self.next_date(current);
            dates.push(current);
        }
        dates
    }
}

/// A single observed revenue period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRevenuePoint {
    /// Period date (start of the reporting period).
    pub date: NaiveDate,
    /// Total revenue for the period. Must be non-negative.
    pub revenue: f64,
    /// Cases completed in the period.
    pub cases_completed: u32,
    /// New patients acquired in the period.
    pub new_patients: u32,
    /// Fraction of billed revenue actually collected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_rate: Option<f64>,
    /// Average revenue per completed case.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_case_value: Option<f64>,
    /// Revenue from high-value cases only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high_value_revenue: Option<f64>,
}

impl HistoricalRevenuePoint {
    /// Create a point with just the required fields.
    pub fn new(date: NaiveDate, revenue: f64, cases_completed: u32, new_patients: u32) -> Self {
        Self {
            date,
            revenue,
            cases_completed,
            new_patients,
            collection_rate: None,
            avg_case_value: None,
            high_value_revenue: None,
        }
    }
}

/// Historical revenue series for one clinic, as supplied by the caller.
///
/// The caller is responsible for aggregating raw transactions into
/// periods; this library only validates and forecasts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRevenueInput {
    pub clinic_id: String,
    pub data_points: Vec<HistoricalRevenuePoint>,
    pub granularity: Granularity,
    pub currency: String,
}

impl HistoricalRevenueInput {
    /// Return a copy with data points sorted chronologically.
    pub fn sorted(&self) -> Self {
        let mut sorted = self.clone();
        sorted.data_points.sort_by_key(|p| p.date);
        sorted
    }

    /// Revenue values in data-point order.
    pub fn revenue_values(&self) -> Vec<f64> {
        self.data_points.iter().map(|p| p.revenue).collect()
    }

    /// Date of the last data point, if any.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.data_points.last().map(|p| p.date)
    }
}

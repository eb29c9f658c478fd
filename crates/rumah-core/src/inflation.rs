//! Compound inflation adjustment of a predicted price.
//!
//! The number of elapsed years is measured from the dataset snapshot date to
//! "today" as reported by an injected [`Clock`], so the computation stays pure
//! and tests can pin the date.

use std::fmt;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::input::RateBounds;

/// Date of the last snapshot of the training dataset.
pub const DATASET_SNAPSHOT_DATE: NaiveDate = match NaiveDate::from_ymd_opt(2019, 7, 4) {
    Some(date) => date,
    None => panic!("invalid snapshot date"),
};

/// Average number of days per year used to convert elapsed days to years.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Source of the current date.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Today's date.
    fn today(&self) -> NaiveDate;
}

/// Reads the local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always reports the same date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Whole years between two dates, rounded to the nearest year.
///
/// Negative when `today` precedes `reference`.
pub fn elapsed_years(reference: NaiveDate, today: NaiveDate) -> i32 {
    let days = (today - reference).num_days();
    (days as f64 / DAYS_PER_YEAR).round() as i32
}

/// `base * (1 + rate_percent / 100) ^ years`.
pub fn compound(base: f64, rate_percent: f64, years: i32) -> f64 {
    base * (1.0 + rate_percent / 100.0).powi(years)
}

/// Whether and how to adjust a prediction for inflation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct InflationRequest {
    /// Apply the adjustment.
    pub adjust: bool,
    /// Average annual rate in percent; required when `adjust` is set.
    #[serde(default)]
    pub rate_percent: Option<f64>,
}

impl InflationRequest {
    /// No adjustment.
    pub fn none() -> Self {
        Self::default()
    }

    /// Adjust at the given annual rate.
    pub fn at_rate(rate_percent: f64) -> Self {
        Self {
            adjust: true,
            rate_percent: Some(rate_percent),
        }
    }
}

/// Result of an applied adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InflationAdjustment {
    /// Price after compounding.
    pub adjusted_price: f64,
    /// Rate used, in percent.
    pub rate_percent: f64,
    /// Elapsed whole years used as exponent.
    pub years: i32,
}

/// Applies compound growth from the dataset snapshot date to today.
#[derive(Debug, Clone)]
pub struct InflationAdjuster {
    reference_date: NaiveDate,
    clock: Arc<dyn Clock>,
    rate_bounds: RateBounds,
}

impl InflationAdjuster {
    /// Create an adjuster measuring years from `reference_date`.
    pub fn new(reference_date: NaiveDate, clock: Arc<dyn Clock>, rate_bounds: RateBounds) -> Self {
        Self {
            reference_date,
            clock,
            rate_bounds,
        }
    }

    /// The snapshot date years are counted from.
    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    /// Elapsed whole years as of the clock's current date.
    pub fn elapsed_years(&self) -> i32 {
        elapsed_years(self.reference_date, self.clock.today())
    }

    /// Adjust `base`, or return `None` when no adjustment was requested.
    ///
    /// A request without a rate, or with a rate outside the accepted bounds,
    /// is rejected.
    pub fn adjust(
        &self,
        base: f64,
        request: &InflationRequest,
    ) -> CoreResult<Option<InflationAdjustment>> {
        if !request.adjust {
            return Ok(None);
        }

        let rate_percent = request.rate_percent.ok_or_else(|| {
            CoreError::invalid_input("inflation_rate", "required when adjusting for inflation")
        })?;
        self.rate_bounds.check(rate_percent)?;

        let years = self.elapsed_years();
        Ok(Some(InflationAdjustment {
            adjusted_price: compound(base, rate_percent, years),
            rate_percent,
            years,
        }))
    }

    /// The price to show: adjusted when requested, `base` otherwise.
    pub fn apply(&self, base: f64, request: &InflationRequest) -> CoreResult<f64> {
        Ok(self
            .adjust(base, request)?
            .map(|adj| adj.adjusted_price)
            .unwrap_or(base))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputLimits;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn adjuster_at(today: NaiveDate) -> InflationAdjuster {
        InflationAdjuster::new(
            DATASET_SNAPSHOT_DATE,
            Arc::new(FixedClock(today)),
            InputLimits::default().inflation_rate,
        )
    }

    #[test]
    fn test_snapshot_date() {
        assert_eq!(DATASET_SNAPSHOT_DATE, date(2019, 7, 4));
    }

    #[test]
    fn test_elapsed_years_rounds_to_nearest() {
        let reference = DATASET_SNAPSHOT_DATE;
        assert_eq!(elapsed_years(reference, reference), 0);
        assert_eq!(elapsed_years(reference, date(2024, 7, 4)), 5);
        // 2 years and ~7 months rounds up.
        assert_eq!(elapsed_years(reference, date(2022, 2, 1)), 3);
        // 2 years and ~5 months rounds down.
        assert_eq!(elapsed_years(reference, date(2021, 12, 1)), 2);
        assert_eq!(elapsed_years(reference, date(2017, 7, 4)), -2);
    }

    #[test]
    fn test_compounding_five_years() {
        let adjuster = adjuster_at(date(2024, 7, 4));
        let adj = adjuster
            .adjust(500_000.0, &InflationRequest::at_rate(3.0))
            .unwrap()
            .unwrap();

        assert_eq!(adj.years, 5);
        assert_eq!(adj.rate_percent, 3.0);
        assert!((adj.adjusted_price - 579_637.04).abs() < 0.01);
        assert!((adj.adjusted_price - 500_000.0 * 1.03_f64.powi(5)).abs() < 1e-6);
    }

    #[test]
    fn test_not_requested_is_identity() {
        let adjuster = adjuster_at(date(2030, 1, 1));
        for base in [0.0, 1.0, 123_456.78, 9_999_999.0] {
            assert_eq!(adjuster.adjust(base, &InflationRequest::none()).unwrap(), None);
            assert_eq!(adjuster.apply(base, &InflationRequest::none()).unwrap(), base);
        }

        // A stray rate is not consulted without the flag.
        let request = InflationRequest {
            adjust: false,
            rate_percent: Some(250.0),
        };
        assert_eq!(adjuster.apply(42.0, &request).unwrap(), 42.0);
    }

    #[test]
    fn test_missing_rate_is_invalid() {
        let adjuster = adjuster_at(date(2024, 7, 4));
        let request = InflationRequest {
            adjust: true,
            rate_percent: None,
        };
        let err = adjuster.adjust(1.0, &request).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidInput {
                field: "inflation_rate",
                ..
            }
        ));
    }

    #[test]
    fn test_out_of_range_rate_is_invalid() {
        let adjuster = adjuster_at(date(2024, 7, 4));
        assert!(adjuster.adjust(1.0, &InflationRequest::at_rate(-1.0)).is_err());
        assert!(adjuster.adjust(1.0, &InflationRequest::at_rate(101.0)).is_err());
        assert!(adjuster.adjust(1.0, &InflationRequest::at_rate(0.0)).is_ok());
    }

    #[test]
    fn test_years_follow_the_clock() {
        let request = InflationRequest::at_rate(10.0);
        let early = adjuster_at(date(2020, 7, 4)).apply(100.0, &request).unwrap();
        let late = adjuster_at(date(2021, 7, 4)).apply(100.0, &request).unwrap();
        assert!((early - 110.0).abs() < 1e-9);
        assert!((late - 121.0).abs() < 1e-9);
    }

    #[test]
    fn test_system_clock_is_after_snapshot() {
        assert!(SystemClock.today() > DATASET_SNAPSHOT_DATE);
    }
}

//! Pay month model.
//!
//! This module contains the [`PayMonth`] type that defines the calculation
//! window for payroll calculations. A pay month is a whole calendar month,
//! addressed as `YYYY-MM`.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// A calendar month used as the payroll calculation window.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayMonth;
///
/// let month: PayMonth = "2026-01".parse().unwrap();
/// assert_eq!(month.days_in_month(), 31);
/// assert_eq!(month.working_days(), 26);
/// assert_eq!(month.to_string(), "2026-01");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PayMonth {
    year: i32,
    month: u32,
}

impl PayMonth {
    /// Creates a pay month, rejecting out-of-range month numbers.
    pub fn new(year: i32, month: u32) -> Result<Self, EngineError> {
        if !(1..=12).contains(&month) {
            return Err(EngineError::Validation {
                message: format!("month out of range: {month}"),
            });
        }
        Ok(Self { year, month })
    }

    /// The calendar year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The month number, 1-12.
    pub fn month(&self) -> u32 {
        self.month
    }

    /// The first day of the month (inclusive window start).
    pub fn first_day(&self) -> NaiveDate {
        // Month number is validated on construction.
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .unwrap_or(NaiveDate::MIN)
    }

    /// The last day of the month (inclusive window end).
    pub fn last_day(&self) -> NaiveDate {
        let (next_year, next_month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .unwrap_or(NaiveDate::MAX)
            .pred_opt()
            .unwrap_or(NaiveDate::MAX)
    }

    /// Number of calendar days in the month.
    pub fn days_in_month(&self) -> u32 {
        self.last_day().day()
    }

    /// Working days under the six-day work week approximation:
    /// `floor(days_in_month * 6 / 7)`.
    pub fn working_days(&self) -> u32 {
        self.days_in_month() * 6 / 7
    }

    /// Checks whether a date falls within this month (inclusive).
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl FromStr for PayMonth {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::Validation {
            message: format!("month must be formatted YYYY-MM, got '{s}'"),
        };
        let (year_part, month_part) = s.split_once('-').ok_or_else(invalid)?;
        let year: i32 = year_part.parse().map_err(|_| invalid())?;
        let month: u32 = month_part.parse().map_err(|_| invalid())?;
        if year_part.len() != 4 || month_part.len() != 2 {
            return Err(invalid());
        }
        PayMonth::new(year, month)
    }
}

impl fmt::Display for PayMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl TryFrom<String> for PayMonth {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PayMonth> for String {
    fn from(value: PayMonth) -> Self {
        value.to_string()
    }
}

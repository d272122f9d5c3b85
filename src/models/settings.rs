//! Effective-dated payroll settings.
//!
//! Statutory rates change over time, so settings live in an ordered,
//! effective-dated history and are resolved as-of a date by a pure
//! function rather than cached global state.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of the effective-dated settings history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollSettings {
    /// First date these settings apply.
    pub effective_from: NaiveDate,
    /// Provident fund rate as a percentage of prorated base pay.
    pub pf_rate: Decimal,
    /// Employee state insurance rate as a percentage of gross pay.
    pub esi_rate: Decimal,
    /// Multiplier applied to overtime hours worked on Sundays.
    pub sunday_overtime_multiplier: Decimal,
}

impl PayrollSettings {
    /// Baseline settings used when no history row qualifies:
    /// PF 12%, ESI 0.75%, Sunday overtime at 2x.
    pub fn baseline() -> Self {
        Self {
            effective_from: NaiveDate::MIN,
            pf_rate: Decimal::new(12, 0),
            esi_rate: Decimal::new(75, 2),
            sunday_overtime_multiplier: Decimal::new(2, 0),
        }
    }

    /// Resolves the settings row in force on `date`: the row with the
    /// latest `effective_from <= date`. Returns `None` when no row
    /// qualifies; callers fall back to [`PayrollSettings::baseline`].
    pub fn as_of(rows: &[PayrollSettings], date: NaiveDate) -> Option<&PayrollSettings> {
        rows.iter()
            .filter(|s| s.effective_from <= date)
            .max_by_key(|s| s.effective_from)
    }
}

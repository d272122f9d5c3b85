//! Employee model and related types.
//!
//! This module defines the Employee struct and the Advance record used
//! when computing deductions.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Represents an employee subject to payroll calculation.
///
/// Employees are never physically deleted; a soft `is_active` flag marks
/// deactivation, and batch rosters only include active employees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// Display name, carried into batch progress and failure entries.
    pub name: String,
    /// Monthly base salary.
    pub base_salary: Decimal,
    /// Monthly house rent allowance.
    pub hra_amount: Decimal,
    /// Monthly other/conveyance allowance.
    pub other_conv_amount: Decimal,
    /// Optional employee-specific overtime rate per hour.
    ///
    /// When set and positive, it wins the overtime rate cascade outright.
    #[serde(default)]
    pub overtime_rate_per_hour: Option<Decimal>,
    /// Soft-deactivation flag.
    pub is_active: bool,
    /// Unit/department reference, used for roster filtering.
    #[serde(default)]
    pub unit: Option<String>,
}

impl Employee {
    /// Returns the employee-specific overtime rate when it is set and
    /// strictly positive. A zero or negative stored rate is treated as
    /// absent so the cascade falls through.
    pub fn effective_overtime_rate(&self) -> Option<Decimal> {
        self.overtime_rate_per_hour.filter(|r| *r > Decimal::ZERO)
    }
}

/// A salary advance disbursed to an employee.
///
/// Advances dated within the pay month are summed into deductions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advance {
    /// The employee the advance was disbursed to.
    pub employee_id: String,
    /// Disbursement date.
    pub date: NaiveDate,
    /// Disbursed amount.
    pub amount: Decimal,
}

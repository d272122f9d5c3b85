//! Calculation result models for the payroll engine.
//!
//! This module contains the [`CalculationResult`] type and its associated
//! structures that capture all outputs from a payroll calculation: prorated
//! pay components, overtime, deductions, the leave reconciliation overlay,
//! and the transparency breakdown consumers render.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{LeaveReconciliation, PayMonth};

/// Which tier of the rate cascade produced the overtime unit rate.
///
/// # Example
///
/// ```
/// use payroll_engine::models::RateSource;
///
/// let source = RateSource::EmployeeSpecific;
/// assert_eq!(serde_json::to_string(&source).unwrap(), "\"employee_specific\"");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    /// The employee's own positive overtime rate was used.
    EmployeeSpecific,
    /// A formula evaluation supplied the multiplier.
    FormulaBased,
    /// The system default multiplier was used.
    SystemDefault,
}

/// The human-readable transparency artifact attached to every result.
///
/// Consumers render these strings verbatim in audit views; the variable
/// snapshot uses a `BTreeMap` so it serializes in a stable order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationBreakdown {
    /// How base/HRA/other pay was prorated.
    pub base_calculation: String,
    /// How the overtime amount was derived, naming the rate source.
    pub overtime_calculation: String,
    /// How PF, ESI, and advances were applied.
    pub deduction_calculation: String,
    /// Formula types that actually contributed to this calculation.
    pub formulas_used: Vec<String>,
    /// Snapshot of the resolved variable set at calculation time.
    pub variables_used: BTreeMap<String, Decimal>,
    /// Degradation warnings collected along the way (silent-failure
    /// evaluator, missing leave balance, missing settings row).
    pub warnings: Vec<String>,
}

impl CalculationBreakdown {
    /// Diagnostic 0-100 score describing how rule-driven the calculation
    /// was: +30 for the breakdown itself, +40/+30/+10 by rate source,
    /// +20 when a named formula contributed, +10 for a non-empty variable
    /// snapshot. Carries no business effect.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::{CalculationBreakdown, RateSource};
    /// use std::collections::BTreeMap;
    ///
    /// let breakdown = CalculationBreakdown {
    ///     base_calculation: String::new(),
    ///     overtime_calculation: String::new(),
    ///     deduction_calculation: String::new(),
    ///     formulas_used: vec![],
    ///     variables_used: BTreeMap::new(),
    ///     warnings: vec![],
    /// };
    /// assert_eq!(breakdown.transparency_score(RateSource::SystemDefault), 40);
    /// ```
    pub fn transparency_score(&self, rate_source: RateSource) -> u8 {
        let mut score: u32 = 30;
        score += match rate_source {
            RateSource::EmployeeSpecific => 40,
            RateSource::FormulaBased => 30,
            RateSource::SystemDefault => 10,
        };
        if !self.formulas_used.is_empty() {
            score += 20;
        }
        if !self.variables_used.is_empty() {
            score += 10;
        }
        score.min(100) as u8
    }
}

/// The complete result of a payroll calculation for one employee/month.
///
/// Created fresh on every calculation, never mutated in place, and
/// superseded by the next calculation for the same employee and month.
/// The engine does not persist it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed the calculation.
    pub engine_version: String,
    /// The employee the calculation is for.
    pub employee_id: String,
    /// Display name carried for batch progress and report rendering.
    pub employee_name: String,
    /// The calculation month.
    pub month: PayMonth,
    /// Working days in the month under the six-day-week approximation.
    pub working_days: u32,
    /// Days of presence the calculation was based on (override or actual).
    pub days_present: u32,
    /// Base salary after pro-ration.
    pub prorated_base: Decimal,
    /// HRA after pro-ration.
    pub prorated_hra: Decimal,
    /// Other/conveyance allowance after pro-ration.
    pub prorated_other: Decimal,
    /// Total overtime hours priced.
    pub overtime_hours: Decimal,
    /// The overtime amount.
    pub overtime_amount: Decimal,
    /// Which cascade tier priced the overtime.
    pub rate_source: RateSource,
    /// Prorated components plus overtime.
    pub gross_salary: Decimal,
    /// Capped provident fund deduction.
    pub pf_amount: Decimal,
    /// Employee state insurance deduction; zero when exempt.
    pub esi_amount: Decimal,
    /// True when gross pay exceeded the ESI threshold (or presence was zero).
    pub esi_exempt: bool,
    /// Advances recovered within the month.
    pub advances_amount: Decimal,
    /// PF + ESI + advances.
    pub total_deductions: Decimal,
    /// Gross minus total deductions. The leave impact below is *not*
    /// subtracted here; unpaid days are already reflected in pro-ration.
    pub net_salary: Decimal,
    /// Salary impact of effective unpaid leave, reported as an overlay.
    pub leave_impact_amount: Decimal,
    /// The leave reconciliation overlay.
    pub leave_reconciliation: LeaveReconciliation,
    /// The transparency artifact.
    pub breakdown: CalculationBreakdown,
    /// Diagnostic 0-100 rule-drivenness score.
    pub transparency_score: u8,
}

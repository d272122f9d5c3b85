//! Formula catalog models.
//!
//! These types describe the admin-managed variable catalog, time-bounded
//! employee overrides, and the effective-dated payroll formulas whose
//! expressions the evaluator substitutes and computes.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How a catalog variable obtains its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableType {
    /// A fixed constant maintained by administrators.
    Fixed,
    /// Derived by a formula elsewhere; the default is a fallback.
    Calculated,
    /// Expected to be overridden per employee.
    EmployeeSpecific,
    /// Supplied by the system (rates, multipliers).
    System,
}

/// A globally-cataloged formula variable with its default value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormulaVariable {
    /// Variable name as referenced inside formula expressions.
    pub name: String,
    /// How the variable obtains its value.
    pub variable_type: VariableType,
    /// Default value applied in the first resolution layer.
    pub default_value: Decimal,
    /// Inactive variables are skipped during resolution.
    pub is_active: bool,
}

/// A time-bounded per-employee override of a catalog variable.
///
/// Only one override may be effective for a given variable at a given date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeVariableOverride {
    /// The employee the override applies to.
    pub employee_id: String,
    /// Name of the overridden variable.
    pub variable_name: String,
    /// Override value.
    pub value: Decimal,
    /// First date the override is effective (inclusive).
    pub effective_from: NaiveDate,
    /// Last date the override is effective (inclusive); open-ended if absent.
    #[serde(default)]
    pub effective_to: Option<NaiveDate>,
}

impl EmployeeVariableOverride {
    /// Whether the override window contains `date`.
    pub fn is_effective_on(&self, date: NaiveDate) -> bool {
        self.effective_from <= date && self.effective_to.is_none_or(|to| date <= to)
    }
}

/// The kind of calculation a payroll formula drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormulaType {
    /// Produces the overtime multiplier used by the rate cascade.
    OvertimeCalculation,
    /// Produces a gross adjustment amount.
    GrossAdjustment,
}

impl FormulaType {
    /// Stable string form, used in breakdown `formulas_used` lists.
    pub fn as_str(&self) -> &'static str {
        match self {
            FormulaType::OvertimeCalculation => "overtime_calculation",
            FormulaType::GrossAdjustment => "gross_adjustment",
        }
    }
}

/// An effective-dated payroll formula.
///
/// Only the latest active formula per type is used by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollFormula {
    /// The calculation this formula drives.
    pub formula_type: FormulaType,
    /// Restricted arithmetic expression over catalog variable names.
    pub expression: String,
    /// Inactive formulas are never selected.
    pub is_active: bool,
    /// First date the formula is effective.
    pub effective_from: NaiveDate,
}

impl PayrollFormula {
    /// Picks the latest active formula of `formula_type` from `rows`.
    ///
    /// Rows need not be sorted; ties on `effective_from` keep the last
    /// encountered row.
    pub fn latest_active(rows: &[PayrollFormula], formula_type: FormulaType) -> Option<&Self> {
        rows.iter()
            .filter(|f| f.is_active && f.formula_type == formula_type)
            .max_by_key(|f| f.effective_from)
    }
}

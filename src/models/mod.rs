//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod attendance;
mod calculation_result;
mod employee;
mod formula;
mod leave;
mod pay_month;
mod settings;

pub use attendance::{AttendanceRecord, AttendanceStatus};
pub use calculation_result::{CalculationBreakdown, CalculationResult, RateSource};
pub use employee::{Advance, Employee};
pub use formula::{
    EmployeeVariableOverride, FormulaType, FormulaVariable, PayrollFormula, VariableType,
};
pub use leave::{LeaveBalance, LeaveReconciliation};
pub use pay_month::PayMonth;
pub use settings::PayrollSettings;

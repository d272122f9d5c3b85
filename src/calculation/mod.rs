//! Calculation logic for the payroll engine.
//!
//! This module contains all the calculation functions for determining
//! pay, including variable resolution, restricted formula evaluation,
//! the overtime rate cascade, monthly attendance aggregation, leave
//! reconciliation, statutory deductions, and the single-employee payroll
//! calculation that composes them.

mod attendance_summary;
mod deductions;
mod evaluator;
mod leave_reconciliation;
mod overtime;
mod payroll;
mod variables;

pub use attendance_summary::{
    AttendanceAnomaly, AttendanceSummary, audit_records, summarize_month,
};
pub use deductions::{DeductionBreakdown, advances_within_month, compute_deductions};
pub use evaluator::{EvaluationOutcome, evaluate};
pub use leave_reconciliation::reconcile_leave;
pub use overtime::{
    FormulaMultiplier, OvertimeComputation, OvertimeHours, OvertimeRequest, RESOLUTION_ORDER,
    resolve_overtime_amount,
};
pub use payroll::{CalculationInputs, calculate_payroll};
pub use variables::{ResolvedVariables, VariableSource, resolve_variables};

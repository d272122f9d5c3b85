//! Leave balance model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Yearly leave balances for an employee.
///
/// Balances are non-negative by policy, but the reconciler handles zero
/// and negative values gracefully rather than rejecting the row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveBalance {
    /// The employee the balances belong to.
    pub employee_id: String,
    /// The calendar year the balances cover.
    pub year: i32,
    /// Remaining casual leave days.
    pub casual_leave_balance: Decimal,
    /// Remaining earned leave days.
    pub earned_leave_balance: Decimal,
}

impl LeaveBalance {
    /// Total leave days available across both types.
    pub fn total_available(&self) -> Decimal {
        self.casual_leave_balance + self.earned_leave_balance
    }
}

/// The outcome of reconciling leave taken against the yearly balance.
///
/// This is an analytical overlay on the calculation result: excess leave is
/// reclassified as unpaid days and priced, but the amount is never
/// subtracted from net pay, which already reflects absence via pro-ration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveReconciliation {
    /// Casual leave days taken in the month.
    pub casual_taken: Decimal,
    /// Earned leave days taken in the month.
    pub earned_taken: Decimal,
    /// Casual plus earned days taken.
    pub total_taken: Decimal,
    /// Casual plus earned balance available for the year.
    pub total_available: Decimal,
    /// Leave taken beyond the available balance, floored at zero.
    pub excess_days: Decimal,
    /// Unpaid leave days recorded directly in attendance.
    pub raw_unpaid_days: Decimal,
    /// Raw unpaid days plus excess leave.
    pub effective_unpaid_days: Decimal,
    /// Salary impact of the effective unpaid days (26-day divisor).
    pub impact_amount: Decimal,
    /// True when no balance row existed and reconciliation was skipped.
    pub skipped: bool,
    /// Present when reconciliation degraded instead of completing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

//! Leave reconciliation against the yearly balance.
//!
//! Leave taken beyond the available balance is reclassified as unpaid
//! days (never a negative balance) and priced with a flat 26-working-day
//! divisor. The divisor deliberately differs from the 30-day divisor used
//! for overtime pricing; both are observed payroll policy and are kept
//! configurable side by side rather than unified.

use rust_decimal::Decimal;

use crate::models::{LeaveBalance, LeaveReconciliation};

use super::attendance_summary::AttendanceSummary;

/// Reconciles the month's leave usage against the yearly balance.
///
/// A missing balance row skips reconciliation: the impact is zero, a
/// warning is attached, and the caller proceeds normally. The result is
/// an analytical overlay; it must never be subtracted from net pay,
/// which already reflects absence through pro-ration.
pub fn reconcile_leave(
    summary: &AttendanceSummary,
    balance: Option<&LeaveBalance>,
    base_salary: Decimal,
    leave_divisor: Decimal,
) -> LeaveReconciliation {
    let casual_taken = Decimal::from(summary.casual_leave_days);
    let earned_taken = Decimal::from(summary.earned_leave_days);
    let total_taken = casual_taken + earned_taken;
    let raw_unpaid_days = Decimal::from(summary.unpaid_leave_days);

    let Some(balance) = balance else {
        return LeaveReconciliation {
            casual_taken,
            earned_taken,
            total_taken,
            total_available: Decimal::ZERO,
            excess_days: Decimal::ZERO,
            raw_unpaid_days,
            effective_unpaid_days: raw_unpaid_days,
            impact_amount: Decimal::ZERO,
            skipped: true,
            warning: Some(
                "no leave balance row for the year; reconciliation skipped".to_string(),
            ),
        };
    };

    let total_available = balance.total_available();
    let excess_days = (total_taken - total_available).max(Decimal::ZERO);
    let effective_unpaid_days = raw_unpaid_days + excess_days;

    let impact_amount = if leave_divisor > Decimal::ZERO {
        (base_salary / leave_divisor * effective_unpaid_days).round_dp(2)
    } else {
        Decimal::ZERO
    };

    LeaveReconciliation {
        casual_taken,
        earned_taken,
        total_taken,
        total_available,
        excess_days,
        raw_unpaid_days,
        effective_unpaid_days,
        impact_amount,
        skipped: false,
        warning: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn summary(casual: u32, earned: u32, unpaid: u32) -> AttendanceSummary {
        AttendanceSummary {
            casual_leave_days: casual,
            earned_leave_days: earned,
            unpaid_leave_days: unpaid,
            ..AttendanceSummary::default()
        }
    }

    fn balance(casual: &str, earned: &str) -> LeaveBalance {
        LeaveBalance {
            employee_id: "emp_001".to_string(),
            year: 2026,
            casual_leave_balance: dec(casual),
            earned_leave_balance: dec(earned),
        }
    }

    #[test]
    fn test_excess_reclassified_as_unpaid() {
        // casual_taken=10, balances 8+0 -> excess 2 on top of raw unpaid.
        let reconciliation = reconcile_leave(
            &summary(10, 0, 1),
            Some(&balance("8", "0")),
            dec("26000"),
            dec("26"),
        );
        assert_eq!(reconciliation.excess_days, dec("2"));
        assert_eq!(reconciliation.effective_unpaid_days, dec("3"));
        assert_eq!(reconciliation.impact_amount, dec("3000"));
        assert!(!reconciliation.skipped);
    }

    #[test]
    fn test_leave_within_balance_has_no_excess() {
        let reconciliation = reconcile_leave(
            &summary(3, 2, 0),
            Some(&balance("8", "4")),
            dec("26000"),
            dec("26"),
        );
        assert_eq!(reconciliation.total_taken, dec("5"));
        assert_eq!(reconciliation.total_available, dec("12"));
        assert_eq!(reconciliation.excess_days, Decimal::ZERO);
        assert_eq!(reconciliation.impact_amount, Decimal::ZERO);
    }

    #[test]
    fn test_raw_unpaid_days_priced_without_excess() {
        let reconciliation = reconcile_leave(
            &summary(0, 0, 2),
            Some(&balance("8", "4")),
            dec("26000"),
            dec("26"),
        );
        assert_eq!(reconciliation.effective_unpaid_days, dec("2"));
        assert_eq!(reconciliation.impact_amount, dec("2000"));
    }

    #[test]
    fn test_negative_balance_handled_gracefully() {
        // Policy says balances are non-negative; reconcile anyway.
        let reconciliation = reconcile_leave(
            &summary(2, 0, 0),
            Some(&balance("-1", "0")),
            dec("26000"),
            dec("26"),
        );
        assert_eq!(reconciliation.total_available, dec("-1"));
        assert_eq!(reconciliation.excess_days, dec("3"));
    }

    #[test]
    fn test_missing_balance_skips_with_warning() {
        let reconciliation = reconcile_leave(&summary(5, 0, 2), None, dec("26000"), dec("26"));
        assert!(reconciliation.skipped);
        assert_eq!(reconciliation.impact_amount, Decimal::ZERO);
        assert_eq!(reconciliation.effective_unpaid_days, dec("2"));
        assert!(reconciliation.warning.unwrap().contains("skipped"));
    }

    #[test]
    fn test_impact_uses_26_day_divisor() {
        let reconciliation = reconcile_leave(
            &summary(0, 0, 1),
            Some(&balance("0", "0")),
            dec("26000"),
            dec("26"),
        );
        // 26000 / 26 * 1 = 1000, not 26000 / 30.
        assert_eq!(reconciliation.impact_amount, dec("1000"));
    }

    #[test]
    fn test_impact_rounds_to_two_places() {
        let reconciliation = reconcile_leave(
            &summary(0, 0, 1),
            Some(&balance("0", "0")),
            dec("10000"),
            dec("26"),
        );
        assert_eq!(reconciliation.impact_amount, dec("384.62"));
    }
}

//! Statutory deduction calculation.
//!
//! PF is a capped percentage of prorated base pay; ESI applies only while
//! gross pay sits at or below the statutory threshold; advances disbursed
//! within the month are recovered in full. None of the statutory
//! deductions apply at zero presence.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::StatutoryConfig;
use crate::models::{Advance, PayMonth, PayrollSettings};

/// The deduction side of a calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeductionBreakdown {
    /// Capped provident fund deduction.
    pub pf_amount: Decimal,
    /// Employee state insurance deduction; zero when exempt.
    pub esi_amount: Decimal,
    /// True when ESI did not apply (gross above threshold, or zero
    /// presence).
    pub esi_exempt: bool,
    /// Advances recovered within the month.
    pub advances_amount: Decimal,
    /// PF + ESI + advances.
    pub total: Decimal,
    /// Human-readable calculation string for the breakdown.
    pub explanation: String,
}

/// Computes PF, ESI, and advance recovery for one calculation.
pub fn compute_deductions(
    prorated_base: Decimal,
    gross_salary: Decimal,
    days_present: u32,
    settings: &PayrollSettings,
    statutory: &StatutoryConfig,
    advances_amount: Decimal,
) -> DeductionBreakdown {
    let hundred = Decimal::ONE_HUNDRED;

    let pf_amount = if days_present > 0 {
        (prorated_base * settings.pf_rate / hundred)
            .min(statutory.pf_cap)
            .round_dp(2)
    } else {
        Decimal::ZERO
    };

    let esi_applies = days_present > 0 && gross_salary <= statutory.esi_gross_threshold;
    let esi_amount = if esi_applies {
        (gross_salary * settings.esi_rate / hundred).round_dp(2)
    } else {
        Decimal::ZERO
    };

    let total = (pf_amount + esi_amount + advances_amount).round_dp(2);

    let esi_label = if esi_applies {
        format!(
            "ESI {}% of gross {} = {}",
            settings.esi_rate.normalize(),
            gross_salary.normalize(),
            esi_amount.normalize()
        )
    } else {
        format!(
            "ESI exempt (gross {} above threshold {} or zero presence)",
            gross_salary.normalize(),
            statutory.esi_gross_threshold.normalize()
        )
    };

    let explanation = format!(
        "PF {}% of prorated base {} capped at {} = {}; {}; advances = {}; total = {}",
        settings.pf_rate.normalize(),
        prorated_base.normalize(),
        statutory.pf_cap.normalize(),
        pf_amount.normalize(),
        esi_label,
        advances_amount.normalize(),
        total.normalize()
    );

    DeductionBreakdown {
        pf_amount,
        esi_amount,
        esi_exempt: !esi_applies,
        advances_amount,
        total,
        explanation,
    }
}

/// Sums advances disbursed within the month for one employee.
pub fn advances_within_month(advances: &[Advance], employee_id: &str, month: PayMonth) -> Decimal {
    advances
        .iter()
        .filter(|a| a.employee_id == employee_id && month.contains_date(a.date))
        .map(|a| a.amount)
        .sum()
}

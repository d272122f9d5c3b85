//! The single-employee payroll calculation.
//!
//! [`calculate_payroll`] is a state-free function over a pre-fetched
//! snapshot of store data. It composes attendance aggregation, variable
//! resolution, the overtime cascade, deductions, and leave reconciliation
//! into one [`CalculationResult`] with a full transparency breakdown.
//!
//! Failure policy: sub-steps degrade to safe defaults (zero overtime,
//! zero leave impact) and record warnings instead of aborting, so one
//! malformed row never blocks payroll for a whole roster. Only a missing
//! employee fails the calculation, and that is checked before the
//! snapshot is assembled.

use std::collections::BTreeMap;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::models::{
    Advance, AttendanceRecord, CalculationBreakdown, CalculationResult, Employee,
    EmployeeVariableOverride, FormulaVariable, LeaveBalance, PayMonth, PayrollFormula,
    PayrollSettings,
};

use super::attendance_summary::summarize_month;
use super::deductions::{advances_within_month, compute_deductions};
use super::evaluator::evaluate;
use super::leave_reconciliation::reconcile_leave;
use super::overtime::{
    FormulaMultiplier, OvertimeHours, OvertimeRequest, resolve_overtime_amount,
};
use super::variables::resolve_variables;

/// The pre-fetched snapshot a single calculation runs over.
///
/// The engine assembles this from store reads; tests can build it
/// directly to exercise the calculation without any IO.
pub struct CalculationInputs<'a> {
    /// The employee being calculated.
    pub employee: &'a Employee,
    /// The calculation month.
    pub month: PayMonth,
    /// Attendance rows; rows outside the month are ignored.
    pub attendance: &'a [AttendanceRecord],
    /// The employee's balance row for the month's year, if any.
    pub leave_balance: Option<&'a LeaveBalance>,
    /// Advance rows; filtered to the employee and month here.
    pub advances: &'a [Advance],
    /// Settings in force for the month.
    pub settings: &'a PayrollSettings,
    /// The active variable catalog.
    pub variable_catalog: &'a [FormulaVariable],
    /// Employee variable overrides.
    pub overrides: &'a [EmployeeVariableOverride],
    /// The latest active overtime formula, if any.
    pub overtime_formula: Option<&'a PayrollFormula>,
    /// Caller-supplied presence override.
    pub days_present_override: Option<u32>,
    /// Caller-supplied overtime hours, honored only when the month has
    /// no attendance rows at all.
    pub overtime_hours_override: Option<Decimal>,
    /// Caller-supplied custom variables, the final resolution layer.
    pub custom_variables: &'a BTreeMap<String, Decimal>,
    /// Warning carried from settings resolution (baseline fallback).
    pub settings_warning: Option<String>,
}

/// Scales a monthly amount by attended working days.
fn prorate(amount: Decimal, days_present: u32, working_days: u32) -> Decimal {
    if days_present == 0 || working_days == 0 {
        return Decimal::ZERO;
    }
    if days_present >= working_days {
        return amount;
    }
    (amount * Decimal::from(days_present) / Decimal::from(working_days)).round_dp(2)
}

/// Runs the full single-employee calculation over `inputs`.
pub fn calculate_payroll(
    inputs: &CalculationInputs<'_>,
    config: &EngineConfig,
) -> CalculationResult {
    let employee = inputs.employee;
    let mut warnings: Vec<String> = Vec::new();
    if let Some(warning) = &inputs.settings_warning {
        warnings.push(warning.clone());
    }

    // Step 1: aggregate attendance; an explicit override wins presence.
    let summary = summarize_month(inputs.attendance, inputs.month);
    let working_days = inputs.month.working_days();
    let days_present = inputs.days_present_override.unwrap_or(summary.days_worked);

    // Step 2: pro-ration. Zero attendance means zero pay regardless of
    // leave balances; full attendance uses the unscaled amounts.
    let prorated_base = prorate(employee.base_salary, days_present, working_days);
    let prorated_hra = prorate(employee.hra_amount, days_present, working_days);
    let prorated_other = prorate(employee.other_conv_amount, days_present, working_days);

    let base_calculation = if days_present == 0 {
        "zero presence: base, HRA and other allowance set to 0".to_string()
    } else if days_present < working_days {
        format!(
            "prorated {}/{} working days: base {} → {}, HRA {} → {}, other {} → {}",
            days_present,
            working_days,
            employee.base_salary.normalize(),
            prorated_base.normalize(),
            employee.hra_amount.normalize(),
            prorated_hra.normalize(),
            employee.other_conv_amount.normalize(),
            prorated_other.normalize()
        )
    } else {
        format!(
            "full attendance ({}/{} working days): components unscaled",
            days_present, working_days
        )
    };

    // Step 3: overtime via the rate cascade. The hours override applies
    // only when the month has no attendance rows.
    let overtime_hours = if summary.record_count == 0 {
        OvertimeHours {
            total: inputs.overtime_hours_override.unwrap_or(Decimal::ZERO),
            sunday: Decimal::ZERO,
        }
    } else {
        OvertimeHours {
            total: summary.overtime_hours,
            sunday: summary.sunday_overtime_hours,
        }
    };

    let variables = resolve_variables(
        employee,
        inputs.month,
        inputs.variable_catalog,
        inputs.overrides,
        inputs.custom_variables,
    );

    let formula_multiplier = inputs.overtime_formula.map(|formula| {
        let outcome = evaluate(&formula.expression, &variables);
        if let Some(warning) = &outcome.warning {
            warnings.push(warning.clone());
        }
        FormulaMultiplier {
            formula_type: formula.formula_type,
            outcome,
        }
    });

    let overtime = resolve_overtime_amount(&OvertimeRequest {
        employee,
        hours: overtime_hours,
        days_present,
        formula: formula_multiplier.as_ref(),
        settings: inputs.settings,
        calculation: &config.calculation,
    });

    // Step 4: gross pay.
    let gross_salary =
        (prorated_base + prorated_hra + prorated_other + overtime.amount).round_dp(2);

    // Step 5: deductions.
    let advances_amount = advances_within_month(inputs.advances, &employee.id, inputs.month);
    let deductions = compute_deductions(
        prorated_base,
        gross_salary,
        days_present,
        inputs.settings,
        &config.statutory,
        advances_amount,
    );

    // Step 6: net pay. Leave impact is an overlay and is not subtracted;
    // unpaid days are already reflected in pro-ration.
    let net_salary = (gross_salary - deductions.total).round_dp(2);

    // Step 7: leave reconciliation overlay.
    let leave_reconciliation = reconcile_leave(
        &summary,
        inputs.leave_balance,
        employee.base_salary,
        config.calculation.leave_divisor,
    );
    if let Some(warning) = &leave_reconciliation.warning {
        warnings.push(warning.clone());
    }

    // Step 8: transparency breakdown and score.
    let formulas_used: Vec<String> = overtime
        .formula_used
        .iter()
        .map(|f| f.as_str().to_string())
        .collect();

    let breakdown = CalculationBreakdown {
        base_calculation,
        overtime_calculation: overtime.explanation.clone(),
        deduction_calculation: deductions.explanation.clone(),
        formulas_used,
        variables_used: variables.values().clone(),
        warnings,
    };
    let transparency_score = breakdown.transparency_score(overtime.rate_source);

    CalculationResult {
        calculation_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        employee_id: employee.id.clone(),
        employee_name: employee.name.clone(),
        month: inputs.month,
        working_days,
        days_present,
        prorated_base,
        prorated_hra,
        prorated_other,
        overtime_hours: overtime_hours.total,
        overtime_amount: overtime.amount,
        rate_source: overtime.rate_source,
        gross_salary,
        pf_amount: deductions.pf_amount,
        esi_amount: deductions.esi_amount,
        esi_exempt: deductions.esi_exempt,
        advances_amount,
        total_deductions: deductions.total,
        net_salary,
        leave_impact_amount: leave_reconciliation.impact_amount,
        leave_reconciliation,
        breakdown,
        transparency_score,
    }
}

//! Overtime amount resolution.
//!
//! The overtime unit rate comes from a priority cascade, tried strictly
//! in order with the first success winning:
//!
//! 1. `employee_specific` - the employee's own positive hourly rate
//! 2. `formula_based` - a successful formula evaluation supplies the
//!    multiplier over the derived hourly base
//! 3. `system_default` - the default multiplier over the hourly base
//!
//! The cascade is an explicit ordered chain of resolver functions (see
//! [`RESOLUTION_ORDER`]) so the priority stays auditable and testable in
//! isolation. Overtime hours worked on Sundays are priced with the
//! settings' Sunday multiplier in the multiplier-based tiers; the
//! employee-specific tier applies its flat rate to all hours.

use rust_decimal::Decimal;

use crate::config::CalculationConfig;
use crate::models::{Employee, FormulaType, PayrollSettings, RateSource};

use super::evaluator::EvaluationOutcome;

/// Overtime hours split by pricing class.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OvertimeHours {
    /// All overtime hours for the month.
    pub total: Decimal,
    /// The portion logged on Sundays (subset of `total`).
    pub sunday: Decimal,
}

impl OvertimeHours {
    /// Hours priced at the weekday multiplier.
    pub fn weekday(&self) -> Decimal {
        (self.total - self.sunday).max(Decimal::ZERO)
    }
}

/// A formula evaluation offered to the cascade.
#[derive(Debug, Clone, PartialEq)]
pub struct FormulaMultiplier {
    /// The calculation type of the formula that was evaluated.
    pub formula_type: FormulaType,
    /// The evaluation outcome; only clean outcomes qualify.
    pub outcome: EvaluationOutcome,
}

/// The resolved overtime amount with its audit trail.
#[derive(Debug, Clone, PartialEq)]
pub struct OvertimeComputation {
    /// The overtime amount, rounded to 2 decimal places.
    pub amount: Decimal,
    /// Which cascade tier won.
    pub rate_source: RateSource,
    /// Human-readable calculation string for the breakdown.
    pub explanation: String,
    /// The formula type that contributed, when the formula tier won.
    pub formula_used: Option<FormulaType>,
}

/// Everything a resolver tier may consult.
pub struct OvertimeRequest<'a> {
    /// The employee being calculated.
    pub employee: &'a Employee,
    /// Overtime hours split by pricing class.
    pub hours: OvertimeHours,
    /// Days of validated presence; zero presence means no overtime.
    pub days_present: u32,
    /// Formula evaluation offered to the formula tier, if any.
    pub formula: Option<&'a FormulaMultiplier>,
    /// Settings in force for the month.
    pub settings: &'a PayrollSettings,
    /// Calculation divisors and the default multiplier.
    pub calculation: &'a CalculationConfig,
}

impl OvertimeRequest<'_> {
    /// Hourly base pay derived from monthly base salary.
    fn hourly_base(&self) -> Decimal {
        let divisor = self.calculation.monthly_divisor * self.calculation.hours_per_day;
        if divisor > Decimal::ZERO {
            self.employee.base_salary / divisor
        } else {
            Decimal::ZERO
        }
    }
}

type Resolver = fn(&OvertimeRequest<'_>) -> Option<OvertimeComputation>;

/// The cascade, in priority order. The last tier always resolves.
pub const RESOLUTION_ORDER: [(&str, Resolver); 3] = [
    ("employee_specific", resolve_employee_specific),
    ("formula_based", resolve_formula_based),
    ("system_default", resolve_system_default),
];

/// Resolves the overtime amount through the cascade.
pub fn resolve_overtime_amount(request: &OvertimeRequest<'_>) -> OvertimeComputation {
    if request.hours.total <= Decimal::ZERO || request.days_present == 0 {
        return OvertimeComputation {
            amount: Decimal::ZERO,
            rate_source: RateSource::SystemDefault,
            explanation: "no overtime: zero overtime hours or zero presence".to_string(),
            formula_used: None,
        };
    }

    for (_, resolver) in RESOLUTION_ORDER {
        if let Some(computation) = resolver(request) {
            return computation;
        }
    }

    // The system_default tier is total; this branch is unreachable but
    // keeps the chain shape honest.
    resolve_system_default(request).unwrap_or(OvertimeComputation {
        amount: Decimal::ZERO,
        rate_source: RateSource::SystemDefault,
        explanation: "no overtime".to_string(),
        formula_used: None,
    })
}

fn resolve_employee_specific(request: &OvertimeRequest<'_>) -> Option<OvertimeComputation> {
    let rate = request.employee.effective_overtime_rate()?;
    let amount = (request.hours.total * rate).round_dp(2);
    Some(OvertimeComputation {
        amount,
        rate_source: RateSource::EmployeeSpecific,
        explanation: format!(
            "{} hours × {} per hour (employee-specific rate) = {}",
            request.hours.total.normalize(),
            rate.normalize(),
            amount.normalize()
        ),
        formula_used: None,
    })
}

fn resolve_formula_based(request: &OvertimeRequest<'_>) -> Option<OvertimeComputation> {
    let formula = request.formula?;
    if !formula.outcome.succeeded() {
        return None;
    }
    // A non-positive evaluation still wins the tier; it just falls back
    // to the default multiplier.
    let multiplier = if formula.outcome.value > Decimal::ZERO {
        formula.outcome.value
    } else {
        request.calculation.default_overtime_multiplier
    };
    let (amount, explanation) = multiplier_amount(
        request,
        multiplier,
        &format!("formula {}", formula.formula_type.as_str()),
    );
    Some(OvertimeComputation {
        amount,
        rate_source: RateSource::FormulaBased,
        explanation,
        formula_used: Some(formula.formula_type),
    })
}

fn resolve_system_default(request: &OvertimeRequest<'_>) -> Option<OvertimeComputation> {
    let multiplier = request.calculation.default_overtime_multiplier;
    let (amount, explanation) = multiplier_amount(request, multiplier, "system default");
    Some(OvertimeComputation {
        amount,
        rate_source: RateSource::SystemDefault,
        explanation,
        formula_used: None,
    })
}

/// Prices weekday hours at `multiplier` and Sunday hours at the settings'
/// Sunday multiplier over the derived hourly base.
fn multiplier_amount(
    request: &OvertimeRequest<'_>,
    multiplier: Decimal,
    source_label: &str,
) -> (Decimal, String) {
    let hourly_base = request.hourly_base();
    let weekday_hours = request.hours.weekday();
    let sunday_hours = request.hours.sunday;
    let sunday_multiplier = request.settings.sunday_overtime_multiplier;

    let weekday_amount = weekday_hours * hourly_base * multiplier;
    let sunday_amount = sunday_hours * hourly_base * sunday_multiplier;
    let amount = (weekday_amount + sunday_amount).round_dp(2);

    let base_label = format!(
        "hourly base {} (monthly {} / {} / {})",
        hourly_base.round_dp(2).normalize(),
        request.employee.base_salary.normalize(),
        request.calculation.monthly_divisor.normalize(),
        request.calculation.hours_per_day.normalize()
    );

    let explanation = if sunday_hours > Decimal::ZERO && weekday_hours > Decimal::ZERO {
        format!(
            "{} hours × {} × {} ({}) + {} Sunday hours × {} = {}",
            weekday_hours.normalize(),
            base_label,
            multiplier.normalize(),
            source_label,
            sunday_hours.normalize(),
            sunday_multiplier.normalize(),
            amount.normalize()
        )
    } else if sunday_hours > Decimal::ZERO {
        format!(
            "{} Sunday hours × {} × {} ({}) = {}",
            sunday_hours.normalize(),
            base_label,
            sunday_multiplier.normalize(),
            source_label,
            amount.normalize()
        )
    } else {
        format!(
            "{} hours × {} × {} ({}) = {}",
            weekday_hours.normalize(),
            base_label,
            multiplier.normalize(),
            source_label,
            amount.normalize()
        )
    };

    (amount, explanation)
}

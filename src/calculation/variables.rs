//! Variable resolution for formula evaluation.
//!
//! Builds the flat name-to-value mapping for one employee and month by
//! layering, later layers winning: catalog defaults, employee overrides
//! effective for the month, employee intrinsic fields, and caller-supplied
//! custom variables. An unresolved name is simply absent; consumers treat
//! absence as "use the calculation default" rather than silently zero.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Employee, EmployeeVariableOverride, FormulaVariable, PayMonth};

/// Which resolution layer supplied a variable's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableSource {
    /// The catalog default of an active variable.
    CatalogDefault,
    /// A time-bounded employee override.
    EmployeeOverride,
    /// An intrinsic employee field.
    EmployeeField,
    /// A caller-supplied custom variable.
    Custom,
}

/// The resolved variable set with per-name provenance.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedVariables {
    values: BTreeMap<String, Decimal>,
    sources: BTreeMap<String, VariableSource>,
}

impl ResolvedVariables {
    /// Looks up a resolved value.
    pub fn get(&self, name: &str) -> Option<Decimal> {
        self.values.get(name).copied()
    }

    /// The layer that supplied `name`, if resolved.
    pub fn source(&self, name: &str) -> Option<VariableSource> {
        self.sources.get(name).copied()
    }

    /// The full mapping, ordered by name.
    pub fn values(&self) -> &BTreeMap<String, Decimal> {
        &self.values
    }

    /// True when nothing resolved.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn set(&mut self, name: &str, value: Decimal, source: VariableSource) {
        self.values.insert(name.to_string(), value);
        self.sources.insert(name.to_string(), source);
    }
}

/// Resolves the variable set for one employee and month.
///
/// Override windows are tested against the first day of the month; the
/// catalog guarantees at most one override per variable is effective on
/// any date, so last-match ordering is immaterial.
pub fn resolve_variables(
    employee: &Employee,
    month: PayMonth,
    catalog: &[FormulaVariable],
    overrides: &[EmployeeVariableOverride],
    custom: &BTreeMap<String, Decimal>,
) -> ResolvedVariables {
    let mut resolved = ResolvedVariables::default();

    for variable in catalog.iter().filter(|v| v.is_active) {
        resolved.set(
            &variable.name,
            variable.default_value,
            VariableSource::CatalogDefault,
        );
    }

    let reference_date = month.first_day();
    for ov in overrides {
        if ov.employee_id == employee.id && ov.is_effective_on(reference_date) {
            resolved.set(&ov.variable_name, ov.value, VariableSource::EmployeeOverride);
        }
    }

    resolved.set(
        "base_salary",
        employee.base_salary,
        VariableSource::EmployeeField,
    );
    resolved.set(
        "hra_amount",
        employee.hra_amount,
        VariableSource::EmployeeField,
    );
    resolved.set(
        "other_conv_amount",
        employee.other_conv_amount,
        VariableSource::EmployeeField,
    );
    if let Some(rate) = employee.overtime_rate_per_hour {
        resolved.set("overtime_rate_per_hour", rate, VariableSource::EmployeeField);
    }

    for (name, value) in custom {
        resolved.set(name, *value, VariableSource::Custom);
    }

    resolved
}

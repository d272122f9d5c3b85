//! In-memory store implementation.
//!
//! Rows are loaded up front through the builder methods and served from
//! immutable snapshots, which matches the engine's read-only contract.
//! Used by unit and integration tests, benchmarks, and demo wiring.

use std::collections::HashSet;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    Advance, AttendanceRecord, Employee, EmployeeVariableOverride, FormulaVariable, LeaveBalance,
    PayMonth, PayrollFormula, PayrollSettings,
};

use super::PayrollStore;

/// An in-memory [`PayrollStore`] populated through builder methods.
///
/// # Example
///
/// ```
/// use payroll_engine::store::MemoryStore;
///
/// let store = MemoryStore::new();
/// ```
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    employees: Vec<Employee>,
    attendance: Vec<AttendanceRecord>,
    balances: Vec<LeaveBalance>,
    advances: Vec<Advance>,
    variables: Vec<FormulaVariable>,
    overrides: Vec<EmployeeVariableOverride>,
    formulas: Vec<PayrollFormula>,
    settings: Vec<PayrollSettings>,
    failing_employees: HashSet<String>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an employee row.
    pub fn with_employee(mut self, employee: Employee) -> Self {
        self.employees.push(employee);
        self
    }

    /// Adds attendance rows.
    pub fn with_attendance(mut self, rows: impl IntoIterator<Item = AttendanceRecord>) -> Self {
        self.attendance.extend(rows);
        self
    }

    /// Adds a leave balance row.
    pub fn with_leave_balance(mut self, balance: LeaveBalance) -> Self {
        self.balances.push(balance);
        self
    }

    /// Adds an advance row.
    pub fn with_advance(mut self, advance: Advance) -> Self {
        self.advances.push(advance);
        self
    }

    /// Adds a variable catalog row.
    pub fn with_variable(mut self, variable: FormulaVariable) -> Self {
        self.variables.push(variable);
        self
    }

    /// Adds a variable override row.
    pub fn with_override(mut self, row: EmployeeVariableOverride) -> Self {
        self.overrides.push(row);
        self
    }

    /// Adds a formula row.
    pub fn with_formula(mut self, formula: PayrollFormula) -> Self {
        self.formulas.push(formula);
        self
    }

    /// Adds a settings history row.
    pub fn with_settings(mut self, settings: PayrollSettings) -> Self {
        self.settings.push(settings);
        self
    }

    /// Makes attendance reads fail for an employee, simulating a
    /// transient backend fault in tests.
    pub fn with_failing_employee(mut self, employee_id: impl Into<String>) -> Self {
        self.failing_employees.insert(employee_id.into());
        self
    }
}

impl PayrollStore for MemoryStore {
    async fn employee(&self, id: &str) -> EngineResult<Option<Employee>> {
        Ok(self.employees.iter().find(|e| e.id == id).cloned())
    }

    async fn roster(&self, unit: Option<&str>) -> EngineResult<Vec<Employee>> {
        let mut roster: Vec<Employee> = self
            .employees
            .iter()
            .filter(|e| e.is_active)
            .filter(|e| unit.is_none_or(|u| e.unit.as_deref() == Some(u)))
            .cloned()
            .collect();
        roster.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(roster)
    }

    async fn attendance_for_month(
        &self,
        employee_id: &str,
        month: PayMonth,
    ) -> EngineResult<Vec<AttendanceRecord>> {
        if self.failing_employees.contains(employee_id) {
            return Err(EngineError::backend(
                "attendance_for_month",
                "simulated transient failure",
            ));
        }
        Ok(self
            .attendance
            .iter()
            .filter(|r| r.employee_id == employee_id && month.contains_date(r.date))
            .cloned()
            .collect())
    }

    async fn leave_balance(
        &self,
        employee_id: &str,
        year: i32,
    ) -> EngineResult<Option<LeaveBalance>> {
        Ok(self
            .balances
            .iter()
            .find(|b| b.employee_id == employee_id && b.year == year)
            .cloned())
    }

    async fn advances_for_month(
        &self,
        employee_id: &str,
        month: PayMonth,
    ) -> EngineResult<Vec<Advance>> {
        Ok(self
            .advances
            .iter()
            .filter(|a| a.employee_id == employee_id && month.contains_date(a.date))
            .cloned()
            .collect())
    }

    async fn variable_catalog(&self) -> EngineResult<Vec<FormulaVariable>> {
        Ok(self.variables.clone())
    }

    async fn overrides_for_employee(
        &self,
        employee_id: &str,
    ) -> EngineResult<Vec<EmployeeVariableOverride>> {
        Ok(self
            .overrides
            .iter()
            .filter(|o| o.employee_id == employee_id)
            .cloned()
            .collect())
    }

    async fn formulas(&self) -> EngineResult<Vec<PayrollFormula>> {
        Ok(self.formulas.clone())
    }

    async fn settings_history(&self) -> EngineResult<Vec<PayrollSettings>> {
        Ok(self.settings.clone())
    }
}

//! The data-store seam.
//!
//! The engine treats persistence as an opaque request/response service:
//! filtered row reads from named collections, nothing more. Any store
//! with equality/range queries can implement [`PayrollStore`]; the crate
//! ships [`MemoryStore`] for tests, benchmarks, and demo wiring.

mod memory;

use std::future::Future;

use crate::error::EngineResult;
use crate::models::{
    Advance, AttendanceRecord, Employee, EmployeeVariableOverride, FormulaVariable, LeaveBalance,
    PayMonth, PayrollFormula, PayrollSettings,
};

pub use memory::MemoryStore;

/// Read-only tabular access to payroll data.
///
/// All methods are snapshot reads; the engine never writes. Methods
/// return owned rows so implementations are free to page, cache, or
/// fetch remotely. Every call the engine makes is wrapped in a bounded
/// timeout, so implementations need not enforce their own.
pub trait PayrollStore: Send + Sync {
    /// Fetches one employee by id, `None` when absent.
    fn employee(
        &self,
        id: &str,
    ) -> impl Future<Output = EngineResult<Option<Employee>>> + Send;

    /// Fetches the active-employee roster, optionally filtered by unit,
    /// ordered by employee id.
    fn roster(
        &self,
        unit: Option<&str>,
    ) -> impl Future<Output = EngineResult<Vec<Employee>>> + Send;

    /// Fetches attendance rows for an employee within a calendar month.
    fn attendance_for_month(
        &self,
        employee_id: &str,
        month: PayMonth,
    ) -> impl Future<Output = EngineResult<Vec<AttendanceRecord>>> + Send;

    /// Fetches the employee's leave balance row for a year, `None` when
    /// absent.
    fn leave_balance(
        &self,
        employee_id: &str,
        year: i32,
    ) -> impl Future<Output = EngineResult<Option<LeaveBalance>>> + Send;

    /// Fetches advance rows for an employee within a calendar month.
    fn advances_for_month(
        &self,
        employee_id: &str,
        month: PayMonth,
    ) -> impl Future<Output = EngineResult<Vec<Advance>>> + Send;

    /// Fetches the full variable catalog.
    fn variable_catalog(
        &self,
    ) -> impl Future<Output = EngineResult<Vec<FormulaVariable>>> + Send;

    /// Fetches all variable overrides for an employee.
    fn overrides_for_employee(
        &self,
        employee_id: &str,
    ) -> impl Future<Output = EngineResult<Vec<EmployeeVariableOverride>>> + Send;

    /// Fetches all payroll formulas; the engine picks the latest active
    /// row per type.
    fn formulas(&self) -> impl Future<Output = EngineResult<Vec<PayrollFormula>>> + Send;

    /// Fetches the effective-dated settings history.
    fn settings_history(
        &self,
    ) -> impl Future<Output = EngineResult<Vec<PayrollSettings>>> + Send;
}

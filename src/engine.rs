//! The payroll engine.
//!
//! [`PayrollEngine`] owns a shared store handle and the engine
//! configuration. It assembles the per-employee data snapshot (every
//! store call bounded by the configured timeout), delegates to the pure
//! calculation in [`crate::calculation`], and exposes the batch
//! orchestration in [`crate::batch`].

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::calculation::{CalculationInputs, calculate_payroll};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{CalculationResult, FormulaType, PayMonth, PayrollFormula, PayrollSettings};
use crate::store::PayrollStore;

/// A single-employee calculation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// The employee to calculate.
    pub employee_id: String,
    /// The calculation month.
    pub month: PayMonth,
    /// Optional presence override; wins over aggregated attendance.
    #[serde(default)]
    pub days_present_override: Option<u32>,
    /// Optional overtime hours, honored only when the month has no
    /// attendance rows.
    #[serde(default)]
    pub overtime_hours_override: Option<Decimal>,
    /// Caller-supplied custom variables, the final resolution layer.
    #[serde(default)]
    pub custom_variables: BTreeMap<String, Decimal>,
}

impl CalculationRequest {
    /// A request with no overrides for `employee_id` and `month`.
    pub fn new(employee_id: impl Into<String>, month: PayMonth) -> Self {
        Self {
            employee_id: employee_id.into(),
            month,
            days_present_override: None,
            overtime_hours_override: None,
            custom_variables: BTreeMap::new(),
        }
    }
}

/// The payroll computation engine over a data store.
pub struct PayrollEngine<S> {
    store: Arc<S>,
    config: EngineConfig,
}

impl<S> PayrollEngine<S> {
    /// Creates an engine over `store` with `config`.
    pub fn new(store: Arc<S>, config: EngineConfig) -> Self {
        Self { store, config }
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The shared store handle.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }
}

impl<S: PayrollStore> PayrollEngine<S> {
    /// Wraps a store call in the configured timeout; an elapsed timeout
    /// surfaces as a backend error for that operation.
    pub(crate) async fn bounded<T>(
        &self,
        operation: &str,
        call: impl Future<Output = EngineResult<T>>,
    ) -> EngineResult<T> {
        let limit = Duration::from_secs(self.config.backend_timeout_secs);
        match tokio::time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => Err(EngineError::backend(
                operation,
                format!("timed out after {}s", self.config.backend_timeout_secs),
            )),
        }
    }

    /// Calculates payroll for one employee and month.
    ///
    /// Fails with [`EngineError::EmployeeNotFound`] when the employee is
    /// missing and with [`EngineError::Backend`] when a store call fails
    /// or times out. Calculation sub-steps never fail; they degrade and
    /// record warnings on the result breakdown.
    pub async fn calculate_employee(
        &self,
        request: &CalculationRequest,
    ) -> EngineResult<CalculationResult> {
        let month = request.month;
        let employee = self
            .bounded("employee", self.store.employee(&request.employee_id))
            .await?
            .ok_or_else(|| EngineError::EmployeeNotFound {
                id: request.employee_id.clone(),
            })?;

        let attendance = self
            .bounded(
                "attendance_for_month",
                self.store.attendance_for_month(&employee.id, month),
            )
            .await?;
        let leave_balance = self
            .bounded(
                "leave_balance",
                self.store.leave_balance(&employee.id, month.year()),
            )
            .await?;
        let advances = self
            .bounded(
                "advances_for_month",
                self.store.advances_for_month(&employee.id, month),
            )
            .await?;
        let variable_catalog = self
            .bounded("variable_catalog", self.store.variable_catalog())
            .await?;
        let overrides = self
            .bounded(
                "overrides_for_employee",
                self.store.overrides_for_employee(&employee.id),
            )
            .await?;
        let formulas = self.bounded("formulas", self.store.formulas()).await?;
        let settings_rows = self
            .bounded("settings_history", self.store.settings_history())
            .await?;

        // Settings are resolved as of the last day of the month; a
        // missing row degrades to baseline rates with a warning.
        let (settings, settings_warning) =
            match PayrollSettings::as_of(&settings_rows, month.last_day()) {
                Some(row) => (row.clone(), None),
                None => (
                    PayrollSettings::baseline(),
                    Some(
                        "no payroll settings row in force; baseline rates applied".to_string(),
                    ),
                ),
            };

        let overtime_formula =
            PayrollFormula::latest_active(&formulas, FormulaType::OvertimeCalculation);

        let inputs = CalculationInputs {
            employee: &employee,
            month,
            attendance: &attendance,
            leave_balance: leave_balance.as_ref(),
            advances: &advances,
            settings: &settings,
            variable_catalog: &variable_catalog,
            overrides: &overrides,
            overtime_formula,
            days_present_override: request.days_present_override,
            overtime_hours_override: request.overtime_hours_override,
            custom_variables: &request.custom_variables,
            settings_warning,
        };

        let result = calculate_payroll(&inputs, &self.config);
        info!(
            employee_id = %result.employee_id,
            month = %result.month,
            gross_salary = %result.gross_salary,
            net_salary = %result.net_salary,
            rate_source = ?result.rate_source,
            transparency_score = result.transparency_score,
            "calculation completed"
        );
        Ok(result)
    }
}

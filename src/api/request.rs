//! Request types for the payroll engine API.
//!
//! This module defines the JSON request structures for the calculation
//! endpoints. Months arrive as `YYYY-MM` strings and are validated into
//! [`PayMonth`] before reaching the engine.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::engine::CalculationRequest;
use crate::error::EngineResult;
use crate::models::PayMonth;

/// Request body for the single-employee calculation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SingleCalculationRequest {
    /// The employee to calculate.
    pub employee_id: String,
    /// The calculation month, formatted `YYYY-MM`.
    pub month: String,
    /// Optional presence override.
    #[serde(default)]
    pub days_present: Option<u32>,
    /// Optional overtime hours, honored only when the month has no
    /// attendance rows.
    #[serde(default)]
    pub overtime_hours: Option<Decimal>,
    /// Caller-supplied custom variables.
    #[serde(default)]
    pub custom_variables: BTreeMap<String, Decimal>,
}

impl SingleCalculationRequest {
    /// Validates the month string and converts into an engine request.
    pub fn into_engine_request(self) -> EngineResult<CalculationRequest> {
        let month: PayMonth = self.month.parse()?;
        Ok(CalculationRequest {
            employee_id: self.employee_id,
            month,
            days_present_override: self.days_present,
            overtime_hours_override: self.overtime_hours,
            custom_variables: self.custom_variables,
        })
    }
}

/// Request body for the batch calculation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchCalculationRequest {
    /// The calculation month, formatted `YYYY-MM`.
    pub month: String,
    /// Explicit employee ids to calculate; when absent the full active
    /// roster is used.
    #[serde(default)]
    pub employee_ids: Option<Vec<String>>,
    /// Restricts the roster to one unit.
    #[serde(default)]
    pub unit: Option<String>,
    /// Overrides the configured batch size.
    #[serde(default)]
    pub batch_size: Option<usize>,
}

impl BatchCalculationRequest {
    /// Validates and parses the month string.
    pub fn month(&self) -> EngineResult<PayMonth> {
        self.month.parse()
    }
}

//! HTTP API module for the payroll engine.
//!
//! This module provides the REST endpoints for single-employee and batch
//! payroll calculation.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{BatchCalculationRequest, SingleCalculationRequest};
pub use response::{ApiError, BatchCalculationResponse};
pub use state::AppState;

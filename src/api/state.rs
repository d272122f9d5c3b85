//! Application state for the payroll engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::engine::PayrollEngine;

/// Shared application state.
///
/// Wraps the engine in an `Arc` so the router can be cloned per
/// connection without cloning the engine or its store.
pub struct AppState<S> {
    engine: Arc<PayrollEngine<S>>,
}

impl<S> AppState<S> {
    /// Creates a new application state around an engine.
    pub fn new(engine: PayrollEngine<S>) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }

    /// Returns a reference to the engine.
    pub fn engine(&self) -> &PayrollEngine<S> {
        &self.engine
    }
}

// Manual impl so `S` itself need not be `Clone`.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
        }
    }
}

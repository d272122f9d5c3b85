//! Engine configuration.
//!
//! Tunables for statutory deductions, calculation divisors, batch
//! orchestration, and backend timeouts. All values have defaults; a YAML
//! file can override any subset.

mod loader;
mod types;

pub use types::{BatchConfig, CalculationConfig, EngineConfig, StatutoryConfig};

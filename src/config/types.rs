//! Configuration types for the payroll engine.
//!
//! This module contains the strongly-typed engine tunables that can be
//! deserialized from a YAML configuration file. Every field has a
//! documented default so a missing file or section degrades to the
//! behavior the engine ships with.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Statutory constants applied during deduction calculation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StatutoryConfig {
    /// Upper cap on the monthly provident fund deduction.
    pub pf_cap: Decimal,
    /// Gross salary at or below which ESI applies; above it the employee
    /// is exempt.
    pub esi_gross_threshold: Decimal,
}

impl Default for StatutoryConfig {
    fn default() -> Self {
        Self {
            pf_cap: Decimal::new(1800, 0),
            esi_gross_threshold: Decimal::new(21000, 0),
        }
    }
}

/// Divisors and defaults used by pay calculations.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CalculationConfig {
    /// Divisor converting monthly base salary to a daily figure for
    /// overtime pricing.
    pub monthly_divisor: Decimal,
    /// Working hours per day for overtime pricing.
    pub hours_per_day: Decimal,
    /// Divisor converting monthly base salary to a daily figure for
    /// unpaid-leave impact. Deliberately differs from `monthly_divisor`.
    pub leave_divisor: Decimal,
    /// Overtime multiplier used when neither an employee rate nor a
    /// formula result applies.
    pub default_overtime_multiplier: Decimal,
}

impl Default for CalculationConfig {
    fn default() -> Self {
        Self {
            monthly_divisor: Decimal::new(30, 0),
            hours_per_day: Decimal::new(8, 0),
            leave_divisor: Decimal::new(26, 0),
            default_overtime_multiplier: Decimal::new(15, 1),
        }
    }
}

/// Batch orchestration tunables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Employees calculated concurrently per batch.
    pub batch_size: usize,
    /// Throttle between batches, in milliseconds.
    pub inter_batch_delay_ms: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            inter_batch_delay_ms: 100,
        }
    }
}

/// The complete engine configuration.
///
/// # Example
///
/// ```
/// use payroll_engine::config::EngineConfig;
///
/// let config = EngineConfig::default();
/// assert_eq!(config.batch.batch_size, 10);
/// assert_eq!(config.backend_timeout_secs, 30);
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Statutory deduction constants.
    pub statutory: StatutoryConfig,
    /// Calculation divisors and defaults.
    pub calculation: CalculationConfig,
    /// Batch orchestration tunables.
    pub batch: BatchConfig,
    /// Upper bound on any single data-store call, in seconds.
    ///
    /// A stalled backend call fails that employee's slot with a backend
    /// error instead of stalling the batch indefinitely.
    pub backend_timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            statutory: StatutoryConfig::default(),
            calculation: CalculationConfig::default(),
            batch: BatchConfig::default(),
            backend_timeout_secs: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_default_statutory_values() {
        let statutory = StatutoryConfig::default();
        assert_eq!(statutory.pf_cap, dec("1800"));
        assert_eq!(statutory.esi_gross_threshold, dec("21000"));
    }

    #[test]
    fn test_default_calculation_divisors_diverge() {
        let calculation = CalculationConfig::default();
        assert_eq!(calculation.monthly_divisor, dec("30"));
        assert_eq!(calculation.leave_divisor, dec("26"));
        assert_eq!(calculation.default_overtime_multiplier, dec("1.5"));
    }

    #[test]
    fn test_deserialize_partial_yaml_keeps_defaults() {
        let yaml = r#"
batch:
  batch_size: 25
"#;
        let config: EngineConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.batch.batch_size, 25);
        assert_eq!(config.batch.inter_batch_delay_ms, 100);
        assert_eq!(config.statutory.pf_cap, dec("1800"));
        assert_eq!(config.backend_timeout_secs, 30);
    }

    #[test]
    fn test_deserialize_full_yaml() {
        let yaml = r#"
statutory:
  pf_cap: "2000"
  esi_gross_threshold: "25000"
calculation:
  monthly_divisor: "30"
  hours_per_day: "8"
  leave_divisor: "26"
  default_overtime_multiplier: "2.0"
batch:
  batch_size: 5
  inter_batch_delay_ms: 250
backend_timeout_secs: 10
"#;
        let config: EngineConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.statutory.pf_cap, dec("2000"));
        assert_eq!(config.calculation.default_overtime_multiplier, dec("2.0"));
        assert_eq!(config.batch.inter_batch_delay_ms, 250);
        assert_eq!(config.backend_timeout_secs, 10);
    }

    #[test]
    fn test_empty_yaml_is_all_defaults() {
        let config: EngineConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.batch.batch_size, 10);
        assert_eq!(config.calculation.hours_per_day, dec("8"));
    }
}

//! Batch orchestration across an employee roster.
//!
//! The roster is partitioned into fixed-size batches; within a batch
//! every member is calculated concurrently, and a small fixed delay
//! between batches bounds backend load. Cancellation is cooperative: a
//! shared flag is polled at batch boundaries and at each unit's entry
//! point, so in-flight work finishes but nothing new starts. Every
//! individual failure is recorded and isolated; it never aborts the
//! batch or corrupts already-collected results.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::BatchConfig;
use crate::engine::{CalculationRequest, PayrollEngine};
use crate::error::EngineError;
use crate::models::{CalculationResult, Employee, PayMonth, RateSource};
use crate::store::PayrollStore;

/// A shared cooperative cancellation flag.
///
/// Clones share the underlying flag; setting it stops the batch loop at
/// the next boundary without aborting in-flight work.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    /// Creates an unset flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Batch orchestration options.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Employees calculated concurrently per batch.
    pub batch_size: usize,
    /// Throttle between batches.
    pub inter_batch_delay: Duration,
}

impl BatchOptions {
    /// Builds options from the engine's batch configuration.
    pub fn from_config(config: &BatchConfig) -> Self {
        Self {
            batch_size: config.batch_size.max(1),
            inter_batch_delay: Duration::from_millis(config.inter_batch_delay_ms),
        }
    }
}

/// A live progress snapshot, suitable for incremental UI updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchProgress {
    /// Roster size.
    pub total: usize,
    /// Zero-based index of the employee this snapshot concerns.
    pub current_index: usize,
    /// Name of the employee this snapshot concerns.
    pub current_employee: String,
    /// Names of employees calculated so far.
    pub completed: Vec<String>,
    /// Names of employees that failed so far.
    pub failed: Vec<String>,
}

/// Callback invoked with progress snapshots at unit start and completion.
pub type ProgressCallback = dyn Fn(&BatchProgress) + Send + Sync;

/// One employee's failure within a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchFailure {
    /// The failing employee's id.
    pub employee_id: String,
    /// The failing employee's name.
    pub employee_name: String,
    /// The error message, detailed enough to retry individually.
    pub error: String,
}

/// Aggregate statistics over a batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    /// Roster size.
    pub total_employees: usize,
    /// Successful calculations.
    pub succeeded: usize,
    /// Failed calculations.
    pub failed: usize,
    /// Successes priced by the employee-specific tier.
    pub employee_specific_count: usize,
    /// Successes priced by the formula tier.
    pub formula_based_count: usize,
    /// Successes priced by the system default tier.
    pub system_default_count: usize,
    /// Mean transparency score across successes, 2 decimal places.
    pub average_transparency_score: Decimal,
    /// True when the run stopped early on cancellation.
    pub cancelled: bool,
}

/// The outcome of a batch run.
#[derive(Debug)]
pub struct BatchOutcome {
    /// Successful calculation results, in completion order.
    pub results: Vec<CalculationResult>,
    /// Per-employee failures.
    pub failures: Vec<BatchFailure>,
    /// Aggregate statistics.
    pub summary: BatchSummary,
}

#[derive(Default)]
struct ProgressLists {
    completed: Vec<String>,
    failed: Vec<String>,
}

impl<S: PayrollStore> PayrollEngine<S> {
    /// Calculates payroll for every employee in `roster`.
    ///
    /// Per-employee errors are converted into [`BatchFailure`] entries;
    /// cancelled units are neither results nor failures. The returned
    /// outcome always contains every result collected before the run
    /// ended.
    pub async fn calculate_batch(
        &self,
        roster: &[Employee],
        month: PayMonth,
        options: &BatchOptions,
        cancellation: &CancellationFlag,
        progress: Option<&ProgressCallback>,
    ) -> BatchOutcome {
        let total = roster.len();
        let batch_size = options.batch_size.max(1);
        let lists = Mutex::new(ProgressLists::default());

        let mut results: Vec<CalculationResult> = Vec::with_capacity(total);
        let mut failures: Vec<BatchFailure> = Vec::new();
        let mut cancelled = false;

        info!(total, batch_size, month = %month, "batch calculation started");

        for (batch_index, chunk) in roster.chunks(batch_size).enumerate() {
            if cancellation.is_cancelled() {
                cancelled = true;
                info!(batch_index, "batch loop stopped on cancellation");
                break;
            }
            if batch_index > 0 && !options.inter_batch_delay.is_zero() {
                tokio::time::sleep(options.inter_batch_delay).await;
            }

            let units = chunk.iter().enumerate().map(|(offset, employee)| {
                let index = batch_index * batch_size + offset;
                let lists = &lists;
                async move {
                    if cancellation.is_cancelled() {
                        return (employee, Err(EngineError::Cancelled));
                    }
                    report_progress(progress, lists, total, index, &employee.name);

                    let outcome = self
                        .calculate_employee(&CalculationRequest::new(&employee.id, month))
                        .await;

                    {
                        let mut lists = lists.lock().unwrap_or_else(|e| e.into_inner());
                        match &outcome {
                            Ok(_) => lists.completed.push(employee.name.clone()),
                            Err(EngineError::Cancelled) => {}
                            Err(_) => lists.failed.push(employee.name.clone()),
                        }
                    }
                    report_progress(progress, lists, total, index, &employee.name);
                    (employee, outcome)
                }
            });

            for (employee, outcome) in join_all(units).await {
                match outcome {
                    Ok(result) => results.push(result),
                    Err(EngineError::Cancelled) => cancelled = true,
                    Err(error) => {
                        warn!(
                            employee_id = %employee.id,
                            error = %error,
                            "employee calculation failed"
                        );
                        failures.push(BatchFailure {
                            employee_id: employee.id.clone(),
                            employee_name: employee.name.clone(),
                            error: error.to_string(),
                        });
                    }
                }
            }
        }

        let summary = summarize(total, &results, &failures, cancelled);
        info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            cancelled = summary.cancelled,
            average_transparency_score = %summary.average_transparency_score,
            "batch calculation finished"
        );

        BatchOutcome {
            results,
            failures,
            summary,
        }
    }
}

fn report_progress(
    progress: Option<&ProgressCallback>,
    lists: &Mutex<ProgressLists>,
    total: usize,
    current_index: usize,
    current_employee: &str,
) {
    let Some(callback) = progress else {
        return;
    };
    let snapshot = {
        let lists = lists.lock().unwrap_or_else(|e| e.into_inner());
        BatchProgress {
            total,
            current_index,
            current_employee: current_employee.to_string(),
            completed: lists.completed.clone(),
            failed: lists.failed.clone(),
        }
    };
    callback(&snapshot);
}

fn summarize(
    total: usize,
    results: &[CalculationResult],
    failures: &[BatchFailure],
    cancelled: bool,
) -> BatchSummary {
    let count_source = |source: RateSource| {
        results
            .iter()
            .filter(|r| r.rate_source == source)
            .count()
    };
    let average_transparency_score = if results.is_empty() {
        Decimal::ZERO
    } else {
        let sum: u32 = results.iter().map(|r| u32::from(r.transparency_score)).sum();
        (Decimal::from(sum) / Decimal::from(results.len() as u32)).round_dp(2)
    };

    BatchSummary {
        total_employees: total,
        succeeded: results.len(),
        failed: failures.len(),
        employee_specific_count: count_source(RateSource::EmployeeSpecific),
        formula_based_count: count_source(RateSource::FormulaBased),
        system_default_count: count_source(RateSource::SystemDefault),
        average_transparency_score,
        cancelled,
    }
}

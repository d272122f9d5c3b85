//! Comprehensive integration tests for the payroll engine.
//!
//! This test suite covers the calculation pipeline end to end:
//! - Full and partial attendance pro-ration
//! - The overtime rate cascade (employee-specific, formula, default)
//! - PF capping and the ESI threshold boundary
//! - Leave reconciliation as an analytical overlay
//! - Batch execution with failure isolation and cancellation
//! - Error mapping on the HTTP surface

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::str::FromStr;
use std::sync::Arc;
use tower::ServiceExt;

use payroll_engine::api::{AppState, create_router};
use payroll_engine::batch::{BatchOptions, CancellationFlag};
use payroll_engine::config::EngineConfig;
use payroll_engine::engine::{CalculationRequest, PayrollEngine};
use payroll_engine::models::{
    AttendanceRecord, AttendanceStatus, Employee, FormulaType, LeaveBalance, PayMonth,
    PayrollFormula, PayrollSettings,
};
use payroll_engine::store::{MemoryStore, PayrollStore};

// =============================================================================
// Test Helpers
// =============================================================================

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn month() -> PayMonth {
    "2026-01".parse().unwrap()
}

fn employee(id: &str, base: &str, hra: &str, other: &str, rate: Option<&str>) -> Employee {
    Employee {
        id: id.to_string(),
        name: format!("Employee {id}"),
        base_salary: dec(base),
        hra_amount: dec(hra),
        other_conv_amount: dec(other),
        overtime_rate_per_hour: rate.map(dec),
        is_active: true,
        unit: Some("assembly".to_string()),
    }
}

fn settings_row() -> PayrollSettings {
    PayrollSettings {
        effective_from: date(2025, 4, 1),
        pf_rate: dec("12"),
        esi_rate: dec("0.75"),
        sunday_overtime_multiplier: dec("2"),
    }
}

/// January 2026 has 31 days and 26 working days; days 1..=26 cover full
/// attendance under the six-day-week approximation.
fn present_days(id: &str, days: std::ops::RangeInclusive<u32>) -> Vec<AttendanceRecord> {
    days.map(|day| AttendanceRecord {
        employee_id: id.to_string(),
        date: date(2026, 1, day),
        hours_worked: dec("8"),
        overtime_hours: Decimal::ZERO,
        status: AttendanceStatus::Present,
    })
    .collect()
}

fn leave_day(id: &str, day: u32, status: AttendanceStatus) -> AttendanceRecord {
    AttendanceRecord {
        employee_id: id.to_string(),
        date: date(2026, 1, day),
        hours_worked: Decimal::ZERO,
        overtime_hours: Decimal::ZERO,
        status,
    }
}

fn engine_over(store: MemoryStore) -> PayrollEngine<MemoryStore> {
    PayrollEngine::new(Arc::new(store), EngineConfig::default())
}

fn router_over(store: MemoryStore) -> Router {
    create_router(AppState::new(engine_over(store)))
}

async fn post_json(router: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();
    (status, json)
}

fn amount(value: &Value) -> Decimal {
    dec(value.as_str().expect("expected decimal string"))
}

// =============================================================================
// Single-employee scenarios over HTTP
// =============================================================================

#[tokio::test]
async fn test_full_attendance_with_employee_rate_end_to_end() {
    // base=26000, HRA=2000, other=500, rate=50/h, 20 overtime hours,
    // full attendance, one 1500 advance.
    let mut attendance = present_days("emp_001", 1..=26);
    attendance[4].overtime_hours = dec("20");
    let store = MemoryStore::new()
        .with_employee(employee("emp_001", "26000", "2000", "500", Some("50")))
        .with_attendance(attendance)
        .with_settings(settings_row())
        .with_advance(payroll_engine::models::Advance {
            employee_id: "emp_001".to_string(),
            date: date(2026, 1, 10),
            amount: dec("1500"),
        });

    let (status, body) = post_json(
        router_over(store),
        "/payroll/calculate",
        json!({ "employee_id": "emp_001", "month": "2026-01" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(amount(&body["gross_salary"]), dec("29500"));
    assert_eq!(body["rate_source"], "employee_specific");
    assert_eq!(amount(&body["overtime_amount"]), dec("1000"));
    assert_eq!(amount(&body["pf_amount"]), dec("1800"));
    assert_eq!(body["esi_exempt"], true);
    assert_eq!(amount(&body["esi_amount"]), dec("0"));
    assert_eq!(amount(&body["advances_amount"]), dec("1500"));
    // 29500 - 1800 - 1500
    assert_eq!(amount(&body["net_salary"]), dec("26200"));
    assert!(body["transparency_score"].as_u64().unwrap() >= 80);
}

#[tokio::test]
async fn test_formula_cascade_with_override_and_custom_variable() {
    let mut attendance = present_days("emp_002", 1..=26);
    attendance[9].overtime_hours = dec("12");
    let store = MemoryStore::new()
        .with_employee(employee("emp_002", "24000", "1800", "400", None))
        .with_attendance(attendance)
        .with_settings(settings_row())
        .with_variable(payroll_engine::models::FormulaVariable {
            name: "overtime_multiplier".to_string(),
            variable_type: payroll_engine::models::VariableType::System,
            default_value: dec("1.5"),
            is_active: true,
        })
        .with_override(payroll_engine::models::EmployeeVariableOverride {
            employee_id: "emp_002".to_string(),
            variable_name: "overtime_multiplier".to_string(),
            value: dec("2.0"),
            effective_from: date(2026, 1, 1),
            effective_to: None,
        })
        .with_formula(PayrollFormula {
            formula_type: FormulaType::OvertimeCalculation,
            expression: "overtime_multiplier".to_string(),
            is_active: true,
            effective_from: date(2025, 1, 1),
        });

    let (status, body) = post_json(
        router_over(store),
        "/payroll/calculate",
        json!({ "employee_id": "emp_002", "month": "2026-01" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rate_source"], "formula_based");
    // 12 hours × (24000/30/8 = 100) × 2.0 = 2400
    assert_eq!(amount(&body["overtime_amount"]), dec("2400.00"));
    assert_eq!(
        body["breakdown"]["formulas_used"],
        json!(["overtime_calculation"])
    );
    assert_eq!(
        amount(&body["breakdown"]["variables_used"]["overtime_multiplier"]),
        dec("2.0")
    );
}

#[tokio::test]
async fn test_esi_applies_at_exact_threshold() {
    let store = MemoryStore::new()
        .with_employee(employee("emp_003", "18000", "2500", "500", None))
        .with_attendance(present_days("emp_003", 1..=26))
        .with_settings(settings_row());

    let (status, body) = post_json(
        router_over(store),
        "/payroll/calculate",
        json!({ "employee_id": "emp_003", "month": "2026-01" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(amount(&body["gross_salary"]), dec("21000"));
    assert_eq!(body["esi_exempt"], false);
    // 21000 × 0.75% = 157.50
    assert_eq!(amount(&body["esi_amount"]), dec("157.50"));
}

#[tokio::test]
async fn test_esi_exempt_just_above_threshold() {
    let store = MemoryStore::new()
        .with_employee(employee("emp_004", "18000", "2500", "500.01", None))
        .with_attendance(present_days("emp_004", 1..=26))
        .with_settings(settings_row());

    let (status, body) = post_json(
        router_over(store),
        "/payroll/calculate",
        json!({ "employee_id": "emp_004", "month": "2026-01" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(amount(&body["gross_salary"]), dec("21000.01"));
    assert_eq!(body["esi_exempt"], true);
    assert_eq!(amount(&body["esi_amount"]), dec("0"));
}

#[tokio::test]
async fn test_partial_attendance_prorates_components() {
    let store = MemoryStore::new()
        .with_employee(employee("emp_005", "26000", "2000", "500", None))
        .with_attendance(present_days("emp_005", 1..=13))
        .with_settings(settings_row());

    let (status, body) = post_json(
        router_over(store),
        "/payroll/calculate",
        json!({ "employee_id": "emp_005", "month": "2026-01" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["days_present"], 13);
    assert_eq!(body["working_days"], 26);
    assert_eq!(amount(&body["prorated_base"]), dec("13000.00"));
    assert_eq!(amount(&body["prorated_hra"]), dec("1000.00"));
    assert_eq!(amount(&body["prorated_other"]), dec("250.00"));
    assert!(
        body["breakdown"]["base_calculation"]
            .as_str()
            .unwrap()
            .contains("prorated 13/26")
    );
}

#[tokio::test]
async fn test_zero_attendance_zeroes_pay() {
    let store = MemoryStore::new()
        .with_employee(employee("emp_006", "26000", "2000", "500", None))
        .with_settings(settings_row());

    let (status, body) = post_json(
        router_over(store),
        "/payroll/calculate",
        json!({ "employee_id": "emp_006", "month": "2026-01" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["days_present"], 0);
    assert_eq!(amount(&body["gross_salary"]), dec("0"));
    assert_eq!(amount(&body["pf_amount"]), dec("0"));
    assert_eq!(amount(&body["esi_amount"]), dec("0"));
    assert_eq!(amount(&body["net_salary"]), dec("0"));
}

#[tokio::test]
async fn test_leave_excess_reclassified_as_unpaid_overlay() {
    // 16 present days, 10 casual leave days against a balance of 8:
    // excess 2 days priced at 26000/26 each, reported but not deducted.
    let mut attendance = present_days("emp_007", 1..=16);
    for day in 17..=26 {
        attendance.push(leave_day("emp_007", day, AttendanceStatus::CasualLeave));
    }
    let store = MemoryStore::new()
        .with_employee(employee("emp_007", "26000", "2000", "500", None))
        .with_attendance(attendance)
        .with_leave_balance(LeaveBalance {
            employee_id: "emp_007".to_string(),
            year: 2026,
            casual_leave_balance: dec("8"),
            earned_leave_balance: dec("0"),
        })
        .with_settings(settings_row());

    let (status, body) = post_json(
        router_over(store),
        "/payroll/calculate",
        json!({ "employee_id": "emp_007", "month": "2026-01" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let reconciliation = &body["leave_reconciliation"];
    assert_eq!(amount(&reconciliation["total_taken"]), dec("10"));
    assert_eq!(amount(&reconciliation["excess_days"]), dec("2"));
    assert_eq!(amount(&reconciliation["effective_unpaid_days"]), dec("2"));
    assert_eq!(amount(&body["leave_impact_amount"]), dec("2000"));

    // Net pay is strictly gross minus deductions; the overlay is separate.
    let net = amount(&body["net_salary"]);
    let gross = amount(&body["gross_salary"]);
    let deductions = amount(&body["total_deductions"]);
    assert_eq!(net, gross - deductions);
}

#[tokio::test]
async fn test_missing_leave_balance_warns_without_failing() {
    let store = MemoryStore::new()
        .with_employee(employee("emp_008", "26000", "2000", "500", None))
        .with_attendance(present_days("emp_008", 1..=26))
        .with_settings(settings_row());

    let (status, body) = post_json(
        router_over(store),
        "/payroll/calculate",
        json!({ "employee_id": "emp_008", "month": "2026-01" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["leave_reconciliation"]["skipped"], true);
    assert_eq!(amount(&body["leave_impact_amount"]), dec("0"));
    let warnings = body["breakdown"]["warnings"].as_array().unwrap();
    assert!(
        warnings
            .iter()
            .any(|w| w.as_str().unwrap().contains("reconciliation skipped"))
    );
}

#[tokio::test]
async fn test_presence_override_wins_over_attendance() {
    let store = MemoryStore::new()
        .with_employee(employee("emp_009", "26000", "2000", "500", None))
        .with_attendance(present_days("emp_009", 1..=5))
        .with_settings(settings_row());

    let (status, body) = post_json(
        router_over(store),
        "/payroll/calculate",
        json!({ "employee_id": "emp_009", "month": "2026-01", "days_present": 26 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["days_present"], 26);
    assert_eq!(amount(&body["prorated_base"]), dec("26000"));
}

// =============================================================================
// Error mapping over HTTP
// =============================================================================

#[tokio::test]
async fn test_unknown_employee_maps_to_404() {
    let store = MemoryStore::new().with_settings(settings_row());
    let (status, body) = post_json(
        router_over(store),
        "/payroll/calculate",
        json!({ "employee_id": "emp_404", "month": "2026-01" }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "EMPLOYEE_NOT_FOUND");
}

#[tokio::test]
async fn test_invalid_month_maps_to_400() {
    let store = MemoryStore::new();
    let (status, body) = post_json(
        router_over(store),
        "/payroll/calculate",
        json!({ "employee_id": "emp_001", "month": "2026-13" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_backend_failure_maps_to_502() {
    let store = MemoryStore::new()
        .with_employee(employee("emp_001", "26000", "2000", "500", None))
        .with_settings(settings_row())
        .with_failing_employee("emp_001");

    let (status, body) = post_json(
        router_over(store),
        "/payroll/calculate",
        json!({ "employee_id": "emp_001", "month": "2026-01" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "BACKEND_ERROR");
}

// =============================================================================
// Batch behavior
// =============================================================================

fn batch_store(ids: &[&str]) -> MemoryStore {
    let mut store = MemoryStore::new().with_settings(settings_row());
    for id in ids {
        store = store
            .with_employee(employee(id, "20000", "1500", "400", None))
            .with_attendance(present_days(id, 1..=26));
    }
    store
}

#[tokio::test]
async fn test_batch_endpoint_isolates_failures() {
    let store = batch_store(&["emp_001", "emp_002", "emp_003"]).with_failing_employee("emp_002");

    let (status, body) = post_json(
        router_over(store),
        "/payroll/calculate/batch",
        json!({ "month": "2026-01" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"]["succeeded"], 2);
    assert_eq!(body["summary"]["failed"], 1);
    let failures = body["failures"].as_array().unwrap();
    assert_eq!(failures[0]["employee_id"], "emp_002");
    assert!(
        failures[0]["error"]
            .as_str()
            .unwrap()
            .contains("Backend error")
    );
}

#[tokio::test]
async fn test_batch_endpoint_unit_filter() {
    let mut store = batch_store(&["emp_001", "emp_002"]);
    store = store.with_employee(Employee {
        unit: Some("packing".to_string()),
        ..employee("emp_003", "20000", "1500", "400", None)
    });

    let (status, body) = post_json(
        router_over(store),
        "/payroll/calculate/batch",
        json!({ "month": "2026-01", "unit": "assembly" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"]["total_employees"], 2);
}

#[tokio::test]
async fn test_batch_cancellation_stops_after_current_batch() {
    let ids = ["emp_001", "emp_002", "emp_003", "emp_004", "emp_005", "emp_006"];
    let engine = engine_over(batch_store(&ids));
    let roster = engine.store().roster(None).await.unwrap();

    let cancellation = CancellationFlag::new();
    let flag = cancellation.clone();
    let cancel_after_first_batch = move |progress: &payroll_engine::batch::BatchProgress| {
        if progress.completed.len() + progress.failed.len() >= 2 {
            flag.cancel();
        }
    };

    let options = BatchOptions {
        batch_size: 2,
        inter_batch_delay: std::time::Duration::from_millis(1),
    };
    let outcome = engine
        .calculate_batch(
            &roster,
            month(),
            &options,
            &cancellation,
            Some(&cancel_after_first_batch),
        )
        .await;

    assert!(outcome.summary.cancelled);
    // Batch 1 completed; batch 3 never started.
    assert!(outcome.results.len() >= 2);
    assert!(outcome.results.len() <= 4);
    assert!(outcome.failures.is_empty());
}

#[tokio::test]
async fn test_batch_summary_aggregates_rate_sources() {
    let mut store = batch_store(&["emp_001", "emp_002"]);
    // Give emp_001 an employee-specific rate and both some overtime.
    store = store.with_employee(Employee {
        id: "emp_003".to_string(),
        ..employee("emp_003", "20000", "1500", "400", Some("45"))
    });
    store = store.with_attendance({
        let mut rows = present_days("emp_003", 1..=26);
        rows[3].overtime_hours = dec("5");
        rows
    });

    let engine = engine_over(store);
    let roster = engine.store().roster(None).await.unwrap();
    let outcome = engine
        .calculate_batch(
            &roster,
            month(),
            &BatchOptions {
                batch_size: 10,
                inter_batch_delay: std::time::Duration::ZERO,
            },
            &CancellationFlag::new(),
            None,
        )
        .await;

    assert_eq!(outcome.summary.succeeded, 3);
    assert_eq!(outcome.summary.employee_specific_count, 1);
    assert_eq!(outcome.summary.system_default_count, 2);
    assert!(outcome.summary.average_transparency_score > Decimal::ZERO);
}

// =============================================================================
// Engine-level behavior
// =============================================================================

#[tokio::test]
async fn test_results_are_fresh_per_calculation() {
    let engine = engine_over(
        MemoryStore::new()
            .with_employee(employee("emp_001", "26000", "2000", "500", None))
            .with_attendance(present_days("emp_001", 1..=26))
            .with_settings(settings_row()),
    );

    let request = CalculationRequest::new("emp_001", month());
    let first = engine.calculate_employee(&request).await.unwrap();
    let second = engine.calculate_employee(&request).await.unwrap();

    // Same figures, fresh identity each run.
    assert_eq!(first.gross_salary, second.gross_salary);
    assert_ne!(first.calculation_id, second.calculation_id);
}

#[tokio::test]
async fn test_settings_history_resolution_picks_month_row() {
    // Two rows; the month end falls under the April 2025 row, not the
    // future 2026-02 row.
    let engine = engine_over(
        MemoryStore::new()
            .with_employee(employee("emp_001", "10000", "0", "0", None))
            .with_attendance(present_days("emp_001", 1..=26))
            .with_settings(settings_row())
            .with_settings(PayrollSettings {
                effective_from: date(2026, 2, 1),
                pf_rate: dec("20"),
                esi_rate: dec("0.75"),
                sunday_overtime_multiplier: dec("2"),
            }),
    );

    let result = engine
        .calculate_employee(&CalculationRequest::new("emp_001", month()))
        .await
        .unwrap();

    // PF at 12%, not the 20% that only takes effect in February.
    assert_eq!(result.pf_amount, dec("1200.00"));
}

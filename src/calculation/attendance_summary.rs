//! Monthly attendance aggregation.
//!
//! Summarizes a month's attendance rows into the counts the payroll
//! calculation consumes. The aggregator reports raw counts only: it never
//! corrects inconsistent rows (PRESENT with zero hours, leave with
//! nonzero hours). Correction is left to the explicitly invoked
//! [`audit_records`] hygiene pass.

use chrono::{Datelike, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{AttendanceRecord, AttendanceStatus, PayMonth};

/// Aggregated attendance counts for one employee and month.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AttendanceSummary {
    /// Days with `hours_worked > 0`.
    pub days_worked: u32,
    /// Sum of worked hours.
    pub hours_worked: Decimal,
    /// Sum of overtime hours across all days.
    pub overtime_hours: Decimal,
    /// The portion of `overtime_hours` logged on Sundays.
    pub sunday_overtime_hours: Decimal,
    /// Days recorded as casual leave.
    pub casual_leave_days: u32,
    /// Days recorded as earned leave.
    pub earned_leave_days: u32,
    /// Days recorded as unpaid leave.
    pub unpaid_leave_days: u32,
    /// Days recorded as weekly off.
    pub weekly_off_days: u32,
    /// Number of attendance rows that fell inside the month.
    pub record_count: usize,
}

/// Summarizes attendance rows for `month`, ignoring rows outside the
/// calendar month window (inclusive on both ends).
pub fn summarize_month(records: &[AttendanceRecord], month: PayMonth) -> AttendanceSummary {
    let mut summary = AttendanceSummary::default();

    for record in records.iter().filter(|r| month.contains_date(r.date)) {
        summary.record_count += 1;

        if record.hours_worked > Decimal::ZERO {
            summary.days_worked += 1;
        }
        summary.hours_worked += record.hours_worked;
        summary.overtime_hours += record.overtime_hours;
        if record.date.weekday() == Weekday::Sun {
            summary.sunday_overtime_hours += record.overtime_hours;
        }

        match record.status {
            AttendanceStatus::CasualLeave => summary.casual_leave_days += 1,
            AttendanceStatus::EarnedLeave => summary.earned_leave_days += 1,
            AttendanceStatus::UnpaidLeave => summary.unpaid_leave_days += 1,
            AttendanceStatus::WeeklyOff => summary.weekly_off_days += 1,
            AttendanceStatus::Present => {}
        }
    }

    summary
}

/// A data-quality defect found in attendance rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum AttendanceAnomaly {
    /// PRESENT row with zero worked hours.
    PresentWithoutHours {
        /// The offending row's date.
        date: chrono::NaiveDate,
    },
    /// Leave row carrying nonzero worked hours.
    LeaveWithHours {
        /// The offending row's date.
        date: chrono::NaiveDate,
        /// The leave status recorded on the row.
        status: AttendanceStatus,
    },
    /// Negative worked or overtime hours.
    NegativeHours {
        /// The offending row's date.
        date: chrono::NaiveDate,
    },
}

/// Reports inconsistent attendance rows without touching them.
///
/// This is the explicitly invoked data-hygiene operation; the aggregator
/// and the payroll calculation tolerate these rows as-is.
pub fn audit_records(records: &[AttendanceRecord]) -> Vec<AttendanceAnomaly> {
    let mut anomalies = Vec::new();

    for record in records {
        if record.hours_worked < Decimal::ZERO || record.overtime_hours < Decimal::ZERO {
            anomalies.push(AttendanceAnomaly::NegativeHours { date: record.date });
            continue;
        }
        match record.status {
            AttendanceStatus::Present if record.hours_worked == Decimal::ZERO => {
                anomalies.push(AttendanceAnomaly::PresentWithoutHours { date: record.date });
            }
            status if status.is_leave() && record.hours_worked > Decimal::ZERO => {
                anomalies.push(AttendanceAnomaly::LeaveWithHours {
                    date: record.date,
                    status,
                });
            }
            _ => {}
        }
    }

    anomalies
}

//! Attendance record model.
//!
//! One [`AttendanceRecord`] row exists per employee per calendar day.
//! By policy PRESENT implies positive worked hours and a leave status
//! implies zero worked hours, but the engine tolerates violations of both
//! rather than crashing; a separate hygiene pass reports them.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The attendance outcome for a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// Employee attended and worked.
    Present,
    /// Scheduled weekly off day.
    WeeklyOff,
    /// Casual leave taken.
    CasualLeave,
    /// Earned leave taken.
    EarnedLeave,
    /// Unpaid leave taken.
    UnpaidLeave,
}

impl AttendanceStatus {
    /// True for the three leave statuses.
    pub fn is_leave(&self) -> bool {
        matches!(
            self,
            AttendanceStatus::CasualLeave
                | AttendanceStatus::EarnedLeave
                | AttendanceStatus::UnpaidLeave
        )
    }
}

/// A single day's attendance for an employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// The employee the record belongs to.
    pub employee_id: String,
    /// Calendar day the record tracks.
    pub date: NaiveDate,
    /// Hours worked that day.
    pub hours_worked: Decimal,
    /// Overtime hours logged that day.
    pub overtime_hours: Decimal,
    /// The day's attendance outcome.
    pub status: AttendanceStatus,
}

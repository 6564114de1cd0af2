use super::work_hours::calculate_work_hours;
use crate::components::roster::EmployeeId;
use crate::error::{validation_error, AppResult};
use crate::utils::time::{format_hhmm, parse_hhmm};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    #[default]
    Normal,
    Late,
    Absent,
    EarlyLeave,
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AttendanceStatus::Normal => t!("attendance_normal"),
            AttendanceStatus::Late => t!("attendance_late"),
            AttendanceStatus::Absent => t!("attendance_absent"),
            AttendanceStatus::EarlyLeave => t!("attendance_early_leave"),
        };
        write!(f, "{}", label)
    }
}

/// The four wall-clock fields of a day, each "HH:MM" when set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceTimes {
    #[serde(default)]
    pub clock_in: Option<String>,
    #[serde(default)]
    pub break_start: Option<String>,
    #[serde(default)]
    pub break_end: Option<String>,
    #[serde(default)]
    pub clock_out: Option<String>,
}

impl AttendanceTimes {
    /// Derived worked hours for these times
    pub fn work_hours(&self) -> f64 {
        calculate_work_hours(
            self.clock_in.as_deref(),
            self.clock_out.as_deref(),
            self.break_start.as_deref(),
            self.break_end.as_deref(),
        )
    }

    /// Reject malformed times and zero-pad the valid ones
    pub fn normalized(self) -> AppResult<Self> {
        Ok(Self {
            clock_in: normalize_field(self.clock_in)?,
            break_start: normalize_field(self.break_start)?,
            break_end: normalize_field(self.break_end)?,
            clock_out: normalize_field(self.clock_out)?,
        })
    }
}

fn normalize_field(value: Option<String>) -> AppResult<Option<String>> {
    match value {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => Ok(None),
        Some(value) => parse_hhmm(&value)
            .map(|time| Some(format_hhmm(time)))
            .ok_or_else(|| validation_error(&t!("validation_invalid_time", value = value.as_str()))),
    }
}

/// One employee's clock events and worked hours for one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "AttendanceRecordData")]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub employee_id: EmployeeId,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    times: AttendanceTimes,
    work_hours: f64,
}

impl AttendanceRecord {
    /// Empty record for a day, nothing clocked yet
    pub fn new(employee_id: EmployeeId, date: NaiveDate) -> Self {
        Self::with_times(employee_id, date, AttendanceTimes::default(), AttendanceStatus::Absent)
    }

    pub fn with_times(
        employee_id: EmployeeId,
        date: NaiveDate,
        times: AttendanceTimes,
        status: AttendanceStatus,
    ) -> Self {
        let work_hours = times.work_hours();
        Self {
            id: Uuid::new_v4(),
            employee_id,
            date,
            status,
            times,
            work_hours,
        }
    }

    pub fn times(&self) -> &AttendanceTimes {
        &self.times
    }

    pub fn clock_in(&self) -> Option<&str> {
        self.times.clock_in.as_deref()
    }

    pub fn break_start(&self) -> Option<&str> {
        self.times.break_start.as_deref()
    }

    pub fn break_end(&self) -> Option<&str> {
        self.times.break_end.as_deref()
    }

    pub fn clock_out(&self) -> Option<&str> {
        self.times.clock_out.as_deref()
    }

    /// Worked hours, always derived from the four time fields
    pub fn work_hours(&self) -> f64 {
        self.work_hours
    }

    /// Replace the times and recompute worked hours
    pub fn set_times(&mut self, times: AttendanceTimes) {
        self.work_hours = times.work_hours();
        self.times = times;
    }

    /// Apply an admin edit
    pub fn apply(&mut self, edit: AttendanceEdit) -> AppResult<()> {
        let times = edit.times.normalized()?;
        self.set_times(times);
        if let Some(status) = edit.status {
            self.status = status;
        }
        Ok(())
    }
}

/// Wire shape of a record; worked hours are recomputed on load
#[derive(Deserialize)]
struct AttendanceRecordData {
    #[serde(default = "Uuid::new_v4")]
    id: Uuid,
    employee_id: EmployeeId,
    date: NaiveDate,
    #[serde(default)]
    status: AttendanceStatus,
    #[serde(default)]
    times: AttendanceTimes,
}

impl From<AttendanceRecordData> for AttendanceRecord {
    fn from(data: AttendanceRecordData) -> Self {
        let mut record = AttendanceRecord::with_times(data.employee_id, data.date, data.times, data.status);
        record.id = data.id;
        record
    }
}

/// Admin edit of a record from the attendance calendar
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttendanceEdit {
    pub times: AttendanceTimes,
    /// Manual status override, derived status is kept when None
    pub status: Option<AttendanceStatus>,
}

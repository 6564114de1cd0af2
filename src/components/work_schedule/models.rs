use crate::components::roster::{EmployeeId, StoreId};
use crate::error::{validation_error, AppResult};
use crate::utils::time::{format_hhmm, parse_hhmm, weekday_index};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// One planned working interval for one employee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shift {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub employee_id: EmployeeId,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(default)]
    pub break_minutes: u32,
    #[serde(default)]
    pub store_id: Option<StoreId>,
}

impl Shift {
    /// Create a shift with a fresh identity
    pub fn new(
        employee_id: EmployeeId,
        start: NaiveDateTime,
        end: NaiveDateTime,
        break_minutes: u32,
        store_id: Option<StoreId>,
    ) -> AppResult<Self> {
        let shift = Self {
            id: Uuid::new_v4(),
            employee_id,
            start,
            end,
            break_minutes,
            store_id,
        };
        shift.validate()?;
        Ok(shift)
    }

    /// A shift must end after it starts
    pub fn validate(&self) -> AppResult<()> {
        if self.end <= self.start {
            return Err(validation_error(&t!("validation_shift_end_before_start")));
        }
        Ok(())
    }

    /// Calendar day the shift belongs to
    pub fn date(&self) -> NaiveDate {
        self.start.date()
    }

    /// Planned hours minus the break, one decimal
    pub fn planned_hours(&self) -> f64 {
        let minutes = (self.end - self.start).num_minutes() - self.break_minutes as i64;
        (minutes.max(0) as f64 / 6.0).round() / 10.0
    }

    /// Format the shift as "HH:MM - HH:MM"
    pub fn format(&self) -> String {
        format!(
            "{} - {}",
            format_hhmm(self.start.time()),
            format_hhmm(self.end.time())
        )
    }

    /// Apply an admin edit, all or nothing
    pub fn apply(&mut self, update: ShiftUpdate) -> AppResult<()> {
        let mut edited = self.clone();

        if let Some(start) = update.start {
            edited.start = start;
        }
        if let Some(end) = update.end {
            edited.end = end;
        }
        if let Some(break_minutes) = update.break_minutes {
            edited.break_minutes = break_minutes;
        }
        if let Some(store_id) = update.store_id {
            edited.store_id = store_id;
        }

        edited.validate()?;
        *self = edited;
        Ok(())
    }
}

/// Partial edit of a single shift
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShiftUpdate {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub break_minutes: Option<u32>,
    pub store_id: Option<Option<StoreId>>,
}

/// Weekly template used to batch-generate shifts, never stored
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecurringPattern {
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    /// Weekday indices, 0 = Sunday .. 6 = Saturday
    pub weekdays: BTreeSet<u32>,
}

impl RecurringPattern {
    pub fn new(
        start_time: NaiveTime,
        end_time: NaiveTime,
        weekdays: impl IntoIterator<Item = u32>,
    ) -> Self {
        Self {
            start_time: Some(start_time),
            end_time: Some(end_time),
            weekdays: weekdays.into_iter().collect(),
        }
    }

    /// Build a pattern from form input; blank or malformed times stay empty
    pub fn from_form(start_time: &str, end_time: &str, weekdays: impl IntoIterator<Item = u32>) -> Self {
        Self {
            start_time: parse_hhmm(start_time),
            end_time: parse_hhmm(end_time),
            weekdays: weekdays.into_iter().collect(),
        }
    }

    /// Whether the pattern applies to the weekday of `date`
    pub fn matches(&self, date: NaiveDate) -> bool {
        self.weekdays.contains(&weekday_index(date))
    }

    /// Both times, if the pattern is complete
    pub fn times(&self) -> Option<(NaiveTime, NaiveTime)> {
        Some((self.start_time?, self.end_time?))
    }
}

/// Input of the "add recurring schedule" admin form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecurringRequest {
    pub employee_id: Option<EmployeeId>,
    pub start_date: Option<NaiveDate>,
    pub patterns: Vec<RecurringPattern>,
    /// Break applied to every generated shift, config default when None
    pub break_minutes: Option<u32>,
    pub store_id: Option<StoreId>,
}

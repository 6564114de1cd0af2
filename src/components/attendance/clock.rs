use super::models::{AttendanceRecord, AttendanceStatus};
use crate::error::{validation_error, AppResult};
use crate::utils::time::{format_hhmm, minutes_of_day};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Buttons on the worker's clock screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockAction {
    ClockIn,
    BreakStart,
    BreakEnd,
    ClockOut,
}

impl fmt::Display for ClockAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ClockAction::ClockIn => "clock_in",
            ClockAction::BreakStart => "break_start",
            ClockAction::BreakEnd => "break_end",
            ClockAction::ClockOut => "clock_out",
        };
        f.write_str(name)
    }
}

/// Where the worker is in their day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockState {
    NotStarted,
    Working,
    OnBreak,
    Finished,
}

pub fn clock_state(record: &AttendanceRecord) -> ClockState {
    match (
        record.clock_in(),
        record.break_start(),
        record.break_end(),
        record.clock_out(),
    ) {
        (None, ..) => ClockState::NotStarted,
        (Some(_), _, _, Some(_)) => ClockState::Finished,
        (Some(_), Some(_), None, None) => ClockState::OnBreak,
        _ => ClockState::Working,
    }
}

/// Actions the worker may take next
pub fn available_actions(record: &AttendanceRecord) -> Vec<ClockAction> {
    match clock_state(record) {
        ClockState::NotStarted => vec![ClockAction::ClockIn],
        ClockState::Working if record.break_start().is_none() => {
            vec![ClockAction::BreakStart, ClockAction::ClockOut]
        }
        ClockState::Working => vec![ClockAction::ClockOut],
        ClockState::OnBreak => vec![ClockAction::BreakEnd],
        ClockState::Finished => Vec::new(),
    }
}

/// Record a clock action at wall-clock time `at`, recomputing hours
pub fn apply_clock(record: &mut AttendanceRecord, action: ClockAction, at: NaiveTime) -> AppResult<()> {
    let now = format_hhmm(at);
    let mut times = record.times().clone();

    match action {
        ClockAction::ClockIn => {
            if times.clock_in.is_some() {
                return Err(validation_error(&t!("clock_already_clocked_in")));
            }
            times.clock_in = Some(now);
            // A clocked-in day is never absent
            if record.status == AttendanceStatus::Absent {
                record.status = AttendanceStatus::Normal;
            }
        }
        ClockAction::BreakStart => {
            let clock_in = require_open_day(record)?;
            if times.break_start.is_some() {
                return Err(validation_error(&t!("clock_break_already_started")));
            }
            not_before(&now, clock_in)?;
            times.break_start = Some(now);
        }
        ClockAction::BreakEnd => {
            require_open_day(record)?;
            let break_start = match (record.break_start(), record.break_end()) {
                (Some(start), None) => start,
                _ => return Err(validation_error(&t!("clock_break_not_started"))),
            };
            not_before(&now, break_start)?;
            times.break_end = Some(now);
        }
        ClockAction::ClockOut => {
            let clock_in = require_open_day(record)?;
            if clock_state(record) == ClockState::OnBreak {
                return Err(validation_error(&t!("clock_break_in_progress")));
            }
            not_before(&now, clock_in)?;
            if let Some(break_end) = record.break_end() {
                not_before(&now, break_end)?;
            }
            times.clock_out = Some(now);
        }
    }

    record.set_times(times);
    Ok(())
}

/// Clock-in time of a day that has not been clocked out yet
fn require_open_day(record: &AttendanceRecord) -> AppResult<&str> {
    let clock_in = record
        .clock_in()
        .ok_or_else(|| validation_error(&t!("clock_not_clocked_in")))?;
    if record.clock_out().is_some() {
        return Err(validation_error(&t!("clock_already_clocked_out")));
    }
    Ok(clock_in)
}

fn not_before(time: &str, earlier: &str) -> AppResult<()> {
    match (minutes_of_day(time), minutes_of_day(earlier)) {
        (Some(t), Some(e)) if t >= e => Ok(()),
        _ => Err(validation_error(&t!(
            "clock_time_before",
            time = time,
            earlier = earlier
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn record() -> AttendanceRecord {
        AttendanceRecord::new(1, NaiveDate::from_ymd_opt(2025, 1, 6).unwrap())
    }

    #[test]
    fn test_full_day() {
        let mut record = record();
        assert_eq!(available_actions(&record), vec![ClockAction::ClockIn]);

        apply_clock(&mut record, ClockAction::ClockIn, time(9, 5)).unwrap();
        assert_eq!(clock_state(&record), ClockState::Working);
        assert_eq!(record.status, AttendanceStatus::Normal);

        apply_clock(&mut record, ClockAction::BreakStart, time(13, 0)).unwrap();
        assert_eq!(available_actions(&record), vec![ClockAction::BreakEnd]);

        apply_clock(&mut record, ClockAction::BreakEnd, time(14, 0)).unwrap();
        assert_eq!(available_actions(&record), vec![ClockAction::ClockOut]);

        apply_clock(&mut record, ClockAction::ClockOut, time(18, 15)).unwrap();
        assert_eq!(clock_state(&record), ClockState::Finished);
        assert!(available_actions(&record).is_empty());
        assert_eq!(record.work_hours(), 8.2);
    }

    #[test]
    fn test_double_clock_in_rejected() {
        let mut record = record();
        apply_clock(&mut record, ClockAction::ClockIn, time(9, 0)).unwrap();
        assert!(apply_clock(&mut record, ClockAction::ClockIn, time(9, 1)).is_err());
        assert_eq!(record.clock_in(), Some("09:00"));
    }

    #[test]
    fn test_actions_require_clock_in() {
        let mut record = record();
        assert!(apply_clock(&mut record, ClockAction::BreakStart, time(12, 0)).is_err());
        assert!(apply_clock(&mut record, ClockAction::BreakEnd, time(12, 0)).is_err());
        assert!(apply_clock(&mut record, ClockAction::ClockOut, time(18, 0)).is_err());
    }

    #[test]
    fn test_clock_out_during_break_rejected() {
        let mut record = record();
        apply_clock(&mut record, ClockAction::ClockIn, time(9, 0)).unwrap();
        apply_clock(&mut record, ClockAction::BreakStart, time(12, 0)).unwrap();
        assert!(apply_clock(&mut record, ClockAction::ClockOut, time(18, 0)).is_err());
        assert!(apply_clock(&mut record, ClockAction::BreakStart, time(12, 30)).is_err());
    }

    #[test]
    fn test_times_cannot_go_backwards() {
        let mut record = record();
        apply_clock(&mut record, ClockAction::ClockIn, time(9, 0)).unwrap();
        assert!(apply_clock(&mut record, ClockAction::ClockOut, time(8, 59)).is_err());
        assert!(apply_clock(&mut record, ClockAction::BreakStart, time(8, 0)).is_err());
    }

    #[test]
    fn test_nothing_after_clock_out() {
        let mut record = record();
        apply_clock(&mut record, ClockAction::ClockIn, time(14, 0)).unwrap();
        apply_clock(&mut record, ClockAction::ClockOut, time(22, 0)).unwrap();
        assert_eq!(record.work_hours(), 8.0);
        assert!(apply_clock(&mut record, ClockAction::BreakStart, time(22, 10)).is_err());
        assert!(apply_clock(&mut record, ClockAction::ClockOut, time(22, 30)).is_err());
    }
}

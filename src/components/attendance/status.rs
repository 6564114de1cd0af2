use super::models::{AttendanceRecord, AttendanceStatus};
use crate::components::work_schedule::Shift;
use crate::utils::time::minutes_of_day;
use chrono::Timelike;

/// Derive the day's status from the record and the scheduled shift.
///
/// Late wins over early-leave. Without a shift only absence can be told.
pub fn derive_status(
    record: &AttendanceRecord,
    shift: Option<&Shift>,
    late_grace_minutes: u32,
) -> AttendanceStatus {
    let Some(clock_in) = record.clock_in().and_then(minutes_of_day) else {
        return AttendanceStatus::Absent;
    };
    let Some(shift) = shift else {
        return AttendanceStatus::Normal;
    };

    let shift_start = minute_of(shift.start.time());
    if clock_in > shift_start + late_grace_minutes {
        return AttendanceStatus::Late;
    }

    // A shift running to midnight or later cannot be left early on the same day
    if shift.end.date() == shift.start.date() {
        if let Some(clock_out) = record.clock_out().and_then(minutes_of_day) {
            if clock_out < minute_of(shift.end.time()) {
                return AttendanceStatus::EarlyLeave;
            }
        }
    }

    AttendanceStatus::Normal
}

fn minute_of(time: chrono::NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::attendance::models::AttendanceTimes;
    use chrono::NaiveDate;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()
    }

    fn shift() -> Shift {
        Shift::new(
            1,
            day().and_hms_opt(9, 0, 0).unwrap(),
            day().and_hms_opt(18, 0, 0).unwrap(),
            60,
            None,
        )
        .unwrap()
    }

    fn record(clock_in: Option<&str>, clock_out: Option<&str>) -> AttendanceRecord {
        AttendanceRecord::with_times(
            1,
            day(),
            AttendanceTimes {
                clock_in: clock_in.map(str::to_string),
                clock_out: clock_out.map(str::to_string),
                ..Default::default()
            },
            AttendanceStatus::Normal,
        )
    }

    #[test]
    fn test_absent_without_clock_in() {
        assert_eq!(derive_status(&record(None, None), Some(&shift()), 5), AttendanceStatus::Absent);
        assert_eq!(derive_status(&record(None, None), None, 5), AttendanceStatus::Absent);
    }

    #[test]
    fn test_grace_period() {
        let shift = shift();
        assert_eq!(
            derive_status(&record(Some("09:05"), Some("18:00")), Some(&shift), 5),
            AttendanceStatus::Normal
        );
        assert_eq!(
            derive_status(&record(Some("09:06"), Some("18:00")), Some(&shift), 5),
            AttendanceStatus::Late
        );
        assert_eq!(
            derive_status(&record(Some("09:01"), Some("18:00")), Some(&shift), 0),
            AttendanceStatus::Late
        );
    }

    #[test]
    fn test_early_leave() {
        let shift = shift();
        assert_eq!(
            derive_status(&record(Some("08:55"), Some("17:30")), Some(&shift), 5),
            AttendanceStatus::EarlyLeave
        );
        // Still working counts as normal until clock-out
        assert_eq!(
            derive_status(&record(Some("08:55"), None), Some(&shift), 5),
            AttendanceStatus::Normal
        );
        // Late takes precedence
        assert_eq!(
            derive_status(&record(Some("10:00"), Some("17:30")), Some(&shift), 5),
            AttendanceStatus::Late
        );
    }

    #[test]
    fn test_no_shift_is_normal() {
        assert_eq!(
            derive_status(&record(Some("11:00"), Some("12:00")), None, 5),
            AttendanceStatus::Normal
        );
    }
}

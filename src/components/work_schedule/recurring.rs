use super::models::{RecurringPattern, RecurringRequest, Shift};
use crate::components::roster::{EmployeeId, StoreId};
use crate::error::{validation_error, AppResult};
use crate::utils::time::last_day_of_month;
use chrono::NaiveDate;
use tracing::debug;

/// Validate a recurring-schedule request and expand it into shifts.
///
/// Expansion covers the start date through the last day of the start
/// date's month. Nothing is written here; the caller inserts the batch.
pub fn expand_recurring(request: &RecurringRequest, default_break: u32) -> AppResult<Vec<Shift>> {
    let employee_id = request
        .employee_id
        .ok_or_else(|| validation_error(&t!("validation_employee_required")))?;
    let start_date = request
        .start_date
        .ok_or_else(|| validation_error(&t!("validation_start_date_required")))?;
    if request.patterns.is_empty() {
        return Err(validation_error(&t!("validation_patterns_required")));
    }

    Ok(expand_month(
        employee_id,
        start_date,
        &request.patterns,
        request.break_minutes.unwrap_or(default_break),
        request.store_id,
    ))
}

/// Enumerate one shift per matching (day, pattern) until month end.
///
/// Patterns with a missing time are ignored. A pattern whose end is not
/// after its start yields nothing, it is not wrapped into the next day.
pub fn expand_month(
    employee_id: EmployeeId,
    start_date: NaiveDate,
    patterns: &[RecurringPattern],
    break_minutes: u32,
    store_id: Option<StoreId>,
) -> Vec<Shift> {
    let last_day = last_day_of_month(start_date);
    let mut shifts = Vec::new();

    for date in start_date.iter_days().take_while(|date| *date <= last_day) {
        for pattern in patterns.iter().filter(|pattern| pattern.matches(date)) {
            let Some((start_time, end_time)) = pattern.times() else {
                continue;
            };

            match Shift::new(
                employee_id,
                date.and_time(start_time),
                date.and_time(end_time),
                break_minutes,
                store_id,
            ) {
                Ok(shift) => shifts.push(shift),
                Err(_) => debug!(
                    "Skipping {} for employee {}: {} is not after {}",
                    date, employee_id, end_time, start_time
                ),
            }
        }
    }

    shifts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time::weekday_index;
    use chrono::{Datelike, NaiveTime};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn request(patterns: Vec<RecurringPattern>) -> RecurringRequest {
        RecurringRequest {
            employee_id: Some(7),
            start_date: Some(date(2025, 1, 1)),
            patterns,
            break_minutes: None,
            store_id: Some(1),
        }
    }

    #[test]
    fn test_mon_wed_fri_january() {
        let pattern = RecurringPattern::new(time(9, 0), time(18, 0), [1, 3, 5]);
        let shifts = expand_recurring(&request(vec![pattern]), 60).unwrap();

        // Wed: 1, 8, 15, 22, 29. Fri: 3, 10, 17, 24, 31. Mon: 6, 13, 20, 27.
        assert_eq!(shifts.len(), 14);
        for shift in &shifts {
            assert!([1, 3, 5].contains(&weekday_index(shift.date())));
            assert_eq!(shift.start.time(), time(9, 0));
            assert_eq!(shift.end.time(), time(18, 0));
            assert_eq!(shift.date().month(), 1);
            assert_eq!(shift.employee_id, 7);
            assert_eq!(shift.break_minutes, 60);
            assert_eq!(shift.store_id, Some(1));
        }
        assert_eq!(shifts[0].date(), date(2025, 1, 1));
        assert_eq!(shifts.last().unwrap().date(), date(2025, 1, 31));
    }

    #[test]
    fn test_end_before_start_yields_nothing() {
        let pattern = RecurringPattern::new(time(18, 0), time(9, 0), 0..7);
        let shifts = expand_recurring(&request(vec![pattern]), 0).unwrap();
        assert!(shifts.is_empty());
    }

    #[test]
    fn test_empty_weekdays_and_incomplete_patterns_contribute_nothing() {
        let no_days = RecurringPattern::new(time(9, 0), time(18, 0), []);
        let no_end = RecurringPattern::from_form("09:00", "", 0..7);
        let out_of_range = RecurringPattern::new(time(9, 0), time(18, 0), [7, 9]);
        let shifts = expand_recurring(&request(vec![no_days, no_end, out_of_range]), 0).unwrap();
        assert!(shifts.is_empty());
    }

    #[test]
    fn test_stops_at_end_of_start_month() {
        // Every day from the 30th of April
        let pattern = RecurringPattern::new(time(10, 0), time(15, 0), 0..7);
        let shifts = expand_month(1, date(2025, 4, 30), &[pattern], 0, None);
        assert_eq!(shifts.len(), 1);
        assert_eq!(shifts[0].date(), date(2025, 4, 30));
    }

    #[test]
    fn test_each_pattern_emits_independently() {
        let morning = RecurringPattern::new(time(8, 0), time(12, 0), [6]);
        let evening = RecurringPattern::new(time(17, 0), time(22, 0), [6]);
        // Saturdays of February 2025: 1, 8, 15, 22
        let shifts = expand_month(2, date(2025, 2, 1), &[morning, evening], 0, None);
        assert_eq!(shifts.len(), 8);

        let mut ids: Vec<_> = shifts.iter().map(|s| s.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 8);
    }

    #[test]
    fn test_request_validation() {
        let pattern = RecurringPattern::new(time(9, 0), time(18, 0), [1]);

        let mut missing_employee = request(vec![pattern.clone()]);
        missing_employee.employee_id = None;
        assert!(expand_recurring(&missing_employee, 0).is_err());

        let mut missing_date = request(vec![pattern]);
        missing_date.start_date = None;
        assert!(expand_recurring(&missing_date, 0).is_err());

        assert!(expand_recurring(&request(Vec::new()), 0).is_err());
    }

    #[test]
    fn test_request_break_overrides_default() {
        let pattern = RecurringPattern::new(time(9, 0), time(18, 0), [1]);
        let mut req = request(vec![pattern]);
        req.break_minutes = Some(30);
        let shifts = expand_recurring(&req, 60).unwrap();
        assert!(shifts.iter().all(|s| s.break_minutes == 30));
    }
}

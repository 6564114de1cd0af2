use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;

/// Parse time string in HH:MM format
pub fn parse_time(time_str: &str) -> Option<(u32, u32)> {
    let parts: Vec<&str> = time_str.trim().split(':').collect();
    if parts.len() != 2 || !parts.iter().all(|p| is_digits(p)) {
        return None;
    }
    let hour = parts[0].parse::<u32>().ok()?;
    let minute = parts[1].parse::<u32>().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    Some((hour, minute))
}

fn is_digits(part: &str) -> bool {
    !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit())
}

/// Parse an HH:MM string into a NaiveTime
pub fn parse_hhmm(time_str: &str) -> Option<NaiveTime> {
    let (hour, minute) = parse_time(time_str)?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Minutes since midnight for an HH:MM string
pub fn minutes_of_day(time_str: &str) -> Option<u32> {
    parse_time(time_str).map(|(hour, minute)| hour * 60 + minute)
}

/// Format a time of day as HH:MM
pub fn format_hhmm(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Weekday index with 0 = Sunday .. 6 = Saturday
pub fn weekday_index(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_sunday()
}

/// Last calendar day of the month containing `date`
pub fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };

    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .unwrap_or(date)
}

/// First and last day of a month, None for an invalid month
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    Some((first, last_day_of_month(first)))
}

/// Date range for the week containing `date` (Sunday to Saturday)
pub fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    // Calculate Sunday of the current week
    let sunday = date
        .checked_sub_signed(Duration::days(weekday_index(date) as i64))
        .unwrap_or(date);

    // Saturday is Sunday + 6 days
    let saturday = sunday
        .checked_add_signed(Duration::days(6))
        .unwrap_or(sunday);

    (sunday, saturday)
}

/// Current wall-clock time in the given timezone
pub fn now_local(tz: &Tz) -> NaiveDateTime {
    local_from_utc(Utc::now(), tz)
}

/// Convert a UTC instant to wall-clock time in the given timezone
pub fn local_from_utc(instant: DateTime<Utc>, tz: &Tz) -> NaiveDateTime {
    instant.with_timezone(tz).naive_local()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_time() {
        // Valid cases
        assert_eq!(parse_time("00:00"), Some((0, 0)));
        assert_eq!(parse_time("12:30"), Some((12, 30)));
        assert_eq!(parse_time("23:59"), Some((23, 59)));
        assert_eq!(parse_time(" 9:05 "), Some((9, 5)));

        // Invalid cases
        assert_eq!(parse_time("24:00"), None); // Hour out of range
        assert_eq!(parse_time("12:60"), None); // Minute out of range
        assert_eq!(parse_time("12:30:45"), None); // Too many parts
        assert_eq!(parse_time("12"), None); // Too few parts
        assert_eq!(parse_time("12:ab"), None); // Invalid minute
        assert_eq!(parse_time(""), None);
        assert_eq!(parse_time("+9:00"), None); // Sign
        assert_eq!(parse_time("09:+5"), None);
        assert_eq!(parse_time("9 :00"), None);
    }

    #[test]
    fn test_minutes_and_format() {
        assert_eq!(minutes_of_day("18:15"), Some(18 * 60 + 15));
        let time = parse_hhmm("7:5").unwrap();
        assert_eq!(format_hhmm(time), "07:05");
    }

    #[test]
    fn test_weekday_index_starts_on_sunday() {
        // 2025-01-05 is a Sunday, 2025-01-01 a Wednesday
        assert_eq!(weekday_index(date(2025, 1, 5)), 0);
        assert_eq!(weekday_index(date(2025, 1, 1)), 3);
        assert_eq!(weekday_index(date(2025, 1, 4)), 6);
    }

    #[test]
    fn test_last_day_of_month() {
        assert_eq!(last_day_of_month(date(2025, 1, 15)), date(2025, 1, 31));
        assert_eq!(last_day_of_month(date(2024, 2, 1)), date(2024, 2, 29));
        assert_eq!(last_day_of_month(date(2025, 2, 28)), date(2025, 2, 28));
        assert_eq!(last_day_of_month(date(2025, 12, 3)), date(2025, 12, 31));
    }

    #[test]
    fn test_month_bounds() {
        assert_eq!(
            month_bounds(2025, 4),
            Some((date(2025, 4, 1), date(2025, 4, 30)))
        );
        assert_eq!(month_bounds(2025, 13), None);
    }

    #[test]
    fn test_week_bounds() {
        // Wednesday 2025-01-01 belongs to the week of Sunday 2024-12-29
        assert_eq!(
            week_bounds(date(2025, 1, 1)),
            (date(2024, 12, 29), date(2025, 1, 4))
        );
        // Sunday is its own week start
        assert_eq!(
            week_bounds(date(2025, 1, 5)),
            (date(2025, 1, 5), date(2025, 1, 11))
        );
        // Saturday is the week end
        assert_eq!(
            week_bounds(date(2025, 1, 11)),
            (date(2025, 1, 5), date(2025, 1, 11))
        );
    }

    #[test]
    fn test_local_from_utc() {
        let instant = Utc.with_ymd_and_hms(2025, 1, 1, 0, 30, 0).unwrap();
        let local = local_from_utc(instant, &chrono_tz::Asia::Seoul);
        assert_eq!(local.format("%Y-%m-%d %H:%M").to_string(), "2025-01-01 09:30");
    }
}

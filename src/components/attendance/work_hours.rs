use crate::utils::time::minutes_of_day;

/// Worked hours for one day, break-adjusted, one decimal.
///
/// Missing clock-in or clock-out means nothing was worked. The break is
/// subtracted only when both ends are present and it ends after it
/// starts. Blank strings count as missing; any other value that is not
/// HH:MM makes the whole result 0.
pub fn calculate_work_hours(
    clock_in: Option<&str>,
    clock_out: Option<&str>,
    break_start: Option<&str>,
    break_end: Option<&str>,
) -> f64 {
    worked_minutes(clock_in, clock_out, break_start, break_end)
        .map(round_hours)
        .unwrap_or(0.0)
}

fn worked_minutes(
    clock_in: Option<&str>,
    clock_out: Option<&str>,
    break_start: Option<&str>,
    break_end: Option<&str>,
) -> Option<i64> {
    let clock_in = present(clock_in)?;
    let clock_out = present(clock_out)?;

    let start = minutes_of_day(clock_in)? as i64;
    let end = minutes_of_day(clock_out)? as i64;
    let mut minutes = end - start;

    match (present(break_start), present(break_end)) {
        (Some(break_start), Some(break_end)) => {
            let break_start = minutes_of_day(break_start)? as i64;
            let break_end = minutes_of_day(break_end)? as i64;
            if break_end > break_start {
                minutes -= break_end - break_start;
            }
        }
        (Some(other), None) | (None, Some(other)) => {
            // A half-entered break is ignored, but must still parse
            minutes_of_day(other)?;
        }
        (None, None) => {}
    }

    Some(minutes.max(0))
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn round_hours(minutes: i64) -> f64 {
    (minutes as f64 / 6.0).round() / 10.0
}

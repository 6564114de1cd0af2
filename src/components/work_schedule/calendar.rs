use crate::error::{validation_error, AppResult};
use crate::utils::i18n::weekday_short;
use crate::utils::time::{month_bounds, weekday_index};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

/// Sunday-first month grid for the attendance and schedule calendars
#[derive(Debug, Clone, PartialEq)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub first_day: NaiveDate,
    pub last_day: NaiveDate,
    /// Seven cells per week, None outside the month
    pub weeks: Vec<[Option<NaiveDate>; 7]>,
}

impl MonthGrid {
    pub fn new(year: i32, month: u32) -> AppResult<Self> {
        let (first_day, last_day) = month_bounds(year, month)
            .ok_or_else(|| validation_error(&t!("validation_invalid_month")))?;

        let mut weeks = Vec::new();
        let mut week: [Option<NaiveDate>; 7] = [None; 7];

        for date in first_day.iter_days().take_while(|date| *date <= last_day) {
            let column = weekday_index(date) as usize;
            week[column] = Some(date);
            if column == 6 {
                weeks.push(week);
                week = [None; 7];
            }
        }
        if week.iter().any(Option::is_some) {
            weeks.push(week);
        }

        Ok(Self {
            year,
            month,
            first_day,
            last_day,
            weeks,
        })
    }

    /// Grid for the month containing `date`
    pub fn containing(date: NaiveDate) -> AppResult<Self> {
        Self::new(date.year(), date.month())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.first_day && date <= self.last_day
    }

    /// Every day of the month in order
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.weeks.iter().flatten().flatten().copied()
    }

    /// Plain-text calendar with a label under each day number
    pub fn render<F>(&self, label: F) -> String
    where
        F: Fn(NaiveDate) -> String,
    {
        let mut out = format!("{:04}-{:02}\n", self.year, self.month);

        let header: Vec<String> = (0..7).map(|i| format!("{:<6}", weekday_short(i))).collect();
        out.push_str(header.join("").trim_end());
        out.push('\n');

        for week in &self.weeks {
            let days: Vec<String> = week
                .iter()
                .map(|cell| match cell {
                    Some(date) => format!("{:<6}", date.day()),
                    None => " ".repeat(6),
                })
                .collect();
            out.push_str(days.join("").trim_end());
            out.push('\n');

            let labels: Vec<String> = week
                .iter()
                .map(|cell| match cell {
                    Some(date) => format!("{:<6}", label(*date)),
                    None => " ".repeat(6),
                })
                .collect();
            let labels = labels.join("");
            if !labels.trim().is_empty() {
                out.push_str(labels.trim_end());
                out.push('\n');
            }
        }

        out
    }
}

/// Group items by calendar day, keeping input order within a day
pub fn group_by_day<T, F>(items: &[T], day_of: F) -> BTreeMap<NaiveDate, Vec<&T>>
where
    F: Fn(&T) -> NaiveDate,
{
    let mut grouped: BTreeMap<NaiveDate, Vec<&T>> = BTreeMap::new();
    for item in items {
        grouped.entry(day_of(item)).or_default().push(item);
    }
    grouped
}

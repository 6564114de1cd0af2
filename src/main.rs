#[macro_use]
extern crate rust_i18n;

use chrono::Utc;
use dot_attendance::components::attendance::ClockAction;
use dot_attendance::components::repository::AttendanceRepository;
use dot_attendance::components::work_schedule::{group_by_day, MonthGrid, Shift};
use dot_attendance::startup;
use dot_attendance::utils::i18n::weekday_short;
use dot_attendance::utils::time::{now_local, weekday_index};
use tracing::info;

// Initialize i18n
i18n!("locales", fallback = "en");

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting dot-attendance");

    // Load configuration
    let config = startup::load_config()?;
    let tz = config.tz()?;
    let service = startup::build_service(config).await?;

    let today = now_local(&tz).date();
    let grid = MonthGrid::containing(today)?;

    // Schedule calendar with a headcount under each day
    let shifts = service.shifts_for_month(None, grid.year, grid.month).await?;
    let by_day = group_by_day(&shifts, Shift::date);
    println!("{}", t!("report_schedule_title"));
    println!(
        "{}",
        grid.render(|date| by_day
            .get(&date)
            .map(|day| t!("report_headcount", count = day.len()).to_string())
            .unwrap_or_default())
    );

    println!("{}", t!("report_summary_title"));
    let repo = service.repository();
    for employee in repo.list_employees().await? {
        let summary = service
            .monthly_summary(employee.id, grid.year, grid.month)
            .await?;
        println!(
            "{}",
            t!(
                "report_summary_line",
                name = employee.name.as_str(),
                status = employee.status.to_string(),
                days = summary.days_worked,
                hours = format!("{:.1}", summary.total_hours),
                late = summary.late_count,
                absent = summary.absent_count,
                early = summary.early_leave_count,
                pay = summary.estimated_pay
            )
        );
    }

    let requests = repo.list_requests().await?;
    println!();
    println!("{}", t!("report_pending_requests", count = requests.len()));
    for request in &requests {
        println!("  {} {}", request.name, request.phone.as_deref().unwrap_or("-"));
    }

    // Worker view for the first employee with a store
    if let Some(employee) = repo
        .list_employees()
        .await?
        .into_iter()
        .find(|e| e.store_id.is_some() && e.status.can_be_scheduled())
    {
        let week = service.weekly_schedule(employee.id, today).await?;
        println!();
        println!("{}", t!("report_week_title", name = employee.name.as_str()));
        for shift in &week {
            println!(
                "  {} ({}) {}",
                shift.date(),
                weekday_short(weekday_index(shift.date())),
                shift.format()
            );
        }

        if let Some(store_id) = employee.store_id {
            let code = service.issue_check_in_code(store_id, Utc::now()).await?;
            let screen = service.clock_screen(employee.id, today).await?;
            println!(
                "{}",
                t!(
                    "report_check_in_code",
                    code = code.encode()?,
                    seconds = code.seconds_remaining(Utc::now())
                )
            );
            if screen.actions.contains(&ClockAction::ClockIn) {
                match service
                    .clock_in_with_code(employee.id, &code.encode()?, Utc::now())
                    .await
                {
                    Ok(record) => println!(
                        "{}",
                        t!(
                            "report_clocked_in",
                            name = employee.name.as_str(),
                            time = record.clock_in().unwrap_or("-"),
                            status = record.status.to_string()
                        )
                    ),
                    // Shown to the worker, not fatal
                    Err(e) if e.is_user_facing() => println!("{}", e),
                    Err(e) => return Err(e.into()),
                }
            }
        }
    }

    Ok(())
}

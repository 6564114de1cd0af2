use chrono::NaiveDate;
use dot_attendance::components::attendance::AttendanceStatus;
use dot_attendance::components::repository::{AttendanceRepository, RecordFilter};
use dot_attendance::config::Config;
use dot_attendance::seed::SeedData;
use dot_attendance::startup;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Smoke test to verify that the default config is usable
#[tokio::test]
async fn test_config_loads() {
    let config = Config::default();

    assert!(config.validate().is_ok());
    assert_eq!(config.timezone, "Asia/Seoul");
    assert!(config.seed_file.is_none());
}

/// The shipped settings file parses and matches the defaults
#[test]
fn test_settings_file_parses() {
    let config = Config::from_file(Path::new("config/attendance.toml"))
        .unwrap()
        .unwrap();
    assert_eq!(config.late_grace_minutes, 5);
    assert_eq!(config.checkin_ttl_seconds, 30);
    assert!(config.validate().is_ok());
}

/// Without a seed file the service starts on the demo roster
#[tokio::test]
async fn test_demo_service_starts() {
    let service = startup::build_service(Arc::new(Config::default()))
        .await
        .unwrap();
    let repo = service.repository();

    assert_eq!(repo.list_stores().await.unwrap().len(), 2);
    assert_eq!(repo.list_employees().await.unwrap().len(), 4);
    assert_eq!(repo.list_requests().await.unwrap().len(), 1);
    assert!(!repo
        .list_shifts(&RecordFilter::default())
        .await
        .unwrap()
        .is_empty());
}

/// The fixture file seeds the expected roster and totals
#[tokio::test]
async fn test_fixture_file_seeds_service() {
    let config = Config {
        seed_file: Some(PathBuf::from("config/seed.toml")),
        ..Default::default()
    };
    let service = startup::build_service(Arc::new(config)).await.unwrap();

    let part_timer = service.monthly_summary(1, 2025, 1).await.unwrap();
    assert_eq!(part_timer.days_worked, 2);
    assert_eq!(part_timer.total_hours, 11.4);
    assert_eq!(part_timer.late_count, 1);
    assert_eq!(part_timer.estimated_pay, 114_342);

    let regular = service.monthly_summary(2, 2025, 1).await.unwrap();
    assert_eq!(regular.total_hours, 7.5);
    assert_eq!(regular.early_leave_count, 1);
    assert_eq!(regular.estimated_pay, 2_500_000);
}

#[test]
fn test_missing_fixture_file_is_an_error() {
    assert!(SeedData::load(Path::new("config/does-not-exist.toml")).is_err());
}

#[tokio::test]
async fn test_fixture_time_is_normalized() {
    let seed = SeedData::load(Path::new("config/seed.toml")).unwrap();
    let repo = dot_attendance::components::InMemoryRepository::new();
    seed.apply(&repo, 5, chrono::Utc::now()).await.unwrap();

    let date = NaiveDate::from_ymd_opt(2025, 1, 8).unwrap();
    let records = repo
        .list_attendance(&RecordFilter::employee(1).between(date, date))
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].clock_in(), Some("09:14"));
    assert_eq!(records[0].status, AttendanceStatus::Late);
}

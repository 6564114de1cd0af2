use crate::components::attendance::{derive_status, AttendanceRecord, AttendanceStatus, AttendanceTimes};
use crate::components::repository::AttendanceRepository;
use crate::components::roster::models::DEFAULT_COLORS;
use crate::components::roster::{
    Employee, EmployeeId, EmploymentStatus, EmploymentType, PayType, Store, StoreId, WorkerRequest,
};
use crate::components::work_schedule::{expand_month, RecurringPattern, Shift};
use crate::error::{validation_error, AppResult};
use crate::utils::time::format_hhmm;
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Fixture data injected into a repository at startup
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub stores: Vec<Store>,
    #[serde(default)]
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub requests: Vec<RequestSeed>,
    #[serde(default)]
    pub shifts: Vec<Shift>,
    #[serde(default)]
    pub attendance: Vec<AttendanceSeed>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestSeed {
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub store_id: Option<StoreId>,
}

/// Flat attendance row as written in fixture files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceSeed {
    pub employee_id: EmployeeId,
    pub date: NaiveDate,
    #[serde(default)]
    pub clock_in: Option<String>,
    #[serde(default)]
    pub break_start: Option<String>,
    #[serde(default)]
    pub break_end: Option<String>,
    #[serde(default)]
    pub clock_out: Option<String>,
    /// Derived from the day's shift when omitted
    #[serde(default)]
    pub status: Option<AttendanceStatus>,
}

/// What a seed run inserted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub stores: usize,
    pub employees: usize,
    pub requests: usize,
    pub shifts: usize,
    pub attendance: usize,
}

impl SeedData {
    /// Read a TOML fixture file
    pub fn load(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path)?;
        let seed: SeedData = toml::from_str(&content)?;
        info!("Loaded seed data from {}", path.display());
        Ok(seed)
    }

    /// Validate everything, then write it to the repository
    pub async fn apply(
        self,
        repo: &dyn AttendanceRepository,
        late_grace_minutes: u32,
        now: DateTime<Utc>,
    ) -> AppResult<SeedReport> {
        for employee in &self.employees {
            employee.validate()?;
            self.require_store(employee.store_id)?;
        }
        for shift in &self.shifts {
            shift.validate()?;
            self.require_employee(shift.employee_id)?;
            self.require_store(shift.store_id)?;
        }
        for row in &self.requests {
            self.require_store(row.store_id)?;
        }
        for row in &self.attendance {
            self.require_employee(row.employee_id)?;
        }

        let mut records = Vec::with_capacity(self.attendance.len());
        for row in &self.attendance {
            let times = AttendanceTimes {
                clock_in: row.clock_in.clone(),
                break_start: row.break_start.clone(),
                break_end: row.break_end.clone(),
                clock_out: row.clock_out.clone(),
            }
            .normalized()?;
            let mut record =
                AttendanceRecord::with_times(row.employee_id, row.date, times, AttendanceStatus::Normal);
            record.status = match row.status {
                Some(status) => status,
                None => {
                    let shift = self
                        .shifts
                        .iter()
                        .find(|s| s.employee_id == row.employee_id && s.date() == row.date);
                    derive_status(&record, shift, late_grace_minutes)
                }
            };
            records.push(record);
        }

        let mut requests = Vec::with_capacity(self.requests.len());
        for row in &self.requests {
            requests.push(WorkerRequest::new(&row.name, row.phone.clone(), row.store_id, now)?);
        }

        let report = SeedReport {
            stores: self.stores.len(),
            employees: self.employees.len(),
            requests: requests.len(),
            shifts: self.shifts.len(),
            attendance: records.len(),
        };

        for store in self.stores {
            repo.upsert_store(store).await?;
        }
        for employee in self.employees {
            repo.upsert_employee(employee).await?;
        }
        for request in requests {
            repo.insert_request(request).await?;
        }
        repo.insert_shifts(self.shifts).await?;
        for record in records {
            repo.upsert_attendance(record).await?;
        }

        info!(
            "Seeded {} stores, {} employees, {} requests, {} shifts, {} attendance records",
            report.stores, report.employees, report.requests, report.shifts, report.attendance
        );
        Ok(report)
    }

    fn require_employee(&self, id: EmployeeId) -> AppResult<()> {
        if self.employees.iter().any(|e| e.id == id) {
            return Ok(());
        }
        Err(validation_error(&t!(
            "validation_employee_not_found",
            id = id.to_string()
        )))
    }

    fn require_store(&self, id: Option<StoreId>) -> AppResult<()> {
        match id {
            Some(id) if !self.stores.iter().any(|s| s.id == id) => Err(validation_error(&t!(
                "validation_store_not_found",
                id = id.to_string()
            ))),
            _ => Ok(()),
        }
    }

    /// Built-in demo roster for the month containing `today`
    pub fn demo(today: NaiveDate) -> Self {
        let stores = vec![
            Store {
                id: 1,
                name: "강남점".to_string(),
                address: Some("서울 강남구 테헤란로 123".to_string()),
            },
            Store {
                id: 2,
                name: "홍대점".to_string(),
                address: Some("서울 마포구 와우산로 45".to_string()),
            },
        ];

        let employees = vec![
            demo_employee(1, "김민지", EmploymentStatus::Active, EmploymentType::PartTime, PayType::Hourly, 10_030, Some(1)),
            demo_employee(2, "이준호", EmploymentStatus::Active, EmploymentType::Regular, PayType::Monthly, 2_600_000, Some(1)),
            demo_employee(3, "박서연", EmploymentStatus::Leave, EmploymentType::PartTime, PayType::Hourly, 10_500, Some(2)),
            demo_employee(4, "최동현", EmploymentStatus::Resigned, EmploymentType::PartTime, PayType::Hourly, 10_030, Some(2)),
        ];

        let first_of_month = today.with_day(1).unwrap_or(today);
        let mut shifts = expand_month(
            1,
            first_of_month,
            &[RecurringPattern::new(hm(9, 0), hm(15, 0), [1, 3, 5])],
            30,
            Some(1),
        );
        shifts.extend(expand_month(
            2,
            first_of_month,
            &[RecurringPattern::new(hm(10, 0), hm(19, 0), [1, 2, 3, 4, 5])],
            60,
            Some(1),
        ));

        let attendance = shifts
            .iter()
            .filter(|shift| shift.date() < today)
            .map(demo_attendance)
            .collect();

        Self {
            stores,
            employees,
            requests: vec![RequestSeed {
                name: "정다은".to_string(),
                phone: Some("010-2345-6789".to_string()),
                store_id: Some(2),
            }],
            shifts,
            attendance,
        }
    }
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default()
}

fn demo_employee(
    id: EmployeeId,
    name: &str,
    status: EmploymentStatus,
    employment_type: EmploymentType,
    pay_type: PayType,
    pay_rate: u64,
    store_id: Option<StoreId>,
) -> Employee {
    Employee {
        id,
        name: name.to_string(),
        status,
        employment_type,
        pay_type,
        pay_rate,
        color: DEFAULT_COLORS[(id as usize) % DEFAULT_COLORS.len()].to_string(),
        store_id,
        phone: None,
    }
}

/// A plausible record for a past shift; every eleventh day is missed
fn demo_attendance(shift: &Shift) -> AttendanceSeed {
    let day = shift.date().day();
    if day % 11 == 0 {
        debug!("Demo data leaves {} absent for employee {}", shift.date(), shift.employee_id);
        return AttendanceSeed {
            employee_id: shift.employee_id,
            date: shift.date(),
            clock_in: None,
            break_start: None,
            break_end: None,
            clock_out: None,
            status: None,
        };
    }

    let offset = if day % 7 == 3 { 12 } else { -5 };
    let clock_in = shift.start.time() + Duration::minutes(offset);
    let clock_out = shift.end.time() + Duration::minutes(if day % 5 == 0 { -20 } else { 3 });
    let (break_start, break_end) = if shift.break_minutes > 0 {
        let start = shift.start.time() + Duration::hours(3);
        let end = start + Duration::minutes(shift.break_minutes as i64);
        (Some(format_hhmm(start)), Some(format_hhmm(end)))
    } else {
        (None, None)
    };

    AttendanceSeed {
        employee_id: shift.employee_id,
        date: shift.date(),
        clock_in: Some(format_hhmm(clock_in)),
        break_start,
        break_end,
        clock_out: Some(format_hhmm(clock_out)),
        status: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::repository::{InMemoryRepository, RecordFilter};

    #[tokio::test]
    async fn test_demo_seed_applies() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 20).unwrap();
        let repo = InMemoryRepository::new();
        let report = SeedData::demo(today).apply(&repo, 5, Utc::now()).await.unwrap();

        assert_eq!(report.stores, 2);
        assert_eq!(report.employees, 4);
        assert_eq!(report.requests, 1);
        // Employee 1: 14 Mon/Wed/Fri shifts, employee 2: 23 weekdays in January 2025
        assert_eq!(report.shifts, 14 + 23);
        assert!(report.attendance > 0);

        let records = repo.list_attendance(&RecordFilter::default()).await.unwrap();
        assert!(records.iter().all(|r| r.date < today));
        // The 6th (Monday) has day % 11 != 0 and day % 7 != 3
        let sixth = records
            .iter()
            .find(|r| r.employee_id == 1 && r.date.day() == 6)
            .unwrap();
        assert_eq!(sixth.clock_in(), Some("08:55"));
        assert_eq!(sixth.status, AttendanceStatus::Normal);
    }

    #[tokio::test]
    async fn test_toml_fixture() {
        let toml = r##"
            [[stores]]
            id = 1
            name = "본점"

            [[employees]]
            id = 10
            name = "한지우"
            status = "active"
            employment_type = "part_time"
            pay_type = "hourly"
            pay_rate = 11000
            color = "#059669"
            store_id = 1

            [[shifts]]
            employee_id = 10
            start = "2025-01-06T09:00:00"
            end = "2025-01-06T18:00:00"
            break_minutes = 60

            [[attendance]]
            employee_id = 10
            date = "2025-01-06"
            clock_in = "9:20"
            clock_out = "18:00"
        "##;
        let seed: SeedData = toml::from_str(toml).unwrap();
        let repo = InMemoryRepository::new();
        seed.apply(&repo, 5, Utc::now()).await.unwrap();

        let records = repo.list_attendance(&RecordFilter::employee(10)).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].clock_in(), Some("09:20"));
        assert_eq!(records[0].status, AttendanceStatus::Late);
        assert_eq!(records[0].work_hours(), 8.7);
    }

    #[tokio::test]
    async fn test_orphan_rows_rejected() {
        let base = r##"
            [[stores]]
            id = 1
            name = "본점"

            [[employees]]
            id = 10
            name = "한지우"
            status = "active"
            employment_type = "part_time"
            pay_type = "hourly"
            pay_rate = 11000
            color = "#059669"
            store_id = 1
        "##;
        let orphans = [
            r#"
            [[attendance]]
            employee_id = 99
            date = "2025-01-06"
            clock_in = "09:00"
            "#,
            r#"
            [[shifts]]
            employee_id = 10
            start = "2025-01-06T09:00:00"
            end = "2025-01-06T18:00:00"
            store_id = 7
            "#,
            r#"
            [[requests]]
            name = "장하늘"
            store_id = 7
            "#,
        ];

        for orphan in orphans {
            let seed: SeedData = toml::from_str(&format!("{}{}", base, orphan)).unwrap();
            let repo = InMemoryRepository::new();
            assert!(seed.apply(&repo, 5, Utc::now()).await.is_err());
            assert!(repo.list_employees().await.unwrap().is_empty());
        }

        let seed: SeedData = toml::from_str(base).unwrap();
        let repo = InMemoryRepository::new();
        assert!(seed.apply(&repo, 5, Utc::now()).await.is_ok());
    }

    #[tokio::test]
    async fn test_shift_for_unknown_employee_rejected() {
        let seed: SeedData = toml::from_str(
            r#"
            [[shifts]]
            employee_id = 99
            start = "2025-01-06T09:00:00"
            end = "2025-01-06T18:00:00"
        "#,
        )
        .unwrap();
        let repo = InMemoryRepository::new();
        assert!(seed.apply(&repo, 5, Utc::now()).await.is_err());
        assert!(repo.list_shifts(&RecordFilter::default()).await.unwrap().is_empty());
    }
}

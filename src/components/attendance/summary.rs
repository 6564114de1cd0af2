use super::models::{AttendanceRecord, AttendanceStatus};
use crate::components::roster::{Employee, EmployeeId, PayType};
use crate::components::work_schedule::{group_by_day, MonthGrid};
use crate::error::{validation_error, AppResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Month totals for one employee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub employee_id: EmployeeId,
    pub year: i32,
    pub month: u32,
    /// Days with at least one clock-in
    pub days_worked: u32,
    pub total_hours: f64,
    pub normal_count: u32,
    pub late_count: u32,
    pub absent_count: u32,
    pub early_leave_count: u32,
    /// Days with more than one record, kept but flagged
    pub duplicate_days: Vec<NaiveDate>,
    /// Won, before tax and deductions
    pub estimated_pay: u64,
}

impl MonthlySummary {
    /// Summarise the employee's records that fall inside the month
    pub fn build(
        employee: &Employee,
        year: i32,
        month: u32,
        records: &[AttendanceRecord],
    ) -> AppResult<Self> {
        let grid = MonthGrid::new(year, month)?;
        let records: Vec<AttendanceRecord> = records
            .iter()
            .filter(|r| r.employee_id == employee.id && grid.contains(r.date))
            .cloned()
            .collect();

        let mut summary = Self {
            employee_id: employee.id,
            year,
            month,
            days_worked: 0,
            total_hours: 0.0,
            normal_count: 0,
            late_count: 0,
            absent_count: 0,
            early_leave_count: 0,
            duplicate_days: Vec::new(),
            estimated_pay: 0,
        };

        let mut tenths: u64 = 0;
        for record in &records {
            tenths += (record.work_hours() * 10.0).round() as u64;
            match record.status {
                AttendanceStatus::Normal => summary.normal_count += 1,
                AttendanceStatus::Late => summary.late_count += 1,
                AttendanceStatus::Absent => summary.absent_count += 1,
                AttendanceStatus::EarlyLeave => summary.early_leave_count += 1,
            }
        }
        summary.total_hours = tenths as f64 / 10.0;

        for (date, day_records) in group_by_day(&records, |r| r.date) {
            if day_records.iter().any(|r| r.clock_in().is_some()) {
                summary.days_worked += 1;
            }
            if day_records.len() > 1 {
                summary.duplicate_days.push(date);
            }
        }

        summary.estimated_pay = match employee.pay_type {
            PayType::Hourly => tenths
                .checked_mul(employee.pay_rate)
                .and_then(|pay| pay.checked_add(5))
                .map(|pay| pay / 10)
                .ok_or_else(|| validation_error(&t!("validation_pay_overflow")))?,
            PayType::Monthly => employee.pay_rate,
        };

        Ok(summary)
    }
}

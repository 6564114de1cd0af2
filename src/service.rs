use crate::components::attendance::{
    apply_clock, available_actions, derive_status, AttendanceEdit, AttendanceRecord, ClockAction,
    MonthlySummary,
};
use crate::components::check_in::CheckInCode;
use crate::components::repository::{AttendanceRepository, RecordFilter};
use crate::components::roster::{
    Employee, EmployeeId, EmployeeTerms, EmployeeUpdate, StoreId, WorkerRequest,
};
use crate::components::work_schedule::{expand_recurring, RecurringRequest, Shift, ShiftUpdate};
use crate::config::Config;
use crate::error::{check_in_error, not_found_error, validation_error, AppResult};
use crate::utils::time::{local_from_utc, month_bounds, now_local, week_bounds};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Admin console and worker view operations over a repository
#[derive(Clone)]
pub struct AttendanceService {
    repo: Arc<dyn AttendanceRepository>,
    config: Arc<Config>,
}

/// What the worker's clock screen shows for a day
#[derive(Debug, Clone)]
pub struct ClockScreen {
    pub record: Option<AttendanceRecord>,
    pub actions: Vec<ClockAction>,
    pub shift: Option<Shift>,
}

impl AttendanceService {
    pub fn new(repo: Arc<dyn AttendanceRepository>, config: Arc<Config>) -> Self {
        Self { repo, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn repository(&self) -> Arc<dyn AttendanceRepository> {
        Arc::clone(&self.repo)
    }

    /// Employee that must exist
    pub async fn require_employee(&self, id: EmployeeId) -> AppResult<Employee> {
        self.repo.get_employee(id).await?.ok_or_else(|| {
            validation_error(&t!("validation_employee_not_found", id = id.to_string()))
        })
    }

    /// Worker-side join request
    pub async fn submit_request(
        &self,
        name: &str,
        phone: Option<String>,
        store_id: Option<StoreId>,
        now: DateTime<Utc>,
    ) -> AppResult<WorkerRequest> {
        if let Some(store_id) = store_id {
            self.require_store(store_id).await?;
        }
        let request = WorkerRequest::new(name, phone, store_id, now)?;
        self.repo.insert_request(request.clone()).await?;
        info!("Worker request {} received from {}", request.id, request.name);
        Ok(request)
    }

    /// Approve a pending request, creating an active employee
    pub async fn approve_request(&self, id: Uuid, terms: EmployeeTerms) -> AppResult<Employee> {
        let request = self
            .repo
            .take_request(id)
            .await?
            .ok_or_else(|| not_found_error(&format!("worker request {}", id)))?;

        let employee_id = self.repo.next_employee_id().await?;
        match request.clone().approve(employee_id, terms) {
            Ok(employee) => {
                self.repo.upsert_employee(employee.clone()).await?;
                info!("Approved {} as employee {}", employee.name, employee.id);
                Ok(employee)
            }
            Err(e) => {
                // Request stays pending
                self.repo.insert_request(request).await?;
                warn!("Approval of request {} failed: {}", id, e);
                Err(e)
            }
        }
    }

    pub async fn reject_request(&self, id: Uuid) -> AppResult<WorkerRequest> {
        let request = self
            .repo
            .take_request(id)
            .await?
            .ok_or_else(|| not_found_error(&format!("worker request {}", id)))?;
        info!("Rejected worker request {} from {}", id, request.name);
        Ok(request)
    }

    pub async fn update_employee(&self, id: EmployeeId, update: EmployeeUpdate) -> AppResult<Employee> {
        let mut employee = self.require_employee(id).await?;
        if let Some(Some(store_id)) = update.store_id {
            self.require_store(store_id).await?;
        }
        employee.apply(update)?;
        self.repo.upsert_employee(employee.clone()).await?;
        info!("Updated employee {} ({})", employee.id, employee.status);
        Ok(employee)
    }

    async fn require_store(&self, id: StoreId) -> AppResult<()> {
        match self.repo.get_store(id).await? {
            Some(_) => Ok(()),
            None => Err(not_found_error(&format!("store {}", id))),
        }
    }

    /// Employee that may receive new shifts
    async fn schedulable_employee(&self, id: EmployeeId) -> AppResult<Employee> {
        let employee = self.require_employee(id).await?;
        if !employee.status.can_be_scheduled() {
            return Err(validation_error(&t!(
                "validation_employee_resigned",
                name = employee.name.as_str()
            )));
        }
        Ok(employee)
    }

    pub async fn add_shift(
        &self,
        employee_id: EmployeeId,
        start: NaiveDateTime,
        end: NaiveDateTime,
        break_minutes: u32,
        store_id: Option<StoreId>,
    ) -> AppResult<Shift> {
        let employee = self.schedulable_employee(employee_id).await?;
        if let Some(store_id) = store_id {
            self.require_store(store_id).await?;
        }
        let shift = Shift::new(
            employee.id,
            start,
            end,
            break_minutes,
            store_id.or(employee.store_id),
        )?;
        self.repo.insert_shifts(vec![shift.clone()]).await?;
        info!("Added shift {} for employee {}", shift.format(), employee.id);
        Ok(shift)
    }

    /// Expand a recurring request and insert all shifts in one batch.
    ///
    /// Any validation failure aborts before anything is written.
    pub async fn add_recurring_schedule(&self, request: RecurringRequest) -> AppResult<Vec<Shift>> {
        let employee_id = request
            .employee_id
            .ok_or_else(|| validation_error(&t!("validation_employee_required")))?;
        let employee = self.schedulable_employee(employee_id).await?;
        if let Some(store_id) = request.store_id {
            self.require_store(store_id).await?;
        }

        let request = RecurringRequest {
            store_id: request.store_id.or(employee.store_id),
            ..request
        };
        let shifts = expand_recurring(&request, self.config.default_break_minutes)?;
        let count = self.repo.insert_shifts(shifts.clone()).await?;

        info!(
            "Generated {} recurring shifts for employee {} from {:?}",
            count, employee.id, request.start_date
        );
        Ok(shifts)
    }

    pub async fn update_shift(&self, id: Uuid, update: ShiftUpdate) -> AppResult<Shift> {
        let mut shift = self
            .repo
            .get_shift(id)
            .await?
            .ok_or_else(|| not_found_error(&format!("shift {}", id)))?;
        shift.apply(update)?;
        self.repo.update_shift(shift.clone()).await?;
        Ok(shift)
    }

    pub async fn delete_shift(&self, id: Uuid) -> AppResult<()> {
        if !self.repo.delete_shift(id).await? {
            return Err(not_found_error(&format!("shift {}", id)));
        }
        info!("Deleted shift {}", id);
        Ok(())
    }

    /// Shifts in a month, for one employee or everyone
    pub async fn shifts_for_month(
        &self,
        employee_id: Option<EmployeeId>,
        year: i32,
        month: u32,
    ) -> AppResult<Vec<Shift>> {
        let filter = month_filter(employee_id, year, month)?;
        self.repo.list_shifts(&filter).await
    }

    /// Worker's personal schedule for the Sunday-first week containing `date`
    pub async fn weekly_schedule(&self, employee_id: EmployeeId, date: NaiveDate) -> AppResult<Vec<Shift>> {
        let (sunday, saturday) = week_bounds(date);
        self.repo
            .list_shifts(&RecordFilter::employee(employee_id).between(sunday, saturday))
            .await
    }

    async fn shift_on(&self, employee_id: EmployeeId, date: NaiveDate) -> AppResult<Option<Shift>> {
        let shifts = self
            .repo
            .list_shifts(&RecordFilter::employee(employee_id).between(date, date))
            .await?;
        Ok(shifts.into_iter().next())
    }

    pub async fn attendance_for_month(
        &self,
        employee_id: Option<EmployeeId>,
        year: i32,
        month: u32,
    ) -> AppResult<Vec<AttendanceRecord>> {
        let filter = month_filter(employee_id, year, month)?;
        self.repo.list_attendance(&filter).await
    }

    /// Admin creates a record by hand from the attendance calendar
    pub async fn create_attendance(
        &self,
        employee_id: EmployeeId,
        date: NaiveDate,
        edit: AttendanceEdit,
    ) -> AppResult<AttendanceRecord> {
        self.require_employee(employee_id).await?;
        let mut record = AttendanceRecord::new(employee_id, date);
        self.apply_edit(&mut record, edit).await?;
        self.repo.upsert_attendance(record.clone()).await?;
        Ok(record)
    }

    /// Admin edits times and optionally overrides the status
    pub async fn edit_attendance(&self, id: Uuid, edit: AttendanceEdit) -> AppResult<AttendanceRecord> {
        let mut record = self
            .repo
            .get_attendance(id)
            .await?
            .ok_or_else(|| not_found_error(&format!("attendance record {}", id)))?;
        self.apply_edit(&mut record, edit).await?;
        self.repo.upsert_attendance(record.clone()).await?;
        info!(
            "Edited attendance {} for employee {}: {} hours",
            record.id,
            record.employee_id,
            record.work_hours()
        );
        Ok(record)
    }

    async fn apply_edit(&self, record: &mut AttendanceRecord, edit: AttendanceEdit) -> AppResult<()> {
        let overridden = edit.status.is_some();
        record.apply(edit)?;
        if !overridden {
            let shift = self.shift_on(record.employee_id, record.date).await?;
            record.status = derive_status(record, shift.as_ref(), self.config.late_grace_minutes);
        }
        Ok(())
    }

    pub async fn delete_attendance(&self, id: Uuid) -> AppResult<()> {
        if !self.repo.delete_attendance(id).await? {
            return Err(not_found_error(&format!("attendance record {}", id)));
        }
        Ok(())
    }

    pub async fn monthly_summary(
        &self,
        employee_id: EmployeeId,
        year: i32,
        month: u32,
    ) -> AppResult<MonthlySummary> {
        let employee = self.require_employee(employee_id).await?;
        let records = self.attendance_for_month(Some(employee_id), year, month).await?;
        let summary = MonthlySummary::build(&employee, year, month, &records)?;
        if !summary.duplicate_days.is_empty() {
            warn!(
                "Employee {} has multiple records on {:?}",
                employee_id, summary.duplicate_days
            );
        }
        Ok(summary)
    }

    /// The day's record, preferring one that is still open
    async fn record_on(&self, employee_id: EmployeeId, date: NaiveDate) -> AppResult<Option<AttendanceRecord>> {
        let records = self
            .repo
            .list_attendance(&RecordFilter::employee(employee_id).between(date, date))
            .await?;
        let open = records.iter().position(|r| r.clock_out().is_none());
        Ok(match open {
            Some(index) => records.into_iter().nth(index),
            None => records.into_iter().next(),
        })
    }

    /// Worker's clock screen for a day
    pub async fn clock_screen(&self, employee_id: EmployeeId, date: NaiveDate) -> AppResult<ClockScreen> {
        self.require_employee(employee_id).await?;
        let record = self.record_on(employee_id, date).await?;
        let actions = match &record {
            Some(record) => available_actions(record),
            None => vec![ClockAction::ClockIn],
        };
        let shift = self.shift_on(employee_id, date).await?;
        Ok(ClockScreen {
            record,
            actions,
            shift,
        })
    }

    /// Record a clock action at local wall-clock time `at`
    pub async fn clock(
        &self,
        employee_id: EmployeeId,
        action: ClockAction,
        at: NaiveDateTime,
    ) -> AppResult<AttendanceRecord> {
        let employee = self.require_employee(employee_id).await?;
        let date = at.date();

        let mut record = match self.record_on(employee.id, date).await? {
            Some(record) => record,
            None if action == ClockAction::ClockIn => AttendanceRecord::new(employee.id, date),
            None => return Err(validation_error(&t!("clock_not_clocked_in"))),
        };

        if let Err(e) = apply_clock(&mut record, action, at.time()) {
            warn!("Clock action {} rejected for employee {}: {}", action, employee.id, e);
            return Err(e);
        }

        let shift = self.shift_on(employee.id, date).await?;
        record.status = derive_status(&record, shift.as_ref(), self.config.late_grace_minutes);
        self.repo.upsert_attendance(record.clone()).await?;

        info!(
            "Employee {} {} at {} ({} hours)",
            employee.id,
            action,
            at.format("%Y-%m-%d %H:%M"),
            record.work_hours()
        );
        Ok(record)
    }

    /// Record a clock action now, in the configured timezone
    pub async fn clock_now(&self, employee_id: EmployeeId, action: ClockAction) -> AppResult<AttendanceRecord> {
        let tz = self.config.tz()?;
        self.clock(employee_id, action, now_local(&tz)).await
    }

    pub async fn issue_check_in_code(&self, store_id: StoreId, now: DateTime<Utc>) -> AppResult<CheckInCode> {
        self.require_store(store_id).await?;
        let code = CheckInCode::issue(store_id, now, self.config.checkin_ttl_seconds);
        self.repo.insert_check_in_code(code.clone()).await?;
        Ok(code)
    }

    /// Clock in by scanning a store's QR code
    pub async fn clock_in_with_code(
        &self,
        employee_id: EmployeeId,
        scanned: &str,
        now: DateTime<Utc>,
    ) -> AppResult<AttendanceRecord> {
        let employee = self.require_employee(employee_id).await?;
        let code = CheckInCode::decode(scanned)?;
        code.verify(employee.store_id, now, self.config.checkin_ttl_seconds)?;

        // Only codes this service issued, exactly as issued
        match self.repo.get_check_in_code(code.nonce).await? {
            Some(issued) if issued == code => {}
            _ => {
                warn!("Unknown check-in code {} scanned by employee {}", code.nonce, employee.id);
                return Err(check_in_error(&t!("checkin_invalid_code")));
            }
        }

        let tz = self.config.tz()?;
        self.clock(employee.id, ClockAction::ClockIn, local_from_utc(now, &tz))
            .await
    }
}

fn month_filter(employee_id: Option<EmployeeId>, year: i32, month: u32) -> AppResult<RecordFilter> {
    let (first, last) =
        month_bounds(year, month).ok_or_else(|| validation_error(&t!("validation_invalid_month")))?;
    Ok(RecordFilter {
        employee_id,
        from: Some(first),
        to: Some(last),
    })
}

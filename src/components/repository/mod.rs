mod memory;

pub use memory::InMemoryRepository;

use crate::components::attendance::AttendanceRecord;
use crate::components::check_in::CheckInCode;
use crate::components::roster::{Employee, EmployeeId, Store, StoreId, WorkerRequest};
use crate::components::work_schedule::Shift;
use crate::error::AppResult;
use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

/// Which shifts or attendance records to list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub employee_id: Option<EmployeeId>,
    /// Inclusive first day
    pub from: Option<NaiveDate>,
    /// Inclusive last day
    pub to: Option<NaiveDate>,
}

impl RecordFilter {
    pub fn employee(employee_id: EmployeeId) -> Self {
        Self {
            employee_id: Some(employee_id),
            ..Default::default()
        }
    }

    pub fn between(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    pub fn matches(&self, employee_id: EmployeeId, date: NaiveDate) -> bool {
        self.employee_id.map_or(true, |id| id == employee_id)
            && self.from.map_or(true, |from| date >= from)
            && self.to.map_or(true, |to| date <= to)
    }
}

/// Storage for the roster, shifts and attendance
#[async_trait]
pub trait AttendanceRepository: Send + Sync + 'static {
    async fn list_stores(&self) -> AppResult<Vec<Store>>;

    async fn get_store(&self, id: StoreId) -> AppResult<Option<Store>>;

    async fn upsert_store(&self, store: Store) -> AppResult<()>;

    async fn list_employees(&self) -> AppResult<Vec<Employee>>;

    async fn get_employee(&self, id: EmployeeId) -> AppResult<Option<Employee>>;

    /// Smallest id not yet used by any employee
    async fn next_employee_id(&self) -> AppResult<EmployeeId>;

    async fn upsert_employee(&self, employee: Employee) -> AppResult<()>;

    /// Pending join requests, oldest first
    async fn list_requests(&self) -> AppResult<Vec<WorkerRequest>>;

    async fn insert_request(&self, request: WorkerRequest) -> AppResult<()>;

    /// Remove and return a pending request
    async fn take_request(&self, id: Uuid) -> AppResult<Option<WorkerRequest>>;

    /// Shifts ordered by start time
    async fn list_shifts(&self, filter: &RecordFilter) -> AppResult<Vec<Shift>>;

    async fn get_shift(&self, id: Uuid) -> AppResult<Option<Shift>>;

    /// Append a batch in one write, returns the number inserted
    async fn insert_shifts(&self, shifts: Vec<Shift>) -> AppResult<usize>;

    async fn update_shift(&self, shift: Shift) -> AppResult<()>;

    async fn delete_shift(&self, id: Uuid) -> AppResult<bool>;

    /// Records ordered by date, then clock-in
    async fn list_attendance(&self, filter: &RecordFilter) -> AppResult<Vec<AttendanceRecord>>;

    async fn get_attendance(&self, id: Uuid) -> AppResult<Option<AttendanceRecord>>;

    async fn upsert_attendance(&self, record: AttendanceRecord) -> AppResult<()>;

    async fn delete_attendance(&self, id: Uuid) -> AppResult<bool>;

    /// Remember an issued check-in code, forgetting ones already expired
    async fn insert_check_in_code(&self, code: CheckInCode) -> AppResult<()>;

    /// The issued code carrying this nonce, if any
    async fn get_check_in_code(&self, nonce: Uuid) -> AppResult<Option<CheckInCode>>;
}

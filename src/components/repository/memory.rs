use super::{AttendanceRepository, RecordFilter};
use crate::components::attendance::AttendanceRecord;
use crate::components::check_in::CheckInCode;
use crate::components::roster::{Employee, EmployeeId, Store, StoreId, WorkerRequest};
use crate::components::work_schedule::Shift;
use crate::error::{not_found_error, AppResult};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Default)]
struct State {
    stores: BTreeMap<StoreId, Store>,
    employees: BTreeMap<EmployeeId, Employee>,
    requests: Vec<WorkerRequest>,
    shifts: Vec<Shift>,
    attendance: Vec<AttendanceRecord>,
    check_in_codes: HashMap<Uuid, CheckInCode>,
}

/// Session-lifetime storage, lost when the process exits
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    state: RwLock<State>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AttendanceRepository for InMemoryRepository {
    async fn list_stores(&self) -> AppResult<Vec<Store>> {
        let state = self.state.read().await;
        Ok(state.stores.values().cloned().collect())
    }

    async fn get_store(&self, id: StoreId) -> AppResult<Option<Store>> {
        let state = self.state.read().await;
        Ok(state.stores.get(&id).cloned())
    }

    async fn upsert_store(&self, store: Store) -> AppResult<()> {
        let mut state = self.state.write().await;
        state.stores.insert(store.id, store);
        Ok(())
    }

    async fn list_employees(&self) -> AppResult<Vec<Employee>> {
        let state = self.state.read().await;
        Ok(state.employees.values().cloned().collect())
    }

    async fn get_employee(&self, id: EmployeeId) -> AppResult<Option<Employee>> {
        let state = self.state.read().await;
        Ok(state.employees.get(&id).cloned())
    }

    async fn next_employee_id(&self) -> AppResult<EmployeeId> {
        let state = self.state.read().await;
        Ok(state.employees.keys().next_back().map_or(1, |id| id + 1))
    }

    async fn upsert_employee(&self, employee: Employee) -> AppResult<()> {
        let mut state = self.state.write().await;
        state.employees.insert(employee.id, employee);
        Ok(())
    }

    async fn list_requests(&self) -> AppResult<Vec<WorkerRequest>> {
        let state = self.state.read().await;
        let mut requests = state.requests.clone();
        requests.sort_by_key(|r| r.requested_at);
        Ok(requests)
    }

    async fn insert_request(&self, request: WorkerRequest) -> AppResult<()> {
        let mut state = self.state.write().await;
        state.requests.push(request);
        Ok(())
    }

    async fn take_request(&self, id: Uuid) -> AppResult<Option<WorkerRequest>> {
        let mut state = self.state.write().await;
        let position = state.requests.iter().position(|r| r.id == id);
        Ok(position.map(|index| state.requests.remove(index)))
    }

    async fn list_shifts(&self, filter: &RecordFilter) -> AppResult<Vec<Shift>> {
        let state = self.state.read().await;
        let mut shifts: Vec<Shift> = state
            .shifts
            .iter()
            .filter(|s| filter.matches(s.employee_id, s.date()))
            .cloned()
            .collect();
        shifts.sort_by_key(|s| (s.start, s.employee_id));
        Ok(shifts)
    }

    async fn get_shift(&self, id: Uuid) -> AppResult<Option<Shift>> {
        let state = self.state.read().await;
        Ok(state.shifts.iter().find(|s| s.id == id).cloned())
    }

    async fn insert_shifts(&self, shifts: Vec<Shift>) -> AppResult<usize> {
        let mut state = self.state.write().await;
        let count = shifts.len();
        state.shifts.extend(shifts);
        debug!("Inserted {} shifts, {} total", count, state.shifts.len());
        Ok(count)
    }

    async fn update_shift(&self, shift: Shift) -> AppResult<()> {
        let mut state = self.state.write().await;
        let existing = state
            .shifts
            .iter_mut()
            .find(|s| s.id == shift.id)
            .ok_or_else(|| not_found_error(&format!("shift {}", shift.id)))?;
        *existing = shift;
        Ok(())
    }

    async fn delete_shift(&self, id: Uuid) -> AppResult<bool> {
        let mut state = self.state.write().await;
        let before = state.shifts.len();
        state.shifts.retain(|s| s.id != id);
        Ok(state.shifts.len() != before)
    }

    async fn list_attendance(&self, filter: &RecordFilter) -> AppResult<Vec<AttendanceRecord>> {
        let state = self.state.read().await;
        let mut records: Vec<AttendanceRecord> = state
            .attendance
            .iter()
            .filter(|r| filter.matches(r.employee_id, r.date))
            .cloned()
            .collect();
        records.sort_by(|a, b| {
            (a.date, a.employee_id, a.clock_in()).cmp(&(b.date, b.employee_id, b.clock_in()))
        });
        Ok(records)
    }

    async fn get_attendance(&self, id: Uuid) -> AppResult<Option<AttendanceRecord>> {
        let state = self.state.read().await;
        Ok(state.attendance.iter().find(|r| r.id == id).cloned())
    }

    async fn upsert_attendance(&self, record: AttendanceRecord) -> AppResult<()> {
        let mut state = self.state.write().await;
        match state.attendance.iter().position(|r| r.id == record.id) {
            Some(index) => state.attendance[index] = record,
            None => state.attendance.push(record),
        }
        Ok(())
    }

    async fn delete_attendance(&self, id: Uuid) -> AppResult<bool> {
        let mut state = self.state.write().await;
        let before = state.attendance.len();
        state.attendance.retain(|r| r.id != id);
        Ok(state.attendance.len() != before)
    }

    async fn insert_check_in_code(&self, code: CheckInCode) -> AppResult<()> {
        let mut state = self.state.write().await;
        state
            .check_in_codes
            .retain(|_, issued| !issued.is_expired(code.issued_at));
        state.check_in_codes.insert(code.nonce, code);
        Ok(())
    }

    async fn get_check_in_code(&self, nonce: Uuid) -> AppResult<Option<CheckInCode>> {
        let state = self.state.read().await;
        Ok(state.check_in_codes.get(&nonce).cloned())
    }
}

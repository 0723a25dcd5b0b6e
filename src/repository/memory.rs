use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};

use super::{
    AttendanceHistoryRepository, AttendanceRepository, DepartmentRepository, EmployeeRepository,
    StoreError, StoreResult,
};
use crate::model::{
    attendance::Attendance,
    attendance_history::{AttendanceLogRow, LogFilter, NewAttendanceHistory},
    department::{Department, DepartmentInput},
    employee::{Employee, EmployeeInput},
};

/// In-process store with the same key and reference rules as the MySQL schema.
/// Row ids come from per-table counters that never go backwards, like AUTO_INCREMENT.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

#[derive(Default)]
pub struct State {
    pub departments: Vec<Department>,
    pub employees: Vec<Employee>,
    pub attendances: Vec<Attendance>,
    pub histories: Vec<AttendanceHistory>,
    pub fail_history_inserts: bool,
    /// Employee codes whose history delete reports a database error.
    pub fail_history_deletes_for: Vec<String>,
    next_department_id: u64,
    next_employee_id: u64,
    next_attendance_id: u64,
    next_history_id: u64,
}

/// Stored audit row, one per clock event.
#[derive(Debug, Clone)]
pub struct AttendanceHistory {
    pub id: u64,
    pub employee_code: String,
    pub attendance_code: String,
    pub date_attendance: NaiveDateTime,
    pub attendance_type: u8,
    pub description: String,
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

fn bump(counter: &mut u64) -> u64 {
    *counter += 1;
    *counter
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("memory store poisoned")
    }
}

#[async_trait]
impl DepartmentRepository for MemoryStore {
    async fn list_departments(&self) -> StoreResult<Vec<Department>> {
        Ok(self.state().departments.clone())
    }

    async fn find_department(&self, id: u64) -> StoreResult<Option<Department>> {
        Ok(self.state().departments.iter().find(|d| d.id == id).cloned())
    }

    async fn insert_department(&self, input: &DepartmentInput) -> StoreResult<Department> {
        let mut state = self.state();
        let department = Department {
            id: bump(&mut state.next_department_id),
            department_name: input.department_name.clone(),
            max_clock_in_time: input.max_clock_in_time,
            max_clock_out_time: input.max_clock_out_time,
            created_at: now(),
            updated_at: now(),
        };
        state.departments.push(department.clone());
        Ok(department)
    }

    async fn update_department(
        &self,
        id: u64,
        input: &DepartmentInput,
    ) -> StoreResult<Department> {
        let mut state = self.state();
        let department = state
            .departments
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(StoreError::Database(sqlx::Error::RowNotFound))?;
        department.department_name = input.department_name.clone();
        department.max_clock_in_time = input.max_clock_in_time;
        department.max_clock_out_time = input.max_clock_out_time;
        department.updated_at = now();
        Ok(department.clone())
    }

    async fn delete_department(&self, id: u64) -> StoreResult<u64> {
        let mut state = self.state();
        let before = state.departments.len();
        state.departments.retain(|d| d.id != id);
        // ON DELETE CASCADE on employees.department_id
        state.employees.retain(|e| e.department_id != id);
        Ok((before - state.departments.len()) as u64)
    }
}

#[async_trait]
impl EmployeeRepository for MemoryStore {
    async fn list_employees(&self) -> StoreResult<Vec<Employee>> {
        Ok(self.state().employees.clone())
    }

    async fn list_employees_by_department(
        &self,
        department_id: u64,
    ) -> StoreResult<Vec<Employee>> {
        Ok(self
            .state()
            .employees
            .iter()
            .filter(|e| e.department_id == department_id)
            .cloned()
            .collect())
    }

    async fn find_employee(&self, id: u64) -> StoreResult<Option<Employee>> {
        Ok(self.state().employees.iter().find(|e| e.id == id).cloned())
    }

    async fn max_employee_row_id(&self) -> StoreResult<Option<u64>> {
        Ok(self.state().employees.iter().map(|e| e.id).max())
    }

    async fn insert_employee(&self, code: &str, input: &EmployeeInput) -> StoreResult<Employee> {
        let mut state = self.state();
        if state.employees.iter().any(|e| e.employee_code == code) {
            return Err(StoreError::Duplicate);
        }
        if !state.departments.iter().any(|d| d.id == input.department_id) {
            return Err(StoreError::MissingReference);
        }
        let employee = Employee {
            id: bump(&mut state.next_employee_id),
            employee_code: code.to_string(),
            department_id: input.department_id,
            name: input.name.clone(),
            address: input.address.clone(),
            created_at: now(),
            updated_at: now(),
        };
        state.employees.push(employee.clone());
        Ok(employee)
    }

    async fn update_employee(&self, id: u64, input: &EmployeeInput) -> StoreResult<()> {
        let mut state = self.state();
        if !state.departments.iter().any(|d| d.id == input.department_id) {
            return Err(StoreError::MissingReference);
        }
        if let Some(employee) = state.employees.iter_mut().find(|e| e.id == id) {
            employee.department_id = input.department_id;
            employee.name = input.name.clone();
            employee.address = input.address.clone();
            employee.updated_at = now();
        }
        Ok(())
    }

    async fn delete_employee(&self, id: u64) -> StoreResult<u64> {
        let mut state = self.state();
        let before = state.employees.len();
        state.employees.retain(|e| e.id != id);
        Ok((before - state.employees.len()) as u64)
    }
}

#[async_trait]
impl AttendanceRepository for MemoryStore {
    async fn max_attendance_row_id(&self) -> StoreResult<Option<u64>> {
        Ok(self.state().attendances.iter().map(|a| a.id).max())
    }

    async fn insert_attendance(
        &self,
        code: &str,
        employee_code: &str,
        clock_in: NaiveDateTime,
    ) -> StoreResult<Attendance> {
        let mut state = self.state();
        if state.attendances.iter().any(|a| a.attendance_code == code) {
            return Err(StoreError::Duplicate);
        }
        if !state.employees.iter().any(|e| e.employee_code == employee_code) {
            return Err(StoreError::MissingReference);
        }
        let attendance = Attendance {
            id: bump(&mut state.next_attendance_id),
            employee_code: employee_code.to_string(),
            attendance_code: code.to_string(),
            clock_in,
            clock_out: None,
            created_at: now(),
            updated_at: now(),
        };
        state.attendances.push(attendance.clone());
        Ok(attendance)
    }

    async fn find_attendance_by_code(&self, code: &str) -> StoreResult<Option<Attendance>> {
        Ok(self
            .state()
            .attendances
            .iter()
            .find(|a| a.attendance_code == code)
            .cloned())
    }

    async fn set_clock_out(&self, id: u64, clock_out: NaiveDateTime) -> StoreResult<()> {
        if let Some(attendance) = self.state().attendances.iter_mut().find(|a| a.id == id) {
            attendance.clock_out = Some(clock_out);
            attendance.updated_at = now();
        }
        Ok(())
    }

    async fn delete_attendances_by_employee(&self, employee_code: &str) -> StoreResult<u64> {
        let mut state = self.state();
        let before = state.attendances.len();
        state.attendances.retain(|a| a.employee_code != employee_code);
        Ok((before - state.attendances.len()) as u64)
    }
}

#[async_trait]
impl AttendanceHistoryRepository for MemoryStore {
    async fn insert_history(&self, history: &NewAttendanceHistory) -> StoreResult<()> {
        let mut state = self.state();
        if state.fail_history_inserts {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        if !state
            .attendances
            .iter()
            .any(|a| a.attendance_code == history.attendance_code)
        {
            return Err(StoreError::MissingReference);
        }
        let row = AttendanceHistory {
            id: bump(&mut state.next_history_id),
            employee_code: history.employee_code.clone(),
            attendance_code: history.attendance_code.clone(),
            date_attendance: history.date_attendance,
            attendance_type: history.attendance_type.code(),
            description: history.description.clone(),
        };
        state.histories.push(row);
        Ok(())
    }

    async fn delete_histories_by_employee(&self, employee_code: &str) -> StoreResult<u64> {
        let mut state = self.state();
        if state.fail_history_deletes_for.iter().any(|c| c == employee_code) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        let before = state.histories.len();
        state.histories.retain(|h| h.employee_code != employee_code);
        Ok((before - state.histories.len()) as u64)
    }

    async fn list_logs(&self, filter: &LogFilter) -> StoreResult<Vec<AttendanceLogRow>> {
        let state = self.state();
        let window = filter.window();

        let mut rows: Vec<AttendanceLogRow> = state
            .histories
            .iter()
            .filter(|h| match window {
                Some((start, end)) => h.date_attendance >= start && h.date_attendance < end,
                None => true,
            })
            .filter_map(|h| {
                let employee = state
                    .employees
                    .iter()
                    .find(|e| e.employee_code == h.employee_code);
                if let Some(department_id) = filter.department_id {
                    if employee.map(|e| e.department_id) != Some(department_id) {
                        return None;
                    }
                }
                let department = employee.and_then(|e| {
                    state.departments.iter().find(|d| d.id == e.department_id)
                });
                let attendance = state
                    .attendances
                    .iter()
                    .find(|a| a.attendance_code == h.attendance_code);

                Some(AttendanceLogRow {
                    id: h.id,
                    employee_code: h.employee_code.clone(),
                    attendance_code: h.attendance_code.clone(),
                    date_attendance: h.date_attendance,
                    attendance_type: h.attendance_type,
                    description: h.description.clone(),
                    employee_name: employee.map(|e| e.name.clone()),
                    department_name: department.map(|d| d.department_name.clone()),
                    max_clock_in_time: department.map(|d| d.max_clock_in_time),
                    max_clock_out_time: department.map(|d| d.max_clock_out_time),
                    clock_in: attendance.map(|a| a.clock_in),
                    clock_out: attendance.and_then(|a| a.clock_out),
                })
            })
            .collect();

        rows.sort_by_key(|r| r.id);
        Ok(rows)
    }
}

//! Persistence seams. Handlers only ever see `dyn Store`; `MySqlStore` backs
//! it in production and `MemoryStore` in tests.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use derive_more::Display;

use crate::model::{
    attendance::Attendance,
    attendance_history::{AttendanceLogRow, LogFilter, NewAttendanceHistory},
    department::{Department, DepartmentInput},
    employee::{Employee, EmployeeInput},
};

#[cfg(test)]
pub mod memory;
pub mod mysql;

pub use mysql::MySqlStore;

#[derive(Debug, Display)]
pub enum StoreError {
    /// A unique key (employee or attendance code) is already taken.
    #[display(fmt = "duplicate key")]
    Duplicate,

    /// A foreign key points at a row that does not exist.
    #[display(fmt = "foreign key references a missing row")]
    MissingReference,

    #[display(fmt = "database error: {}", _0)]
    Database(sqlx::Error),
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Database(e) => Some(e),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                return StoreError::Duplicate;
            }
            if db_err.is_foreign_key_violation() {
                return StoreError::MissingReference;
            }
        }
        StoreError::Database(e)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait DepartmentRepository: Send + Sync {
    async fn list_departments(&self) -> StoreResult<Vec<Department>>;

    async fn find_department(&self, id: u64) -> StoreResult<Option<Department>>;

    async fn insert_department(&self, input: &DepartmentInput) -> StoreResult<Department>;

    /// Rewrites every mutable field and returns the stored row.
    async fn update_department(&self, id: u64, input: &DepartmentInput)
    -> StoreResult<Department>;

    /// Returns the number of rows removed.
    async fn delete_department(&self, id: u64) -> StoreResult<u64>;
}

#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    async fn list_employees(&self) -> StoreResult<Vec<Employee>>;

    async fn list_employees_by_department(&self, department_id: u64)
    -> StoreResult<Vec<Employee>>;

    async fn find_employee(&self, id: u64) -> StoreResult<Option<Employee>>;

    /// Highest internal row id, `None` for an empty table.
    async fn max_employee_row_id(&self) -> StoreResult<Option<u64>>;

    async fn insert_employee(&self, code: &str, input: &EmployeeInput) -> StoreResult<Employee>;

    async fn update_employee(&self, id: u64, input: &EmployeeInput) -> StoreResult<()>;

    async fn delete_employee(&self, id: u64) -> StoreResult<u64>;
}

#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    async fn max_attendance_row_id(&self) -> StoreResult<Option<u64>>;

    async fn insert_attendance(
        &self,
        code: &str,
        employee_code: &str,
        clock_in: NaiveDateTime,
    ) -> StoreResult<Attendance>;

    async fn find_attendance_by_code(&self, code: &str) -> StoreResult<Option<Attendance>>;

    async fn set_clock_out(&self, id: u64, clock_out: NaiveDateTime) -> StoreResult<()>;

    async fn delete_attendances_by_employee(&self, employee_code: &str) -> StoreResult<u64>;
}

#[async_trait]
pub trait AttendanceHistoryRepository: Send + Sync {
    async fn insert_history(&self, history: &NewAttendanceHistory) -> StoreResult<()>;

    async fn delete_histories_by_employee(&self, employee_code: &str) -> StoreResult<u64>;

    /// History rows joined with employee, department and attendance, ordered by history id.
    async fn list_logs(&self, filter: &LogFilter) -> StoreResult<Vec<AttendanceLogRow>>;
}

pub trait Store:
    DepartmentRepository + EmployeeRepository + AttendanceRepository + AttendanceHistoryRepository
{
}

impl<T> Store for T where
    T: DepartmentRepository
        + EmployeeRepository
        + AttendanceRepository
        + AttendanceHistoryRepository
{
}

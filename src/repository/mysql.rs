use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::MySqlPool;
use tracing::debug;

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

const DEPARTMENT_COLUMNS: &str =
    "id, department_name, max_clock_in_time, max_clock_out_time, created_at, updated_at";

// The code columns keep their historical `*_id` names in the schema.
const EMPLOYEE_COLUMNS: &str =
    "id, employee_id AS employee_code, department_id, name, address, created_at, updated_at";

const ATTENDANCE_COLUMNS: &str = "id, employee_id AS employee_code, attendance_id AS attendance_code, \
     clock_in, clock_out, created_at, updated_at";

#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn last_row_id(&self, table: &str) -> StoreResult<Option<u64>> {
        let sql = format!("SELECT id FROM {} ORDER BY id DESC LIMIT 1", table);
        let id = sqlx::query_scalar::<_, u64>(&sql)
            .fetch_optional(&self.pool)
            .await?;
        Ok(id)
    }

    async fn fetch_department(&self, id: u64) -> StoreResult<Department> {
        self.find_department(id)
            .await?
            .ok_or(StoreError::Database(sqlx::Error::RowNotFound))
    }
}

#[async_trait]
impl DepartmentRepository for MySqlStore {
    async fn list_departments(&self) -> StoreResult<Vec<Department>> {
        let sql = format!("SELECT {} FROM departments", DEPARTMENT_COLUMNS);
        let rows = sqlx::query_as::<_, Department>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_department(&self, id: u64) -> StoreResult<Option<Department>> {
        let sql = format!("SELECT {} FROM departments WHERE id = ?", DEPARTMENT_COLUMNS);
        let row = sqlx::query_as::<_, Department>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert_department(&self, input: &DepartmentInput) -> StoreResult<Department> {
        let result = sqlx::query(
            r#"
            INSERT INTO departments (department_name, max_clock_in_time, max_clock_out_time)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&input.department_name)
        .bind(input.max_clock_in_time)
        .bind(input.max_clock_out_time)
        .execute(&self.pool)
        .await?;

        self.fetch_department(result.last_insert_id()).await
    }

    async fn update_department(
        &self,
        id: u64,
        input: &DepartmentInput,
    ) -> StoreResult<Department> {
        sqlx::query(
            r#"
            UPDATE departments
            SET department_name = ?, max_clock_in_time = ?, max_clock_out_time = ?
            WHERE id = ?
            "#,
        )
        .bind(&input.department_name)
        .bind(input.max_clock_in_time)
        .bind(input.max_clock_out_time)
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.fetch_department(id).await
    }

    async fn delete_department(&self, id: u64) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM departments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl EmployeeRepository for MySqlStore {
    async fn list_employees(&self) -> StoreResult<Vec<Employee>> {
        let sql = format!("SELECT {} FROM employees", EMPLOYEE_COLUMNS);
        let rows = sqlx::query_as::<_, Employee>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn list_employees_by_department(
        &self,
        department_id: u64,
    ) -> StoreResult<Vec<Employee>> {
        let sql = format!(
            "SELECT {} FROM employees WHERE department_id = ?",
            EMPLOYEE_COLUMNS
        );
        let rows = sqlx::query_as::<_, Employee>(&sql)
            .bind(department_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_employee(&self, id: u64) -> StoreResult<Option<Employee>> {
        let sql = format!("SELECT {} FROM employees WHERE id = ?", EMPLOYEE_COLUMNS);
        let row = sqlx::query_as::<_, Employee>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn max_employee_row_id(&self) -> StoreResult<Option<u64>> {
        self.last_row_id("employees").await
    }

    async fn insert_employee(&self, code: &str, input: &EmployeeInput) -> StoreResult<Employee> {
        let result = sqlx::query(
            r#"
            INSERT INTO employees (employee_id, department_id, name, address)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(code)
        .bind(input.department_id)
        .bind(&input.name)
        .bind(&input.address)
        .execute(&self.pool)
        .await?;

        self.find_employee(result.last_insert_id())
            .await?
            .ok_or(StoreError::Database(sqlx::Error::RowNotFound))
    }

    async fn update_employee(&self, id: u64, input: &EmployeeInput) -> StoreResult<()> {
        sqlx::query(
            r#"
            UPDATE employees
            SET department_id = ?, name = ?, address = ?
            WHERE id = ?
            "#,
        )
        .bind(input.department_id)
        .bind(&input.name)
        .bind(&input.address)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_employee(&self, id: u64) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM employees WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl AttendanceRepository for MySqlStore {
    async fn max_attendance_row_id(&self) -> StoreResult<Option<u64>> {
        self.last_row_id("attendances").await
    }

    async fn insert_attendance(
        &self,
        code: &str,
        employee_code: &str,
        clock_in: NaiveDateTime,
    ) -> StoreResult<Attendance> {
        let result = sqlx::query(
            r#"
            INSERT INTO attendances (employee_id, attendance_id, clock_in, clock_out)
            VALUES (?, ?, ?, NULL)
            "#,
        )
        .bind(employee_code)
        .bind(code)
        .bind(clock_in)
        .execute(&self.pool)
        .await?;

        let sql = format!("SELECT {} FROM attendances WHERE id = ?", ATTENDANCE_COLUMNS);
        let row = sqlx::query_as::<_, Attendance>(&sql)
            .bind(result.last_insert_id())
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_attendance_by_code(&self, code: &str) -> StoreResult<Option<Attendance>> {
        let sql = format!(
            "SELECT {} FROM attendances WHERE attendance_id = ?",
            ATTENDANCE_COLUMNS
        );
        let row = sqlx::query_as::<_, Attendance>(&sql)
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn set_clock_out(&self, id: u64, clock_out: NaiveDateTime) -> StoreResult<()> {
        sqlx::query("UPDATE attendances SET clock_out = ? WHERE id = ?")
            .bind(clock_out)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_attendances_by_employee(&self, employee_code: &str) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM attendances WHERE employee_id = ?")
            .bind(employee_code)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl AttendanceHistoryRepository for MySqlStore {
    async fn insert_history(&self, history: &NewAttendanceHistory) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO attendance_histories
            (employee_id, attendance_id, date_attendance, attendance_type, description)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&history.employee_code)
        .bind(&history.attendance_code)
        .bind(history.date_attendance)
        .bind(history.attendance_type.code())
        .bind(&history.description)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_histories_by_employee(&self, employee_code: &str) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM attendance_histories WHERE employee_id = ?")
            .bind(employee_code)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn list_logs(&self, filter: &LogFilter) -> StoreResult<Vec<AttendanceLogRow>> {
        let window = filter.window();

        // ---------- build WHERE clause dynamically ----------
        let mut conditions = Vec::new();
        if window.is_some() {
            conditions.push("h.date_attendance >= ? AND h.date_attendance < ?");
        }
        if filter.department_id.is_some() {
            conditions.push("e.department_id = ?");
        }

        let where_clause = if conditions.is_empty() {
            "".to_string()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let sql = format!(
            r#"
            SELECT
                h.id,
                h.employee_id AS employee_code,
                h.attendance_id AS attendance_code,
                h.date_attendance,
                h.attendance_type,
                h.description,
                e.name AS employee_name,
                d.department_name,
                d.max_clock_in_time,
                d.max_clock_out_time,
                a.clock_in,
                a.clock_out
            FROM attendance_histories h
            LEFT JOIN employees e ON e.employee_id = h.employee_id
            LEFT JOIN departments d ON d.id = e.department_id
            LEFT JOIN attendances a ON a.attendance_id = h.attendance_id
            {}
            ORDER BY h.id
            "#,
            where_clause
        );
        debug!(sql = %sql, ?filter, "Fetching attendance logs");

        let mut query = sqlx::query_as::<_, AttendanceLogRow>(&sql);
        if let Some((start, end)) = window {
            query = query.bind(start).bind(end);
        }
        if let Some(department_id) = filter.department_id {
            query = query.bind(department_id);
        }

        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows)
    }
}

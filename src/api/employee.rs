use std::collections::HashMap;

use actix_web::{HttpResponse, web};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use utoipa::ToSchema;

use super::{ok_data, ok_message, required};
use crate::{
    error::ApiError,
    model::{
        department::Department,
        employee::{Employee, EmployeeInput},
    },
    repository::{Store, StoreError},
    utils::identifier::{CodeKind, insert_with_next_code},
};

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct EmployeePayload {
    #[schema(example = 1)]
    pub department_id: u64,
    #[schema(example = "John Doe")]
    pub name: String,
    #[schema(example = "Jl. Sudirman 1, Jakarta")]
    pub address: String,
}

impl EmployeePayload {
    fn validate(&self) -> Result<EmployeeInput, ApiError> {
        if self.department_id == 0 {
            return Err(ApiError::validation("Department is required"));
        }
        let name = required(&self.name, "Name is required")?;
        let address = required(&self.address, "Address is required")?;

        Ok(EmployeeInput {
            department_id: self.department_id,
            name: name.to_string(),
            address: address.to_string(),
        })
    }
}

/// Employee with its owning department. When the department could not be
/// loaded the key is left out and the plain employee is returned.
#[derive(Debug, Serialize, ToSchema)]
pub struct EmployeeDetail {
    pub id: u64,
    #[schema(example = "EMP-001")]
    pub employee_id: String,
    pub department_id: u64,
    pub name: String,
    pub address: String,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: NaiveDateTime,
    #[schema(value_type = String, format = "date-time")]
    pub updated_at: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<Department>,
}

impl EmployeeDetail {
    fn new(employee: Employee, department: Option<Department>) -> Self {
        Self {
            id: employee.id,
            employee_id: employee.employee_code,
            department_id: employee.department_id,
            name: employee.name,
            address: employee.address,
            created_at: employee.created_at,
            updated_at: employee.updated_at,
            department,
        }
    }
}

async fn find_or_404(store: &dyn Store, id: u64) -> Result<Employee, ApiError> {
    store
        .find_employee(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Employee not found"))
}

/// Re-reads the department for a response; failure only drops the nested object.
async fn with_department(store: &dyn Store, employee: Employee) -> EmployeeDetail {
    let department = match store.find_department(employee.department_id).await {
        Ok(department) => department,
        Err(e) => {
            warn!(error = %e, employee_code = %employee.employee_code, "Failed to load department");
            None
        }
    };
    EmployeeDetail::new(employee, department)
}

fn missing_department(e: StoreError) -> ApiError {
    match e {
        StoreError::MissingReference => ApiError::validation("Department not found"),
        other => other.into(),
    }
}

/// Removes an employee's history rows, then attendance rows. History goes first
/// because it references attendance codes. Failures are logged and skipped.
pub(crate) async fn purge_attendance(store: &dyn Store, employee_code: &str) {
    match store.delete_histories_by_employee(employee_code).await {
        Ok(n) => info!(employee_code, rows = n, "Attendance history removed"),
        Err(e) => error!(error = %e, employee_code, "Failed to delete attendance history"),
    }
    match store.delete_attendances_by_employee(employee_code).await {
        Ok(n) => info!(employee_code, rows = n, "Attendance removed"),
        Err(e) => error!(error = %e, employee_code, "Failed to delete attendance"),
    }
}

/// List employees
#[utoipa::path(
    get,
    path = "/api/employees",
    responses(
        (status = 200, description = "All employees with their department", body = Object, example = json!({
            "data": [{
                "id": 1,
                "employee_id": "EMP-001",
                "department_id": 1,
                "name": "John Doe",
                "address": "Jl. Sudirman 1, Jakarta",
                "created_at": "2024-01-01T08:00:00",
                "updated_at": "2024-01-01T08:00:00",
                "department": {
                    "id": 1,
                    "department_name": "Engineering",
                    "max_clock_in_time": "09:00:00",
                    "max_clock_out_time": "17:00:00",
                    "created_at": "2024-01-01T08:00:00",
                    "updated_at": "2024-01-01T08:00:00"
                }
            }]
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn list_employees(store: web::Data<dyn Store>) -> Result<HttpResponse, ApiError> {
    let employees = store.list_employees().await?;
    let departments: HashMap<u64, Department> = store
        .list_departments()
        .await?
        .into_iter()
        .map(|d| (d.id, d))
        .collect();

    let resp: Vec<EmployeeDetail> = employees
        .into_iter()
        .map(|e| {
            let department = departments.get(&e.department_id).cloned();
            EmployeeDetail::new(e, department)
        })
        .collect();

    Ok(ok_data(resp))
}

/// Get Employee by ID
#[utoipa::path(
    get,
    path = "/api/employee/{id}",
    params(("id" = u64, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee found", body = EmployeeDetail),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "error": "Employee not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn get_employee(
    store: web::Data<dyn Store>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let store = store.get_ref();
    let employee = find_or_404(store, path.into_inner()).await?;

    Ok(ok_data(with_department(store, employee).await))
}

/// Create Employee
///
/// The `EMP-NNN` code is generated from the highest existing row id.
#[utoipa::path(
    post,
    path = "/api/employee",
    request_body = EmployeePayload,
    responses(
        (status = 200, description = "Employee created", body = EmployeeDetail),
        (status = 400, description = "Missing field or unknown department", body = Object, example = json!({
            "error": "Name is required"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn create_employee(
    store: web::Data<dyn Store>,
    payload: web::Json<EmployeePayload>,
) -> Result<HttpResponse, ApiError> {
    let input = payload.validate()?;
    let store = store.get_ref();

    let employee = insert_with_next_code(
        CodeKind::Employee,
        || store.max_employee_row_id(),
        |code| {
            let input = &input;
            async move { store.insert_employee(&code, input).await }
        },
    )
    .await
    .map_err(missing_department)?;
    info!(employee_code = %employee.employee_code, "Employee created");

    Ok(ok_data(with_department(store, employee).await))
}

/// Update Employee
#[utoipa::path(
    patch,
    path = "/api/employee/{id}",
    params(("id" = u64, Path, description = "Employee ID")),
    request_body = EmployeePayload,
    responses(
        (status = 200, description = "Employee updated", body = EmployeeDetail),
        (status = 400, description = "Missing field or unknown department"),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn update_employee(
    store: web::Data<dyn Store>,
    path: web::Path<u64>,
    payload: web::Json<EmployeePayload>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let store = store.get_ref();
    let employee = find_or_404(store, id).await?;

    let input = payload.validate()?;
    store
        .update_employee(id, &input)
        .await
        .map_err(missing_department)?;
    info!(employee_code = %employee.employee_code, "Employee updated");

    let employee = match store.find_employee(id).await {
        Ok(Some(fresh)) => fresh,
        _ => Employee {
            department_id: input.department_id,
            name: input.name,
            address: input.address,
            ..employee
        },
    };

    Ok(ok_data(with_department(store, employee).await))
}

/// Delete Employee
///
/// Attendance history and attendance rows for the employee go first.
#[utoipa::path(
    delete,
    path = "/api/employee/{id}",
    params(("id" = u64, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee deleted", body = Object, example = json!({
            "message": "Employee deleted successfully"
        })),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error", body = Object, example = json!({
            "error": "Failed to delete employee"
        }))
    ),
    tag = "Employee"
)]
pub async fn delete_employee(
    store: web::Data<dyn Store>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let store = store.get_ref();
    let employee = find_or_404(store, id).await?;

    purge_attendance(store, &employee.employee_code).await;

    store.delete_employee(id).await.map_err(|e| {
        error!(error = %e, employee_code = %employee.employee_code, "Failed to delete employee");
        ApiError::Internal("Failed to delete employee".to_string())
    })?;
    info!(employee_code = %employee.employee_code, "Employee deleted");

    Ok(ok_message("Employee deleted successfully"))
}

use actix_web::{HttpResponse, web};
use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use utoipa::ToSchema;

use super::{employee::purge_attendance, ok_data, ok_message, required};
use crate::{
    error::ApiError,
    model::{
        department::{Department, DepartmentInput, serialize_threshold},
        employee::Employee,
    },
    repository::Store,
};

/// Thresholds are submitted as `HH:MM` (24-hour).
const THRESHOLD_INPUT_FORMAT: &str = "%H:%M";

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct DepartmentPayload {
    #[schema(example = "Engineering")]
    pub department_name: String,
    #[schema(example = "09:00")]
    pub max_clock_in_time: String,
    #[schema(example = "17:00")]
    pub max_clock_out_time: String,
}

impl DepartmentPayload {
    fn validate(&self) -> Result<DepartmentInput, ApiError> {
        let department_name = required(&self.department_name, "Department Name is required")?;
        let max_in = required(&self.max_clock_in_time, "Max Clock In Time is required")?;
        let max_out = required(&self.max_clock_out_time, "Max Clock Out Time is required")?;

        Ok(DepartmentInput {
            department_name: department_name.to_string(),
            max_clock_in_time: parse_threshold(max_in, "max_clock_in_time")?,
            max_clock_out_time: parse_threshold(max_out, "max_clock_out_time")?,
        })
    }
}

fn parse_threshold(value: &str, field: &str) -> Result<NaiveTime, ApiError> {
    NaiveTime::parse_from_str(value, THRESHOLD_INPUT_FORMAT).map_err(|_| {
        ApiError::validation(format!("invalid format for {}, expected HH:mm", field))
    })
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DepartmentResponse {
    pub id: u64,
    pub department_name: String,
    #[serde(serialize_with = "serialize_threshold")]
    #[schema(example = "09:00:00", value_type = String)]
    pub max_clock_in_time: NaiveTime,
    #[serde(serialize_with = "serialize_threshold")]
    #[schema(example = "17:00:00", value_type = String)]
    pub max_clock_out_time: NaiveTime,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: NaiveDateTime,
    #[schema(value_type = String, format = "date-time")]
    pub updated_at: NaiveDateTime,
    pub employees: Vec<Employee>,
}

impl DepartmentResponse {
    fn new(department: Department, employees: Vec<Employee>) -> Self {
        Self {
            id: department.id,
            department_name: department.department_name,
            max_clock_in_time: department.max_clock_in_time,
            max_clock_out_time: department.max_clock_out_time,
            created_at: department.created_at,
            updated_at: department.updated_at,
            employees,
        }
    }
}

async fn find_or_404(store: &dyn Store, id: u64) -> Result<Department, ApiError> {
    store
        .find_department(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Department not found"))
}

/// List departments with their employees
#[utoipa::path(
    get,
    path = "/api/departements",
    responses(
        (status = 200, description = "All departments with nested employees", body = Object, example = json!({
            "data": [{
                "id": 1,
                "department_name": "Engineering",
                "max_clock_in_time": "09:00:00",
                "max_clock_out_time": "17:00:00",
                "created_at": "2024-01-01T08:00:00",
                "updated_at": "2024-01-01T08:00:00",
                "employees": []
            }]
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Department"
)]
pub async fn list_departments(store: web::Data<dyn Store>) -> Result<HttpResponse, ApiError> {
    let departments = store.list_departments().await?;
    let employees = store.list_employees().await?;

    let resp: Vec<DepartmentResponse> = departments
        .into_iter()
        .map(|department| {
            let own = employees
                .iter()
                .filter(|e| e.department_id == department.id)
                .cloned()
                .collect();
            DepartmentResponse::new(department, own)
        })
        .collect();

    Ok(ok_data(resp))
}

/// Department detail
#[utoipa::path(
    get,
    path = "/api/departement/{id}",
    params(("id" = u64, Path, description = "Department ID")),
    responses(
        (status = 200, description = "Department with nested employees", body = DepartmentResponse),
        (status = 404, description = "Department not found", body = Object, example = json!({
            "error": "Department not found"
        }))
    ),
    tag = "Department"
)]
pub async fn get_department(
    store: web::Data<dyn Store>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let department = find_or_404(store.get_ref(), id).await?;
    let employees = store.list_employees_by_department(id).await?;

    Ok(ok_data(DepartmentResponse::new(department, employees)))
}

/// Create Department
#[utoipa::path(
    post,
    path = "/api/departement",
    request_body = DepartmentPayload,
    responses(
        (status = 200, description = "Department created", body = DepartmentResponse),
        (status = 400, description = "Missing field or malformed time", body = Object, example = json!({
            "error": "invalid format for max_clock_in_time, expected HH:mm"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Department"
)]
pub async fn create_department(
    store: web::Data<dyn Store>,
    payload: web::Json<DepartmentPayload>,
) -> Result<HttpResponse, ApiError> {
    let input = payload.validate()?;

    let department = store.insert_department(&input).await?;
    info!(department_id = department.id, "Department created");

    Ok(ok_data(DepartmentResponse::new(department, Vec::new())))
}

/// Update Department
#[utoipa::path(
    patch,
    path = "/api/departement/{id}",
    params(("id" = u64, Path, description = "Department ID")),
    request_body = DepartmentPayload,
    responses(
        (status = 200, description = "Department updated", body = Department),
        (status = 400, description = "Missing field or malformed time"),
        (status = 404, description = "Department not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Department"
)]
pub async fn update_department(
    store: web::Data<dyn Store>,
    path: web::Path<u64>,
    payload: web::Json<DepartmentPayload>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    find_or_404(store.get_ref(), id).await?;

    let input = payload.validate()?;
    let department = store.update_department(id, &input).await?;
    info!(department_id = id, "Department updated");

    Ok(ok_data(department))
}

/// Delete Department
///
/// Removes every employee of the department together with their attendance
/// records first. Each step runs on its own; a failed step is logged and the
/// remaining steps still run.
#[utoipa::path(
    delete,
    path = "/api/departement/{id}",
    params(("id" = u64, Path, description = "Department ID")),
    responses(
        (status = 200, description = "Department deleted", body = Object, example = json!({
            "message": "Department deleted successfully"
        })),
        (status = 404, description = "Department not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Department"
)]
pub async fn delete_department(
    store: web::Data<dyn Store>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let store = store.get_ref();
    let department = find_or_404(store, id).await?;

    match store.list_employees_by_department(department.id).await {
        Ok(employees) => {
            for employee in &employees {
                purge_attendance(store, &employee.employee_code).await;
                if let Err(e) = store.delete_employee(employee.id).await {
                    warn!(
                        error = %e,
                        employee_code = %employee.employee_code,
                        "Cascade delete of employee failed"
                    );
                }
            }
        }
        Err(e) => {
            error!(error = %e, department_id = id, "Failed to list employees for cascade delete");
        }
    }

    store.delete_department(id).await.map_err(|e| {
        error!(error = %e, department_id = id, "Failed to delete department");
        ApiError::internal()
    })?;
    info!(department_id = id, "Department deleted");

    Ok(ok_message("Department deleted successfully"))
}

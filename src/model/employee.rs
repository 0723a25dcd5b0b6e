use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "employee_id": "EMP-001",
        "department_id": 1,
        "name": "John Doe",
        "address": "Jl. Sudirman 1, Jakarta",
        "created_at": "2024-01-01T08:00:00",
        "updated_at": "2024-01-01T08:00:00"
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: u64,

    /// Generated `EMP-NNN` code, exposed as `employee_id` on the wire.
    #[serde(rename = "employee_id")]
    #[schema(example = "EMP-001")]
    pub employee_code: String,

    #[schema(example = 1)]
    pub department_id: u64,

    #[schema(example = "John Doe")]
    pub name: String,

    #[schema(example = "Jl. Sudirman 1, Jakarta")]
    pub address: String,

    #[schema(value_type = String, format = "date-time")]
    pub created_at: NaiveDateTime,

    #[schema(value_type = String, format = "date-time")]
    pub updated_at: NaiveDateTime,
}

/// The mutable part of an employee. The code is assigned once at creation.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeInput {
    pub department_id: u64,
    pub name: String,
    pub address: String,
}

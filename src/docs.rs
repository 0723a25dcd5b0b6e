use crate::api::attendance::{
    AttendanceLogEntry, AttendanceResponse, ClockInPayload, ClockOutPayload,
};
use crate::api::department::{DepartmentPayload, DepartmentResponse};
use crate::api::employee::{EmployeeDetail, EmployeePayload};
use crate::model::department::Department;
use crate::model::employee::Employee;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRM Attendance API",
        version = "1.0.0",
        description = r#"
## Attendance Management

Tracks employee clock-in and clock-out events against per-department time thresholds.

### Key Features
- **Department Management**
  - Create, update, list and delete departments with their latest clock-in and earliest clock-out times
- **Employee Management**
  - Employees get a generated `EMP-NNN` code and belong to one department
- **Attendance**
  - Clock in opens an `ATT-NNN` session, clock out closes it
  - Every clock event is kept as a history row
- **Attendance Log**
  - Daily report filtered by date and department, with each event classified
    as on time, late or early leave

### Response Format
- Success: `{"data": ...}`, deletes answer `{"message": ...}`
- Errors: `{"error": "..."}`

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::department::list_departments,
        crate::api::department::get_department,
        crate::api::department::create_department,
        crate::api::department::update_department,
        crate::api::department::delete_department,

        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::create_employee,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,

        crate::api::attendance::clock_in,
        crate::api::attendance::clock_out,
        crate::api::attendance::list_logs
    ),
    components(
        schemas(
            Department,
            DepartmentPayload,
            DepartmentResponse,
            Employee,
            EmployeePayload,
            EmployeeDetail,
            ClockInPayload,
            ClockOutPayload,
            AttendanceResponse,
            AttendanceLogEntry
        )
    ),
    tags(
        (name = "Department", description = "Department management APIs"),
        (name = "Employee", description = "Employee management APIs"),
        (name = "Attendance", description = "Clock in, clock out and attendance log APIs"),
    )
)]
pub struct ApiDoc;

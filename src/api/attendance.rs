use actix_web::{HttpResponse, web};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use utoipa::{IntoParams, ToSchema};

use super::{ok_data, required};
use crate::{
    error::ApiError,
    model::{
        attendance::{Attendance, CLOCK_FORMAT},
        attendance_history::{AttendanceLogRow, AttendanceType, LogFilter, NewAttendanceHistory},
        department::THRESHOLD_FORMAT,
    },
    repository::{Store, StoreError},
    utils::{
        attendance_status::{AttendanceStatus, classify},
        identifier::{CodeKind, insert_with_next_code},
    },
};

const LOG_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct ClockInPayload {
    /// Employee code, e.g. `EMP-001`
    #[schema(example = "EMP-001")]
    pub employee_id: String,
    #[schema(example = "2024-01-10 08:59:00")]
    pub clock_in: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct ClockOutPayload {
    #[schema(example = "2024-01-10 17:05:00")]
    pub clock_out: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AttendanceResponse {
    pub id: u64,
    #[schema(example = "EMP-001")]
    pub employee_id: String,
    #[schema(example = "ATT-001")]
    pub attendance_id: String,
    #[schema(value_type = String, format = "date-time")]
    pub clock_in: NaiveDateTime,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub clock_out: Option<NaiveDateTime>,
}

impl From<Attendance> for AttendanceResponse {
    fn from(a: Attendance) -> Self {
        Self {
            id: a.id,
            employee_id: a.employee_code,
            attendance_id: a.attendance_code,
            clock_in: a.clock_in,
            clock_out: a.clock_out,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(default)]
pub struct LogQuery {
    /// Day to report, `YYYY-MM-DD`
    pub date: Option<String>,
    /// Restrict to employees of this department
    pub department_id: Option<String>,
}

impl LogQuery {
    /// A `date` that does not parse drops the date filter instead of failing.
    fn to_filter(&self) -> Result<LogFilter, ApiError> {
        let date = non_empty(&self.date).and_then(|raw| {
            NaiveDate::parse_from_str(raw, LOG_DATE_FORMAT)
                .map_err(|e| warn!(date = raw, error = %e, "Ignoring unparsable date filter"))
                .ok()
        });
        let department_id = match non_empty(&self.department_id) {
            Some(raw) => Some(
                raw.parse::<u64>()
                    .map_err(|_| ApiError::validation("invalid department_id"))?,
            ),
            None => None,
        };
        Ok(LogFilter { date, department_id })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AttendanceLogEntry {
    pub id: u64,
    #[schema(example = "EMP-001")]
    pub employee_id: String,
    #[schema(example = "ATT-001")]
    pub attendance_id: String,
    #[schema(example = "John Doe")]
    pub name: String,
    #[schema(example = "2024-01-10 08:59:00")]
    pub date_attendance: String,
    /// 1 = clock in, 2 = clock out
    #[schema(example = 1)]
    pub attendance_type: u8,
    #[schema(example = "On Time (Check-in)")]
    pub description: String,
    #[schema(example = "Engineering")]
    pub department: String,
    #[schema(example = "08:59:00")]
    pub clock_in: String,
    #[schema(example = "")]
    pub clock_out: String,
}

fn hms(time: NaiveTime) -> String {
    time.format(THRESHOLD_FORMAT).to_string()
}

impl From<AttendanceLogRow> for AttendanceLogEntry {
    fn from(row: AttendanceLogRow) -> Self {
        let clock_in = row.clock_in.map(|t| hms(t.time())).unwrap_or_default();
        let clock_out = row.clock_out.map(|t| hms(t.time())).unwrap_or_default();
        let max_in = row.max_clock_in_time.map(hms).unwrap_or_default();
        let max_out = row.max_clock_out_time.map(hms).unwrap_or_default();

        // the status stored at write time is only a fallback
        let description = AttendanceType::from_code(row.attendance_type)
            .and_then(|event| {
                classify(event, Some(&clock_in), Some(&clock_out), &max_in, &max_out)
            })
            .map(|status| status.to_string())
            .unwrap_or(row.description);

        let name = row
            .employee_name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| row.employee_code.clone());
        let department = row
            .department_name
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| "-".to_string());

        Self {
            id: row.id,
            employee_id: row.employee_code,
            attendance_id: row.attendance_code,
            name,
            date_attendance: row.date_attendance.format(CLOCK_FORMAT).to_string(),
            attendance_type: row.attendance_type,
            description,
            department,
            clock_in,
            clock_out,
        }
    }
}

/// Leap seconds (`23:59:60`) are rejected even though chrono can represent them.
fn parse_clock(value: &str, field: &str) -> Result<NaiveDateTime, ApiError> {
    let invalid = || {
        ApiError::validation(format!(
            "invalid format for {}, expected YYYY-MM-DD HH:mm:ss",
            field
        ))
    };
    let parsed = NaiveDateTime::parse_from_str(value, CLOCK_FORMAT).map_err(|_| invalid())?;
    if parsed.nanosecond() >= 1_000_000_000 {
        return Err(invalid());
    }
    Ok(parsed)
}

/// Appends the audit row for a clock event. The attendance write has already
/// succeeded at this point, so a failure here is logged and dropped.
async fn record_event(
    store: &dyn Store,
    attendance: &Attendance,
    event: AttendanceType,
    at: NaiveDateTime,
) {
    let history = NewAttendanceHistory {
        employee_code: attendance.employee_code.clone(),
        attendance_code: attendance.attendance_code.clone(),
        date_attendance: at,
        attendance_type: event,
        description: AttendanceStatus::recorded(event).to_string(),
    };

    if let Err(e) = store.insert_history(&history).await {
        error!(
            error = %e,
            attendance_code = %attendance.attendance_code,
            ?event,
            "Failed to record attendance history"
        );
    }
}

/// Clock in
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = ClockInPayload,
    responses(
        (status = 200, description = "Attendance session opened", body = AttendanceResponse),
        (status = 400, description = "Missing field, malformed time or unknown employee", body = Object, example = json!({
            "error": "invalid format for clock_in, expected YYYY-MM-DD HH:mm:ss"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn clock_in(
    store: web::Data<dyn Store>,
    payload: web::Json<ClockInPayload>,
) -> Result<HttpResponse, ApiError> {
    let employee_code = required(&payload.employee_id, "Employee is required")?;
    let raw_clock_in = required(&payload.clock_in, "Clock In is required")?;
    let clock_in = parse_clock(raw_clock_in, "clock_in")?;
    let store = store.get_ref();

    let attendance = insert_with_next_code(
        CodeKind::Attendance,
        || store.max_attendance_row_id(),
        |code| async move { store.insert_attendance(&code, employee_code, clock_in).await },
    )
    .await
    .map_err(|e| match e {
        StoreError::MissingReference => ApiError::validation("Employee not found"),
        other => other.into(),
    })?;
    info!(
        employee_code,
        attendance_code = %attendance.attendance_code,
        "Clocked in"
    );

    record_event(store, &attendance, AttendanceType::ClockIn, clock_in).await;

    Ok(ok_data(AttendanceResponse::from(attendance)))
}

/// Clock out
///
/// A clock-out earlier than the clock-in is accepted as is.
#[utoipa::path(
    put,
    path = "/api/attendance/{id}",
    params(("id" = String, Path, description = "Attendance code, e.g. ATT-001")),
    request_body = ClockOutPayload,
    responses(
        (status = 200, description = "Attendance session closed", body = AttendanceResponse),
        (status = 400, description = "Missing or malformed clock_out"),
        (status = 404, description = "Attendance not found", body = Object, example = json!({
            "error": "Attendance not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn clock_out(
    store: web::Data<dyn Store>,
    path: web::Path<String>,
    payload: web::Json<ClockOutPayload>,
) -> Result<HttpResponse, ApiError> {
    let attendance_code = path.into_inner();
    let raw_clock_out = required(&payload.clock_out, "Clock Out is required")?;
    let store = store.get_ref();

    let mut attendance = store
        .find_attendance_by_code(&attendance_code)
        .await?
        .ok_or_else(|| ApiError::not_found("Attendance not found"))?;

    let clock_out = parse_clock(raw_clock_out, "clock_out")?;
    store.set_clock_out(attendance.id, clock_out).await?;
    attendance.clock_out = Some(clock_out);
    info!(attendance_code = %attendance_code, "Clocked out");

    record_event(store, &attendance, AttendanceType::ClockOut, clock_out).await;

    Ok(ok_data(AttendanceResponse::from(attendance)))
}

/// Attendance log report
///
/// Descriptions are recomputed from the session's clock times and the
/// department thresholds, so they can differ from what was stored.
#[utoipa::path(
    get,
    path = "/api/attendance/logs",
    params(LogQuery),
    responses(
        (status = 200, description = "Filtered attendance events", body = Object, example = json!({
            "data": [{
                "id": 1,
                "employee_id": "EMP-001",
                "attendance_id": "ATT-001",
                "name": "John Doe",
                "date_attendance": "2024-01-10 09:30:00",
                "attendance_type": 1,
                "description": "Late (Check-in)",
                "department": "Engineering",
                "clock_in": "09:30:00",
                "clock_out": ""
            }]
        })),
        (status = 400, description = "Malformed filter"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn list_logs(
    store: web::Data<dyn Store>,
    query: web::Query<LogQuery>,
) -> Result<HttpResponse, ApiError> {
    let filter = query.to_filter()?;
    debug!(?filter, "Listing attendance logs");

    let rows = store.list_logs(&filter).await?;
    let logs: Vec<AttendanceLogEntry> = rows.into_iter().map(AttendanceLogEntry::from).collect();

    Ok(ok_data(logs))
}

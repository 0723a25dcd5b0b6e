use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[repr(u8)]
pub enum AttendanceType {
    ClockIn = 1,
    ClockOut = 2,
}

impl AttendanceType {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(AttendanceType::ClockIn),
            2 => Some(AttendanceType::ClockOut),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone)]
pub struct NewAttendanceHistory {
    pub employee_code: String,
    pub attendance_code: String,
    pub date_attendance: NaiveDateTime,
    pub attendance_type: AttendanceType,
    pub description: String,
}

/// A history row joined with its employee, department and attendance session.
/// Every joined column is optional: a dangling reference still yields a row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AttendanceLogRow {
    pub id: u64,
    pub employee_code: String,
    pub attendance_code: String,
    pub date_attendance: NaiveDateTime,
    pub attendance_type: u8,
    pub description: String,
    pub employee_name: Option<String>,
    pub department_name: Option<String>,
    pub max_clock_in_time: Option<NaiveTime>,
    pub max_clock_out_time: Option<NaiveTime>,
    pub clock_in: Option<NaiveDateTime>,
    pub clock_out: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogFilter {
    pub date: Option<NaiveDate>,
    pub department_id: Option<u64>,
}

impl LogFilter {
    /// Half-open `[date 00:00:00, date+1 00:00:00)` window.
    pub fn window(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        self.date
            .and_then(|day| day.and_hms_opt(0, 0, 0))
            .map(|start| (start, start + Duration::days(1)))
    }
}

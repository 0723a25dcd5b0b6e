use strum_macros::{AsRefStr, Display};

use crate::model::attendance_history::AttendanceType;

/// Status text shown for a clock event.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Display, AsRefStr)]
pub enum AttendanceStatus {
    #[strum(serialize = "On Time (Check-in)")]
    OnTimeCheckIn,
    #[strum(serialize = "Late (Check-in)")]
    LateCheckIn,
    #[strum(serialize = "On Time (Check-out)")]
    OnTimeCheckOut,
    #[strum(serialize = "Early Leave")]
    EarlyLeave,
}

impl AttendanceStatus {
    /// What gets written to the history row when the event is recorded,
    /// before any threshold is looked at.
    pub fn recorded(event: AttendanceType) -> Self {
        match event {
            AttendanceType::ClockIn => AttendanceStatus::OnTimeCheckIn,
            AttendanceType::ClockOut => AttendanceStatus::OnTimeCheckOut,
        }
    }
}

/// Classifies a clock event against department thresholds.
///
/// All times are `HH:MM:SS` strings and are compared as strings; with zero
/// padding that ordering is the same as the chronological one within a day.
/// Returns `None` when the relevant clock time is missing, in which case the
/// caller keeps the stored description.
pub fn classify(
    event: AttendanceType,
    clock_in: Option<&str>,
    clock_out: Option<&str>,
    max_clock_in: &str,
    max_clock_out: &str,
) -> Option<AttendanceStatus> {
    match event {
        AttendanceType::ClockIn => clock_in.filter(|t| !t.is_empty()).map(|t| {
            if t <= max_clock_in {
                AttendanceStatus::OnTimeCheckIn
            } else {
                AttendanceStatus::LateCheckIn
            }
        }),
        AttendanceType::ClockOut => clock_out.filter(|t| !t.is_empty()).map(|t| {
            if t >= max_clock_out {
                AttendanceStatus::OnTimeCheckOut
            } else {
                AttendanceStatus::EarlyLeave
            }
        }),
    }
}

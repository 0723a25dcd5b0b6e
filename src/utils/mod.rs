pub mod attendance_status;
pub mod identifier;

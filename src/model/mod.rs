pub mod attendance;
pub mod attendance_history;
pub mod department;
pub mod employee;

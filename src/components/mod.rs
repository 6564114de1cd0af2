// Export components
pub mod attendance;
pub mod check_in;
pub mod repository;
pub mod roster;
pub mod work_schedule;

pub use check_in::CheckInCode;
pub use repository::{AttendanceRepository, InMemoryRepository, RecordFilter};

pub mod clock;
pub mod models;
pub mod status;
pub mod summary;
pub mod work_hours;

pub use clock::{apply_clock, available_actions, clock_state, ClockAction, ClockState};
pub use models::{AttendanceEdit, AttendanceRecord, AttendanceStatus, AttendanceTimes};
pub use status::derive_status;
pub use summary::MonthlySummary;
pub use work_hours::calculate_work_hours;

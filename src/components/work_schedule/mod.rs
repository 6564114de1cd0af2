pub mod calendar;
pub mod models;
pub mod recurring;

pub use calendar::{group_by_day, MonthGrid};
pub use models::{RecurringPattern, RecurringRequest, Shift, ShiftUpdate};
pub use recurring::{expand_month, expand_recurring};

pub mod aggregator;
pub mod calendar;
pub mod holiday_calendar;
pub mod resolver;
pub mod time_slot;
pub mod weekly_schedule;

pub use aggregator::*;
pub use calendar::*;
pub use holiday_calendar::*;
pub use resolver::*;
pub use time_slot::*;
pub use weekly_schedule::*;

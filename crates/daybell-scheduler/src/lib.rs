//! # Daybell Scheduler
//!
//! Fires a job once per day at a fixed local wall-clock time.
//!
//! ```text
//! SchedulerEngine
//!   ├── sleep until DailySchedule::next_after(now)
//!   ├── spawn the tick job (ticks never block the timer)
//!   └── repeat until shutdown resolves
//! ```

pub mod engine;
pub mod schedule;

pub use engine::SchedulerEngine;
pub use schedule::DailySchedule;

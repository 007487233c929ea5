//! Shared data types.

pub mod event;
pub mod notification;
pub mod window;

pub use event::{BirthDate, CalendarEvent, ContactBirthday};
pub use notification::{Markup, NotificationKind, NotificationMessage};
pub use window::{Day, DayWindow};

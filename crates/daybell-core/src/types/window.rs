//! Day-granular query windows ("today", "tomorrow").

use chrono::{DateTime, Days, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};

/// Which day a window covers, relative to the tick's date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Day {
    Today,
    Tomorrow,
}

impl Day {
    /// Label used in message headers and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Day::Today => "today",
            Day::Tomorrow => "tomorrow",
        }
    }
}

impl std::fmt::Display for Day {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Window from local midnight to local end-of-day for one calendar date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayWindow {
    pub day: Day,
    pub date: NaiveDate,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl DayWindow {
    /// Window for `day` relative to `today`, in the process-local timezone.
    pub fn local(day: Day, today: NaiveDate) -> Self {
        Self::in_zone(day, today, &Local)
    }

    pub fn in_zone<Tz: TimeZone>(day: Day, today: NaiveDate, tz: &Tz) -> Self {
        let date = match day {
            Day::Today => today,
            Day::Tomorrow => today.checked_add_days(Days::new(1)).unwrap_or(today),
        };

        let start = resolve_local(tz, date.and_time(NaiveTime::MIN));
        let end = resolve_local(
            tz,
            date.and_time(NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN)),
        );

        Self { day, date, start, end }
    }
}

/// Map a wall-clock time to an instant. Folds take the earlier instant;
/// a wall-clock time skipped by DST moves forward one hour.
fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> DateTime<FixedOffset> {
    if let Some(dt) = tz.from_local_datetime(&naive).earliest() {
        return dt.fixed_offset();
    }
    let shifted = naive + chrono::Duration::hours(1);
    match tz.from_local_datetime(&shifted).earliest() {
        Some(dt) => dt.fixed_offset(),
        None => naive.and_utc().fixed_offset(),
    }
}

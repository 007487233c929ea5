//! Daily fire-time computation.

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use daybell_core::error::{DaybellError, Result};

/// Fires every day at `hour:minute` local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailySchedule {
    hour: u32,
    minute: u32,
}

impl DailySchedule {
    pub fn new(hour: u32, minute: u32) -> Result<Self> {
        if hour > 23 || minute > 59 {
            return Err(DaybellError::config(format!(
                "invalid notification time {hour:02}:{minute:02}"
            )));
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    /// First fire time strictly after `now`, in `now`'s timezone.
    pub fn next_after<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> DateTime<Tz> {
        let tz = now.timezone();
        let today = now.date_naive();

        // A DST gap can swallow at most one candidate, so three days always suffice.
        for offset in 0..3 {
            let Some(date) = today.checked_add_days(Days::new(offset)) else {
                break;
            };
            let candidate = self.fire_time(&tz, date);
            if candidate > *now {
                return candidate;
            }
        }

        now.clone() + chrono::Duration::days(1)
    }

    fn fire_time<Tz: TimeZone>(&self, tz: &Tz, date: NaiveDate) -> DateTime<Tz> {
        let time = NaiveTime::from_hms_opt(self.hour, self.minute, 0).unwrap_or(NaiveTime::MIN);
        resolve(tz, date.and_time(time))
    }
}

impl std::fmt::Display for DailySchedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Folds take the earlier instant; a time skipped by DST moves to the first
/// valid instant after the gap.
fn resolve<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    if let Some(dt) = tz.from_local_datetime(&naive).earliest() {
        return dt;
    }
    let mut probe = naive;
    for _ in 0..(4 * 60) {
        probe += chrono::Duration::minutes(1);
        if let Some(dt) = tz.from_local_datetime(&probe).earliest() {
            return dt;
        }
    }
    tz.from_utc_datetime(&naive)
}

//! Scheduler engine: sleeps until the next fire time and spawns the job.

use std::future::Future;

use chrono::{DateTime, Local, TimeZone};

use crate::schedule::DailySchedule;

pub struct SchedulerEngine {
    schedule: DailySchedule,
}

impl SchedulerEngine {
    pub fn new(schedule: DailySchedule) -> Self {
        Self { schedule }
    }

    /// Run until `shutdown` resolves. Each firing spawns `job()` as its own
    /// task, so a slow tick never delays the next one.
    pub async fn run<F, Fut, S>(&self, job: F, shutdown: S)
    where
        F: Fn() -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        tracing::info!("⏰ Scheduler started (daily at {})", self.schedule);

        let mut previous: Option<DateTime<Local>> = None;
        loop {
            let now = Local::now();
            let next = next_fire(&self.schedule, &now, previous.as_ref());
            let wait = (next - now).to_std().unwrap_or_default();
            tracing::info!(
                "⏰ Next check at {} (in {}m)",
                next.format("%Y-%m-%d %H:%M %Z"),
                wait.as_secs() / 60
            );

            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Scheduler stopped");
                    break;
                }
                _ = tokio::time::sleep(wait) => {
                    tracing::debug!("Scheduled tick fired");
                    previous = Some(next);
                    tokio::spawn(job());
                }
            }
        }
    }
}

/// Next fire time after `now`, never at or before the previous one. The wall
/// clock may still read slightly before `previous` once the sleep ends.
fn next_fire<Tz: TimeZone>(
    schedule: &DailySchedule,
    now: &DateTime<Tz>,
    previous: Option<&DateTime<Tz>>,
) -> DateTime<Tz> {
    match previous {
        Some(previous) if previous > now => schedule.next_after(previous),
        _ => schedule.next_after(now),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    #[tokio::test(start_paused = true)]
    async fn test_fires_until_shutdown() {
        let fired = Arc::new(AtomicUsize::new(0));
        let stop = Arc::new(Notify::new());
        let engine = SchedulerEngine::new(DailySchedule::new(9, 0).unwrap());

        let counter = fired.clone();
        let trigger = stop.clone();
        engine
            .run(
                move || {
                    let counter = counter.clone();
                    let trigger = trigger.clone();
                    async move {
                        if counter.fetch_add(1, Ordering::SeqCst) + 1 == 2 {
                            trigger.notify_one();
                        }
                    }
                },
                async move { stop.notified().await },
            )
            .await;

        assert!(fired.load(Ordering::SeqCst) >= 2);
    }

    #[tokio::test]
    async fn test_shutdown_before_first_fire() {
        let fired = Arc::new(AtomicUsize::new(0));
        let engine = SchedulerEngine::new(DailySchedule::new(9, 0).unwrap());

        let counter = fired.clone();
        engine
            .run(
                move || {
                    let counter = counter.clone();
                    async move {
                        counter.fetch_add(1, Ordering::SeqCst);
                    }
                },
                std::future::ready(()),
            )
            .await;

        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    fn at(text: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(text).unwrap()
    }

    #[test]
    fn test_lagging_clock_does_not_refire() {
        let schedule = DailySchedule::new(9, 0).unwrap();
        let previous = at("2024-05-20T09:00:00+03:00");
        let now = at("2024-05-20T08:59:59.900+03:00");

        let next = next_fire(&schedule, &now, Some(&previous));
        assert_eq!(next, at("2024-05-21T09:00:00+03:00"));
    }

    #[test]
    fn test_next_fire_follows_clock_when_ahead() {
        let schedule = DailySchedule::new(9, 0).unwrap();
        let previous = at("2024-05-20T09:00:00+03:00");
        let now = at("2024-05-22T07:00:00+03:00");

        assert_eq!(next_fire(&schedule, &now, Some(&previous)), at("2024-05-22T09:00:00+03:00"));
        assert_eq!(next_fire(&schedule, &now, None), at("2024-05-22T09:00:00+03:00"));
    }
}

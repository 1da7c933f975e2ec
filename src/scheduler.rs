use chrono::{DateTime, Utc};
use std::future::Future;
use std::time::{Duration, UNIX_EPOCH};
use tokio::sync::watch;

/// The first multiple of `interval` since the Unix epoch strictly after `now`.
pub fn next_tick(now: DateTime<Utc>, interval: Duration) -> DateTime<Utc> {
    let interval_ms = (interval.as_millis() as i64).max(1);
    let now_ms = now.timestamp_millis();
    let next_ms = (now_ms.div_euclid(interval_ms) + 1) * interval_ms;
    DateTime::<Utc>::from(UNIX_EPOCH + Duration::from_millis(next_ms.max(0) as u64))
}

/// The tick to wait for after `last_tick`, even if the wall clock has not caught up with it.
pub fn following_tick(
    now: DateTime<Utc>,
    last_tick: Option<DateTime<Utc>>,
    interval: Duration,
) -> DateTime<Utc> {
    let reference = match last_tick {
        Some(last) if last > now => last,
        _ => now,
    };
    next_tick(reference, interval)
}

/// Runs `task` on every `interval` boundary until `cancel` flips to `true`.
///
/// Cancellation is only observed while waiting for the next tick; a running
/// task is always awaited to completion.
pub async fn run<F, Fut>(interval: Duration, mut cancel: watch::Receiver<bool>, mut task: F)
where
    F: FnMut(DateTime<Utc>) -> Fut,
    Fut: Future<Output = ()>,
{
    let mut last_tick = None;
    loop {
        if *cancel.borrow() {
            break;
        }
        let tick = following_tick(Utc::now(), last_tick, interval);
        let wait = (tick - Utc::now()).to_std().unwrap_or(Duration::ZERO);
        tracing::info!(next_tick = %tick, "Waiting for the next scheduled run");

        tokio::select! {
            changed = cancel.changed() => {
                if changed.is_err() || *cancel.borrow() {
                    tracing::info!("Scheduler cancelled before the next run");
                    break;
                }
            }
            _ = tokio::time::sleep(wait) => {
                tracing::info!(tick = %tick, "Running scheduled task");
                task(tick).await;
                last_tick = Some(tick);
            }
        }
    }
}

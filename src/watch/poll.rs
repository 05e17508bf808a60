//! Polling state waiter.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::classify::Error;
use crate::retry::{idle, Deadline};

/// Reload a snapshot until the predicate holds or the deadline is reached.
///
/// Used where no cheap event stream exists (role changes, task state). Each
/// reload produces a fresh snapshot; nothing is mutated in place. When the
/// next sleep would overrun the deadline, [`Error::Timeout`] is raised
/// instead of sleeping.
///
/// # Errors
///
/// [`Error::Timeout`] on deadline expiry, [`Error::Interrupted`] on
/// cancellation mid-sleep, or whatever `reload` itself fails with.
pub async fn wait_until<T, R, Fut, P>(
    interval: Duration,
    cancel: Option<&CancellationToken>,
    deadline: Deadline,
    mut reload: R,
    predicate: P,
) -> Result<T, Error>
where
    R: FnMut() -> Fut,
    Fut: Future<Output = Result<T, Error>>,
    P: Fn(&T) -> bool,
{
    let started = Instant::now();

    loop {
        let snapshot = reload().await?;
        if predicate(&snapshot) {
            return Ok(snapshot);
        }

        if deadline.remaining() < interval {
            return Err(Error::Timeout {
                waited: started.elapsed(),
                last_error: None,
            });
        }

        idle(interval, cancel).await?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn returns_after_third_reload() {
        let reloads = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&reloads);

        let state = wait_until(
            Duration::from_millis(10),
            None,
            Deadline::within(Duration::from_secs(30)),
            || {
                let counter = Arc::clone(&counter);
                async move { Ok(counter.fetch_add(1, Ordering::SeqCst) + 1) }
            },
            |n| *n >= 3,
        )
        .await
        .unwrap();

        assert_eq!(state, 3);
        assert_eq!(reloads.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn times_out_when_deadline_allows_two_intervals() {
        let reloads = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&reloads);
        let interval = Duration::from_millis(50);

        // Room for one sleep only: reload, sleep, reload, then the next
        // sleep would overrun.
        let result = wait_until(
            interval,
            None,
            Deadline::within(interval + interval / 2),
            || {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(0_u32)
                }
            },
            |_| false,
        )
        .await;

        assert!(matches!(result, Err(Error::Timeout { .. })));
        assert_eq!(reloads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn reload_error_propagates_immediately() {
        let result: Result<u32, Error> = wait_until(
            Duration::from_millis(10),
            None,
            Deadline::within(Duration::from_secs(30)),
            || async {
                Err(Error::PermissionDenied {
                    detail: "not a manager".to_string(),
                })
            },
            |_| true,
        )
        .await;

        assert!(matches!(result, Err(Error::PermissionDenied { .. })));
    }

    #[tokio::test]
    async fn already_matching_state_returns_without_sleep() {
        let started = Instant::now();
        let state = wait_until(
            Duration::from_secs(60),
            None,
            Deadline::within(Duration::from_secs(120)),
            || async { Ok(7_u32) },
            |n| *n == 7,
        )
        .await
        .unwrap();

        assert_eq!(state, 7);
        assert!(started.elapsed() < Duration::from_secs(1));
    }
}

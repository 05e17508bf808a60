//! Deadline-bounded retry of transient failures.
//!
//! A [`Deadline`] is an absolute point in time so that nested loops share
//! one effective budget. [`Retry`] wraps a single logical operation: it is
//! always attempted at least once, transient failures are retried on a fixed
//! interval until the deadline, and typed domain errors surface immediately.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::classify::Error;

/// An absolute time bound shared across a retry or convergence loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline(Instant);

impl Deadline {
    /// A deadline the given duration from now.
    #[must_use]
    pub fn within(budget: Duration) -> Self {
        Self(Instant::now() + budget)
    }

    /// A deadline at an absolute instant.
    #[must_use]
    pub fn at(instant: Instant) -> Self {
        Self(instant)
    }

    /// The underlying instant.
    #[must_use]
    pub fn instant(&self) -> Instant {
        self.0
    }

    /// Whether the deadline has passed.
    #[must_use]
    pub fn expired(&self) -> bool {
        Instant::now() >= self.0
    }

    /// Time left before the deadline, zero once passed.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.0.saturating_duration_since(Instant::now())
    }
}

/// Fixed-interval retry policy for transient failures.
#[derive(Debug, Clone, Default)]
pub struct Retry {
    interval: Duration,
    cancel: Option<CancellationToken>,
}

impl Retry {
    /// A policy sleeping `interval` between attempts.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            cancel: None,
        }
    }

    /// Attach a cancellation token checked during every sleep.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// The configured sleep interval.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run one logical operation with retry of transient failures.
    ///
    /// The operation is attempted at least once regardless of the deadline.
    /// A transient failure after the deadline surfaces as [`Error::Timeout`]
    /// carrying the last failure's message; permanent failures surface
    /// immediately without a retry.
    ///
    /// # Errors
    ///
    /// [`Error::Timeout`] once the deadline passes, [`Error::Interrupted`]
    /// if cancelled mid-sleep, or the operation's own permanent error.
    pub async fn retry<T, F, Fut>(&self, deadline: Deadline, mut op: F) -> Result<T, Error>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, Error>>,
    {
        let started = Instant::now();
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            match op().await {
                Ok(value) => {
                    if attempt > 1 {
                        tracing::debug!(attempt, "operation succeeded after retries");
                    }
                    return Ok(value);
                }
                Err(e) if e.is_transient() => {
                    if deadline.expired() {
                        return Err(Error::Timeout {
                            waited: started.elapsed(),
                            last_error: Some(e.to_string()),
                        });
                    }
                    tracing::warn!(
                        attempt,
                        error = %e,
                        retry_in = ?self.interval,
                        "transient failure, retrying"
                    );
                    idle(self.interval, self.cancel.as_ref()).await?;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Sleep for `interval`, aborting early if the token is cancelled.
///
/// # Errors
///
/// Returns [`Error::Interrupted`] when cancelled before the sleep ends.
pub(crate) async fn idle(
    interval: Duration,
    cancel: Option<&CancellationToken>,
) -> Result<(), Error> {
    match cancel {
        Some(token) => {
            tokio::select! {
                biased;

                () = token.cancelled() => Err(Error::Interrupted),
                () = tokio::time::sleep(interval) => Ok(()),
            }
        }
        None => {
            tokio::time::sleep(interval).await;
            Ok(())
        }
    }
}

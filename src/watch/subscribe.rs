//! Event-subscription state waiter.
//!
//! Subscribes to the engine's live event feed and blocks until the watched
//! resource reaches a target state. Every candidate event triggers a fresh
//! authoritative re-query: a resource may pass through an intermediate
//! matching event before settling (a `die` then `start` during a restart),
//! so the feed is only a hint, never the source of truth.

use std::future::Future;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::classify::{Classifier, Error, RuleSet};
use crate::exec::{self, Invocation};
use crate::retry::Deadline;

use super::events;

/// Everything needed to run one event-feed subscription.
#[derive(Debug)]
pub struct Subscription<'a> {
    /// The feed invocation (an `events --format '{{json .}}'` command,
    /// filtered server-side where supported).
    pub invocation: Invocation,
    /// Classifier for a feed that dies with an error.
    pub classifier: &'a Classifier,
    /// Rule table of the watched domain.
    pub rules: &'a RuleSet,
    /// Exit codes the termination signal is documented to produce.
    pub term_exit_codes: &'a [i32],
    /// Optional cancellation for the whole wait.
    pub cancel: Option<CancellationToken>,
}

/// Block until the watched resource satisfies `predicate`.
///
/// If the current snapshot already satisfies it, returns immediately
/// without starting a subprocess. Otherwise the feed runs until an expected
/// terminal action is seen for `subject` and the re-queried state matches;
/// the subprocess is then signalled to terminate and its expected exit code
/// is treated as success.
///
/// # Errors
///
/// [`Error::Timeout`] when the deadline passes, [`Error::Interrupted`] on
/// cancellation, a classified feed error if the subprocess dies, or
/// whatever `reload` fails with.
pub async fn await_state<T, R, Fut, P>(
    sub: Subscription<'_>,
    subject: &str,
    terminal_actions: &[&str],
    mut reload: R,
    predicate: P,
    deadline: Deadline,
) -> Result<T, Error>
where
    R: FnMut() -> Fut,
    Fut: Future<Output = Result<T, Error>>,
    P: Fn(&T) -> bool,
{
    let started = Instant::now();

    let snapshot = reload().await?;
    if predicate(&snapshot) {
        return Ok(snapshot);
    }

    let cancel = sub.cancel.clone().unwrap_or_default();
    let mut child = exec::stream(&sub.invocation)?;

    tracing::debug!(subject, "subscribed to engine event feed");

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => {
                child.terminate();
                let _ = child.finish().await;
                return Err(Error::Interrupted);
            }

            () = tokio::time::sleep_until(deadline.instant()) => {
                child.terminate();
                let _ = child.finish().await;
                return Err(Error::Timeout {
                    waited: started.elapsed(),
                    last_error: None,
                });
            }

            line = child.next_line() => match line? {
                Some(line) => {
                    let Some(record) = events::parse_line(&line) else {
                        continue;
                    };
                    if !record.concerns(subject) {
                        continue;
                    }
                    let action = record.action();
                    if !terminal_actions.contains(&action) {
                        continue;
                    }

                    tracing::debug!(subject, action, "terminal event seen, re-querying state");
                    let snapshot = reload().await?;
                    if predicate(&snapshot) {
                        child.terminate();
                        let result = child.finish().await?;
                        if !result.is_success()
                            && !sub.term_exit_codes.contains(&result.exit_code())
                        {
                            tracing::warn!(
                                exit_code = result.exit_code(),
                                "event feed exited with an unexpected code after termination"
                            );
                        }
                        return Ok(snapshot);
                    }
                    // Intermediate transition; the target state is still ahead.
                }
                None => {
                    // The feed closed on its own. Classify a failure, or
                    // re-check once in case the transition raced the EOF.
                    let result = child.finish().await?;
                    let result = sub.classifier.interpret(sub.rules, result)?;
                    let snapshot = reload().await?;
                    if predicate(&snapshot) {
                        return Ok(snapshot);
                    }
                    return Err(Error::unexpected(result));
                }
            }
        }
    }
}

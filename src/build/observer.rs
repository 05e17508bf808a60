//! Stateful listener for image builds.
//!
//! A build runs long enough that the whole operation may be retried; the
//! observer survives those retries. Each `started` call resets the
//! accumulators so a retried build never mixes output from the previous
//! attempt, then consumes both live streams on their own tasks so the child
//! can never block on a full pipe.

use std::path::PathBuf;

use tokio::process::Child;
use tokio::task::JoinHandle;

use crate::classify::{Classifier, Error, RuleSet};
use crate::exec::{self, CommandResult};

/// Verdict of one completed build attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    /// Exit code zero.
    Passed,
    /// Non-zero exit; carries the full invocation record.
    Failed(CommandResult),
}

/// Observes one build attempt at a time, replayable across retries.
///
/// Lifecycle: [`started`](Self::started) →
/// [`wait_until_completes`](Self::wait_until_completes) →
/// [`outcome`](Self::outcome) → [`completed`](Self::completed), then
/// optionally `started` again for the next attempt.
#[derive(Debug, Default)]
pub struct BuildObserver {
    command: Vec<String>,
    working_dir: PathBuf,
    drains: Option<(JoinHandle<String>, JoinHandle<String>)>,
    child: Option<Child>,
    stdout: String,
    stderr: String,
    exit_code: Option<i32>,
}

impl BuildObserver {
    /// A fresh observer with empty accumulators.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin observing a freshly spawned build process.
    ///
    /// Resets all state from any previous attempt, takes ownership of both
    /// output streams, and starts draining them concurrently.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the child's streams were not piped.
    pub fn started(
        &mut self,
        command: Vec<String>,
        working_dir: PathBuf,
        mut child: Child,
    ) -> Result<(), Error> {
        self.stdout.clear();
        self.stderr.clear();
        self.exit_code = None;
        self.drains = None;
        self.child = None;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::Io(std::io::Error::other("build stdout not piped")))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| Error::Io(std::io::Error::other("build stderr not piped")))?;

        self.command = command;
        self.working_dir = working_dir;
        self.drains = Some((
            tokio::spawn(exec::drain(stdout)),
            tokio::spawn(exec::drain(stderr)),
        ));
        self.child = Some(child);

        Ok(())
    }

    /// Wait for the current attempt to finish.
    ///
    /// Joins both stream drains before reading the exit code: joining
    /// guarantees all buffered output was captured, whereas waiting on the
    /// process alone does not.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if `started` was not called or waiting fails.
    pub async fn wait_until_completes(&mut self) -> Result<(), Error> {
        let (out_task, err_task) = self
            .drains
            .take()
            .ok_or_else(|| Error::Io(std::io::Error::other("observer not started")))?;
        let mut child = self
            .child
            .take()
            .ok_or_else(|| Error::Io(std::io::Error::other("observer not started")))?;

        self.stdout = out_task
            .await
            .map_err(|e| Error::Io(std::io::Error::other(e)))?;
        self.stderr = err_task
            .await
            .map_err(|e| Error::Io(std::io::Error::other(e)))?;

        let status = child.wait().await?;
        self.exit_code = Some(exec::exit_code_of(status));

        Ok(())
    }

    /// Whether the completed attempt passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// The verdict of the completed attempt.
    #[must_use]
    pub fn outcome(&self) -> Option<BuildOutcome> {
        let exit_code = self.exit_code?;
        if exit_code == 0 {
            Some(BuildOutcome::Passed)
        } else {
            Some(BuildOutcome::Failed(CommandResult::new(
                self.command.clone(),
                self.working_dir.clone(),
                self.stdout.clone(),
                self.stderr.clone(),
                exit_code,
            )))
        }
    }

    /// Classify a failed attempt through the build rule table.
    ///
    /// Applies the same noise stripping and pattern matching as any other
    /// operation, so documented quirks (a missing buildx component, an
    /// experimental-only flag) surface as specific errors with remediation
    /// rather than a generic dump.
    #[must_use]
    pub fn diagnose(&self, classifier: &Classifier, rules: &RuleSet) -> Option<Error> {
        match self.outcome()? {
            BuildOutcome::Passed => None,
            // A failed outcome always carries a non-zero exit, so interpret
            // can only return Err here.
            BuildOutcome::Failed(result) => classifier.interpret(rules, result).err(),
        }
    }

    /// Accumulated stdout of the current attempt.
    #[must_use]
    pub fn output(&self) -> &str {
        &self.stdout
    }

    /// Accumulated stderr of the current attempt.
    #[must_use]
    pub fn errors(&self) -> &str {
        &self.stderr
    }

    /// Release any remaining process resources.
    ///
    /// Safe to call at any point; a still-running child is killed.
    pub fn completed(&mut self) {
        if let Some((out_task, err_task)) = self.drains.take() {
            out_task.abort();
            err_task.abort();
        }
        if let Some(mut child) = self.child.take() {
            let _ = child.start_kill();
        }
    }
}

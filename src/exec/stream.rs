//! Streaming execution for long-lived engine subprocesses.

use std::path::PathBuf;

use tokio::io::AsyncBufReadExt;
use tokio::io::{BufReader, Lines};
use tokio::process::{Child, ChildStdout};
use tokio::task::JoinHandle;

use crate::classify::Error;

use super::result::exit_code_of;
use super::{CommandResult, Invocation};

/// Spawn an invocation whose stdout is consumed line by line.
///
/// Stderr is drained in the background so the child can never block on a
/// full pipe while the caller is reading stdout.
///
/// # Errors
///
/// Returns [`Error::Io`] if the process cannot be started.
pub fn stream(invocation: &Invocation) -> Result<StreamingChild, Error> {
    let mut child = super::spawn_piped(invocation)?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| Error::Io(std::io::Error::other("child stdout not piped")))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| Error::Io(std::io::Error::other("child stderr not piped")))?;

    let working_dir = invocation
        .get_working_dir()
        .map_or_else(super::default_working_dir, PathBuf::from);

    Ok(StreamingChild {
        command: invocation.command_line(),
        working_dir,
        lines: BufReader::new(stdout).lines(),
        stderr_task: tokio::spawn(super::drain(stderr)),
        child,
        terminated: false,
    })
}

/// A live engine subprocess whose stdout is read line by line.
#[derive(Debug)]
pub struct StreamingChild {
    command: Vec<String>,
    working_dir: PathBuf,
    lines: Lines<BufReader<ChildStdout>>,
    stderr_task: JoinHandle<String>,
    child: Child,
    terminated: bool,
}

impl StreamingChild {
    /// Read the next stdout line, or `None` once the stream closes.
    ///
    /// Cancel safe: dropping the future mid-read loses no data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] on a read failure.
    pub async fn next_line(&mut self) -> Result<Option<String>, Error> {
        Ok(self.lines.next_line().await?)
    }

    /// Adapt the remaining stdout lines into a stream.
    pub fn line_stream(
        &mut self,
    ) -> impl futures_core::Stream<Item = Result<String, Error>> + '_ {
        futures_util::stream::unfold(&mut self.lines, |lines| async {
            match lines.next_line().await {
                Ok(Some(line)) => Some((Ok(line), lines)),
                Ok(None) => None,
                Err(e) => Some((Err(Error::Io(e)), lines)),
            }
        })
    }

    /// Ask the child to terminate.
    ///
    /// Sends SIGTERM on unix so the child can exit with its documented
    /// termination code; elsewhere falls back to a hard kill. Idempotent.
    pub fn terminate(&mut self) {
        self.terminated = true;

        #[cfg(unix)]
        {
            use nix::sys::signal::{kill, Signal};
            use nix::unistd::Pid;

            if let Some(pid) = self.child.id() {
                let nix_pid = Pid::from_raw(i32::try_from(pid).unwrap_or(i32::MAX));
                let _ = kill(nix_pid, Signal::SIGTERM);
            }
        }

        #[cfg(not(unix))]
        {
            let _ = self.child.start_kill();
        }
    }

    /// Whether [`terminate`](Self::terminate) was requested.
    #[must_use]
    pub fn was_terminated(&self) -> bool {
        self.terminated
    }

    /// Wait for the child to exit and assemble the final result.
    ///
    /// Stdout was consumed line by line and is not replayed here; the
    /// result's stdout field is left empty while stderr carries whatever the
    /// background drain captured.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if waiting on the child fails.
    pub async fn finish(mut self) -> Result<CommandResult, Error> {
        let status = self.child.wait().await?;
        let stderr = match self.stderr_task.await {
            Ok(captured) => captured,
            Err(e) => {
                tracing::warn!(error = %e, "stderr drain task failed");
                String::new()
            }
        };

        Ok(CommandResult::new(
            self.command,
            self.working_dir,
            String::new(),
            stderr,
            exit_code_of(status),
        ))
    }
}

//! Buffered execution of a single engine invocation.

use std::path::PathBuf;
use std::process::Stdio;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, Command};

use crate::classify::Error;

use super::result::exit_code_of;
use super::{CommandResult, Invocation};

/// Spawn an invocation with all three stdio streams piped as needed.
///
/// Stdin is piped only when the invocation carries a payload; the payload
/// itself is written by the caller.
pub(crate) fn spawn_piped(invocation: &Invocation) -> Result<Child, Error> {
    let mut cmd = Command::new(invocation.program());
    cmd.args(invocation.arg_slice())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        // A dropped future must not leave the child running.
        .kill_on_drop(true);

    cmd.stdin(if invocation.stdin_payload().is_some() {
        Stdio::piped()
    } else {
        Stdio::null()
    });

    if let Some(dir) = invocation.get_working_dir() {
        cmd.current_dir(dir);
    }

    tracing::debug!(command = %invocation.command_line().join(" "), "spawning engine command");

    Ok(cmd.spawn()?)
}

/// Run an invocation to completion and capture both output streams.
///
/// Stdout and stderr are drained on two independent tasks; a child that
/// fills one pipe while the reader is blocked on the other would otherwise
/// deadlock. Both drains are joined before the process exit is awaited, so
/// the captured content is complete even when the child exits before its
/// pipe buffers are empty.
///
/// # Errors
///
/// Returns [`Error::Io`] if the process cannot be started or an output
/// stream fails mid-read. Retryability is the retry layer's decision.
pub async fn run(invocation: &Invocation) -> Result<CommandResult, Error> {
    let mut child = spawn_piped(invocation)?;

    if let Some(payload) = invocation.stdin_payload() {
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| Error::Io(std::io::Error::other("child stdin not piped")))?;
        stdin.write_all(payload).await?;
        // Dropping the handle closes the stream so the child sees EOF.
        drop(stdin);
    }

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| Error::Io(std::io::Error::other("child stdout not piped")))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| Error::Io(std::io::Error::other("child stderr not piped")))?;

    let out_task = tokio::spawn(drain(stdout));
    let err_task = tokio::spawn(drain(stderr));

    // Join both drains first; waiting on the process alone does not
    // guarantee the pipe buffers were emptied.
    let stdout = out_task
        .await
        .map_err(|e| Error::Io(std::io::Error::other(e)))?;
    let stderr = err_task
        .await
        .map_err(|e| Error::Io(std::io::Error::other(e)))?;

    let status = child.wait().await?;

    let working_dir = invocation
        .get_working_dir()
        .map_or_else(default_working_dir, PathBuf::from);

    Ok(CommandResult::new(
        invocation.command_line(),
        working_dir,
        stdout,
        stderr,
        exit_code_of(status),
    ))
}

/// Read a stream to the end, tolerating non-UTF-8 output.
pub(crate) async fn drain<R>(mut reader: R) -> String
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    if let Err(e) = reader.read_to_end(&mut buf).await {
        tracing::warn!(error = %e, "output stream ended with an error");
    }
    String::from_utf8_lossy(&buf).into_owned()
}

pub(crate) fn default_working_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

//! Immutable record of one completed engine invocation.

use std::fmt;
use std::path::PathBuf;
use std::process::ExitStatus;

/// Captured inputs and outputs of a single engine process run.
///
/// Constructed once per invocation and never mutated. Besides normal
/// diagnostics this is the payload of the unexpected-response error, which
/// must echo every field verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    command: Vec<String>,
    working_dir: PathBuf,
    stdout: String,
    stderr: String,
    exit_code: i32,
}

impl CommandResult {
    /// Assemble a result from captured process output.
    #[must_use]
    pub fn new(
        command: Vec<String>,
        working_dir: PathBuf,
        stdout: String,
        stderr: String,
        exit_code: i32,
    ) -> Self {
        Self {
            command,
            working_dir,
            stdout,
            stderr,
            exit_code,
        }
    }

    /// The command line that was executed, program first.
    #[must_use]
    pub fn command(&self) -> &[String] {
        &self.command
    }

    /// The directory the process ran in.
    #[must_use]
    pub fn working_dir(&self) -> &PathBuf {
        &self.working_dir
    }

    /// Everything the process wrote to stdout.
    #[must_use]
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    /// Everything the process wrote to stderr.
    #[must_use]
    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    /// The process exit code.
    ///
    /// A signal-terminated process reports `128 + signal` on unix.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    /// Whether the process exited with code zero.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

impl fmt::Display for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "command: {}", self.command.join(" "))?;
        writeln!(f, "working directory: {}", self.working_dir.display())?;
        writeln!(f, "exit code: {}", self.exit_code)?;
        writeln!(f, "stdout: {}", self.stdout)?;
        write!(f, "stderr: {}", self.stderr)
    }
}

/// Map an exit status to a numeric code.
///
/// On unix a signal-terminated process has no exit code; `128 + signal`
/// matches what shells report for the same status.
pub(crate) fn exit_code_of(status: ExitStatus) -> i32 {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    status.code().unwrap_or(-1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CommandResult {
        CommandResult::new(
            vec!["docker".to_string(), "ps".to_string()],
            PathBuf::from("/work"),
            "out".to_string(),
            "err".to_string(),
            1,
        )
    }

    #[test]
    fn display_echoes_every_field() {
        let rendered = sample().to_string();
        assert!(rendered.contains("docker ps"));
        assert!(rendered.contains("/work"));
        assert!(rendered.contains("exit code: 1"));
        assert!(rendered.contains("stdout: out"));
        assert!(rendered.contains("stderr: err"));
    }

    #[test]
    fn success_is_exit_zero_only() {
        assert!(!sample().is_success());
        let ok = CommandResult::new(
            vec!["docker".to_string()],
            PathBuf::from("/"),
            String::new(),
            String::new(),
            0,
        );
        assert!(ok.is_success());
    }
}

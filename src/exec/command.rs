//! Invocation builder for the engine binary.

use std::path::{Path, PathBuf};

/// A fully described invocation of the engine binary.
///
/// Holds the program path, the argument vector, an optional working
/// directory, and an optional stdin payload which is written to the child
/// and then closed before output is awaited.
#[derive(Debug, Clone)]
pub struct Invocation {
    program: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
    stdin: Option<Vec<u8>>,
}

impl Invocation {
    /// Create a new invocation of the given program.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
            stdin: None,
        }
    }

    /// Append a single argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the working directory for the child process.
    #[must_use]
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Provide a payload to write to the child's stdin.
    ///
    /// The stream is closed after the payload is written.
    #[must_use]
    pub fn stdin_bytes(mut self, payload: impl Into<Vec<u8>>) -> Self {
        self.stdin = Some(payload.into());
        self
    }

    /// The program being invoked.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The argument vector, excluding the program itself.
    #[must_use]
    pub fn arg_slice(&self) -> &[String] {
        &self.args
    }

    /// The working directory, if one was set.
    #[must_use]
    pub fn get_working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }

    /// The stdin payload, if one was set.
    #[must_use]
    pub fn stdin_payload(&self) -> Option<&[u8]> {
        self.stdin.as_deref()
    }

    /// The full command line, program first.
    #[must_use]
    pub fn command_line(&self) -> Vec<String> {
        let mut line = Vec::with_capacity(self.args.len() + 1);
        line.push(self.program.clone());
        line.extend(self.args.iter().cloned());
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_leads_with_program() {
        let inv = Invocation::new("docker").args(["container", "ls"]);
        assert_eq!(inv.command_line(), vec!["docker", "container", "ls"]);
    }

    #[test]
    fn arg_appends_in_order() {
        let inv = Invocation::new("docker")
            .arg("events")
            .arg("--format")
            .arg("{{json .}}");
        assert_eq!(inv.arg_slice(), ["events", "--format", "{{json .}}"]);
    }

    #[test]
    fn stdin_payload_is_stored() {
        let inv = Invocation::new("docker").stdin_bytes(b"secret".to_vec());
        assert_eq!(inv.stdin_payload(), Some(b"secret".as_slice()));
    }

    #[test]
    fn working_dir_defaults_to_none() {
        let inv = Invocation::new("docker");
        assert!(inv.get_working_dir().is_none());
    }
}

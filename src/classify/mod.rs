//! Response interpretation.
//!
//! Turns a [`CommandResult`](crate::exec::CommandResult) into either the
//! payload for the operation's success parser or a typed [`Error`]: noise is
//! stripped from stderr, the domain's rule table is walked in priority
//! order, and anything unrecognized falls through to a catch-all error that
//! echoes the complete result.

mod error;
mod noise;
pub mod parse;
mod rules;

pub use error::{Error, ResourceKind};
pub use noise::NoiseFilter;
pub use rules::RuleSet;

use crate::exec::CommandResult;

/// Interprets engine responses against per-domain rule tables.
#[derive(Debug, Default)]
pub struct Classifier {
    noise: NoiseFilter,
}

impl Classifier {
    /// A classifier with the standard noise filter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            noise: NoiseFilter::standard(),
        }
    }

    /// Interpret a completed invocation.
    ///
    /// Exit code zero passes the result through for the operation's success
    /// parser. Anything else is classified against `rules` after noise
    /// stripping; an unrecognized response becomes [`Error::Unexpected`]
    /// with the full result attached.
    ///
    /// # Errors
    ///
    /// Returns the classified [`Error`] for any non-zero exit.
    pub fn interpret(
        &self,
        rules: &RuleSet,
        result: CommandResult,
    ) -> Result<CommandResult, Error> {
        if result.is_success() {
            return Ok(result);
        }

        let cleaned = self.noise.strip(result.stderr());
        if let Some(err) = rules.classify(&cleaned) {
            tracing::debug!(
                domain = rules.domain(),
                exit_code = result.exit_code(),
                error = %err,
                "classified engine error"
            );
            return Err(err);
        }

        tracing::warn!(
            domain = rules.domain(),
            exit_code = result.exit_code(),
            "engine response matched no registered rule"
        );
        Err(Error::unexpected(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn failure(stderr: &str) -> CommandResult {
        CommandResult::new(
            vec!["docker".to_string(), "rm".to_string(), "abc123".to_string()],
            PathBuf::from("/"),
            String::new(),
            stderr.to_string(),
            1,
        )
    }

    #[test]
    fn success_passes_through() {
        let classifier = Classifier::new();
        let result = CommandResult::new(
            vec!["docker".to_string(), "ps".to_string()],
            PathBuf::from("/"),
            "{}".to_string(),
            String::new(),
            0,
        );
        let passed = classifier
            .interpret(&RuleSet::containers(), result.clone())
            .unwrap();
        assert_eq!(passed, result);
    }

    #[test]
    fn noise_prefixed_error_classifies_like_bare_error() {
        let classifier = Classifier::new();
        let rules = RuleSet::containers();

        let noisy = failure(
            "WARNING: Error loading config file: /root/.docker/config.json\n\
             Error response from daemon: No such container: abc123",
        );
        let bare = failure("Error response from daemon: No such container: abc123");

        let noisy_err = classifier.interpret(&rules, noisy).unwrap_err();
        let bare_err = classifier.interpret(&rules, bare).unwrap_err();

        match (noisy_err, bare_err) {
            (Error::NotFound { id: a, .. }, Error::NotFound { id: b, .. }) => {
                assert_eq!(a, "abc123");
                assert_eq!(a, b);
            }
            other => panic!("expected matching NotFound errors, got {other:?}"),
        }
    }

    #[test]
    fn unknown_text_carries_full_result() {
        let classifier = Classifier::new();
        let result = failure("some unrecognized daemon error");
        let err = classifier
            .interpret(&RuleSet::containers(), result)
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("docker rm abc123"));
        assert!(message.contains("exit code: 1"));
        assert!(message.contains("some unrecognized daemon error"));
    }
}

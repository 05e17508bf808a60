//! Client configuration types.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tunable settings for the client.
///
/// The expected termination exit codes are configuration rather than a
/// constant: the code a signalled subprocess reports is tool- and
/// platform-specific.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Path or name of the engine binary.
    pub binary: String,
    /// Context to prepend to every invocation, when set.
    pub context: Option<String>,
    /// Sleep between retries of transient failures, in milliseconds.
    pub retry_interval_ms: u64,
    /// Sleep between polling reloads, in milliseconds.
    pub poll_interval_ms: u64,
    /// Exit codes a terminated event-feed subprocess is expected to report.
    pub term_exit_codes: Vec<i32>,
}

impl ClientConfig {
    /// The retry sleep as a duration.
    #[must_use]
    pub fn retry_interval(&self) -> Duration {
        Duration::from_millis(self.retry_interval_ms)
    }

    /// The polling sleep as a duration.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

fn default_binary() -> String {
    "docker".to_string()
}

fn default_retry_interval_ms() -> u64 {
    1_000
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_term_exit_codes() -> Vec<i32> {
    // 128+SIGTERM and 128+SIGINT, the codes the engine CLI reports when its
    // event feed is asked to stop.
    vec![143, 130]
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            context: None,
            retry_interval_ms: default_retry_interval_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            term_exit_codes: default_term_exit_codes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = ClientConfig::default();
        assert_eq!(config.binary, "docker");
        assert_eq!(config.retry_interval(), Duration::from_secs(1));
        assert!(config.term_exit_codes.contains(&143));
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: ClientConfig = toml::from_str("binary = \"podman\"").unwrap();
        assert_eq!(config.binary, "podman");
        assert_eq!(config.poll_interval_ms, 500);
    }
}

//! Stripping of known-benign stderr noise.
//!
//! The engine CLI routes a handful of harmless diagnostics to stderr where
//! they would otherwise shadow the real error line. These are removed before
//! classification; stripping never changes how the exit code is interpreted.

use regex::Regex;

/// Line-based filter for benign stderr artifacts.
#[derive(Debug)]
pub struct NoiseFilter {
    patterns: Vec<Regex>,
}

impl NoiseFilter {
    /// The standard set of known noise lines.
    #[must_use]
    pub fn standard() -> Self {
        let patterns = [
            // Misrouted config warning, emitted when ~/.docker/config.json
            // is malformed or uses a legacy format.
            r"^WARNING: Error loading config file",
            // Flag deprecation notices accompany otherwise successful runs.
            r"has been deprecated",
            // Legacy-builder banner printed by recent CLIs on every build.
            r"^DEPRECATED: The legacy builder is deprecated",
            // Podman's compatibility shim announces itself on stderr.
            r"^Emulate Docker CLI using podman",
            // Credential-store advice after interactive login.
            r"^WARNING! Your (password|credentials)",
            // Daemon-side warning lines forwarded verbatim.
            r#"^time=".*" level=warning"#,
        ]
        .iter()
        .map(|p| Regex::new(p).expect("noise patterns are statically valid"))
        .collect();

        Self { patterns }
    }

    /// Remove every line matching a noise pattern.
    ///
    /// Noise and real errors are assumed non-overlapping, so removal order
    /// does not matter.
    #[must_use]
    pub fn strip(&self, stderr: &str) -> String {
        stderr
            .lines()
            .filter(|line| !self.patterns.iter().any(|p| p.is_match(line)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for NoiseFilter {
    fn default() -> Self {
        Self::standard()
    }
}

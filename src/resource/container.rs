//! Container snapshots.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One line of `container ls --format '{{json .}}'`.
#[derive(Debug, Clone, Deserialize)]
pub struct Container {
    /// Short container id.
    #[serde(rename = "ID")]
    pub id: String,
    /// Comma-separated container names.
    #[serde(rename = "Names", default)]
    pub names: String,
    /// Image reference the container was created from.
    #[serde(rename = "Image", default)]
    pub image: String,
    /// Lifecycle state (`created`, `running`, `exited`, ...).
    #[serde(rename = "State", default)]
    pub state: String,
    /// Human-readable status line.
    #[serde(rename = "Status", default)]
    pub status: String,
    /// Command the container runs.
    #[serde(rename = "Command", default)]
    pub command: String,
    /// Comma-separated `key=value` labels.
    #[serde(rename = "Labels", default)]
    pub labels: String,
}

impl Container {
    /// Whether the container is currently running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == "running"
    }

    /// Look up a label by key.
    #[must_use]
    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels.split(',').find_map(|pair| {
            let (k, v) = pair.split_once('=')?;
            (k == key).then_some(v)
        })
    }
}

/// Detailed state from `container inspect`.
#[derive(Debug, Clone, Deserialize)]
pub struct ContainerDetail {
    /// Full container id.
    #[serde(rename = "Id")]
    pub id: String,
    /// Name with its leading slash.
    #[serde(rename = "Name", default)]
    pub name: String,
    /// Creation time.
    #[serde(rename = "Created")]
    pub created: DateTime<Utc>,
    /// Runtime state.
    #[serde(rename = "State")]
    pub state: ContainerState,
    /// Image digest the container was created from.
    #[serde(rename = "Image", default)]
    pub image: String,
    /// Creation-time configuration.
    #[serde(rename = "Config", default)]
    pub config: ContainerConfig,
}

impl ContainerDetail {
    /// The container name without the leading slash.
    #[must_use]
    pub fn plain_name(&self) -> &str {
        self.name.strip_prefix('/').unwrap_or(&self.name)
    }
}

/// The `State` block of an inspected container.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContainerState {
    /// Lifecycle state string.
    #[serde(rename = "Status", default)]
    pub status: String,
    /// Whether the process is running.
    #[serde(rename = "Running", default)]
    pub running: bool,
    /// Exit code of the last run.
    #[serde(rename = "ExitCode", default)]
    pub exit_code: i32,
    /// Last start time, if any.
    #[serde(rename = "StartedAt", default)]
    pub started_at: Option<DateTime<Utc>>,
    /// Last stop time, if any.
    #[serde(rename = "FinishedAt", default)]
    pub finished_at: Option<DateTime<Utc>>,
}

/// The `Config` block of an inspected container.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContainerConfig {
    /// Image reference as given at creation.
    #[serde(rename = "Image", default)]
    pub image: String,
    /// Labels as a map.
    #[serde(rename = "Labels", default)]
    pub labels: Option<HashMap<String, String>>,
}

//! Service and task snapshots.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One line of `service ls --format '{{json .}}'`.
#[derive(Debug, Clone, Deserialize)]
pub struct Service {
    /// Service id.
    #[serde(rename = "ID")]
    pub id: String,
    /// Service name.
    #[serde(rename = "Name")]
    pub name: String,
    /// Scheduling mode (`replicated`, `global`).
    #[serde(rename = "Mode", default)]
    pub mode: String,
    /// Replica summary, e.g. `3/3`.
    #[serde(rename = "Replicas", default)]
    pub replicas: String,
    /// Image reference the service runs.
    #[serde(rename = "Image", default)]
    pub image: String,
}

/// Detailed state from `service inspect`.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceDetail {
    /// Full service id.
    #[serde(rename = "ID")]
    pub id: String,
    /// Desired configuration.
    #[serde(rename = "Spec")]
    pub spec: ServiceSpec,
    /// Creation time.
    #[serde(rename = "CreatedAt")]
    pub created_at: DateTime<Utc>,
    /// Last update time.
    #[serde(rename = "UpdatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// The `Spec` block of an inspected service.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceSpec {
    /// Service name.
    #[serde(rename = "Name", default)]
    pub name: String,
}

/// The task states a waiter can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Running,
    Complete,
    Shutdown,
    Failed,
}

impl TaskState {
    /// The label the engine prefixes `CurrentState` with.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Running => "Running",
            Self::Complete => "Complete",
            Self::Shutdown => "Shutdown",
            Self::Failed => "Failed",
        }
    }
}

/// One line of `service ps --format '{{json .}}'`.
#[derive(Debug, Clone, Deserialize)]
pub struct Task {
    /// Task id.
    #[serde(rename = "ID")]
    pub id: String,
    /// Slot name, e.g. `web.1`.
    #[serde(rename = "Name", default)]
    pub name: String,
    /// Node the task is placed on.
    #[serde(rename = "Node", default)]
    pub node: String,
    /// Desired state.
    #[serde(rename = "DesiredState", default)]
    pub desired_state: String,
    /// Current state with age, e.g. `Running 5 minutes ago`.
    #[serde(rename = "CurrentState", default)]
    pub current_state: String,
    /// Scheduling error, if any.
    #[serde(rename = "Error", default)]
    pub error: String,
}

impl Task {
    /// Whether the task's current state matches the target.
    #[must_use]
    pub fn is_in_state(&self, state: TaskState) -> bool {
        self.current_state.starts_with(state.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_state_matching_ignores_age_suffix() {
        let line = r#"{"ID":"t1","Name":"web.1","Node":"worker-1","DesiredState":"Running","CurrentState":"Running 5 minutes ago","Error":""}"#;
        let task: Task = serde_json::from_str(line).unwrap();
        assert!(task.is_in_state(TaskState::Running));
        assert!(!task.is_in_state(TaskState::Failed));
    }

    #[test]
    fn service_detail_decodes() {
        let body = r#"{"ID":"s1","Spec":{"Name":"web"},"CreatedAt":"2026-08-01T10:00:00Z","UpdatedAt":"2026-08-02T10:00:00Z"}"#;
        let service: ServiceDetail = serde_json::from_str(body).unwrap();
        assert_eq!(service.spec.name, "web");
        assert!(service.updated_at > service.created_at);
    }
}

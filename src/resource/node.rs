//! Swarm node snapshots.

use serde::Deserialize;

/// A node's cluster role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    Manager,
    Worker,
}

impl NodeRole {
    /// The label the engine uses for this role.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Manager => "manager",
            Self::Worker => "worker",
        }
    }
}

/// One line of `node ls --format '{{json .}}'`.
#[derive(Debug, Clone, Deserialize)]
pub struct Node {
    /// Node id.
    #[serde(rename = "ID")]
    pub id: String,
    /// Node hostname.
    #[serde(rename = "Hostname", default)]
    pub hostname: String,
    /// Engine-reported status (`Ready`, `Down`).
    #[serde(rename = "Status", default)]
    pub status: String,
    /// Scheduling availability (`Active`, `Pause`, `Drain`).
    #[serde(rename = "Availability", default)]
    pub availability: String,
    /// Manager standing (`Leader`, `Reachable`, empty for workers).
    #[serde(rename = "ManagerStatus", default)]
    pub manager_status: String,
}

/// Detailed state from `node inspect`.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeDetail {
    /// Full node id.
    #[serde(rename = "ID")]
    pub id: String,
    /// Desired configuration.
    #[serde(rename = "Spec")]
    pub spec: NodeSpec,
    /// Observed status.
    #[serde(rename = "Status")]
    pub status: NodeStatus,
    /// Present only on managers.
    #[serde(rename = "ManagerStatus", default)]
    pub manager_status: Option<ManagerStatus>,
}

impl NodeDetail {
    /// The node's current role, when recognizable.
    #[must_use]
    pub fn role(&self) -> Option<NodeRole> {
        match self.spec.role.as_str() {
            "manager" => Some(NodeRole::Manager),
            "worker" => Some(NodeRole::Worker),
            _ => None,
        }
    }
}

/// The `Spec` block of an inspected node.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeSpec {
    /// Assigned role (`manager`, `worker`).
    #[serde(rename = "Role", default)]
    pub role: String,
    /// Scheduling availability.
    #[serde(rename = "Availability", default)]
    pub availability: String,
}

/// The `Status` block of an inspected node.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeStatus {
    /// Liveness state (`ready`, `down`).
    #[serde(rename = "State", default)]
    pub state: String,
    /// Advertised address.
    #[serde(rename = "Addr", default)]
    pub addr: String,
}

/// Manager-only standing of an inspected node.
#[derive(Debug, Clone, Deserialize)]
pub struct ManagerStatus {
    /// Whether this manager is the raft leader.
    #[serde(rename = "Leader", default)]
    pub leader: bool,
    /// Raft reachability.
    #[serde(rename = "Reachability", default)]
    pub reachability: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_exposes_role() {
        let body = r#"{"ID":"n1","Spec":{"Role":"manager","Availability":"active"},"Status":{"State":"ready","Addr":"10.0.0.5"},"ManagerStatus":{"Leader":true,"Reachability":"reachable"}}"#;
        let node: NodeDetail = serde_json::from_str(body).unwrap();
        assert_eq!(node.role(), Some(NodeRole::Manager));
        assert!(node.manager_status.unwrap().leader);
    }

    #[test]
    fn worker_has_no_manager_status() {
        let body = r#"{"ID":"n2","Spec":{"Role":"worker","Availability":"active"},"Status":{"State":"ready","Addr":"10.0.0.6"}}"#;
        let node: NodeDetail = serde_json::from_str(body).unwrap();
        assert_eq!(node.role(), Some(NodeRole::Worker));
        assert!(node.manager_status.is_none());
    }
}

//! Swarm membership snapshot.

use serde::Deserialize;

/// The `Swarm` block of `info --format '{{json .Swarm}}'`.
#[derive(Debug, Clone, Deserialize)]
pub struct SwarmInfo {
    /// This node's id, empty when not in a swarm.
    #[serde(rename = "NodeID", default)]
    pub node_id: String,
    /// Membership state (`active`, `inactive`, `pending`).
    #[serde(rename = "LocalNodeState", default)]
    pub local_node_state: String,
    /// Whether this node can run cluster-management commands.
    #[serde(rename = "ControlAvailable", default)]
    pub control_available: bool,
}

impl SwarmInfo {
    /// Whether the node is an active swarm member.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.local_node_state == "active"
    }

    /// Whether the node is an active manager.
    #[must_use]
    pub fn is_manager(&self) -> bool {
        self.is_active() && self.control_available
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manager_detection() {
        let body = r#"{"NodeID":"n1","LocalNodeState":"active","ControlAvailable":true}"#;
        let info: SwarmInfo = serde_json::from_str(body).unwrap();
        assert!(info.is_manager());
    }

    #[test]
    fn inactive_node_is_not_manager() {
        let body = r#"{"NodeID":"","LocalNodeState":"inactive","ControlAvailable":false}"#;
        let info: SwarmInfo = serde_json::from_str(body).unwrap();
        assert!(!info.is_active());
        assert!(!info.is_manager());
    }
}

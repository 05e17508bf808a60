//! Network snapshots.

use std::collections::HashMap;

use serde::Deserialize;

/// One line of `network ls --format '{{json .}}'`.
#[derive(Debug, Clone, Deserialize)]
pub struct Network {
    /// Network id.
    #[serde(rename = "ID")]
    pub id: String,
    /// Network name.
    #[serde(rename = "Name")]
    pub name: String,
    /// Driver (`bridge`, `overlay`, ...).
    #[serde(rename = "Driver", default)]
    pub driver: String,
    /// Scope (`local`, `swarm`).
    #[serde(rename = "Scope", default)]
    pub scope: String,
}

/// Detailed state from `network inspect`.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkDetail {
    /// Full network id.
    #[serde(rename = "Id")]
    pub id: String,
    /// Network name.
    #[serde(rename = "Name")]
    pub name: String,
    /// Driver name.
    #[serde(rename = "Driver", default)]
    pub driver: String,
    /// Attached containers by id.
    #[serde(rename = "Containers", default)]
    pub containers: HashMap<String, NetworkEndpoint>,
}

/// One attached container inside an inspected network.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkEndpoint {
    /// Container name.
    #[serde(rename = "Name", default)]
    pub name: String,
    /// Assigned IPv4 address with prefix length.
    #[serde(rename = "IPv4Address", default)]
    pub ipv4_address: String,
}

//! CLI context snapshots.

use std::collections::HashMap;

use serde::Deserialize;

/// One line of `context ls --format '{{json .}}'`.
#[derive(Debug, Clone, Deserialize)]
pub struct Context {
    /// Context name.
    #[serde(rename = "Name")]
    pub name: String,
    /// Whether this is the active context.
    #[serde(rename = "Current", default)]
    pub current: bool,
    /// Engine endpoint the context points at.
    #[serde(rename = "DockerEndpoint", default)]
    pub docker_endpoint: String,
    /// Free-form description.
    #[serde(rename = "Description", default)]
    pub description: String,
}

/// Detailed state from `context inspect`.
#[derive(Debug, Clone, Deserialize)]
pub struct ContextDetail {
    /// Context name.
    #[serde(rename = "Name")]
    pub name: String,
    /// Configured endpoints by kind.
    #[serde(rename = "Endpoints", default)]
    pub endpoints: HashMap<String, ContextEndpoint>,
}

/// One endpoint of an inspected context.
#[derive(Debug, Clone, Deserialize)]
pub struct ContextEndpoint {
    /// Endpoint address.
    #[serde(rename = "Host", default)]
    pub host: String,
}

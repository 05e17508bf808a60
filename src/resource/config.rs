//! Cluster config snapshots.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One line of `config ls --format '{{json .}}'`.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigRecord {
    /// Config id.
    #[serde(rename = "ID")]
    pub id: String,
    /// Config name.
    #[serde(rename = "Name")]
    pub name: String,
    /// Creation time as printed by the CLI.
    #[serde(rename = "CreatedAt", default)]
    pub created_at: String,
}

/// Detailed state from `config inspect`.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigDetail {
    /// Full config id.
    #[serde(rename = "ID")]
    pub id: String,
    /// Creation time.
    #[serde(rename = "CreatedAt")]
    pub created_at: DateTime<Utc>,
    /// Desired configuration including the payload.
    #[serde(rename = "Spec")]
    pub spec: ConfigSpec,
}

/// The `Spec` block of an inspected config.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigSpec {
    /// Config name.
    #[serde(rename = "Name", default)]
    pub name: String,
    /// Base64-encoded payload.
    #[serde(rename = "Data", default)]
    pub data: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_decodes_payload() {
        let body = r#"{"ID":"c1","CreatedAt":"2026-08-01T10:00:00Z","Spec":{"Name":"app.toml","Data":"aGVsbG8="}}"#;
        let config: ConfigDetail = serde_json::from_str(body).unwrap();
        assert_eq!(config.spec.name, "app.toml");
        assert_eq!(config.spec.data, "aGVsbG8=");
    }
}

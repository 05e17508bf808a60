//! Image snapshots.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One line of `image ls --format '{{json .}}'`.
#[derive(Debug, Clone, Deserialize)]
pub struct Image {
    /// Image id.
    #[serde(rename = "ID")]
    pub id: String,
    /// Repository name, `<none>` for danglers.
    #[serde(rename = "Repository", default)]
    pub repository: String,
    /// Tag, `<none>` for danglers.
    #[serde(rename = "Tag", default)]
    pub tag: String,
    /// Human-readable size.
    #[serde(rename = "Size", default)]
    pub size: String,
}

impl Image {
    /// `repository:tag`, when both are present.
    #[must_use]
    pub fn reference(&self) -> Option<String> {
        if self.repository == "<none>" || self.tag == "<none>" {
            None
        } else {
            Some(format!("{}:{}", self.repository, self.tag))
        }
    }
}

/// Detailed state from `image inspect`.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageDetail {
    /// Full image digest.
    #[serde(rename = "Id")]
    pub id: String,
    /// All references pointing at this image.
    #[serde(rename = "RepoTags", default)]
    pub repo_tags: Vec<String>,
    /// Build time.
    #[serde(rename = "Created")]
    pub created: DateTime<Utc>,
    /// Size in bytes.
    #[serde(rename = "Size", default)]
    pub size: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_record_decodes() {
        let line = r#"{"ID":"1a2b3c","Repository":"nginx","Tag":"1.27","Size":"188MB"}"#;
        let image: Image = serde_json::from_str(line).unwrap();
        assert_eq!(image.reference().unwrap(), "nginx:1.27");
    }

    #[test]
    fn dangling_image_has_no_reference() {
        let line = r#"{"ID":"1a2b3c","Repository":"<none>","Tag":"<none>","Size":"10MB"}"#;
        let image: Image = serde_json::from_str(line).unwrap();
        assert!(image.reference().is_none());
    }
}

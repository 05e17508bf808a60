//! Records from the engine's live event feed.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// The resource an event refers to.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventActor {
    /// Full identifier of the subject resource.
    #[serde(rename = "ID", default)]
    pub id: String,
    /// Free-form attributes (name, image, exit code, ...).
    #[serde(rename = "Attributes", default)]
    pub attributes: HashMap<String, String>,
}

/// One line of `events --format '{{json .}}'`.
///
/// Consumed transiently while waiting for a state change; never persisted.
/// Older engines duplicate the subject id and action into top-level
/// `id`/`status` fields, which are kept as fallbacks.
#[derive(Debug, Clone, Deserialize)]
pub struct EventRecord {
    /// Event category (`container`, `network`, ...).
    #[serde(rename = "Type", default)]
    pub kind: String,
    /// What happened (`start`, `die`, `destroy`, ...).
    #[serde(rename = "Action", default)]
    pub action: String,
    /// The subject resource.
    #[serde(rename = "Actor", default)]
    pub actor: EventActor,
    /// Unix timestamp in seconds.
    #[serde(rename = "time", default)]
    pub time: i64,
    /// Legacy action field.
    #[serde(default)]
    pub status: Option<String>,
    /// Legacy subject field.
    #[serde(default)]
    pub id: Option<String>,
}

impl EventRecord {
    /// The subject identifier, preferring the modern actor field.
    #[must_use]
    pub fn subject(&self) -> &str {
        if self.actor.id.is_empty() {
            self.id.as_deref().unwrap_or("")
        } else {
            &self.actor.id
        }
    }

    /// The action, preferring the modern field.
    #[must_use]
    pub fn action(&self) -> &str {
        if self.action.is_empty() {
            self.status.as_deref().unwrap_or("")
        } else {
            &self.action
        }
    }

    /// Whether this event concerns the given resource.
    ///
    /// Matches the full identifier, an identifier prefix (events carry the
    /// long form while callers often hold the short one), or the subject's
    /// name attribute.
    #[must_use]
    pub fn concerns(&self, wanted: &str) -> bool {
        let subject = self.subject();
        if subject == wanted || (!wanted.is_empty() && subject.starts_with(wanted)) {
            return true;
        }
        self.actor
            .attributes
            .get("name")
            .is_some_and(|name| name == wanted)
    }

    /// The event time, when representable.
    #[must_use]
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.time, 0)
    }
}

/// Decode one feed line, logging and skipping anything malformed.
#[must_use]
pub fn parse_line(line: &str) -> Option<EventRecord> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str(trimmed) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::warn!(line = %trimmed, error = %e, "skipping malformed event line");
            None
        }
    }
}

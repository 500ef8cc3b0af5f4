use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

/// Classification tag on an event. Carries no scheduling behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Normal,
    Important,
    Critical,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Normal, Priority::Important, Priority::Critical];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Normal => "normal",
            Priority::Important => "important",
            Priority::Critical => "critical",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown priority '{0}'")]
pub struct UnknownPriority(pub String);

impl FromStr for Priority {
    type Err = UnknownPriority;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(Priority::Normal),
            "important" => Ok(Priority::Important),
            "critical" => Ok(Priority::Critical),
            other => Err(UnknownPriority(other.to_string())),
        }
    }
}

/// A persisted calendar entry, as read back from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub id: String,
    pub title: String,
    pub start: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl EventRecord {
    /// Builds the record a store returns after accepting `draft`.
    pub fn from_draft(id: impl Into<String>, draft: EventDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: draft.title,
            start: draft.start,
            end: draft.end,
            description: draft.description,
            priority: draft.priority,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    /// Applies confirmed changes in place. Store timestamps are left alone.
    pub fn apply(&mut self, patch: &EventPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(start) = &patch.start {
            self.start = start.clone();
        }
        if let Some(end) = &patch.end {
            self.end = end.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
    }
}

/// Write payload for a new event. Produced only by validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDraft {
    pub title: String,
    pub start: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Priority,
}

/// Partial update. `Some(None)` on `end`/`description` clears the field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPatch {
    pub title: Option<String>,
    pub start: Option<String>,
    pub end: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub priority: Option<Priority>,
}

impl EventPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.start.is_none()
            && self.end.is_none()
            && self.description.is_none()
            && self.priority.is_none()
    }
}

impl From<EventDraft> for EventPatch {
    fn from(draft: EventDraft) -> Self {
        Self {
            title: Some(draft.title),
            start: Some(draft.start),
            end: Some(draft.end),
            description: Some(draft.description),
            priority: Some(draft.priority),
        }
    }
}

/// Row shape of the `events` table.
#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub start_at: String,
    pub end_at: Option<String>,
    pub description: Option<String>,
    pub priority: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<EventRow> for EventRecord {
    type Error = UnknownPriority;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id.to_string(),
            priority: row.priority.parse()?,
            title: row.title,
            start: row.start_at,
            end: row.end_at,
            description: row.description,
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> EventRecord {
        EventRecord {
            id: "e1".into(),
            title: "Standup".into(),
            start: "2024-03-04T09:00:00".into(),
            end: Some("2024-03-04T09:15:00".into()),
            description: Some("daily".into()),
            priority: Priority::Normal,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_priority_parses_lowercase_names() {
        assert_eq!("critical".parse::<Priority>(), Ok(Priority::Critical));
        let err = "Critical".parse::<Priority>().unwrap_err();
        assert_eq!(err.to_string(), "unknown priority 'Critical'");
        assert_eq!(Priority::default(), Priority::Normal);
    }

    #[test]
    fn test_record_uses_camel_case_and_defaults_priority() {
        let json = serde_json::json!({
            "id": "abc",
            "title": "Sync",
            "start": "2024-01-01T09:00:00",
            "createdAt": "2024-01-01T08:00:00Z"
        });
        let parsed: EventRecord = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.priority, Priority::Normal);
        assert!(parsed.created_at.is_some());
        assert!(parsed.end.is_none());

        let out = serde_json::to_value(&parsed).unwrap();
        assert!(out.get("createdAt").is_some());
        assert!(out.get("description").is_none());
    }

    #[test]
    fn test_apply_patch_clears_optional_fields() {
        let mut event = record();
        event.apply(&EventPatch {
            title: Some("Retro".into()),
            end: Some(None),
            description: Some(None),
            priority: Some(Priority::Important),
            ..Default::default()
        });
        assert_eq!(event.title, "Retro");
        assert_eq!(event.start, "2024-03-04T09:00:00");
        assert!(event.end.is_none());
        assert!(event.description.is_none());
        assert_eq!(event.priority, Priority::Important);
    }

    #[test]
    fn test_row_with_unknown_priority_is_rejected() {
        let row = EventRow {
            id: Uuid::new_v4(),
            user_id: "u1".into(),
            title: "x".into(),
            start_at: "2024-01-01T00:00:00".into(),
            end_at: None,
            description: None,
            priority: "urgent".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(
            EventRecord::try_from(row),
            Err(UnknownPriority("urgent".into()))
        );
    }
}

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::models::event::{EventRecord, Priority};

/// Priority selector of the list view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PriorityFilter {
    #[default]
    All,
    Only(Priority),
}

impl PriorityFilter {
    pub fn matches(&self, priority: Priority) -> bool {
        match self {
            PriorityFilter::All => true,
            PriorityFilter::Only(wanted) => *wanted == priority,
        }
    }
}

impl FromStr for PriorityFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "all" => Ok(PriorityFilter::All),
            other => other
                .parse::<Priority>()
                .map(PriorityFilter::Only)
                .map_err(|e| e.to_string()),
        }
    }
}

impl fmt::Display for PriorityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriorityFilter::All => f.write_str("all"),
            PriorityFilter::Only(p) => write!(f, "{}", p),
        }
    }
}

impl Serialize for PriorityFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PriorityFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Search text plus priority selector, as typed into the list view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub priority: PriorityFilter,
}

impl EventQuery {
    pub fn matches(&self, event: &EventRecord) -> bool {
        self.priority.matches(event.priority) && matches_search(event, &self.search.to_lowercase())
    }

    pub fn apply<'a>(&self, events: &'a [EventRecord]) -> Vec<&'a EventRecord> {
        let needle = self.search.to_lowercase();
        events
            .iter()
            .filter(|event| self.priority.matches(event.priority) && matches_search(event, &needle))
            .collect()
    }
}

fn matches_search(event: &EventRecord, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    event.title.to_lowercase().contains(needle)
        || event
            .description
            .as_deref()
            .unwrap_or_default()
            .to_lowercase()
            .contains(needle)
}

/// Visible subset of `events`, in input order.
pub fn filter_events(
    events: &[EventRecord],
    search: &str,
    priority: PriorityFilter,
) -> Vec<EventRecord> {
    EventQuery {
        search: search.to_string(),
        priority,
    }
    .apply(events)
    .into_iter()
    .cloned()
    .collect()
}

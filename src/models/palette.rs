//! Single lookup table for how each priority is drawn.
//!
//! The calendar grid and the list view both read from here so that a
//! priority never renders with two different colors.

use serde::Serialize;

use crate::models::event::Priority;
use crate::utils::locale::Locale;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityStyle {
    pub background: &'static str,
    pub border: &'static str,
    pub text: &'static str,
    pub icon: &'static str,
}

const NORMAL: PriorityStyle = PriorityStyle {
    background: "#10b981",
    border: "#059669",
    text: "#ffffff",
    icon: "flag",
};

const IMPORTANT: PriorityStyle = PriorityStyle {
    background: "#f59e0b",
    border: "#d97706",
    text: "#ffffff",
    icon: "star",
};

const CRITICAL: PriorityStyle = PriorityStyle {
    background: "#ef4444",
    border: "#dc2626",
    text: "#ffffff",
    icon: "priority_high",
};

pub fn style(priority: Priority) -> PriorityStyle {
    match priority {
        Priority::Normal => NORMAL,
        Priority::Important => IMPORTANT,
        Priority::Critical => CRITICAL,
    }
}

pub fn label(priority: Priority, locale: Locale) -> &'static str {
    match (locale, priority) {
        (Locale::Uk, Priority::Normal) => "Звичайна",
        (Locale::Uk, Priority::Important) => "Важлива",
        (Locale::Uk, Priority::Critical) => "Критична",
        (Locale::En, Priority::Normal) => "Normal",
        (Locale::En, Priority::Important) => "Important",
        (Locale::En, Priority::Critical) => "Critical",
    }
}

/// One row of the table as served to the front end.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityEntry {
    pub priority: Priority,
    pub label: &'static str,
    #[serde(flatten)]
    pub style: PriorityStyle,
}

pub fn entry(priority: Priority, locale: Locale) -> PriorityEntry {
    PriorityEntry {
        priority,
        label: label(priority, locale),
        style: style(priority),
    }
}

pub fn table(locale: Locale) -> Vec<PriorityEntry> {
    Priority::ALL.iter().map(|p| entry(*p, locale)).collect()
}

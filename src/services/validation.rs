//! Gate between submitted forms and the store. Nothing reaches the gateway
//! unless it passes here.

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::models::event::{EventDraft, EventPatch, EventRecord, Priority};
use crate::services::normalizer::{self, NormalizeError};
use crate::utils::locale::Locale;

/// What to do when an event ends before it starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndBeforeStart {
    #[default]
    Preserve,
    Reject,
    Clamp,
}

impl FromStr for EndBeforeStart {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "preserve" => Ok(EndBeforeStart::Preserve),
            "reject" => Ok(EndBeforeStart::Reject),
            "clamp" => Ok(EndBeforeStart::Clamp),
            other => Err(format!("unknown end-before-start policy '{}'", other)),
        }
    }
}

/// A date/time as submitted: split fields or one combined value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateTimeInput {
    Parts { date: String, time: String },
    Combined(String),
}

impl DateTimeInput {
    pub fn is_blank(&self) -> bool {
        match self {
            DateTimeInput::Parts { date, time } => date.trim().is_empty() || time.trim().is_empty(),
            DateTimeInput::Combined(value) => value.trim().is_empty(),
        }
    }

    pub fn to_storage(&self) -> Result<String, NormalizeError> {
        match self {
            DateTimeInput::Parts { date, time } => normalizer::combine(date, time),
            DateTimeInput::Combined(value) => normalizer::to_storage(value),
        }
    }
}

/// Create/edit dialog contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub start: Option<DateTimeInput>,
    #[serde(default)]
    pub end: Option<DateTimeInput>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Priority,
}

/// Partial edit. An explicit `null` clears `end` or `description`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EventPatchForm {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub start: Option<DateTimeInput>,
    #[serde(default, deserialize_with = "explicit_null")]
    pub end: Option<Option<DateTimeInput>>,
    #[serde(default, deserialize_with = "explicit_null")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub priority: Option<Priority>,
}

fn explicit_null<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Validator {
    pub locale: Locale,
    pub end_before_start: EndBeforeStart,
}

impl Validator {
    pub fn new(locale: Locale, end_before_start: EndBeforeStart) -> Self {
        Self {
            locale,
            end_before_start,
        }
    }

    pub fn draft(&self, form: &EventForm) -> Result<EventDraft, ValidationError> {
        let title = self.title(&form.title)?;
        let start = match &form.start {
            Some(start) if !start.is_blank() => self.timestamp("start", start)?,
            _ => {
                return Err(ValidationError::new(
                    "start",
                    self.locale.start_required(),
                ))
            }
        };
        let end = match &form.end {
            Some(end) if !end.is_blank() => Some(self.timestamp("end", end)?),
            _ => None,
        };
        let end = self.check_order(&start, end)?;

        Ok(EventDraft {
            title,
            start,
            end,
            description: trim_description(form.description.as_deref()),
            priority: form.priority,
        })
    }

    /// Validates only the supplied fields. `current` supplies the other end
    /// of the time range when only one side changes.
    pub fn patch(
        &self,
        form: &EventPatchForm,
        current: Option<&EventRecord>,
    ) -> Result<EventPatch, ValidationError> {
        let title = form.title.as_deref().map(|t| self.title(t)).transpose()?;

        let start = match &form.start {
            Some(start) if start.is_blank() => {
                return Err(ValidationError::new(
                    "start",
                    self.locale.start_required(),
                ))
            }
            Some(start) => Some(self.timestamp("start", start)?),
            None => None,
        };

        let mut end = match &form.end {
            Some(Some(end)) if !end.is_blank() => Some(Some(self.timestamp("end", end)?)),
            Some(_) => Some(None),
            None => None,
        };

        let effective_start = start
            .clone()
            .or_else(|| current.map(|c| c.start.clone()));
        let effective_end = match &end {
            Some(value) => value.clone(),
            None => current.and_then(|c| c.end.clone()),
        };
        if let Some(effective_start) = effective_start {
            let checked = self.check_order(&effective_start, effective_end.clone())?;
            if checked != effective_end {
                end = Some(checked);
            }
        }

        let patch = EventPatch {
            title,
            start,
            end,
            description: form
                .description
                .as_ref()
                .map(|d| trim_description(d.as_deref())),
            priority: form.priority,
        };

        if patch.is_empty() {
            return Err(ValidationError::new("*", self.locale.nothing_to_update()));
        }
        Ok(patch)
    }

    fn title(&self, raw: &str) -> Result<String, ValidationError> {
        let title = raw.trim();
        if title.is_empty() {
            return Err(ValidationError::new("title", self.locale.title_required()));
        }
        Ok(title.to_string())
    }

    fn timestamp(&self, field: &'static str, input: &DateTimeInput) -> Result<String, ValidationError> {
        input
            .to_storage()
            .map_err(|e| ValidationError::new(field, self.locale.invalid_datetime(e.input())))
    }

    fn check_order(&self, start: &str, end: Option<String>) -> Result<Option<String>, ValidationError> {
        let Some(end) = end else {
            return Ok(None);
        };
        let inverted = match (
            normalizer::parse_timestamp(start),
            normalizer::parse_timestamp(&end),
        ) {
            (Ok(s), Ok(e)) => e < s,
            _ => false,
        };
        if !inverted {
            return Ok(Some(end));
        }

        match self.end_before_start {
            EndBeforeStart::Preserve => Ok(Some(end)),
            EndBeforeStart::Reject => Err(ValidationError::new(
                "end",
                self.locale.end_before_start(),
            )),
            EndBeforeStart::Clamp => Ok(Some(start.to_string())),
        }
    }
}

fn trim_description(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}

use axum::extract::{Path, Query, State};
use axum::response::Response;
use serde::{Deserialize, Serialize};

use crate::auth::session::CurrentSession;
use crate::models::event::{EventRecord, Priority};
use crate::models::palette::{self, PriorityEntry};
use crate::services::agenda::Agenda;
use crate::services::filter::{EventQuery, PriorityFilter};
use crate::services::normalizer::{self, DateTimeParts};
use crate::services::validation::{EventForm, EventPatchForm};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::extract::JsonBody;
use crate::utils::locale::Locale;
use crate::utils::response::{created, empty_success, success};

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub priority: Option<String>,
}

impl ListParams {
    pub fn into_query(self) -> Result<EventQuery, AppError> {
        let priority = self
            .priority
            .as_deref()
            .unwrap_or("all")
            .parse::<PriorityFilter>()
            .map_err(AppError::ValidationError)?;
        Ok(EventQuery {
            search: self.search.unwrap_or_default(),
            priority,
        })
    }
}

/// One card of the list view.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventView<'a> {
    #[serde(flatten)]
    pub event: &'a EventRecord,
    pub date_label: String,
    pub time_label: String,
    pub end_time_label: Option<String>,
    pub duration_label: String,
    pub style: PriorityEntry,
}

impl<'a> EventView<'a> {
    pub fn new(event: &'a EventRecord, locale: Locale) -> Self {
        Self {
            event,
            date_label: normalizer::format_long_date(&event.start, locale),
            time_label: normalizer::format_time(&event.start, locale),
            end_time_label: event
                .end
                .as_deref()
                .map(|end| normalizer::format_time(end, locale)),
            duration_label: normalizer::format_duration(&event.start, event.end.as_deref(), locale),
            style: palette::entry(event.priority, locale),
        }
    }
}

#[derive(Serialize)]
pub struct EventList<'a> {
    pub total: usize,
    pub events: Vec<EventView<'a>>,
}

/// Field values for the edit dialog.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditForm {
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub start: String,
    pub end: String,
    pub start_parts: DateTimeParts,
    pub end_parts: DateTimeParts,
}

impl From<&EventRecord> for EditForm {
    fn from(event: &EventRecord) -> Self {
        // An event without an end is edited as ending when it starts.
        let end = event.end.as_deref().unwrap_or(&event.start);
        Self {
            id: event.id.clone(),
            title: event.title.clone(),
            description: event.description.clone().unwrap_or_default(),
            priority: event.priority,
            start: normalizer::edit_value(&event.start),
            end: normalizer::edit_value(end),
            start_parts: normalizer::edit_parts(&event.start),
            end_parts: normalizer::edit_parts(end),
        }
    }
}

#[derive(Serialize)]
struct EventId<'a> {
    id: &'a str,
}

pub async fn list_events(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Query(params): Query<ListParams>,
) -> Result<Response, AppError> {
    let query = params.into_query()?;
    let mut agenda = Agenda::new(state.events.clone(), session);
    agenda.load().await?;

    let events: Vec<EventView> = agenda
        .visible(&query)
        .into_iter()
        .map(|event| EventView::new(event, state.locale))
        .collect();
    tracing::debug!(search = %query.search, priority = %query.priority, shown = events.len(), "list view");

    Ok(success(
        EventList {
            total: events.len(),
            events,
        },
        "Events retrieved",
    ))
}

pub async fn create_event(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    JsonBody(form): JsonBody<EventForm>,
) -> Result<Response, AppError> {
    let record = state.events.create(&session, &form).await?;
    Ok(created(EventView::new(&record, state.locale), "Event created"))
}

pub async fn edit_form(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(event_id): Path<String>,
) -> Result<Response, AppError> {
    let record = state.events.find(&session, &event_id).await?;
    Ok(success(EditForm::from(&record), "Edit form populated"))
}

pub async fn update_event(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(event_id): Path<String>,
    JsonBody(form): JsonBody<EventForm>,
) -> Result<Response, AppError> {
    state.events.update(&session, &event_id, &form).await?;
    Ok(success(EventId { id: &event_id }, "Event updated"))
}

pub async fn patch_event(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(event_id): Path<String>,
    JsonBody(form): JsonBody<EventPatchForm>,
) -> Result<Response, AppError> {
    state.events.patch(&session, &event_id, &form).await?;
    Ok(success(EventId { id: &event_id }, "Event updated"))
}

pub async fn delete_event(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(event_id): Path<String>,
) -> Result<Response, AppError> {
    state.events.delete(&session, &event_id).await?;
    Ok(empty_success("Event deleted"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(end: Option<&str>) -> EventRecord {
        EventRecord {
            id: "e1".into(),
            title: "Standup".into(),
            start: "2024-03-04T09:00:00".into(),
            end: end.map(str::to_string),
            description: None,
            priority: Priority::Critical,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_view_labels() {
        let event = record(Some("2024-03-04T10:30:00"));
        let json = serde_json::to_value(EventView::new(&event, Locale::Uk)).unwrap();
        assert_eq!(json["title"], "Standup");
        assert_eq!(json["dateLabel"], "4 березня 2024");
        assert_eq!(json["timeLabel"], "09:00");
        assert_eq!(json["endTimeLabel"], "10:30");
        assert_eq!(json["durationLabel"], "1г 30хв");
        assert_eq!(json["style"]["background"], "#ef4444");
    }

    #[test]
    fn test_edit_form_defaults_end_to_start() {
        let form = EditForm::from(&record(None));
        assert_eq!(form.start, "2024-03-04T09:00");
        assert_eq!(form.end, "2024-03-04T09:00");
        assert_eq!(form.end_parts.time, "09:00");
        assert_eq!(form.description, "");
    }

    #[test]
    fn test_list_params_reject_unknown_priority() {
        let params = ListParams {
            search: None,
            priority: Some("urgent".into()),
        };
        assert!(matches!(params.into_query(), Err(AppError::ValidationError(_))));

        let query = ListParams::default().into_query().unwrap();
        assert_eq!(query, EventQuery::default());
    }
}

use axum::extract::{Query, State};
use axum::response::Response;
use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::auth::session::CurrentSession;
use crate::models::event::{EventRecord, Priority};
use crate::models::palette;
use crate::services::agenda::Agenda;
use crate::services::calendar_view::{day_draft, CalendarView, Window};
use crate::services::filter::{EventQuery, PriorityFilter};
use crate::services::normalizer;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::success;

#[derive(Debug, Default, Deserialize)]
pub struct CalendarParams {
    pub view: Option<String>,
    pub date: Option<String>,
    pub priority: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DraftParams {
    pub date: Option<String>,
}

/// An event as the grid widget consumes it.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEntry<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub start: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<&'a str>,
    pub priority: Priority,
    pub background_color: &'static str,
    pub border_color: &'static str,
}

impl<'a> From<&'a EventRecord> for CalendarEntry<'a> {
    fn from(event: &'a EventRecord) -> Self {
        let style = palette::style(event.priority);
        Self {
            id: &event.id,
            title: &event.title,
            start: &event.start,
            end: event.end.as_deref(),
            priority: event.priority,
            background_color: style.background,
            border_color: style.border,
        }
    }
}

#[derive(Serialize)]
pub struct CalendarFeed<'a> {
    pub view: CalendarView,
    pub from: NaiveDateTime,
    pub to: NaiveDateTime,
    pub entries: Vec<CalendarEntry<'a>>,
}

fn anchor_date(raw: Option<&str>) -> Result<NaiveDate, AppError> {
    match raw {
        None => Ok(Local::now().date_naive()),
        Some(raw) => normalizer::parse_date(raw).map_err(|e| AppError::ValidationError(e.to_string())),
    }
}

pub async fn calendar_feed(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Query(params): Query<CalendarParams>,
) -> Result<Response, AppError> {
    let view = match params.view.as_deref() {
        None => CalendarView::default(),
        Some(raw) => raw.parse().map_err(AppError::ValidationError)?,
    };
    let priority = params
        .priority
        .as_deref()
        .unwrap_or("all")
        .parse::<PriorityFilter>()
        .map_err(AppError::ValidationError)?;
    let window = Window::around(view, anchor_date(params.date.as_deref())?);
    let query = EventQuery {
        search: String::new(),
        priority,
    };

    let mut agenda = Agenda::new(state.events.clone(), session);
    agenda.load().await?;

    let entries: Vec<CalendarEntry> = agenda
        .events()
        .iter()
        .filter(|event| window.contains(event) && query.matches(event))
        .map(CalendarEntry::from)
        .collect();

    Ok(success(
        CalendarFeed {
            view,
            from: window.from,
            to: window.to,
            entries,
        },
        "Calendar retrieved",
    ))
}

/// Form for a new event on the day picked in the grid.
pub async fn new_event_draft(
    CurrentSession(_session): CurrentSession,
    Query(params): Query<DraftParams>,
) -> Result<Response, AppError> {
    let date = anchor_date(params.date.as_deref())?;
    Ok(success(day_draft(date), "Draft prepared"))
}

//! Month/week/day windows for the calendar grid, and the form prefilled when
//! a day is picked in it.

use std::str::FromStr;

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::models::event::{EventRecord, Priority};
use crate::services::normalizer::{self, DateTimeParts, DATE_FORMAT};

const DAY_START: &str = "09:00";
const DAY_END: &str = "10:00";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarView {
    #[default]
    Month,
    Week,
    Day,
}

impl FromStr for CalendarView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "month" | "dayGridMonth" => Ok(CalendarView::Month),
            "week" | "timeGridWeek" => Ok(CalendarView::Week),
            "day" | "timeGridDay" => Ok(CalendarView::Day),
            other => Err(format!("unknown calendar view '{}'", other)),
        }
    }
}

/// Half-open `[from, to)` range of local wall time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Window {
    pub from: NaiveDateTime,
    pub to: NaiveDateTime,
}

impl Window {
    pub fn around(view: CalendarView, anchor: NaiveDate) -> Self {
        let (first, last_exclusive) = match view {
            CalendarView::Day => (anchor, anchor + Duration::days(1)),
            CalendarView::Week => {
                let monday =
                    anchor - Duration::days(anchor.weekday().num_days_from_monday() as i64);
                (monday, monday + Duration::days(7))
            }
            CalendarView::Month => {
                let first = anchor.with_day(1).unwrap_or(anchor);
                let next = first
                    .checked_add_months(Months::new(1))
                    .unwrap_or(first + Duration::days(31));
                (first, next)
            }
        };
        Self {
            from: first.and_time(chrono::NaiveTime::MIN),
            to: last_exclusive.and_time(chrono::NaiveTime::MIN),
        }
    }

    /// True when any part of `event` falls inside the window. Events whose
    /// start cannot be parsed are never shown on the grid.
    pub fn contains(&self, event: &EventRecord) -> bool {
        let Ok(start) = normalizer::parse_timestamp(&event.start) else {
            return false;
        };
        let end = event
            .end
            .as_deref()
            .and_then(|e| normalizer::parse_timestamp(e).ok())
            .filter(|e| *e >= start)
            .unwrap_or(start);

        // An event ending exactly at `from` belongs to the previous window.
        start < self.to && (end > self.from || start >= self.from)
    }
}

/// New-event form as opened from a day cell in the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayDraft {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub start: DateTimeParts,
    pub end: DateTimeParts,
}

pub fn day_draft(date: NaiveDate) -> DayDraft {
    let day = date.format(DATE_FORMAT).to_string();
    DayDraft {
        title: String::new(),
        description: String::new(),
        priority: Priority::Normal,
        start: DateTimeParts {
            date: day.clone(),
            time: DAY_START.to_string(),
        },
        end: DateTimeParts {
            date: day,
            time: DAY_END.to_string(),
        },
    }
}

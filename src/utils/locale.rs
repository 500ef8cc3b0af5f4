//! User-facing strings in the two supported languages.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Uk,
    En,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "uk" | "uk-ua" | "uk_ua" => Ok(Locale::Uk),
            "en" | "en-us" | "en_us" | "en-gb" => Ok(Locale::En),
            other => Err(format!("unsupported locale '{}'", other)),
        }
    }
}

/// Genitive month names, as used in "4 березня 2024".
const UK_MONTHS: [&str; 12] = [
    "січня",
    "лютого",
    "березня",
    "квітня",
    "травня",
    "червня",
    "липня",
    "серпня",
    "вересня",
    "жовтня",
    "листопада",
    "грудня",
];

const EN_MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

impl Locale {
    /// `month` is 1-based.
    pub fn month_name(self, month: u32) -> &'static str {
        let idx = (month.clamp(1, 12) - 1) as usize;
        match self {
            Locale::Uk => UK_MONTHS[idx],
            Locale::En => EN_MONTHS[idx],
        }
    }

    pub fn all_day(self) -> &'static str {
        match self {
            Locale::Uk => "Весь день",
            Locale::En => "All day",
        }
    }

    pub fn minutes(self, minutes: i64) -> String {
        match self {
            Locale::Uk => format!("{} хв", minutes),
            Locale::En => format!("{} min", minutes),
        }
    }

    pub fn hours(self, hours: i64, minutes: i64) -> String {
        match (self, minutes) {
            (Locale::Uk, 0) => format!("{}г", hours),
            (Locale::Uk, m) => format!("{}г {}хв", hours, m),
            (Locale::En, 0) => format!("{} h", hours),
            (Locale::En, m) => format!("{} h {} min", hours, m),
        }
    }

    pub fn unknown_date(self) -> &'static str {
        match self {
            Locale::Uk => "Невідома дата",
            Locale::En => "Unknown date",
        }
    }

    pub fn unknown_time(self) -> &'static str {
        match self {
            Locale::Uk => "Невідомий час",
            Locale::En => "Unknown time",
        }
    }

    pub fn unknown_duration(self) -> &'static str {
        match self {
            Locale::Uk => "Невідома тривалість",
            Locale::En => "Unknown duration",
        }
    }

    pub fn title_required(self) -> &'static str {
        match self {
            Locale::Uk => "Назва події є обов'язковою",
            Locale::En => "Event title is required",
        }
    }

    pub fn start_required(self) -> &'static str {
        match self {
            Locale::Uk => "Дата та час початку є обов'язковими",
            Locale::En => "Start date and time are required",
        }
    }

    pub fn invalid_datetime(self, value: &str) -> String {
        match self {
            Locale::Uk => format!("Некоректна дата або час: {}", value),
            Locale::En => format!("Invalid date or time: {}", value),
        }
    }

    pub fn end_before_start(self) -> &'static str {
        match self {
            Locale::Uk => "Кінець події не може бути раніше за початок",
            Locale::En => "Event end cannot precede its start",
        }
    }

    pub fn nothing_to_update(self) -> &'static str {
        match self {
            Locale::Uk => "Немає змін для збереження",
            Locale::En => "No fields to update",
        }
    }

    pub fn event_not_found(self) -> &'static str {
        match self {
            Locale::Uk => "Подію не знайдено",
            Locale::En => "Event not found",
        }
    }

    pub fn load_failed(self) -> &'static str {
        match self {
            Locale::Uk => "Помилка завантаження подій",
            Locale::En => "Failed to load events",
        }
    }

    pub fn create_failed(self) -> &'static str {
        match self {
            Locale::Uk => "Помилка створення події",
            Locale::En => "Failed to create event",
        }
    }

    pub fn update_failed(self) -> &'static str {
        match self {
            Locale::Uk => "Помилка оновлення події",
            Locale::En => "Failed to update event",
        }
    }

    pub fn delete_failed(self) -> &'static str {
        match self {
            Locale::Uk => "Помилка видалення події",
            Locale::En => "Failed to delete event",
        }
    }

    pub fn sign_in_required(self) -> &'static str {
        match self {
            Locale::Uk => "Потрібна авторизація",
            Locale::En => "Sign in required",
        }
    }
}

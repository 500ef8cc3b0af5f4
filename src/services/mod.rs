pub mod agenda;
pub mod calendar_view;
pub mod event_service;
pub mod filter;
pub mod normalizer;
pub mod validation;

pub use agenda::Agenda;
pub use event_service::{EventService, ReadFailurePolicy};
pub use filter::{filter_events, EventQuery, PriorityFilter};
pub use validation::{DateTimeInput, EndBeforeStart, EventForm, EventPatchForm, Validator};

//! Personal calendar API: per-user dated events with a priority tag, served
//! to a calendar grid and a filterable list view.

pub mod auth;
pub mod config;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
pub mod utils;

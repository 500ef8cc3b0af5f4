//! Boundary to the document store holding each user's events.
//!
//! Every call is scoped by the authenticated user's id and is independent of
//! the others; nothing here composes calls into transactions.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::event::{EventDraft, EventPatch, EventRecord};

pub mod memory;
pub mod postgres;

pub use memory::MemoryEventStore;
pub use postgres::PgEventStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("event '{0}' not found")]
    NotFound(String),

    #[error("stored event '{id}' is corrupt: {reason}")]
    Corrupt { id: String, reason: String },

    #[error("database error")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

#[async_trait]
pub trait EventStore: Send + Sync {
    /// Persists a new event. The store assigns id and timestamps.
    async fn create(&self, user_id: &str, draft: EventDraft) -> Result<EventRecord, StoreError>;

    /// All events of one user, oldest first.
    async fn list_all(&self, user_id: &str) -> Result<Vec<EventRecord>, StoreError>;

    /// Replaces the supplied fields and refreshes `updated_at`.
    async fn update(&self, user_id: &str, event_id: &str, patch: EventPatch) -> Result<(), StoreError>;

    /// Hard delete. Deleting an id that does not exist is not an error.
    async fn delete(&self, user_id: &str, event_id: &str) -> Result<(), StoreError>;
}

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{EventStore, StoreError};
use crate::models::event::{EventDraft, EventPatch, EventRecord};

/// Process-local store for development and tests. Contents are lost on exit.
#[derive(Debug, Default)]
pub struct MemoryEventStore {
    events: RwLock<HashMap<String, Vec<EventRecord>>>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn create(&self, user_id: &str, draft: EventDraft) -> Result<EventRecord, StoreError> {
        let record = EventRecord::from_draft(Uuid::new_v4().to_string(), draft, Utc::now());
        self.events
            .write()
            .await
            .entry(user_id.to_string())
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    async fn list_all(&self, user_id: &str) -> Result<Vec<EventRecord>, StoreError> {
        Ok(self
            .events
            .read()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn update(&self, user_id: &str, event_id: &str, patch: EventPatch) -> Result<(), StoreError> {
        let mut events = self.events.write().await;
        let record = events
            .get_mut(user_id)
            .and_then(|list| list.iter_mut().find(|e| e.id == event_id))
            .ok_or_else(|| StoreError::NotFound(event_id.to_string()))?;

        record.apply(&patch);
        record.updated_at = Some(Utc::now());
        Ok(())
    }

    async fn delete(&self, user_id: &str, event_id: &str) -> Result<(), StoreError> {
        if let Some(list) = self.events.write().await.get_mut(user_id) {
            list.retain(|e| e.id != event_id);
        }
        Ok(())
    }
}

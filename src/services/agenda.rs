//! A user's event collection as held by one view.
//!
//! The collection is only touched after the store confirms a write, so after
//! any failure it still mirrors the last confirmed state.

use crate::auth::session::Session;
use crate::models::event::EventRecord;
use crate::services::event_service::EventService;
use crate::services::filter::EventQuery;
use crate::services::validation::{EventForm, EventPatchForm};
use crate::utils::error::AppError;

pub struct Agenda {
    service: EventService,
    session: Session,
    events: Vec<EventRecord>,
}

impl Agenda {
    pub fn new(service: EventService, session: Session) -> Self {
        Self {
            service,
            session,
            events: Vec::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    /// Replaces the collection with the store's current contents.
    pub async fn load(&mut self) -> Result<&[EventRecord], AppError> {
        self.events = self.service.list(&self.session).await?;
        Ok(&self.events)
    }

    pub fn visible(&self, query: &EventQuery) -> Vec<&EventRecord> {
        query.apply(&self.events)
    }

    pub async fn create(&mut self, form: &EventForm) -> Result<&EventRecord, AppError> {
        let record = self.service.create(&self.session, form).await?;
        self.events.push(record);
        let idx = self.events.len() - 1;
        Ok(&self.events[idx])
    }

    pub async fn edit(&mut self, event_id: &str, form: &EventForm) -> Result<(), AppError> {
        let patch = self.service.update(&self.session, event_id, form).await?;
        if let Some(event) = self.events.iter_mut().find(|e| e.id == event_id) {
            event.apply(&patch);
        }
        Ok(())
    }

    pub async fn patch(&mut self, event_id: &str, form: &EventPatchForm) -> Result<(), AppError> {
        let patch = self.service.patch(&self.session, event_id, form).await?;
        if let Some(event) = self.events.iter_mut().find(|e| e.id == event_id) {
            event.apply(&patch);
        }
        Ok(())
    }

    pub async fn remove(&mut self, event_id: &str) -> Result<(), AppError> {
        self.service.delete(&self.session, event_id).await?;
        self.events.retain(|e| e.id != event_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::auth::session::SessionRegistry;
    use crate::models::event::{EventDraft, EventPatch, Priority};
    use crate::models::user::AuthUser;
    use crate::services::event_service::ReadFailurePolicy;
    use crate::services::filter::PriorityFilter;
    use crate::services::validation::{DateTimeInput, EndBeforeStart};
    use crate::store::{EventStore, MemoryEventStore, StoreError};
    use crate::utils::locale::Locale;

    /// Memory store whose writes can be switched off.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryEventStore,
        writes_fail: AtomicBool,
    }

    impl FlakyStore {
        fn check(&self) -> Result<(), StoreError> {
            if self.writes_fail.load(Ordering::SeqCst) {
                return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl EventStore for FlakyStore {
        async fn create(&self, user_id: &str, draft: EventDraft) -> Result<EventRecord, StoreError> {
            self.check()?;
            self.inner.create(user_id, draft).await
        }
        async fn list_all(&self, user_id: &str) -> Result<Vec<EventRecord>, StoreError> {
            self.inner.list_all(user_id).await
        }
        async fn update(&self, user_id: &str, event_id: &str, patch: EventPatch) -> Result<(), StoreError> {
            self.check()?;
            self.inner.update(user_id, event_id, patch).await
        }
        async fn delete(&self, user_id: &str, event_id: &str) -> Result<(), StoreError> {
            self.check()?;
            self.inner.delete(user_id, event_id).await
        }
    }

    async fn agenda(store: Arc<FlakyStore>) -> Agenda {
        let session = SessionRegistry::new()
            .open(AuthUser {
                uid: "u1".into(),
                email: "u1@example.com".into(),
            })
            .await;
        let service = EventService::new(
            store,
            Locale::En,
            ReadFailurePolicy::Surface,
            EndBeforeStart::Preserve,
        );
        Agenda::new(service, session)
    }

    fn form(title: &str, start: &str, description: Option<&str>) -> EventForm {
        EventForm {
            title: title.into(),
            start: Some(DateTimeInput::Combined(start.into())),
            description: description.map(str::to_string),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_standup_scenario() {
        let store = Arc::new(FlakyStore::default());
        let mut agenda = agenda(store.clone()).await;

        let id = agenda
            .create(&form("Standup", "2024-03-04T09:00:00", None))
            .await
            .unwrap()
            .id
            .clone();

        let mut fresh = Agenda::new(agenda.service.clone(), agenda.session().clone());
        assert!(fresh.load().await.unwrap().iter().any(|e| e.id == id));

        let query = EventQuery {
            search: "stand".into(),
            priority: PriorityFilter::All,
        };
        let hits = fresh.visible(&query);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, id);

        fresh.remove(&id).await.unwrap();
        assert!(fresh.events().is_empty());
        assert!(fresh.load().await.unwrap().iter().all(|e| e.id != id));
    }

    #[tokio::test]
    async fn test_failed_writes_leave_collection_unchanged() {
        let store = Arc::new(FlakyStore::default());
        let mut agenda = agenda(store.clone()).await;
        agenda
            .create(&form("Sync", "2024-03-04T11:00", Some("quarterly review")))
            .await
            .unwrap();
        let before = agenda.events().to_vec();
        let id = before[0].id.clone();

        store.writes_fail.store(true, Ordering::SeqCst);

        assert!(agenda.create(&form("Other", "2024-03-05T10:00", None)).await.is_err());
        assert!(agenda.edit(&id, &form("Renamed", "2024-03-04T11:00", None)).await.is_err());
        assert!(agenda.remove(&id).await.is_err());
        assert_eq!(agenda.events(), before.as_slice());
    }

    #[tokio::test]
    async fn test_edit_patches_local_copy_after_confirmation() {
        let store = Arc::new(FlakyStore::default());
        let mut agenda = agenda(store).await;
        let id = agenda
            .create(&form("Sync", "2024-03-04T11:00", Some("quarterly review")))
            .await
            .unwrap()
            .id
            .clone();

        agenda
            .edit(
                &id,
                &EventForm {
                    priority: Priority::Important,
                    ..form("Sync v2", "2024-03-04T12:00", None)
                },
            )
            .await
            .unwrap();

        let event = &agenda.events()[0];
        assert_eq!(event.title, "Sync v2");
        assert_eq!(event.start, "2024-03-04T12:00:00");
        assert_eq!(event.description, None);
        assert_eq!(event.priority, Priority::Important);

        agenda
            .patch(
                &id,
                &EventPatchForm {
                    description: Some(Some("moved".into())),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(agenda.events()[0].description.as_deref(), Some("moved"));
    }

    #[tokio::test]
    async fn test_search_matches_description() {
        let store = Arc::new(FlakyStore::default());
        let mut agenda = agenda(store).await;
        agenda
            .create(&form("Sync", "2024-03-04T11:00", Some("quarterly review")))
            .await
            .unwrap();

        let query = EventQuery {
            search: "quarterly".into(),
            priority: PriorityFilter::All,
        };
        assert_eq!(agenda.visible(&query).len(), 1);
    }
}

use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::auth::session::Session;
use crate::models::event::{EventPatch, EventRecord};
use crate::services::validation::{EndBeforeStart, EventForm, EventPatchForm, Validator};
use crate::store::{EventStore, StoreError};
use crate::utils::error::AppError;
use crate::utils::locale::Locale;

/// How a failed initial load is presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadFailurePolicy {
    /// Report `LOAD_FAILED` so an outage is distinguishable from "no events yet".
    #[default]
    Surface,
    /// Log and present an empty collection.
    Empty,
}

impl FromStr for ReadFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "surface" => Ok(ReadFailurePolicy::Surface),
            "empty" => Ok(ReadFailurePolicy::Empty),
            other => Err(format!("unknown read failure policy '{}'", other)),
        }
    }
}

/// Validated access to the store on behalf of one session at a time.
#[derive(Clone)]
pub struct EventService {
    store: Arc<dyn EventStore>,
    validator: Validator,
    read_failure: ReadFailurePolicy,
}

impl EventService {
    pub fn new(
        store: Arc<dyn EventStore>,
        locale: Locale,
        read_failure: ReadFailurePolicy,
        end_before_start: EndBeforeStart,
    ) -> Self {
        Self {
            store,
            validator: Validator::new(locale, end_before_start),
            read_failure,
        }
    }

    pub fn locale(&self) -> Locale {
        self.validator.locale
    }

    fn not_found(&self) -> AppError {
        AppError::NotFound(self.locale().event_not_found().to_string())
    }

    fn write_error(&self, message: &str, source: StoreError) -> AppError {
        if source.is_not_found() {
            return self.not_found();
        }
        AppError::StoreWriteFailed {
            message: message.to_string(),
            source,
        }
    }

    fn load_error(&self, source: StoreError) -> AppError {
        AppError::LoadFailed {
            message: self.locale().load_failed().to_string(),
            source,
        }
    }

    pub async fn list(&self, session: &Session) -> Result<Vec<EventRecord>, AppError> {
        match self.store.list_all(session.user_id()).await {
            Ok(events) => Ok(events),
            Err(err) => match self.read_failure {
                ReadFailurePolicy::Surface => Err(self.load_error(err)),
                ReadFailurePolicy::Empty => {
                    tracing::warn!(user_id = %session.user_id(), error = ?err, "event load failed, presenting empty collection");
                    Ok(Vec::new())
                }
            },
        }
    }

    pub async fn find(&self, session: &Session, event_id: &str) -> Result<EventRecord, AppError> {
        let events = self
            .store
            .list_all(session.user_id())
            .await
            .map_err(|e| self.load_error(e))?;
        events
            .into_iter()
            .find(|e| e.id == event_id)
            .ok_or_else(|| self.not_found())
    }

    pub async fn create(&self, session: &Session, form: &EventForm) -> Result<EventRecord, AppError> {
        let draft = self.validator.draft(form)?;
        let record = self
            .store
            .create(session.user_id(), draft)
            .await
            .map_err(|e| self.write_error(self.locale().create_failed(), e))?;

        tracing::info!(user_id = %session.user_id(), event_id = %record.id, "event created");
        Ok(record)
    }

    /// Replaces every field from the edit dialog. Returns what was written.
    pub async fn update(
        &self,
        session: &Session,
        event_id: &str,
        form: &EventForm,
    ) -> Result<EventPatch, AppError> {
        let patch = EventPatch::from(self.validator.draft(form)?);
        self.write_patch(session, event_id, patch).await
    }

    pub async fn patch(
        &self,
        session: &Session,
        event_id: &str,
        form: &EventPatchForm,
    ) -> Result<EventPatch, AppError> {
        let touches_range = form.start.is_some() || form.end.is_some();
        let current = if touches_range && self.validator.end_before_start != EndBeforeStart::Preserve {
            Some(self.find(session, event_id).await?)
        } else {
            None
        };

        let patch = self.validator.patch(form, current.as_ref())?;
        self.write_patch(session, event_id, patch).await
    }

    async fn write_patch(
        &self,
        session: &Session,
        event_id: &str,
        patch: EventPatch,
    ) -> Result<EventPatch, AppError> {
        self.store
            .update(session.user_id(), event_id, patch.clone())
            .await
            .map_err(|e| self.write_error(self.locale().update_failed(), e))?;

        tracing::info!(user_id = %session.user_id(), event_id, "event updated");
        Ok(patch)
    }

    pub async fn delete(&self, session: &Session, event_id: &str) -> Result<(), AppError> {
        self.store
            .delete(session.user_id(), event_id)
            .await
            .map_err(|e| self.write_error(self.locale().delete_failed(), e))?;

        tracing::info!(user_id = %session.user_id(), event_id, "event deleted");
        Ok(())
    }
}

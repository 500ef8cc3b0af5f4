use std::sync::Arc;

use crate::auth::provider::IdentityProvider;
use crate::auth::session::SessionRegistry;
use crate::services::event_service::EventService;
use crate::utils::locale::Locale;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub events: EventService,
    pub identity: Arc<dyn IdentityProvider>,
    pub sessions: SessionRegistry,
    pub locale: Locale,
}

impl AppState {
    pub fn new(events: EventService, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            locale: events.locale(),
            events,
            identity,
            sessions: SessionRegistry::new(),
        }
    }

    pub fn with_sessions(mut self, sessions: SessionRegistry) -> Self {
        self.sessions = sessions;
        self
    }
}

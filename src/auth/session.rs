//! Session context for the signed-in user.
//!
//! Sessions are opened only by the sign-in and sign-up handlers and closed by
//! sign-out. Every other consumer receives a `Session` by value through the
//! [`CurrentSession`] extractor and can only read it.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::user::AuthUser;
use crate::state::AppState;
use crate::utils::error::AppError;

/// Sessions live this long after sign-in unless configured otherwise.
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
    user: AuthUser,
    started_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl Session {
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn user(&self) -> &AuthUser {
        &self.user
    }

    /// Scoping key for every store call.
    pub fn user_id(&self) -> &str {
        &self.user.uid
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Open sessions keyed by token. Each session expires a fixed time after
/// sign-in; expired entries are dropped on lookup and on every new sign-in.
#[derive(Debug, Clone)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    ttl: Duration,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::with_ttl(Duration::hours(DEFAULT_SESSION_TTL_HOURS))
    }
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: Arc::default(),
            ttl,
        }
    }

    pub async fn open(&self, user: AuthUser) -> Session {
        let now = Utc::now();
        let session = Session {
            token: Uuid::new_v4().simple().to_string(),
            user,
            started_at: now,
            expires_at: now + self.ttl,
        };

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(now));
        let pruned = before - sessions.len();
        if pruned > 0 {
            tracing::debug!(pruned, "expired sessions removed");
        }
        sessions.insert(session.token.clone(), session.clone());
        drop(sessions);

        tracing::info!(user_id = %session.user.uid, "session opened");
        session
    }

    /// The open session for `token`, if it has not expired.
    pub async fn get(&self, token: &str) -> Option<Session> {
        let now = Utc::now();
        {
            let sessions = self.sessions.read().await;
            match sessions.get(token) {
                None => return None,
                Some(session) if !session.is_expired(now) => return Some(session.clone()),
                Some(_) => {}
            }
        }

        if let Some(session) = self.sessions.write().await.remove(token) {
            tracing::info!(user_id = %session.user.uid, "session expired");
        }
        None
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Returns false when the token was not open.
    pub async fn close(&self, token: &str) -> bool {
        let removed = self.sessions.write().await.remove(token);
        if let Some(session) = &removed {
            tracing::info!(user_id = %session.user.uid, "session closed");
        }
        removed.is_some()
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Extracts the caller's session from `Authorization: Bearer <token>`.
pub struct CurrentSession(pub Session);

#[async_trait]
impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let denied = || AppError::AuthError(state.locale.sign_in_required().to_string());
        let token = bearer_token(parts).ok_or_else(denied)?;
        state
            .sessions
            .get(token)
            .await
            .map(CurrentSession)
            .ok_or_else(denied)
    }
}

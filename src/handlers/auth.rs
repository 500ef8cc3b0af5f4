use axum::extract::State;
use axum::response::Response;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::session::{CurrentSession, Session};
use crate::models::user::AuthUser;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::extract::JsonBody;
use crate::utils::response::{created, empty_success, success};

#[derive(Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<&'a str>,
    pub user: &'a AuthUser,
    pub initials: String,
    pub started_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl<'a> SessionView<'a> {
    fn new(session: &'a Session, with_token: bool) -> Self {
        Self {
            token: with_token.then(|| session.token()),
            user: session.user(),
            initials: session.user().initials(),
            started_at: session.started_at(),
            expires_at: session.expires_at(),
        }
    }
}

pub async fn sign_up(
    State(state): State<AppState>,
    JsonBody(credentials): JsonBody<Credentials>,
) -> Result<Response, AppError> {
    let user = state
        .identity
        .sign_up(credentials.email.trim(), &credentials.password)
        .await?;
    let session = state.sessions.open(user).await;
    Ok(created(SessionView::new(&session, true), "Account created"))
}

pub async fn sign_in(
    State(state): State<AppState>,
    JsonBody(credentials): JsonBody<Credentials>,
) -> Result<Response, AppError> {
    let user = state
        .identity
        .sign_in(credentials.email.trim(), &credentials.password)
        .await?;
    let session = state.sessions.open(user).await;
    Ok(success(SessionView::new(&session, true), "Signed in"))
}

pub async fn sign_out(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Result<Response, AppError> {
    state.sessions.close(session.token()).await;
    Ok(empty_success("Signed out"))
}

pub async fn current_user(CurrentSession(session): CurrentSession) -> Response {
    success(SessionView::new(&session, false), "Current session")
}

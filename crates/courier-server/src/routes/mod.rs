//! HTTP routes and router assembly.

pub mod emails;

use axum::extract::Extension;
use axum::middleware;
use axum::routing::{get, post};
use axum::{Json, Router};
use courier_core::models::user::SessionUser;
use courier_mailer::Mailer;
use serde_json::json;
use surrealdb::Connection;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::session;
use crate::state::AppState;

pub fn router<C, M>(state: AppState<C, M>) -> Router
where
    C: Connection,
    M: Mailer + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/me", get(me))
        .route("/api/v1/emails/send", post(emails::send::<C, M>))
        .route("/api/v1/emails/{id}", get(emails::get_email::<C, M>))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session::resolve_session::<C, M>,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Current dashboard user, resolved from the session cookie by the
/// middleware.
async fn me(user: Option<Extension<SessionUser>>) -> Result<Json<SessionUser>, ApiError> {
    match user {
        Some(Extension(user)) => Ok(Json(user)),
        None => Err(ApiError::unauthorized("no active session")),
    }
}

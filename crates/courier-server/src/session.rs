//! Session-resolution middleware.
//!
//! Runs on every request: reads the session cookie, resolves it to a
//! user, and exposes the result as a request extension. Stale cookies
//! are deleted on the response. Resolution never fails the request —
//! routes that require a session check the extension themselves.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use courier_mailer::Mailer;
use surrealdb::Connection;

use crate::state::AppState;

pub async fn resolve_session<C, M>(
    State(state): State<AppState<C, M>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response
where
    C: Connection,
    M: Mailer + 'static,
{
    let token = jar
        .get(&state.session_cookie)
        .map(|cookie| cookie.value().to_owned());

    let outcome = state.sessions.resolve(token.as_deref()).await;

    if let Some(user) = outcome.user {
        request.extensions_mut().insert(user);
    }

    let response = next.run(request).await;

    let jar = if outcome.clear_cookie {
        jar.remove(
            Cookie::build((state.session_cookie.clone(), ""))
                .path("/")
                .build(),
        )
    } else {
        jar
    };

    (jar, response).into_response()
}

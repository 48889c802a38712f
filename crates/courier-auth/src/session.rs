//! Cookie-session resolution.
//!
//! Maps an optional session token to a request-scoped user. This never
//! fails the request: every failure mode degrades to "unauthenticated",
//! optionally instructing the caller to clear the stale cookie.

use courier_core::error::CourierError;
use courier_core::models::user::SessionUser;
use courier_core::repository::UserRepository;
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::token;

/// Result of resolving a session token.
#[derive(Debug, Clone, Default)]
pub struct SessionOutcome {
    /// The resolved user, if the token was valid and matched one.
    pub user: Option<SessionUser>,
    /// Whether the caller should delete the session cookie.
    pub clear_cookie: bool,
}

impl SessionOutcome {
    fn cleared() -> Self {
        Self {
            user: None,
            clear_cookie: true,
        }
    }
}

/// Resolves session cookies to users.
///
/// Generic over the user repository so the auth layer has no
/// dependency on the database crate. The store handle and config are
/// injected at construction.
pub struct SessionResolver<U: UserRepository> {
    users: U,
    config: AuthConfig,
}

impl<U: UserRepository> SessionResolver<U> {
    pub fn new(users: U, config: AuthConfig) -> Self {
        Self { users, config }
    }

    /// Name of the cookie this resolver reads.
    pub fn cookie_name(&self) -> &str {
        &self.config.session_cookie_name
    }

    /// Resolve an optional session token to a request context.
    ///
    /// - No token: unauthenticated; no decode, no datastore call.
    /// - Undecodable token: clear the cookie, unauthenticated.
    /// - No matching user: clear the cookie, unauthenticated.
    /// - Datastore error: in production, clear the cookie and proceed
    ///   unauthenticated without surfacing the error; in development,
    ///   log it and keep the cookie to ease debugging.
    pub async fn resolve(&self, session_token: Option<&str>) -> SessionOutcome {
        let Some(session_token) = session_token else {
            return SessionOutcome::default();
        };

        let claims = match token::decode_session_token(session_token, &self.config) {
            Ok(claims) => claims,
            Err(err) => {
                tracing::debug!(error = %err, "rejected session token");
                return SessionOutcome::cleared();
            }
        };

        let user_id = match Uuid::parse_str(&claims.sub) {
            Ok(id) => id,
            Err(_) => {
                tracing::debug!(sub = %claims.sub, "session subject is not a UUID");
                return SessionOutcome::cleared();
            }
        };

        match self.users.get_session_user(user_id).await {
            Ok(user) => SessionOutcome {
                user: Some(user),
                clear_cookie: false,
            },
            Err(CourierError::NotFound { .. }) => {
                tracing::debug!(user_id = %user_id, "session user no longer exists");
                SessionOutcome::cleared()
            }
            Err(err) if self.config.environment.is_development() => {
                tracing::error!(error = %err, "session lookup failed");
                SessionOutcome::default()
            }
            Err(_) => SessionOutcome::cleared(),
        }
    }
}

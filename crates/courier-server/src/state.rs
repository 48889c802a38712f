//! Application state: repositories and services assembled once at
//! startup and injected into every request.

use std::sync::Arc;

use courier_auth::api_key::ApiKeyAuthenticator;
use courier_auth::config::AuthConfig;
use courier_auth::session::SessionResolver;
use courier_db::repository::{
    SurrealApiKeyRepository, SurrealEmailLogRepository, SurrealProjectIdentityRepository,
    SurrealProjectRepository, SurrealUserRepository,
};
use courier_mailer::Mailer;
use courier_send::SendService;
use surrealdb::{Connection, Surreal};

pub struct AppState<C: Connection, M: Mailer> {
    pub sessions: Arc<SessionResolver<SurrealUserRepository<C>>>,
    pub authenticator:
        Arc<ApiKeyAuthenticator<SurrealApiKeyRepository<C>, SurrealProjectRepository<C>>>,
    pub send: Arc<
        SendService<SurrealProjectIdentityRepository<C>, SurrealEmailLogRepository<C>, M>,
    >,
    pub email_logs: Arc<SurrealEmailLogRepository<C>>,
    /// Name of the session cookie the middleware reads and clears.
    pub session_cookie: String,
}

impl<C: Connection, M: Mailer> AppState<C, M> {
    /// Wire every repository and service onto one database handle.
    pub fn new(db: Surreal<C>, auth: AuthConfig, mailer: M) -> Self {
        let session_cookie = auth.session_cookie_name.clone();
        Self {
            sessions: Arc::new(SessionResolver::new(
                SurrealUserRepository::new(db.clone()),
                auth,
            )),
            authenticator: Arc::new(ApiKeyAuthenticator::new(
                SurrealApiKeyRepository::new(db.clone()),
                SurrealProjectRepository::new(db.clone()),
            )),
            send: Arc::new(SendService::new(
                SurrealProjectIdentityRepository::new(db.clone()),
                SurrealEmailLogRepository::new(db.clone()),
                mailer,
            )),
            email_logs: Arc::new(SurrealEmailLogRepository::new(db)),
            session_cookie,
        }
    }
}

// Manual impl: cloning only bumps Arc refcounts, so neither `C` nor
// `M` needs to be `Clone`.
impl<C: Connection, M: Mailer> Clone for AppState<C, M> {
    fn clone(&self) -> Self {
        Self {
            sessions: Arc::clone(&self.sessions),
            authenticator: Arc::clone(&self.authenticator),
            send: Arc::clone(&self.send),
            email_logs: Arc::clone(&self.email_logs),
            session_cookie: self.session_cookie.clone(),
        }
    }
}

//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Project-owned repositories take
//! a `project_id` parameter to enforce tenancy isolation. Store handles
//! are injected at construction — nothing is resolved ambiently.

use uuid::Uuid;

use crate::error::CourierResult;
use crate::models::{
    api_key::{ApiKey, CreateApiKey},
    email_log::{CreateEmailLog, CreateEmailLogEvent, EmailLog, EmailLogEvent},
    identity::{CreateProjectIdentity, IdentityStatus, ProjectIdentity},
    project::{CreateProject, Project, ProviderCredentials},
    user::{CreateUser, SessionUser, User},
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

// ---------------------------------------------------------------------------
// Users (global scope)
// ---------------------------------------------------------------------------

pub trait UserRepository: Send + Sync {
    fn create(&self, input: CreateUser) -> impl Future<Output = CourierResult<User>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = CourierResult<User>> + Send;
    fn get_by_email(&self, email: &str) -> impl Future<Output = CourierResult<User>> + Send;
    /// Minimal read used by the session resolver: id, email, and name
    /// only.
    fn get_session_user(
        &self,
        id: Uuid,
    ) -> impl Future<Output = CourierResult<SessionUser>> + Send;
    /// Enable or disable an account. Disabled accounts are never
    /// hard-deleted.
    fn set_enabled(
        &self,
        id: Uuid,
        is_enabled: bool,
    ) -> impl Future<Output = CourierResult<()>> + Send;
}

// ---------------------------------------------------------------------------
// Projects (global scope)
// ---------------------------------------------------------------------------

pub trait ProjectRepository: Send + Sync {
    fn create(&self, input: CreateProject) -> impl Future<Output = CourierResult<Project>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = CourierResult<Project>> + Send;
    /// Replace the project's provider credentials.
    fn set_credentials(
        &self,
        id: Uuid,
        credentials: ProviderCredentials,
    ) -> impl Future<Output = CourierResult<Project>> + Send;
}

// ---------------------------------------------------------------------------
// Project-scoped repositories
// ---------------------------------------------------------------------------

pub trait ProjectIdentityRepository: Send + Sync {
    fn create(
        &self,
        input: CreateProjectIdentity,
    ) -> impl Future<Output = CourierResult<ProjectIdentity>> + Send;
    fn get_by_id(
        &self,
        project_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = CourierResult<ProjectIdentity>> + Send;
    /// Look up the identity for a sender domain within a project.
    fn get_by_domain(
        &self,
        project_id: Uuid,
        domain: &str,
    ) -> impl Future<Output = CourierResult<ProjectIdentity>> + Send;
    /// Record a provider-reported verification state change.
    fn set_status(
        &self,
        project_id: Uuid,
        id: Uuid,
        status: IdentityStatus,
    ) -> impl Future<Output = CourierResult<ProjectIdentity>> + Send;
    fn list(
        &self,
        project_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = CourierResult<PaginatedResult<ProjectIdentity>>> + Send;
}

pub trait ApiKeyRepository: Send + Sync {
    /// Issue a new key. Returns the record and the raw secret — the
    /// only time the secret is available in the clear.
    fn create(
        &self,
        input: CreateApiKey,
    ) -> impl Future<Output = CourierResult<(ApiKey, String)>> + Send;
    fn get_by_token_hash(
        &self,
        token_hash: &str,
    ) -> impl Future<Output = CourierResult<ApiKey>> + Send;
    /// Revoke a key. Revoked keys fail authentication but remain for
    /// audit.
    fn revoke(
        &self,
        project_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = CourierResult<ApiKey>> + Send;
    fn list(
        &self,
        project_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = CourierResult<PaginatedResult<ApiKey>>> + Send;
}

// ---------------------------------------------------------------------------
// Email logs (project-scoped; events are append-only)
// ---------------------------------------------------------------------------

pub trait EmailLogRepository: Send + Sync {
    fn create(
        &self,
        input: CreateEmailLog,
    ) -> impl Future<Output = CourierResult<EmailLog>> + Send;
    /// Append a lifecycle event. No update or delete operations exist.
    fn append_event(
        &self,
        input: CreateEmailLogEvent,
    ) -> impl Future<Output = CourierResult<EmailLogEvent>> + Send;
    fn get_by_id(
        &self,
        project_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = CourierResult<EmailLog>> + Send;
    /// Events for a log, oldest first.
    fn list_events(
        &self,
        email_log_id: Uuid,
    ) -> impl Future<Output = CourierResult<Vec<EmailLogEvent>>> + Send;
    fn list(
        &self,
        project_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = CourierResult<PaginatedResult<EmailLog>>> + Send;
}

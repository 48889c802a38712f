//! SurrealDB implementation of [`EmailLogRepository`].
//!
//! The log row and its events are inserted as independent writes with
//! no enclosing transaction; callers insert the log first and append
//! events after. A crash between the two leaves a log with no event —
//! an accepted gap.

use chrono::{DateTime, Utc};
use courier_core::error::CourierResult;
use courier_core::models::email_log::{
    CreateEmailLog, CreateEmailLogEvent, EmailLog, EmailLogEvent, EmailLogEventType,
    EmailLogStatus,
};
use courier_core::repository::{EmailLogRepository, PaginatedResult, Pagination};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct EmailLogRow {
    message_id: Option<String>,
    project_id: String,
    api_key_id: String,
    from_address: String,
    to_address: String,
    reply_to: Option<String>,
    subject: String,
    text_body: Option<String>,
    html_body: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct EmailLogRowWithId {
    record_id: String,
    message_id: Option<String>,
    project_id: String,
    api_key_id: String,
    from_address: String,
    to_address: String,
    reply_to: Option<String>,
    subject: String,
    text_body: Option<String>,
    html_body: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct EventRow {
    email_log_id: String,
    email: String,
    event_type: String,
    timestamp: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct EventRowWithId {
    record_id: String,
    email_log_id: String,
    email: String,
    event_type: String,
    timestamp: DateTime<Utc>,
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

fn parse_status(s: &str) -> Result<EmailLogStatus, DbError> {
    match s {
        "sending" => Ok(EmailLogStatus::Sending),
        "delivered" => Ok(EmailLogStatus::Delivered),
        "bounced" => Ok(EmailLogStatus::Bounced),
        "complained" => Ok(EmailLogStatus::Complained),
        "error" => Ok(EmailLogStatus::Error),
        other => Err(DbError::Decode(format!("unknown email log status: {other}"))),
    }
}

fn status_to_string(s: &EmailLogStatus) -> &'static str {
    match s {
        EmailLogStatus::Sending => "sending",
        EmailLogStatus::Delivered => "delivered",
        EmailLogStatus::Bounced => "bounced",
        EmailLogStatus::Complained => "complained",
        EmailLogStatus::Error => "error",
    }
}

fn parse_event_type(s: &str) -> Result<EmailLogEventType, DbError> {
    match s {
        "sending" => Ok(EmailLogEventType::Sending),
        "delivered" => Ok(EmailLogEventType::Delivered),
        "bounced" => Ok(EmailLogEventType::Bounced),
        "complained" => Ok(EmailLogEventType::Complained),
        "error" => Ok(EmailLogEventType::Error),
        "click" => Ok(EmailLogEventType::Click),
        "open" => Ok(EmailLogEventType::Open),
        other => Err(DbError::Decode(format!("unknown event type: {other}"))),
    }
}

fn event_type_to_string(t: &EmailLogEventType) -> &'static str {
    match t {
        EmailLogEventType::Sending => "sending",
        EmailLogEventType::Delivered => "delivered",
        EmailLogEventType::Bounced => "bounced",
        EmailLogEventType::Complained => "complained",
        EmailLogEventType::Error => "error",
        EmailLogEventType::Click => "click",
        EmailLogEventType::Open => "open",
    }
}

impl EmailLogRow {
    fn into_email_log(self, id: Uuid) -> Result<EmailLog, DbError> {
        let project_id = Uuid::parse_str(&self.project_id)
            .map_err(|e| DbError::Decode(format!("invalid project UUID: {e}")))?;
        let api_key_id = Uuid::parse_str(&self.api_key_id)
            .map_err(|e| DbError::Decode(format!("invalid api key UUID: {e}")))?;
        Ok(EmailLog {
            id,
            message_id: self.message_id,
            project_id,
            api_key_id,
            from: self.from_address,
            to: self.to_address,
            reply_to: self.reply_to,
            subject: self.subject,
            text: self.text_body,
            html: self.html_body,
            status: parse_status(&self.status)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl EmailLogRowWithId {
    fn try_into_email_log(self) -> Result<EmailLog, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        let project_id = Uuid::parse_str(&self.project_id)
            .map_err(|e| DbError::Decode(format!("invalid project UUID: {e}")))?;
        let api_key_id = Uuid::parse_str(&self.api_key_id)
            .map_err(|e| DbError::Decode(format!("invalid api key UUID: {e}")))?;
        Ok(EmailLog {
            id,
            message_id: self.message_id,
            project_id,
            api_key_id,
            from: self.from_address,
            to: self.to_address,
            reply_to: self.reply_to,
            subject: self.subject,
            text: self.text_body,
            html: self.html_body,
            status: parse_status(&self.status)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl EventRow {
    fn into_event(self, id: Uuid) -> Result<EmailLogEvent, DbError> {
        let email_log_id = Uuid::parse_str(&self.email_log_id)
            .map_err(|e| DbError::Decode(format!("invalid log UUID: {e}")))?;
        Ok(EmailLogEvent {
            id,
            email_log_id,
            email: self.email,
            event_type: parse_event_type(&self.event_type)?,
            timestamp: self.timestamp,
        })
    }
}

impl EventRowWithId {
    fn try_into_event(self) -> Result<EmailLogEvent, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        let email_log_id = Uuid::parse_str(&self.email_log_id)
            .map_err(|e| DbError::Decode(format!("invalid log UUID: {e}")))?;
        Ok(EmailLogEvent {
            id,
            email_log_id,
            email: self.email,
            event_type: parse_event_type(&self.event_type)?,
            timestamp: self.timestamp,
        })
    }
}

/// SurrealDB implementation of the email log repository.
#[derive(Clone)]
pub struct SurrealEmailLogRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealEmailLogRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> EmailLogRepository for SurrealEmailLogRepository<C> {
    async fn create(&self, input: CreateEmailLog) -> CourierResult<EmailLog> {
        // Exactly one id per row.
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('email_log', $id) SET \
                 message_id = $message_id, \
                 project_id = $project_id, \
                 api_key_id = $api_key_id, \
                 from_address = $from_address, \
                 to_address = $to_address, \
                 reply_to = $reply_to, \
                 subject = $subject, \
                 text_body = $text_body, \
                 html_body = $html_body, \
                 status = $status",
            )
            .bind(("id", id_str.clone()))
            .bind(("message_id", input.message_id))
            .bind(("project_id", input.project_id.to_string()))
            .bind(("api_key_id", input.api_key_id.to_string()))
            .bind(("from_address", input.from))
            .bind(("to_address", input.to))
            .bind(("reply_to", input.reply_to))
            .bind(("subject", input.subject))
            .bind(("text_body", input.text))
            .bind(("html_body", input.html))
            .bind(("status", status_to_string(&input.status).to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<EmailLogRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "email_log".into(),
            id: id_str,
        })?;

        Ok(row.into_email_log(id)?)
    }

    async fn append_event(&self, input: CreateEmailLogEvent) -> CourierResult<EmailLogEvent> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('email_log_event', $id) SET \
                 email_log_id = $email_log_id, \
                 email = $email, \
                 event_type = $event_type",
            )
            .bind(("id", id_str.clone()))
            .bind(("email_log_id", input.email_log_id.to_string()))
            .bind(("email", input.email))
            .bind((
                "event_type",
                event_type_to_string(&input.event_type).to_string(),
            ))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<EventRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "email_log_event".into(),
            id: id_str,
        })?;

        Ok(row.into_event(id)?)
    }

    async fn get_by_id(&self, project_id: Uuid, id: Uuid) -> CourierResult<EmailLog> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT * FROM type::record('email_log', $id) \
                 WHERE project_id = $project_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("project_id", project_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<EmailLogRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "email_log".into(),
            id: id_str,
        })?;

        Ok(row.into_email_log(id)?)
    }

    async fn list_events(&self, email_log_id: Uuid) -> CourierResult<Vec<EmailLogEvent>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM email_log_event \
                 WHERE email_log_id = $email_log_id \
                 ORDER BY timestamp ASC",
            )
            .bind(("email_log_id", email_log_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<EventRowWithId> = result.take(0).map_err(DbError::from)?;

        Ok(rows
            .into_iter()
            .map(|row| row.try_into_event())
            .collect::<Result<Vec<_>, DbError>>()?)
    }

    async fn list(
        &self,
        project_id: Uuid,
        pagination: Pagination,
    ) -> CourierResult<PaginatedResult<EmailLog>> {
        let project_id_str = project_id.to_string();

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM email_log \
                 WHERE project_id = $project_id GROUP ALL",
            )
            .bind(("project_id", project_id_str.clone()))
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM email_log \
                 WHERE project_id = $project_id \
                 ORDER BY created_at DESC \
                 LIMIT $limit START $offset",
            )
            .bind(("project_id", project_id_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<EmailLogRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_email_log())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}

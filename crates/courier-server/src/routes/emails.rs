//! Email sending and retrieval routes.

use std::collections::BTreeMap;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use courier_core::models::email_log::{EmailLog, EmailLogEvent};
use courier_core::repository::EmailLogRepository;
use courier_mailer::Mailer;
use courier_send::SendEmail;
use email_address::EmailAddress;
use serde::{Deserialize, Serialize};
use surrealdb::Connection;
use uuid::Uuid;

use crate::error::ApiError;
use crate::extract::ApiKeyAuth;
use crate::state::AppState;

/// `to`/`replyTo` admit a string or an array on the wire; the
/// business rule rejects arrays before any identity lookup.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Recipient {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailBody {
    pub from: Option<String>,
    pub to: Option<Recipient>,
    pub reply_to: Option<Recipient>,
    pub subject: Option<String>,
    pub text: Option<String>,
    pub html: Option<String>,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct SendEmailResponse {
    pub id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct EmailLogView {
    pub log: EmailLog,
    pub events: Vec<EmailLogEvent>,
}

/// `POST /api/v1/emails/send`
pub async fn send<C, M>(
    State(state): State<AppState<C, M>>,
    ApiKeyAuth(authenticated): ApiKeyAuth,
    payload: Result<Json<SendEmailBody>, JsonRejection>,
) -> Result<Json<SendEmailResponse>, ApiError>
where
    C: Connection,
    M: Mailer + 'static,
{
    let Json(body) = payload.map_err(|rejection| ApiError::validation(rejection.body_text()))?;
    let input = validate(body)?;

    let outcome = state
        .send
        .send(&authenticated.project, authenticated.api_key.id, input)
        .await?;

    Ok(Json(SendEmailResponse {
        id: outcome.email_log_id,
    }))
}

/// `GET /api/v1/emails/{id}` — a log row plus its lifecycle events,
/// scoped to the caller's project.
pub async fn get_email<C, M>(
    State(state): State<AppState<C, M>>,
    ApiKeyAuth(authenticated): ApiKeyAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<EmailLogView>, ApiError>
where
    C: Connection,
    M: Mailer + 'static,
{
    let log = state
        .email_logs
        .get_by_id(authenticated.project.id, id)
        .await?;
    let events = state.email_logs.list_events(log.id).await?;

    Ok(Json(EmailLogView { log, events }))
}

fn required_trimmed(value: Option<String>, field: &str) -> Result<String, ApiError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| ApiError::validation(format!("{field} is required")))
}

/// Validate the request body shape.
///
/// Shape checks come first; the multi-recipient rule fires afterwards,
/// before any identity lookup. `from` is required and trimmed but not
/// format-checked as an email address — its domain part is resolved
/// against the project's identities downstream.
fn validate(body: SendEmailBody) -> Result<SendEmail, ApiError> {
    let from = required_trimmed(body.from, "from")?;
    let subject = required_trimmed(body.subject, "subject")?;

    if body.text.is_none() && body.html.is_none() {
        return Err(ApiError::validation("either text or html must be provided"));
    }

    // `None` marks an array value, rejected after shape validation.
    let to = match body.to {
        None => return Err(ApiError::validation("to is required")),
        Some(Recipient::Many(_)) => None,
        Some(Recipient::One(value)) => {
            let value = value.trim().to_lowercase();
            if value.parse::<EmailAddress>().is_err() {
                return Err(ApiError::validation("to must be a valid email address"));
            }
            Some(value)
        }
    };

    let reply_to = match body.reply_to {
        None => Some(None),
        Some(Recipient::Many(_)) => None,
        Some(Recipient::One(value)) => {
            let value = value.trim().to_owned();
            if value.parse::<EmailAddress>().is_err() {
                return Err(ApiError::validation("replyTo must be a valid email address"));
            }
            Some(Some(value))
        }
    };

    let (Some(to), Some(reply_to)) = (to, reply_to) else {
        return Err(ApiError::bad_request("Multiple recipients are not supported"));
    };

    Ok(SendEmail {
        from,
        to,
        reply_to,
        subject,
        text: body.text,
        html: body.html,
        headers: body.headers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body() -> SendEmailBody {
        SendEmailBody {
            from: Some("hello@mly.fyi".into()),
            to: Some(Recipient::One("a@b.com".into())),
            reply_to: None,
            subject: Some("Hello".into()),
            text: Some("Hello World".into()),
            html: Some("<p>Hello World</p>".into()),
            headers: BTreeMap::new(),
        }
    }

    #[test]
    fn valid_body_passes() {
        let input = validate(body()).unwrap();
        assert_eq!(input.from, "hello@mly.fyi");
        assert_eq!(input.to, "a@b.com");
        assert_eq!(input.subject, "Hello");
    }

    #[test]
    fn to_is_trimmed_and_lowercased() {
        let mut b = body();
        b.to = Some(Recipient::One("  A@B.COM ".into()));
        let input = validate(b).unwrap();
        assert_eq!(input.to, "a@b.com");
    }

    #[test]
    fn from_is_trimmed_but_not_format_checked() {
        let mut b = body();
        b.from = Some("  Courier Notifications <hello@mly.fyi>  ".into());
        let input = validate(b).unwrap();
        assert_eq!(input.from, "Courier Notifications <hello@mly.fyi>");
    }

    #[test]
    fn missing_required_fields_are_validation_errors() {
        let mut b = body();
        b.from = Some("   ".into());
        assert_eq!(validate(b).unwrap_err().kind(), "validation_error");

        let mut b = body();
        b.subject = None;
        assert_eq!(validate(b).unwrap_err().kind(), "validation_error");

        let mut b = body();
        b.to = None;
        assert_eq!(validate(b).unwrap_err().kind(), "validation_error");
    }

    #[test]
    fn neither_text_nor_html_is_a_validation_error() {
        let mut b = body();
        b.text = None;
        b.html = None;
        assert_eq!(validate(b).unwrap_err().kind(), "validation_error");
    }

    #[test]
    fn empty_string_body_counts_as_present() {
        let mut b = body();
        b.text = Some(String::new());
        b.html = None;
        let input = validate(b).unwrap();
        assert_eq!(input.text.as_deref(), Some(""));
    }

    #[test]
    fn bad_recipient_format_is_a_validation_error() {
        let mut b = body();
        b.to = Some(Recipient::One("not-an-email".into()));
        assert_eq!(validate(b).unwrap_err().kind(), "validation_error");

        let mut b = body();
        b.reply_to = Some(Recipient::One("also bad".into()));
        assert_eq!(validate(b).unwrap_err().kind(), "validation_error");
    }

    #[test]
    fn recipient_arrays_are_rejected_as_bad_request() {
        let mut b = body();
        b.to = Some(Recipient::Many(vec!["a@b.com".into(), "c@d.com".into()]));
        let err = validate(b).unwrap_err();
        assert_eq!(err.kind(), "bad_request");

        let mut b = body();
        b.reply_to = Some(Recipient::Many(vec!["a@b.com".into()]));
        assert_eq!(validate(b).unwrap_err().kind(), "bad_request");
    }
}

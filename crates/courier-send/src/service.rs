//! Send pipeline — authorize, dispatch, and durably log one email.

use std::collections::BTreeMap;

use courier_core::error::{CourierError, CourierResult};
use courier_core::models::email_log::{
    CreateEmailLog, CreateEmailLogEvent, EmailLogEventType, EmailLogStatus,
};
use courier_core::models::identity::IdentityStatus;
use courier_core::models::project::Project;
use courier_core::repository::{EmailLogRepository, ProjectIdentityRepository};
use courier_mailer::{MailError, Mailer, OutgoingEmail};
use uuid::Uuid;

/// A shape-validated, single-recipient send request.
///
/// The HTTP layer owns body validation (required fields, email
/// formats, multi-recipient rejection); by the time a value of this
/// type exists, only business rules remain to check.
#[derive(Debug, Clone)]
pub struct SendEmail {
    pub from: String,
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub text: Option<String>,
    pub html: Option<String>,
    pub headers: BTreeMap<String, String>,
}

/// Outcome of a successful pipeline run.
#[derive(Debug)]
pub struct SendOutcome {
    /// Id of the `sending` log row recorded for this dispatch.
    pub email_log_id: Uuid,
}

/// The send-email pipeline.
///
/// Stateless across calls except for what is persisted. Generic over
/// repository and mailer implementations so that the pipeline has no
/// dependency on the database or HTTP crates.
pub struct SendService<I, L, M>
where
    I: ProjectIdentityRepository,
    L: EmailLogRepository,
    M: Mailer,
{
    identities: I,
    email_logs: L,
    mailer: M,
}

impl<I, L, M> SendService<I, L, M>
where
    I: ProjectIdentityRepository,
    L: EmailLogRepository,
    M: Mailer,
{
    pub fn new(identities: I, email_logs: L, mailer: M) -> Self {
        Self {
            identities,
            email_logs,
            mailer,
        }
    }

    /// Dispatch one email on behalf of an authenticated project and
    /// record the outcome.
    ///
    /// On provider success the log row is written with `sending` and
    /// the provider's message id; on provider failure with `error`,
    /// and the provider's message is re-surfaced as a `Provider`
    /// error (rendered as a bad request at the response boundary).
    /// Either way the log insert precedes the event insert — the two
    /// writes are not transactional, so a crash between them can
    /// leave a log without an event.
    pub async fn send(
        &self,
        project: &Project,
        api_key_id: Uuid,
        input: SendEmail,
    ) -> CourierResult<SendOutcome> {
        // 1. Resolve the sending identity for the from-domain.
        let domain = sender_domain(&input.from);
        let identity = self.identities.get_by_domain(project.id, domain).await?;

        if identity.status != IdentityStatus::Success {
            return Err(CourierError::BadRequest {
                message: format!("Domain {domain} is not verified"),
            });
        }

        let Some(configuration_set_name) = identity.configuration_set_name else {
            return Err(CourierError::BadRequest {
                message: format!("Domain {domain} has no configuration set provisioned"),
            });
        };

        // 2. The project must carry complete provider credentials.
        let Some(credentials) = project.credentials() else {
            return Err(CourierError::BadRequest {
                message: "Project has no sending credentials configured".into(),
            });
        };

        // 3. Dispatch, awaited inline.
        let outgoing = OutgoingEmail {
            from: input.from.clone(),
            to: input.to.clone(),
            reply_to: input.reply_to.clone(),
            subject: input.subject.clone(),
            text: input.text.clone(),
            html: input.html.clone(),
            headers: input.headers.clone(),
            configuration_set_name,
        };

        // 4. Persist the outcome: log row first, then its event.
        match self.mailer.send(&credentials, &outgoing).await {
            Ok(result) => {
                let log = self
                    .email_logs
                    .create(log_row(
                        project.id,
                        api_key_id,
                        &input,
                        EmailLogStatus::Sending,
                        Some(result.message_id),
                    ))
                    .await?;
                self.email_logs
                    .append_event(CreateEmailLogEvent {
                        email_log_id: log.id,
                        email: input.to,
                        event_type: EmailLogEventType::Sending,
                    })
                    .await?;

                tracing::info!(email_log_id = %log.id, "email dispatched");
                Ok(SendOutcome {
                    email_log_id: log.id,
                })
            }
            Err(err) => {
                let message = match err {
                    MailError::Provider(message) => message,
                    other => other.to_string(),
                };

                let log = self
                    .email_logs
                    .create(log_row(
                        project.id,
                        api_key_id,
                        &input,
                        EmailLogStatus::Error,
                        None,
                    ))
                    .await?;
                self.email_logs
                    .append_event(CreateEmailLogEvent {
                        email_log_id: log.id,
                        email: input.to,
                        event_type: EmailLogEventType::Error,
                    })
                    .await?;

                tracing::warn!(email_log_id = %log.id, error = %message, "provider rejected send");
                Err(CourierError::Provider { message })
            }
        }
    }
}

fn log_row(
    project_id: Uuid,
    api_key_id: Uuid,
    input: &SendEmail,
    status: EmailLogStatus,
    message_id: Option<String>,
) -> CreateEmailLog {
    CreateEmailLog {
        message_id,
        project_id,
        api_key_id,
        from: input.from.clone(),
        to: input.to.clone(),
        reply_to: input.reply_to.clone(),
        subject: input.subject.clone(),
        text: input.text.clone(),
        html: input.html.clone(),
        status,
    }
}

/// Domain portion of the sender address: everything between the first
/// `@` and the next. Addresses without an `@` yield the empty string
/// and fall out at identity lookup.
fn sender_domain(from: &str) -> &str {
    from.split('@').nth(1).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sender_domain_takes_substring_after_first_at() {
        assert_eq!(sender_domain("hello@mly.fyi"), "mly.fyi");
        assert_eq!(sender_domain("no-at-sign"), "");
        // Multi-@ input is split naively, not validated.
        assert_eq!(sender_domain("a@b@c"), "b");
    }
}

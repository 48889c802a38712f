//! SES v2 `SendEmail` client.
//!
//! One HTTPS call per dispatch, signed with the project's own
//! credentials. The identity's configuration set rides along as
//! `ConfigurationSetName` — the HTTP-API equivalent of the
//! `X-SES-CONFIGURATION-SET` message header — so the provider emits
//! delivery events for the send.

use chrono::Utc;
use courier_core::models::project::ProviderCredentials;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::message::OutgoingEmail;
use crate::sigv4::{self, SigningParams};
use crate::{MailError, Mailer, ProviderSendResult};

const SEND_PATH: &str = "/v2/email/outbound-emails";

/// SES-backed [`Mailer`] implementation.
#[derive(Clone, Default)]
pub struct SesMailer {
    http: reqwest::Client,
}

impl SesMailer {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SendEmailResponse {
    message_id: Option<String>,
}

impl Mailer for SesMailer {
    async fn send(
        &self,
        credentials: &ProviderCredentials,
        email: &OutgoingEmail,
    ) -> Result<ProviderSendResult, MailError> {
        let host = format!("email.{}.amazonaws.com", credentials.region);
        let url = format!("https://{host}{SEND_PATH}");

        let payload = serde_json::to_vec(&build_request_body(email))
            .map_err(|e| MailError::Build(e.to_string()))?;

        let signed = sigv4::sign_request(&SigningParams {
            access_key_id: &credentials.access_key_id,
            secret_access_key: &credentials.secret_access_key,
            region: &credentials.region,
            service: "ses",
            host: &host,
            method: "POST",
            path: SEND_PATH,
            payload: &payload,
            timestamp: Utc::now(),
        });

        let response = self
            .http
            .post(&url)
            .header("content-type", "application/json")
            .header("x-amz-date", &signed.amz_date)
            .header("authorization", &signed.authorization)
            .body(payload)
            .send()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            let parsed: SendEmailResponse = response
                .json()
                .await
                .map_err(|e| MailError::Transport(e.to_string()))?;
            let message_id = parsed.message_id.unwrap_or_default();
            tracing::debug!(message_id = %message_id, "provider accepted send");
            Ok(ProviderSendResult { message_id })
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(MailError::Provider(provider_message(status, &body)))
        }
    }
}

/// Assemble the SES v2 `SendEmail` request body.
fn build_request_body(email: &OutgoingEmail) -> Value {
    let mut message_body = serde_json::Map::new();
    if let Some(text) = &email.text {
        message_body.insert(
            "Text".into(),
            json!({ "Data": text, "Charset": "UTF-8" }),
        );
    }
    if let Some(html) = &email.html {
        message_body.insert(
            "Html".into(),
            json!({ "Data": html, "Charset": "UTF-8" }),
        );
    }

    let mut simple = serde_json::Map::new();
    simple.insert(
        "Subject".into(),
        json!({ "Data": email.subject, "Charset": "UTF-8" }),
    );
    simple.insert("Body".into(), Value::Object(message_body));
    if !email.headers.is_empty() {
        let headers: Vec<Value> = email
            .headers
            .iter()
            .map(|(name, value)| json!({ "Name": name, "Value": value }))
            .collect();
        simple.insert("Headers".into(), Value::Array(headers));
    }

    let mut body = serde_json::Map::new();
    body.insert("FromEmailAddress".into(), json!(email.from));
    body.insert("Destination".into(), json!({ "ToAddresses": [email.to] }));
    if let Some(reply_to) = &email.reply_to {
        body.insert("ReplyToAddresses".into(), json!([reply_to]));
    }
    body.insert("Content".into(), json!({ "Simple": Value::Object(simple) }));
    body.insert(
        "ConfigurationSetName".into(),
        json!(email.configuration_set_name),
    );

    Value::Object(body)
}

/// Extract the provider's human-readable error message, falling back
/// to the HTTP status when the body is not the expected JSON shape.
fn provider_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("Message"))
                .and_then(Value::as_str)
                .map(str::to_owned)
        })
        .unwrap_or_else(|| format!("provider returned HTTP {status}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn sample_email() -> OutgoingEmail {
        OutgoingEmail {
            from: "hello@mly.fyi".into(),
            to: "a@b.com".into(),
            reply_to: None,
            subject: "Hello".into(),
            text: Some("Hello World".into()),
            html: Some("<p>Hello World</p>".into()),
            headers: BTreeMap::new(),
            configuration_set_name: "courier-tracking".into(),
        }
    }

    #[test]
    fn request_body_carries_configuration_set() {
        let body = build_request_body(&sample_email());
        assert_eq!(body["ConfigurationSetName"], "courier-tracking");
        assert_eq!(body["FromEmailAddress"], "hello@mly.fyi");
        assert_eq!(body["Destination"]["ToAddresses"][0], "a@b.com");
        assert_eq!(
            body["Content"]["Simple"]["Body"]["Text"]["Data"],
            "Hello World"
        );
        assert_eq!(
            body["Content"]["Simple"]["Body"]["Html"]["Data"],
            "<p>Hello World</p>"
        );
    }

    #[test]
    fn reply_to_and_headers_are_optional() {
        let mut email = sample_email();
        let body = build_request_body(&email);
        assert!(body.get("ReplyToAddresses").is_none());
        assert!(body["Content"]["Simple"].get("Headers").is_none());

        email.reply_to = Some("replies@mly.fyi".into());
        email
            .headers
            .insert("X-Entity-Ref".into(), "abc-123".into());
        let body = build_request_body(&email);
        assert_eq!(body["ReplyToAddresses"][0], "replies@mly.fyi");
        assert_eq!(
            body["Content"]["Simple"]["Headers"][0]["Name"],
            "X-Entity-Ref"
        );
    }

    #[test]
    fn text_only_email_omits_html_part() {
        let mut email = sample_email();
        email.html = None;
        let body = build_request_body(&email);
        assert!(body["Content"]["Simple"]["Body"].get("Html").is_none());
        assert!(body["Content"]["Simple"]["Body"].get("Text").is_some());
    }

    #[test]
    fn provider_message_prefers_body_text() {
        let msg = provider_message(
            StatusCode::BAD_REQUEST,
            r#"{"message":"Email address is not verified."}"#,
        );
        assert_eq!(msg, "Email address is not verified.");

        let msg = provider_message(StatusCode::FORBIDDEN, "<html>not json</html>");
        assert_eq!(msg, "provider returned HTTP 403 Forbidden");
    }
}

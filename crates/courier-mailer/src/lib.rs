//! Courier Mailer — provider dispatch adapter.
//!
//! Wraps the hosted email provider's HTTP API behind the [`Mailer`]
//! trait so the send pipeline never sees transport details. The
//! shipped implementation targets the SES v2 `SendEmail` API; tests
//! substitute their own implementations.

mod message;
mod ses;
mod sigv4;

pub use message::OutgoingEmail;
pub use ses::SesMailer;

use courier_core::models::project::ProviderCredentials;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("{0}")]
    Provider(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("failed to build request: {0}")]
    Build(String),
}

/// Result of a successful provider dispatch.
#[derive(Debug, Clone)]
pub struct ProviderSendResult {
    /// Provider-assigned message id.
    pub message_id: String,
}

/// Async provider dispatch.
///
/// Implementations own their retry and timeout policy; the pipeline
/// awaits the call inline and imposes neither.
pub trait Mailer: Send + Sync {
    fn send(
        &self,
        credentials: &ProviderCredentials,
        email: &OutgoingEmail,
    ) -> impl Future<Output = Result<ProviderSendResult, MailError>> + Send;
}

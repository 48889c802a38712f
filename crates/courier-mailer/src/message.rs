//! Outgoing message type handed to the provider adapter.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single-recipient message ready for provider dispatch.
///
/// Shape validation happened upstream; the adapter treats every field
/// as opaque content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub text: Option<String>,
    pub html: Option<String>,
    /// Caller-supplied extra message headers.
    pub headers: BTreeMap<String, String>,
    /// Provider-side configuration set enabling delivery tracking.
    pub configuration_set_name: String,
}

//! Authentication configuration.

/// Deployment environment, injected explicitly at construction.
///
/// The session resolver swallows datastore errors in production but
/// logs them (and keeps the cookie) in development — this flag carries
/// that decision instead of an ambient environment lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn is_development(self) -> bool {
        matches!(self, Environment::Development)
    }
}

/// Configuration for session tokens and the session resolver.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// PEM-encoded Ed25519 private key for session-token signing.
    pub jwt_private_key_pem: String,
    /// PEM-encoded Ed25519 public key for session-token verification.
    pub jwt_public_key_pem: String,
    /// Session token lifetime in seconds (default: 1_209_600 = 14 days).
    pub session_lifetime_secs: u64,
    /// JWT issuer (`iss` claim).
    pub jwt_issuer: String,
    /// Name of the cookie carrying the session token.
    pub session_cookie_name: String,
    /// Deployment environment; governs resolver error handling.
    pub environment: Environment,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_private_key_pem: String::new(),
            jwt_public_key_pem: String::new(),
            session_lifetime_secs: 1_209_600,
            jwt_issuer: "courier".into(),
            session_cookie_name: "courier_session".into(),
            environment: Environment::Production,
        }
    }
}

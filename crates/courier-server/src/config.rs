//! Server configuration loaded from the environment at startup.
//!
//! The environment is read exactly once, here; every component
//! receives its configuration by value.

use std::net::SocketAddr;

use courier_auth::config::{AuthConfig, Environment};
use courier_db::DbConfig;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {message}")]
    Invalid {
        name: &'static str,
        message: String,
    },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
    pub database: DbConfig,
    pub auth: AuthConfig,
}

fn var_or(name: &'static str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn required_var(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::Missing(name))
}

impl ServerConfig {
    /// Read configuration from `COURIER_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let listen_addr = var_or("COURIER_LISTEN_ADDR", "0.0.0.0:8080")
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                name: "COURIER_LISTEN_ADDR",
                message: e.to_string(),
            })?;

        let database = DbConfig {
            url: var_or("COURIER_DB_URL", "127.0.0.1:8000"),
            namespace: var_or("COURIER_DB_NAMESPACE", "courier"),
            database: var_or("COURIER_DB_DATABASE", "main"),
            username: var_or("COURIER_DB_USERNAME", "root"),
            password: var_or("COURIER_DB_PASSWORD", "root"),
        };

        let environment = match var_or("COURIER_ENVIRONMENT", "production").as_str() {
            "development" => Environment::Development,
            "production" => Environment::Production,
            other => {
                return Err(ConfigError::Invalid {
                    name: "COURIER_ENVIRONMENT",
                    message: format!("expected 'development' or 'production', got '{other}'"),
                });
            }
        };

        let auth = AuthConfig {
            jwt_private_key_pem: required_var("COURIER_SESSION_PRIVATE_KEY")?,
            jwt_public_key_pem: required_var("COURIER_SESSION_PUBLIC_KEY")?,
            session_cookie_name: var_or("COURIER_SESSION_COOKIE", "courier_session"),
            environment,
            ..AuthConfig::default()
        };

        Ok(Self {
            listen_addr,
            database,
            auth,
        })
    }
}

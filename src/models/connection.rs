//! Connection settings for the PostgreSQL session.
//!
//! Settings are assembled once at startup (from a connection URL, discrete
//! `PG*`-style fields, or both) and handed to the session, which only turns
//! them into a live connection on first use.

use crate::tools::sql_rewrite::quote_ident;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgConnectOptions;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Schema used when none is configured.
pub const DEFAULT_SCHEMA: &str = "public";

/// Default port for PostgreSQL.
pub const DEFAULT_PORT: u16 = 5432;

/// Application name reported to the server (visible in `pg_stat_activity`).
pub const APPLICATION_NAME: &str = "pg-agent-tool";

/// Everything needed to open the read-only session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionSettings {
    /// Full connection URL. Contains sensitive data - never log
    #[serde(skip_serializing)]
    pub url: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    /// Contains sensitive data - never log
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub database: Option<String>,
    /// Schema every table reference is qualified with.
    pub schema: String,
    pub connect_timeout: Duration,
    pub query_timeout: Duration,
}

impl ConnectionSettings {
    /// Create settings for the given schema with every other field unset.
    pub fn new(schema: impl Into<String>) -> Self {
        Self {
            url: None,
            host: None,
            port: None,
            user: None,
            password: None,
            database: None,
            schema: schema.into(),
            connect_timeout: Duration::from_secs(10),
            query_timeout: Duration::from_secs(30),
        }
    }

    /// Validate settings and return an error message if invalid.
    pub fn validate(&self) -> Result<(), ConnectionSettingsError> {
        if self.schema.trim().is_empty() {
            return Err(ConnectionSettingsError::EmptySchema);
        }
        if let Some(url) = &self.url {
            let parsed = Url::parse(url)
                .map_err(|e| ConnectionSettingsError::InvalidUrl(e.to_string()))?;
            let scheme = parsed.scheme().to_lowercase();
            if scheme != "postgres" && scheme != "postgresql" {
                return Err(ConnectionSettingsError::UnsupportedScheme(scheme));
            }
        }
        if self.query_timeout.is_zero() || self.connect_timeout.is_zero() {
            return Err(ConnectionSettingsError::ZeroTimeout);
        }
        Ok(())
    }

    /// Build the driver connect options.
    ///
    /// Discrete fields override whatever the URL specifies. The session is pinned
    /// to the configured schema and every transaction defaults to read-only.
    pub fn connect_options(&self) -> Result<PgConnectOptions, ConnectionSettingsError> {
        let mut options = match &self.url {
            Some(url) => PgConnectOptions::from_str(url)
                .map_err(|e| ConnectionSettingsError::InvalidUrl(e.to_string()))?,
            None => PgConnectOptions::new(),
        };

        if let Some(host) = &self.host {
            options = options.host(host);
        }
        if let Some(port) = self.port {
            options = options.port(port);
        }
        if let Some(user) = &self.user {
            options = options.username(user);
        }
        if let Some(password) = &self.password {
            options = options.password(password);
        }
        if let Some(database) = &self.database {
            options = options.database(database);
        }

        Ok(options
            .application_name(APPLICATION_NAME)
            .options([
                ("search_path", quote_ident(&self.schema)),
                ("default_transaction_read_only", "on".to_string()),
            ]))
    }

    /// Display-safe description of the target (credentials masked).
    pub fn display_target(&self) -> String {
        if let Some(url) = &self.url {
            return match Url::parse(url) {
                Ok(mut parsed) => {
                    if parsed.password().is_some() {
                        let _ = parsed.set_password(Some("****"));
                    }
                    parsed.to_string()
                }
                Err(_) => "<invalid url>".to_string(),
            };
        }

        format!(
            "postgres://{}@{}:{}/{}",
            self.user.as_deref().unwrap_or(""),
            self.host.as_deref().unwrap_or("localhost"),
            self.port.unwrap_or(DEFAULT_PORT),
            self.database.as_deref().unwrap_or("")
        )
    }
}

/// Errors that can occur when validating connection settings.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionSettingsError {
    #[error("Schema name cannot be empty")]
    EmptySchema,

    #[error("Invalid connection URL: {0}")]
    InvalidUrl(String),

    #[error("Unsupported URL scheme '{0}'. Use postgres:// or postgresql://")]
    UnsupportedScheme(String),

    #[error("Timeouts must be greater than zero")]
    ZeroTimeout,
}

//! Application settings.
//!
//! Everything tunable comes from environment variables (a `.env` file is
//! loaded first in `main`, but variables can be set externally). The
//! maintenance flag gates the whole API at the HTTP boundary; the core never
//! sees it.

use crate::errors::{Error, Result};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/presupuesto.sqlite?mode=rwc";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SESSION_TTL_MINUTES: i64 = 10;

/// Runtime configuration for the service.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// SeaORM connection string (`DATABASE_URL`)
    pub database_url: String,
    /// Socket address the HTTP server listens on (`BIND_ADDR`)
    pub bind_addr: String,
    /// HS256 secret for session tokens (`SESSION_SECRET`, required)
    pub session_secret: String,
    /// Session lifetime in minutes (`SESSION_TTL_MINUTES`)
    pub session_ttl_minutes: i64,
    /// When true every endpoint except health answers 503 (`MAINTENANCE_MODE`)
    pub maintenance_mode: bool,
}

impl AppConfig {
    /// Loads the configuration from the environment.
    ///
    /// # Errors
    /// Fails with [`Error::Config`] when `SESSION_SECRET` is unset or a
    /// numeric variable does not parse.
    pub fn from_env() -> Result<Self> {
        let session_secret = std::env::var("SESSION_SECRET").map_err(|_| Error::Config {
            message: "SESSION_SECRET must be set".to_string(),
        })?;

        let session_ttl_minutes = match std::env::var("SESSION_TTL_MINUTES") {
            Ok(raw) => raw.parse().map_err(|_| Error::Config {
                message: format!("SESSION_TTL_MINUTES is not a number: '{raw}'"),
            })?,
            Err(_) => DEFAULT_SESSION_TTL_MINUTES,
        };

        let maintenance_mode = std::env::var("MAINTENANCE_MODE")
            .map(|raw| matches!(raw.as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            session_secret,
            session_ttl_minutes,
            maintenance_mode,
        })
    }
}

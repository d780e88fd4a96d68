//! Process configuration loaded once from the environment at startup.
//!
//! All credential material (OAuth client, refresh token, shared API token)
//! lives here, read-only for the process lifetime. None of it is ever logged.

use std::env;

use thiserror::Error;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;

/// Default Google OAuth2 token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
/// Default YouTube Data API v3 base URL.
pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/youtube/v3";
/// Default YouTube Data API v3 upload base URL (thumbnails).
pub const DEFAULT_UPLOAD_BASE: &str = "https://www.googleapis.com/upload/youtube/v3";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),
    #[error("invalid value for {0}")]
    InvalidVar(&'static str),
}

/// Immutable relay configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Google OAuth2 client ID.
    pub client_id: String,
    /// Google OAuth2 client secret.
    pub client_secret: String,
    /// Redirect URL registered with the OAuth client (consent flow only).
    pub redirect_url: String,
    /// Long-lived refresh token for the pre-authorized channel owner.
    pub refresh_token: String,
    /// Shared secret callers must present in the relay token header.
    pub api_token: String,
    /// Browser origin allowed by CORS, if any.
    pub cors_origin: Option<String>,
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// OAuth2 token endpoint (overridable for tests).
    pub token_url: String,
    /// YouTube API base URL (overridable for tests).
    pub api_base: String,
    /// YouTube upload API base URL (overridable for tests).
    pub upload_base: String,
}

impl Config {
    /// Load configuration from the environment. Fails fast on any missing
    /// credential so a misconfigured deployment never reaches traffic.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match env::var("RELAY_PORT") {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidVar("RELAY_PORT"))?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            client_id: required("RELAY_CLIENT_ID")?,
            client_secret: required("RELAY_CLIENT_SECRET")?,
            redirect_url: required("RELAY_REDIRECT_URL")?,
            refresh_token: required("RELAY_REFRESH_TOKEN")?,
            api_token: required("RELAY_API_TOKEN")?,
            cors_origin: optional("RELAY_CORS_ORIGIN"),
            host: optional("RELAY_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            token_url: optional("RELAY_TOKEN_URL").unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
            api_base: optional("RELAY_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            upload_base: optional("RELAY_UPLOAD_BASE")
                .unwrap_or_else(|| DEFAULT_UPLOAD_BASE.to_string()),
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    match optional(name) {
        Some(value) => Ok(value),
        None => Err(ConfigError::MissingVar(name)),
    }
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().and_then(|value| {
        let trimmed = value.trim().to_string();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    })
}

//! Google OAuth 2.0 for the pre-authorized channel.
//!
//! Two operations only: building the one-time consent URL (used by an
//! administrator to mint the refresh token) and exchanging the stored refresh
//! token for a short-lived access token ahead of each broadcast creation.

use std::collections::HashMap;
use std::time::Duration;

use log::{error, info};
use serde::Deserialize;
use thiserror::Error;

use crate::config::Config;

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Scopes required to manage live broadcasts on the channel.
const YOUTUBE_SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/youtube",
    "https://www.googleapis.com/auth/youtube.force-ssl",
];

const REQUEST_TIMEOUT_SECS: u64 = 15;

/// Fixed state value for the administrative consent redirect. The flow is a
/// one-time manual setup with no callback server holding per-session state,
/// so a constant satisfies the provider's requirement.
const CONSENT_STATE: &str = "setup";

#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("token refresh request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("token endpoint returned {0}")]
    Rejected(reqwest::StatusCode),
}

/// Token endpoint response. Google omits the refresh token on refresh grants.
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthTokens {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// OAuth client bound to the configured Google application.
pub struct OAuthService {
    http_client: reqwest::Client,
    client_id: String,
    client_secret: String,
    redirect_url: String,
    token_url: String,
}

impl OAuthService {
    pub fn new(config: &Config) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http_client,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_url: config.redirect_url.clone(),
            token_url: config.token_url.clone(),
        }
    }

    /// Build the Google consent URL for the administrative setup flow.
    /// `access_type=offline` + `prompt=consent` force issuance of a refresh
    /// token even when the channel owner already granted access before.
    pub fn consent_url(&self) -> String {
        let scopes = YOUTUBE_SCOPES.join(" ");
        let params = [
            ("client_id", self.client_id.as_str()),
            ("redirect_uri", self.redirect_url.as_str()),
            ("response_type", "code"),
            ("scope", &scopes),
            ("state", CONSENT_STATE),
            ("access_type", "offline"),
            ("prompt", "consent"),
        ];

        let query = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        format!("{}?{}", GOOGLE_AUTH_URL, query)
    }

    /// Exchange the stored refresh token for a fresh access token.
    pub async fn refresh_access_token(&self, refresh_token: &str) -> Result<String, OAuthError> {
        let mut params = HashMap::new();
        params.insert("client_id", self.client_id.as_str());
        params.insert("client_secret", self.client_secret.as_str());
        params.insert("refresh_token", refresh_token);
        params.insert("grant_type", "refresh_token");

        info!("Refreshing YouTube access token");

        let response = self
            .http_client
            .post(&self.token_url)
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("Token refresh failed: {} - {}", status, body);
            return Err(OAuthError::Rejected(status));
        }

        let tokens: OAuthTokens = response.json().await?;
        Ok(tokens.access_token)
    }
}

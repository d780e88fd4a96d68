// Broadcast Models
// Wire contract for POST /broadcasting and the normalized form passed to the
// orchestrator. Everything here lives for a single request/response cycle.

use serde::{Deserialize, Serialize};

/// Privacy tier of the broadcast. Serializes to the exact YouTube API
/// constants; any other string is rejected at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PrivacyStatus {
    Public,
    Unlisted,
    Private,
}

impl PrivacyStatus {
    /// The string constant the YouTube API expects.
    pub fn as_api_str(&self) -> &'static str {
        match self {
            PrivacyStatus::Public => "public",
            PrivacyStatus::Unlisted => "unlisted",
            PrivacyStatus::Private => "private",
        }
    }
}

/// Latency preference for the broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LatencyPreference {
    UltraLow,
    Low,
    Normal,
}

impl LatencyPreference {
    pub fn as_api_str(&self) -> &'static str {
        match self {
            LatencyPreference::UltraLow => "ultraLow",
            LatencyPreference::Low => "low",
            LatencyPreference::Normal => "normal",
        }
    }
}

/// Incoming request body for POST /broadcasting.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// RFC 3339 timestamp, passed through to the platform unmodified.
    pub scheduled_start_time: String,
    pub privacy_status: PrivacyStatus,
    pub latency: LatencyPreference,
    /// Optional data-URI encoded image (`data:image/png;base64,...`).
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub auto_start: bool,
    #[serde(default)]
    pub auto_stop: bool,
}

/// Normalized broadcast parameters handed to the orchestrator. The thumbnail
/// is decoded up front so a bad payload never creates a dangling broadcast.
#[derive(Debug, Clone)]
pub struct BroadcastParams {
    pub title: String,
    pub description: String,
    pub scheduled_start_time: String,
    pub privacy_status: PrivacyStatus,
    pub latency: LatencyPreference,
    pub auto_start: bool,
    pub auto_stop: bool,
    pub thumbnail: Option<Vec<u8>>,
}

/// Response body for a successful broadcast creation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastResult {
    pub title: String,
    pub video_id: String,
    pub stream_name: String,
    pub stream_address: String,
}

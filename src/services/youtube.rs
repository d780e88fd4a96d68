// YouTube Data API v3 Client
// The five broadcast-creation operations, executed strictly in order.
// The chain short-circuits on the first failing step; nothing is rolled back.

use std::fmt;
use std::time::Duration;

use log::info;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::models::{BroadcastParams, BroadcastResult};

const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum YouTubeError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("API returned {status}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("stream {0} missing from ingestion lookup")]
    StreamNotFound(String),
}

/// Which link of the creation chain an error belongs to. Surfaced to the
/// caller as an opaque tag in the error response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    TokenRefresh,
    CreateBroadcast,
    CreateStream,
    BindStream,
    IngestionInfo,
    SetThumbnail,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::TokenRefresh => "tokenRefresh",
            Step::CreateBroadcast => "createBroadcast",
            Step::CreateStream => "createStream",
            Step::BindStream => "bindStream",
            Step::IngestionInfo => "ingestionInfo",
            Step::SetThumbnail => "setThumbnail",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed step, carrying both the tag for the response and the cause for
/// the log.
#[derive(Debug, Error)]
#[error("{step} failed: {source}")]
pub struct StepError {
    pub step: Step,
    #[source]
    pub source: YouTubeError,
}

/// Resource responses only ever need the identifier.
#[derive(Debug, Deserialize)]
struct ResourceId {
    id: String,
}

#[derive(Debug, Deserialize)]
struct StreamListResponse {
    #[serde(default)]
    items: Vec<StreamItem>,
}

#[derive(Debug, Deserialize)]
struct StreamItem {
    cdn: CdnSettings,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CdnSettings {
    ingestion_info: IngestionInfo,
}

/// The values an encoder must be configured with to publish into a stream.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestionInfo {
    pub stream_name: String,
    pub ingestion_address: String,
}

/// Client for the YouTube live-broadcast resources.
pub struct YouTubeClient {
    client: Client,
    api_base: String,
    upload_base: String,
}

fn broadcast_resource(params: &BroadcastParams) -> Value {
    json!({
        "snippet": {
            "title": params.title,
            "description": params.description,
            "scheduledStartTime": params.scheduled_start_time,
        },
        "status": {
            "privacyStatus": params.privacy_status.as_api_str(),
        },
        "contentDetails": {
            "enableDvr": true,
            "latencyPreference": params.latency.as_api_str(),
            "enableAutoStart": params.auto_start,
            "enableAutoStop": params.auto_stop,
        },
    })
}

fn stream_resource(title: &str) -> Value {
    json!({
        "snippet": {
            "title": title,
        },
        "cdn": {
            "ingestionType": "rtmp",
            "resolution": "variable",
            "frameRate": "variable",
        },
    })
}

impl YouTubeClient {
    pub fn new(api_base: String, upload_base: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_base,
            upload_base,
        }
    }

    /// Run the full creation chain: broadcast, stream, binding, ingestion
    /// lookup, and (when supplied) thumbnail upload. Stops at the first
    /// failing step.
    pub async fn create_live_broadcast(
        &self,
        access_token: &str,
        params: &BroadcastParams,
    ) -> Result<BroadcastResult, StepError> {
        let broadcast_id = self
            .insert_broadcast(access_token, params)
            .await
            .map_err(|source| StepError {
                step: Step::CreateBroadcast,
                source,
            })?;
        info!("Created broadcast {}", broadcast_id);

        let stream_id = self
            .insert_stream(access_token, &params.title)
            .await
            .map_err(|source| StepError {
                step: Step::CreateStream,
                source,
            })?;
        info!("Created stream {}", stream_id);

        self.bind_stream(access_token, &broadcast_id, &stream_id)
            .await
            .map_err(|source| StepError {
                step: Step::BindStream,
                source,
            })?;
        info!("Bound stream {} to broadcast {}", stream_id, broadcast_id);

        let ingestion = self
            .ingestion_info(access_token, &stream_id)
            .await
            .map_err(|source| StepError {
                step: Step::IngestionInfo,
                source,
            })?;

        if let Some(image) = &params.thumbnail {
            self.set_thumbnail(access_token, &broadcast_id, image.clone())
                .await
                .map_err(|source| StepError {
                    step: Step::SetThumbnail,
                    source,
                })?;
            info!("Thumbnail set for broadcast {}", broadcast_id);
        }

        Ok(BroadcastResult {
            title: params.title.clone(),
            video_id: broadcast_id,
            stream_name: ingestion.stream_name,
            stream_address: ingestion.ingestion_address,
        })
    }

    /// Step 1: create the broadcast resource. DVR is always enabled.
    async fn insert_broadcast(
        &self,
        access_token: &str,
        params: &BroadcastParams,
    ) -> Result<String, YouTubeError> {
        let url = format!(
            "{}/liveBroadcasts?part=snippet,status,contentDetails",
            self.api_base
        );
        let response = self
            .client
            .post(&url)
            .bearer_auth(access_token)
            .json(&broadcast_resource(params))
            .send()
            .await?;
        let resource: ResourceId = check(response).await?.json().await?;
        Ok(resource.id)
    }

    /// Step 2: create the ingestion stream, titled after the broadcast.
    async fn insert_stream(
        &self,
        access_token: &str,
        title: &str,
    ) -> Result<String, YouTubeError> {
        let url = format!("{}/liveStreams?part=snippet,cdn", self.api_base);
        let response = self
            .client
            .post(&url)
            .bearer_auth(access_token)
            .json(&stream_resource(title))
            .send()
            .await?;
        let resource: ResourceId = check(response).await?.json().await?;
        Ok(resource.id)
    }

    /// Step 3: associate the stream with the broadcast.
    async fn bind_stream(
        &self,
        access_token: &str,
        broadcast_id: &str,
        stream_id: &str,
    ) -> Result<(), YouTubeError> {
        let url = format!(
            "{}/liveBroadcasts/bind?id={}&streamId={}&part=id,snippet,contentDetails,status",
            self.api_base,
            urlencoding::encode(broadcast_id),
            urlencoding::encode(stream_id),
        );
        let response = self.client.post(&url).bearer_auth(access_token).send().await?;
        check(response).await?;
        Ok(())
    }

    /// Step 4: look up the ingestion endpoint for a stream. A plain GET, so
    /// repeated calls with the same id return the same values.
    pub async fn ingestion_info(
        &self,
        access_token: &str,
        stream_id: &str,
    ) -> Result<IngestionInfo, YouTubeError> {
        let url = format!(
            "{}/liveStreams?part=cdn&id={}",
            self.api_base,
            urlencoding::encode(stream_id),
        );
        let response = self.client.get(&url).bearer_auth(access_token).send().await?;
        let list: StreamListResponse = check(response).await?.json().await?;
        let item = list
            .items
            .into_iter()
            .next()
            .ok_or_else(|| YouTubeError::StreamNotFound(stream_id.to_string()))?;
        Ok(item.cdn.ingestion_info)
    }

    /// Step 5: upload the decoded thumbnail bytes.
    async fn set_thumbnail(
        &self,
        access_token: &str,
        broadcast_id: &str,
        image: Vec<u8>,
    ) -> Result<(), YouTubeError> {
        let url = format!(
            "{}/thumbnails/set?videoId={}&uploadType=media",
            self.upload_base,
            urlencoding::encode(broadcast_id),
        );
        let response = self
            .client
            .post(&url)
            .bearer_auth(access_token)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(image)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }
}

/// Turn a non-2xx response into an API error carrying the upstream body
/// (logged server-side, never echoed to callers).
async fn check(response: reqwest::Response) -> Result<reqwest::Response, YouTubeError> {
    if response.status().is_success() {
        Ok(response)
    } else {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(YouTubeError::Api { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LatencyPreference, PrivacyStatus};

    fn params() -> BroadcastParams {
        BroadcastParams {
            title: "Launch".to_string(),
            description: "Launch day".to_string(),
            scheduled_start_time: "2024-01-01T10:00:00Z".to_string(),
            privacy_status: PrivacyStatus::Public,
            latency: LatencyPreference::Low,
            auto_start: true,
            auto_stop: false,
            thumbnail: None,
        }
    }

    #[test]
    fn test_broadcast_resource_shape() {
        let body = broadcast_resource(&params());
        assert_eq!(body["snippet"]["title"], "Launch");
        assert_eq!(body["snippet"]["scheduledStartTime"], "2024-01-01T10:00:00Z");
        assert_eq!(body["status"]["privacyStatus"], "public");
        assert_eq!(body["contentDetails"]["enableDvr"], true);
        assert_eq!(body["contentDetails"]["latencyPreference"], "low");
        assert_eq!(body["contentDetails"]["enableAutoStart"], true);
        assert_eq!(body["contentDetails"]["enableAutoStop"], false);
    }

    #[test]
    fn test_stream_resource_uses_request_title() {
        let body = stream_resource("Launch");
        assert_eq!(body["snippet"]["title"], "Launch");
        assert_eq!(body["cdn"]["ingestionType"], "rtmp");
        assert_eq!(body["cdn"]["resolution"], "variable");
        assert_eq!(body["cdn"]["frameRate"], "variable");
    }

    #[test]
    fn test_step_tags() {
        assert_eq!(Step::TokenRefresh.as_str(), "tokenRefresh");
        assert_eq!(Step::CreateBroadcast.as_str(), "createBroadcast");
        assert_eq!(Step::CreateStream.as_str(), "createStream");
        assert_eq!(Step::BindStream.as_str(), "bindStream");
        assert_eq!(Step::IngestionInfo.as_str(), "ingestionInfo");
        assert_eq!(Step::SetThumbnail.as_str(), "setThumbnail");
    }
}

// HTTP Surface
// Router and handlers for the relay: consent redirect, health, and the
// broadcast-creation endpoint. Authorization runs before body parsing.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::config::Config;
use crate::models::{BroadcastParams, BroadcastRequest};
use crate::services::{
    authorize_request, decode_data_uri, OAuthService, Step, YouTubeClient, RELAY_TOKEN_HEADER,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub oauth: Arc<OAuthService>,
    pub youtube: Arc<YouTubeClient>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let oauth = Arc::new(OAuthService::new(&config));
        let youtube = Arc::new(YouTubeClient::new(
            config.api_base.clone(),
            config.upload_base.clone(),
        ));
        Self {
            config: Arc::new(config),
            oauth,
            youtube,
        }
    }
}

/// Build the relay router with its CORS layer.
pub fn router(state: AppState) -> Router {
    let cors = build_cors_layer(state.config.cors_origin.as_deref());

    Router::new()
        .route("/", get(consent_redirect))
        .route("/health", get(health))
        .route("/broadcasting", post(create_broadcast))
        .with_state(state)
        .layer(cors)
}

fn build_cors_layer(origin: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(RELAY_TOKEN_HEADER),
        ]);

    match origin.and_then(|value| value.parse::<HeaderValue>().ok()) {
        Some(allowed) => layer.allow_origin(allowed),
        None => layer,
    }
}

// ============================================================================
// Handlers
// ============================================================================

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// GET / - administrative path: redirect the browser to the Google consent
/// page so the channel owner can mint a refresh token.
async fn consent_redirect(State(state): State<AppState>) -> impl IntoResponse {
    let url = state.oauth.consent_url();
    (StatusCode::FOUND, [(header::LOCATION, url)])
}

/// POST /broadcasting - the production endpoint. Order matters: shared-secret
/// check first, then parse, then decode the thumbnail, then the upstream
/// chain. The first failure stops everything after it.
async fn create_broadcast(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Response {
    if !authorize_request(&headers, &state.config.api_token) {
        return error_response(StatusCode::UNAUTHORIZED, "unauthorized");
    }

    let request: BroadcastRequest = match serde_json::from_str(&body) {
        Ok(request) => request,
        Err(e) => {
            log::warn!("Rejected malformed broadcast request: {}", e);
            return error_response(StatusCode::BAD_REQUEST, "malformed request body");
        }
    };

    if request.title.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "title must not be empty");
    }

    // Decoded before any upstream call so a bad payload cannot leave a
    // broadcast behind without its thumbnail.
    let thumbnail = match request.thumbnail.as_deref() {
        Some(raw) => match decode_data_uri(raw) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                log::warn!("Rejected undecodable thumbnail: {}", e);
                return error_response(StatusCode::BAD_REQUEST, "invalid thumbnail encoding");
            }
        },
        None => None,
    };

    let params = BroadcastParams {
        title: request.title,
        description: request.description,
        scheduled_start_time: request.scheduled_start_time,
        privacy_status: request.privacy_status,
        latency: request.latency,
        auto_start: request.auto_start,
        auto_stop: request.auto_stop,
        thumbnail,
    };

    let access_token = match state
        .oauth
        .refresh_access_token(&state.config.refresh_token)
        .await
    {
        Ok(token) => token,
        Err(e) => {
            log::error!("Access token refresh failed: {}", e);
            return upstream_error(Step::TokenRefresh);
        }
    };

    match state
        .youtube
        .create_live_broadcast(&access_token, &params)
        .await
    {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => {
            log::error!("Broadcast creation halted: {}", e);
            upstream_error(e.step)
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn upstream_error(step: Step) -> Response {
    (
        StatusCode::BAD_GATEWAY,
        Json(json!({ "error": "upstream call failed", "step": step.as_str() })),
    )
        .into_response()
}

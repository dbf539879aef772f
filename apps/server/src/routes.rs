use std::{sync::Arc, time::Duration};

use axum::{
    Json, Router,
    extract::State,
    http::{
        Method, StatusCode,
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use yt_tldr_core::{
    ErrorKind, GenerationMode, LanguageModel, SummaryError, SummaryLength, SummaryRequest,
    VideoSource, extract_video_id, generate_summary, youtube::is_missing_captions,
};

const UNKNOWN: &str = "Unknown";

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn VideoSource>,
    pub model: Arc<dyn LanguageModel>,
    pub default_model: String,
    pub mode: GenerationMode,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SummarizeBody {
    video_id: Option<String>,
    model: Option<String>,
    length: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeResponse {
    video_id: String,
    title: String,
    creator: String,
    summary: String,
}

pub enum ApiError {
    MissingVideoId,
    InvalidLength,
    Summary(SummaryError),
}

impl From<SummaryError> for ApiError {
    fn from(err: SummaryError) -> Self {
        ApiError::Summary(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::MissingVideoId => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "No video ID provided" }),
            ),
            ApiError::InvalidLength => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Invalid length. Use 'short' or 'long'" }),
            ),
            ApiError::Summary(err) => {
                let (error, message) = match err.kind() {
                    ErrorKind::NoTranscriptAvailable if is_missing_captions(&err) => (
                        "No transcript available",
                        "This video does not have captions or a transcript available.".to_string(),
                    ),
                    ErrorKind::NoTranscriptAvailable => {
                        tracing::warn!(error = %err, "Transcript fetch failed");
                        (
                            "Transcript fetch failed",
                            "Failed to retrieve the transcript for this video. It may not have captions available.".to_string(),
                        )
                    }
                    ErrorKind::InvalidLength => {
                        ("Invalid length. Use 'short' or 'long'", err.to_string())
                    }
                    ErrorKind::UnsupportedModel => ("Unsupported model", err.to_string()),
                    _ => ("Failed to generate summary", err.to_string()),
                };
                let status = if err.is_client_error() {
                    StatusCode::BAD_REQUEST
                } else {
                    tracing::error!(error = %err, "Summarize request failed");
                    StatusCode::INTERNAL_SERVER_ERROR
                };
                (status, json!({ "error": error, "message": message }))
            }
        };
        (status, Json(body)).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION, ACCEPT])
        .max_age(Duration::from_secs(86400));

    Router::new()
        .route("/health", get(health))
        .route("/summarize", post(summarize))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn summarize(
    State(state): State<AppState>,
    Json(body): Json<SummarizeBody>,
) -> Result<Json<SummarizeResponse>, ApiError> {
    let raw_id = body
        .video_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or(ApiError::MissingVideoId)?;
    let video_id = extract_video_id(raw_id).unwrap_or_else(|| raw_id.to_string());

    let length: SummaryLength = match body.length.as_deref() {
        None => SummaryLength::default(),
        Some(length) => length.parse().map_err(|_| ApiError::InvalidLength)?,
    };
    let model_id = body
        .model
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| state.default_model.clone());

    tracing::info!(%video_id, model = %model_id, %length, "Processing video");

    let metadata = state.source.fetch_metadata(&video_id).await;
    let transcript = state.source.fetch_transcript(&video_id).await?;

    let request = SummaryRequest::new(transcript, length, model_id).with_metadata(&metadata);
    let summary = generate_summary(state.model.as_ref(), &request, state.mode).await?;

    Ok(Json(SummarizeResponse {
        title: metadata.title().unwrap_or(UNKNOWN).to_string(),
        creator: metadata.creator().unwrap_or(UNKNOWN).to_string(),
        video_id,
        summary,
    }))
}

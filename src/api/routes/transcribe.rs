//! Transcription endpoints.
//!
//! Provides HTTP endpoints for:
//! - Transcribing an uploaded recording (POST /api/transcribe)
//! - Transcribing and summarizing it (POST /api/meeting-notes)

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        DefaultBodyLimit, Multipart, State,
    },
    http::{header::CONTENT_LENGTH, HeaderMap, StatusCode},
    response::Json,
    routing::post,
    Router,
};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::api::error::{ApiError, ApiResult};
use crate::api::AppState;
use crate::error::ValidationError;
use crate::media::{MediaAsset, MAX_MEDIA_BYTES};
use crate::meeting::MeetingNotes;

/// Room for multipart boundaries and part headers on top of the media limit.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

const FILE_FIELD: &str = "file";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/transcribe", post(transcribe))
        .route("/api/meeting-notes", post(meeting_notes))
        .layer(DefaultBodyLimit::max(MAX_MEDIA_BYTES + MULTIPART_OVERHEAD_BYTES))
        .with_state(state)
}

/// Transcribes the recording in the `file` form field.
///
/// # Response
/// `{"transcriptionResult": <transcript>}` on success, `{"error": ".."}`
/// with 400 for a missing or invalid file and 500 for pipeline failures.
async fn transcribe(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<Value>> {
    let asset = read_media(&headers, multipart).await?;
    let transcript = state.notes.transcribe(asset).await?;
    Ok(Json(json!({ "transcriptionResult": transcript })))
}

/// Transcribes the recording, then summarizes the transcript.
async fn meeting_notes(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<MeetingNotes>> {
    let asset = read_media(&headers, multipart).await?;
    let notes = state.notes.generate(asset).await?;
    Ok(Json(notes))
}

/// Pull the `file` field out of the form. Other fields are ignored.
async fn read_media(
    headers: &HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<MediaAsset> {
    let mut multipart = multipart.map_err(|rejection| {
        debug!("Rejected non-multipart upload: {}", rejection.body_text());
        ApiError::bad_request(ValidationError::MissingFile.to_string())
    })?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| read_error(e, headers))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field.bytes().await.map_err(|e| read_error(e, headers))?;

        info!(
            "Received upload {:?} ({}, {} bytes)",
            file_name,
            mime_type,
            data.len()
        );

        let mut asset = MediaAsset::new(mime_type, data);
        if let Some(name) = file_name {
            asset = asset.with_file_name(name);
        }
        return Ok(asset);
    }

    Err(ApiError::bad_request(ValidationError::MissingFile.to_string()))
}

/// Map a failed form read to a 400. Bodies cut off by the size limit are
/// reported as an oversized file.
fn read_error(err: MultipartError, headers: &HeaderMap) -> ApiError {
    if err.status() != StatusCode::PAYLOAD_TOO_LARGE {
        debug!("Malformed multipart body: {}", err.body_text());
        return ApiError::bad_request(err.body_text());
    }

    let size = headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());
    info!("Rejected upload over the body limit ({:?} bytes)", size);

    match size {
        Some(size) => ApiError::bad_request(
            ValidationError::FileTooLarge {
                size,
                limit: MAX_MEDIA_BYTES,
            }
            .to_string(),
        ),
        None => ApiError::bad_request(format!(
            "File size exceeds limit (max {} bytes)",
            MAX_MEDIA_BYTES
        )),
    }
}

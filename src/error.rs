//! Error types shared by the transcription workflow, the summarizer and the
//! HTTP boundary.

use serde_json::Value;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Raw failure details reported by an external provider.
///
/// `status` is absent when the request never produced an HTTP response
/// (connection refused, DNS failure, body read error).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderFailure {
    pub status: Option<u16>,
    pub payload: String,
}

impl ProviderFailure {
    pub fn http(status: u16, payload: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            payload: payload.into(),
        }
    }

    pub fn transport(err: impl fmt::Display) -> Self {
        Self {
            status: None,
            payload: err.to_string(),
        }
    }
}

impl fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "status {}: {}", status, self.payload),
            None => write!(f, "{}", self.payload),
        }
    }
}

/// Reasons a media file is rejected before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("No file uploaded.")]
    MissingFile,

    #[error("Unsupported file type: {0}")]
    UnsupportedMimeType(String),

    #[error("File size exceeds limit: {size} bytes (max {limit})")]
    FileTooLarge { size: usize, limit: usize },

    #[error("Uploaded file is empty")]
    EmptyFile,
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Failed to upload file to transcription provider.")]
    UploadFailed(ProviderFailure),

    #[error("Failed to request transcription.")]
    SubmissionFailed(ProviderFailure),

    #[error("Failed to fetch transcription result.")]
    PollFailed(ProviderFailure),

    #[error("Transcription failed: {reason}")]
    TranscriptionFailed {
        job_id: String,
        reason: String,
        /// Status response that reported the failure.
        payload: Value,
    },

    #[error(
        "Transcription {} did not finish after {} status checks ({}s)",
        .job_id,
        .attempts,
        .elapsed.as_secs()
    )]
    PollTimeout {
        job_id: String,
        attempts: u32,
        elapsed: Duration,
    },

    #[error(transparent)]
    ValidationFailed(#[from] ValidationError),

    #[error("Failed to analyze meeting transcript.")]
    DownstreamAnalysisFailed(ProviderFailure),
}

impl WorkflowError {
    /// Stable label used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UploadFailed(_) => "upload_failed",
            Self::SubmissionFailed(_) => "submission_failed",
            Self::PollFailed(_) => "poll_failed",
            Self::TranscriptionFailed { .. } => "transcription_failed",
            Self::PollTimeout { .. } => "poll_timeout",
            Self::ValidationFailed(_) => "validation_failed",
            Self::DownstreamAnalysisFailed(_) => "downstream_analysis_failed",
        }
    }

    /// Provider details attached to the error, if any.
    pub fn provider_failure(&self) -> Option<&ProviderFailure> {
        match self {
            Self::UploadFailed(f)
            | Self::SubmissionFailed(f)
            | Self::PollFailed(f)
            | Self::DownstreamAnalysisFailed(f) => Some(f),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationFailed(_))
    }
}

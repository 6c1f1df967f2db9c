use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info};

use crate::error::{ProviderFailure, WorkflowError};
use crate::media::MediaAsset;
use crate::transcription::{JobId, JobSnapshot, SpeechTranscriber, UploadHandle};

pub const DEFAULT_BASE_URL: &str = "https://api.assemblyai.com/v2";

/// Response from the upload endpoint
#[derive(Debug, Deserialize)]
struct UploadResponse {
    upload_url: String,
}

/// Response from transcript creation
#[derive(Debug, Deserialize)]
struct CreatedTranscript {
    id: String,
}

/// Features requested for every transcription job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptionFeatures {
    pub speech_model: String,
    pub iab_categories: bool,
    pub auto_highlights: bool,
    pub entity_detection: bool,
    pub speaker_labels: bool,
    pub language_detection: bool,
}

impl Default for TranscriptionFeatures {
    fn default() -> Self {
        Self {
            speech_model: "best".to_string(),
            iab_categories: true,
            auto_highlights: true,
            entity_detection: true,
            speaker_labels: true,
            language_detection: true,
        }
    }
}

/// Request body for creating a transcript
#[derive(Debug, Serialize)]
struct TranscriptRequest<'a> {
    audio_url: &'a str,
    speech_model: &'a str,
    iab_categories: bool,
    auto_highlights: bool,
    entity_detection: bool,
    speaker_labels: bool,
    language_detection: bool,
}

impl<'a> TranscriptRequest<'a> {
    fn new(audio_url: &'a str, features: &'a TranscriptionFeatures) -> Self {
        Self {
            audio_url,
            speech_model: &features.speech_model,
            iab_categories: features.iab_categories,
            auto_highlights: features.auto_highlights,
            entity_detection: features.entity_detection,
            speaker_labels: features.speaker_labels,
            language_detection: features.language_detection,
        }
    }
}

pub struct AssemblyAIProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    features: TranscriptionFeatures,
}

impl AssemblyAIProvider {
    pub fn new(api_key: String, endpoint: Option<String>, features: TranscriptionFeatures) -> Self {
        let client = reqwest::Client::new();
        let base_url = endpoint
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        info!("Initialized AssemblyAI provider with base URL: {}", base_url);

        Self {
            client,
            api_key,
            base_url,
            features,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a request and return the body of a 2xx response.
    ///
    /// Transport failures and non-success statuses both come back as a
    /// `ProviderFailure` holding whatever the provider said.
    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
        step: &str,
    ) -> Result<String, ProviderFailure> {
        let response = request.send().await.map_err(|e| {
            error!("AssemblyAI {} request failed: {}", step, e);
            ProviderFailure::transport(e)
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!("Failed to read AssemblyAI {} response body: {}", step, e);
            ProviderFailure::transport(e)
        })?;

        if !status.is_success() {
            error!(
                "AssemblyAI {} failed with status {}: {}",
                step, status, body
            );
            return Err(ProviderFailure::http(status.as_u16(), body));
        }

        Ok(body)
    }
}

fn parse_body<T: for<'de> Deserialize<'de>>(body: &str, step: &str) -> Result<T, ProviderFailure> {
    serde_json::from_str(body).map_err(|e| {
        error!("Failed to parse AssemblyAI {} response: {} ({})", step, e, body);
        ProviderFailure::transport(format!("unexpected {} response: {}", step, body))
    })
}

#[async_trait]
impl SpeechTranscriber for AssemblyAIProvider {
    fn name(&self) -> &'static str {
        "AssemblyAI API"
    }

    async fn upload(&self, asset: &MediaAsset) -> Result<UploadHandle, WorkflowError> {
        let upload_url = format!("{}/upload", self.base_url);
        debug!(
            "Uploading {} ({} bytes) to AssemblyAI",
            asset.display_name(),
            asset.len()
        );

        let request = self
            .client
            .post(&upload_url)
            .header("authorization", &self.api_key)
            .header("Content-Type", asset.mime_type())
            .body(asset.data().clone());

        let body = self
            .execute(request, "upload")
            .await
            .map_err(WorkflowError::UploadFailed)?;
        let response: UploadResponse =
            parse_body(&body, "upload").map_err(WorkflowError::UploadFailed)?;

        Ok(UploadHandle(response.upload_url))
    }

    async fn submit(&self, upload: &UploadHandle) -> Result<JobId, WorkflowError> {
        let transcript_url = format!("{}/transcript", self.base_url);
        let request_body = TranscriptRequest::new(&upload.0, &self.features);

        debug!("Submitting transcription request to AssemblyAI: {:?}", request_body);

        let request = self
            .client
            .post(&transcript_url)
            .header("authorization", &self.api_key)
            .json(&request_body);

        let body = self
            .execute(request, "transcript request")
            .await
            .map_err(WorkflowError::SubmissionFailed)?;
        let created: CreatedTranscript =
            parse_body(&body, "transcript request").map_err(WorkflowError::SubmissionFailed)?;

        Ok(JobId(created.id))
    }

    async fn fetch(&self, job: &JobId) -> Result<JobSnapshot, WorkflowError> {
        let poll_url = format!("{}/transcript/{}", self.base_url, job);
        debug!("Polling transcription status: {}", job);

        let request = self
            .client
            .get(&poll_url)
            .header("authorization", &self.api_key);

        let body = self
            .execute(request, "poll")
            .await
            .map_err(WorkflowError::PollFailed)?;
        let payload: Value = parse_body(&body, "poll").map_err(WorkflowError::PollFailed)?;

        JobSnapshot::from_payload(payload).map_err(|e| {
            error!("AssemblyAI poll response has no usable status: {}", e);
            WorkflowError::PollFailed(ProviderFailure::transport(format!(
                "missing status in poll response: {}",
                body
            )))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcription::JobStatus;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn provider(server: &Server) -> AssemblyAIProvider {
        AssemblyAIProvider::new(
            "test-key".to_string(),
            Some(format!("{}/", server.url())),
            TranscriptionFeatures::default(),
        )
    }

    #[test]
    fn test_base_url_defaults() {
        let provider =
            AssemblyAIProvider::new("k".to_string(), None, TranscriptionFeatures::default());
        assert_eq!(provider.base_url(), DEFAULT_BASE_URL);
    }

    #[tokio::test]
    async fn test_upload_sends_bytes_and_mime_type() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/upload")
            .match_header("authorization", "test-key")
            .match_header("content-type", "audio/mpeg")
            .match_body(Matcher::Exact("ID3 audio".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"upload_url":"https://cdn.example/upload/123"}"#)
            .create_async()
            .await;

        let asset = MediaAsset::new("audio/mpeg", b"ID3 audio".to_vec());
        let handle = provider(&server).upload(&asset).await.unwrap();

        assert_eq!(handle, UploadHandle("https://cdn.example/upload/123".into()));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_upload_error_carries_payload() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/upload")
            .with_status(401)
            .with_body(r#"{"error":"Invalid API key"}"#)
            .create_async()
            .await;

        let asset = MediaAsset::new("audio/wav", b"RIFF".to_vec());
        let err = provider(&server).upload(&asset).await.unwrap_err();

        match err {
            WorkflowError::UploadFailed(failure) => {
                assert_eq!(failure.status, Some(401));
                assert!(failure.payload.contains("Invalid API key"));
            }
            other => panic!("expected UploadFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_submit_requests_all_features() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/transcript")
            .match_header("authorization", "test-key")
            .match_body(Matcher::Json(json!({
                "audio_url": "https://cdn.example/upload/123",
                "speech_model": "best",
                "iab_categories": true,
                "auto_highlights": true,
                "entity_detection": true,
                "speaker_labels": true,
                "language_detection": true
            })))
            .with_status(200)
            .with_body(r#"{"id":"job-42","status":"queued"}"#)
            .create_async()
            .await;

        let job = provider(&server)
            .submit(&UploadHandle("https://cdn.example/upload/123".into()))
            .await
            .unwrap();

        assert_eq!(job, JobId("job-42".into()));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_submit_failure() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/transcript")
            .with_status(400)
            .with_body(r#"{"error":"audio_url is not reachable"}"#)
            .create_async()
            .await;

        let err = provider(&server)
            .submit(&UploadHandle("https://nowhere".into()))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "submission_failed");
    }

    #[tokio::test]
    async fn test_fetch_parses_status() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/transcript/job-42")
            .match_header("authorization", "test-key")
            .with_status(200)
            .with_body(r#"{"id":"job-42","status":"processing"}"#)
            .create_async()
            .await;

        let snapshot = provider(&server).fetch(&JobId("job-42".into())).await.unwrap();
        assert_eq!(snapshot.status, JobStatus::Processing);
        assert_eq!(snapshot.payload["id"], "job-42");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_rejects_non_json() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/transcript/job-42")
            .with_status(200)
            .with_body("<html>gateway</html>")
            .create_async()
            .await;

        let err = provider(&server)
            .fetch(&JobId("job-42".into()))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "poll_failed");
    }

    #[tokio::test]
    async fn test_transport_error_has_no_status() {
        // Nothing listens on port 9 in the test environment.
        let provider = AssemblyAIProvider::new(
            "k".to_string(),
            Some("http://127.0.0.1:9".to_string()),
            TranscriptionFeatures::default(),
        );
        let err = provider.fetch(&JobId("x".into())).await.unwrap_err();
        assert_eq!(err.provider_failure().map(|f| f.status), Some(None));
    }
}

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::error::{ProviderFailure, WorkflowError};
use crate::summarization::{MeetingAnalysis, MeetingSummarizer};
use crate::transcription::SpeakerTurn;

pub const DEFAULT_ENDPOINT: &str = "https://hikemeetingapp.vercel.app/api/analyze-meeting";

#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    transcript: &'a [SpeakerTurn],
}

#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    data: MeetingAnalysis,
}

/// Client for the `POST /analyze-meeting` summarization endpoint.
pub struct AnalyzeMeetingProvider {
    client: reqwest::Client,
    endpoint: String,
}

impl AnalyzeMeetingProvider {
    pub fn new(endpoint: Option<String>) -> Self {
        let endpoint = endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        info!("Initialized meeting analyzer with endpoint: {}", endpoint);

        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl MeetingSummarizer for AnalyzeMeetingProvider {
    fn name(&self) -> &'static str {
        "analyze-meeting"
    }

    async fn analyze(&self, transcript: &[SpeakerTurn]) -> Result<MeetingAnalysis, WorkflowError> {
        debug!("Requesting analysis of {} speaker turns", transcript.len());

        let response = self
            .client
            .post(&self.endpoint)
            .json(&AnalyzeRequest { transcript })
            .send()
            .await
            .map_err(|e| {
                error!("Meeting analysis request failed: {}", e);
                WorkflowError::DownstreamAnalysisFailed(ProviderFailure::transport(e))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!("Failed to read meeting analysis response: {}", e);
            WorkflowError::DownstreamAnalysisFailed(ProviderFailure::transport(e))
        })?;

        if !status.is_success() {
            error!(
                "Meeting analysis failed with status {}: {}",
                status, body
            );
            return Err(WorkflowError::DownstreamAnalysisFailed(
                ProviderFailure::http(status.as_u16(), body),
            ));
        }

        let parsed: AnalyzeResponse = serde_json::from_str(&body).map_err(|e| {
            error!("Meeting analysis response has an unexpected shape: {} ({})", e, body);
            WorkflowError::DownstreamAnalysisFailed(ProviderFailure::http(status.as_u16(), body))
        })?;

        info!(
            "Meeting analysis complete: {} action items",
            parsed.data.actions.len()
        );
        Ok(parsed.data)
    }
}

//! Transcribe a recording, then summarize it.

use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::error::WorkflowError;
use crate::media::MediaAsset;
use crate::summarization::{MeetingAnalysis, MeetingSummarizer};
use crate::transcription::{Transcript, TranscriptionWorkflow};

#[derive(Debug, Clone, Serialize)]
pub struct MeetingNotes {
    #[serde(rename = "transcriptionResult")]
    pub transcript: Transcript,
    pub analysis: MeetingAnalysis,
}

#[derive(Clone)]
pub struct MeetingNotesService {
    workflow: TranscriptionWorkflow,
    summarizer: Arc<dyn MeetingSummarizer>,
}

impl MeetingNotesService {
    pub fn new(workflow: TranscriptionWorkflow, summarizer: Arc<dyn MeetingSummarizer>) -> Self {
        Self {
            workflow,
            summarizer,
        }
    }

    pub fn workflow(&self) -> &TranscriptionWorkflow {
        &self.workflow
    }

    pub async fn transcribe(&self, asset: MediaAsset) -> Result<Transcript, WorkflowError> {
        self.workflow.transcribe(asset).await
    }

    pub async fn analyze(&self, transcript: &Transcript) -> Result<MeetingAnalysis, WorkflowError> {
        let turns = transcript.speaker_turns();
        info!(
            "Sending {} speaker turns to {}",
            turns.len(),
            self.summarizer.name()
        );
        self.summarizer.analyze(&turns).await
    }

    /// Full pipeline. Nothing is returned unless both stages succeed.
    pub async fn generate(&self, asset: MediaAsset) -> Result<MeetingNotes, WorkflowError> {
        let transcript = self.transcribe(asset).await?;
        let analysis = self.analyze(&transcript).await?;
        Ok(MeetingNotes {
            transcript,
            analysis,
        })
    }
}

//! Upload → submit → poll-until-terminal against a `SpeechTranscriber`.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, error, info, warn};

use super::{JobId, JobSnapshot, JobStatus, SpeechTranscriber, Transcript};
use crate::error::{ProviderFailure, WorkflowError};
use crate::media::MediaAsset;

/// Log a "still running" warning every this many unchanged polls.
const STILL_RUNNING_WARN_EVERY: u32 = 12;

/// Bounds for the status polling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: Option<u32>,
    pub max_elapsed: Option<Duration>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_attempts: None,
            max_elapsed: Some(Duration::from_secs(3600)),
        }
    }
}

impl PollPolicy {
    /// True when another status query after `attempts` queries would break a bound.
    fn exhausted(&self, attempts: u32, elapsed: Duration) -> bool {
        let over_attempts = self.max_attempts.is_some_and(|max| attempts >= max);
        let over_elapsed = self
            .max_elapsed
            .is_some_and(|max| elapsed + self.interval > max);
        over_attempts || over_elapsed
    }
}

#[derive(Clone)]
pub struct TranscriptionWorkflow {
    transcriber: Arc<dyn SpeechTranscriber>,
    policy: PollPolicy,
}

impl TranscriptionWorkflow {
    pub fn new(transcriber: Arc<dyn SpeechTranscriber>, policy: PollPolicy) -> Self {
        Self {
            transcriber,
            policy,
        }
    }

    pub fn policy(&self) -> &PollPolicy {
        &self.policy
    }

    pub fn provider_name(&self) -> &'static str {
        self.transcriber.name()
    }

    /// Run one upload/submit/poll pipeline for `asset`.
    ///
    /// The asset is validated before any request is made and dropped once
    /// the job has been submitted.
    pub async fn transcribe(&self, asset: MediaAsset) -> Result<Transcript, WorkflowError> {
        asset.validate()?;

        info!(
            "Transcribing {} ({}, {} bytes) via {}",
            asset.display_name(),
            asset.mime_type(),
            asset.len(),
            self.transcriber.name()
        );

        let upload = self.transcriber.upload(&asset).await?;
        debug!("Uploaded {} to {}", asset.display_name(), upload);
        drop(asset);

        let job_id = self.transcriber.submit(&upload).await?;
        info!("Transcription job submitted: {}", job_id);

        self.poll(&job_id).await
    }

    async fn poll(&self, job_id: &JobId) -> Result<Transcript, WorkflowError> {
        let started = Instant::now();
        let mut attempts: u32 = 0;
        let mut last_status = None;

        loop {
            attempts += 1;
            let snapshot = self.transcriber.fetch(job_id).await?;

            if last_status != Some(snapshot.status) {
                info!(
                    "Transcription job {} status: {}",
                    job_id,
                    snapshot.status.as_str()
                );
                last_status = Some(snapshot.status);
            } else if attempts % STILL_RUNNING_WARN_EVERY == 0 {
                warn!(
                    "Transcription job {} still {} after {}s",
                    job_id,
                    snapshot.status.as_str(),
                    started.elapsed().as_secs()
                );
            }

            if snapshot.status.is_terminal() {
                return settle(job_id, snapshot, attempts);
            }

            let elapsed = started.elapsed();
            if self.policy.exhausted(attempts, elapsed) {
                warn!(
                    "Giving up on transcription job {} after {} status checks",
                    job_id, attempts
                );
                return Err(WorkflowError::PollTimeout {
                    job_id: job_id.to_string(),
                    attempts,
                    elapsed,
                });
            }

            sleep(self.policy.interval).await;
        }
    }
}

/// Outcome of a job that reached `completed` or `error`.
fn settle(
    job_id: &JobId,
    snapshot: JobSnapshot,
    attempts: u32,
) -> Result<Transcript, WorkflowError> {
    if snapshot.status == JobStatus::Completed {
        let transcript = Transcript::from_payload(snapshot.payload).map_err(|e| {
            error!("Completed transcript {} could not be parsed: {}", job_id, e);
            WorkflowError::PollFailed(ProviderFailure::transport(format!(
                "malformed transcript payload: {}",
                e
            )))
        })?;
        info!(
            "Transcription complete: {} utterances after {} status checks",
            transcript.utterances().len(),
            attempts
        );
        return Ok(transcript);
    }

    let reason = snapshot
        .error
        .unwrap_or_else(|| "Unknown error".to_string());
    error!(
        "Transcription job {} failed: {} (payload: {})",
        job_id, reason, snapshot.payload
    );
    Err(WorkflowError::TranscriptionFailed {
        job_id: job_id.to_string(),
        reason,
        payload: snapshot.payload,
    })
}

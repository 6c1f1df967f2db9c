//! CLI handler for generating meeting notes.
//!
//! Drives the meeting form view-model from command line flags, runs the
//! transcribe-then-analyze pipeline and prints the results screen.

use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use serde_json::json;
use tracing::error;

use crate::app::build_notes_service;
use crate::cli::args::{NotesCliArgs, OutputFormat};
use crate::cli::transcribe::create_spinner;
use crate::config::Config;
use crate::media::MediaAsset;
use crate::meeting::{
    render_results, FormAction, MeetingNotesService, NotesViewModel, Participant,
    ParticipantField, Screen, GENERIC_ERROR,
};

pub async fn handle_notes_command(args: NotesCliArgs) -> Result<()> {
    let asset = MediaAsset::from_path(&args.file).await?;
    let vm = form_from_args(&args, asset)?;

    if let Some(message) = vm.error() {
        bail!("{}", message);
    }

    let config = Config::load()?;
    let service = build_notes_service(&config)?;

    let spinner = (!args.no_progress).then(|| create_spinner("Generating meeting notes..."));
    let vm = submit(vm, &service).await;
    if let Some(spinner) = &spinner {
        spinner.finish_and_clear();
    }

    if vm.screen() != Screen::Results {
        return Err(anyhow!("{}", vm.error().unwrap_or(GENERIC_ERROR)));
    }

    let output = match args.format {
        OutputFormat::Text => render_results(&vm).unwrap_or_default(),
        OutputFormat::Json => serde_json::to_string_pretty(&json!({
            "meeting": vm.details(),
            "transcriptionResult": vm.transcript(),
            "analysis": vm.analysis(),
        }))
        .context("Failed to serialize meeting notes")?,
    };
    println!("{}", output);

    Ok(())
}

/// Build the form state the way a user filling the form would.
fn form_from_args(args: &NotesCliArgs, asset: MediaAsset) -> Result<NotesViewModel> {
    let date = args
        .date
        .as_deref()
        .map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d"))
        .transpose()
        .context("Invalid --date, expected YYYY-MM-DD")?;

    let mut vm = NotesViewModel::new()
        .reduce(FormAction::SetHost(args.host.clone().unwrap_or_default()))
        .reduce(FormAction::SetAgenda(args.agenda.clone().unwrap_or_default()))
        .reduce(FormAction::SetOutcomes(args.outcomes.clone().unwrap_or_default()))
        .reduce(FormAction::SetDate(date));

    for (index, raw) in args.participants.iter().enumerate() {
        if index > 0 {
            vm = vm.reduce(FormAction::AddParticipant);
        }
        let participant = Participant::parse(raw);
        vm = vm
            .reduce(FormAction::UpdateParticipant {
                index,
                field: ParticipantField::Name,
                value: participant.name,
            })
            .reduce(FormAction::UpdateParticipant {
                index,
                field: ParticipantField::Email,
                value: participant.email,
            });
    }

    Ok(vm.reduce(FormAction::AttachFiles(vec![asset])))
}

/// Run one submission through the view-model.
///
/// Transcription errors keep their message; anything after that shows the
/// generic one.
pub async fn submit(vm: NotesViewModel, service: &MeetingNotesService) -> NotesViewModel {
    let asset = match vm.submission() {
        Ok(asset) => asset,
        Err(err) => return vm.reduce(FormAction::PipelineFailed(Some(err.to_string()))),
    };

    let vm = vm.reduce(FormAction::SubmissionStarted);

    let transcript = match service.transcribe(asset).await {
        Ok(transcript) => transcript,
        Err(err) => {
            error!("Transcription failed ({}): {}", err.kind(), err);
            return vm.reduce(FormAction::PipelineFailed(Some(err.to_string())));
        }
    };
    let vm = vm.reduce(FormAction::TranscriptReady(transcript));

    let analysis = match vm.transcript() {
        Some(transcript) => service.analyze(transcript).await,
        None => return vm.reduce(FormAction::PipelineFailed(None)),
    };

    match analysis {
        Ok(analysis) => vm.reduce(FormAction::AnalysisReady(analysis)),
        Err(err) => {
            error!("Meeting analysis failed ({}): {}", err.kind(), err);
            vm.reduce(FormAction::PipelineFailed(None))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ProviderFailure, WorkflowError};
    use crate::summarization::{
        DiscussionAnalysis, MeetingAnalysis, MeetingSummarizer, MeetingSummary,
    };
    use crate::transcription::{
        JobId, JobSnapshot, PollPolicy, SpeakerTurn, SpeechTranscriber, TranscriptionWorkflow,
        UploadHandle,
    };
    use async_trait::async_trait;
    use clap::Parser;
    use std::sync::Arc;

    struct Transcriber {
        status: &'static str,
    }

    #[async_trait]
    impl SpeechTranscriber for Transcriber {
        fn name(&self) -> &'static str {
            "test"
        }

        async fn upload(&self, _asset: &MediaAsset) -> Result<UploadHandle, WorkflowError> {
            Ok(UploadHandle("u".into()))
        }

        async fn submit(&self, _upload: &UploadHandle) -> Result<JobId, WorkflowError> {
            Ok(JobId("j".into()))
        }

        async fn fetch(&self, _job: &JobId) -> Result<JobSnapshot, WorkflowError> {
            Ok(JobSnapshot::from_payload(json!({
                "id": "j",
                "status": self.status,
                "error": "bad audio",
                "utterances": [{"speaker": "A", "text": "hi"}]
            }))
            .unwrap())
        }
    }

    struct Summarizer {
        fail: bool,
    }

    #[async_trait]
    impl MeetingSummarizer for Summarizer {
        fn name(&self) -> &'static str {
            "test"
        }

        async fn analyze(&self, _t: &[SpeakerTurn]) -> Result<MeetingAnalysis, WorkflowError> {
            if self.fail {
                return Err(WorkflowError::DownstreamAnalysisFailed(ProviderFailure::http(
                    500, "x",
                )));
            }
            Ok(MeetingAnalysis {
                summary: MeetingSummary::default(),
                analysis: DiscussionAnalysis::default(),
                actions: Vec::new(),
            })
        }
    }

    fn service(status: &'static str, fail_summary: bool) -> MeetingNotesService {
        MeetingNotesService::new(
            TranscriptionWorkflow::new(Arc::new(Transcriber { status }), PollPolicy::default()),
            Arc::new(Summarizer { fail: fail_summary }),
        )
    }

    fn ready_form() -> NotesViewModel {
        NotesViewModel::new().reduce(FormAction::AttachFiles(vec![MediaAsset::new(
            "audio/mpeg",
            b"ID3".to_vec(),
        )]))
    }

    fn args(extra: &[&str]) -> NotesCliArgs {
        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: NotesCliArgs,
        }
        let mut argv = vec!["test", "meeting.mp3"];
        argv.extend_from_slice(extra);
        Wrapper::parse_from(argv).args
    }

    #[tokio::test]
    async fn test_submit_reaches_results() {
        let vm = submit(ready_form(), &service("completed", false)).await;
        assert_eq!(vm.screen(), Screen::Results);
        assert!(vm.transcript().is_some());
    }

    #[tokio::test]
    async fn test_transcription_failure_keeps_message() {
        let vm = submit(ready_form(), &service("error", false)).await;
        assert_eq!(vm.screen(), Screen::Form);
        assert_eq!(vm.error(), Some("Transcription failed: bad audio"));
    }

    #[tokio::test]
    async fn test_analysis_failure_shows_generic_message() {
        let vm = submit(ready_form(), &service("completed", true)).await;
        assert_eq!(vm.screen(), Screen::Form);
        assert_eq!(vm.error(), Some(GENERIC_ERROR));
        assert!(vm.analysis().is_none());
    }

    #[tokio::test]
    async fn test_submit_without_file() {
        let vm = submit(NotesViewModel::new(), &service("completed", false)).await;
        assert_eq!(vm.error(), Some("No file uploaded."));
    }

    #[test]
    fn test_form_from_args() {
        let args = args(&[
            "--host",
            "Dana",
            "--date",
            "2024-05-01",
            "-p",
            "Ana <ana@example.com>",
            "-p",
            "Bo",
        ]);
        let vm = form_from_args(&args, MediaAsset::new("audio/mpeg", b"ID3".to_vec())).unwrap();

        assert_eq!(vm.details().host, "Dana");
        assert_eq!(vm.details().date, NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(
            vm.details().participants,
            vec![Participant::new("Ana", "ana@example.com"), Participant::new("Bo", "")]
        );
        assert_eq!(vm.files().len(), 1);
    }

    #[test]
    fn test_form_from_args_rejects_bad_date() {
        let args = args(&["--date", "05/01/2024"]);
        assert!(form_from_args(&args, MediaAsset::new("audio/mpeg", b"ID3".to_vec())).is_err());
    }
}

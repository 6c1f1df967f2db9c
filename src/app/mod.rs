use crate::api::ApiServer;
use crate::config::Config;
use crate::meeting::MeetingNotesService;
use crate::summarization::AnalyzeMeetingProvider;
use crate::transcription::{AssemblyAIProvider, TranscriptionWorkflow};
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

pub async fn run_service() -> Result<()> {
    info!("Starting meeting-notes service");

    let config = Config::load()?;
    let notes = build_notes_service(&config)?;

    let api_server = ApiServer::new(&config.server, notes);
    api_server.start().await
}

pub fn build_workflow(config: &Config) -> Result<TranscriptionWorkflow> {
    let api_key = config.require_api_key()?.to_string();
    let provider = AssemblyAIProvider::new(
        api_key,
        Some(config.transcription.base_url.clone()),
        config.transcription.features(),
    );

    Ok(TranscriptionWorkflow::new(
        Arc::new(provider),
        config.transcription.poll_policy(),
    ))
}

pub fn build_notes_service(config: &Config) -> Result<MeetingNotesService> {
    let workflow = build_workflow(config)?;
    let summarizer = AnalyzeMeetingProvider::new(Some(config.summarization.endpoint.clone()));

    info!(
        "Using {} for transcription and {} for analysis",
        workflow.provider_name(),
        config.summarization.endpoint
    );

    Ok(MeetingNotesService::new(workflow, Arc::new(summarizer)))
}

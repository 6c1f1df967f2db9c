//! CLI handler for transcribing audio/video files.
//!
//! Runs the transcription workflow against the configured provider and
//! prints the speaker-labelled transcript.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::app::build_workflow;
use crate::cli::args::{OutputFormat, TranscribeCliArgs};
use crate::config::Config;
use crate::media::MediaAsset;
use crate::transcription::Transcript;

/// Handle the transcribe CLI command.
pub async fn handle_transcribe_command(args: TranscribeCliArgs) -> Result<()> {
    let asset = MediaAsset::from_path(&args.file).await?;
    asset.validate()?;

    let config = Config::load()?;
    let workflow = build_workflow(&config)?;

    let spinner = (!args.no_progress).then(|| create_spinner("Transcribing..."));

    let result = workflow.transcribe(asset).await;

    if let Some(spinner) = &spinner {
        spinner.finish_and_clear();
    }
    let transcript = result.context("Transcription failed")?;

    let output_text = format_transcript(&transcript, args.format)?;

    if let Some(output_path) = &args.output {
        std::fs::write(output_path, &output_text).context("Failed to write output file")?;
        eprintln!("Transcription saved to: {}", output_path.display());
    } else {
        println!("{}", output_text);
    }

    Ok(())
}

/// Create a steady-ticking spinner on stderr.
pub(crate) fn create_spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {elapsed_precise} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Format a transcript according to the requested format.
fn format_transcript(transcript: &Transcript, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(transcript).context("Failed to serialize transcript")
        }
        OutputFormat::Text => {
            let turns = transcript.speaker_turns();
            if turns.is_empty() {
                return Ok(transcript.text.clone().unwrap_or_default());
            }
            Ok(turns
                .iter()
                .map(|turn| format!("{}: {}", turn.speaker(), turn.text()))
                .collect::<Vec<_>>()
                .join("\n"))
        }
    }
}

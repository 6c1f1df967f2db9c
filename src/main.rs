use anyhow::Result;
use clap::Parser;
use meeting_notes::{
    app,
    cli::{handle_config_command, handle_notes_command, handle_transcribe_command, Cli, CliCommand},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_level = if cli.verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(CliCommand::Version) => {
            println!("meeting-notes {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Some(CliCommand::Transcribe(args)) => handle_transcribe_command(args).await,
        Some(CliCommand::Notes(args)) => handle_notes_command(args).await,
        Some(CliCommand::Config(args)) => handle_config_command(args),
        Some(CliCommand::Serve) | None => app::run_service().await,
    }
}

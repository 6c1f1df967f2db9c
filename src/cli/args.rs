use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "meeting-notes")]
#[command(about = "Transcribe meeting recordings and generate meeting notes", long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Run the HTTP service (default)
    Serve,
    /// Transcribe a recording and print the transcript
    Transcribe(TranscribeCliArgs),
    /// Transcribe a recording, analyze it, and print meeting notes
    Notes(NotesCliArgs),
    /// Inspect or initialize the configuration file
    Config(ConfigCliArgs),
    /// Print version information
    Version,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// Raw JSON
    Json,
}

#[derive(ClapArgs, Debug)]
pub struct TranscribeCliArgs {
    /// Audio or video file (mp3, m4a, wav, mp4, mpeg, mov)
    pub file: PathBuf,
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Write output to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Disable the progress spinner
    #[arg(long)]
    pub no_progress: bool,
}

#[derive(ClapArgs, Debug)]
pub struct NotesCliArgs {
    /// Audio or video file (mp3, m4a, wav, mp4, mpeg, mov)
    pub file: PathBuf,
    /// Meeting host
    #[arg(long)]
    pub host: Option<String>,
    /// Meeting agenda
    #[arg(long)]
    pub agenda: Option<String>,
    /// Expected meeting outcomes
    #[arg(long)]
    pub outcomes: Option<String>,
    /// Meeting date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,
    /// Participant as "Name <email>" (repeatable)
    #[arg(short, long = "participant")]
    pub participants: Vec<String>,
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Disable the progress spinner
    #[arg(long)]
    pub no_progress: bool,
}

#[derive(ClapArgs, Debug)]
pub struct ConfigCliArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the effective configuration (API key masked)
    Show,
    /// Write a default config file if none exists
    Init,
    /// Print the config file path
    Path,
}

use anyhow::Result;
use std::path::Path;

use crate::cli::args::{ConfigCliArgs, ConfigCommand};
use crate::config::Config;
use crate::global;

pub fn handle_config_command(args: ConfigCliArgs) -> Result<()> {
    match args.command {
        ConfigCommand::Show => handle_show(),
        ConfigCommand::Init => handle_init(&global::config_file()?),
        ConfigCommand::Path => {
            println!("{}", global::config_file()?.display());
            Ok(())
        }
    }
}

/// Show the effective configuration, after environment overrides.
fn handle_show() -> Result<()> {
    let config = Config::load()?;
    let transcription = &config.transcription;

    println!();
    println!("Meeting Notes Configuration");
    println!("===========================");
    println!();
    println!("Transcription:");
    println!("  Key:            {}", mask_secret(&transcription.api_key));
    println!("  Base URL:       {}", transcription.base_url);
    println!("  Speech model:   {}", transcription.speech_model);
    println!("  Poll interval:  {}s", transcription.poll_interval_secs);
    println!(
        "  Poll timeout:   {}",
        match transcription.poll_timeout_secs {
            0 => "<disabled>".to_string(),
            secs => format!("{}s", secs),
        }
    );
    println!(
        "  Max polls:      {}",
        transcription
            .max_poll_attempts
            .map(|n| n.to_string())
            .unwrap_or_else(|| "<unbounded>".to_string())
    );
    println!();
    println!("Summarization:");
    println!("  Endpoint:       {}", config.summarization.endpoint);
    println!();
    println!("Server:");
    println!("  Listen:         {}:{}", config.server.host, config.server.port);
    println!();
    println!("Config file:  {}", global::config_file()?.display());

    Ok(())
}

fn handle_init(path: &Path) -> Result<()> {
    if path.exists() {
        println!("Config file already exists: {}", path.display());
        return Ok(());
    }

    Config::default().save_to(path)?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

fn mask_secret(value: &Option<String>) -> String {
    let Some(secret) = value.as_deref().filter(|s| !s.is_empty()) else {
        return "<not set>".to_string();
    };

    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let prefix: String = chars[..4].iter().collect();
    let suffix: String = chars[chars.len() - 2..].iter().collect();
    format!("{prefix}****{suffix}")
}

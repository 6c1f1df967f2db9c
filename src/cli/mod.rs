pub mod args;
pub mod config;
pub mod notes;
pub mod transcribe;

pub use args::{Cli, CliCommand};
pub use config::handle_config_command;
pub use notes::handle_notes_command;
pub use transcribe::handle_transcribe_command;

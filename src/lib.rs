pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod global;
pub mod media;
pub mod meeting;
pub mod summarization;
pub mod transcription;

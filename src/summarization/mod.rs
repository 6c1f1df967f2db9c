//! Meeting analysis produced from a speaker-labelled transcript.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::WorkflowError;
use crate::transcription::SpeakerTurn;

pub mod providers;

pub use providers::AnalyzeMeetingProvider;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeetingSummary {
    #[serde(default)]
    pub meeting_outcomes: String,
    #[serde(default)]
    pub discuss_steps: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscussionAnalysis {
    #[serde(default)]
    pub counterpoints: Vec<String>,
    #[serde(default)]
    pub proposed_ideas: Vec<String>,
}

/// Importance arrives either as a label ("High") or a score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Importance {
    Label(String),
    Score(f64),
}

impl Default for Importance {
    fn default() -> Self {
        Self::Label(String::new())
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Label(label) => f.write_str(label),
            Self::Score(score) => write!(f, "{}", score),
        }
    }
}

/// Action item with DRI / Consulted / Informed accountability codes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionItem {
    pub description: String,
    #[serde(rename = "DRI", default)]
    pub responsible: String,
    #[serde(rename = "C", default)]
    pub consulted: Vec<String>,
    #[serde(rename = "I", default)]
    pub informed: Vec<String>,
    #[serde(rename = "Importance", default)]
    pub importance: Importance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetingAnalysis {
    pub summary: MeetingSummary,
    pub analysis: DiscussionAnalysis,
    pub actions: Vec<ActionItem>,
}

#[async_trait]
pub trait MeetingSummarizer: Send + Sync {
    fn name(&self) -> &'static str;

    async fn analyze(&self, transcript: &[SpeakerTurn]) -> Result<MeetingAnalysis, WorkflowError>;
}

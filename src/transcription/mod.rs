use async_trait::async_trait;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

use crate::error::WorkflowError;
use crate::media::MediaAsset;

pub mod providers;
mod workflow;

pub use providers::AssemblyAIProvider;
pub use workflow::{PollPolicy, TranscriptionWorkflow};

/// Provider-side location of an uploaded recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadHandle(pub String);

impl fmt::Display for UploadHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobId(pub String);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Status reported for a transcription job.
///
/// Anything the provider sends outside the known vocabulary maps to
/// `Unknown` and is treated like `Queued`/`Processing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    Error,
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Error => "error",
            Self::Unknown => "unknown",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }
}

/// One status query result: the parsed status plus the untouched body.
#[derive(Debug, Clone, PartialEq)]
pub struct JobSnapshot {
    pub status: JobStatus,
    pub error: Option<String>,
    pub payload: Value,
}

impl JobSnapshot {
    pub fn from_payload(payload: Value) -> Result<Self, serde_json::Error> {
        #[derive(Deserialize)]
        struct StatusOnly {
            status: JobStatus,
            #[serde(default)]
            error: Option<String>,
        }

        let parsed = StatusOnly::deserialize(&payload)?;
        Ok(Self {
            status: parsed.status,
            error: parsed.error,
            payload,
        })
    }
}

/// One speaker turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    pub speaker: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Utterance {
    pub fn new(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
            start: None,
            end: None,
            confidence: None,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub entity_type: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub text: String,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub rank: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightsResult {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub results: Vec<Highlight>,
}

/// Topic detection output; `summary` maps a category label to its relevance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoriesResult {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub results: Vec<Value>,
    #[serde(default)]
    pub summary: Map<String, Value>,
}

/// A completed transcription.
///
/// The typed fields are read from the provider payload, which is kept
/// as-is: serializing a transcript emits exactly that payload, nulls included.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    pub id: String,
    pub status: JobStatus,
    pub text: Option<String>,
    pub utterances: Option<Vec<Utterance>>,
    pub language_code: Option<String>,
    pub entities: Option<Vec<Entity>>,
    pub auto_highlights_result: Option<HighlightsResult>,
    pub iab_categories_result: Option<CategoriesResult>,
    payload: Value,
}

#[derive(Deserialize)]
struct TranscriptFields {
    id: String,
    status: JobStatus,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    utterances: Option<Vec<Utterance>>,
    #[serde(default)]
    language_code: Option<String>,
    #[serde(default)]
    entities: Option<Vec<Entity>>,
    #[serde(default)]
    auto_highlights_result: Option<HighlightsResult>,
    #[serde(default)]
    iab_categories_result: Option<CategoriesResult>,
}

impl Serialize for Transcript {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.payload.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Transcript {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let payload = Value::deserialize(deserializer)?;
        Self::from_payload(payload).map_err(de::Error::custom)
    }
}

impl Transcript {
    pub fn from_payload(payload: Value) -> Result<Self, serde_json::Error> {
        let fields = TranscriptFields::deserialize(&payload)?;
        Ok(Self {
            id: fields.id,
            status: fields.status,
            text: fields.text,
            utterances: fields.utterances,
            language_code: fields.language_code,
            entities: fields.entities,
            auto_highlights_result: fields.auto_highlights_result,
            iab_categories_result: fields.iab_categories_result,
            payload,
        })
    }

    /// The provider response this transcript was parsed from.
    pub fn payload(&self) -> &Value {
        &self.payload
    }

    pub fn utterances(&self) -> &[Utterance] {
        self.utterances.as_deref().unwrap_or_default()
    }

    /// Flatten utterances into `("Speaker <label>", text)` pairs, in order.
    pub fn speaker_turns(&self) -> Vec<SpeakerTurn> {
        self.utterances()
            .iter()
            .map(|u| SpeakerTurn(format!("Speaker {}", u.speaker), u.text.clone()))
            .collect()
    }

    /// Labels of the most relevant detected topics, best first.
    pub fn top_categories(&self, limit: usize) -> Vec<String> {
        let Some(categories) = &self.iab_categories_result else {
            return Vec::new();
        };
        let mut ranked: Vec<(&String, f64)> = categories
            .summary
            .iter()
            .map(|(label, score)| (label, score.as_f64().unwrap_or(0.0)))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
            .into_iter()
            .take(limit)
            .map(|(label, _)| label.clone())
            .collect()
    }
}

/// `(speaker label, text)`, serialized as a two-element JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerTurn(pub String, pub String);

impl SpeakerTurn {
    pub fn speaker(&self) -> &str {
        &self.0
    }

    pub fn text(&self) -> &str {
        &self.1
    }
}

/// The three calls a transcription workflow needs from a speech provider.
///
/// Each method performs exactly one outbound request and maps any failure
/// to the matching `WorkflowError` kind; retries are the caller's business.
#[async_trait]
pub trait SpeechTranscriber: Send + Sync {
    fn name(&self) -> &'static str;

    async fn upload(&self, asset: &MediaAsset) -> Result<UploadHandle, WorkflowError>;

    async fn submit(&self, upload: &UploadHandle) -> Result<JobId, WorkflowError>;

    async fn fetch(&self, job: &JobId) -> Result<JobSnapshot, WorkflowError>;
}

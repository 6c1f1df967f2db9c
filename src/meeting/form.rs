//! Meeting form view-model.
//!
//! `NotesViewModel` is never mutated in place: every change goes through
//! `reduce`, which consumes the old value and returns the next one.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::media::MediaAsset;
use crate::summarization::MeetingAnalysis;
use crate::transcription::Transcript;

/// Message shown for any failure after submission.
pub const GENERIC_ERROR: &str = "An unexpected error occurred.";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    pub email: String,
}

impl Participant {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// Parse `"Name <email>"`; a bare value is taken as the name.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        match (value.find('<'), value.rfind('>')) {
            (Some(open), Some(close)) if open < close => Self::new(
                value[..open].trim(),
                value[open + 1..close].trim(),
            ),
            _ => Self::new(value, ""),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticipantField {
    Name,
    Email,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingDetails {
    pub host: String,
    pub agenda: String,
    pub outcomes: String,
    pub date: Option<NaiveDate>,
    pub participants: Vec<Participant>,
}

impl Default for MeetingDetails {
    fn default() -> Self {
        Self {
            host: String::new(),
            agenda: String::new(),
            outcomes: String::new(),
            date: None,
            // The form always starts with one empty participant row.
            participants: vec![Participant::default()],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    Form,
    Loading,
    Results,
}

#[derive(Debug, Clone)]
pub enum FormAction {
    SetHost(String),
    SetAgenda(String),
    SetOutcomes(String),
    SetDate(Option<NaiveDate>),
    AddParticipant,
    RemoveParticipant(usize),
    UpdateParticipant {
        index: usize,
        field: ParticipantField,
        value: String,
    },
    AttachFiles(Vec<MediaAsset>),
    RemoveFile(usize),
    SubmissionStarted,
    TranscriptReady(Transcript),
    AnalysisReady(MeetingAnalysis),
    PipelineFailed(Option<String>),
}

#[derive(Debug, Clone, Default)]
pub struct NotesViewModel {
    details: MeetingDetails,
    files: Vec<MediaAsset>,
    loading: bool,
    transcript: Option<Transcript>,
    analysis: Option<MeetingAnalysis>,
    error: Option<String>,
}

impl NotesViewModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reduce(self, action: FormAction) -> Self {
        let mut next = self;
        match action {
            FormAction::SetHost(host) => next.details.host = host,
            FormAction::SetAgenda(agenda) => next.details.agenda = agenda,
            FormAction::SetOutcomes(outcomes) => next.details.outcomes = outcomes,
            FormAction::SetDate(date) => next.details.date = date,
            FormAction::AddParticipant => next.details.participants.push(Participant::default()),
            FormAction::RemoveParticipant(index) => {
                if index < next.details.participants.len() {
                    next.details.participants.remove(index);
                }
            }
            FormAction::UpdateParticipant {
                index,
                field,
                value,
            } => {
                if let Some(participant) = next.details.participants.get_mut(index) {
                    match field {
                        ParticipantField::Name => participant.name = value,
                        ParticipantField::Email => participant.email = value,
                    }
                }
            }
            FormAction::AttachFiles(files) => {
                // A batch is accepted whole or not at all.
                match files.iter().try_for_each(|f| f.validate()) {
                    Ok(()) => {
                        next.error = None;
                        next.files.extend(files);
                    }
                    Err(err) => next.error = Some(err.to_string()),
                }
            }
            FormAction::RemoveFile(index) => {
                if index < next.files.len() {
                    next.files.remove(index);
                }
            }
            FormAction::SubmissionStarted => {
                next.loading = true;
                next.error = None;
                next.transcript = None;
                next.analysis = None;
            }
            FormAction::TranscriptReady(transcript) => next.transcript = Some(transcript),
            FormAction::AnalysisReady(analysis) => {
                next.loading = false;
                next.analysis = Some(analysis);
            }
            FormAction::PipelineFailed(message) => {
                next.loading = false;
                next.analysis = None;
                next.error = Some(message.unwrap_or_else(|| GENERIC_ERROR.to_string()));
            }
        }
        next
    }

    pub fn screen(&self) -> Screen {
        if self.loading {
            Screen::Loading
        } else if self.analysis.is_some() {
            Screen::Results
        } else {
            Screen::Form
        }
    }

    pub fn can_submit(&self) -> bool {
        !self.loading && !self.files.is_empty()
    }

    /// The recording that a submission sends: the first attached file.
    pub fn submission(&self) -> Result<MediaAsset, ValidationError> {
        self.files.first().cloned().ok_or(ValidationError::MissingFile)
    }

    pub fn details(&self) -> &MeetingDetails {
        &self.details
    }

    pub fn files(&self) -> &[MediaAsset] {
        &self.files
    }

    pub fn transcript(&self) -> Option<&Transcript> {
        self.transcript.as_ref()
    }

    pub fn analysis(&self) -> Option<&MeetingAnalysis> {
        self.analysis.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

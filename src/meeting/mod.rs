//! Meeting notes: form view-model, the transcribe-then-summarize pipeline,
//! and rendering of the results screen.

pub mod form;
pub mod notes;
pub mod render;

pub use form::{
    FormAction, MeetingDetails, NotesViewModel, Participant, ParticipantField, Screen,
    GENERIC_ERROR,
};
pub use notes::{MeetingNotes, MeetingNotesService};
pub use render::render_results;

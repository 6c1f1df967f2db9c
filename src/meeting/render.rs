//! Plain-text rendering of the meeting notes results screen.

use std::fmt::Write;

use super::form::{MeetingDetails, NotesViewModel};
use crate::summarization::{ActionItem, MeetingAnalysis};

/// Render the results screen. Returns `None` until an analysis exists.
pub fn render_results(vm: &NotesViewModel) -> Option<String> {
    let analysis = vm.analysis()?;
    let mut out = String::new();

    render_details(&mut out, vm.details());
    out.push('\n');
    render_analysis(&mut out, analysis);

    if let Some(transcript) = vm.transcript() {
        let topics = transcript.top_categories(3);
        if !topics.is_empty() {
            let _ = writeln!(out, "\nTopics: {}", topics.join(", "));
        }
        if let Some(language) = &transcript.language_code {
            let _ = writeln!(out, "Language: {}", language);
        }
    }

    Some(out)
}

fn render_details(out: &mut String, details: &MeetingDetails) {
    let _ = writeln!(out, "# Meeting notes");
    let _ = writeln!(out);
    let _ = writeln!(out, "Host: {}", details.host);
    if let Some(date) = details.date {
        let _ = writeln!(out, "Date: {}", date.format("%Y-%m-%d"));
    }
    let _ = writeln!(out, "Agenda: {}", details.agenda);
    let _ = writeln!(out, "Outcomes: {}", details.outcomes);

    let participants: Vec<_> = details
        .participants
        .iter()
        .filter(|p| !p.name.is_empty() || !p.email.is_empty())
        .collect();
    if !participants.is_empty() {
        let _ = writeln!(out, "Participants:");
        for p in participants {
            if p.email.is_empty() {
                let _ = writeln!(out, "  - {}", p.name);
            } else {
                let _ = writeln!(out, "  - {} <{}>", p.name, p.email);
            }
        }
    }
}

fn render_analysis(out: &mut String, analysis: &MeetingAnalysis) {
    let _ = writeln!(out, "## Discussion");
    let _ = writeln!(out, "{}", analysis.summary.meeting_outcomes);
    if !analysis.summary.discuss_steps.is_empty() {
        let _ = writeln!(out, "{}", analysis.summary.discuss_steps);
    }

    render_list(out, "Counter Points", &analysis.analysis.counterpoints);
    render_list(out, "Proposed Ideas", &analysis.analysis.proposed_ideas);

    let _ = writeln!(out, "\n## Actions and Insights");
    if analysis.actions.is_empty() {
        let _ = writeln!(out, "(none)");
    }
    for action in &analysis.actions {
        let _ = writeln!(out, "- {}", action_line(action));
    }
}

fn render_list(out: &mut String, title: &str, items: &[String]) {
    let _ = writeln!(out, "\n## {}", title);
    if items.is_empty() {
        let _ = writeln!(out, "(none)");
    }
    for item in items {
        let _ = writeln!(out, "- {}", item);
    }
}

/// `description [D: x, C: y, I: z] (importance)`; only the first C/I entry is shown.
fn action_line(action: &ActionItem) -> String {
    let first = |codes: &[String]| codes.first().cloned().unwrap_or_else(|| "-".to_string());
    let mut line = format!(
        "{} [D: {}, C: {}, I: {}]",
        action.description,
        action.responsible,
        first(action.consulted.as_slice()),
        first(action.informed.as_slice())
    );
    let importance = action.importance.to_string();
    if !importance.is_empty() {
        let _ = write!(line, " ({})", importance);
    }
    line
}

use crate::conversation::Conversation;

/// The literal text that delimits the model's committed answer from the
/// reasoning that precedes it. Prompts are written against this exact marker.
pub const ANSWER_MARKER: &str = "FINAL ANSWER:";

/// Derive the final textual answer from a terminal conversation.
///
/// Scans newest-first, skipping tool results, and takes the first remaining
/// message as the candidate (empty if the history holds no such message).
/// When the candidate contains the marker, only the text after it is
/// surfaced; otherwise the whole candidate is returned, trimmed.
pub fn extract_answer(conversation: &Conversation) -> String {
    let candidate = conversation
        .messages()
        .iter()
        .rev()
        .find(|message| !message.is_tool_result())
        .map(|message| message.text())
        .unwrap_or_default();

    match find_marker(&candidate) {
        Some(end) => candidate[end..].trim().to_string(),
        None => candidate.trim().to_string(),
    }
}

/// Case-insensitive search for the marker; returns the byte offset just past
/// it. The marker is pure ASCII, so the offset always lands on a char
/// boundary.
fn find_marker(content: &str) -> Option<usize> {
    let haystack = content.as_bytes();
    let marker = ANSWER_MARKER.as_bytes();
    haystack
        .windows(marker.len())
        .position(|window| window.eq_ignore_ascii_case(marker))
        .map(|start| start + marker.len())
}

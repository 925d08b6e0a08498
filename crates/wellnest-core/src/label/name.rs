//! Product-name guess from OCR text.

/// Longest name offered as a suggestion.
pub const MAX_NAME_CHARS: usize = 100;

/// Suggest a medicine name: the first meaningful line of the label text.
///
/// A line qualifies when, trimmed, it is longer than two characters, is not
/// just digits, and does not contain "select" (OCR picks that up from app
/// chrome in screenshots). Best effort only; the user confirms it.
pub fn candidate_name(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .find(|line| is_meaningful(line))
        .map(|line| line.chars().take(MAX_NAME_CHARS).collect())
}

fn is_meaningful(line: &str) -> bool {
    line.chars().count() > 2
        && !line.to_lowercase().contains("select")
        && !line.chars().all(|c| c.is_ascii_digit())
}

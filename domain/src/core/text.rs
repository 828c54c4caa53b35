//! Text helpers for log lines and compact listings.

/// Collapse `s` onto a single line and cut it to at most `max_chars`
/// characters, appending `...` when something was dropped.
///
/// Counts characters rather than bytes so CJK and emoji content (common in
/// doctor replies) is never split mid-character.
pub fn preview(s: &str, max_chars: usize) -> String {
    let flat: String = s.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let keep = max_chars.saturating_sub(3);
    let mut out: String = flat.chars().take(keep).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_short_is_unchanged() {
        assert_eq!(preview("Take ibuprofen", 40), "Take ibuprofen");
    }

    #[test]
    fn test_preview_collapses_newlines() {
        assert_eq!(preview("line one\n\nline  two", 40), "line one line two");
    }

    #[test]
    fn test_preview_truncates_by_chars() {
        assert_eq!(preview("hello world", 8), "hello...");
        assert_eq!(preview("头痛三天伴发热", 5), "头痛...");
    }
}

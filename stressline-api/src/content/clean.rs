//! Display cleanup for timeline text
//!
//! Source sentences arrive scraped with artifacts: a leading
//! `username:` or `@handle:` token, list markers, and corner-bracket
//! quoting. The transform strips one leading token, trims, and removes the
//! brackets. It is total: any input maps to a (possibly empty) string.

/// Clean one line of timeline text for display.
///
/// `None` (a missing or non-text source cell) yields the empty string.
pub fn clean_text_line(text: Option<&str>) -> String {
    let Some(text) = text else {
        return String::new();
    };

    let rest = strip_leading_token(text.trim_start());
    rest.trim().trim_matches(|c| c == '「' || c == '」').to_string()
}

/// Strip at most one leading artifact token: `word:`, `@handle :`, or a
/// run of list/numbering markers. Tried in that order; the first match wins.
fn strip_leading_token(s: &str) -> &str {
    if let Some(rest) = strip_username(s) {
        return rest;
    }
    if let Some(rest) = strip_handle(s) {
        return rest;
    }
    strip_markers(s)
}

/// `[A-Za-z0-9_]+:` prefix
fn strip_username(s: &str) -> Option<&str> {
    let end = s
        .char_indices()
        .take_while(|(_, c)| c.is_ascii_alphanumeric() || *c == '_')
        .last()
        .map(|(i, c)| i + c.len_utf8())?;
    s[end..].strip_prefix(':')
}

/// `@handle :` prefix; the handle may use any word characters
fn strip_handle(s: &str) -> Option<&str> {
    let s = s.strip_prefix('@')?;
    let end = s
        .char_indices()
        .take_while(|(_, c)| c.is_alphanumeric() || *c == '_')
        .last()
        .map(|(i, c)| i + c.len_utf8())?;
    s[end..].trim_start().strip_prefix(':')
}

/// Leading `-`, `*`, digits and `.` markers
fn strip_markers(s: &str) -> &str {
    s.trim_start_matches(|c: char| c.is_ascii_digit() || matches!(c, '-' | '*' | '.'))
}

//! Text trimming utilities for upstream payloads
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Character-boundary truncation for error bodies and probe output

/// Maximum characters of an upstream error body kept in an error
pub const ERROR_BODY_LIMIT: usize = 200;
/// Maximum characters of network error detail and probe responses
pub const DETAIL_LIMIT: usize = 100;

/// Truncate text to at most `max_chars` characters (UTF-8 safe, no ellipsis)
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => text[..end].to_string(),
        None => text.to_string(),
    }
}

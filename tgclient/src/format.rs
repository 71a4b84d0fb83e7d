//! Small display helpers for track metadata

/// Default truncation length
pub const DEFAULT_TRUNCATE_LENGTH: usize = 30;

/// Default truncation suffix
pub const DEFAULT_TRUNCATE_SUFFIX: &str = "...";

/// Format a duration in seconds as a zero-padded `mm:ss` string.
pub fn format_seconds(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Truncate a string to at most `length` characters, appending `suffix`
/// when anything was cut off. Counts characters, not bytes; a `length` of
/// zero disables truncation.
pub fn truncate(s: &str, length: usize, suffix: &str) -> String {
    if length == 0 || s.chars().count() <= length {
        return s.to_string();
    }

    let mut cut: String = s.chars().take(length).collect();
    cut.push_str(suffix);
    cut
}

/// [`truncate`] with the default length and suffix
pub fn truncate_default(s: &str) -> String {
    truncate(s, DEFAULT_TRUNCATE_LENGTH, DEFAULT_TRUNCATE_SUFFIX)
}

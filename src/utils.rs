//! Utility functions

use crate::constants::APP_NAME;
use std::path::PathBuf;

/// App data directory (settings, logs)
pub fn get_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// File name offered in the save dialog for an image url
pub fn suggested_file_name(url: &str) -> String {
    let without_query = url.split(['?', '#']).next().unwrap_or_default();
    let without_scheme = without_query
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(without_query);
    // Host-only urls have no file name
    let last = without_scheme
        .split_once('/')
        .and_then(|(_, path)| path.trim_end_matches('/').rsplit('/').next())
        .unwrap_or_default();
    let cleaned: String = last
        .chars()
        .filter(|c| !matches!(c, '\\' | ':' | '*' | '"' | '<' | '>' | '|'))
        .collect();
    if cleaned.contains('.') {
        cleaned
    } else {
        "image.jpg".to_string()
    }
}

/// Shorten a title to at most `max_chars` characters, adding an ellipsis
pub fn truncate_title(title: &str, max_chars: usize) -> String {
    if title.chars().count() <= max_chars {
        return title.to_string();
    }
    let kept: String = title.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", kept.trim_end())
}

/// Group digits with commas: 12345 -> "12,345"
pub fn format_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_from_url() {
        assert_eq!(suggested_file_name("https://x.io/a/b/rose.jpg"), "rose.jpg");
        assert_eq!(suggested_file_name("https://x.io/a/rose.png?w=200#top"), "rose.png");
        assert_eq!(suggested_file_name("https://x.io/a/"), "image.jpg");
        assert_eq!(suggested_file_name("https://x.io/download"), "image.jpg");
        assert_eq!(suggested_file_name("https://x.io"), "image.jpg");
        assert_eq!(suggested_file_name(""), "image.jpg");
    }

    #[test]
    fn titles_are_truncated_on_char_boundaries() {
        assert_eq!(truncate_title("short", 10), "short");
        assert_eq!(truncate_title("héllo wörld", 6), "héllo…");
        assert_eq!(truncate_title("abcdef", 1), "…");
    }

    #[test]
    fn counts_are_grouped() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
    }
}

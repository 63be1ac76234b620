//! Common helper functions for output formatting.

use owo_colors::OwoColorize;
use serde_json::Value;

/// Length of a shortened object ID.
const SHORT_ID_LENGTH: usize = 8;

/// Truncates an object ID for display.
pub fn truncate_id(id: &str) -> String {
    id.chars().take(SHORT_ID_LENGTH).collect()
}

/// Truncates a string to a maximum number of characters.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        s.to_string()
    }
}

/// Renders a table header line, dimmed when colors are on.
pub fn header_line(header: &str, use_colors: bool) -> String {
    if use_colors {
        format!("{}\n", header.dimmed())
    } else {
        format!("{header}\n")
    }
}

/// Renders a JSON cell value without quotes around strings.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truncate_id() {
        assert_eq!(truncate_id("B19DEDCC11D4E0EFC000EB9495D0F44F"), "B19DEDCC");
        assert_eq!(truncate_id("abc"), "abc");
    }

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("short", 10), "short");
        assert_eq!(truncate_str("this is long", 10), "this is...");
        assert_eq!(truncate_str("régionalité", 6), "rég...");
    }

    #[test]
    fn test_header_line_no_colors() {
        assert_eq!(header_line("ID  Name", false), "ID  Name\n");
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&json!("Europe")), "Europe");
        assert_eq!(cell_text(&json!(12.5)), "12.5");
        assert_eq!(cell_text(&Value::Null), "");
    }
}

use serde_json::Value;

/// Longest string value shown in full when printing items
const MAX_DISPLAY_LEN: usize = 80;

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Uppercase the first character and lowercase the rest ("priority" -> "Priority")
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Render a field value for listings. Long strings are cut down and shown
/// bare; everything else is shown as JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) if s.chars().count() > MAX_DISPLAY_LEN => {
            truncate_string(s, MAX_DISPLAY_LEN)
        }
        other => other.to_string(),
    }
}

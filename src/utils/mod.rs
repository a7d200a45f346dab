pub mod logging;

/// Shortens `text` to at most `max_chars` characters, appending an ellipsis
/// when something was cut.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", kept.trim_end())
}

/// First line of a possibly multi-line description.
pub fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("").trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Meditate", 20), "Meditate");
        assert_eq!(truncate("Read twenty pages", 8), "Read tw…");
        assert_eq!(truncate("", 3), "");
    }

    #[test]
    fn test_first_line() {
        assert_eq!(first_line("Walk\nthe dog"), "Walk");
        assert_eq!(first_line(""), "");
    }
}

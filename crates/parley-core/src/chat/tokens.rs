//! Rough token estimate used for the logged usage metric.

/// Approximately four characters per token, never less than one.
pub fn estimate_tokens(text: &str) -> u32 {
    (text.chars().count() / 4) as u32 + 1
}

/// Estimated tokens for one prompt/reply exchange.
pub fn exchange_tokens(prompt: &str, response: &str) -> u32 {
    estimate_tokens(prompt) + estimate_tokens(response)
}

/// Cut `text` to at most `max_chars` characters, appending "..." when cut.
pub fn truncate_preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

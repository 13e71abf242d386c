//! Text normalization shared by the matcher and the knowledge base loader.

use once_cell::sync::Lazy;
use regex::Regex;

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").expect("valid regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Lower-cases, turns every non-word, non-space character into a space, collapses
/// whitespace runs and trims. Unicode-aware, so Cyrillic letters count as word characters.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = NON_WORD.replace_all(&lowered, " ");
    WHITESPACE.replace_all(&stripped, " ").trim().to_string()
}

/// Whitespace-separated tokens of an already normalized string.
pub fn tokens(normalized: &str) -> impl Iterator<Item = &str> {
    normalized.split_whitespace()
}

/// True when `key` is already in its stored form: non-empty, lower-case, single-spaced, trimmed.
pub fn is_normalized_key(key: &str) -> bool {
    !key.is_empty()
        && key.to_lowercase() == key
        && key.split_whitespace().collect::<Vec<_>>().join(" ") == key
}

/// True when a glossary term survives `normalize` unchanged, so the substring scan over
/// normalized input can reach it.
pub fn is_term_key(key: &str) -> bool {
    !key.is_empty() && normalize(key) == key
}

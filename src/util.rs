use lazy_static::lazy_static;
use regex::Regex;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref URL_RE: Regex = Regex::new(r#"https?://[^\s<>"\{\}\|\\\^`\[\]]+"#).unwrap();
    static ref SUBREDDIT_MENTION_RE: Regex = Regex::new(r"\br/\w+").unwrap();
    static ref USER_MENTION_RE: Regex = Regex::new(r"\bu/\w+").unwrap();
    static ref MARKDOWN_LINK_RE: Regex = Regex::new(r"\[([^\]]+)\]\([^)]+\)").unwrap();
    static ref MARKDOWN_MARKUP_RE: Regex = Regex::new(r"[*_~`#>]").unwrap();
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
    static ref WORD_RE: Regex = Regex::new(r"\b[a-z]+\b").unwrap();
    static ref SENTENCE_BOUNDARY_RE: Regex = Regex::new(r"[.!?]\s+").unwrap();
    static ref STOP_WORDS: HashSet<&'static str> = STOP_WORD_LIST.iter().copied().collect();
}

// Common English stop words dropped during keyword extraction.
const STOP_WORD_LIST: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "from", "as", "is", "was", "are", "were", "been", "be", "have", "has", "had", "do", "does",
    "did", "will", "would", "could", "should", "may", "might", "can", "this", "that", "these",
    "those", "it", "its", "i", "me", "my", "you", "your", "we", "our", "they", "their", "what",
    "which", "who", "when", "where", "why", "how", "all", "each", "every", "both", "few", "more",
    "most", "some", "any", "no", "not", "only", "same", "so", "than", "too", "very", "just",
    "also", "now", "here", "there", "then", "if", "else", "about", "into", "through", "during",
    "before", "after", "above", "below", "up", "down", "out", "off", "over", "under", "again",
    "further", "once", "such", "like", "get", "got", "really", "even", "much", "many", "one",
    "two", "thing", "things", "way", "want", "know", "think", "make", "time", "go", "going",
    "being", "dont", "doesnt", "didnt", "cant", "wont", "im", "ive", "id",
];

/// Normalizes text for pain statement extraction.
///
/// Applies, in order: Unicode NFKC normalization, lowercasing, URL removal,
/// subreddit/user mention removal, markdown link rewriting, markdown marker
/// stripping, whitespace collapsing, and trimming. Never fails; an empty
/// input yields an empty output, and the full transform is idempotent.
pub fn normalize_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let text: String = text.nfkc().collect();
    let text = text.to_lowercase();

    let text = URL_RE.replace_all(&text, "");
    let text = SUBREDDIT_MENTION_RE.replace_all(&text, "");
    let text = USER_MENTION_RE.replace_all(&text, "");
    let text = MARKDOWN_LINK_RE.replace_all(&text, "$1");
    let text = MARKDOWN_MARKUP_RE.replace_all(&text, "");
    let text = WHITESPACE_RE.replace_all(&text, " ");

    text.trim().to_string()
}

/// Splits text into sentences, breaking after `.`, `!`, or `?` followed by
/// whitespace. The terminator stays with the sentence it ends.
pub fn split_sentences(text: &str) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }

    let mut sentences = Vec::new();
    let mut start = 0;

    for boundary in SENTENCE_BOUNDARY_RE.find_iter(text) {
        // The terminator is a single ASCII byte, so +1 is a char boundary.
        let end = boundary.start() + 1;
        sentences.push(&text[start..end]);
        start = boundary.end();
    }

    if start < text.len() {
        sentences.push(&text[start..]);
    }

    sentences
}

/// Generates a deterministic short id from the given parts.
///
/// Parts are joined with `|` and hashed with SHA-256; the first 12 hex
/// characters are returned.
pub fn generate_id(parts: &[&str]) -> String {
    let combined = parts.join("|");
    let digest = Sha256::digest(combined.as_bytes());
    let hex = format!("{:x}", digest);
    hex[..12].to_string()
}

/// Whether a token is a common English stop word.
pub(crate) fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(word)
}

/// Extracts keywords from text: normalizes, tokenizes on `[a-z]+` word
/// boundaries, drops stop words and tokens shorter than 3 characters.
///
/// Tokens are returned in their original order and are not deduplicated;
/// callers deduplicate or count as needed.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let normalized = normalize_text(text);

    WORD_RE
        .find_iter(&normalized)
        .map(|word| word.as_str())
        .filter(|word| word.len() >= 3 && !STOP_WORDS.contains(word))
        .map(|word| word.to_string())
        .collect()
}

/// Converts text to PascalCase, dropping non-alphanumeric characters.
pub fn to_pascal_case(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect();

    cleaned
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect()
}

/// Truncates text to `max_length` characters, appending `...` when cut.
pub fn truncate_text(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        return text.to_string();
    }

    let keep = max_length.saturating_sub(3);
    let truncated: String = text.chars().take(keep).collect();
    format!("{}...", truncated)
}

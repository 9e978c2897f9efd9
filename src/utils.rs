//! Shared text utilities: token estimation and character-safe slicing.

use std::sync::OnceLock;

use tiktoken_rs::{CoreBPE, cl100k_base};

static CL100K: OnceLock<CoreBPE> = OnceLock::new();

fn get_cl100k() -> &'static CoreBPE {
    CL100K.get_or_init(|| cl100k_base().expect("Failed to load cl100k_base tokenizer"))
}

/// Estimate the token count of a prompt using the cl100k_base encoding.
///
/// Hosted providers each use their own tokenizer; this is an approximation
/// suitable for deriving output-token ceilings, not for billing.
pub fn estimate_tokens(text: &str) -> usize {
    get_cl100k().encode_with_special_tokens(text).len()
}

/// Leading slice of at most `max_chars` characters (UTF-8 safe).
pub fn excerpt_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Trailing slice of at most `max_chars` characters (UTF-8 safe).
///
/// Used for the rolling narrative cue carried between section generations.
pub fn tail_chars(text: &str, max_chars: usize) -> &str {
    let char_count = text.chars().count();
    if char_count <= max_chars {
        return text;
    }
    let skip = char_count - max_chars;
    match text.char_indices().nth(skip) {
        Some((idx, _)) => &text[idx..],
        None => text,
    }
}

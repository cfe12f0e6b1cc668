//! Lookup key derivation.
//!
//! Turns a card's name, rules text and type line into the list of words
//! that get a dictionary entry and a translation.
//!
//! Rules, applied per whitespace-separated token:
//! 1. Trim surrounding punctuation and braces (`{T}:` becomes `T`)
//! 2. Drop empty and purely numeric tokens
//! 3. Drop tokens with anything but letters and `-` inside (`can't`, `1/1`)
//! 4. Drop single-character tokens
//! 5. Lowercase, then map irregular forms ([`IRREGULAR_FORMS`])
//! 6. Drop repeats, keeping first occurrence order
//!
//! The card's full name is appended afterwards as-is, even when one of the
//! surviving tokens is identical to it.

use std::collections::HashSet;

use crate::provider::Card;

/// Inflected forms replaced by the form that has a dictionary entry.
pub const IRREGULAR_FORMS: &[(&str, &str)] = &[
    ("enters", "enter"),
    ("attacks", "attack"),
    ("leaves", "to leave"),
];

/// Derives the lookup keys for a card.
///
/// Text source is `name`, `oracle_text` and `type_line` joined by spaces;
/// the card name is appended at the end.
pub fn derive_lookup_keys(card: &Card) -> Vec<String> {
    let text = [
        card.name.as_str(),
        card.oracle_text.as_str(),
        card.type_line.as_str(),
    ]
    .join(" ");

    let mut keys = tokenize(&text);
    keys.push(card.name.clone());
    keys
}

/// Splits text into normalized, deduplicated words.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();

    text.split_whitespace()
        .map(|token| token.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|token| !token.is_empty())
        .filter(|token| token.parse::<i64>().is_err())
        .filter(|token| token.chars().all(|c| c.is_alphabetic() || c == '-'))
        .filter(|token| token.chars().count() != 1)
        .map(|token| normalize(&token.to_lowercase()))
        .filter(|word| seen.insert(word.clone()))
        .collect()
}

fn normalize(word: &str) -> String {
    IRREGULAR_FORMS
        .iter()
        .find(|(form, _)| *form == word)
        .map(|(_, base)| base.to_string())
        .unwrap_or_else(|| word.to_string())
}

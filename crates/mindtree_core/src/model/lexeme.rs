//! Lexeme index model and value normalization.
//!
//! # Responsibility
//! - Track every occurrence ("context") of a normalized text value.
//! - Define the normalization that folds case, diacritics, and
//!   punctuation for lookup while thoughts keep their literal value.
//!
//! # Invariants
//! - A lexeme's `contexts` is exactly the set of thought ids whose value
//!   normalizes to its key.
//! - A lexeme with no contexts is removed from the store.

use crate::model::thought::{ThoughtId, Timestamp};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Lookup key used when a value normalizes to the empty string, so
/// actively-typed empty thoughts still index.
pub const EMPTY_KEY: &str = "__EMPTY__";

static PUNCTUATION: Lazy<Regex> = Lazy::new(|| {
    // Everything that is not a letter, digit, or whitespace.
    Regex::new(r"[^\p{L}\p{N}\s]").expect("punctuation pattern is valid")
});

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Index entry for one normalized text value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lexeme {
    /// Ids of every thought whose value normalizes to this key.
    pub contexts: Vec<ThoughtId>,
    /// Epoch ms when the first occurrence was indexed.
    pub created: Timestamp,
    /// Epoch ms of the last contexts change.
    pub last_updated: Timestamp,
}

impl Lexeme {
    /// Creates an empty lexeme stamped at `now`.
    pub fn new(now: Timestamp) -> Self {
        Self {
            contexts: Vec::new(),
            created: now,
            last_updated: now,
        }
    }
}

/// Normalizes a display value into its lexeme key.
///
/// Lowercases, folds Latin-1 diacritics, strips punctuation, and
/// collapses whitespace runs. An input that normalizes away entirely
/// maps to [`EMPTY_KEY`].
pub fn normalize(value: &str) -> String {
    // Attribute names keep their `=` prefix so `=sort` never collides
    // with a sibling whose literal value is `sort`.
    if let Some(name) = value.strip_prefix('=') {
        return format!("={}", normalize_text(name));
    }
    normalize_text(value)
}

fn normalize_text(value: &str) -> String {
    let folded: String = value
        .chars()
        .flat_map(char::to_lowercase)
        .map(fold_diacritic)
        .collect();
    let stripped = PUNCTUATION.replace_all(&folded, "");
    let collapsed = WHITESPACE_RUN.replace_all(stripped.trim(), " ");
    if collapsed.is_empty() {
        EMPTY_KEY.to_string()
    } else {
        collapsed.into_owned()
    }
}

fn fold_diacritic(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'ç' => 'c',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ñ' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize, EMPTY_KEY};

    #[test]
    fn normalize_folds_case_and_diacritics() {
        assert_eq!(normalize("Café"), "cafe");
        assert_eq!(normalize("NAÏVE"), "naive");
    }

    #[test]
    fn normalize_strips_punctuation_and_collapses_whitespace() {
        assert_eq!(normalize("hello,   world!"), "hello world");
        assert_eq!(normalize("  spaced  out  "), "spaced out");
    }

    #[test]
    fn empty_and_punctuation_only_values_use_sentinel_key() {
        assert_eq!(normalize(""), EMPTY_KEY);
        assert_eq!(normalize("!!!"), EMPTY_KEY);
        assert_eq!(normalize("   "), EMPTY_KEY);
    }

    #[test]
    fn attribute_values_keep_their_prefix() {
        assert_eq!(normalize("=sort"), "=sort");
        assert_eq!(normalize("=Sort"), "=sort");
        assert_ne!(normalize("=sort"), normalize("sort"));
    }
}

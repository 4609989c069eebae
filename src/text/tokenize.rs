//! Tokenization for retrieval text.

use std::sync::LazyLock;

use itertools::Itertools;
use regex::Regex;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// Runs of two or more word characters. Single-character fragments carry no
/// retrieval signal and never enter the vocabulary.
static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("valid regex"));

/// Which n-gram expansion the vectorizer applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NgramRange {
    Unigram,
    #[default]
    UnigramBigram,
}

/// Compatibility-normalize and case-fold `text`, then emit word tokens and,
/// when enabled, adjacent-pair bigrams joined by a single space.
///
/// Unigrams come first, then bigrams, matching the vocabulary's view of a
/// document as one flat bag of terms.
#[must_use]
pub fn tokenize(text: &str, ngrams: NgramRange) -> Vec<String> {
    let folded = text.nfkc().collect::<String>().to_lowercase();
    let words: Vec<String> = TOKEN_PATTERN
        .find_iter(&folded)
        .map(|token| token.as_str().to_string())
        .collect();

    match ngrams {
        NgramRange::Unigram => words,
        NgramRange::UnigramBigram => {
            let bigrams: Vec<String> = words
                .iter()
                .tuple_windows()
                .map(|(left, right)| format!("{left} {right}"))
                .collect();
            words.into_iter().chain(bigrams).collect()
        }
    }
}

// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Default English pipeline stages: punctuation trimming, stop-word removal,
//! and Porter stemming.

use rust_stemmers::{Algorithm, Stemmer};

use crate::pipeline::{Outcome, Token};

/// Strips leading and trailing characters that aren't letters, digits, or
/// underscores. Drops the token entirely if nothing is left.
pub fn trimmer(token: &Token, _index: usize, _tokens: &[Token]) -> Outcome {
    let trimmed = token
        .text
        .trim_matches(|c: char| !(c.is_alphanumeric() || c == '_'));
    if trimmed.is_empty() {
        Outcome::Drop
    } else {
        Outcome::Keep(token.with_text(trimmed))
    }
}

/// A fixed, sorted list of common English stop words, matched by binary
/// search against the lowercased token text.
const STOP_WORDS: &[&str] = &[
    "a", "able", "about", "across", "after", "all", "almost", "also", "am", "among", "an", "and",
    "any", "are", "as", "at", "be", "because", "been", "but", "by", "can", "cannot", "could",
    "dear", "did", "do", "does", "either", "else", "ever", "every", "for", "from", "get", "got",
    "had", "has", "have", "he", "her", "hers", "him", "his", "how", "however", "i", "if", "in",
    "into", "is", "it", "its", "just", "least", "let", "like", "likely", "may", "me", "might",
    "most", "must", "my", "neither", "no", "nor", "not", "of", "off", "often", "on", "only", "or",
    "other", "our", "own", "rather", "said", "say", "says", "she", "should", "since", "so",
    "some", "than", "that", "the", "their", "them", "then", "there", "these", "they", "this",
    "tis", "to", "too", "twas", "us", "wants", "was", "we", "were", "what", "when", "where",
    "which", "while", "who", "whom", "why", "will", "with", "would", "yet", "you", "your",
];

/// Drops tokens whose lowercased text is a common English stop word.
pub fn stop_word_filter(token: &Token, _index: usize, _tokens: &[Token]) -> Outcome {
    let lower = token.text.to_lowercase();
    if STOP_WORDS.binary_search(&lower.as_str()).is_ok() {
        Outcome::Drop
    } else {
        Outcome::Keep(token.clone())
    }
}

/// Reduces a token to its Porter stem.
pub fn stemmer(token: &Token, _index: usize, _tokens: &[Token]) -> Outcome {
    thread_local! {
        static STEMMER: Stemmer = Stemmer::create(Algorithm::English);
    }
    let stemmed = STEMMER.with(|s| s.stem(&token.text).into_owned());
    Outcome::Keep(token.with_text(stemmed))
}

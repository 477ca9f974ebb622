// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Splits field text into tokens carrying position and field metadata.
//!
//! Splits on runs of whitespace and/or hyphens, lowercases each piece, and
//! records `position: [start, length]` (byte offsets into the input text)
//! and `index: ordinal` metadata on every resulting token.

use serde_json::json;

use crate::pipeline::Token;

/// Tokenises `text`, injecting `fields: [field_name]` into every token's
/// metadata alongside `position` and `index`.
pub fn tokenize(text: &str, field_name: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut ordinal = 0usize;
    let mut start = None;

    let mut push_run = |s: usize, e: usize, tokens: &mut Vec<Token>, ordinal: &mut usize| {
        if e <= s {
            return;
        }
        let mut token = Token::new(text[s..e].to_lowercase());
        token
            .metadata
            .insert("position".to_string(), json!([s, e - s]));
        token
            .metadata
            .insert("index".to_string(), json!([*ordinal]));
        token
            .metadata
            .insert("fields".to_string(), json!([field_name]));
        tokens.push(token);
        *ordinal += 1;
    };

    for (i, c) in text.char_indices() {
        let is_separator = c.is_whitespace() || c == '-';
        match (is_separator, start) {
            (false, None) => start = Some(i),
            (true, Some(s)) => {
                push_run(s, i, &mut tokens, &mut ordinal);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        push_run(s, text.len(), &mut tokens, &mut ordinal);
    }

    tokens
}

// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! `MatchData`: a nested `term → field → key → list` structure recording
//! which terms matched which fields of a result, and what token metadata
//! was associated with the match.

use std::collections::HashMap;

use serde_json::Value as JsonValue;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchData {
    terms: HashMap<String, HashMap<String, HashMap<String, Vec<JsonValue>>>>,
}

impl MatchData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `term` matched in `field`, splicing `metadata`'s values
    /// into the per-key lists. Metadata is defensively copied so later
    /// mutation of the caller's data (e.g. the inverted index) can't leak
    /// into an already-returned result.
    pub fn add(&mut self, term: &str, field: &str, metadata: &HashMap<String, Vec<JsonValue>>) {
        let field_map = self
            .terms
            .entry(term.to_string())
            .or_default()
            .entry(field.to_string())
            .or_default();
        for (key, values) in metadata {
            field_map
                .entry(key.clone())
                .or_default()
                .extend(values.iter().cloned());
        }
    }

    /// Deep-merges `other` into `self` by per-key list concatenation.
    pub fn combine(&mut self, other: &MatchData) {
        for (term, fields) in &other.terms {
            let field_map = self.terms.entry(term.clone()).or_default();
            for (field, keys) in fields {
                let key_map = field_map.entry(field.clone()).or_default();
                for (key, values) in keys {
                    key_map.entry(key.clone()).or_default().extend(values.iter().cloned());
                }
            }
        }
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.terms.keys().map(String::as_str)
    }

    pub fn fields_for(&self, term: &str) -> impl Iterator<Item = &str> {
        self.terms
            .get(term)
            .into_iter()
            .flat_map(|fields| fields.keys().map(String::as_str))
    }

    pub fn metadata_for(&self, term: &str, field: &str) -> Option<&HashMap<String, Vec<JsonValue>>> {
        self.terms.get(term).and_then(|fields| fields.get(field))
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The stable serialised index schema and the pure projections to/from it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::Result;
use crate::field::FieldRef;
use crate::index::{Index, Posting};
use crate::pipeline::{Pipeline, Registry};
use crate::token_set::TokenSet;
use crate::vector::SparseVector;

pub const CURRENT_VERSION: &str = "1";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PostingSerialized {
    #[serde(rename = "termIndex")]
    term_index: u32,
    fields: HashMap<String, HashMap<String, HashMap<String, Vec<JsonValue>>>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializedIndex {
    pub version: String,
    pub fields: Vec<String>,
    #[serde(rename = "fieldVectors")]
    field_vectors: Vec<(String, SparseVector)>,
    #[serde(rename = "invertedIndex")]
    inverted_index: Vec<(String, PostingSerialized)>,
    pub pipeline: Vec<String>,
}

impl SerializedIndex {
    pub fn term_count(&self) -> usize {
        self.inverted_index.len()
    }

    pub fn document_count(&self) -> usize {
        self.field_vectors
            .iter()
            .filter_map(|(field_ref, _)| field_ref.split_once('/').map(|(_, doc)| doc))
            .collect::<std::collections::HashSet<_>>()
            .len()
    }
}

pub fn serialize(index: &Index) -> SerializedIndex {
    let mut inverted_index: Vec<(String, PostingSerialized)> = index
        .inverted_index
        .iter()
        .map(|(term, posting)| {
            (
                term.clone(),
                PostingSerialized {
                    term_index: posting.term_index,
                    fields: posting.fields.clone(),
                },
            )
        })
        .collect();
    inverted_index.sort_by(|a, b| a.0.cmp(&b.0));

    let field_vectors: Vec<(String, SparseVector)> = index
        .field_vectors
        .iter()
        .map(|(field_ref, vector)| (field_ref.to_string(), vector.clone()))
        .collect();

    SerializedIndex {
        version: CURRENT_VERSION.to_string(),
        fields: index.fields.clone(),
        field_vectors,
        inverted_index,
        pipeline: index.search_pipeline.labels(),
    }
}

/// Rebuilds an `Index` from its serialised form. Returns accumulated
/// warnings (e.g. version mismatch) alongside the index rather than
/// failing on them.
pub fn deserialize(serialized: &SerializedIndex, registry: &Registry) -> Result<(Index, Vec<String>)> {
    let mut warnings = Vec::new();
    if serialized.version != CURRENT_VERSION {
        warnings.push(format!(
            "serialized index version {:?} does not match current version {:?}",
            serialized.version, CURRENT_VERSION
        ));
    }

    let mut inverted_index = HashMap::with_capacity(serialized.inverted_index.len());
    let mut sorted_terms = Vec::with_capacity(serialized.inverted_index.len());
    for (term, posting) in &serialized.inverted_index {
        sorted_terms.push(term.clone());
        inverted_index.insert(
            term.clone(),
            Posting {
                term_index: posting.term_index,
                fields: posting.fields.clone(),
            },
        );
    }
    let token_set = TokenSet::from_sorted_vocabulary(&sorted_terms)?;

    let mut field_vectors = HashMap::with_capacity(serialized.field_vectors.len());
    for (field_ref_str, vector) in &serialized.field_vectors {
        let field_ref: FieldRef = field_ref_str.parse()?;
        field_vectors.insert(field_ref, vector.clone());
    }

    let search_pipeline = Pipeline::from_labels(&serialized.pipeline, registry)?;

    Ok((
        Index {
            fields: serialized.fields.clone(),
            inverted_index,
            field_vectors,
            token_set,
            search_pipeline,
        },
        warnings,
    ))
}

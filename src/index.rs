// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The immutable, built index: inverted index, per-field BM25 vectors, the
//! corpus token-set automaton, and the search pipeline. Produced by
//! [`crate::builder::Builder::build`] or [`Index::load`].

use std::collections::HashMap;

use serde_json::Value as JsonValue;

use crate::error::Result;
use crate::field::FieldRef;
use crate::match_data::MatchData;
use crate::pipeline::{Pipeline, Registry};
use crate::query::executor;
use crate::query::model::Query;
use crate::query::parser;
use crate::serialize::SerializedIndex;
use crate::token_set::TokenSet;
use crate::vector::SparseVector;

/// Per-term record: a stable coordinate in vector space, plus, for every
/// field the term occurs in, a mapping from document reference to the
/// token metadata accumulated across occurrences.
#[derive(Debug, Clone, Default)]
pub struct Posting {
    pub term_index: u32,
    pub fields: HashMap<String, HashMap<String, HashMap<String, Vec<JsonValue>>>>,
}

#[derive(Debug, Clone)]
pub struct SearchResult {
    pub doc_ref: String,
    pub score: f64,
    pub match_data: MatchData,
}

#[derive(Debug, Clone)]
pub struct Index {
    pub(crate) fields: Vec<String>,
    pub(crate) inverted_index: HashMap<String, Posting>,
    pub(crate) field_vectors: HashMap<FieldRef, SparseVector>,
    pub(crate) token_set: TokenSet,
    pub(crate) search_pipeline: Pipeline,
}

impl Index {
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// The full corpus vocabulary, as accepted by the token-set automaton.
    pub fn vocabulary(&self) -> Vec<String> {
        self.token_set.to_array()
    }

    /// Parses `query_string` and executes it; equivalent to building the
    /// same clauses via [`Index::query`] (testable property: search = query).
    pub fn search(&self, query_string: &str) -> Result<Vec<SearchResult>> {
        let query = parser::parse(query_string, &self.fields)?;
        executor::execute(self, &query)
    }

    /// Executes a query built programmatically via `configure`, which adds
    /// clauses via [`Query::term`]/[`Query::clause`] and propagates any
    /// `UnregisteredField` error those raise.
    pub fn query(&self, configure: impl FnOnce(&mut Query) -> Result<()>) -> Result<Vec<SearchResult>> {
        let mut query = Query::new(self.fields.clone());
        configure(&mut query)?;
        executor::execute(self, &query)
    }

    pub fn to_serialized(&self) -> SerializedIndex {
        crate::serialize::serialize(self)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.to_serialized())
    }

    /// Rebuilds an `Index` from its serialised form, resolving pipeline
    /// labels against `registry` and rebuilding the token set from the
    /// sorted `invertedIndex` term list. Returns any non-fatal warnings
    /// (e.g. a pipeline version mismatch) alongside the index.
    pub fn load(serialized: &SerializedIndex, registry: &Registry) -> Result<(Index, Vec<String>)> {
        crate::serialize::deserialize(serialized, registry)
    }
}

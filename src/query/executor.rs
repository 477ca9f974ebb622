// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Ties the corpus token set, inverted index, and query model together:
//! expands each clause's term against the corpus automaton, looks up
//! postings, accumulates per-field query vectors and match metadata, and
//! scores by cosine similarity subject to required/prohibited filtering.

use std::collections::{HashMap, HashSet};

use crate::error::Result;
use crate::field::FieldRef;
use crate::index::{Index, SearchResult};
use crate::match_data::MatchData;
use crate::token_set::TokenSet;
use crate::vector::SparseVector;

use super::model::{Clause, Presence, Query};

/// A required-match set per field, with a `Complete` sentinel standing in
/// for "every document" so the universe never has to be materialised.
#[derive(Debug, Clone)]
enum RequiredSet {
    Complete,
    Concrete(HashSet<String>),
}

impl RequiredSet {
    fn intersect_concrete(&self, incoming: &HashSet<String>) -> RequiredSet {
        match self {
            RequiredSet::Complete => RequiredSet::Concrete(incoming.clone()),
            RequiredSet::Concrete(existing) => {
                RequiredSet::Concrete(existing.intersection(incoming).cloned().collect())
            }
        }
    }

    fn intersect_with(&self, other: &RequiredSet) -> RequiredSet {
        match (self, other) {
            (RequiredSet::Complete, RequiredSet::Complete) => RequiredSet::Complete,
            (RequiredSet::Complete, RequiredSet::Concrete(s)) => RequiredSet::Concrete(s.clone()),
            (RequiredSet::Concrete(s), RequiredSet::Complete) => RequiredSet::Concrete(s.clone()),
            (RequiredSet::Concrete(a), RequiredSet::Concrete(b)) => {
                RequiredSet::Concrete(a.intersection(b).cloned().collect())
            }
        }
    }

    fn contains(&self, doc_ref: &str) -> bool {
        match self {
            RequiredSet::Complete => true,
            RequiredSet::Concrete(s) => s.contains(doc_ref),
        }
    }
}

/// Expands a clause's term into the list of corpus terms it matches, by
/// building the clause's own pattern automaton (fuzzy if an edit distance
/// was given, else literal-with-wildcards) and intersecting it with the
/// corpus token set.
fn expand_clause_terms(clause_term: &str, edit_distance: Option<u8>, corpus: &TokenSet) -> Vec<String> {
    let pattern = match edit_distance {
        Some(k) => TokenSet::from_fuzzy_pattern(clause_term, k),
        None => TokenSet::from_pattern(clause_term),
    };
    corpus.intersect(&pattern).to_array()
}

pub fn execute(index: &Index, query: &Query) -> Result<Vec<SearchResult>> {
    let mut query_vectors: HashMap<String, SparseVector> = HashMap::new();
    let mut global_required: HashMap<String, RequiredSet> = HashMap::new();
    let mut global_prohibited: HashSet<String> = HashSet::new();
    let mut match_data: HashMap<FieldRef, MatchData> = HashMap::new();
    let mut seen_match_data: HashSet<(String, String)> = HashSet::new();

    for clause in &query.clauses {
        process_clause(
            index,
            clause,
            &mut query_vectors,
            &mut global_required,
            &mut global_prohibited,
            &mut match_data,
            &mut seen_match_data,
        )?;
    }

    let mut all_required = RequiredSet::Complete;
    for set in global_required.values() {
        all_required = all_required.intersect_with(set);
    }

    if query.is_negated() {
        for field_ref in index.field_vectors.keys() {
            match_data.entry(field_ref.clone()).or_insert_with(MatchData::new);
        }
    }

    let mut scores: HashMap<String, f64> = HashMap::new();
    let mut aggregated_match_data: HashMap<String, MatchData> = HashMap::new();

    for (field_ref, md) in &match_data {
        if !all_required.contains(&field_ref.document_ref) {
            continue;
        }
        if global_prohibited.contains(&field_ref.document_ref) {
            continue;
        }
        let score = match (
            query_vectors.get(&field_ref.field_name),
            index.field_vectors.get(field_ref),
        ) {
            (Some(query_vector), Some(field_vector)) => query_vector.similarity(field_vector),
            _ => 0.0,
        };
        *scores.entry(field_ref.document_ref.clone()).or_insert(0.0) += score;
        aggregated_match_data
            .entry(field_ref.document_ref.clone())
            .or_insert_with(MatchData::new)
            .combine(md);
    }

    let mut results: Vec<SearchResult> = scores
        .into_iter()
        .map(|(doc_ref, score)| SearchResult {
            match_data: aggregated_match_data.remove(&doc_ref).unwrap_or_default(),
            doc_ref,
            score,
        })
        .collect();

    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

    Ok(results)
}

#[allow(clippy::too_many_arguments)]
fn process_clause(
    index: &Index,
    clause: &Clause,
    query_vectors: &mut HashMap<String, SparseVector>,
    global_required: &mut HashMap<String, RequiredSet>,
    global_prohibited: &mut HashSet<String>,
    match_data: &mut HashMap<FieldRef, MatchData>,
    seen_match_data: &mut HashSet<(String, String)>,
) -> Result<()> {
    let term = clause.term_with_wildcards();

    let candidate_terms: Vec<String> = if clause.use_pipeline {
        let tokens = vec![crate::pipeline::Token::new(term)];
        index
            .search_pipeline
            .run(tokens)
            .into_iter()
            .map(|t| t.text)
            .collect()
    } else {
        vec![term]
    };

    let mut matched_terms: Vec<String> = Vec::new();
    for candidate in &candidate_terms {
        matched_terms.extend(expand_clause_terms(
            candidate,
            clause.edit_distance,
            &index.token_set,
        ));
    }
    matched_terms.sort();
    matched_terms.dedup();

    if clause.presence == Presence::Required {
        for field in &clause.fields {
            global_required
                .entry(field.clone())
                .or_insert(RequiredSet::Complete);
        }
        if matched_terms.is_empty() {
            for field in &clause.fields {
                let entry = global_required.get_mut(field).unwrap();
                *entry = entry.intersect_concrete(&HashSet::new());
            }
            return Ok(());
        }
    }

    let mut clause_cumulative_match: HashSet<String> = HashSet::new();

    for term in &matched_terms {
        let Some(posting) = index.inverted_index.get(term) else {
            continue;
        };
        for field in &clause.fields {
            let Some(docs) = posting.fields.get(field) else {
                continue;
            };

            let mut skip_match_data = false;
            match clause.presence {
                Presence::Required => {
                    clause_cumulative_match.extend(docs.keys().cloned());
                }
                Presence::Prohibited => {
                    global_prohibited.extend(docs.keys().cloned());
                    skip_match_data = true;
                }
                Presence::Optional => {
                    let vector = query_vectors.entry(field.clone()).or_default();
                    vector.upsert(posting.term_index, clause.boost, |a, b| a + b);
                }
            }

            if skip_match_data {
                continue;
            }

            let memo_key = (term.clone(), field.clone());
            if seen_match_data.insert(memo_key) {
                for (doc_ref, metadata) in docs {
                    let field_ref = FieldRef {
                        field_name: field.clone(),
                        document_ref: doc_ref.clone(),
                    };
                    match_data
                        .entry(field_ref)
                        .or_insert_with(MatchData::new)
                        .add(term, field, metadata);
                }
            }
        }
    }

    if clause.presence == Presence::Required {
        for field in &clause.fields {
            let entry = global_required.get_mut(field).unwrap();
            *entry = entry.intersect_concrete(&clause_cumulative_match);
        }
    }

    Ok(())
}

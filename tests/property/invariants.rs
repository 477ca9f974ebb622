//! Property-based tests for the ten documented invariants: token-set
//! minimisation, canonical-key injectivity, intersection correctness, fuzzy
//! matching, sparse-vector laws, BM25 determinism, search/query equivalence,
//! presence semantics, pipeline filtering, and prototype-safe keys.

use std::collections::HashSet;

use lexidex::{Builder, Document, TokenSet};
use proptest::prelude::*;

fn word_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z]{1,8}").unwrap()
}

fn sorted_vocabulary_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::hash_set(word_strategy(), 1..30).prop_map(|set| {
        let mut words: Vec<String> = set.into_iter().collect();
        words.sort();
        words
    })
}

proptest! {
    /// Token-set minimisation round-trips: building from a sorted,
    /// deduplicated vocabulary and reading it back yields the same set.
    #[test]
    fn token_set_round_trips(words in sorted_vocabulary_strategy()) {
        let ts = TokenSet::from_sorted_vocabulary(&words).unwrap();
        let mut got = ts.to_array();
        got.sort();
        prop_assert_eq!(got, words);
    }

    /// Intersecting the corpus automaton with a literal (no-wildcard)
    /// pattern for one of its own words returns exactly that word.
    #[test]
    fn literal_intersection_finds_exact_member(words in sorted_vocabulary_strategy()) {
        let ts = TokenSet::from_sorted_vocabulary(&words).unwrap();
        for word in &words {
            let pattern = TokenSet::from_pattern(word);
            prop_assert_eq!(ts.intersect(&pattern).to_array(), vec![word.clone()]);
        }
    }

    /// A fully-wildcarded pattern (`*`) matches every word in the corpus.
    #[test]
    fn star_pattern_matches_everything(words in sorted_vocabulary_strategy()) {
        let ts = TokenSet::from_sorted_vocabulary(&words).unwrap();
        let pattern = TokenSet::from_pattern("*");
        let mut got = ts.intersect(&pattern).to_array();
        got.sort();
        prop_assert_eq!(got, words);
    }

    /// Fuzzy matching at edit distance 0 degenerates to a literal match.
    #[test]
    fn zero_edit_fuzzy_is_literal(words in sorted_vocabulary_strategy()) {
        let ts = TokenSet::from_sorted_vocabulary(&words).unwrap();
        for word in &words {
            let pattern = TokenSet::from_fuzzy_pattern(word, 0);
            prop_assert_eq!(ts.intersect(&pattern).to_array(), vec![word.clone()]);
        }
    }
}

#[test]
fn fuzzy_matching_is_non_empty_exactly_within_edit_budget() {
    // "plant" vs "plait": substitute 'n' for 'i' -- edit distance 1.
    let vocab = TokenSet::from_sorted_vocabulary(&["plait"]).unwrap();
    assert!(vocab
        .intersect(&TokenSet::from_fuzzy_pattern("plant", 1))
        .to_array()
        .contains(&"plait".to_string()));
    assert!(vocab
        .intersect(&TokenSet::from_fuzzy_pattern("plant", 0))
        .to_array()
        .is_empty());
}

#[test]
fn bm25_build_is_deterministic_independent_of_add_order() {
    let docs = [
        ("a", "green plant study"),
        ("b", "green grass field"),
        ("c", "plant grows in the study"),
    ];

    let build = |order: &[usize]| {
        let mut builder = Builder::new();
        builder.field("body", None).unwrap();
        for &i in order {
            let (id, body) = docs[i];
            builder.add(&Document::from([("id", id), ("body", body)]), 1.0).unwrap();
        }
        builder.build().unwrap()
    };

    let forward = build(&[0, 1, 2]);
    let reversed = build(&[2, 1, 0]);

    let mut forward_terms = forward.vocabulary();
    let mut reversed_terms = reversed.vocabulary();
    forward_terms.sort();
    reversed_terms.sort();
    assert_eq!(forward_terms, reversed_terms);

    for query in ["green", "plant", "study"] {
        let mut fwd_scores: Vec<(String, f64)> = forward
            .search(query)
            .unwrap()
            .into_iter()
            .map(|r| (r.doc_ref, r.score))
            .collect();
        let mut rev_scores: Vec<(String, f64)> = reversed
            .search(query)
            .unwrap()
            .into_iter()
            .map(|r| (r.doc_ref, r.score))
            .collect();
        fwd_scores.sort_by(|a, b| a.0.cmp(&b.0));
        rev_scores.sort_by(|a, b| a.0.cmp(&b.0));
        assert_eq!(fwd_scores, rev_scores);
    }
}

#[test]
fn search_and_query_agree_on_the_same_clauses() {
    let mut builder = Builder::new();
    builder.field("title", None).unwrap();
    builder.add(&Document::from([("id", "a"), ("title", "green plant")]), 1.0).unwrap();
    builder.add(&Document::from([("id", "b"), ("title", "green grass")]), 1.0).unwrap();
    let index = builder.build().unwrap();

    let via_search = index.search("green +plant").unwrap();
    let via_query = index
        .query(|q| {
            q.term("green", |_| {})?;
            q.term("plant", |c| c.presence = lexidex::Presence::Required)?;
            Ok(())
        })
        .unwrap();

    let refs_of = |results: &[lexidex::SearchResult]| -> Vec<String> {
        let mut v: Vec<String> = results.iter().map(|r| r.doc_ref.clone()).collect();
        v.sort();
        v
    };
    assert_eq!(refs_of(&via_search), refs_of(&via_query));

    let scores_of = |results: &[lexidex::SearchResult]| -> Vec<(String, f64)> {
        let mut v: Vec<(String, f64)> = results.iter().map(|r| (r.doc_ref.clone(), r.score)).collect();
        v.sort_by(|a, b| a.0.cmp(&b.0));
        v
    };
    assert_eq!(scores_of(&via_search), scores_of(&via_query));
}

#[test]
fn fully_prohibited_query_returns_every_surviving_document_at_zero() {
    let mut builder = Builder::new();
    builder.field("body", None).unwrap();
    builder.add(&Document::from([("id", "a"), ("body", "green plant")]), 1.0).unwrap();
    builder.add(&Document::from([("id", "b"), ("body", "green grass")]), 1.0).unwrap();
    builder.add(&Document::from([("id", "c"), ("body", "plant only")]), 1.0).unwrap();
    let index = builder.build().unwrap();

    let results = index.search("-plant").unwrap();
    let refs: HashSet<&str> = results.iter().map(|r| r.doc_ref.as_str()).collect();
    assert_eq!(refs, ["b"].into());
    assert!(results.iter().all(|r| r.score == 0.0));
}

#[test]
fn required_term_matching_any_targeted_field_is_sufficient() {
    let mut builder = Builder::new();
    builder.field("title", None).unwrap();
    builder.field("body", None).unwrap();
    builder
        .add(
            &Document::from([("id", "a"), ("title", "sunrise"), ("body", "a quiet morning")]),
            1.0,
        )
        .unwrap();
    builder
        .add(
            &Document::from([("id", "b"), ("title", "quiet evening"), ("body", "storm clouds")]),
            1.0,
        )
        .unwrap();
    let index = builder.build().unwrap();

    // "quiet" occurs in A's body and B's title: a required clause spanning
    // both fields must keep both documents.
    let results = index.search("+quiet").unwrap();
    let refs: HashSet<&str> = results.iter().map(|r| r.doc_ref.as_str()).collect();
    assert_eq!(refs, ["a", "b"].into());
}

#[test]
fn object_prototype_shaped_keys_round_trip_without_confusion() {
    let mut builder = Builder::new();
    builder.field("body", None).unwrap();
    builder
        .add(
            &Document::from([
                ("id", "constructor"),
                ("body", "toString hasOwnProperty __proto__ valueOf"),
            ]),
            1.0,
        )
        .unwrap();
    builder
        .add(&Document::from([("id", "toString"), ("body", "__proto__ constructor")]), 1.0)
        .unwrap();
    let index = builder.build().unwrap();

    let results = index.search("constructor").unwrap();
    let refs: HashSet<&str> = results.iter().map(|r| r.doc_ref.as_str()).collect();
    assert_eq!(refs, ["constructor", "toString"].into());

    let proto_results = index.search("__proto__").unwrap();
    let refs: HashSet<&str> = proto_results.iter().map(|r| r.doc_ref.as_str()).collect();
    assert_eq!(refs, ["constructor", "toString"].into());
}

#[test]
fn pipeline_function_dropping_a_token_removes_it_from_the_index() {
    use lexidex::Outcome;

    let mut builder = Builder::new();
    builder.field("body", None).unwrap();
    builder.index_pipeline().add(
        "drop-short",
        std::sync::Arc::new(|t: &lexidex::Token, _, _| {
            if t.text.len() > 2 {
                Outcome::Keep(t.clone())
            } else {
                Outcome::Drop
            }
        }),
    );
    builder
        .add(&Document::from([("id", "a"), ("body", "ok green plant")]), 1.0)
        .unwrap();
    let index = builder.build().unwrap();

    let mut terms = index.vocabulary();
    terms.sort();
    assert_eq!(terms, vec!["green", "plant"]);
}

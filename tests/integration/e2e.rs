//! End-to-end scenarios against the three-document Clue corpus: Mr. Green,
//! Professor Plumb, and Miss Scarlett.

use crate::common::{clue_corpus, doc_refs};

#[test]
fn green_ranks_the_densest_document_first() {
    let index = clue_corpus();
    let results = index.search("green").unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].doc_ref, "a");
}

#[test]
fn trailing_wildcard_matches_stemmed_vocabulary() {
    let index = clue_corpus();
    let results = index.search("pl*").unwrap();
    assert_eq!(doc_refs(&results).into_iter().collect::<std::collections::HashSet<_>>(), ["b", "c"].into());

    let mut matched: Vec<&str> = results.iter().flat_map(|r| r.match_data.terms()).collect();
    matched.sort();
    matched.dedup();
    // "Plumbs" stems to "plumb" at index time, so the wildcard never sees it
    // as a distinct vocabulary entry.
    assert_eq!(matched, vec!["plant", "plumb"]);
}

#[test]
fn leading_wildcard_matches_plant_only() {
    let index = clue_corpus();
    let results = index.search("*ant").unwrap();
    assert_eq!(doc_refs(&results).into_iter().collect::<std::collections::HashSet<_>>(), ["b", "c"].into());

    let mut matched: Vec<&str> = results.iter().flat_map(|r| r.match_data.terms()).collect();
    matched.sort();
    matched.dedup();
    assert_eq!(matched, vec!["plant"]);
}

#[test]
fn fuzzy_term_within_edit_budget_matches_plant() {
    let index = clue_corpus();
    let results = index.search("plint~2").unwrap();
    assert_eq!(doc_refs(&results).into_iter().collect::<std::collections::HashSet<_>>(), ["b", "c"].into());

    let mut matched: Vec<&str> = results.iter().flat_map(|r| r.match_data.terms()).collect();
    matched.sort();
    matched.dedup();
    assert_eq!(matched, vec!["plant"]);
}

#[test]
fn field_scoped_term_matches_only_its_field() {
    let index = clue_corpus();
    let results = index.search("title:plant").unwrap();
    assert_eq!(doc_refs(&results), vec!["b"]);
}

#[test]
fn prohibited_only_query_returns_every_other_document_at_zero_score() {
    let index = clue_corpus();
    let results = index.search("-plant").unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].doc_ref, "a");
    assert_eq!(results[0].score, 0.0);
}

#[test]
fn required_term_filters_by_any_of_its_fields() {
    let index = clue_corpus();
    let results = index.search("green +plant").unwrap();

    // "plant" is required across both title and body; B matches it via
    // title, C matches it via body, so both survive the filter (property:
    // a required term across multiple fields filters documents matching in
    // *any* of those fields). Both also carry "green" in their body, so
    // both score and both carry both matched terms.
    assert_eq!(doc_refs(&results).into_iter().collect::<std::collections::HashSet<_>>(), ["b", "c"].into());
    for result in &results {
        let mut matched: Vec<&str> = result.match_data.terms().collect();
        matched.sort();
        assert_eq!(matched, vec!["green", "plant"]);
        assert!(result.score > 0.0);
    }
}

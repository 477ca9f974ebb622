//! Shared test fixtures.

#![allow(dead_code)]

use lexidex::{Builder, Document, Index};

/// The three-document corpus used throughout the end-to-end scenarios:
/// Mr. Green, Professor Plumb, and Miss Scarlett.
pub fn clue_corpus() -> Index {
    let mut builder = Builder::new();
    builder.field("title", None).unwrap();
    builder.field("body", None).unwrap();

    builder
        .add(
            &Document::from([
                ("id", "a"),
                ("title", "Mr. Green kills Colonel Mustard"),
                (
                    "body",
                    "Mr. Green killed Colonel Mustard in the study with the candlestick. Mr. Green is not a very nice fellow.",
                ),
            ]),
            1.0,
        )
        .unwrap();

    builder
        .add(
            &Document::from([
                ("id", "b"),
                ("title", "Plumb waters plant"),
                ("body", "Professor Plumb has a green plant in his study"),
            ]),
            1.0,
        )
        .unwrap();

    builder
        .add(
            &Document::from([
                ("id", "c"),
                ("title", "Scarlett helps Professor"),
                (
                    "body",
                    "Miss Scarlett watered Professor Plumbs green plant while he was away from his office last week.",
                ),
            ]),
            1.0,
        )
        .unwrap();

    builder.build().unwrap()
}

pub fn doc_refs(results: &[lexidex::SearchResult]) -> Vec<&str> {
    results.iter().map(|r| r.doc_ref.as_str()).collect()
}

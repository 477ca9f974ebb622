// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! An embeddable, in-memory full-text search engine.
//!
//! Four pieces, each usable on its own:
//!
//! - a minimised finite-state automaton over characters ([`token_set`])
//!   that represents the corpus vocabulary and intersects against
//!   literal, wildcard, and fuzzy query patterns;
//! - an inverted index with BM25 scoring ([`builder`]/[`index`]), backed
//!   by sparse per-document-field vectors ([`vector`]);
//! - a compact query language (`+required -prohibited field:term~2^3`)
//!   with a hand-written lexer and recursive-descent parser ([`query`]);
//! - an executor that ties the three together: expand each clause's
//!   terms against the corpus automaton, look up postings, score by
//!   cosine similarity, and apply presence filters.
//!
//! ```
//! use lexidex::{Builder, Document};
//!
//! let mut builder = Builder::new();
//! builder.field("title", None).unwrap();
//!
//! builder.add(&Document::from([
//!     ("id", "a"),
//!     ("title", "Mr. Green kills Colonel Mustard"),
//! ]), 1.0).unwrap();
//!
//! let index = builder.build().unwrap();
//! let results = index.search("green").unwrap();
//! assert_eq!(results[0].doc_ref, "a");
//! ```

pub mod builder;
pub mod error;
pub mod field;
pub mod index;
pub mod lang;
pub mod match_data;
pub mod pipeline;
pub mod query;
pub mod serialize;
pub mod token_set;
pub mod tokenizer;
pub mod vector;

pub use builder::{Builder, Document};
pub use error::{Error, Result};
pub use field::FieldRef;
pub use index::{Index, Posting, SearchResult};
pub use match_data::MatchData;
pub use pipeline::{Outcome, Pipeline, Registry, Token};
pub use query::{wildcard, Clause, Presence, Query};
pub use serialize::SerializedIndex;
pub use token_set::TokenSet;
pub use vector::SparseVector;

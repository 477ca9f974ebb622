// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The error taxonomy for building, loading, and querying an index.
//!
//! Every variant corresponds to one of the failure kinds catalogued in the
//! design notes: configuration mistakes, build-time invariant violations,
//! query parse failures (which carry the offending byte range), and pipeline
//! label lookups that fail on load. Nothing in this crate panics on bad
//! caller input; it returns one of these instead.

use std::fmt;

/// Everything that can go wrong while building, loading, or querying an index.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A field name contained the `/` reserved for `FieldRef` serialisation.
    FieldNameContainsSlash { field: String },
    /// `Builder::ref_field` was called again with a different name after at
    /// least one document had already been added.
    ReferenceFieldChanged { previous: String, attempted: String },
    /// `SparseVector::insert` was called for a coordinate that is already present.
    DuplicateVectorIndex { index: u32 },
    /// A word passed to `TokenSet::from_sorted_vocabulary` was not strictly
    /// greater than the previous word.
    UnsortedVocabulary { previous: String, next: String },
    /// A query clause named a field that isn't in the index's field list.
    UnregisteredField { field: String },
    /// The query string could not be parsed. `start`/`end` are byte offsets
    /// into the original query string.
    QueryParse {
        message: String,
        start: usize,
        end: usize,
    },
    /// A serialised pipeline referenced a label not present in the registry
    /// passed to `Index::load`.
    UnknownPipelineLabel { label: String },
    /// The serialised index's `fieldVectors`/`invertedIndex` entries could
    /// not be decoded (malformed coordinate, non-finite score, etc).
    MalformedSerializedIndex { reason: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::FieldNameContainsSlash { field } => {
                write!(f, "field name {field:?} must not contain '/'")
            }
            Error::ReferenceFieldChanged {
                previous,
                attempted,
            } => write!(
                f,
                "reference field was already set to {previous:?}; cannot change it to {attempted:?} mid-build"
            ),
            Error::DuplicateVectorIndex { index } => {
                write!(f, "vector already has an entry at index {index}")
            }
            Error::UnsortedVocabulary { previous, next } => write!(
                f,
                "vocabulary is not sorted: {next:?} does not follow {previous:?}"
            ),
            Error::UnregisteredField { field } => {
                write!(f, "field {field:?} was not registered on the builder")
            }
            Error::QueryParse {
                message,
                start,
                end,
            } => write!(f, "{message} (at byte {start}..{end})"),
            Error::UnknownPipelineLabel { label } => {
                write!(f, "pipeline function {label:?} is not registered")
            }
            Error::MalformedSerializedIndex { reason } => {
                write!(f, "malformed serialized index: {reason}")
            }
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;

// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! `FieldRef`: the pair (document reference, field name), serialised as
//! `fieldName + "/" + documentRef`.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldRef {
    pub field_name: String,
    pub document_ref: String,
}

impl FieldRef {
    pub fn new(field_name: impl Into<String>, document_ref: impl Into<String>) -> Result<Self> {
        let field_name = field_name.into();
        if field_name.contains('/') {
            return Err(Error::FieldNameContainsSlash { field: field_name });
        }
        Ok(FieldRef {
            field_name,
            document_ref: document_ref.into(),
        })
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.field_name, self.document_ref)
    }
}

impl FromStr for FieldRef {
    type Err = Error;

    /// Parses back a serialised `FieldRef`, splitting at the *first* `/` so
    /// that document references containing `/` round-trip correctly.
    fn from_str(s: &str) -> Result<Self> {
        match s.split_once('/') {
            Some((field_name, document_ref)) => Ok(FieldRef {
                field_name: field_name.to_string(),
                document_ref: document_ref.to_string(),
            }),
            None => Err(Error::MalformedSerializedIndex {
                reason: format!("field reference {s:?} has no '/' separator"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_field_names_with_slash() {
        assert_eq!(
            FieldRef::new("a/b", "doc1"),
            Err(Error::FieldNameContainsSlash {
                field: "a/b".to_string()
            })
        );
    }

    #[test]
    fn round_trips_through_display_and_parse() {
        let r = FieldRef::new("title", "doc1").unwrap();
        assert_eq!(r.to_string(), "title/doc1");
        assert_eq!(r.to_string().parse::<FieldRef>().unwrap(), r);
    }

    #[test]
    fn document_ref_may_contain_slash_and_splits_at_first() {
        let r = FieldRef::new("title", "a/b/c").unwrap();
        let serialized = r.to_string();
        assert_eq!(serialized, "title/a/b/c");
        let parsed: FieldRef = serialized.parse().unwrap();
        assert_eq!(parsed.field_name, "title");
        assert_eq!(parsed.document_ref, "a/b/c");
    }
}

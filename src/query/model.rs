// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The structured query model: clauses with a term, target fields, boost,
//! edit distance, wildcard flags, and presence.

use crate::error::{Error, Result};

/// Wildcard placement flags. Bitwise-combinable: `LEADING | TRAILING`
/// prepends and appends `*` to the term.
pub mod wildcard {
    pub const NONE: u8 = 0;
    pub const LEADING: u8 = 1;
    pub const TRAILING: u8 = 2;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Optional = 1,
    Required = 2,
    Prohibited = 3,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub term: String,
    pub fields: Vec<String>,
    pub boost: f64,
    pub edit_distance: Option<u8>,
    pub wildcard: u8,
    pub presence: Presence,
    pub use_pipeline: bool,
}

impl Clause {
    /// A clause with every default applied: full field list, boost 1,
    /// pipeline enabled, no wildcard, optional presence.
    pub fn new(term: impl Into<String>, all_fields: &[String]) -> Self {
        Clause {
            term: term.into(),
            fields: all_fields.to_vec(),
            boost: 1.0,
            edit_distance: None,
            wildcard: wildcard::NONE,
            presence: Presence::Optional,
            use_pipeline: true,
        }
    }

    /// The term with wildcard flags applied: `*` is prepended/appended
    /// unless already present at that position.
    pub fn term_with_wildcards(&self) -> String {
        let mut term = self.term.clone();
        if self.wildcard & wildcard::TRAILING != 0 && !term.ends_with('*') {
            term.push('*');
        }
        if self.wildcard & wildcard::LEADING != 0 && !term.starts_with('*') {
            term.insert(0, '*');
        }
        term
    }
}

/// A query against a fixed set of allowed field names.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub all_fields: Vec<String>,
    pub clauses: Vec<Clause>,
}

impl Query {
    pub fn new(all_fields: Vec<String>) -> Self {
        Query {
            all_fields,
            clauses: Vec::new(),
        }
    }

    /// Adds a clause for `term_or_terms`, applying defaults and any
    /// overrides supplied via `configure`. Errors if `configure` leaves
    /// `fields` naming anything outside `all_fields`.
    pub fn term(&mut self, term: impl Into<String>, configure: impl FnOnce(&mut Clause)) -> Result<()> {
        let mut clause = Clause::new(term, &self.all_fields);
        configure(&mut clause);
        self.clause(clause)
    }

    /// Adds a pre-built clause. Errors if any of `clause.fields` was never
    /// registered on this query's field list.
    pub fn clause(&mut self, clause: Clause) -> Result<()> {
        for field in &clause.fields {
            if !self.all_fields.iter().any(|f| f == field) {
                return Err(Error::UnregisteredField {
                    field: field.clone(),
                });
            }
        }
        self.clauses.push(clause);
        Ok(())
    }

    /// True when every clause is prohibited: such a query matches every
    /// document not excluded by one of its clauses.
    pub fn is_negated(&self) -> bool {
        !self.clauses.is_empty()
            && self
                .clauses
                .iter()
                .all(|c| c.presence == Presence::Prohibited)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_flags_are_combinable() {
        let mut clause = Clause::new("ant", &["title".to_string()]);
        clause.wildcard = wildcard::LEADING | wildcard::TRAILING;
        assert_eq!(clause.term_with_wildcards(), "*ant*");
    }

    #[test]
    fn wildcard_flags_do_not_duplicate_existing_star() {
        let mut clause = Clause::new("*ant*", &["title".to_string()]);
        clause.wildcard = wildcard::LEADING | wildcard::TRAILING;
        assert_eq!(clause.term_with_wildcards(), "*ant*");
    }

    #[test]
    fn is_negated_requires_all_clauses_prohibited() {
        let mut q = Query::new(vec!["title".to_string()]);
        assert!(!q.is_negated());
        q.term("plant", |c| c.presence = Presence::Prohibited).unwrap();
        assert!(q.is_negated());
        q.term("green", |c| c.presence = Presence::Optional).unwrap();
        assert!(!q.is_negated());
    }

    #[test]
    fn clause_naming_an_unregistered_field_is_an_error() {
        let mut q = Query::new(vec!["title".to_string()]);
        let err = q.term("plant", |c| c.fields = vec!["subtitle".to_string()]).unwrap_err();
        assert!(matches!(err, Error::UnregisteredField { field } if field == "subtitle"));
    }
}

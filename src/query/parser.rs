// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Recursive-descent parser turning a lexeme stream into a [`Query`].

use super::lexer::{lex, Lexeme, LexemeKind};
use super::model::{wildcard, Clause, Presence, Query};
use crate::error::{Error, Result};

fn parse_error(message: impl Into<String>, start: usize, end: usize) -> Error {
    Error::QueryParse {
        message: message.into(),
        start,
        end,
    }
}

pub fn parse(input: &str, all_fields: &[String]) -> Result<Query> {
    let lexemes = lex(input)?;
    let mut query = Query::new(all_fields.to_vec());
    let mut pos = 0;
    while pos < lexemes.len() {
        pos = parse_clause(&lexemes, pos, &mut query)?;
    }
    Ok(query)
}

fn parse_clause(lexemes: &[Lexeme], pos: usize, query: &mut Query) -> Result<usize> {
    match lexemes[pos].kind {
        LexemeKind::Presence => parse_presence(lexemes, pos, query),
        LexemeKind::Field => parse_field(lexemes, pos, query, None),
        LexemeKind::Term => parse_term(lexemes, pos, query, None, None),
        _ => Err(parse_error(
            "unexpected lexeme",
            lexemes[pos].start,
            lexemes[pos].end,
        )),
    }
}

fn parse_presence(lexemes: &[Lexeme], pos: usize, query: &mut Query) -> Result<usize> {
    let presence = if lexemes[pos].text == "+" {
        Presence::Required
    } else {
        Presence::Prohibited
    };
    let next = pos + 1;
    match lexemes.get(next).map(|l| l.kind) {
        Some(LexemeKind::Field) => parse_field(lexemes, next, query, Some(presence)),
        Some(LexemeKind::Term) => parse_term(lexemes, next, query, Some(presence), None),
        _ => Err(parse_error(
            "missing field or term after presence marker",
            lexemes[pos].start,
            lexemes[pos].end,
        )),
    }
}

fn parse_field(
    lexemes: &[Lexeme],
    pos: usize,
    query: &mut Query,
    presence: Option<Presence>,
) -> Result<usize> {
    let field_name = lexemes[pos].text.clone();
    if !query.all_fields.iter().any(|f| *f == field_name) {
        return Err(parse_error(
            format!("unknown field {field_name:?}"),
            lexemes[pos].start,
            lexemes[pos].end,
        ));
    }
    let next = pos + 1;
    match lexemes.get(next).map(|l| l.kind) {
        Some(LexemeKind::Term) => parse_term(lexemes, next, query, presence, Some(vec![field_name])),
        _ => Err(parse_error(
            "expected a term after field",
            lexemes[pos].start,
            lexemes[pos].end,
        )),
    }
}

fn parse_term(
    lexemes: &[Lexeme],
    pos: usize,
    query: &mut Query,
    presence: Option<Presence>,
    fields: Option<Vec<String>>,
) -> Result<usize> {
    let term = lexemes[pos].text.to_lowercase();
    let use_pipeline = !term.contains('*');
    let mut boost = None;
    let mut edit_distance = None;
    let mut next = pos + 1;

    loop {
        match lexemes.get(next).map(|l| l.kind) {
            Some(LexemeKind::EditDistance) => {
                edit_distance = Some(lexemes[next].text.parse::<u8>().map_err(|_| {
                    parse_error(
                        "edit distance must be numeric",
                        lexemes[next].start,
                        lexemes[next].end,
                    )
                })?);
                next += 1;
            }
            Some(LexemeKind::Boost) => {
                boost = Some(lexemes[next].text.parse::<f64>().map_err(|_| {
                    parse_error(
                        "boost must be numeric",
                        lexemes[next].start,
                        lexemes[next].end,
                    )
                })?);
                next += 1;
            }
            _ => break,
        }
    }

    query.clause(Clause {
        term,
        fields: fields.unwrap_or_else(|| query.all_fields.clone()),
        boost: boost.unwrap_or(1.0),
        edit_distance,
        wildcard: wildcard::NONE,
        presence: presence.unwrap_or(Presence::Optional),
        use_pipeline,
    })?;

    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> Vec<String> {
        vec!["title".to_string(), "body".to_string()]
    }

    #[test]
    fn parses_bare_term_with_defaults() {
        let q = parse("green", &fields()).unwrap();
        assert_eq!(q.clauses.len(), 1);
        let c = &q.clauses[0];
        assert_eq!(c.term, "green");
        assert_eq!(c.fields, fields());
        assert_eq!(c.boost, 1.0);
        assert_eq!(c.presence, Presence::Optional);
        assert!(c.use_pipeline);
    }

    #[test]
    fn parses_field_scoped_term() {
        let q = parse("title:plant", &fields()).unwrap();
        assert_eq!(q.clauses[0].fields, vec!["title".to_string()]);
        assert_eq!(q.clauses[0].term, "plant");
    }

    #[test]
    fn parses_required_and_prohibited_markers() {
        let q = parse("+plant -green", &fields()).unwrap();
        assert_eq!(q.clauses[0].presence, Presence::Required);
        assert_eq!(q.clauses[1].presence, Presence::Prohibited);
    }

    #[test]
    fn parses_edit_distance_and_boost() {
        let q = parse("plint~2^3", &fields()).unwrap();
        assert_eq!(q.clauses[0].edit_distance, Some(2));
        assert_eq!(q.clauses[0].boost, 3.0);
    }

    #[test]
    fn wildcard_term_disables_pipeline() {
        let q = parse("pl*", &fields()).unwrap();
        assert!(!q.clauses[0].use_pipeline);
    }

    #[test]
    fn unknown_field_is_a_parse_error() {
        let err = parse("nope:plant", &fields()).unwrap_err();
        assert!(matches!(err, Error::QueryParse { .. }));
    }

    #[test]
    fn multiple_clauses_parse_in_order() {
        let q = parse("green +plant", &fields()).unwrap();
        assert_eq!(q.clauses.len(), 2);
        assert_eq!(q.clauses[0].term, "green");
        assert_eq!(q.clauses[1].term, "plant");
    }

    #[test]
    fn trailing_presence_marker_with_no_term_is_an_error() {
        let err = parse("green +", &fields()).unwrap_err();
        assert!(matches!(err, Error::QueryParse { .. }));
    }
}

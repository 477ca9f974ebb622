// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! A single-pass lexer over the compact query syntax, emitting typed
//! lexemes with byte-offset spans into the source string.
//!
//! `query := clause (SEP clause)*`, `clause := [+|-] [field ':'] term
//! [~digits] [^digits]`, where `*` may appear anywhere in a term and `\`
//! escapes `:`, `~`, `^`, `\`, and whitespace.

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexemeKind {
    Term,
    Field,
    EditDistance,
    Boost,
    Presence,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lexeme {
    pub kind: LexemeKind,
    pub text: String,
    pub start: usize,
    pub end: usize,
}

fn parse_error(message: impl Into<String>, start: usize, end: usize) -> Error {
    Error::QueryParse {
        message: message.into(),
        start,
        end,
    }
}

pub fn lex(input: &str) -> Result<Vec<Lexeme>> {
    let chars: Vec<(usize, char)> = input.char_indices().collect();
    let n = chars.len();
    let mut lexemes = Vec::new();
    let mut i = 0usize;
    let mut buf = String::new();
    let mut run_start: Option<usize> = None;

    macro_rules! flush_term {
        ($end:expr) => {
            if !buf.is_empty() {
                lexemes.push(Lexeme {
                    kind: LexemeKind::Term,
                    text: std::mem::take(&mut buf),
                    start: run_start.unwrap(),
                    end: $end,
                });
                run_start = None;
            }
        };
    }

    while i < n {
        let (byte_pos, c) = chars[i];
        match c {
            '\\' => {
                if run_start.is_none() {
                    run_start = Some(byte_pos);
                }
                if i + 1 < n {
                    buf.push(chars[i + 1].1);
                    i += 2;
                } else {
                    i += 1;
                }
            }
            ':' => {
                if buf.is_empty() {
                    return Err(parse_error(
                        "missing field name before ':'",
                        byte_pos,
                        byte_pos + 1,
                    ));
                }
                lexemes.push(Lexeme {
                    kind: LexemeKind::Field,
                    text: std::mem::take(&mut buf),
                    start: run_start.unwrap(),
                    end: byte_pos,
                });
                run_start = None;
                i += 1;
            }
            '~' | '^' => {
                flush_term!(byte_pos);
                let marker_start = byte_pos;
                i += 1;
                let digits_start = chars.get(i).map_or(input.len(), |&(p, _)| p);
                let mut digits = String::new();
                while i < n && chars[i].1.is_ascii_digit() {
                    digits.push(chars[i].1);
                    i += 1;
                }
                let digits_end = chars.get(i).map_or(input.len(), |&(p, _)| p);
                if digits.is_empty() {
                    return Err(parse_error(
                        format!("missing digits after '{c}'"),
                        marker_start,
                        digits_end,
                    ));
                }
                lexemes.push(Lexeme {
                    kind: if c == '~' {
                        LexemeKind::EditDistance
                    } else {
                        LexemeKind::Boost
                    },
                    text: digits,
                    start: digits_start,
                    end: digits_end,
                });
            }
            '+' | '-' if buf.is_empty() && run_start.is_none() => {
                lexemes.push(Lexeme {
                    kind: LexemeKind::Presence,
                    text: c.to_string(),
                    start: byte_pos,
                    end: byte_pos + c.len_utf8(),
                });
                i += 1;
            }
            c if c.is_whitespace() => {
                flush_term!(byte_pos);
                i += 1;
            }
            _ => {
                if run_start.is_none() {
                    run_start = Some(byte_pos);
                }
                buf.push(c);
                i += 1;
            }
        }
    }
    flush_term!(input.len());

    Ok(lexemes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(lexemes: &[Lexeme]) -> Vec<LexemeKind> {
        lexemes.iter().map(|l| l.kind).collect()
    }

    #[test]
    fn lexes_a_bare_term() {
        let lexemes = lex("green").unwrap();
        assert_eq!(kinds(&lexemes), vec![LexemeKind::Term]);
        assert_eq!(lexemes[0].text, "green");
        assert_eq!((lexemes[0].start, lexemes[0].end), (0, 5));
    }

    #[test]
    fn lexes_field_and_term() {
        let lexemes = lex("title:plant").unwrap();
        assert_eq!(kinds(&lexemes), vec![LexemeKind::Field, LexemeKind::Term]);
        assert_eq!(lexemes[0].text, "title");
        assert_eq!(lexemes[1].text, "plant");
    }

    #[test]
    fn lexes_edit_distance_and_boost() {
        let lexemes = lex("plint~2^3").unwrap();
        assert_eq!(
            kinds(&lexemes),
            vec![LexemeKind::Term, LexemeKind::EditDistance, LexemeKind::Boost]
        );
        assert_eq!(lexemes[1].text, "2");
        assert_eq!(lexemes[2].text, "3");
    }

    #[test]
    fn lexes_leading_presence() {
        let lexemes = lex("+plant -green").unwrap();
        assert_eq!(
            kinds(&lexemes),
            vec![
                LexemeKind::Presence,
                LexemeKind::Term,
                LexemeKind::Presence,
                LexemeKind::Term
            ]
        );
        assert_eq!(lexemes[0].text, "+");
        assert_eq!(lexemes[2].text, "-");
    }

    #[test]
    fn hyphen_mid_term_is_literal() {
        let lexemes = lex("well-known").unwrap();
        assert_eq!(kinds(&lexemes), vec![LexemeKind::Term]);
        assert_eq!(lexemes[0].text, "well-known");
    }

    #[test]
    fn backslash_escapes_special_characters() {
        let lexemes = lex(r"a\:b\ c").unwrap();
        assert_eq!(kinds(&lexemes), vec![LexemeKind::Term]);
        assert_eq!(lexemes[0].text, "a:b c");
    }

    #[test]
    fn missing_digits_after_tilde_is_an_error() {
        let err = lex("plant~").unwrap_err();
        assert!(matches!(err, Error::QueryParse { .. }));
    }

    #[test]
    fn missing_field_name_before_colon_is_an_error() {
        let err = lex(":plant").unwrap_err();
        assert!(matches!(err, Error::QueryParse { .. }));
    }

    #[test]
    fn wildcard_star_is_part_of_term_text() {
        let lexemes = lex("pl*nt").unwrap();
        assert_eq!(lexemes[0].text, "pl*nt");
    }
}

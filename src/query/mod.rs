// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The query subsystem: lexer, recursive-descent parser, structured model,
//! and executor.

pub mod executor;
pub mod lexer;
pub mod model;
pub mod parser;

pub use model::{wildcard, Clause, Presence, Query};

// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Token processing pipelines.
//!
//! A pipeline is an ordered list of labelled functions, each of which maps
//! one input token to zero, one, or many output tokens. The label registry
//! lets a serialised pipeline (just a list of strings) be rehydrated against
//! a caller-supplied set of functions on load, rather than requiring the
//! functions themselves to be serialisable.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::error::{Error, Result};

/// A single token flowing through a pipeline: its text plus arbitrary,
/// array-valued metadata carried alongside it (e.g. position information
/// attached by the tokenizer).
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub text: String,
    pub metadata: HashMap<String, JsonValue>,
}

impl Token {
    pub fn new(text: impl Into<String>) -> Self {
        Token {
            text: text.into(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(text: impl Into<String>, metadata: HashMap<String, JsonValue>) -> Self {
        Token {
            text: text.into(),
            metadata,
        }
    }

    /// A copy of this token with its text replaced; metadata carries over.
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Token {
            text: text.into(),
            metadata: self.metadata.clone(),
        }
    }
}

/// What a pipeline function does with one input token.
pub enum Outcome {
    Keep(Token),
    Expand(Vec<Token>),
    Drop,
}

pub type PipelineFn = Arc<dyn Fn(&Token, usize, &[Token]) -> Outcome + Send + Sync>;

/// Maps pipeline function labels to implementations, so a serialised
/// pipeline (a list of labels) can be resolved back into callable functions
/// on load.
#[derive(Clone, Default)]
pub struct Registry {
    functions: HashMap<String, PipelineFn>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("labels", &self.functions.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-populated with the three default pipeline stages:
    /// `trimmer`, `stopWordFilter`, and `stemmer`.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("trimmer", Arc::new(crate::lang::trimmer));
        registry.register("stopWordFilter", Arc::new(crate::lang::stop_word_filter));
        registry.register("stemmer", Arc::new(crate::lang::stemmer));
        registry
    }

    /// Registers `f` under `label`, returning the previously registered
    /// label if one is overwritten (callers may want to warn on that).
    pub fn register(&mut self, label: impl Into<String>, f: PipelineFn) -> Option<String> {
        let label = label.into();
        let overwrote = self.functions.contains_key(&label).then(|| label.clone());
        self.functions.insert(label, f);
        overwrote
    }

    pub fn get(&self, label: &str) -> Option<PipelineFn> {
        self.functions.get(label).cloned()
    }
}

/// An ordered sequence of labelled functions applied to every token in turn.
#[derive(Clone, Default)]
pub struct Pipeline {
    stages: Vec<(String, PipelineFn)>,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline").field("labels", &self.labels()).finish()
    }
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, label: impl Into<String>, f: PipelineFn) {
        self.stages.push((label.into(), f));
    }

    pub fn labels(&self) -> Vec<String> {
        self.stages.iter().map(|(l, _)| l.clone()).collect()
    }

    /// Rebuilds a pipeline from a list of labels, resolving each one through
    /// `registry`. Used when loading a serialised index.
    pub fn from_labels(labels: &[String], registry: &Registry) -> Result<Self> {
        let mut pipeline = Pipeline::new();
        for label in labels {
            let f = registry
                .get(label)
                .ok_or_else(|| Error::UnknownPipelineLabel {
                    label: label.clone(),
                })?;
            pipeline.add(label.clone(), f);
        }
        Ok(pipeline)
    }

    /// Runs every stage over `tokens` in order, threading each stage's
    /// output into the next.
    pub fn run(&self, tokens: Vec<Token>) -> Vec<Token> {
        let mut current = tokens;
        for (_, f) in &self.stages {
            let mut next = Vec::with_capacity(current.len());
            for (i, token) in current.iter().enumerate() {
                match f(token, i, &current) {
                    Outcome::Keep(t) => next.push(t),
                    Outcome::Expand(ts) => next.extend(ts),
                    Outcome::Drop => {}
                }
            }
            current = next;
        }
        current
    }
}

// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The builder: accumulates documents field by field, then computes BM25
//! field vectors and the corpus token set in one [`Builder::build`] pass.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::error::{Error, Result};
use crate::field::FieldRef;
use crate::index::{Index, Posting};
use crate::pipeline::{Pipeline, Token};
use crate::token_set::TokenSet;
use crate::tokenizer::tokenize;
use crate::vector::SparseVector;

/// An external document: an opaque mapping from field name to arbitrary
/// JSON-like value, with one field designated the reference.
#[derive(Debug, Clone, Default)]
pub struct Document(serde_json::Map<String, JsonValue>);

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<JsonValue>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&JsonValue> {
        self.0.get(field)
    }
}

impl<K: Into<String>, V: Into<JsonValue>, const N: usize> From<[(K, V); N]> for Document {
    fn from(pairs: [(K, V); N]) -> Self {
        let mut doc = Document::new();
        for (k, v) in pairs {
            doc.insert(k, v);
        }
        doc
    }
}

type Extractor = Arc<dyn Fn(&Document) -> Option<JsonValue> + Send + Sync>;

#[derive(Clone)]
struct FieldDefinition {
    name: String,
    boost: f64,
    extractor: Option<Extractor>,
}

fn default_extract(document: &Document, field: &str) -> Option<JsonValue> {
    document.get(field).cloned()
}

fn value_to_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub struct Builder {
    ref_field: String,
    field_defs: Vec<FieldDefinition>,
    b: f64,
    k1: f64,
    index_pipeline: Pipeline,
    search_pipeline: Pipeline,
    metadata_whitelist: Vec<String>,

    document_count: u32,
    doc_boosts: HashMap<String, f64>,
    field_term_freqs: HashMap<FieldRef, HashMap<String, u32>>,
    field_lengths: HashMap<FieldRef, u32>,
    inverted_index: HashMap<String, Posting>,
    doc_frequency: HashMap<String, u32>,
    seen_term_fieldref: HashSet<(String, FieldRef)>,
    next_term_index: u32,
}

/// The index pipeline lunr-style builders wire up by default: strip
/// punctuation, drop stop words, then stem. The search pipeline only stems,
/// since a query term is already a single whole word.
fn default_index_pipeline() -> Pipeline {
    let mut pipeline = Pipeline::new();
    pipeline.add("trimmer", Arc::new(crate::lang::trimmer));
    pipeline.add("stopWordFilter", Arc::new(crate::lang::stop_word_filter));
    pipeline.add("stemmer", Arc::new(crate::lang::stemmer));
    pipeline
}

fn default_search_pipeline() -> Pipeline {
    let mut pipeline = Pipeline::new();
    pipeline.add("stemmer", Arc::new(crate::lang::stemmer));
    pipeline
}

impl Default for Builder {
    fn default() -> Self {
        Builder {
            ref_field: "id".to_string(),
            field_defs: Vec::new(),
            b: 0.75,
            k1: 1.2,
            index_pipeline: default_index_pipeline(),
            search_pipeline: default_search_pipeline(),
            metadata_whitelist: Vec::new(),
            document_count: 0,
            doc_boosts: HashMap::new(),
            field_term_freqs: HashMap::new(),
            field_lengths: HashMap::new(),
            inverted_index: HashMap::new(),
            doc_frequency: HashMap::new(),
            seen_term_fieldref: HashSet::new(),
            next_term_index: 0,
        }
    }
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the reference field name. Fails if documents have already been
    /// added under a different reference field name.
    pub fn ref_field(&mut self, name: impl Into<String>) -> Result<&mut Self> {
        let name = name.into();
        if self.document_count > 0 && name != self.ref_field {
            return Err(Error::ReferenceFieldChanged {
                previous: self.ref_field.clone(),
                attempted: name,
            });
        }
        self.ref_field = name;
        Ok(self)
    }

    pub fn b(&mut self, value: f64) -> &mut Self {
        self.b = value.clamp(0.0, 1.0);
        self
    }

    pub fn k1(&mut self, value: f64) -> &mut Self {
        self.k1 = value;
        self
    }

    /// Registers a field, optionally with a boost and a custom extractor
    /// (defaults to direct attribute access on the document).
    pub fn field(&mut self, name: impl Into<String>, boost: Option<f64>) -> Result<&mut Self> {
        self.field_with_extractor(name, boost, None)
    }

    pub fn field_with_extractor(
        &mut self,
        name: impl Into<String>,
        boost: Option<f64>,
        extractor: Option<Extractor>,
    ) -> Result<&mut Self> {
        let name = name.into();
        if name.contains('/') {
            return Err(Error::FieldNameContainsSlash { field: name });
        }
        self.field_defs.push(FieldDefinition {
            name,
            boost: boost.unwrap_or(1.0),
            extractor,
        });
        Ok(self)
    }

    pub fn index_pipeline(&mut self) -> &mut Pipeline {
        &mut self.index_pipeline
    }

    pub fn search_pipeline(&mut self) -> &mut Pipeline {
        &mut self.search_pipeline
    }

    pub fn metadata_whitelist(&mut self, keys: Vec<String>) -> &mut Self {
        self.metadata_whitelist = keys;
        self
    }

    /// Installs a plugin function: any closure that configures the builder,
    /// mirroring the `builder.use(plugin, ...args)` convention.
    pub fn use_fn(&mut self, plugin: impl FnOnce(&mut Builder)) -> &mut Self {
        plugin(self);
        self
    }

    pub fn add(&mut self, document: &Document, boost: f64) -> Result<()> {
        let ref_value = document
            .get(&self.ref_field)
            .map(value_to_text)
            .unwrap_or_default();
        self.doc_boosts.insert(ref_value.clone(), boost);

        for field_def in self.field_defs.clone() {
            let value = match &field_def.extractor {
                Some(extractor) => extractor(document),
                None => default_extract(document, &field_def.name),
            };
            let Some(value) = value else { continue };

            let field_ref = FieldRef::new(field_def.name.clone(), ref_value.clone())?;
            self.field_lengths.entry(field_ref.clone()).or_insert(0);

            let text = value_to_text(&value);
            let mut tokens = tokenize(&text, &field_def.name);
            tokens = self.index_pipeline.run(tokens);
            self.ingest_tokens(&field_ref, &field_def, tokens);
        }

        self.document_count += 1;
        Ok(())
    }

    fn ingest_tokens(&mut self, field_ref: &FieldRef, field_def: &FieldDefinition, tokens: Vec<Token>) {
        for token in tokens {
            let term = token.text;
            *self
                .field_term_freqs
                .entry(field_ref.clone())
                .or_default()
                .entry(term.clone())
                .or_insert(0) += 1;
            *self.field_lengths.get_mut(field_ref).unwrap() += 1;

            let is_new_term = !self.inverted_index.contains_key(&term);
            let next_index = self.next_term_index;
            let posting = self.inverted_index.entry(term.clone()).or_insert_with(|| Posting {
                term_index: next_index,
                fields: HashMap::new(),
            });
            if is_new_term {
                self.next_term_index += 1;
            }

            let entry_key = (term.clone(), field_ref.clone());
            if self.seen_term_fieldref.insert(entry_key) {
                *self.doc_frequency.entry(term.clone()).or_insert(0) += 1;
            }

            let doc_meta = posting
                .fields
                .entry(field_def.name.clone())
                .or_default()
                .entry(field_ref.document_ref.clone())
                .or_default();
            for key in &self.metadata_whitelist {
                if let Some(value) = token.metadata.get(key) {
                    doc_meta.entry(key.clone()).or_default().push(value.clone());
                }
            }
        }
    }

    pub fn build(mut self) -> Result<Index> {
        // average field length per field name
        let mut field_length_sum: HashMap<String, (u64, u64)> = HashMap::new();
        for (field_ref, len) in &self.field_lengths {
            let entry = field_length_sum.entry(field_ref.field_name.clone()).or_insert((0, 0));
            entry.0 += u64::from(*len);
            entry.1 += 1;
        }
        let avg_field_length: HashMap<String, f64> = field_length_sum
            .into_iter()
            .map(|(field, (sum, count))| (field, if count == 0 { 0.0 } else { sum as f64 / count as f64 }))
            .collect();

        let n = f64::from(self.document_count);
        let mut idf_cache: HashMap<String, f64> = HashMap::new();
        for (term, df) in &self.doc_frequency {
            let df = f64::from(*df);
            let idf = ((n - df + 0.5) / (df + 0.5)).abs().ln_1p();
            idf_cache.insert(term.clone(), idf);
        }

        let field_boosts: HashMap<String, f64> = self
            .field_defs
            .iter()
            .map(|fd| (fd.name.clone(), fd.boost))
            .collect();

        let entries: Vec<(FieldRef, HashMap<String, u32>)> =
            self.field_term_freqs.drain().collect();

        let build_vector = |field_ref: &FieldRef, tf_map: &HashMap<String, u32>| -> SparseVector {
            let field_len = *self.field_lengths.get(field_ref).unwrap_or(&0) as f64;
            let avg_len = *avg_field_length.get(&field_ref.field_name).unwrap_or(&0.0);
            let field_boost = *field_boosts.get(&field_ref.field_name).unwrap_or(&1.0);
            let doc_boost = *self.doc_boosts.get(&field_ref.document_ref).unwrap_or(&1.0);

            let mut vector = SparseVector::new();
            for (term, tf) in tf_map {
                let Some(posting) = self.inverted_index.get(term) else {
                    continue;
                };
                let idf = *idf_cache.get(term).unwrap_or(&0.0);
                let tf = f64::from(*tf);
                let denom = self.k1 * (1.0 - self.b + self.b * (field_len / avg_len.max(1e-9))) + tf;
                let score = idf * ((self.k1 + 1.0) * tf) / denom * field_boost * doc_boost;
                let rounded = (score * 1000.0).round() / 1000.0;
                vector.upsert(posting.term_index, rounded, |_, new| new);
            }
            vector
        };

        #[cfg(feature = "parallel")]
        let field_vectors: HashMap<FieldRef, SparseVector> = {
            use rayon::prelude::*;
            use std::sync::atomic::{AtomicUsize, Ordering};

            let progress = indicatif::ProgressBar::new(entries.len() as u64);
            progress.set_style(
                indicatif::ProgressStyle::with_template(
                    "{spinner:.cyan} indexing [{bar:40.cyan/dim}] {pos}/{len}",
                )
                .unwrap()
                .progress_chars("━━╸"),
            );
            let done = AtomicUsize::new(0);

            let vectors: HashMap<FieldRef, SparseVector> = entries
                .par_iter()
                .map(|(fr, tf_map)| {
                    let vector = (fr.clone(), build_vector(fr, tf_map));
                    let count = done.fetch_add(1, Ordering::Relaxed) + 1;
                    progress.set_position(count as u64);
                    vector
                })
                .collect();
            progress.finish_and_clear();
            vectors
        };
        #[cfg(not(feature = "parallel"))]
        let field_vectors: HashMap<FieldRef, SparseVector> = entries
            .iter()
            .map(|(fr, tf_map)| (fr.clone(), build_vector(fr, tf_map)))
            .collect();

        let mut sorted_terms: Vec<String> = self.inverted_index.keys().cloned().collect();
        sorted_terms.sort();
        let token_set = TokenSet::from_sorted_vocabulary(&sorted_terms)?;

        let fields: Vec<String> = self.field_defs.iter().map(|fd| fd.name.clone()).collect();

        Ok(Index {
            fields,
            inverted_index: self.inverted_index,
            field_vectors,
            token_set,
            search_pipeline: self.search_pipeline,
        })
    }
}

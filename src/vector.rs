// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Sparse vectors over the corpus's token-index space.
//!
//! Stored as an ascending `(index, value)` pair list with a lazily computed,
//! cached magnitude. Coordinates are corpus token indices (see `builder`),
//! values are BM25-weighted term contributions.

use std::cell::Cell;

use serde::de::{self, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default)]
pub struct SparseVector {
    entries: Vec<(u32, f64)>,
    magnitude: Cell<Option<f64>>,
}

impl SparseVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.entries.iter().copied()
    }

    fn position_for(&self, index: u32) -> std::result::Result<usize, usize> {
        self.entries.binary_search_by_key(&index, |&(i, _)| i)
    }

    pub fn get(&self, index: u32) -> Option<f64> {
        self.position_for(index).ok().map(|pos| self.entries[pos].1)
    }

    /// Inserts a new coordinate. Fails if `index` is already present; use
    /// [`SparseVector::upsert`] when overwrite-or-merge semantics are wanted.
    pub fn insert(&mut self, index: u32, value: f64) -> Result<()> {
        match self.position_for(index) {
            Ok(_) => Err(Error::DuplicateVectorIndex { index }),
            Err(pos) => {
                self.entries.insert(pos, (index, value));
                self.magnitude.set(None);
                Ok(())
            }
        }
    }

    /// Inserts a new coordinate, or merges with an existing one via `merge`.
    pub fn upsert(&mut self, index: u32, value: f64, merge: impl FnOnce(f64, f64) -> f64) {
        match self.position_for(index) {
            Ok(pos) => self.entries[pos].1 = merge(self.entries[pos].1, value),
            Err(pos) => self.entries.insert(pos, (index, value)),
        }
        self.magnitude.set(None);
    }

    pub fn magnitude(&self) -> f64 {
        if let Some(m) = self.magnitude.get() {
            return m;
        }
        let m = self.entries.iter().map(|&(_, v)| v * v).sum::<f64>().sqrt();
        self.magnitude.set(Some(m));
        m
    }

    /// Dot product with `other`. Both entry lists are sorted by index, so
    /// this is a single linear merge-walk.
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (ai, av) = self.entries[i];
            let (bi, bv) = other.entries[j];
            match ai.cmp(&bi) {
                std::cmp::Ordering::Equal => {
                    sum += av * bv;
                    i += 1;
                    j += 1;
                }
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
            }
        }
        sum
    }

    /// Cosine similarity with `other`. Zero when either vector has zero
    /// magnitude, rather than producing NaN.
    pub fn similarity(&self, other: &SparseVector) -> f64 {
        let denom = self.magnitude() * other.magnitude();
        if denom == 0.0 {
            0.0
        } else {
            self.dot(other) / denom
        }
    }
}

impl PartialEq for SparseVector {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl FromIterator<(u32, f64)> for SparseVector {
    fn from_iter<T: IntoIterator<Item = (u32, f64)>>(iter: T) -> Self {
        let mut entries: Vec<(u32, f64)> = iter.into_iter().collect();
        entries.sort_by_key(|&(i, _)| i);
        entries.dedup_by_key(|&mut (i, _)| i);
        Self {
            entries,
            magnitude: Cell::new(None),
        }
    }
}

/// Serialised as a flat sequence alternating index, value, index, value, ...
/// matching the wire format used for `fieldVectors` entries.
impl Serialize for SparseVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.entries.len() * 2))?;
        for &(index, value) in &self.entries {
            seq.serialize_element(&(index as f64))?;
            seq.serialize_element(&value)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for SparseVector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct FlatVisitor;

        impl<'de> Visitor<'de> for FlatVisitor {
            type Value = SparseVector;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a flat sequence alternating index and value")
            }

            fn visit_seq<A: SeqAccess<'de>>(
                self,
                mut seq: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut entries = Vec::new();
                loop {
                    let index: Option<NumberOrString> = seq.next_element()?;
                    let Some(index) = index else { break };
                    let value: NumberOrString = seq
                        .next_element()?
                        .ok_or_else(|| de::Error::custom("odd-length sparse vector sequence"))?;
                    entries.push((index.as_u32()?, value.as_f64()?));
                }
                Ok(SparseVector {
                    entries,
                    magnitude: Cell::new(None),
                })
            }
        }

        deserializer.deserialize_seq(FlatVisitor)
    }
}

/// Accepts either a JSON number or a numeric string for each coordinate, so
/// legacy producers that stringify numbers still load cleanly.
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

impl NumberOrString {
    fn as_f64<E: de::Error>(&self) -> std::result::Result<f64, E> {
        match self {
            NumberOrString::Number(n) => Ok(*n),
            NumberOrString::Text(s) => s
                .parse()
                .map_err(|_| de::Error::custom(format!("not a number: {s:?}"))),
        }
    }

    fn as_u32<E: de::Error>(&self) -> std::result::Result<u32, E> {
        Ok(self.as_f64::<E>()?.round() as u32)
    }
}

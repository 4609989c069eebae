//! Term-frequency / inverse-document-frequency weighting model.
//!
//! The model is fit once over the full item corpus and then shared
//! read-only by every transform call. Weighting follows the classic
//! smoothed-idf, sublinear-tf recipe: `idf(t) = ln((1 + N) / (1 + df(t)))
//! + 1`, `tf = 1 + ln(count)`, and each document vector is scaled to unit
//! Euclidean norm so inner products are cosine similarities.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{LfError, Result};
use crate::text::tokenize::{tokenize, NgramRange};

/// Terms must appear in at least this many documents by default.
pub const DEFAULT_MIN_DOC_FREQ: u32 = 2;

/// Fit-time options for the weighting model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TfidfOptions {
    pub ngrams: NgramRange,
    pub min_doc_freq: u32,
}

impl Default for TfidfOptions {
    fn default() -> Self {
        Self {
            ngrams: NgramRange::default(),
            min_doc_freq: DEFAULT_MIN_DOC_FREQ,
        }
    }
}

/// Sparse weight vector over the vocabulary, column indices ascending.
///
/// Only non-zero weights are stored, so memory tracks the number of
/// distinct vocabulary terms in a document, not the vocabulary size.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    indices: Vec<u32>,
    values: Vec<f32>,
}

impl SparseVector {
    /// Build from (column, weight) pairs. Columns must be distinct; pairs
    /// are sorted and zero weights dropped.
    #[must_use]
    pub fn from_pairs(mut pairs: Vec<(u32, f32)>) -> Self {
        pairs.retain(|&(_, weight)| weight != 0.0);
        pairs.sort_unstable_by_key(|&(column, _)| column);
        Self {
            indices: pairs.iter().map(|&(column, _)| column).collect(),
            values: pairs.iter().map(|&(_, weight)| weight).collect(),
        }
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.indices.is_empty()
    }

    /// Number of non-zero entries.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    #[must_use]
    pub fn l2_norm(&self) -> f32 {
        self.values
            .iter()
            .map(|&weight| f64::from(weight) * f64::from(weight))
            .sum::<f64>()
            .sqrt() as f32
    }

    /// Scale to unit length. The zero vector is left unchanged.
    pub fn normalize(&mut self) {
        let norm = self.l2_norm();
        if norm > 0.0 {
            for weight in &mut self.values {
                *weight /= norm;
            }
        }
    }

    /// Sorted-merge inner product. Either side being zero yields 0.
    #[must_use]
    pub fn dot(&self, other: &Self) -> f32 {
        let mut sum = 0.0_f64;
        let (mut left, mut right) = (0, 0);
        while left < self.indices.len() && right < other.indices.len() {
            match self.indices[left].cmp(&other.indices[right]) {
                Ordering::Less => left += 1,
                Ordering::Greater => right += 1,
                Ordering::Equal => {
                    sum += f64::from(self.values[left]) * f64::from(other.values[right]);
                    left += 1;
                    right += 1;
                }
            }
        }
        sum as f32
    }
}

/// Immutable weighting model: vocabulary, per-column idf, fit options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfModel {
    vocabulary: HashMap<String, u32>,
    idf: Vec<f32>,
    options: TfidfOptions,
}

impl TfidfModel {
    /// Fit a model over `corpus`. Identical corpus and options always
    /// produce an identical model: vocabulary columns are assigned in
    /// lexicographic term order.
    pub fn fit(corpus: &[&str], options: TfidfOptions) -> Result<Self> {
        Self::fit_inner(corpus, options).map(|(model, _)| model)
    }

    /// Fit and also transform every corpus document, reusing the tokens
    /// from the fitting pass.
    pub fn fit_transform(
        corpus: &[&str],
        options: TfidfOptions,
    ) -> Result<(Self, Vec<SparseVector>)> {
        let (model, documents) = Self::fit_inner(corpus, options)?;
        let matrix = documents
            .iter()
            .map(|tokens| model.transform_tokens(tokens))
            .collect();
        Ok((model, matrix))
    }

    fn fit_inner(
        corpus: &[&str],
        options: TfidfOptions,
    ) -> Result<(Self, Vec<Vec<String>>)> {
        let documents: Vec<Vec<String>> = corpus
            .iter()
            .map(|text| tokenize(text, options.ngrams))
            .collect();

        let mut doc_freq: HashMap<&str, u32> = HashMap::new();
        for tokens in &documents {
            let unique: HashSet<&str> = tokens.iter().map(String::as_str).collect();
            for term in unique {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        let mut terms: Vec<&str> = doc_freq
            .iter()
            .filter(|&(_, &df)| df >= options.min_doc_freq)
            .map(|(&term, _)| term)
            .collect();
        terms.sort_unstable();

        if terms.is_empty() {
            return Err(LfError::EmptyVocabulary {
                min_doc_freq: options.min_doc_freq,
            });
        }

        let corpus_size = corpus.len() as f64;
        let mut vocabulary = HashMap::with_capacity(terms.len());
        let mut idf = Vec::with_capacity(terms.len());
        for (column, term) in terms.iter().enumerate() {
            let df = f64::from(doc_freq[*term]);
            idf.push((((1.0 + corpus_size) / (1.0 + df)).ln() + 1.0) as f32);
            vocabulary.insert((*term).to_string(), column as u32);
        }

        Ok((
            Self {
                vocabulary,
                idf,
                options,
            },
            documents,
        ))
    }

    /// Transform one text into a unit-length sparse vector. Terms outside
    /// the vocabulary contribute nothing; a text with no vocabulary hits
    /// yields the zero vector. Pure function of (model, text).
    #[must_use]
    pub fn transform(&self, text: &str) -> SparseVector {
        self.transform_tokens(&tokenize(text, self.options.ngrams))
    }

    fn transform_tokens(&self, tokens: &[String]) -> SparseVector {
        let mut counts: HashMap<u32, u32> = HashMap::new();
        for token in tokens {
            if let Some(&column) = self.vocabulary.get(token.as_str()) {
                *counts.entry(column).or_insert(0) += 1;
            }
        }

        let mut vector = SparseVector::from_pairs(
            counts
                .into_iter()
                .map(|(column, count)| {
                    let tf = 1.0 + f64::from(count).ln();
                    (column, (tf as f32) * self.idf[column as usize])
                })
                .collect(),
        );
        vector.normalize();
        vector
    }

    #[must_use]
    pub fn vocabulary_size(&self) -> usize {
        self.idf.len()
    }

    #[must_use]
    pub fn column_of(&self, term: &str) -> Option<u32> {
        self.vocabulary.get(term).copied()
    }

    #[must_use]
    pub fn idf_of(&self, term: &str) -> Option<f32> {
        self.column_of(term).map(|column| self.idf[column as usize])
    }

    #[must_use]
    pub const fn options(&self) -> &TfidfOptions {
        &self.options
    }
}

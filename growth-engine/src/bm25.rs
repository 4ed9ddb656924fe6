//! Okapi BM25 scoring over an in-memory tokenized corpus.
//!
//! For a query `q` and document `d`:
//!
//!   score(q, d) = Σ_{t ∈ q} idf(t) · tf(t,d)·(k1+1) / (tf(t,d) + k1·(1 − b + b·|d|/avgdl))
//!
//! with the non-negative inverse document frequency
//!
//!   idf(t) = ln(1 + (N − df(t) + 0.5) / (df(t) + 0.5))
//!
//! Repeated query tokens contribute once per occurrence. Tokens absent from
//! the corpus contribute nothing.

use std::collections::HashMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::policy::{BM25_B, BM25_K1};

/// Free parameters of the BM25 ranking function.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bm25Params {
    /// Term-frequency saturation.
    pub k1: f64,
    /// Document-length normalization, 0 (none) to 1 (full).
    pub b: f64,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self {
            k1: BM25_K1,
            b: BM25_B,
        }
    }
}

/// Term statistics for a fixed corpus. Immutable once built.
#[derive(Clone, Debug)]
pub struct Bm25Corpus {
    params: Bm25Params,
    term_freqs: Vec<HashMap<String, u32>>,
    doc_lens: Vec<f64>,
    avg_doc_len: f64,
    idf: HashMap<String, f64>,
}

impl Bm25Corpus {
    /// Build corpus statistics from tokenized documents, in catalog order.
    pub fn new(documents: &[Vec<String>], params: Bm25Params) -> Self {
        let mut term_freqs = Vec::with_capacity(documents.len());
        let mut doc_lens = Vec::with_capacity(documents.len());
        let mut doc_freq: HashMap<String, u32> = HashMap::new();
        let mut total_len = 0usize;

        for tokens in documents {
            let mut freqs: HashMap<String, u32> = HashMap::new();
            for token in tokens {
                *freqs.entry(token.clone()).or_insert(0) += 1;
            }
            for term in freqs.keys() {
                *doc_freq.entry(term.clone()).or_insert(0) += 1;
            }
            total_len += tokens.len();
            doc_lens.push(tokens.len() as f64);
            term_freqs.push(freqs);
        }

        let n = documents.len() as f64;
        let avg_doc_len = if documents.is_empty() {
            0.0
        } else {
            total_len as f64 / n
        };

        let idf: HashMap<String, f64> = doc_freq
            .into_iter()
            .map(|(term, df)| {
                let df = df as f64;
                (term, (1.0 + (n - df + 0.5) / (df + 0.5)).ln())
            })
            .collect();

        log::debug!(
            "documents={} vocabulary={} avg_doc_len={:.2} bm25 corpus built",
            documents.len(),
            idf.len(),
            avg_doc_len
        );

        Self {
            params,
            term_freqs,
            doc_lens,
            avg_doc_len,
            idf,
        }
    }

    /// Number of documents in the corpus.
    pub fn len(&self) -> usize {
        self.term_freqs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.term_freqs.is_empty()
    }

    /// Average document length in tokens. Zero for an empty corpus.
    pub fn avg_doc_len(&self) -> f64 {
        self.avg_doc_len
    }

    /// Inverse document frequency of a term, `0.0` if the corpus never uses it.
    pub fn idf(&self, term: &str) -> f64 {
        self.idf.get(term).copied().unwrap_or(0.0)
    }

    /// Score one document against the query tokens.
    pub fn score(&self, query: &[String], doc: usize) -> f64 {
        let Some(freqs) = self.term_freqs.get(doc) else {
            return 0.0;
        };
        let Bm25Params { k1, b } = self.params;
        // An all-empty corpus has avgdl 0; every tf is 0 there anyway.
        let length_ratio = if self.avg_doc_len > 0.0 {
            self.doc_lens[doc] / self.avg_doc_len
        } else {
            0.0
        };
        let norm = k1 * (1.0 - b + b * length_ratio);

        query
            .iter()
            .map(|term| {
                let tf = freqs.get(term).copied().unwrap_or(0) as f64;
                if tf == 0.0 {
                    return 0.0;
                }
                self.idf(term) * tf * (k1 + 1.0) / (tf + norm)
            })
            .sum()
    }

    /// Score every document, in corpus order.
    ///
    /// Documents are scored in parallel; collection preserves order so the
    /// output is identical to a sequential pass.
    pub fn scores(&self, query: &[String]) -> Vec<f64> {
        (0..self.len())
            .into_par_iter()
            .map(|doc| self.score(query, doc))
            .collect()
    }
}

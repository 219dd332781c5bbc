//! TF-IDF vectorizer with document-frequency pruning.
//!
//! idf(t) = ln((1 + n) / (1 + df(t))) + 1, tf = raw count in the document,
//! rows L2-normalized. Vocabulary terms are kept in lexicographic order and
//! the term index is the position in that order.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::tokenizer::analyze;
use crate::ml::MlError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TfidfParams {
    /// Keep only the N terms with the highest document frequency.
    pub max_features: Option<usize>,
    pub ngram_range: (usize, usize),
    /// Absolute minimum document count.
    pub min_df: usize,
    /// Maximum document proportion.
    pub max_df: f64,
}

impl Default for TfidfParams {
    fn default() -> Self {
        Self {
            max_features: Some(500),
            ngram_range: (1, 2),
            min_df: 2,
            max_df: 0.95,
        }
    }
}

/// Sparse row: `(term index, weight)` pairs sorted by index, zero weights omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn weight(&self, index: usize) -> f64 {
        self.entries
            .binary_search_by_key(&index, |(i, _)| *i)
            .map_or(0.0, |pos| self.entries[pos].1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }

    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut a, mut b) = (self.entries.iter().peekable(), other.entries.iter().peekable());
        let mut sum = 0.0;
        while let (Some(&&(i, wi)), Some(&&(j, wj))) = (a.peek(), b.peek()) {
            match i.cmp(&j) {
                std::cmp::Ordering::Less => {
                    a.next();
                }
                std::cmp::Ordering::Greater => {
                    b.next();
                }
                std::cmp::Ordering::Equal => {
                    sum += wi * wj;
                    a.next();
                    b.next();
                }
            }
        }
        sum
    }
}

/// Cosine similarity clipped to `[0, 1]`; 0 when either vector is empty.
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f64 {
    let denom = a.norm() * b.norm();
    if denom == 0.0 {
        return 0.0;
    }
    (a.dot(b) / denom).clamp(0.0, 1.0)
}

/// Similarity as a percentage rounded to two decimals.
pub fn match_percentage(similarity: f64) -> f64 {
    (similarity * 100.0 * 100.0).round() / 100.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    params: TfidfParams,
    terms: Vec<String>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    pub fn fit<S: AsRef<str>>(corpus: &[S], params: TfidfParams) -> Result<Self, MlError> {
        if corpus.is_empty() {
            return Err(MlError::EmptyDataset("tf-idf vectorizer"));
        }
        let (min_n, max_n) = params.ngram_range;
        let n_docs = corpus.len();

        let mut df: BTreeMap<String, usize> = BTreeMap::new();
        for doc in corpus {
            let distinct: HashSet<String> = analyze(doc.as_ref(), min_n, max_n).into_iter().collect();
            for term in distinct {
                *df.entry(term).or_default() += 1;
            }
        }
        let seen = df.len();

        let max_doc_count = params.max_df * n_docs as f64;
        let mut kept: Vec<(String, usize)> = df
            .into_iter()
            .filter(|(_, count)| *count >= params.min_df && (*count as f64) <= max_doc_count)
            .collect();

        if let Some(limit) = params.max_features {
            if kept.len() > limit {
                kept.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
                kept.truncate(limit);
                kept.sort_by(|a, b| a.0.cmp(&b.0));
            }
        }

        if kept.is_empty() {
            return Err(MlError::EmptyVocabulary { documents: n_docs });
        }

        let n = n_docs as f64;
        let idf = kept
            .iter()
            .map(|(_, count)| ((1.0 + n) / (1.0 + *count as f64)).ln() + 1.0)
            .collect();
        let terms: Vec<String> = kept.into_iter().map(|(t, _)| t).collect();

        debug!(documents = n_docs, candidate_terms = seen, vocabulary = terms.len(), "tf-idf fitted");
        Ok(Self { params, terms, idf })
    }

    /// Weighted, L2-normalized term vector. Out-of-vocabulary terms are dropped.
    pub fn transform(&self, text: &str) -> SparseVector {
        let (min_n, max_n) = self.params.ngram_range;
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for term in analyze(text, min_n, max_n) {
            if let Ok(idx) = self.terms.binary_search(&term) {
                *counts.entry(idx).or_default() += 1.0;
            }
        }

        let mut entries: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(idx, tf)| (idx, tf * self.idf[idx]))
            .collect();
        let norm = entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            entries.iter_mut().for_each(|(_, w)| *w /= norm);
        }
        SparseVector { entries }
    }

    pub fn similarity(&self, a: &str, b: &str) -> f64 {
        cosine_similarity(&self.transform(a), &self.transform(b))
    }

    /// Highest-weighted job terms the résumé lacks.
    ///
    /// Job terms are ranked by descending weight (index ascending on ties),
    /// the first `top_k` are considered, and those with a zero résumé weight
    /// are returned in rank order, at most `return_k` of them.
    pub fn missing_keywords(
        &self,
        resume: &SparseVector,
        job: &SparseVector,
        top_k: usize,
        return_k: usize,
    ) -> Vec<String> {
        let mut ranked: Vec<(usize, f64)> = job
            .entries()
            .iter()
            .copied()
            .filter(|(_, w)| *w > 0.0)
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

        ranked
            .into_iter()
            .take(top_k)
            .filter(|(idx, _)| resume.weight(*idx) == 0.0)
            .take(return_k)
            .map(|(idx, _)| self.terms[idx].clone())
            .collect()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    pub fn params(&self) -> &TfidfParams {
        &self.params
    }
}

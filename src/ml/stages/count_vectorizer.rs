// ============================================================
// Layer 5 — Count Vectorizer stage
// ============================================================
// filtered_tokens → raw_features
//
// Fit builds a bounded vocabulary from the training tokens:
//
//   1. Count, per term, how many documents contain it (df) and how
//      often it occurs overall (tf)
//   2. Drop terms with df below `min_df`. A value >= 1.0 is an
//      absolute document count, a value below 1.0 is a fraction of
//      the document count
//   3. Keep the `vocab_size` terms with the largest tf, ties broken
//      lexically so two fits on one corpus agree
//
// Transform counts, per document, the occurrences of every
// vocabulary term. Out-of-vocabulary tokens are ignored.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::ml::frame::Frame;
use crate::ml::pipeline::{Estimator, FittedStage, Transformer};
use crate::ml::sparse::SparseVector;

#[derive(Debug, Clone)]
pub struct CountVectorizer {
    pub vocab_size: usize,
    pub min_df:     f64,
}

impl CountVectorizer {
    pub fn new(vocab_size: usize, min_df: f64) -> Self {
        Self { vocab_size, min_df }
    }

    fn min_doc_count(&self, num_docs: usize) -> f64 {
        if self.min_df >= 1.0 {
            self.min_df
        } else {
            self.min_df * num_docs as f64
        }
    }
}

impl Estimator for CountVectorizer {
    fn name(&self) -> &'static str {
        "count_vectorizer"
    }

    fn fit(&self, frame: &Frame) -> Result<FittedStage> {
        let mut doc_freq:  HashMap<&str, usize> = HashMap::new();
        let mut term_freq: HashMap<&str, usize> = HashMap::new();

        for row in &frame.rows {
            let tokens = row.require_filtered_tokens()?;
            let mut seen: HashSet<&str> = HashSet::new();
            for t in tokens {
                *term_freq.entry(t.as_str()).or_default() += 1;
                if seen.insert(t.as_str()) {
                    *doc_freq.entry(t.as_str()).or_default() += 1;
                }
            }
        }

        let min_docs = self.min_doc_count(frame.len());
        let mut candidates: Vec<(&str, usize)> = term_freq
            .into_iter()
            .filter(|(term, _)| doc_freq[term] as f64 >= min_docs)
            .collect();
        candidates.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        candidates.truncate(self.vocab_size);

        if candidates.is_empty() {
            bail!(
                "Vocabulary is empty: no term appears in at least {} documents",
                min_docs
            );
        }

        let vocabulary: Vec<String> = candidates.into_iter().map(|(t, _)| t.to_string()).collect();
        tracing::info!(
            "Vocabulary built: {} terms (limit {}, min_df {})",
            vocabulary.len(),
            self.vocab_size,
            self.min_df
        );
        Ok(FittedStage::CountVectorizer(CountVectorizerModel::new(vocabulary)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vocabulary", into = "Vocabulary")]
pub struct CountVectorizerModel {
    vocabulary: Vec<String>,
    index:      HashMap<String, usize>,
}

/// On-disk form: the term list in index order
#[derive(Serialize, Deserialize)]
struct Vocabulary {
    vocabulary: Vec<String>,
}

impl From<Vocabulary> for CountVectorizerModel {
    fn from(v: Vocabulary) -> Self {
        Self::new(v.vocabulary)
    }
}

impl From<CountVectorizerModel> for Vocabulary {
    fn from(m: CountVectorizerModel) -> Self {
        Self { vocabulary: m.vocabulary }
    }
}

impl CountVectorizerModel {
    pub fn new(vocabulary: Vec<String>) -> Self {
        let index = vocabulary
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();
        Self { vocabulary, index }
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn vectorize(&self, tokens: &[String]) -> SparseVector {
        let pairs = tokens
            .iter()
            .filter_map(|t| self.index.get(t).map(|&i| (i, 1.0)))
            .collect();
        SparseVector::from_pairs(self.vocabulary.len(), pairs)
    }
}

impl Transformer for CountVectorizerModel {
    fn transform(&self, frame: &mut Frame) -> Result<()> {
        for row in &mut frame.rows {
            let v = self.vectorize(row.require_filtered_tokens()?);
            row.raw_features = Some(v);
        }
        Ok(())
    }
}

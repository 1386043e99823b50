// ============================================================
// Layer 5 — Label Indexer
// ============================================================
// Maps sentiment strings to dense class indices 0..k and back.
//
//   fit        — count every `target` in the training frame and
//                order the distinct labels by descending frequency,
//                ties broken by ascending lexical order
//   transform  — set `label_indexed` on each row; rows whose label
//                was never seen during fit (or have no label) are
//                dropped, not encoded
//
// The fitted label array is the single source of truth for the
// index space: the classifier trains on it, the evaluator scores
// in it and the label decoder stage reads it back to strings.

use anyhow::{bail, Result};
use std::collections::HashMap;

use crate::ml::frame::Frame;

#[derive(Debug, Clone, Default)]
pub struct StringIndexer;

impl StringIndexer {
    pub fn new() -> Self {
        Self
    }

    pub fn fit(&self, frame: &Frame) -> Result<StringIndexerModel> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for row in &frame.rows {
            if let Some(target) = row.target.as_deref() {
                *counts.entry(target).or_default() += 1;
            }
        }
        if counts.is_empty() {
            bail!("Cannot fit label indexer: no labelled rows");
        }

        let mut by_freq: Vec<(&str, usize)> = counts.into_iter().collect();
        by_freq.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        let labels: Vec<String> = by_freq.iter().map(|(l, _)| l.to_string()).collect();
        tracing::debug!("Label frequencies: {:?}", by_freq);
        Ok(StringIndexerModel::new(labels))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringIndexerModel {
    labels: Vec<String>,
    index:  HashMap<String, usize>,
}

impl StringIndexerModel {
    pub fn new(labels: Vec<String>) -> Self {
        let index = labels
            .iter()
            .enumerate()
            .map(|(i, l)| (l.clone(), i))
            .collect();
        Self { labels, index }
    }

    /// Index → label, in index order
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    /// Encode `target` into `label_indexed`, skipping unseen labels.
    pub fn transform(&self, frame: Frame) -> Frame {
        let before = frame.len();
        let rows: Vec<_> = frame
            .rows
            .into_iter()
            .filter_map(|mut row| {
                let idx = row.target.as_deref().and_then(|t| self.index_of(t))?;
                row.label_indexed = Some(idx);
                Some(row)
            })
            .collect();

        if rows.len() < before {
            tracing::debug!(
                "Label indexer skipped {} rows with unseen labels",
                before - rows.len()
            );
        }
        Frame { rows }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::LabeledText;

    fn frame(labels: &[&str]) -> Frame {
        Frame::from_records(
            labels
                .iter()
                .map(|l| LabeledText {
                    id:           None,
                    entity:       None,
                    target:       l.to_string(),
                    cleaned_text: "x".into(),
                })
                .collect(),
        )
    }

    #[test]
    fn test_orders_by_frequency_then_lexically() {
        let train = frame(&["Neutral", "Positive", "Negative", "Positive", "Neutral", "Positive"]);
        let model = StringIndexer::new().fit(&train).unwrap();
        assert_eq!(model.labels(), &["Positive", "Neutral", "Negative"]);

        let tied = frame(&["b", "a", "c", "b", "a", "c"]);
        let model = StringIndexer::new().fit(&tied).unwrap();
        assert_eq!(model.labels(), &["a", "b", "c"]);
    }

    #[test]
    fn test_fit_is_deterministic() {
        let train = frame(&["Negative", "Neutral", "Positive", "Neutral"]);
        let a = StringIndexer::new().fit(&train).unwrap();
        let b = StringIndexer::new().fit(&train).unwrap();
        assert_eq!(a.labels(), b.labels());
    }

    #[test]
    fn test_unseen_labels_are_skipped() {
        let model = StringIndexer::new().fit(&frame(&["Positive", "Negative"])).unwrap();
        let val   = model.transform(frame(&["Negative", "Mixed", "Positive"]));
        assert_eq!(val.len(), 2);

        let known: Vec<usize> = (0..model.labels().len()).collect();
        assert!(val.rows.iter().all(|r| known.contains(&r.label_indexed.unwrap())));
    }

    #[test]
    fn test_empty_fit_fails() {
        assert!(StringIndexer::new().fit(&Frame::default()).is_err());
    }
}

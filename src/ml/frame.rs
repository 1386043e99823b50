// ============================================================
// Layer 5 — Frame (the table a pipeline works on)
// ============================================================
// A Frame is a Vec of Rows. Each pipeline stage reads one named
// column of every row and fills in the next one:
//
//   cleaned_text ─► tokens ─► filtered_tokens ─► raw_features
//        ─► features ─► raw_prediction / probability / prediction
//        ─► predicted_label
//
// Columns that a stage has not produced yet are None. Asking for
// one through `Row::require_*` yields an error that names the
// missing column, so a mis-ordered pipeline fails loudly.

use anyhow::{anyhow, Result};

use crate::domain::record::LabeledText;
use crate::ml::sparse::SparseVector;

/// Column names, used in logs and error messages
pub mod columns {
    pub const TARGET:          &str = "target";
    pub const CLEANED_TEXT:    &str = "cleaned_text";
    pub const LABEL_INDEXED:   &str = "label_indexed";
    pub const TOKENS:          &str = "tokens";
    pub const FILTERED_TOKENS: &str = "filtered_tokens";
    pub const RAW_FEATURES:    &str = "raw_features";
    pub const FEATURES:        &str = "features";
    pub const RAW_PREDICTION:  &str = "raw_prediction";
    pub const PROBABILITY:     &str = "probability";
    pub const PREDICTION:      &str = "prediction";
    pub const PREDICTED_LABEL: &str = "predicted_label";
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    pub id:              Option<i64>,
    pub entity:          Option<String>,
    pub target:          Option<String>,
    pub cleaned_text:    String,
    pub label_indexed:   Option<usize>,
    pub tokens:          Option<Vec<String>>,
    pub filtered_tokens: Option<Vec<String>>,
    pub raw_features:    Option<SparseVector>,
    pub features:        Option<SparseVector>,
    /// Per-class logits
    pub raw_prediction:  Option<Vec<f32>>,
    /// Per-class softmax probabilities
    pub probability:     Option<Vec<f32>>,
    pub prediction:      Option<usize>,
    pub predicted_label: Option<String>,
}

impl Row {
    pub fn require_tokens(&self) -> Result<&[String]> {
        self.tokens.as_deref().ok_or_else(|| missing(columns::TOKENS))
    }

    pub fn require_filtered_tokens(&self) -> Result<&[String]> {
        self.filtered_tokens.as_deref().ok_or_else(|| missing(columns::FILTERED_TOKENS))
    }

    pub fn require_raw_features(&self) -> Result<&SparseVector> {
        self.raw_features.as_ref().ok_or_else(|| missing(columns::RAW_FEATURES))
    }

    pub fn require_features(&self) -> Result<&SparseVector> {
        self.features.as_ref().ok_or_else(|| missing(columns::FEATURES))
    }

    pub fn require_label(&self) -> Result<usize> {
        self.label_indexed.ok_or_else(|| missing(columns::LABEL_INDEXED))
    }

    pub fn require_prediction(&self) -> Result<usize> {
        self.prediction.ok_or_else(|| missing(columns::PREDICTION))
    }
}

fn missing(column: &str) -> anyhow::Error {
    anyhow!("Column '{column}' has not been produced by an earlier stage")
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub rows: Vec<Row>,
}

impl Frame {
    /// A frame of labelled rows, one per harmonised record
    pub fn from_records(records: Vec<LabeledText>) -> Self {
        let rows = records
            .into_iter()
            .map(|r| Row {
                id:           r.id,
                entity:       r.entity,
                target:       Some(r.target),
                cleaned_text: r.cleaned_text,
                ..Row::default()
            })
            .collect();
        Self { rows }
    }

    /// An unlabelled frame, used for inference on free text
    pub fn from_texts(texts: impl IntoIterator<Item = String>) -> Self {
        let rows = texts
            .into_iter()
            .map(|cleaned_text| Row { cleaned_text, ..Row::default() })
            .collect();
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

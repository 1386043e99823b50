// ============================================================
// Layer 5 — Label Decoder stage
// ============================================================
// prediction → predicted_label
//
// Reads the class index the classifier produced and writes the
// matching label string. The label array comes from the fitted
// label indexer, so decoding uses the same index space the model
// was trained and evaluated in.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::ml::frame::Frame;
use crate::ml::pipeline::{Estimator, FittedStage, Transformer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexToString {
    labels: Vec<String>,
}

impl IndexToString {
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn decode(&self, index: usize) -> Result<&str> {
        self.labels
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| anyhow!("Prediction {} has no label ({} known)", index, self.labels.len()))
    }
}

impl Transformer for IndexToString {
    fn transform(&self, frame: &mut Frame) -> Result<()> {
        for row in &mut frame.rows {
            let label = self.decode(row.require_prediction()?)?.to_string();
            row.predicted_label = Some(label);
        }
        Ok(())
    }
}

impl Estimator for IndexToString {
    fn name(&self) -> &'static str {
        "index_to_string"
    }

    fn fit(&self, _frame: &Frame) -> Result<FittedStage> {
        Ok(FittedStage::IndexToString(self.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_predictions() {
        let stage = IndexToString::new(vec!["Negative".into(), "Positive".into()]);
        let mut frame = Frame::from_texts(vec![String::new(), String::new()]);
        frame.rows[0].prediction = Some(1);
        frame.rows[1].prediction = Some(0);
        stage.transform(&mut frame).unwrap();
        assert_eq!(frame.rows[0].predicted_label.as_deref(), Some("Positive"));
        assert_eq!(frame.rows[1].predicted_label.as_deref(), Some("Negative"));
    }

    #[test]
    fn test_unknown_index_fails() {
        let stage = IndexToString::new(vec!["Only".into()]);
        assert!(stage.decode(3).is_err());
    }
}

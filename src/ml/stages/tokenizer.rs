// ============================================================
// Layer 5 — Tokenizer stage
// ============================================================
// cleaned_text → tokens
//
// Lowercases and splits on whitespace. Empty pieces are dropped,
// so a text that the normalizer emptied out yields zero tokens
// instead of one empty token.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::ml::frame::Frame;
use crate::ml::pipeline::{Estimator, FittedStage, Transformer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tokenizer {
    pub lowercase: bool,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self { lowercase: true }
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.split_whitespace()
            .map(|t| if self.lowercase { t.to_lowercase() } else { t.to_string() })
            .collect()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Transformer for Tokenizer {
    fn transform(&self, frame: &mut Frame) -> Result<()> {
        for row in &mut frame.rows {
            row.tokens = Some(self.tokenize(&row.cleaned_text));
        }
        Ok(())
    }
}

impl Estimator for Tokenizer {
    fn name(&self) -> &'static str {
        "tokenizer"
    }

    fn fit(&self, _frame: &Frame) -> Result<FittedStage> {
        Ok(FittedStage::Tokenizer(self.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_and_lowercases() {
        assert_eq!(Tokenizer::new().tokenize("Check NOW "), vec!["check", "now"]);
    }

    #[test]
    fn test_blank_text_has_no_tokens() {
        assert!(Tokenizer::new().tokenize(" ").is_empty());
        assert!(Tokenizer::new().tokenize("").is_empty());
    }
}

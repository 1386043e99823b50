// ============================================================
// Layer 2 — PredictUseCase
// ============================================================
// Loads a persisted pipeline and labels free text with it.
//
//   Step 1: Load the model directory       (Layer 6 - infra)
//   Step 2: Clean each text the same way   (Layer 4 - data)
//           training text was cleaned
//   Step 3: Run every fitted stage         (Layer 5 - ml)
//
// No training happens here and the model is never modified.

use anyhow::{Context, Result};
use std::path::Path;

use crate::data::normalizer::TextNormalizer;
use crate::domain::traits::SentimentClassifier;
use crate::infra::model_store::ModelStore;
use crate::ml::frame::Frame;
use crate::ml::pipeline::{PipelineModel, Transformer};

/// One labelled input
#[derive(Debug, Clone)]
pub struct Prediction {
    pub text:          String,
    pub label:         String,
    /// (label, probability) in label-index order
    pub probabilities: Vec<(String, f32)>,
}

pub struct PredictUseCase {
    model:      PipelineModel,
    normalizer: TextNormalizer,
}

impl PredictUseCase {
    pub fn new(model_dir: impl AsRef<Path>) -> Result<Self> {
        let model = ModelStore::new(model_dir.as_ref()).load()?;
        Ok(Self::from_model(model))
    }

    pub fn from_model(model: PipelineModel) -> Self {
        Self { model, normalizer: TextNormalizer::new() }
    }

    pub fn predict(&self, texts: &[String]) -> Result<Vec<Prediction>> {
        let labels = self
            .model
            .labels()
            .context("Model has no label decoder stage")?;

        let mut frame = Frame::from_texts(texts.iter().map(|t| self.normalizer.clean(t)));
        self.model.transform(&mut frame)?;

        texts
            .iter()
            .zip(frame.rows)
            .map(|(text, row)| {
                let label = row
                    .predicted_label
                    .context("Model produced no predicted_label")?;
                let probabilities = labels
                    .iter()
                    .cloned()
                    .zip(row.probability.unwrap_or_default())
                    .collect();
                Ok(Prediction { text: text.clone(), label, probabilities })
            })
            .collect()
    }
}

impl SentimentClassifier for PredictUseCase {
    fn classify(&self, texts: &[String]) -> Result<Vec<String>> {
        Ok(self.predict(texts)?.into_iter().map(|p| p.label).collect())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::TrainConfig;
    use crate::ml::pipeline::FittedStage;
    use crate::ml::stages::{
        count_vectorizer::CountVectorizerModel, idf::IdfModel,
        index_to_string::IndexToString, logistic_regression::LogisticRegressionModel,
        stop_words::StopWordsRemover, tokenizer::Tokenizer,
    };

    fn model() -> PipelineModel {
        PipelineModel::new(vec![
            FittedStage::Tokenizer(Tokenizer::new()),
            FittedStage::StopWordsRemover(StopWordsRemover::english()),
            FittedStage::CountVectorizer(CountVectorizerModel::new(vec!["love".into(), "hate".into()])),
            FittedStage::Idf(IdfModel { doc_freq: vec![1, 1], num_docs: 2, idf: vec![1.0, 1.0] }),
            FittedStage::LogisticRegression(LogisticRegressionModel {
                num_features: 2,
                num_classes:  2,
                coefficients: vec![vec![2.0, -2.0], vec![-2.0, 2.0]],
                intercepts:   vec![0.0, 0.0],
                objective_history: Vec::new(),
            }),
            FittedStage::IndexToString(IndexToString::new(vec!["Positive".into(), "Negative".into()])),
        ])
    }

    #[test]
    fn test_predict_cleans_and_labels() {
        let uc  = PredictUseCase::from_model(model());
        let out = uc
            .predict(&["I LOVE it!! http://t.co @x".to_string(), "hate.".to_string()])
            .unwrap();

        assert_eq!(out[0].label, "Positive");
        assert_eq!(out[1].label, "Negative");
        assert_eq!(out[0].probabilities.len(), 2);
        let total: f32 = out[0].probabilities.iter().map(|(_, p)| p).sum();
        assert!((total - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_classify_from_saved_model() {
        let dir = tempfile::tempdir().unwrap();
        ModelStore::new(dir.path().join("m"))
            .save(&model(), &TrainConfig::default())
            .unwrap();

        let uc = PredictUseCase::new(dir.path().join("m")).unwrap();
        assert_eq!(
            uc.classify(&["love love".to_string(), "".to_string()]).unwrap(),
            vec!["Positive", "Positive"] // empty text: equal logits, first class wins
        );
    }
}

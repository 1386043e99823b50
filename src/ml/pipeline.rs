// ============================================================
// Layer 5 — Pipeline
// ============================================================
// A pipeline is an ordered list of stages. Fitting it walks the
// list once:
//
//   frame ─► stage[0].fit ─► transform ─► stage[1].fit ─► transform ─► ...
//
// so every stage is fitted on exactly what the previous fitted
// stages produce from the training frame. The result is a
// PipelineModel: the same list, with every stage in its fitted
// form, which can then transform any other frame (validation,
// inference) without refitting anything.
//
// Two traits describe a stage:
//   Estimator   — something that learns from a frame (vocabulary,
//                 IDF weights, classifier coefficients). Stateless
//                 stages like the tokenizer are their own fit.
//   Transformer — something that rewrites a frame in place.
//
// Fitted stages are a closed enum so the whole model can be
// written to disk with serde and read back by `predict`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::ml::frame::Frame;
use crate::ml::stages::{
    count_vectorizer::CountVectorizerModel,
    idf::IdfModel,
    index_to_string::IndexToString,
    logistic_regression::LogisticRegressionModel,
    stop_words::StopWordsRemover,
    tokenizer::Tokenizer,
};

// ─── Traits ───────────────────────────────────────────────────────────────────

pub trait Transformer {
    /// Fill this stage's output column on every row.
    fn transform(&self, frame: &mut Frame) -> Result<()>;
}

pub trait Estimator {
    /// Short stage name used in logs and artifact file names
    fn name(&self) -> &'static str;

    /// Learn this stage's parameters from the frame.
    fn fit(&self, frame: &Frame) -> Result<FittedStage>;
}

// ─── FittedStage ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum FittedStage {
    Tokenizer(Tokenizer),
    StopWordsRemover(StopWordsRemover),
    CountVectorizer(CountVectorizerModel),
    Idf(IdfModel),
    LogisticRegression(LogisticRegressionModel),
    IndexToString(IndexToString),
}

impl FittedStage {
    pub fn name(&self) -> &'static str {
        match self {
            FittedStage::Tokenizer(_)          => "tokenizer",
            FittedStage::StopWordsRemover(_)   => "stop_words_remover",
            FittedStage::CountVectorizer(_)    => "count_vectorizer",
            FittedStage::Idf(_)                => "idf",
            FittedStage::LogisticRegression(_) => "logistic_regression",
            FittedStage::IndexToString(_)      => "index_to_string",
        }
    }
}

impl Transformer for FittedStage {
    fn transform(&self, frame: &mut Frame) -> Result<()> {
        match self {
            FittedStage::Tokenizer(s)          => s.transform(frame),
            FittedStage::StopWordsRemover(s)   => s.transform(frame),
            FittedStage::CountVectorizer(s)    => s.transform(frame),
            FittedStage::Idf(s)                => s.transform(frame),
            FittedStage::LogisticRegression(s) => s.transform(frame),
            FittedStage::IndexToString(s)      => s.transform(frame),
        }
    }
}

// ─── Pipeline ─────────────────────────────────────────────────────────────────

pub struct Pipeline {
    stages: Vec<Box<dyn Estimator>>,
}

impl Pipeline {
    pub fn new(stages: Vec<Box<dyn Estimator>>) -> Self {
        Self { stages }
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Fit every stage in order against the training frame.
    /// The frame is consumed: it ends up holding every derived column.
    pub fn fit(&self, mut frame: Frame) -> Result<PipelineModel> {
        let mut fitted = Vec::with_capacity(self.stages.len());

        for (i, stage) in self.stages.iter().enumerate() {
            tracing::info!("Fitting stage {}/{}: {}", i + 1, self.stages.len(), stage.name());
            let model = stage
                .fit(&frame)
                .with_context(|| format!("Fitting stage '{}' failed", stage.name()))?;

            // The last stage's output is never read during fitting
            if i + 1 < self.stages.len() {
                model.transform(&mut frame)?;
            }
            fitted.push(model);
        }

        Ok(PipelineModel::new(fitted))
    }
}

// ─── PipelineModel ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineModel {
    stages: Vec<FittedStage>,
}

impl PipelineModel {
    pub fn new(stages: Vec<FittedStage>) -> Self {
        Self { stages }
    }

    pub fn stages(&self) -> &[FittedStage] {
        &self.stages
    }

    /// Class names in index order, taken from the label decoder stage
    pub fn labels(&self) -> Option<&[String]> {
        self.stages.iter().find_map(|s| match s {
            FittedStage::IndexToString(s) => Some(s.labels()),
            _ => None,
        })
    }
}

impl Transformer for PipelineModel {
    fn transform(&self, frame: &mut Frame) -> Result<()> {
        for stage in &self.stages {
            stage
                .transform(frame)
                .with_context(|| format!("Stage '{}' failed", stage.name()))?;
        }
        Ok(())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::stages::stop_words::StopWordsRemover;
    use crate::ml::stages::tokenizer::Tokenizer;

    #[test]
    fn test_fit_applies_stages_in_order() {
        let pipeline = Pipeline::new(vec![
            Box::new(Tokenizer::new()),
            Box::new(StopWordsRemover::english()),
        ]);
        assert_eq!(pipeline.stage_names(), vec!["tokenizer", "stop_words_remover"]);

        let model = pipeline
            .fit(Frame::from_texts(vec!["the game is great".to_string()]))
            .unwrap();

        let mut frame = Frame::from_texts(vec!["this is fun".to_string()]);
        model.transform(&mut frame).unwrap();
        assert_eq!(frame.rows[0].filtered_tokens.as_deref(), Some(&["fun".to_string()][..]));
    }

    #[test]
    fn test_stage_out_of_order_fails() {
        let model = PipelineModel::new(vec![FittedStage::StopWordsRemover(
            StopWordsRemover::english(),
        )]);
        let mut frame = Frame::from_texts(vec!["x".to_string()]);
        let err = format!("{:#}", model.transform(&mut frame).unwrap_err());
        assert!(err.contains("tokens"), "{err}");
    }

    #[test]
    fn test_fitted_stage_json_is_tagged() {
        let json = serde_json::to_string(&FittedStage::Tokenizer(Tokenizer::new())).unwrap();
        assert!(json.contains("\"stage\":\"tokenizer\""), "{json}");
        let back: FittedStage = serde_json::from_str(&json).unwrap();
        assert_eq!(back.name(), "tokenizer");
    }
}

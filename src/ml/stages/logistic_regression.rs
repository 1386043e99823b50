// ============================================================
// Layer 5 — Logistic Regression stage
// ============================================================
// features, label_indexed → raw_prediction, probability, prediction
//
// Fit hands the TF-IDF rows to the Burn training loop and keeps
// only the resulting coefficient matrix and intercepts. Scoring a
// fitted model is a sparse dot product per class followed by a
// softmax, so inference never touches a tensor backend.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::ml::frame::Frame;
use crate::ml::pipeline::{Estimator, FittedStage, Transformer};
use crate::ml::sparse::SparseVector;
use crate::ml::trainer::{
    inverse_std_scale, train_softmax_regression, ComputeDevice, TrainerConfig,
};

#[derive(Debug, Clone)]
pub struct LogisticRegression {
    pub trainer:         TrainerConfig,
    pub num_classes:     usize,
    pub standardization: bool,
    pub device:          ComputeDevice,
}

impl LogisticRegression {
    pub fn new(trainer: TrainerConfig, num_classes: usize, device: ComputeDevice) -> Self {
        Self { trainer, num_classes, standardization: true, device }
    }
}

impl Estimator for LogisticRegression {
    fn name(&self) -> &'static str {
        "logistic_regression"
    }

    fn fit(&self, frame: &Frame) -> Result<FittedStage> {
        let mut rows   = Vec::with_capacity(frame.len());
        let mut labels = Vec::with_capacity(frame.len());
        for row in &frame.rows {
            let label = row.require_label()?;
            if label >= self.num_classes {
                bail!("Label index {} out of range for {} classes", label, self.num_classes);
            }
            rows.push(row.require_features()?);
            labels.push(label);
        }
        let Some(first) = rows.first() else {
            bail!("Cannot fit logistic regression on an empty frame");
        };
        let num_features = first.size;

        let scale = if self.standardization {
            inverse_std_scale(&rows, num_features)
        } else {
            vec![1.0; num_features]
        };

        let trained = train_softmax_regression(
            &rows,
            &labels,
            self.num_classes,
            &scale,
            &self.trainer,
            &self.device,
        )?;

        Ok(FittedStage::LogisticRegression(LogisticRegressionModel {
            num_features,
            num_classes:       self.num_classes,
            coefficients:      trained.coefficients,
            intercepts:        trained.intercepts,
            objective_history: trained.objective_history,
        }))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegressionModel {
    pub num_features: usize,
    pub num_classes:  usize,
    /// [num_classes][num_features]
    pub coefficients: Vec<Vec<f32>>,
    pub intercepts:   Vec<f32>,
    /// Training-time loss curve; not persisted
    #[serde(skip)]
    pub objective_history: Vec<f64>,
}

impl LogisticRegressionModel {
    /// Per-class logits
    pub fn predict_raw(&self, x: &SparseVector) -> Vec<f32> {
        self.coefficients
            .iter()
            .zip(&self.intercepts)
            .map(|(w, b)| b + x.dot(w))
            .collect()
    }

    pub fn objective_history(&self) -> &[f64] {
        &self.objective_history
    }
}

/// Numerically stable softmax
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|l| (l - max).exp()).collect();
    let total: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

/// Index of the largest value; the first one wins a tie
pub fn argmax(values: &[f32]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = i;
        }
    }
    best
}

impl Transformer for LogisticRegressionModel {
    fn transform(&self, frame: &mut Frame) -> Result<()> {
        for row in &mut frame.rows {
            let x = row.require_features()?;
            if x.size != self.num_features {
                bail!(
                    "Feature size {} does not match model size {}",
                    x.size,
                    self.num_features
                );
            }
            let raw  = self.predict_raw(x);
            let prob = softmax(&raw);
            row.prediction     = Some(argmax(&prob));
            row.raw_prediction = Some(raw);
            row.probability    = Some(prob);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> LogisticRegressionModel {
        LogisticRegressionModel {
            num_features: 2,
            num_classes:  2,
            coefficients: vec![vec![2.0, -1.0], vec![-2.0, 1.0]],
            intercepts:   vec![0.0, 0.5],
            objective_history: Vec::new(),
        }
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let p = softmax(&[1.0, 2.0, 3.0]);
        assert!((p.iter().sum::<f32>() - 1.0).abs() < 1e-6);
        assert!(p[2] > p[1] && p[1] > p[0]);
    }

    #[test]
    fn test_argmax_first_wins_ties() {
        assert_eq!(argmax(&[0.5, 0.5]), 0);
        assert_eq!(argmax(&[0.1, 0.7, 0.2]), 1);
    }

    #[test]
    fn test_transform_scores_rows() {
        let mut frame = Frame::from_texts(vec![String::new(), String::new()]);
        frame.rows[0].features = Some(SparseVector::from_pairs(2, vec![(0, 1.0)]));
        frame.rows[1].features = Some(SparseVector::from_pairs(2, vec![(1, 1.0)]));

        model().transform(&mut frame).unwrap();
        assert_eq!(frame.rows[0].prediction, Some(0));
        assert_eq!(frame.rows[1].prediction, Some(1));
        assert_eq!(frame.rows[0].raw_prediction.as_deref(), Some(&[2.0, -1.5][..]));
    }

    #[test]
    fn test_size_mismatch_fails() {
        let mut frame = Frame::from_texts(vec![String::new()]);
        frame.rows[0].features = Some(SparseVector::empty(3));
        assert!(model().transform(&mut frame).is_err());
    }

    #[test]
    fn test_history_is_not_persisted() {
        let mut m = model();
        m.objective_history = vec![0.7, 0.3];
        let back: LogisticRegressionModel =
            serde_json::from_str(&serde_json::to_string(&m).unwrap()).unwrap();
        assert!(back.objective_history().is_empty());
        assert_eq!(back.coefficients, m.coefficients);
    }
}

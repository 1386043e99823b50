// ============================================================
// Layer 5 — Multiclass Evaluator
// ============================================================
// Scores predictions against true labels, both as class indices
// from the same label indexer.
//
// Everything is derived from one confusion matrix
//
//     matrix[true][predicted] = count
//
// Metrics:
//   accuracy           correct / total
//   weightedPrecision  Σ_c (n_c / total) · precision(c)
//   weightedRecall     Σ_c (n_c / total) · recall(c)
//   f1                 Σ_c (n_c / total) · F1(c)
//
// n_c is the number of rows whose TRUE label is c, so a class that
// is only ever predicted, never observed, carries zero weight.
// precision, recall or F1 with a zero denominator count as 0.
//
// Reference: Rust Book §8 (Collections)

use anyhow::{bail, Result};
use serde::Serialize;

use crate::ml::frame::Frame;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricName {
    Accuracy,
    F1,
    WeightedPrecision,
    WeightedRecall,
}

pub struct MulticlassEvaluator {
    metric: MetricName,
}

impl MulticlassEvaluator {
    pub fn new(metric: MetricName) -> Self {
        Self { metric }
    }

    pub fn with_metric(mut self, metric: MetricName) -> Self {
        self.metric = metric;
        self
    }

    pub fn evaluate(&self, frame: &Frame) -> Result<f64> {
        let report = ClassificationReport::from_frame(frame)?;
        Ok(match self.metric {
            MetricName::Accuracy          => report.accuracy,
            MetricName::F1                => report.weighted_f1,
            MetricName::WeightedPrecision => report.weighted_precision,
            MetricName::WeightedRecall    => report.weighted_recall,
        })
    }
}

/// Precision / recall / F1 for one class
#[derive(Debug, Clone, Serialize)]
pub struct ClassStats {
    pub class:     usize,
    pub support:   usize,
    pub precision: f64,
    pub recall:    f64,
    pub f1:        f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassificationReport {
    pub total:              usize,
    pub accuracy:           f64,
    pub weighted_precision: f64,
    pub weighted_recall:    f64,
    pub weighted_f1:        f64,
    pub per_class:          Vec<ClassStats>,
    pub confusion:          Vec<Vec<usize>>,
}

impl ClassificationReport {
    pub fn from_frame(frame: &Frame) -> Result<Self> {
        let mut pairs = Vec::with_capacity(frame.len());
        for row in &frame.rows {
            pairs.push((row.require_label()?, row.require_prediction()?));
        }
        Self::from_pairs(&pairs)
    }

    /// Build from (true, predicted) index pairs
    pub fn from_pairs(pairs: &[(usize, usize)]) -> Result<Self> {
        if pairs.is_empty() {
            bail!("Cannot evaluate an empty set of predictions");
        }
        let k = pairs
            .iter()
            .map(|&(t, p)| t.max(p))
            .max()
            .unwrap_or(0)
            + 1;

        let mut confusion = vec![vec![0usize; k]; k];
        for &(t, p) in pairs {
            confusion[t][p] += 1;
        }

        let total   = pairs.len();
        let correct: usize = (0..k).map(|c| confusion[c][c]).sum();

        let mut per_class = Vec::with_capacity(k);
        let (mut w_precision, mut w_recall, mut w_f1) = (0.0, 0.0, 0.0);
        for c in 0..k {
            let tp        = confusion[c][c] as f64;
            let support   = confusion[c].iter().sum::<usize>();
            let predicted = (0..k).map(|t| confusion[t][c]).sum::<usize>();

            let precision = ratio(tp, predicted as f64);
            let recall    = ratio(tp, support as f64);
            let f1        = ratio(2.0 * precision * recall, precision + recall);

            let weight = support as f64 / total as f64;
            w_precision += weight * precision;
            w_recall    += weight * recall;
            w_f1        += weight * f1;

            per_class.push(ClassStats { class: c, support, precision, recall, f1 });
        }

        Ok(Self {
            total,
            accuracy: correct as f64 / total as f64,
            weighted_precision: w_precision,
            weighted_recall: w_recall,
            weighted_f1: w_f1,
            per_class,
            confusion,
        })
    }

    /// Log the report at info level, naming classes with `labels`
    pub fn log(&self, labels: &[String]) {
        let name = |c: usize| labels.get(c).map(String::as_str).unwrap_or("?");
        for s in &self.per_class {
            tracing::info!(
                "{:<10} support={:>6} precision={:.4} recall={:.4} f1={:.4}",
                name(s.class),
                s.support,
                s.precision,
                s.recall,
                s.f1
            );
        }
        for (t, row) in self.confusion.iter().enumerate() {
            tracing::info!("confusion {:<10} {:?}", name(t), row);
        }
        tracing::info!(
            "weighted precision={:.4} recall={:.4}",
            self.weighted_precision,
            self.weighted_recall
        );
    }
}

fn ratio(num: f64, den: f64) -> f64 {
    if den > 0.0 { num / den } else { 0.0 }
}

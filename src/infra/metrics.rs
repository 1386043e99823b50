// ============================================================
// Layer 6 — Training Metrics Logger
// ============================================================
// Records the classifier's loss curve to a CSV file, one row per
// optimisation iteration.
//
// Output file (default: <base>/models/training_metrics.csv):
//   iteration,loss
//   1,1.052311
//   2,0.874102
//   ...
//
// The file is rewritten on every run; it always describes the
// model currently sitting in the model directory.
//
// How to read it:
//   - Loss should fall quickly and then flatten out
//   - A curve still dropping steeply at the last row means
//     max_iter is too small for this data
//
// Reference: csv crate documentation

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

/// One row of the loss CSV
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationMetrics {
    /// Iteration number (starts at 1)
    pub iteration: usize,

    /// Mean cross-entropy + L2 loss over the iteration's batches
    pub loss: f64,
}

impl IterationMetrics {
    pub fn new(iteration: usize, loss: f64) -> Self {
        Self { iteration, loss }
    }

    /// Returns true if this iteration improved over the previous best loss
    pub fn is_improvement(&self, best_loss: f64) -> bool {
        self.loss < best_loss
    }
}

pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create the logger, making the parent directory if needed.
    pub fn new(csv_path: impl Into<PathBuf>) -> Result<Self> {
        let csv_path = csv_path.into();
        if let Some(dir) = csv_path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Cannot create '{}'", dir.display()))?;
        }
        Ok(Self { csv_path })
    }

    /// Write the full loss history, replacing any previous file.
    pub fn log_history(&self, history: &[f64]) -> Result<()> {
        let mut writer = csv::Writer::from_path(&self.csv_path)
            .with_context(|| format!("Cannot write '{}'", self.csv_path.display()))?;

        let mut best = f64::INFINITY;
        for (i, &loss) in history.iter().enumerate() {
            let m = IterationMetrics::new(i + 1, loss);
            if !m.is_improvement(best) {
                tracing::debug!("Iteration {} did not improve on loss {:.6}", m.iteration, best);
            }
            best = best.min(loss);
            writer.serialize(&m)?;
        }
        writer.flush()?;

        tracing::debug!(
            "Logged {} iterations to '{}'",
            history.len(),
            self.csv_path.display()
        );
        Ok(())
    }

    /// Return the path to the metrics CSV file
    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}

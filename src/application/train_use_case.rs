// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Runs the whole training job, in order:
//
//   Step 1: Start the session             (Layer 6 - infra)
//   Step 2: Load + harmonise + clean      (Layer 4 - data)
//           training and validation files
//   Step 3: Fit the label indexer on the  (Layer 5 - ml)
//           training split, encode both
//   Step 4: Fit the pipeline              (Layer 5 - ml)
//   Step 5: Transform validation, score   (Layer 5 - ml)
//   Step 6: Write the loss curve          (Layer 6 - infra)
//   Step 7: Save the fitted pipeline      (Layer 6 - infra)
//   Step 8: Stop the session              (Layer 6 - infra)
//
// Any `?` before step 8 drops the session, which releases it.
//
// Reference: Rust Book §13 (Iterators and Closures)
//            Burn Book §5 (Training)

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::data::{harmonizer::harmonize, loader::CsvLoader, normalizer::TextNormalizer};
use crate::domain::traits::RecordSource;
use crate::infra::{metrics::MetricsLogger, model_store::ModelStore, session::Session};
use crate::ml::{
    evaluator::{ClassificationReport, MetricName, MulticlassEvaluator},
    frame::Frame,
    label_indexer::StringIndexer,
    pipeline::{FittedStage, Pipeline, PipelineModel, Transformer},
    stages::{
        count_vectorizer::CountVectorizer, idf::Idf, index_to_string::IndexToString,
        logistic_regression::LogisticRegression, stop_words::StopWordsRemover,
        tokenizer::Tokenizer,
    },
    trainer::{ComputeDevice, TrainerConfig},
};

/// Name the session is registered under
pub const APP_NAME: &str = "SentimentTrainingSparkML";

// ─── Training Configuration ──────────────────────────────────────────────────
// Everything one run needs. Saved next to the model as
// train_config.json so the artifact records what produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub base_dir:        String,
    pub train_file:      String,
    pub validation_file: String,
    pub model_dir:       String,
    pub metrics_csv:     String,
    pub vocab_size:      usize,
    pub min_df:          f64,
    pub max_iter:        usize,
    pub reg_param:       f64,
    pub learning_rate:   f64,
    pub batch_size:      usize,
    pub seed:            u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            base_dir:        "/opt/spark/work-dir/data".to_string(),
            train_file:      "twitter/twitter_training.csv".to_string(),
            validation_file: "twitter/twitter_validation.csv".to_string(),
            model_dir:       "models/spark_sentiment_model".to_string(),
            metrics_csv:     "models/training_metrics.csv".to_string(),
            vocab_size:      5000,
            min_df:          5.0,
            max_iter:        20,
            reg_param:       0.01,
            learning_rate:   0.05,
            batch_size:      256,
            seed:            42,
        }
    }
}

impl TrainConfig {
    /// Relative paths hang off `base_dir`; absolute ones are kept.
    pub fn resolve(&self, path: &str) -> PathBuf {
        resolve_path(&self.base_dir, path)
    }

    fn trainer(&self) -> TrainerConfig {
        TrainerConfig {
            max_iter:      self.max_iter,
            reg_param:     self.reg_param,
            learning_rate: self.learning_rate,
            batch_size:    self.batch_size,
            seed:          self.seed,
        }
    }
}

pub(crate) fn resolve_path(base_dir: &str, path: &str) -> PathBuf {
    let p = Path::new(path);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        Path::new(base_dir).join(p)
    }
}

/// What a finished run reports back to the CLI
#[derive(Debug, Clone)]
pub struct TrainOutcome {
    pub accuracy:  f64,
    pub f1:        f64,
    pub labels:    Vec<String>,
    pub model_dir: PathBuf,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<TrainOutcome> {
        let cfg = &self.config;

        // ── Step 1: Session ───────────────────────────────────────────────────
        let session = Session::start(APP_NAME);

        // ── Step 2: Load both splits ──────────────────────────────────────────
        let normalizer = TextNormalizer::new();

        let train_path      = cfg.resolve(&cfg.train_file);
        let validation_path = cfg.resolve(&cfg.validation_file);
        println!("Loading training data from: {}", train_path.display());
        println!("Loading validation data from: {}", validation_path.display());

        let train      = load_split(&CsvLoader::new(&train_path), &normalizer)?;
        let validation = load_split(&CsvLoader::new(&validation_path), &normalizer)?;

        tracing::info!(
            "Loaded {} training and {} validation records",
            train.len(),
            validation.len()
        );

        // ── Step 3: Label encoding ────────────────────────────────────────────
        // Fitted on training only; validation reuses the same index space
        let indexer    = StringIndexer::new().fit(&train)?;
        let labels     = indexer.labels().to_vec();
        let train      = indexer.transform(train);
        let loaded     = validation.len();
        let validation = indexer.transform(validation);
        if validation.len() < loaded {
            tracing::warn!(
                "Dropped {} validation rows with labels unseen in training",
                loaded - validation.len()
            );
        }
        if validation.is_empty() {
            bail!("No validation rows carry a label seen in training");
        }
        tracing::info!("Labels (index order): {:?}", labels);

        // ── Step 4: Fit the pipeline ──────────────────────────────────────────
        let pipeline = build_pipeline(cfg, labels.clone(), session.device().clone());
        println!("Training model...");
        let model = pipeline.fit(train)?;
        println!("Model training complete.");

        // ── Step 5: Evaluate ──────────────────────────────────────────────────
        let mut predictions = validation;
        model.transform(&mut predictions)?;

        let evaluator = MulticlassEvaluator::new(MetricName::Accuracy);
        let accuracy  = evaluator.evaluate(&predictions)?;
        let f1        = evaluator.with_metric(MetricName::F1).evaluate(&predictions)?;
        println!("Validation Accuracy: {:.4}", accuracy);
        println!("Validation F1 Score: {:.4}", f1);
        ClassificationReport::from_frame(&predictions)?.log(&labels);

        // ── Step 6: Loss curve ────────────────────────────────────────────────
        let metrics = MetricsLogger::new(cfg.resolve(&cfg.metrics_csv))?;
        metrics.log_history(objective_history(&model))?;

        // ── Step 7: Save ──────────────────────────────────────────────────────
        let model_dir = cfg.resolve(&cfg.model_dir);
        println!("Saving model to {}", model_dir.display());
        ModelStore::new(&model_dir)
            .save(&model, cfg)
            .with_context(|| format!("Failed to save model to '{}'", model_dir.display()))?;
        println!("Model saved successfully.");

        // ── Step 8: Release ───────────────────────────────────────────────────
        let summary = session.stop();
        tracing::info!("Job '{}' finished in {:.1?}", summary.app_name, summary.uptime);

        Ok(TrainOutcome { accuracy, f1, labels, model_dir })
    }
}

/// Load one split: read, harmonise, then clean the text column.
fn load_split(source: &dyn RecordSource, normalizer: &TextNormalizer) -> Result<Frame> {
    let mut records = harmonize(source.load_all()?);
    for r in &mut records {
        r.cleaned_text = normalizer.clean(&r.cleaned_text);
    }
    Ok(Frame::from_records(records))
}

fn build_pipeline(cfg: &TrainConfig, labels: Vec<String>, device: ComputeDevice) -> Pipeline {
    let num_classes = labels.len();
    Pipeline::new(vec![
        Box::new(Tokenizer::new()),
        Box::new(StopWordsRemover::english()),
        Box::new(CountVectorizer::new(cfg.vocab_size, cfg.min_df)),
        Box::new(Idf::new(0)),
        Box::new(LogisticRegression::new(cfg.trainer(), num_classes, device)),
        Box::new(IndexToString::new(labels)),
    ])
}

fn objective_history(model: &PipelineModel) -> &[f64] {
    model
        .stages()
        .iter()
        .find_map(|s| match s {
            FittedStage::LogisticRegression(lr) => Some(lr.objective_history()),
            _ => None,
        })
        .unwrap_or(&[])
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const POSITIVE: &[&str] = &["I love this great game!!", "love it, great stuff", "great great love"];
    const NEGATIVE: &[&str] = &["I hate this terrible game", "terrible, hate it", "hate hate terrible"];
    const NEUTRAL:  &[&str] = &["weather report today", "today the weather report", "report on weather"];

    fn write_split(path: &Path, copies: usize) {
        let mut csv = String::new();
        let mut id  = 0;
        for _ in 0..copies {
            for (label, texts) in [("Positive", POSITIVE), ("Negative", NEGATIVE), ("Irrelevant", NEUTRAL)] {
                for text in texts {
                    id += 1;
                    csv.push_str(&format!("{id},Google,{label},\"{text} http://t.co/x @fan\"\n"));
                }
            }
        }
        // a row without text is dropped by the harmoniser
        csv.push_str("999,Google,Positive,\n");
        fs::write(path, csv).unwrap();
    }

    fn config(base: &Path) -> TrainConfig {
        TrainConfig {
            base_dir:        base.display().to_string(),
            train_file:      "train.csv".into(),
            validation_file: "validation.csv".into(),
            model_dir:       "models/model".into(),
            metrics_csv:     "models/metrics.csv".into(),
            vocab_size:      50,
            min_df:          1.0,
            max_iter:        30,
            reg_param:       0.01,
            learning_rate:   0.1,
            batch_size:      8,
            seed:            7,
        }
    }

    #[test]
    fn test_resolve_keeps_absolute_paths() {
        let cfg = TrainConfig::default();
        assert_eq!(
            cfg.resolve("twitter/a.csv"),
            PathBuf::from("/opt/spark/work-dir/data/twitter/a.csv")
        );
        assert_eq!(cfg.resolve("/tmp/a.csv"), PathBuf::from("/tmp/a.csv"));
    }

    #[test]
    fn test_end_to_end_training_run() {
        let dir = tempfile::tempdir().unwrap();
        write_split(&dir.path().join("train.csv"), 4);
        write_split(&dir.path().join("validation.csv"), 1);
        let cfg = config(dir.path());

        let outcome = TrainUseCase::new(cfg.clone()).execute().unwrap();

        assert!((0.0..=1.0).contains(&outcome.accuracy));
        assert!((0.0..=1.0).contains(&outcome.f1));
        assert!(outcome.accuracy > 0.9, "accuracy {}", outcome.accuracy);
        assert!(!outcome.labels.iter().any(|l| l == "Irrelevant"));
        assert_eq!(outcome.labels.len(), 3);

        // model directory and loss curve are both on disk
        let store = ModelStore::new(&outcome.model_dir);
        assert!(store.exists());
        assert_eq!(store.load_config().unwrap().vocab_size, 50);
        let loss_csv = fs::read_to_string(cfg.resolve(&cfg.metrics_csv)).unwrap();
        assert_eq!(loss_csv.lines().count(), cfg.max_iter + 1);

        // a second run replaces the artifact in place
        TrainUseCase::new(cfg).execute().unwrap();
        let entries = fs::read_dir(dir.path().join("models")).unwrap().count();
        assert_eq!(entries, 2); // model + metrics.csv
    }

    #[test]
    fn test_validation_with_only_unseen_labels_fails() {
        let dir = tempfile::tempdir().unwrap();
        write_split(&dir.path().join("train.csv"), 2);
        fs::write(dir.path().join("validation.csv"), "1,Google,Mixed,so so game\n").unwrap();

        let err = TrainUseCase::new(config(dir.path())).execute().unwrap_err();
        assert!(format!("{:#}", err).contains("No validation rows"), "{err:#}");
        assert!(!dir.path().join("models/model").exists());
    }

    #[test]
    fn test_missing_training_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = TrainUseCase::new(config(dir.path())).execute().unwrap_err();
        assert!(format!("{:#}", err).contains("train.csv"), "{err:#}");
    }

    #[test]
    fn test_load_split_cleans_and_folds_labels() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("one.csv");
        fs::write(&path, "1,Google,Irrelevant,Check http://x.co now @user!!\n").unwrap();

        let frame = load_split(&CsvLoader::new(&path), &TextNormalizer::new()).unwrap();
        assert_eq!(frame.rows[0].target.as_deref(), Some("Neutral"));
        assert_eq!(frame.rows[0].cleaned_text, "check now ");
    }
}

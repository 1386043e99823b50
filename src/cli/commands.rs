// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands, `train` and `predict`, and all
// their configurable flags.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for missing args
//   - type conversion (string → usize, f64, etc.)
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};
use crate::application::train_use_case::TrainConfig;

const DEFAULT_BASE_DIR:  &str = "/opt/spark/work-dir/data";
const DEFAULT_MODEL_DIR: &str = "models/spark_sentiment_model";

/// The two top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the sentiment pipeline on the tweet CSV files
    Train(TrainArgs),

    /// Label free text with a previously trained model
    Predict(PredictArgs),
}

/// All arguments for the `train` command.
/// Relative paths are resolved against --base-dir.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Root directory all relative paths hang off
    #[arg(long, default_value = DEFAULT_BASE_DIR)]
    pub base_dir: String,

    /// Headerless CSV: id, entity, sentiment, text
    #[arg(long, default_value = "twitter/twitter_training.csv")]
    pub train_file: String,

    /// Same layout as the training file
    #[arg(long, default_value = "twitter/twitter_validation.csv")]
    pub validation_file: String,

    /// Where the fitted pipeline is written (replaced if present)
    #[arg(long, default_value = DEFAULT_MODEL_DIR)]
    pub model_dir: String,

    /// Per-iteration training loss
    #[arg(long, default_value = "models/training_metrics.csv")]
    pub metrics_csv: String,

    /// Largest vocabulary the count vectorizer keeps
    #[arg(long, default_value_t = 5000)]
    pub vocab_size: usize,

    /// Minimum number of documents a term must appear in.
    /// Values below 1.0 are a fraction of the document count
    #[arg(long, default_value_t = 5.0)]
    pub min_df: f64,

    /// Passes over the training rows
    #[arg(long, default_value_t = 20)]
    pub max_iter: usize,

    /// L2 regularisation strength
    #[arg(long, default_value_t = 0.01)]
    pub reg_param: f64,

    /// Adam step size
    #[arg(long, default_value_t = 0.05)]
    pub learning_rate: f64,

    /// Rows per optimiser step
    #[arg(long, default_value_t = 256)]
    pub batch_size: usize,

    /// Seed for the row shuffle
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            base_dir:        a.base_dir,
            train_file:      a.train_file,
            validation_file: a.validation_file,
            model_dir:       a.model_dir,
            metrics_csv:     a.metrics_csv,
            vocab_size:      a.vocab_size,
            min_df:          a.min_df,
            max_iter:        a.max_iter,
            reg_param:       a.reg_param,
            learning_rate:   a.learning_rate,
            batch_size:      a.batch_size,
            seed:            a.seed,
        }
    }
}

/// All arguments for the `predict` command
#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Text to classify; repeat the flag for several texts
    #[arg(long = "text", required = true)]
    pub texts: Vec<String>,

    /// Directory the model was saved to by `train`
    #[arg(long, default_value = DEFAULT_MODEL_DIR)]
    pub model_dir: String,

    /// Root directory a relative --model-dir hangs off
    #[arg(long, default_value = DEFAULT_BASE_DIR)]
    pub base_dir: String,
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn test_train_defaults_match_config_defaults() {
        let cli = Cli::try_parse_from(["tweet-sentiment-trainer", "train"]).unwrap();
        let Commands::Train(args) = cli.command else { panic!("expected train") };
        let cfg: TrainConfig = args.into();
        let def = TrainConfig::default();

        assert_eq!(cfg.base_dir, def.base_dir);
        assert_eq!(cfg.model_dir, def.model_dir);
        assert_eq!(cfg.vocab_size, def.vocab_size);
        assert_eq!(cfg.min_df, def.min_df);
        assert_eq!(cfg.max_iter, def.max_iter);
        assert_eq!(cfg.reg_param, def.reg_param);
    }

    #[test]
    fn test_predict_takes_repeated_text() {
        let cli = Cli::try_parse_from([
            "tweet-sentiment-trainer", "predict", "--text", "great", "--text", "awful",
        ])
        .unwrap();
        let Commands::Predict(args) = cli.command else { panic!("expected predict") };
        assert_eq!(args.texts, vec!["great", "awful"]);
    }

    #[test]
    fn test_predict_requires_text() {
        assert!(Cli::try_parse_from(["tweet-sentiment-trainer", "predict"]).is_err());
    }
}

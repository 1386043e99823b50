// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application).
//
// Two commands are supported:
//   1. `train`   — fits the pipeline on the tweet CSV files and
//                  saves it
//   2. `predict` — loads a saved pipeline and labels free text
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, PredictArgs, TrainArgs};

use crate::application::train_use_case::resolve_path;

#[derive(Parser, Debug)]
#[command(
    name = "tweet-sentiment-trainer",
    version = "0.1.0",
    about = "Train a TF-IDF + logistic regression sentiment model on labelled tweets."
)]
pub struct Cli {
    /// The subcommand to run (train or predict)
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Dispatch to the matching use case. Routing only.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)   => run_train(args),
            Commands::Predict(args) => run_predict(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Starting training with data under: {}", args.base_dir);
    let outcome = TrainUseCase::new(args.into()).execute()?;
    tracing::info!(
        "Training finished: accuracy={:.4} f1={:.4} model='{}'",
        outcome.accuracy,
        outcome.f1,
        outcome.model_dir.display()
    );
    Ok(())
}

fn run_predict(args: PredictArgs) -> Result<()> {
    use crate::application::predict_use_case::PredictUseCase;

    let model_dir = resolve_path(&args.base_dir, &args.model_dir);
    let use_case  = PredictUseCase::new(&model_dir)?;

    for p in use_case.predict(&args.texts)? {
        let probs: Vec<String> = p
            .probabilities
            .iter()
            .map(|(label, prob)| format!("{label}={prob:.4}"))
            .collect();
        println!("{}\t{}\t[{}]", p.label, p.text, probs.join(", "));
    }
    Ok(())
}

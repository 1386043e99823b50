// ============================================================
// Layer 6 — Model Store
// ============================================================
// Writes a fitted PipelineModel to a directory and reads it back.
//
// Directory layout:
//   spark_sentiment_model/
//     metadata.json            ← format version, stage order, labels
//     train_config.json        ← hyper-parameters of the run
//     stages/
//       0_tokenizer.json
//       1_stop_words_remover.json
//       2_count_vectorizer.json
//       3_idf.json
//       4_logistic_regression.json
//       5_index_to_string.json
//
// Overwrite semantics:
//   1. Everything is written into a fresh staging directory next
//      to the destination
//   2. The old destination (if any) is moved aside
//   3. The staging directory is renamed onto the destination
//   4. The old copy is deleted
//
// A failure in step 1 leaves the destination untouched and the
// staging directory is removed by TempDir's Drop. A failure in
// step 3 moves the old copy back; if even that fails the error
// says where the old copy was left, and later saves refuse to
// run until it is dealt with.
//
// Reference: Rust Book §9 (Error Handling)
//            tempfile crate documentation

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::application::train_use_case::TrainConfig;
use crate::ml::pipeline::{FittedStage, PipelineModel};

const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub format_version: u32,
    pub stages:         Vec<String>,
    pub labels:         Vec<String>,
}

pub struct ModelStore {
    dir: PathBuf,
}

impl ModelStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn exists(&self) -> bool {
        self.dir.join("metadata.json").is_file()
    }

    /// Persist the model, replacing whatever is at the destination.
    pub fn save(&self, model: &PipelineModel, cfg: &TrainConfig) -> Result<()> {
        let parent = self
            .dir
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let name = self
            .dir
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("Invalid model path '{}'", self.dir.display()))?;

        fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create '{}'", parent.display()))?;

        // A backup without a destination is the only copy of the last good model
        let backup = parent.join(format!(".{name}.previous"));
        if backup.exists() && !self.dir.exists() {
            bail!(
                "'{}' exists but '{}' does not; an earlier save was interrupted. \
                 Move the backup back into place or delete it, then retry",
                backup.display(),
                self.dir.display()
            );
        }

        // ── Step 1: write everything into a staging directory ─────────────────
        let staging = tempfile::Builder::new()
            .prefix(&format!(".{name}.staging-"))
            .tempdir_in(parent)
            .with_context(|| format!("Cannot create staging directory in '{}'", parent.display()))?;
        write_artifact(staging.path(), model, cfg)?;

        // ── Step 2: move the previous artifact aside ──────────────────────────
        if backup.exists() {
            remove_path(&backup)?;
        }
        let had_previous = self.dir.exists();
        if had_previous {
            fs::rename(&self.dir, &backup).with_context(|| {
                format!("Cannot move previous model '{}' aside", self.dir.display())
            })?;
        }

        // ── Step 3: swap the new artifact in ──────────────────────────────────
        if let Err(e) = fs::rename(staging.path(), &self.dir) {
            let err = anyhow::Error::new(e)
                .context(format!("Cannot move new model into '{}'", self.dir.display()));
            if had_previous {
                if let Err(restore) = fs::rename(&backup, &self.dir) {
                    return Err(err.context(format!(
                        "Restoring the previous model failed ({restore}); it is kept at '{}'",
                        backup.display()
                    )));
                }
            }
            return Err(err);
        }
        // `staging` now points at a path that no longer exists; its Drop is a no-op
        drop(staging);

        // ── Step 4: drop the old copy ─────────────────────────────────────────
        // The new model is already in place, so a leftover backup is only noise
        if had_previous {
            if let Err(e) = remove_path(&backup) {
                tracing::warn!("Could not remove old model copy: {:#}", e);
            }
        }

        tracing::debug!("Model written to '{}'", self.dir.display());
        Ok(())
    }

    /// Read a model written by `save`.
    pub fn load(&self) -> Result<PipelineModel> {
        let meta: ModelMetadata = read_json(&self.dir.join("metadata.json")).with_context(|| {
            format!(
                "Cannot read model metadata in '{}'. Have you run 'train' first?",
                self.dir.display()
            )
        })?;
        if meta.format_version != FORMAT_VERSION {
            bail!(
                "Unsupported model format version {} (expected {})",
                meta.format_version,
                FORMAT_VERSION
            );
        }

        let mut stages = Vec::with_capacity(meta.stages.len());
        for (i, name) in meta.stages.iter().enumerate() {
            let path = self.dir.join("stages").join(stage_file(i, name));
            let stage: FittedStage = read_json(&path)?;
            if stage.name() != name {
                bail!(
                    "Stage file '{}' holds '{}', expected '{}'",
                    path.display(),
                    stage.name(),
                    name
                );
            }
            stages.push(stage);
        }

        tracing::info!("Loaded model with {} stages from '{}'", stages.len(), self.dir.display());
        Ok(PipelineModel::new(stages))
    }

    pub fn load_config(&self) -> Result<TrainConfig> {
        read_json(&self.dir.join("train_config.json"))
    }
}

fn write_artifact(dir: &Path, model: &PipelineModel, cfg: &TrainConfig) -> Result<()> {
    let stages_dir = dir.join("stages");
    fs::create_dir_all(&stages_dir)?;

    for (i, stage) in model.stages().iter().enumerate() {
        write_json(&stages_dir.join(stage_file(i, stage.name())), stage)?;
    }

    // `predict` cannot name its output without the decoder stage
    let labels = model.labels().context("Model has no label decoder stage")?;
    let meta = ModelMetadata {
        format_version: FORMAT_VERSION,
        stages:         model.stages().iter().map(|s| s.name().to_string()).collect(),
        labels:         labels.to_vec(),
    };
    write_json(&dir.join("metadata.json"), &meta)?;
    write_json(&dir.join("train_config.json"), cfg)?;
    Ok(())
}

fn stage_file(index: usize, name: &str) -> String {
    format!("{index}_{name}.json")
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("Cannot write '{}'", path.display()))
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Cannot read '{}'", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("Cannot parse '{}'", path.display()))
}

fn remove_path(path: &Path) -> Result<()> {
    let result = if path.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    result.with_context(|| format!("Cannot remove '{}'", path.display()))
}

// ============================================================
// Layer 4 — Data Preparation
// ============================================================
// Everything between a CSV file on disk and a clean, labelled
// record ready for the ML layer.
//
//   headerless CSV
//       │
//       ▼
//   CsvLoader        → RawRecord (id, entity, sentiment, text)
//       │
//       ▼
//   harmonize        → LabeledText (target, cleaned_text), no nulls,
//       │              Irrelevant folded into Neutral
//       ▼
//   TextNormalizer   → cleaned_text rewritten by the regex sequence
//
// Once the pipeline has produced TF-IDF rows, the classifier's
// training loop reads them back through this layer too:
//
//   FeatureDataset   → Burn Dataset of (features, label) samples
//   FeatureBatcher   → scaled dense [batch, d] tensors
//
// The training and validation files take exactly the same path.
//
// Reference: Rust Book §13 (Iterators and Closures)

/// Reads headerless tweet CSV files
pub mod loader;

/// Renames columns, drops nulls, folds labels
pub mod harmonizer;

/// Lowercase + regex cleaning of tweet text
pub mod normalizer;

/// Burn Dataset over TF-IDF training rows
pub mod dataset;

/// Burn Batcher that densifies sparse rows
pub mod batcher;

// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer programs against these traits, never
// against the concrete loader or the concrete classifier, so a
// different file format or model can be dropped in without
// touching the use cases.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;

use crate::domain::record::RawRecord;

// ─── RecordSource ─────────────────────────────────────────────────────────────
/// Any component that can load raw tweet records.
///
/// Implementations:
///   - CsvLoader → headerless four-column CSV files
pub trait RecordSource {
    /// Load every record the source holds.
    fn load_all(&self) -> Result<Vec<RawRecord>>;
}

// ─── SentimentClassifier ──────────────────────────────────────────────────────
/// Anything that can put a sentiment label on free text.
///
/// Implementations:
///   - PredictUseCase → runs a persisted pipeline
pub trait SentimentClassifier {
    /// Classify each text, returning one label per input in order.
    fn classify(&self, texts: &[String]) -> Result<Vec<String>>;
}

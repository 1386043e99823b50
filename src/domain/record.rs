// ============================================================
// Layer 3 — Record Domain Types
// ============================================================
// Two shapes of the same tweet row:
//
//   RawRecord    — exactly what the CSV gave us. Every field is
//                  optional because an empty cell is a null cell.
//
//   LabeledText  — a harmonised record. The label column is now
//                  called `target`, the text column `cleaned_text`,
//                  and both are guaranteed to be present.
//
// The transition RawRecord → LabeledText is owned by the
// harmonizer in Layer 4; this file only defines the shapes.
//
// Reference: Rust Book §5 (Structs), §6 (Option)

use serde::{Deserialize, Serialize};

/// The label that gets folded into `NEUTRAL` during harmonisation
pub const IRRELEVANT: &str = "Irrelevant";

/// The label every `IRRELEVANT` row becomes
pub const NEUTRAL: &str = "Neutral";

/// One row of a headerless `id, entity, sentiment, text` file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Tweet id, `None` when the cell was empty or not an integer
    pub id: Option<i64>,

    /// The brand or game the tweet talks about (carried, never used)
    pub entity: Option<String>,

    /// Sentiment label as written in the file
    pub sentiment: Option<String>,

    /// Tweet body as written in the file
    pub text: Option<String>,
}

impl RawRecord {
    pub fn new(
        id:        Option<i64>,
        entity:    Option<&str>,
        sentiment: Option<&str>,
        text:      Option<&str>,
    ) -> Self {
        Self {
            id,
            entity:    entity.map(str::to_string),
            sentiment: sentiment.map(str::to_string),
            text:      text.map(str::to_string),
        }
    }
}

/// A harmonised record: renamed columns, no nulls in the columns
/// the model reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledText {
    pub id:           Option<i64>,
    pub entity:       Option<String>,

    /// Sentiment class, e.g. "Positive"
    pub target:       String,

    /// Tweet body. Holds the raw text until the normalizer
    /// rewrites it in place.
    pub cleaned_text: String,
}

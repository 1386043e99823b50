// ============================================================
// Layer 4 — Label Harmonizer
// ============================================================
// Brings raw records into the canonical shape the model trains
// on. Steps, in this order:
//
//   1. Rename   sentiment → target, text → cleaned_text
//   2. Drop     records with a null target or a null text
//   3. Rewrite  target "Irrelevant" → "Neutral"
//
// The training and validation files go through this exact
// function, so both splits see the same label set.
//
// Reference: Rust Book §13 (Iterators and Closures)

use crate::domain::record::{LabeledText, RawRecord, IRRELEVANT, NEUTRAL};

/// Harmonise a batch of raw records.
pub fn harmonize(records: Vec<RawRecord>) -> Vec<LabeledText> {
    let total = records.len();

    let harmonized: Vec<LabeledText> = records
        .into_iter()
        .filter_map(|r| {
            // Step 1 + 2: rename, and drop the row if either column is null
            let target       = r.sentiment?;
            let cleaned_text = r.text?;
            Some(LabeledText {
                id: r.id,
                entity: r.entity,
                target: collapse_label(target),
                cleaned_text,
            })
        })
        .collect();

    tracing::debug!(
        "Harmonized {} records ({} dropped for null target/text)",
        harmonized.len(),
        total - harmonized.len()
    );
    harmonized
}

/// Step 3: fold the stray category into Neutral.
fn collapse_label(target: String) -> String {
    if target == IRRELEVANT {
        NEUTRAL.to_string()
    } else {
        target
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_irrelevant_becomes_neutral() {
        let out = harmonize(vec![
            RawRecord::new(Some(1), Some("Google"), Some("Irrelevant"), Some("a")),
            RawRecord::new(Some(2), Some("Google"), Some("Positive"),   Some("b")),
        ]);
        assert_eq!(out[0].target, "Neutral");
        assert_eq!(out[1].target, "Positive");
        assert!(out.iter().all(|r| r.target != IRRELEVANT));
    }

    #[test]
    fn test_drops_null_target_or_text() {
        let out = harmonize(vec![
            RawRecord::new(Some(1), None, None,             Some("text")),
            RawRecord::new(Some(2), None, Some("Negative"), None),
            RawRecord::new(Some(3), None, Some("Negative"), Some("kept")),
        ]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, Some(3));
        assert!(out.iter().all(|r| !r.target.is_empty() && !r.cleaned_text.is_empty()));
    }

    #[test]
    fn test_renames_columns() {
        let out = harmonize(vec![
            RawRecord::new(Some(9), Some("Xbox"), Some("Neutral"), Some("hello")),
        ]);
        assert_eq!(out[0].target, "Neutral");
        assert_eq!(out[0].cleaned_text, "hello");
        assert_eq!(out[0].entity.as_deref(), Some("Xbox"));
    }

    #[test]
    fn test_other_labels_pass_through() {
        let out = harmonize(vec![
            RawRecord::new(None, None, Some("Mixed"), Some("x")),
        ]);
        assert_eq!(out[0].target, "Mixed");
    }
}

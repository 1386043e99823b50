// ============================================================
// Layer 5 — Stop-word Remover stage
// ============================================================
// tokens → filtered_tokens
//
// Drops common English function words. Matching is
// case-insensitive unless `case_sensitive` is set. The word list
// is stored with the fitted model so a reloaded pipeline filters
// exactly the same words it was trained with.
//
// Note the list contains contractions ("don't", "isn't"). Text
// that went through the normalizer has lost its apostrophes, so
// those entries never match cleaned tweets.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::ml::frame::Frame;
use crate::ml::pipeline::{Estimator, FittedStage, Transformer};

const ENGLISH: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your",
    "yours", "yourself", "yourselves", "he", "him", "his", "himself", "she", "her",
    "hers", "herself", "it", "its", "itself", "they", "them", "their", "theirs",
    "themselves", "what", "which", "who", "whom", "this", "that", "these", "those",
    "am", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had",
    "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if",
    "or", "because", "as", "until", "while", "of", "at", "by", "for", "with",
    "about", "against", "between", "into", "through", "during", "before", "after",
    "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over",
    "under", "again", "further", "then", "once", "here", "there", "when", "where",
    "why", "how", "all", "any", "both", "each", "few", "more", "most", "other",
    "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than", "too",
    "very", "s", "t", "can", "will", "just", "don", "should", "now", "i'll",
    "you'll", "he'll", "she'll", "we'll", "they'll", "i'd", "you'd", "he'd",
    "she'd", "we'd", "they'd", "i'm", "you're", "he's", "she's", "it's", "we're",
    "they're", "i've", "we've", "you've", "they've", "isn't", "aren't", "wasn't",
    "weren't", "haven't", "hasn't", "hadn't", "don't", "doesn't", "didn't",
    "won't", "wouldn't", "shan't", "shouldn't", "mustn't", "can't", "couldn't",
    "cannot", "could", "here's", "how's", "let's", "ought", "that's", "there's",
    "what's", "when's", "where's", "who's", "why's", "would",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StopWordsSpec", into = "StopWordsSpec")]
pub struct StopWordsRemover {
    stop_words:     Vec<String>,
    case_sensitive: bool,
    lookup:         HashSet<String>,
}

/// What gets written to disk: the list and the matching mode.
/// The lookup set is rebuilt on load.
#[derive(Serialize, Deserialize)]
struct StopWordsSpec {
    stop_words:     Vec<String>,
    case_sensitive: bool,
}

impl From<StopWordsSpec> for StopWordsRemover {
    fn from(spec: StopWordsSpec) -> Self {
        Self::new(spec.stop_words, spec.case_sensitive)
    }
}

impl From<StopWordsRemover> for StopWordsSpec {
    fn from(r: StopWordsRemover) -> Self {
        Self { stop_words: r.stop_words, case_sensitive: r.case_sensitive }
    }
}

impl StopWordsRemover {
    pub fn new<I, S>(words: I, case_sensitive: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let stop_words: Vec<String> = words.into_iter().map(Into::into).collect();
        let lookup = stop_words
            .iter()
            .map(|w| if case_sensitive { w.clone() } else { w.to_lowercase() })
            .collect();
        Self { stop_words, case_sensitive, lookup }
    }

    /// The default English list, case-insensitive
    pub fn english() -> Self {
        Self::new(ENGLISH.iter().copied(), false)
    }

    pub fn stop_words(&self) -> &[String] {
        &self.stop_words
    }

    pub fn is_stop_word(&self, token: &str) -> bool {
        if self.case_sensitive {
            self.lookup.contains(token)
        } else {
            self.lookup.contains(&token.to_lowercase())
        }
    }
}

impl Transformer for StopWordsRemover {
    fn transform(&self, frame: &mut Frame) -> Result<()> {
        for row in &mut frame.rows {
            let filtered: Vec<String> = row
                .require_tokens()?
                .iter()
                .filter(|t| !self.is_stop_word(t))
                .cloned()
                .collect();
            row.filtered_tokens = Some(filtered);
        }
        Ok(())
    }
}

impl Estimator for StopWordsRemover {
    fn name(&self) -> &'static str {
        "stop_words_remover"
    }

    fn fit(&self, _frame: &Frame) -> Result<FittedStage> {
        Ok(FittedStage::StopWordsRemover(self.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(remover: &StopWordsRemover, tokens: &[&str]) -> Vec<String> {
        let mut frame = Frame::from_texts(vec![String::new()]);
        frame.rows[0].tokens = Some(tokens.iter().map(|t| t.to_string()).collect());
        remover.transform(&mut frame).unwrap();
        frame.rows[0].filtered_tokens.clone().unwrap()
    }

    #[test]
    fn test_removes_english_stop_words() {
        let r = StopWordsRemover::english();
        assert_eq!(filter(&r, &["check", "now"]), vec!["check"]);
        assert_eq!(filter(&r, &["The", "game", "is", "GOOD"]), vec!["game", "GOOD"]);
    }

    #[test]
    fn test_case_sensitive_custom_list() {
        let r = StopWordsRemover::new(["Foo"], true);
        assert_eq!(filter(&r, &["Foo", "foo", "bar"]), vec!["foo", "bar"]);
    }

    #[test]
    fn test_survives_serde_round_trip() {
        let json = serde_json::to_string(&StopWordsRemover::english()).unwrap();
        let back: StopWordsRemover = serde_json::from_str(&json).unwrap();
        assert_eq!(back, StopWordsRemover::english());
        assert_eq!(filter(&back, &["it", "rocks"]), vec!["rocks"]);
    }
}

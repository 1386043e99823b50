// ============================================================
// Layer 5 — Pipeline Stages
// ============================================================
// One file per stage, in pipeline order:
//
//   tokenizer            cleaned_text    → tokens
//   stop_words           tokens          → filtered_tokens
//   count_vectorizer     filtered_tokens → raw_features
//   idf                  raw_features    → features
//   logistic_regression  features       → prediction, probability
//   index_to_string      prediction      → predicted_label
//
// Every stage implements Estimator (fit) and its fitted form
// implements Transformer (transform).

pub mod tokenizer;

pub mod stop_words;

pub mod count_vectorizer;

pub mod idf;

pub mod logistic_regression;

pub mod index_to_string;

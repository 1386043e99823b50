// ============================================================
// Layer 5 — ML / Model Layer
// ============================================================
// Everything that learns from or scores a frame lives here.
// Burn is only imported by model.rs and trainer.rs; the rest of
// the layer is plain Rust over sparse vectors.
//
// What's in this layer:
//
//   frame.rs          — the row table stages read and write
//   sparse.rs         — sparse term-count / TF-IDF vectors
//   label_indexer.rs  — label string ⇄ class index
//   pipeline.rs       — Estimator / Transformer traits, Pipeline,
//                       PipelineModel
//   stages/           — tokenizer, stop words, count vectorizer,
//                       IDF, logistic regression, label decoder
//   model.rs          — Burn softmax regression module
//   trainer.rs        — mini-batch Adam training loop
//   evaluator.rs      — accuracy / weighted F1 / report
//
// Reference: Burn Book §3 (Building Blocks), §5 (Training)

pub mod frame;

pub mod sparse;

pub mod label_indexer;

pub mod pipeline;

/// One module per pipeline stage
pub mod stages;

/// Softmax regression architecture (Burn)
pub mod model;

/// Training loop with Adam
pub mod trainer;

pub mod evaluator;

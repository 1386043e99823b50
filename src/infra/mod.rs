// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Concerns that several layers lean on but none of them owns:
//
//   session.rs     — Job lifetime
//                    Owns the compute device for the run and
//                    is released exactly once, on success or
//                    on an early error.
//
//   model_store.rs — Model persistence
//                    Writes the fitted pipeline as JSON files
//                    with overwrite semantics and loads it back
//                    for `predict`.
//
//   metrics.rs     — Training metrics logging
//                    Writes the per-iteration loss to a CSV
//                    file for later plotting.
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)

/// Runtime session owning the compute device
pub mod session;

/// Saving and loading the fitted pipeline
pub mod model_store;

/// Training loss CSV logger
pub mod metrics;

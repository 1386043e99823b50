// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer strings the other layers together into the two
// things a user can ask for: train a model, or label some text
// with a model that was trained earlier.
//
// Rules for this layer:
//   - No ML math or model code here
//   - No direct file parsing (that's Layer 4 and 6)
//   - Only workflow coordination, plus the fixed progress lines
//     the training job prints
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// The training job
pub mod train_use_case;

// Inference on free text with a saved model
pub mod predict_use_case;

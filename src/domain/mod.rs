// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs and traits describing what a tweet record
// is, before any ML type gets involved.
//
// Rules for this layer:
//   - NO burn types
//   - NO file I/O
//   - Only plain structs, constants and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// Raw and harmonised tweet rows
pub mod record;

// Core abstractions (traits) that other layers implement
pub mod traits;

// ============================================================
// Layer 3 - Domain Layer
// ============================================================
// Plain Rust types that describe the problem: what a labelled
// URL is, what a prediction looks like at the request boundary,
// and the traits the other layers implement.
//
// Rules for this layer:
//   - NO Burn framework types
//   - NO file I/O
//   - Only structs, enums, traits and the decision rule

// A URL paired with its class label
pub mod labeled_url;

// Request/response contract and the fixed decision threshold
pub mod prediction;

// Core abstractions (traits) that other layers implement
pub mod traits;

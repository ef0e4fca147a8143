// ============================================================
// Layer 6 - Infrastructure Layer
// ============================================================
// File-system concerns shared by training and prediction:
//
//   artifact_store.rs - vocabulary, model manifest, parameters
//                       and run config, all versioned
//   metrics.rs        - per-epoch training metrics as CSV

/// Versioned vocabulary and classifier persistence
pub mod artifact_store;

/// Training metrics CSV logger
pub mod metrics;

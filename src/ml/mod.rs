// ============================================================
// Layer 5 - ML Layer (Burn)
// ============================================================
// All Burn model code lives here.
//
//   model.rs      - embedding → conv1d → max-pool → dense → sigmoid
//   trainer.rs    - Adam/BCE training loop and evaluation
//   inferencer.rs - frozen model scoring encoded sequences

/// Character-level CNN classifier
pub mod model;

/// Training loop with per-epoch validation
pub mod trainer;

/// Scores encoded URLs with a loaded model
pub mod inferencer;

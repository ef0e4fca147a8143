// ============================================================
// Layer 2 - Application / Use Cases
// ============================================================
// Workflow coordination only: no tensor math, no printing.
//
//   train_use_case   - corpus → balanced, encoded splits → model
//   predict_use_case - ModelContext: load once, predict many

// The training workflow
pub mod train_use_case;

// Loaded context and request handling
pub mod predict_use_case;

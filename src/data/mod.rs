// ============================================================
// Layer 4 - Data Pipeline
// ============================================================
// Everything between the CSV file and tensor batches:
//
//   CSV corpus
//       │
//       ▼
//   CsvCorpusLoader   → labelled rows, malformed rows dropped
//       │
//       ▼
//   balance_classes   → equal benign/defacement counts
//       │
//       ▼
//   Vocabulary        → char → index, by frequency
//       │
//       ▼
//   SequenceEncoder   → fixed-length index sequences
//       │
//       ▼
//   stratified_split  → train / held-out test
//       │
//       ▼
//   UrlDataset + UrlBatcher → Burn DataLoader batches

/// Reads the `url,type` CSV corpus
pub mod loader;

/// Down-samples the majority class
pub mod balancer;

/// Character vocabulary built from the corpus
pub mod vocabulary;

/// Fixed-length left-padded encoding
pub mod encoder;

/// Shuffled and stratified splits
pub mod splitter;

/// Burn Dataset over encoded samples
pub mod dataset;

/// Burn Batcher producing tensor batches
pub mod batcher;

// ============================================================
// Layer 3 - Core Traits
// ============================================================
// The application layer programs against these traits so the
// CSV loader and the Burn-backed scorer can be swapped out in
// tests without touching the workflows that use them.

use anyhow::Result;

use crate::domain::labeled_url::LabeledUrl;

// ─── CorpusSource ────────────────────────────────────────────────────────────
/// Anything that can produce labelled training rows.
///
/// Implementations:
///   - CsvCorpusLoader → reads a `url,type` CSV file
pub trait CorpusSource {
    /// Load every well-formed row. Malformed rows are dropped by
    /// the implementation; an error means the source itself could
    /// not be read.
    fn load_all(&self) -> Result<Vec<LabeledUrl>>;
}

// ─── UrlScorer ───────────────────────────────────────────────────────────────
/// Anything that maps a URL to a malicious-probability in [0, 1].
///
/// Implementations:
///   - ModelContext → vocabulary + trained CNN
pub trait UrlScorer {
    fn score(&self, url: &str) -> Result<f32>;
}

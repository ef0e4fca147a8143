// ============================================================
// Layer 4 - Class Balancer
// ============================================================
// Down-samples the majority class so both labels appear the
// same number of times, then shuffles the combined rows.
//
//   benign: 900, defacement: 300
//       → benign: 300 (random, no replacement), defacement: 300
//       → shuffled together
//
// An RNG is passed in so a seeded run is reproducible.

use rand::{seq::SliceRandom, Rng};

use crate::domain::labeled_url::{Label, LabeledUrl};

/// Count rows per class, returned as (benign, defacement).
pub fn class_counts(rows: &[LabeledUrl]) -> (usize, usize) {
    let defacement = rows.iter().filter(|r| r.label == Label::Defacement).count();
    (rows.len() - defacement, defacement)
}

/// Equalise class counts by random down-sampling, then shuffle.
///
/// If either class is absent the result is empty.
pub fn balance_classes<R: Rng + ?Sized>(rows: Vec<LabeledUrl>, rng: &mut R) -> Vec<LabeledUrl> {
    let (mut benign, mut defacement): (Vec<_>, Vec<_>) =
        rows.into_iter().partition(|r| r.label == Label::Benign);

    let keep = benign.len().min(defacement.len());

    // Shuffle-then-truncate is sampling without replacement
    benign.shuffle(rng);
    defacement.shuffle(rng);
    benign.truncate(keep);
    defacement.truncate(keep);

    let mut balanced = benign;
    balanced.append(&mut defacement);
    balanced.shuffle(rng);

    tracing::debug!("Balanced corpus to {} rows per class", keep);
    balanced
}

// ============================================================
// Layer 4 - Train/Test Splitter
// ============================================================
// Two ways of carving a sample list into two parts:
//
//   split_train_val   - plain shuffled split, used to hold back
//                       the per-epoch validation slice
//   stratified_split  - splits each class separately so both
//                       halves keep the corpus's class ratio,
//                       used for the final held-out test set
//
// Both take the RNG from the caller so seeded runs repeat.

use rand::{seq::SliceRandom, Rng};

/// Shuffle `samples` and split into (train, rest) at
/// `floor(len * train_fraction)`, so any fractional row goes to
/// the held-back part. Four rows at 0.9 give 3 + 1.
///
/// # Example
/// ```ignore
/// let (train, val) = split_train_val(all, 0.9, &mut rng);
/// ```
pub fn split_train_val<T, R: Rng + ?Sized>(
    mut samples:    Vec<T>,
    train_fraction: f64,
    rng:            &mut R,
) -> (Vec<T>, Vec<T>) {
    samples.shuffle(rng);

    let total    = samples.len();
    let split_at = (((total as f64) * train_fraction).floor() as usize).min(total);
    let val      = samples.split_off(split_at);

    tracing::debug!(
        "Dataset split: {} training, {} validation ({}% / {}%)",
        samples.len(),
        val.len(),
        (samples.len() * 100) / total.max(1),
        (val.len()     * 100) / total.max(1),
    );

    (samples, val)
}

/// Split per class, keeping the class ratio in both halves.
///
/// `class_of` extracts the class key of a sample. Each class is
/// shuffled and cut at `round(class_len * train_fraction)`; the
/// two halves are then shuffled so classes are interleaved.
pub fn stratified_split<T, K, R, F>(
    samples:        Vec<T>,
    train_fraction: f64,
    rng:            &mut R,
    class_of:       F,
) -> (Vec<T>, Vec<T>)
where
    K: PartialEq,
    R: Rng + ?Sized,
    F: Fn(&T) -> K,
{
    // Classes in first-seen order keeps the output reproducible
    let mut groups: Vec<(K, Vec<T>)> = Vec::new();
    for sample in samples {
        let key = class_of(&sample);
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, members)) => members.push(sample),
            None               => groups.push((key, vec![sample])),
        }
    }

    let mut train = Vec::new();
    let mut test  = Vec::new();
    for (_, mut members) in groups {
        members.shuffle(rng);
        let n        = members.len();
        let split_at = (((n as f64) * train_fraction).round() as usize).min(n);
        test.extend(members.split_off(split_at));
        train.extend(members);
    }

    train.shuffle(rng);
    test.shuffle(rng);
    (train, test)
}

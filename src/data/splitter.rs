// ============================================================
// Layer 4 — Train/Test Splitter
// ============================================================
// Splits labelled examples into a training set (used to fit the
// forest) and a held-out test set (used only for the evaluation
// report).
//
// Two strategies:
//   Stratified — each class is shuffled and split on its own, so
//                every class appears in both sets in roughly the
//                same proportion as in the full dataset
//   Random     — one shuffle over everything, used when some class
//                has fewer than 2 examples and cannot appear on
//                both sides
//
// Both use a seeded StdRng so the split is reproducible.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Which strategy produced a split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitKind {
    Stratified,
    Random,
}

#[derive(Debug)]
pub struct Split<T> {
    pub train: Vec<T>,
    pub test:  Vec<T>,
    pub kind:  SplitKind,
}

/// Randomly shuffle `samples` and hold out `test_fraction` of them.
/// The test size is rounded up, and at least one sample stays in
/// training when there are two or more.
pub fn split_random<T>(mut samples: Vec<T>, test_fraction: f64, seed: u64) -> (Vec<T>, Vec<T>) {
    let mut rng = StdRng::seed_from_u64(seed);
    samples.shuffle(&mut rng);

    let total  = samples.len();
    let n_test = held_out(total, test_fraction);

    // split_off(n) keeps [0..n) and returns [n..)
    let test = samples.split_off(total - n_test);

    tracing::debug!(
        "Dataset split: {} training, {} test ({}% / {}%)",
        samples.len(),
        test.len(),
        (samples.len() * 100) / total.max(1),
        (test.len() * 100) / total.max(1),
    );

    (samples, test)
}

/// Split stratified by `class_of`, falling back to a random split
/// when any class has fewer than 2 samples.
pub fn split_stratified<T, K, F>(samples: Vec<T>, class_of: F, test_fraction: f64, seed: u64) -> Split<T>
where
    K: Ord + Copy + std::fmt::Debug,
    F: Fn(&T) -> K,
{
    // ── Step 1: Group by class, in class order ──────────────────────────────
    let mut groups: BTreeMap<K, Vec<T>> = BTreeMap::new();
    for s in samples {
        groups.entry(class_of(&s)).or_default().push(s);
    }

    let too_small: Vec<K> = groups
        .iter()
        .filter(|(_, g)| g.len() < 2)
        .map(|(k, _)| *k)
        .collect();

    if !too_small.is_empty() {
        tracing::warn!(
            "Classes {:?} have fewer than 2 examples; falling back to a non-stratified split",
            too_small
        );
        let all = groups.into_values().flatten().collect();
        let (train, test) = split_random(all, test_fraction, seed);
        return Split { train, test, kind: SplitKind::Random };
    }

    // ── Step 2: Shuffle and split each class ────────────────────────────────
    let mut rng   = StdRng::seed_from_u64(seed);
    let mut train = Vec::new();
    let mut test  = Vec::new();

    for (_, mut group) in groups {
        group.shuffle(&mut rng);
        let n_test = ((group.len() as f64 * test_fraction).round() as usize).clamp(1, group.len() - 1);
        let held   = group.split_off(group.len() - n_test);
        train.extend(group);
        test.extend(held);
    }

    // ── Step 3: Interleave classes ──────────────────────────────────────────
    train.shuffle(&mut rng);
    test.shuffle(&mut rng);

    tracing::debug!("Stratified split: {} training, {} test", train.len(), test.len());
    Split { train, test, kind: SplitKind::Stratified }
}

fn held_out(total: usize, test_fraction: f64) -> usize {
    // the epsilon keeps 100 * 0.3 from rounding up to 31
    let n = (total as f64 * test_fraction.clamp(0.0, 1.0) - 1e-9).ceil().max(0.0) as usize;
    if total >= 2 { n.min(total - 1) } else { 0 }
}

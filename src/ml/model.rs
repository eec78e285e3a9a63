// ============================================================
// Layer 5 — Random Forest
// ============================================================
// Bagged CART decision trees over the encoded feature rows.
//
// Per tree:
//   1. draw a bootstrap sample (n draws with replacement); the
//      draw count of each row becomes a sample weight
//   2. multiply by the class weight, n / (k * count(class)), so
//      every class contributes the same total weight
//   3. grow the tree greedily on weighted Gini impurity,
//      considering sqrt(features) random features per node
//   4. store each leaf as a normalised class distribution
//
// Prediction averages the leaf distributions of every tree and
// takes the most probable class; ties go to the lowest index.
//
// Trees are grown in parallel with rayon. Each tree gets its own
// seed drawn up front from the forest seed, so the fitted forest
// is identical however the work is scheduled.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Forest hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestConfig {
    pub n_trees:          usize,
    pub max_depth:        usize,
    pub min_samples_leaf: usize,
    pub seed:             u64,
    pub balanced:         bool,
}

impl ForestConfig {
    pub fn new(n_trees: usize, max_depth: usize, min_samples_leaf: usize, seed: u64) -> Self {
        Self { n_trees, max_depth, min_samples_leaf, seed, balanced: true }
    }

    pub fn with_balanced(mut self, balanced: bool) -> Self {
        self.balanced = balanced;
        self
    }

    /// Fit a forest on dense rows `x` with class indices `y < n_classes`.
    pub fn fit(&self, x: &[Vec<f64>], y: &[usize], n_classes: usize) -> RandomForest {
        let n_features   = x.first().map_or(0, Vec::len);
        let class_weight = self.class_weights(y, n_classes);

        let mut rng = StdRng::seed_from_u64(self.seed);
        let seeds: Vec<u64> = (0..self.n_trees.max(1)).map(|_| rng.gen()).collect();

        let trees = seeds
            .par_iter()
            .map(|&seed| {
                let mut rng = StdRng::seed_from_u64(seed);

                // ── Bootstrap weights ──────────────────────────────────────
                let mut weight = vec![0.0; x.len()];
                for _ in 0..x.len() {
                    weight[rng.gen_range(0..x.len())] += 1.0;
                }
                for (w, &class) in weight.iter_mut().zip(y) {
                    *w *= class_weight[class];
                }

                let mut grower = TreeGrower {
                    x,
                    y,
                    weight:       &weight,
                    n_classes,
                    max_features: max_features(n_features),
                    config:       self,
                    rng,
                    nodes:        Vec::new(),
                };
                let rows: Vec<usize> = (0..x.len()).filter(|&i| weight[i] > 0.0).collect();
                grower.grow(rows, 0);
                DecisionTree { nodes: grower.nodes }
            })
            .collect::<Vec<_>>();

        RandomForest { n_classes, n_features, trees }
    }

    fn class_weights(&self, y: &[usize], n_classes: usize) -> Vec<f64> {
        if !self.balanced {
            return vec![1.0; n_classes];
        }
        let mut counts = vec![0usize; n_classes];
        for &c in y {
            counts[c] += 1;
        }
        let present = counts.iter().filter(|&&c| c > 0).count().max(1) as f64;
        counts
            .iter()
            .map(|&c| if c == 0 { 0.0 } else { y.len() as f64 / (present * c as f64) })
            .collect()
    }
}

/// sqrt(n), at least 1.
fn max_features(n_features: usize) -> usize {
    ((n_features as f64).sqrt() as usize).max(1)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Node {
    Leaf { distribution: Vec<f64> },
    Split { feature: usize, threshold: f64, left: usize, right: usize },
}

/// A fitted tree stored as an arena; node 0 is the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

impl DecisionTree {
    /// Class distribution of the leaf `row` falls into.
    pub fn leaf_distribution(&self, row: &[f64]) -> &[f64] {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { distribution } => return distribution,
                Node::Split { feature, threshold, left, right } => {
                    let v = row.get(*feature).copied().unwrap_or(0.0);
                    idx = if v <= *threshold { *left } else { *right };
                }
            }
        }
    }

    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], idx: usize) -> usize {
            match &nodes[idx] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, *left).max(walk(nodes, *right)),
            }
        }
        if self.nodes.is_empty() { 0 } else { walk(&self.nodes, 0) }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    n_classes:  usize,
    n_features: usize,
    trees:      Vec<DecisionTree>,
}

impl RandomForest {
    /// Mean class distribution over all trees.
    pub fn predict_proba(&self, row: &[f64]) -> Vec<f64> {
        let mut proba = vec![0.0; self.n_classes];
        for tree in &self.trees {
            for (p, d) in proba.iter_mut().zip(tree.leaf_distribution(row)) {
                *p += d;
            }
        }
        let n = self.trees.len().max(1) as f64;
        proba.iter_mut().for_each(|p| *p /= n);
        proba
    }

    /// Most probable class index; the lowest index wins a tie.
    pub fn predict(&self, row: &[f64]) -> usize {
        let proba = self.predict_proba(row);
        let mut best = 0;
        for (i, p) in proba.iter().enumerate() {
            if *p > proba[best] {
                best = i;
            }
        }
        best
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn mean_depth(&self) -> f64 {
        let total: usize = self.trees.iter().map(DecisionTree::depth).sum();
        total as f64 / self.trees.len().max(1) as f64
    }
}

// ─── Tree growing ─────────────────────────────────────────────────────────────

struct TreeGrower<'a> {
    x:            &'a [Vec<f64>],
    y:            &'a [usize],
    weight:       &'a [f64],
    n_classes:    usize,
    max_features: usize,
    config:       &'a ForestConfig,
    rng:          StdRng,
    nodes:        Vec<Node>,
}

struct BestSplit {
    feature:   usize,
    threshold: f64,
    impurity:  f64,
}

impl TreeGrower<'_> {
    /// Grow the subtree over `rows` and return its arena index.
    fn grow(&mut self, rows: Vec<usize>, depth: usize) -> usize {
        let totals = self.class_totals(&rows);
        let idx    = self.nodes.len();

        let stop = depth >= self.config.max_depth
            || rows.len() < 2
            || rows.len() < 2 * self.config.min_samples_leaf
            || gini(&totals) <= f64::EPSILON;

        let split = if stop { None } else { self.best_split(&rows) };

        let Some(split) = split else {
            self.nodes.push(Node::Leaf { distribution: normalise(totals) });
            return idx;
        };

        // reserve the slot, children are appended after it
        self.nodes.push(Node::Leaf { distribution: Vec::new() });
        let (l_rows, r_rows): (Vec<usize>, Vec<usize>) = rows
            .into_iter()
            .partition(|&r| self.x[r][split.feature] <= split.threshold);

        let left  = self.grow(l_rows, depth + 1);
        let right = self.grow(r_rows, depth + 1);
        self.nodes[idx] = Node::Split { feature: split.feature, threshold: split.threshold, left, right };
        idx
    }

    /// Best weighted-Gini split over up to `max_features` non-constant
    /// features, visited in random order.
    fn best_split(&mut self, rows: &[usize]) -> Option<BestSplit> {
        let n_features = self.x.first().map_or(0, Vec::len);
        let mut order: Vec<usize> = (0..n_features).collect();
        order.shuffle(&mut self.rng);

        let min_leaf = self.config.min_samples_leaf.max(1);
        let mut best: Option<BestSplit> = None;
        let mut tried = 0;

        for feature in order {
            if tried >= self.max_features {
                break;
            }

            let mut sorted = rows.to_vec();
            sorted.sort_by(|&a, &b| self.x[a][feature].total_cmp(&self.x[b][feature]));

            let lo = self.x[sorted[0]][feature];
            let hi = self.x[sorted[sorted.len() - 1]][feature];
            if hi <= lo {
                continue;
            }
            tried += 1;

            // ── Scan thresholds left to right ──────────────────────────────
            let mut left  = vec![0.0; self.n_classes];
            let mut right = self.class_totals(&sorted);

            for i in 0..sorted.len() - 1 {
                let r = sorted[i];
                left[self.y[r]]  += self.weight[r];
                right[self.y[r]] -= self.weight[r];

                let here = self.x[r][feature];
                let next = self.x[sorted[i + 1]][feature];
                if next <= here || i + 1 < min_leaf || sorted.len() - (i + 1) < min_leaf {
                    continue;
                }

                let wl: f64 = left.iter().sum();
                let wr: f64 = right.iter().sum();
                let impurity = (wl * gini(&left) + wr * gini(&right)) / (wl + wr);

                if best.as_ref().map_or(true, |b| impurity < b.impurity) {
                    best = Some(BestSplit { feature, threshold: (here + next) / 2.0, impurity });
                }
            }
        }
        best
    }

    fn class_totals(&self, rows: &[usize]) -> Vec<f64> {
        let mut totals = vec![0.0; self.n_classes];
        for &r in rows {
            totals[self.y[r]] += self.weight[r];
        }
        totals
    }
}

fn gini(totals: &[f64]) -> f64 {
    let sum: f64 = totals.iter().sum();
    if sum <= 0.0 {
        return 0.0;
    }
    1.0 - totals.iter().map(|t| (t / sum).powi(2)).sum::<f64>()
}

fn normalise(totals: Vec<f64>) -> Vec<f64> {
    let sum: f64 = totals.iter().sum();
    if sum <= 0.0 {
        return totals;
    }
    totals.into_iter().map(|t| t / sum).collect()
}

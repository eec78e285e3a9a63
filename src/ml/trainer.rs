// ============================================================
// Layer 5 — Trainer
// ============================================================
// Fits the transform + forest pipeline on a labelled dataset and
// scores it on a held-out split.
//
//   dataset ─► sufficiency check ─► stratified split
//           ─► fit transform (train rows only) ─► fit forest
//           ─► predict test rows ─► classification report
//           ─► ClassifierArtifact
//
// The transform is fitted on the training rows only, so the test
// rows are encoded exactly the way unseen pages will be.

use crate::application::train_use_case::TrainConfig;
use crate::data::dataset::{LabeledExample, TrainingDataset};
use crate::data::splitter::{split_stratified, SplitKind};
use crate::domain::error::ScrapeError;
use crate::domain::features::{FeatureVector, FEATURE_NAMES, FEATURE_SCHEMA_VERSION};
use crate::domain::role::Role;
use crate::infra::metrics::ClassificationReport;
use crate::ml::inferencer::ClassifierArtifact;
use crate::ml::model::ForestConfig;
use crate::ml::transform::ColumnTransform;

/// Fewest usable examples a run will train on.
pub const MIN_EXAMPLES: usize = 10;

/// Fewest distinct roles a run will train on.
pub const MIN_CLASSES: usize = 2;

pub struct TrainingOutcome {
    pub artifact:   ClassifierArtifact,
    pub report:     ClassificationReport,
    pub split_kind: SplitKind,
    pub train_size: usize,
    pub test_size:  usize,
}

pub fn run_training(cfg: &TrainConfig, dataset: TrainingDataset) -> Result<TrainingOutcome, ScrapeError> {

    // ── Sufficiency ───────────────────────────────────────────────────────────
    let classes = dataset.class_counts().len();
    if dataset.len() < MIN_EXAMPLES || classes < MIN_CLASSES {
        return Err(ScrapeError::InsufficientTrainingData { examples: dataset.len(), classes });
    }

    // ── Split ─────────────────────────────────────────────────────────────────
    let split = split_stratified(dataset.into_examples(), |e| e.role, cfg.test_fraction, cfg.seed);
    if split.kind == SplitKind::Random {
        tracing::warn!("Stratified split impossible; evaluation uses a random split");
    }
    tracing::info!("Split: {} train, {} test ({:?})", split.train.len(), split.test.len(), split.kind);

    let (train_x, train_y) = unzip(&split.train);
    let (test_x, test_y)   = unzip(&split.test);

    // ── Fit transform ─────────────────────────────────────────────────────────
    let transform = ColumnTransform::fit(&train_x)?;
    let encoded   = transform.transform_all(&train_x)?;
    tracing::info!("Encoded {} features into {} columns", FEATURE_NAMES.len(), transform.output_width());
    tracing::debug!("Encoded columns: {}", transform.output_names().join(", "));

    // ── Fit forest ────────────────────────────────────────────────────────────
    let labels: Vec<usize> = train_y.iter().map(|r| r.index()).collect();
    let forest = ForestConfig::new(cfg.n_trees, cfg.max_depth, cfg.min_samples_leaf, cfg.seed)
        .with_balanced(cfg.balanced)
        .fit(&encoded, &labels, Role::ALL.len());
    tracing::info!("Fitted {} trees (mean depth {:.1})", forest.n_trees(), forest.mean_depth());

    let artifact = ClassifierArtifact {
        schema_version:    FEATURE_SCHEMA_VERSION,
        feature_names:     FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
        stopword_language: cfg.stopword_language.clone(),
        classes:           Role::ALL.to_vec(),
        transform,
        forest,
    };

    // ── Evaluate ──────────────────────────────────────────────────────────────
    let predicted = test_x
        .iter()
        .map(|fv| artifact.predict(fv))
        .collect::<Result<Vec<Role>, _>>()?;
    let report = ClassificationReport::compute(&test_y, &predicted);
    tracing::info!("Held-out accuracy: {:.3} on {} nodes", report.accuracy, report.total);
    if let Some(title) = report.class(Role::Title) {
        tracing::info!("Title F1: {:.3} ({} held-out titles)", title.f1, title.support);
    }

    Ok(TrainingOutcome {
        artifact,
        report,
        split_kind: split.kind,
        train_size: train_y.len(),
        test_size:  test_y.len(),
    })
}

fn unzip(examples: &[LabeledExample]) -> (Vec<FeatureVector>, Vec<Role>) {
    examples.iter().map(|e| (e.features.clone(), e.role)).unzip()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn example(tag: &str, kicker_class: bool, role: Role) -> LabeledExample {
        LabeledExample {
            features: FeatureVector {
                tag_name:              tag.into(),
                is_h2:                 tag == "h2",
                is_img:                tag == "img",
                is_div:                tag == "div",
                class_contains_kicker: kicker_class,
                ..FeatureVector::default()
            },
            role,
        }
    }

    fn small_config() -> TrainConfig {
        TrainConfig { n_trees: 20, ..TrainConfig::default() }
    }

    #[test]
    fn test_too_few_examples() {
        let ds  = TrainingDataset::new((0..9).map(|_| example("div", false, Role::Other)).collect());
        let err = run_training(&small_config(), ds).err().unwrap();
        assert!(matches!(err, ScrapeError::InsufficientTrainingData { examples: 9, classes: 1 }));
    }

    #[test]
    fn test_single_class_is_insufficient() {
        let ds  = TrainingDataset::new((0..40).map(|_| example("div", false, Role::Other)).collect());
        let err = run_training(&small_config(), ds).err().unwrap();
        assert!(matches!(err, ScrapeError::InsufficientTrainingData { classes: 1, .. }));
    }

    #[test]
    fn test_learns_separable_roles() {
        let mut rows = Vec::new();
        for _ in 0..10 {
            rows.push(example("h2", false, Role::Title));
            rows.push(example("img", false, Role::ImageUrl));
            rows.push(example("div", true, Role::Kicker));
            rows.push(example("div", false, Role::Other));
            rows.push(example("span", false, Role::Other));
        }
        let outcome = run_training(&small_config(), TrainingDataset::new(rows)).unwrap();

        assert_eq!(outcome.split_kind, SplitKind::Stratified);
        assert_eq!(outcome.train_size + outcome.test_size, 50);
        assert_eq!(outcome.artifact.forest.n_trees(), 20);
        assert!(outcome.report.accuracy > 0.9, "accuracy {}", outcome.report.accuracy);
        assert!(outcome.artifact.check_schema().is_ok());
    }

    #[test]
    fn test_lone_kicker_falls_back_to_random_split() {
        let mut rows: Vec<LabeledExample> = (0..50).map(|_| example("div", false, Role::Other)).collect();
        rows.push(example("div", true, Role::Kicker));

        let outcome = run_training(&small_config(), TrainingDataset::new(rows)).unwrap();
        assert_eq!(outcome.split_kind, SplitKind::Random);
        assert_eq!(outcome.report.total, outcome.test_size);
        assert!(outcome.report.class(Role::Other).is_some());
    }
}

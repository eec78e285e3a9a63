// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load the label file             (Layer 4 - data)
//   Step 2: Load the labelled HTML blocks   (Layer 4 - data)
//   Step 3: Build the word analyzer         (Layer 6 - infra)
//   Step 4: Extract the labelled dataset    (Layer 4 - data)
//   Step 5: Report the role distribution
//   Step 6: Split, fit and evaluate         (Layer 5 - ml)
//   Step 7: Save artifact, config, metrics  (Layer 6 - infra)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::data::{
    dataset::{TrainingDataset, SPARSE_ROLE_THRESHOLD},
    extractor::FeatureExtractor,
    loader::{load_label_file, CorpusLoader},
    splitter::SplitKind,
};
use crate::domain::role::Role;
use crate::infra::{
    checkpoint::ArtifactStore,
    metrics::{ClassificationReport, MetricsLogger},
    tokenizer_store::WordAnalyzer,
};
use crate::ml::trainer::run_training;

// ─── Training Configuration ──────────────────────────────────────────────────
// All inputs and hyperparameters for a training run.
// Saved next to the artifact so a model can be traced back to
// the settings that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub labels_file:       String,
    pub html_dir:          String,
    pub model_dir:         String,
    pub test_fraction:     f64,
    pub seed:              u64,
    pub n_trees:           usize,
    pub max_depth:         usize,
    pub min_samples_leaf:  usize,
    pub balanced:          bool,
    pub stopword_language: String,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            labels_file:       "training_data/labels.json".to_string(),
            html_dir:          "training_data/html_blocks".to_string(),
            model_dir:         "models".to_string(),
            test_fraction:     0.3,
            seed:              42,
            n_trees:           150,
            max_depth:         25,
            min_samples_leaf:  2,
            balanced:          true,
            stopword_language: "english".to_string(),
        }
    }
}

/// What a finished run reports back to the CLI.
#[derive(Debug)]
pub struct TrainSummary {
    pub examples:      usize,
    pub distribution:  Vec<(Role, usize)>,
    pub split_kind:    SplitKind,
    pub train_size:    usize,
    pub test_size:     usize,
    pub report:        ClassificationReport,
    pub artifact_path: PathBuf,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<TrainSummary> {
        let cfg = &self.config;

        // ── Step 1: Labels ───────────────────────────────────────────────────
        tracing::info!("Loading labels from '{}'", cfg.labels_file);
        let labels = load_label_file(Path::new(&cfg.labels_file))?;

        // ── Step 2: Labelled documents ───────────────────────────────────────
        let docs = CorpusLoader::new(&cfg.html_dir).load(&labels)?;

        // ── Step 3: Text analyzer ────────────────────────────────────────────
        let analyzer  = WordAnalyzer::for_language(&cfg.stopword_language)?;
        let extractor = FeatureExtractor::new(&analyzer);

        // ── Step 4: Dataset ──────────────────────────────────────────────────
        let dataset = TrainingDataset::from_documents(&docs, &extractor);

        // ── Step 5: Role distribution ────────────────────────────────────────
        let counts = dataset.class_counts();
        let distribution: Vec<(Role, usize)> = Role::ALL
            .iter()
            .map(|r| (*r, counts.get(r).copied().unwrap_or(0)))
            .collect();
        for (role, n) in &distribution {
            tracing::info!(role = %role, "{} examples", n);
        }
        for (role, n) in dataset.sparse_roles() {
            tracing::warn!(
                role = %role,
                "Only {} examples (fewer than {}); this role will be learned poorly",
                n,
                SPARSE_ROLE_THRESHOLD
            );
        }
        let examples = dataset.len();

        // ── Step 6: Split, fit, evaluate ─────────────────────────────────────
        let outcome = run_training(cfg, dataset)?;

        // ── Step 7: Persist ──────────────────────────────────────────────────
        let store         = ArtifactStore::new(&cfg.model_dir);
        let artifact_path = store.save_artifact(&outcome.artifact)?;
        store.save_config(cfg)?;
        let metrics = MetricsLogger::new(store.dir())?;
        metrics.log(&outcome.report)?;
        tracing::info!("Classifier saved to '{}'", artifact_path.display());
        tracing::info!("Evaluation written to '{}'", metrics.csv_path().display());

        Ok(TrainSummary {
            examples,
            distribution,
            split_kind: outcome.split_kind,
            train_size: outcome.train_size,
            test_size:  outcome.test_size,
            report:     outcome.report,
            artifact_path,
        })
    }
}

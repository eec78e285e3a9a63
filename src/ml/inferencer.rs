// ============================================================
// Layer 5 — Classifier Artifact & Role Predictor
// ============================================================
// The artifact is everything inference needs, frozen at the end
// of training:
//
//   schema_version + feature_names  → rejects vectors from a
//                                     different extractor
//   stopword_language               → rebuilds the same analyzer
//   classes                         → forest class index → Role
//   transform + forest              → the fitted pipeline
//
// RolePredictor wraps a validated artifact together with its
// analyzer; it is immutable and shared by every worker thread.

use serde::{Deserialize, Serialize};

use crate::domain::error::ScrapeError;
use crate::domain::features::{schema_signature, FeatureVector, FEATURE_NAMES, FEATURE_SCHEMA_VERSION};
use crate::domain::role::Role;
use crate::infra::tokenizer_store::WordAnalyzer;
use crate::ml::model::RandomForest;
use crate::ml::transform::ColumnTransform;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierArtifact {
    pub schema_version:    u32,
    pub feature_names:     Vec<String>,
    pub stopword_language: String,
    pub classes:           Vec<Role>,
    pub transform:         ColumnTransform,
    pub forest:            RandomForest,
}

impl ClassifierArtifact {
    /// Fails with SchemaMismatch unless the artifact was fitted on the
    /// feature schema this build extracts.
    pub fn check_schema(&self) -> Result<(), ScrapeError> {
        let expected = schema_signature(self.schema_version, &self.feature_names);
        let found    = schema_signature(FEATURE_SCHEMA_VERSION, &FEATURE_NAMES);
        if expected != found {
            return Err(ScrapeError::SchemaMismatch { expected, found });
        }
        if self.transform.output_width() != self.forest.n_features() {
            return Err(ScrapeError::ArtifactFormat(format!(
                "transform encodes {} columns, forest expects {}",
                self.transform.output_width(),
                self.forest.n_features()
            )));
        }
        if self.classes.len() != self.forest.n_classes() {
            return Err(ScrapeError::ArtifactFormat(format!(
                "{} class labels for a forest over {} classes",
                self.classes.len(),
                self.forest.n_classes()
            )));
        }
        Ok(())
    }

    pub fn predict(&self, features: &FeatureVector) -> Result<Role, ScrapeError> {
        self.classify(&self.transform.transform(features)?)
    }

    /// Role of an already encoded row.
    pub fn classify(&self, row: &[f64]) -> Result<Role, ScrapeError> {
        let class = self.forest.predict(row);
        self.classes
            .get(class)
            .copied()
            .ok_or_else(|| ScrapeError::ArtifactFormat(format!("class index {class} has no role")))
    }
}

pub struct RolePredictor {
    artifact: ClassifierArtifact,
    analyzer: WordAnalyzer,
}

impl RolePredictor {
    pub fn new(artifact: ClassifierArtifact) -> Result<Self, ScrapeError> {
        artifact.check_schema()?;
        // The language comes from the artifact, so an unknown one means a bad artifact.
        let analyzer = WordAnalyzer::for_language(&artifact.stopword_language).map_err(|e| match e {
            ScrapeError::UnknownStopwordLanguage { .. } => ScrapeError::ArtifactFormat(e.to_string()),
            other => other,
        })?;
        tracing::info!(
            "Classifier ready: {} trees, {} encoded columns, {} '{}' stopwords",
            artifact.forest.n_trees(),
            artifact.transform.output_width(),
            analyzer.stopword_count(),
            analyzer.language()
        );
        Ok(Self { artifact, analyzer })
    }

    /// Analyzer the feature extractor must use with this artifact.
    pub fn analyzer(&self) -> &WordAnalyzer {
        &self.analyzer
    }

    /// Encode feature vectors with the fitted transform.
    pub fn encode_all(&self, rows: &[FeatureVector]) -> Result<Vec<Vec<f64>>, ScrapeError> {
        self.artifact.transform.transform_all(rows)
    }

    pub fn classify_all(&self, encoded: &[Vec<f64>]) -> Result<Vec<Role>, ScrapeError> {
        encoded.iter().map(|r| self.artifact.classify(r)).collect()
    }
}

// ============================================================
// Layer 6 — Artifact Store
// ============================================================
// Saves and restores the fitted classifier.
//
// What gets saved per training run:
//   1. role_classifier.json — transform + forest + schema tag
//   2. train_config.json    — the hyperparameters that produced it
//
// File layout:
//   models/
//     role_classifier.json
//     train_config.json
//     evaluation.csv         ← written by the metrics logger
//
// The artifact is plain JSON; loading fails with ArtifactFormat
// when the file is not a classifier artifact at all, and with
// SchemaMismatch when it was fitted on a different feature schema.

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};

use crate::application::train_use_case::TrainConfig;
use crate::domain::error::ScrapeError;
use crate::ml::inferencer::ClassifierArtifact;

pub const ARTIFACT_FILE: &str = "role_classifier.json";
pub const CONFIG_FILE:   &str = "train_config.json";

/// All files are stored in the configured directory.
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    pub fn artifact_path(&self) -> PathBuf {
        self.dir.join(ARTIFACT_FILE)
    }

    /// Write the artifact, creating the directory if needed.
    pub fn save_artifact(&self, artifact: &ClassifierArtifact) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create model directory '{}'", self.dir.display()))?;

        let path = self.artifact_path();
        let json = serde_json::to_string(artifact)?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to save classifier to '{}'", path.display()))?;

        tracing::debug!("Saved classifier artifact to '{}'", path.display());
        Ok(path)
    }

    /// Read the artifact and verify its schema.
    pub fn load_artifact(&self) -> Result<ClassifierArtifact, ScrapeError> {
        let path = self.artifact_path();
        if !path.is_file() {
            return Err(ScrapeError::ConfigOrDataMissing { what: "classifier artifact", path });
        }

        let json = fs::read_to_string(&path)
            .map_err(|e| ScrapeError::ArtifactFormat(format!("{}: {e}", path.display())))?;
        let artifact: ClassifierArtifact = serde_json::from_str(&json)
            .map_err(|e| ScrapeError::ArtifactFormat(format!("{}: {e}", path.display())))?;

        artifact.check_schema()?;
        tracing::info!("Loaded classifier from '{}'", path.display());
        Ok(artifact)
    }

    /// Save the training configuration next to the artifact.
    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create model directory '{}'", self.dir.display()))?;

        let path = self.dir.join(CONFIG_FILE);
        let json = serde_json::to_string_pretty(cfg)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }

    pub fn load_config(&self) -> Result<TrainConfig> {
        let path = self.dir.join(CONFIG_FILE);
        let json = fs::read_to_string(&path).with_context(|| {
            format!("Cannot read config from '{}'. Have you run 'train' first?", path.display())
        })?;
        Ok(serde_json::from_str(&json)?)
    }
}

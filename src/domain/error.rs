// ============================================================
// Layer 3 — Error Taxonomy
// ============================================================
// Typed failure reasons shared by every layer. The application
// layer decides what to do with each one:
//
//   fatal       — ConfigOrDataMissing, MalformedLabelFile,
//                 InsufficientTrainingData, UnknownStopwordLanguage,
//                 ArtifactFormat, InvalidSelector
//   per document — DocumentParse            (skip the document)
//   per block   — SchemaMismatch, BlockProcessing (skip the block)
//   per node    — TokenizeFailure, MissingAttribute
//                 (absorbed by feature defaults, never surfaced)

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("required input is missing: {what} ('{}')", path.display())]
    ConfigOrDataMissing { what: &'static str, path: PathBuf },

    #[error("malformed label file '{}': {reason}", path.display())]
    MalformedLabelFile { path: PathBuf, reason: String },

    #[error("not enough training data: {examples} examples across {classes} roles (need at least 10 examples and 2 roles)")]
    InsufficientTrainingData { examples: usize, classes: usize },

    #[error("cannot parse document '{document}': {reason}")]
    DocumentParse { document: String, reason: String },

    #[error("feature schema mismatch: artifact expects {expected}, extractor produces {found}")]
    SchemaMismatch { expected: String, found: String },

    #[error("tokenization failed: {0}")]
    TokenizeFailure(String),

    #[error("attribute '{0}' is missing")]
    MissingAttribute(&'static str),

    #[error("block {block} failed while {stage}: {reason}")]
    BlockProcessing { block: usize, stage: BlockStage, reason: String },

    #[error("unsupported stopword language '{language}' (available: {available})")]
    UnknownStopwordLanguage { language: String, available: String },

    #[error("unreadable classifier artifact: {0}")]
    ArtifactFormat(String),

    #[error("invalid CSS selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },
}

impl ScrapeError {
    /// Fatal errors abort the whole run; the others are skipped at
    /// node, document or block level.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ScrapeError::ConfigOrDataMissing { .. }
                | ScrapeError::MalformedLabelFile { .. }
                | ScrapeError::InsufficientTrainingData { .. }
                | ScrapeError::UnknownStopwordLanguage { .. }
                | ScrapeError::ArtifactFormat(_)
                | ScrapeError::InvalidSelector { .. }
        )
    }
}

/// Where a block was in its lifecycle when it failed.
///
/// Nodes Collected → Features Extracted → Roles Predicted → Fields Resolved
///
/// Field resolution never fails: an unresolvable field is left empty
/// and the acceptance rule decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockStage {
    CollectingNodes,
    ExtractingFeatures,
    PredictingRoles,
}

impl std::fmt::Display for BlockStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BlockStage::CollectingNodes    => "collecting nodes",
            BlockStage::ExtractingFeatures => "extracting features",
            BlockStage::PredictingRoles    => "predicting roles",
        };
        f.write_str(s)
    }
}

// ============================================================
// Layer 5 — ML Layer
// ============================================================
// Everything that learns or predicts. No HTML parsing and no
// file I/O here: rows come in as FeatureVectors, the artifact
// goes out as a plain serde value.
//
//   transform.rs  — column transform
//                   • standardised numeric columns
//                   • one-hot categorical columns (unseen → zeros)
//                   • binary passthrough
//
//   model.rs      — random forest
//                   bootstrap + class-balanced weighted Gini trees,
//                   grown in parallel with rayon
//
//   trainer.rs    — sufficiency check, split, fit, evaluate
//
//   inferencer.rs — ClassifierArtifact with its schema check,
//                   and the RolePredictor shared across workers

/// Standard scaler + one-hot encoder + passthrough
pub mod transform;

/// Bagged decision trees
pub mod model;

/// Fits the pipeline and scores it on held-out nodes
pub mod trainer;

/// Persisted classifier and role prediction
pub mod inferencer;

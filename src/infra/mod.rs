// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Handles the concerns that sit at the edge of the system:
//
//   checkpoint.rs      — Classifier persistence
//                        Saves the fitted artifact as JSON and the
//                        TrainConfig beside it; loading verifies the
//                        feature schema before anything predicts.
//
//   tokenizer_store.rs — Word analyzer
//                        Whitespace pre-tokenizer from `tokenizers`
//                        plus embedded stopword lists, injected into
//                        the feature extractor.
//
//   metrics.rs         — Evaluation report
//                        Per-role precision / recall / F1, printed as
//                        a table and written to evaluation.csv.
//
//   sink.rs            — Output files
//                        Records as JSON, collected blocks as HTML.

/// Classifier artifact and training config storage
pub mod checkpoint;

/// Tokenizer and stopword capability
pub mod tokenizer_store;

/// Classification report and CSV logger
pub mod metrics;

/// JSON record and HTML block writers
pub mod sink;

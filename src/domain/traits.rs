// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The seams between the core and its external collaborators:
//
//   TextAnalyzer — word tokenization + stopword membership,
//                  injected into the feature extractor
//   BlockSource  — discovery of the repeating news blocks on a
//                  listing page, handed to the resolver and the
//                  corpus collector as raw block markup
//
// Implementations:
//   - WordAnalyzer   (infra::tokenizer_store) → TextAnalyzer
//   - SelectorBlocks (data::blocks)           → BlockSource

use crate::domain::error::ScrapeError;

// ─── TextAnalyzer ─────────────────────────────────────────────────────────────
/// Immutable text capability shared by training and inference.
///
/// Must be `Send + Sync`: one analyzer is shared by every worker
/// thread resolving blocks.
pub trait TextAnalyzer: Send + Sync {
    /// Split text into word tokens, in order.
    fn tokenize(&self, text: &str) -> Result<Vec<String>, ScrapeError>;

    /// Whether an already lower-cased token is a stopword.
    fn is_stopword(&self, token: &str) -> bool;
}

// ─── BlockSource ──────────────────────────────────────────────────────────────
/// Anything that can hand out the outer HTML of each news block,
/// in page order.
pub trait BlockSource {
    fn blocks(&self) -> Result<Vec<String>, ScrapeError>;
}

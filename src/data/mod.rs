// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between raw HTML and classifier-ready rows.
//
// Training flows in this order:
//
//   labels.json + html dir
//       │
//       ▼
//   loader         → label map, labelled documents
//       │
//       ▼
//   html           → parsed block tree, candidate nodes
//       │
//       ▼
//   xpath          → positional identifiers bind labels to nodes
//       │
//       ▼
//   extractor      → one FeatureVector per node
//       │
//       ▼
//   dataset        → LabeledExample rows, class counts
//       │
//       ▼
//   splitter       → train / test
//
// At inference, `blocks` discovers the containers on a listing
// page and `html` + `extractor` are reused unchanged.

/// Label file (with `//` comments) and labelled document loading
pub mod loader;

/// Visible-text cleaning
pub mod preprocessor;

/// Parsed block tree: candidates, parents, depth, text
pub mod html;

/// Positional identifiers (`/div[1]/h2[1]`)
pub mod xpath;

/// DOM node → FeatureVector
pub mod extractor;

/// Labelled examples and class statistics
pub mod dataset;

/// Seeded stratified / random train-test split
pub mod splitter;

/// CSS-selector block discovery on a listing page
pub mod blocks;

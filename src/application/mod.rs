// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates all the other layers to accomplish
// one user-facing goal per module.
//
// Rules for this layer:
//   - No ML math or model code here
//   - No UI or printing here (that's Layer 1)
//   - Only workflow coordination
//
// Think of this layer as the "director" — it tells other
// layers what to do but doesn't do the work itself.

/// Labelled blocks → fitted classifier artifact
pub mod train_use_case;

/// Listing page → extracted records, via the classifier
pub mod extract_use_case;

/// Per-block selection and field resolution
pub mod resolver;

/// Listing page → block_N.html training files
pub mod collect_use_case;

/// Block files → label-file template
pub mod label_use_case;

/// Listing page → extracted records, via hard-coded selectors
pub mod fixed_selector;

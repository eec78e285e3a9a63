// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs, enums and traits that define what the
// system talks about: roles, feature vectors, extracted records,
// the error taxonomy and the seams to external collaborators.
//
// Rules for this layer:
//   - NO HTML parsing here
//   - NO file I/O
//   - NO model code

/// Closed role vocabulary (Title, Kicker, Image_URL, Other)
pub mod role;

/// Fixed-schema feature vector and its column groups
pub mod features;

/// Extracted news record, acceptance rule and title statistics
pub mod record;

/// Typed error taxonomy
pub mod error;

/// Text analyzer and block source abstractions
pub mod traits;

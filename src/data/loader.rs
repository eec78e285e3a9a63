// ============================================================
// Layer 4 — Label File & Corpus Loader
// ============================================================
// Loads the two training inputs:
//
//   labels.json  — document name → [{ "xpath": ..., "role": ... }]
//                  JSON with `//` line comments allowed
//   html dir     — one saved block per file (block_1.html, ...)
//
// Failure rules:
//   - missing label file or html directory  → fatal
//   - unparsable JSON or unknown role        → fatal
//   - a labelled document missing on disk    → skipped with a warning
//   - a document that cannot be read         → skipped with a warning
//
// Documents come back in label-file key order (BTreeMap) so a
// training run is reproducible regardless of directory order.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::error::ScrapeError;
use crate::domain::role::Role;

/// One `{xpath, role}` pair from the label file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEntry {
    pub xpath: String,
    pub role:  Role,
}

/// Document name → labels for that document.
pub type LabelMap = BTreeMap<String, Vec<LabelEntry>>;

/// A labelled HTML document read from disk.
#[derive(Debug, Clone)]
pub struct TrainingDocument {
    pub name:   String,
    pub markup: String,
    pub labels: Vec<LabelEntry>,
}

/// Remove `//` comments that start outside a JSON string.
/// Line structure is kept so parser errors still point at the right line.
pub fn strip_line_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());

    for (i, line) in text.lines().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&line[..comment_start(line).unwrap_or(line.len())]);
    }
    out
}

/// Byte offset of the first `//` outside a string literal.
fn comment_start(line: &str) -> Option<usize> {
    let mut in_string = false;
    let mut escaped   = false;
    let mut prev      = None;

    for (i, c) in line.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\'         => escaped = true,
                '"'          => in_string = false,
                _            => {}
            }
        } else if c == '"' {
            in_string = true;
        } else if c == '/' && prev == Some('/') {
            return Some(i - 1);
        }
        prev = Some(c);
    }
    None
}

/// Read and parse a label file.
pub fn load_label_file(path: &Path) -> Result<LabelMap, ScrapeError> {
    if !path.is_file() {
        return Err(ScrapeError::ConfigOrDataMissing { what: "label file", path: path.to_path_buf() });
    }

    let raw = fs::read_to_string(path).map_err(|e| ScrapeError::MalformedLabelFile {
        path:   path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let labels: LabelMap = serde_json::from_str(&strip_line_comments(&raw))
        .map_err(|e| ScrapeError::MalformedLabelFile { path: path.to_path_buf(), reason: e.to_string() })?;

    tracing::info!(
        "Loaded labels for {} documents ({} labelled nodes)",
        labels.len(),
        labels.values().map(Vec::len).sum::<usize>()
    );
    Ok(labels)
}

/// Reads the labelled documents out of an HTML directory.
pub struct CorpusLoader {
    html_dir: PathBuf,
}

impl CorpusLoader {
    pub fn new(html_dir: impl Into<PathBuf>) -> Self {
        Self { html_dir: html_dir.into() }
    }

    /// Load every document named in `labels`, skipping the ones that
    /// are absent or unreadable.
    pub fn load(&self, labels: &LabelMap) -> Result<Vec<TrainingDocument>, ScrapeError> {
        if !self.html_dir.is_dir() {
            return Err(ScrapeError::ConfigOrDataMissing {
                what: "html directory",
                path: self.html_dir.clone(),
            });
        }

        let mut docs = Vec::new();

        for (name, entries) in labels {
            let path = self.html_dir.join(name);

            if !path.is_file() {
                tracing::warn!(document = %name, "HTML file '{}' not found, skipping", path.display());
                continue;
            }

            match fs::read_to_string(&path) {
                Ok(markup) => {
                    tracing::debug!("Loaded: {} ({} bytes)", name, markup.len());
                    docs.push(TrainingDocument { name: name.clone(), markup, labels: entries.clone() });
                }
                Err(e) => {
                    let err = ScrapeError::DocumentParse { document: name.clone(), reason: e.to_string() };
                    tracing::warn!(document = %name, "Skipping: {}", err);
                }
            }
        }

        tracing::info!("Loaded {} of {} labelled documents", docs.len(), labels.len());
        Ok(docs)
    }
}

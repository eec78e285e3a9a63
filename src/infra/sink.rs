// ============================================================
// Layer 6 — Output Sinks
// ============================================================
// Where extracted records and collected blocks end up:
//
//   write_records — pretty JSON array, to a file or stdout
//   write_blocks  — block_1.html, block_2.html, ... in a directory

use anyhow::{Context, Result};
use serde::Serialize;
use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

/// Write `records` as a JSON array to `output`, or stdout when None.
pub fn write_records<T: Serialize>(records: &[T], output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Cannot create '{}'", parent.display()))?;
            }
            fs::write(path, json).with_context(|| format!("Cannot write '{}'", path.display()))?;
            tracing::info!("Wrote {} records to '{}'", records.len(), path.display());
        }
        None => {
            let mut out = io::stdout().lock();
            writeln!(out, "{json}")?;
        }
    }
    Ok(())
}

/// Save each block as `block_<n>.html` (1-based). Returns the paths written.
pub fn write_blocks(dir: &Path, blocks: &[String]) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("Cannot create '{}'", dir.display()))?;

    let mut paths = Vec::with_capacity(blocks.len());
    for (i, block) in blocks.iter().enumerate() {
        let path = dir.join(format!("block_{}.html", i + 1));
        fs::write(&path, block).with_context(|| format!("Cannot write '{}'", path.display()))?;
        paths.push(path);
    }

    tracing::debug!("Saved {} blocks under '{}'", paths.len(), dir.display());
    Ok(paths)
}

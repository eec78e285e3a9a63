// ============================================================
// Layer 2 — CollectUseCase
// ============================================================
// Builds a training corpus from a saved listing page: every news
// block discovered on the page is written to its own file,
// block_1.html ... block_N.html, ready to be labelled.

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::data::blocks::{SelectorBlocks, DEFAULT_BLOCK_SELECTOR};
use crate::domain::traits::BlockSource;
use crate::infra::sink::write_blocks;

#[derive(Debug, Clone)]
pub struct CollectConfig {
    pub page:       PathBuf,
    pub selector:   String,
    pub out_dir:    PathBuf,
    pub max_blocks: usize,
}

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            page:       PathBuf::from("page.html"),
            selector:   DEFAULT_BLOCK_SELECTOR.to_string(),
            out_dir:    PathBuf::from("training_data/html_blocks"),
            max_blocks: 50,
        }
    }
}

pub struct CollectUseCase {
    config: CollectConfig,
}

impl CollectUseCase {
    pub fn new(config: CollectConfig) -> Self {
        Self { config }
    }

    /// Returns the paths of the block files written.
    pub fn execute(&self) -> Result<Vec<PathBuf>> {
        let cfg    = &self.config;
        let source = SelectorBlocks::from_file(Path::new(&cfg.page), &cfg.selector)?;
        let mut blocks = source.blocks()?;

        if blocks.len() > cfg.max_blocks {
            tracing::info!("Keeping the first {} of {} blocks", cfg.max_blocks, blocks.len());
            blocks.truncate(cfg.max_blocks);
        }

        let paths = write_blocks(&cfg.out_dir, &blocks)?;
        tracing::info!("Saved {} blocks to '{}'", paths.len(), cfg.out_dir.display());
        Ok(paths)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::tests::news_block;
    use std::fs;

    #[test]
    fn test_collect_respects_limit() {
        let dir  = tempfile::tempdir().unwrap();
        let page = dir.path().join("page.html");
        let body: String = (1..=5).map(news_block).collect();
        fs::write(&page, format!("<html><body>{body}</body></html>")).unwrap();

        let out   = dir.path().join("blocks");
        let paths = CollectUseCase::new(CollectConfig {
            page,
            out_dir: out.clone(),
            max_blocks: 3,
            ..CollectConfig::default()
        })
        .execute()
        .unwrap();

        assert_eq!(paths.len(), 3);
        assert!(out.join("block_3.html").is_file());
        assert!(!out.join("block_4.html").exists());
        assert!(fs::read_to_string(out.join("block_2.html")).unwrap().contains("item-2"));
    }
}

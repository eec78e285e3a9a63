// ============================================================
// Layer 4 — Block Discovery
// ============================================================
// Finds the repeating news containers on a saved listing page
// with a CSS selector and hands out their outer HTML, in page
// order. Both `extract` and `collect` start here.

use std::fs;
use std::path::Path;

use scraper::{Html, Selector};

use crate::domain::error::ScrapeError;
use crate::domain::traits::BlockSource;

/// Container selector of the listing page the crate was built for.
pub const DEFAULT_BLOCK_SELECTOR: &str = "div.contenedor_dato_modulo";

/// Compile a CSS selector, keeping the parser's message.
pub fn parse_selector(selector: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(selector).map_err(|e| ScrapeError::InvalidSelector {
        selector: selector.to_string(),
        reason:   e.to_string(),
    })
}

pub struct SelectorBlocks {
    page:     String,
    selector: Selector,
}

impl SelectorBlocks {
    pub fn new(page: impl Into<String>, selector: &str) -> Result<Self, ScrapeError> {
        Ok(Self { page: page.into(), selector: parse_selector(selector)? })
    }

    /// Read a saved listing page from disk.
    pub fn from_file(path: &Path, selector: &str) -> Result<Self, ScrapeError> {
        if !path.is_file() {
            return Err(ScrapeError::ConfigOrDataMissing { what: "listing page", path: path.to_path_buf() });
        }
        let page = fs::read_to_string(path).map_err(|e| ScrapeError::DocumentParse {
            document: path.display().to_string(),
            reason:   e.to_string(),
        })?;
        Self::new(page, selector)
    }
}

impl BlockSource for SelectorBlocks {
    fn blocks(&self) -> Result<Vec<String>, ScrapeError> {
        let document = Html::parse_document(&self.page);
        let blocks: Vec<String> = document.select(&self.selector).map(|b| b.html()).collect();
        tracing::info!("Found {} blocks on the page", blocks.len());
        Ok(blocks)
    }
}

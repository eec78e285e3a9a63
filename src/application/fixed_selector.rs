// ============================================================
// Layer 2 — Fixed-Selector Scraper
// ============================================================
// The hand-written extractor the learned one replaces. It knows
// the exact markup of the listing page and breaks as soon as
// that markup changes; `scrape` keeps it around for comparison.
//
// Per block:
//   kicker — div.volanta_titulo div.volanta
//   title  — div.volanta_titulo h2.titulo a       (text + href)
//            else div.volanta_titulo h2.titulo    (text), with the
//            link taken from the first a[href] starting with
//            "http" or "/"
//   image  — div.imagen a img, else div.imagen img
//
// The same acceptance rule applies: no title or no link, no record.

use anyhow::{Context, Result};
use scraper::{ElementRef, Html, Selector};
use std::path::{Path, PathBuf};
use url::Url;

use crate::application::resolver::DEFAULT_BASE_URL;
use crate::data::blocks::{parse_selector, SelectorBlocks, DEFAULT_BLOCK_SELECTOR};
use crate::data::html::{non_blank_attr, visible_text};
use crate::domain::error::ScrapeError;
use crate::domain::record::{ExtractedRecord, ResolvedFields};
use crate::domain::traits::BlockSource;
use crate::infra::sink::write_records;

#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub page:     PathBuf,
    pub base_url: String,
    pub selector: String,
    pub output:   Option<PathBuf>,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            page:     PathBuf::from("page.html"),
            base_url: DEFAULT_BASE_URL.to_string(),
            selector: DEFAULT_BLOCK_SELECTOR.to_string(),
            output:   None,
        }
    }
}

pub struct FixedSelectorScraper {
    kicker:       Selector,
    title_link:   Selector,
    title:        Selector,
    any_link:     Selector,
    image_linked: Selector,
    image:        Selector,
    base_url:     Url,
}

impl FixedSelectorScraper {
    pub fn new(base_url: Url) -> Result<Self, ScrapeError> {
        Ok(Self {
            kicker:       parse_selector("div.volanta_titulo div.volanta")?,
            title_link:   parse_selector("div.volanta_titulo h2.titulo a")?,
            title:        parse_selector("div.volanta_titulo h2.titulo")?,
            any_link:     parse_selector("a[href]")?,
            image_linked: parse_selector("div.imagen a img")?,
            image:        parse_selector("div.imagen img")?,
            base_url,
        })
    }

    /// Extract one block's record, or None if title or link is missing.
    pub fn scrape_block(&self, markup: &str) -> Option<ExtractedRecord> {
        let fragment = Html::parse_fragment(markup);
        let root     = fragment.root_element();
        let first    = |sel: &Selector| root.select(sel).next();

        let kicker = first(&self.kicker).map(visible_text).filter(|k| !k.is_empty());

        let (title, link) = match first(&self.title_link) {
            Some(a) => (Some(visible_text(a)), non_blank_attr(a, "href").and_then(|h| self.absolute(h))),
            None => {
                let title = first(&self.title).map(visible_text);
                let link  = root
                    .select(&self.any_link)
                    .filter_map(|a| non_blank_attr(a, "href"))
                    .find(|h| h.starts_with("http") || h.starts_with('/'))
                    .and_then(|h| self.absolute(h));
                (title, link)
            }
        };

        let image_url = first(&self.image_linked)
            .or_else(|| first(&self.image))
            .and_then(|img: ElementRef<'_>| non_blank_attr(img, "src"))
            .and_then(|src| self.absolute(src));

        ResolvedFields { title, kicker, image_url, link }.into_record()
    }

    fn absolute(&self, reference: &str) -> Option<String> {
        self.base_url.join(reference).ok().map(|u| u.to_string())
    }
}

/// Run the fixed-selector scraper over a saved page.
pub struct ScrapeUseCase {
    config: ScrapeConfig,
}

impl ScrapeUseCase {
    pub fn new(config: ScrapeConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<Vec<ExtractedRecord>> {
        let cfg      = &self.config;
        let base_url = Url::parse(&cfg.base_url)
            .with_context(|| format!("Invalid base URL '{}'", cfg.base_url))?;
        let scraper  = FixedSelectorScraper::new(base_url)?;
        let blocks   = SelectorBlocks::from_file(Path::new(&cfg.page), &cfg.selector)?.blocks()?;

        let records: Vec<ExtractedRecord> = blocks.iter().filter_map(|b| scraper.scrape_block(b)).collect();
        tracing::info!("Fixed selectors extracted {} of {} blocks", records.len(), blocks.len());

        write_records(&records, cfg.output.as_deref())?;
        Ok(records)
    }
}

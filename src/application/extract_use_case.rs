// ============================================================
// Layer 2 — ExtractUseCase
// ============================================================
// Runs the learned extractor over a saved listing page:
//
//   Step 1: Load the classifier and its analyzer   (Layer 6 / 5)
//   Step 2: Discover the news blocks                (Layer 4)
//   Step 3: Resolve every block in parallel         (rayon)
//   Step 4: Tally accepted / rejected / failed
//   Step 5: Write the records to the output file or stdout
//
// Blocks are independent: each worker parses its own block and
// shares the predictor read-only. `collect` on an indexed
// parallel iterator keeps page order, so records come out in the
// order their blocks appear.

use anyhow::{Context, Result};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use url::Url;

use crate::application::resolver::{RoleResolver, DEFAULT_BASE_URL};
use crate::data::blocks::{SelectorBlocks, DEFAULT_BLOCK_SELECTOR};
use crate::domain::record::{OutputRecord, TitleStats};
use crate::domain::traits::BlockSource;
use crate::infra::checkpoint::ArtifactStore;
use crate::infra::sink::write_records;
use crate::ml::inferencer::RolePredictor;

#[derive(Debug, Clone)]
pub struct ExtractConfig {
    pub page:        PathBuf,
    pub model_dir:   String,
    pub base_url:    String,
    pub selector:    String,
    pub output:      Option<PathBuf>,
    pub title_stats: bool,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            page:        PathBuf::from("page.html"),
            model_dir:   "models".to_string(),
            base_url:    DEFAULT_BASE_URL.to_string(),
            selector:    DEFAULT_BLOCK_SELECTOR.to_string(),
            output:      None,
            title_stats: false,
        }
    }
}

#[derive(Debug)]
pub struct ExtractSummary {
    pub records:  Vec<OutputRecord>,
    pub blocks:   usize,
    pub accepted: usize,
    pub rejected: usize,
    pub failed:   usize,
}

pub struct ExtractUseCase {
    config: ExtractConfig,
}

impl ExtractUseCase {
    pub fn new(config: ExtractConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<ExtractSummary> {
        let cfg = &self.config;

        // ── Step 1: Classifier ───────────────────────────────────────────────
        let store     = ArtifactStore::new(&cfg.model_dir);
        let artifact  = store.load_artifact()?;
        match store.load_config() {
            Ok(trained) => tracing::info!(
                "Classifier trained on '{}' ({} trees, seed {})",
                trained.html_dir, trained.n_trees, trained.seed
            ),
            Err(e) => tracing::debug!("No training config next to the artifact: {:#}", e),
        }
        let predictor = RolePredictor::new(artifact)?;
        let base_url  = Url::parse(&cfg.base_url)
            .with_context(|| format!("Invalid base URL '{}'", cfg.base_url))?;

        // ── Step 2: Blocks ───────────────────────────────────────────────────
        let source = SelectorBlocks::from_file(Path::new(&cfg.page), &cfg.selector)?;
        let blocks = source.blocks()?;

        // ── Step 3: Resolve in parallel ──────────────────────────────────────
        let summary = resolve_blocks(&RoleResolver::new(&predictor, base_url), &blocks, cfg.title_stats);

        // ── Step 5: Output ───────────────────────────────────────────────────
        write_records(&summary.records, cfg.output.as_deref())?;
        Ok(summary)
    }
}

/// Resolve every block, keeping page order, and count the outcomes.
pub fn resolve_blocks(resolver: &RoleResolver<'_>, blocks: &[String], title_stats: bool) -> ExtractSummary {
    let outcomes: Vec<_> = blocks
        .par_iter()
        .enumerate()
        .map(|(i, markup)| resolver.resolve(i, markup))
        .collect();

    // ── Step 4: Tally ────────────────────────────────────────────────────────
    let mut summary = ExtractSummary {
        records:  Vec::new(),
        blocks:   blocks.len(),
        accepted: 0,
        rejected: 0,
        failed:   0,
    };

    for (i, outcome) in outcomes.into_iter().enumerate() {
        match outcome {
            Ok(Some(record)) => {
                summary.accepted += 1;
                let stats = title_stats.then(|| TitleStats::of(&record.title));
                summary.records.push(OutputRecord { record, title_stats: stats });
            }
            Ok(None) => summary.rejected += 1,
            Err(e) if e.is_fatal() => {
                tracing::error!(block = i + 1, "Block failed: {}", e);
                summary.failed += 1;
            }
            Err(e) => {
                tracing::warn!(block = i + 1, "Skipping block: {}", e);
                summary.failed += 1;
            }
        }
    }

    tracing::info!(
        "Processed {} blocks: {} accepted, {} rejected, {} failed",
        summary.blocks,
        summary.accepted,
        summary.rejected,
        summary.failed
    );
    summary
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::tests::{news_block, write_corpus};
    use crate::application::train_use_case::TrainUseCase;
    use crate::ml::inferencer::tests::toy_artifact;
    use std::fs;

    #[test]
    fn test_records_keep_block_order() {
        let predictor = RolePredictor::new(toy_artifact()).unwrap();
        let resolver  = RoleResolver::new(&predictor, Url::parse(DEFAULT_BASE_URL).unwrap());

        let blocks: Vec<String> = (1..=8)
            .map(|i| format!(r#"<div><h2>Story {i}</h2><a href="/s/{i}"><img src="/i/{i}.jpg"></a></div>"#))
            .chain(["<div><h2>No link</h2></div>".to_string(), "plain text".to_string()])
            .collect();

        let summary = resolve_blocks(&resolver, &blocks, true);
        assert_eq!(summary.blocks, 10);
        assert_eq!((summary.accepted, summary.rejected, summary.failed), (8, 1, 1));

        let titles: Vec<&str> = summary.records.iter().map(|r| r.record.title.as_str()).collect();
        assert_eq!(titles, (1..=8).map(|i| format!("Story {i}")).collect::<Vec<_>>());

        let stats = summary.records[0].title_stats.as_ref().unwrap();
        assert_eq!(stats.word_count, 2);
        assert_eq!(stats.capital_words, vec!["Story"]);
    }

    #[test]
    fn test_train_then_extract() {
        let (dir, train_cfg) = write_corpus(12);
        TrainUseCase::new(train_cfg.clone()).execute().unwrap();

        let page = dir.path().join("page.html");
        let body: String = (20..24).map(news_block).collect();
        fs::write(&page, format!("<html><body>{body}</body></html>")).unwrap();
        let output = dir.path().join("out/records.json");

        let summary = ExtractUseCase::new(ExtractConfig {
            page,
            model_dir: train_cfg.model_dir.clone(),
            output: Some(output.clone()),
            ..ExtractConfig::default()
        })
        .execute()
        .unwrap();

        assert_eq!(summary.blocks, 4);
        assert_eq!(summary.accepted, 4);
        let first = &summary.records[0].record;
        assert_eq!(first.link, "https://www.yogonet.com/news/item-20");
        assert_eq!(first.image_url, "https://www.yogonet.com/img/20.jpg");
        assert_eq!(first.kicker, "SECTION 20");
        assert!(first.title.starts_with("Operator number 20"));

        let written: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written.as_array().unwrap().len(), 4);
        assert_eq!(written[0]["link"], "https://www.yogonet.com/news/item-20");
        assert!(written[0].get("title_stats").is_none());
    }
}

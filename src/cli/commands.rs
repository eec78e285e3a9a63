// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the five subcommands and all their configurable flags:
//
//   train    labelled blocks → classifier
//   extract  saved listing page → records (learned)
//   collect  saved listing page → block_N.html files
//   label    block files → label-file template
//   scrape   saved listing page → records (fixed selectors)
//
// clap's derive macros automatically generate help text, error
// messages for missing args and type conversion.

use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::application::{
    collect_use_case::CollectConfig,
    extract_use_case::ExtractConfig,
    fixed_selector::ScrapeConfig,
    label_use_case::LabelConfig,
    resolver::DEFAULT_BASE_URL,
    train_use_case::TrainConfig,
};
use crate::data::blocks::DEFAULT_BLOCK_SELECTOR;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the role classifier on labelled HTML blocks
    Train(TrainArgs),

    /// Extract news records from a saved listing page with the classifier
    Extract(ExtractArgs),

    /// Split a saved listing page into block files for labelling
    Collect(CollectArgs),

    /// Print a label-file template for block files
    Label(LabelArgs),

    /// Extract news records with the hard-coded selectors
    Scrape(ScrapeArgs),
}

/// All arguments for the `train` command.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Label file: document name → [{xpath, role}], `//` comments allowed
    #[arg(long, default_value = "training_data/labels.json")]
    pub labels: String,

    /// Directory holding the labelled block files
    #[arg(long, default_value = "training_data/html_blocks")]
    pub html_dir: String,

    /// Directory to save the classifier, config and evaluation
    #[arg(long, env = "NEWS_MODEL_DIR", default_value = "models")]
    pub model_dir: String,

    /// Fraction of nodes held out for evaluation
    #[arg(long, default_value_t = 0.3)]
    pub test_fraction: f64,

    /// Seed for the split, bootstrap samples and feature sampling
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Number of trees in the forest
    #[arg(long, default_value_t = 150)]
    pub trees: usize,

    /// Maximum depth of each tree
    #[arg(long, default_value_t = 25)]
    pub max_depth: usize,

    /// Minimum number of nodes in a leaf
    #[arg(long, default_value_t = 2)]
    pub min_samples_leaf: usize,

    /// Disable class-balanced sample weights
    #[arg(long)]
    pub unbalanced: bool,

    /// Stopword language for the stopword_ratio feature
    #[arg(long, default_value = "english")]
    pub stopwords: String,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            labels_file:       a.labels,
            html_dir:          a.html_dir,
            model_dir:         a.model_dir,
            test_fraction:     a.test_fraction,
            seed:              a.seed,
            n_trees:           a.trees,
            max_depth:         a.max_depth,
            min_samples_leaf:  a.min_samples_leaf,
            balanced:          !a.unbalanced,
            stopword_language: a.stopwords,
        }
    }
}

/// All arguments for the `extract` command
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Saved listing page (rendered HTML)
    #[arg(long)]
    pub page: PathBuf,

    /// Directory the classifier was saved to
    #[arg(long, env = "NEWS_MODEL_DIR", default_value = "models")]
    pub model_dir: String,

    /// Base URL relative links are resolved against
    #[arg(long, env = "NEWS_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// CSS selector of one news block
    #[arg(long, default_value = DEFAULT_BLOCK_SELECTOR)]
    pub selector: String,

    /// Write records here instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Add word count, character count and capitalised words of each title
    #[arg(long)]
    pub title_stats: bool,
}

impl From<ExtractArgs> for ExtractConfig {
    fn from(a: ExtractArgs) -> Self {
        ExtractConfig {
            page:        a.page,
            model_dir:   a.model_dir,
            base_url:    a.base_url,
            selector:    a.selector,
            output:      a.output,
            title_stats: a.title_stats,
        }
    }
}

/// All arguments for the `collect` command
#[derive(Args, Debug)]
pub struct CollectArgs {
    /// Saved listing page (rendered HTML)
    #[arg(long)]
    pub page: PathBuf,

    /// CSS selector of one news block
    #[arg(long, default_value = DEFAULT_BLOCK_SELECTOR)]
    pub selector: String,

    /// Directory to write block_N.html files into
    #[arg(long, default_value = "training_data/html_blocks")]
    pub out_dir: PathBuf,

    /// Stop after this many blocks
    #[arg(long, default_value_t = 50)]
    pub max_blocks: usize,
}

impl From<CollectArgs> for CollectConfig {
    fn from(a: CollectArgs) -> Self {
        CollectConfig {
            page:       a.page,
            selector:   a.selector,
            out_dir:    a.out_dir,
            max_blocks: a.max_blocks,
        }
    }
}

/// All arguments for the `label` command
#[derive(Args, Debug)]
pub struct LabelArgs {
    /// Block files to list candidate nodes for
    #[arg(required = true)]
    pub blocks: Vec<PathBuf>,
}

impl From<LabelArgs> for LabelConfig {
    fn from(a: LabelArgs) -> Self {
        LabelConfig { blocks: a.blocks }
    }
}

/// All arguments for the `scrape` command
#[derive(Args, Debug)]
pub struct ScrapeArgs {
    /// Saved listing page (rendered HTML)
    #[arg(long)]
    pub page: PathBuf,

    /// Base URL relative links are resolved against
    #[arg(long, env = "NEWS_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// CSS selector of one news block
    #[arg(long, default_value = DEFAULT_BLOCK_SELECTOR)]
    pub selector: String,

    /// Write records here instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl From<ScrapeArgs> for ScrapeConfig {
    fn from(a: ScrapeArgs) -> Self {
        ScrapeConfig {
            page:     a.page,
            base_url: a.base_url,
            selector: a.selector,
            output:   a.output,
        }
    }
}

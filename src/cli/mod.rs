// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// The entry point for all user interaction. Parses arguments
// with clap, hands a plain config to the matching use case and
// prints what comes back. No extraction logic lives here.

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{CollectArgs, Commands, ExtractArgs, LabelArgs, ScrapeArgs, TrainArgs};

#[derive(Parser, Debug)]
#[command(
    name = "news-role-extractor",
    version,
    about = "Learn the role of DOM nodes in news blocks, then extract title, kicker, image and link."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Dispatch to the matching use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)   => run_train(args),
            Commands::Extract(args) => run_extract(args),
            Commands::Collect(args) => run_collect(args),
            Commands::Label(args)   => run_label(args),
            Commands::Scrape(args)  => run_scrape(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Training on blocks in: {}", args.html_dir);
    let summary = TrainUseCase::new(args.into()).execute()?;

    println!("Dataset: {} nodes", summary.examples);
    for (role, n) in &summary.distribution {
        println!("  {:<10} {}", role.as_str(), n);
    }
    println!(
        "\nEvaluation ({:?} split, {} train / {} test):\n{}",
        summary.split_kind, summary.train_size, summary.test_size, summary.report
    );
    println!("Classifier saved to '{}'", summary.artifact_path.display());
    Ok(())
}

fn run_extract(args: ExtractArgs) -> Result<()> {
    use crate::application::extract_use_case::ExtractUseCase;

    let summary = ExtractUseCase::new(args.into()).execute()?;

    eprintln!(
        "{} blocks: {} accepted, {} rejected, {} failed",
        summary.blocks, summary.accepted, summary.rejected, summary.failed
    );
    Ok(())
}

fn run_collect(args: CollectArgs) -> Result<()> {
    use crate::application::collect_use_case::CollectUseCase;

    let paths = CollectUseCase::new(args.into()).execute()?;
    println!("Saved {} block files", paths.len());
    Ok(())
}

fn run_label(args: LabelArgs) -> Result<()> {
    use crate::application::label_use_case::LabelUseCase;

    print!("{}", LabelUseCase::new(args.into()).execute()?);
    Ok(())
}

fn run_scrape(args: ScrapeArgs) -> Result<()> {
    use crate::application::fixed_selector::ScrapeUseCase;

    let records = ScrapeUseCase::new(args.into()).execute()?;
    eprintln!("{} records", records.len());
    Ok(())
}

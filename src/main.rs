use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};

use citation_scout::search::{ArxivClient, PaperSource, SemanticScholarClient};
use citation_scout::{config::Config, report, utils, Catalog, RunOrchestrator};

/// Find papers that reference the tracked projects and write them to CSV.
#[derive(Debug, Parser)]
#[command(name = "citation-scout", version, about)]
struct Cli {
    /// Number of full passes over every source
    #[arg(long)]
    passes: Option<usize>,

    /// Destination CSV file
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Skip the arXiv source
    #[arg(long)]
    no_arxiv: bool,

    /// Skip the Semantic Scholar source
    #[arg(long)]
    no_semantic_scholar: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::from_env()?;
    if let Some(passes) = cli.passes {
        config.run.passes = passes;
    }
    if let Some(output) = cli.output {
        config.run.output = output;
    }
    if cli.no_arxiv {
        config.arxiv.enabled = false;
    }
    if cli.no_semantic_scholar {
        config.semantic_scholar.enabled = false;
    }

    let _log_guard = utils::init_logger(&config.log);
    info!(passes = config.run.passes, output = %config.run.output.display(), "Configuration loaded");

    let catalog = Catalog::reference()?;
    info!(
        projects = catalog.len(),
        phrases = catalog.phrase_count(),
        "Catalog loaded"
    );

    let mut sources: Vec<Box<dyn PaperSource>> = Vec::new();
    if config.arxiv.enabled {
        sources.push(Box::new(ArxivClient::from_config(
            &config.arxiv,
            &config.run.user_agent,
            config.run.request_timeout,
        )?));
    }
    if config.semantic_scholar.enabled {
        sources.push(Box::new(SemanticScholarClient::from_config(
            &config.semantic_scholar,
            &config.run.user_agent,
            config.run.request_timeout,
        )?));
    }
    if sources.is_empty() {
        warn!("All sources disabled, the report will be empty");
    }

    let orchestrator = RunOrchestrator::new(catalog, sources)
        .with_passes(config.run.passes)
        .with_pass_pause(config.run.pass_pause);
    let state = orchestrator.run().await;

    let rows = report::write_csv(&config.run.output, &state.table)?;
    info!(rows, papers = state.seen.len(), "Run complete");

    println!("\nTally by project:");
    for (project, count) in report::tally(&state.table) {
        println!("{}: {} papers", project, count);
    }

    Ok(())
}

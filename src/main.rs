//! Command-line entry point for the batch screenshot runner

use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use sitesnap::{discover_pages, run_batch, BrowserSession, CdpRenderer, PageRenderer, RunConfig};
use std::sync::Arc;

/// Screenshot every HTML page of a static site tree at desktop and mobile
/// viewport sizes.
#[derive(Parser, Debug)]
#[command(name = "sitesnap", version, about)]
struct Cli {
    /// Root directory of the generated site to render
    #[arg(long)]
    site_dir: String,

    /// Directory the mirrored PNG tree is written to
    #[arg(long)]
    output_dir: String,
}

#[tokio::main]
async fn main() {
    env_logger::init();
    if let Err(err) = run().await {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = RunConfig {
        site_dir: cli.site_dir,
        output_dir: cli.output_dir,
    };

    // Only locally generated, trusted HTML is rendered here.
    println!("starting chrome without a sandbox");
    let session = BrowserSession::launch()?;

    println!("taking screenshots of all pages in {}", config.site_dir);
    println!("writing screenshots to {}", config.output_dir);

    let tasks = discover_pages(&config)?;
    let progress = ProgressBar::new(tasks.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("screenshotting {pos} of {len}, estimated {eta} remaining")
            .context("Invalid progress template")?,
    );

    let renderer: Arc<dyn PageRenderer> = Arc::new(CdpRenderer::new(session));
    let report = run_batch(Arc::clone(&renderer), tasks, num_cpus::get(), &progress).await;
    progress.finish_and_clear();

    println!("closing chrome");
    drop(renderer);

    if report.is_success() {
        println!("all done!");
        Ok(())
    } else {
        for (task, err) in &report.failed {
            eprintln!("{}: {}", task.source_path, err);
        }
        anyhow::bail!(
            "{} of {} pages failed",
            report.failed.len(),
            report.completed + report.failed.len()
        );
    }
}

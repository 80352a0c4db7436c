// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing) on stderr
// 3. Crawl the site
// 4. Write the results to <host>_<timestamp>.json and print a summary
// 5. Exit 0 once the crawl finishes, however many pages failed along the way
//    (only bad arguments or an unwritable output file exit non-zero)
// =============================================================================

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use tracing_subscriber::EnvFilter;

use site_crawler::{crawl_website, write_results};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // A finished crawl exits 0 however many pages failed; bad input exits 1
    let exit_code = match run(cli).await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    };

    std::process::exit(exit_code);
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.crawl_config();

    println!("🔍 Crawling: {}", cli.host);
    println!("📊 Max depth: {}, concurrent fetches: {}", config.depth_limit, config.rate_limit);

    let report = crawl_website(&cli.host, &config)
        .await
        .with_context(|| format!("could not crawl {}", cli.host))?;

    let path = write_results(&config.output_dir, &report.host, &report.records)
        .context("could not save results")?;

    println!(
        "📄 Crawled {} page(s) in {:.2}s",
        report.summary.pages,
        report.summary.elapsed.as_secs_f64()
    );
    println!("💾 Results written to {}", path.display());

    Ok(())
}

// RUST_LOG wins when set, otherwise info (or debug with --verbose).
// Logs go to stderr so stdout only carries the summary above.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "info,site_crawler=debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

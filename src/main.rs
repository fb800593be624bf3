// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging
// 3. Load config.json (a bad config stops us before any request is made)
// 4. Run the crawl
// 5. Print a summary and exit with a proper code
//    (0 = finished, 1 = aborted by a ban or an invalid user, 2 = error)
// =============================================================================

// Module declarations - tells Rust about our other source files
mod api; // src/api/ - HTTP client and fans page parsing
mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - config.json loading
mod crawl; // src/crawl/ - frontier and crawl loop
mod error; // src/error.rs - typed errors
mod normalize; // src/normalize/ - count parsing and text clean-up
mod record; // src/record/ - the user row and how it's built
mod store; // src/store.rs - the CSV dataset

use anyhow::Result;
use api::WeiboClient;
use clap::Parser;
use cli::Cli;
use config::Config;
use crawl::{AbortReason, CrawlOrchestrator, CrawlOutcome, CrawlReport, CrawlSettings};
use error::CrawlError;
use normalize::TextSanitizer;
use record::UserRecordBuilder;
use store::CsvStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            if e.downcast_ref::<CrawlError>().is_some_and(CrawlError::is_config) {
                eprintln!("Config error: {:#}", e);
            } else {
                eprintln!("Error: {:#}", e);
            }
            2
        }
    };

    std::process::exit(exit_code);
}

// RUST_LOG wins; otherwise info, or debug with --verbose
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

// Returns:
//   Ok(0) = crawl finished (possibly with fewer users than asked for)
//   Ok(1) = crawl aborted
//   Err   = config, network or file error
async fn run(cli: Cli) -> Result<i32> {
    let config = Config::load(&cli.config)?;
    let output_path = cli.output.unwrap_or_else(|| config.output_path.clone());

    println!("🔍 Crawling {} Weibo user(s)", config.population_target());
    println!("📄 Seeds: {}", config.user_id_list.len());
    println!("💾 Output: {}", output_path.display());

    let client = WeiboClient::new(config.cookie.as_deref())?;
    // Only read the existing dataset when we need to know who's already in it
    let store = if config.skip_recorded {
        CsvStore::open_indexed(&output_path)?
    } else {
        CsvStore::open(&output_path)?
    };
    let builder = UserRecordBuilder::new(TextSanitizer::new(config.output_charset));

    let orchestrator = CrawlOrchestrator::new(
        client,
        store,
        builder,
        config.user_id_list.clone(),
        CrawlSettings::from_config(&config),
    );
    let report = orchestrator.run().await?;

    print_summary(&report);

    Ok(if report.is_aborted() { 1 } else { 0 })
}

fn print_summary(report: &CrawlReport) {
    println!();
    println!("📊 Summary:");
    println!("   ✅ Written: {}/{}", report.processed, report.target);
    println!("   ⏭️  Skipped: {}", report.skipped.len());
    println!("   📋 Queued: {}", report.frontier.len());

    match &report.outcome {
        CrawlOutcome::Finished if report.is_complete() => println!("✅ Done"),
        CrawlOutcome::Finished => println!("⚠️  Ran out of users before reaching the target"),
        CrawlOutcome::Aborted {
            uid,
            reason: AbortReason::Banned { status },
        } => println!(
            "❌ Stopped at {}: HTTP {}, probably banned. Wait a while before trying again",
            uid, status
        ),
        CrawlOutcome::Aborted {
            uid,
            reason: AbortReason::InvalidUser,
        } => println!(
            "❌ Stopped at {}: invalid or blocked user (set \"on_invalid_user\": \"skip\" to continue past it)",
            uid
        ),
    }
}

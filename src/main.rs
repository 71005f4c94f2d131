// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap (invalid values stop us here)
// 2. Set up logging to stderr
// 3. Build a tokio runtime with --maxprocs worker threads
// 4. Crawl the site and print the sitemap to stdout
// 5. Print any errors to stderr
// 6. Exit with proper code (0 = done, 1 = errors with --strict, 2 = internal error)
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - settings for one crawl
mod crawl; // src/crawl/ - the concurrent crawler
mod error; // src/error.rs - errors recorded during a crawl
mod fetcher; // src/fetcher/ - HTTP page retrieval
mod parser; // src/parser/ - finding links in HTML
mod report; // src/report.rs - printing results

use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::CrawlConfig;
use fetcher::HttpFetcher;

fn main() {
    // Parse before anything else: a bad flag exits right here with clap's message
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Logs go to stderr so they never mix with the sitemap on stdout.
// RUST_LOG wins over --verbose when both are set.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "sitemap_builder=debug"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(io::stderr)
        .init();
}

// This is the main application logic
// Returns:
//   Ok(0) = crawl finished
//   Ok(1) = crawl finished with errors and --strict was given
//   Err = runtime, HTTP client or output failure
fn run(cli: Cli) -> Result<i32> {
    // --maxprocs controls how many OS threads drive the crawl
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(cli.maxprocs)
        .enable_all()
        .build()
        .context("could not start the async runtime")?;

    let config = CrawlConfig::from(&cli);
    let fetcher = HttpFetcher::new(&config).context("could not build the HTTP client")?;

    let result = runtime.block_on(crawl::build(&cli.url, Arc::new(fetcher), &config));

    // Print the report first, then the errors, so partial results are always shown
    let rendered = {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        if cli.json {
            report::write_json(&mut out, &result)
        } else {
            report::write_tree(&mut out, &result.site_map).map_err(anyhow::Error::from)
        }
    };

    report::write_errors(&mut io::stderr().lock(), &result.errors)
        .context("could not print crawl errors")?;
    rendered.context("could not print the sitemap")?;

    if cli.strict && !result.errors.is_empty() {
        return Ok(1);
    }
    Ok(0)
}

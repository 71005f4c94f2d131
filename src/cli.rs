// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Every flag can also come from an environment variable (the `env` feature),
// which is handy in CI where the seed URL is usually configured once.
//
// Values that must be at least 1 (depth, cap, maxprocs, timeout) are checked
// here by a custom value parser, so an invalid value stops the process with a
// descriptive message before any crawling starts.
//
// Rust concepts:
// - Derive macros: #[derive(Parser)] generates the parsing code for us
// - Custom value parsers: plain functions returning Result<T, String>
// =============================================================================

use clap::Parser;

// This struct represents our entire CLI application
#[derive(Parser, Debug)]
#[command(
    name = "sitemap-builder",
    version,
    about = "Crawl a website and print the internal links of every page",
    long_about = "sitemap-builder starts from a seed URL, follows links that stay on the same host \
                  up to a maximum depth, and prints which pages link to which."
)]
pub struct Cli {
    /// The starting URL (e.g., https://example.com)
    #[arg(long, env = "SITEMAP_URL")]
    pub url: String,

    /// Maximum depth when following links
    ///
    /// Depth 1 = the starting page plus the pages it links to
    #[arg(long = "max-depth", env = "SITEMAP_MAX_DEPTH", default_value_t = 3, value_parser = at_least_one)]
    pub max_depth: usize,

    /// Maximum number of pages fetched at the same time
    #[arg(long, env = "SITEMAP_CAP", default_value_t = 40, value_parser = at_least_one)]
    pub cap: usize,

    /// Number of OS threads driving the crawl
    #[arg(long, env = "SITEMAP_MAXPROCS", default_value_t = 4, value_parser = at_least_one)]
    pub maxprocs: usize,

    /// Timeout in seconds for a single page request
    #[arg(long, env = "SITEMAP_TIMEOUT", default_value_t = 10, value_parser = at_least_one_u64)]
    pub timeout: u64,

    /// Optional limit in seconds for the whole crawl; results are partial when it hits
    #[arg(long, env = "SITEMAP_DEADLINE", value_parser = at_least_one_u64)]
    pub deadline: Option<u64>,

    /// Accepted Content-Type (repeatable, default: text/html)
    #[arg(long = "content-type", value_name = "TYPE")]
    pub content_types: Vec<String>,

    /// Output the sitemap and errors as JSON instead of a tree
    #[arg(long)]
    pub json: bool,

    /// Exit with code 1 when any error was recorded during the crawl
    #[arg(long)]
    pub strict: bool,

    /// Log every task and discarded link to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

fn at_least_one(value: &str) -> Result<usize, String> {
    let parsed: usize = value
        .parse()
        .map_err(|e| format!("expected a whole number, got {:?}: {}", value, e))?;

    if parsed < 1 {
        return Err(format!(
            "must be greater or equal to 1, got {} instead",
            parsed
        ));
    }
    Ok(parsed)
}

fn at_least_one_u64(value: &str) -> Result<u64, String> {
    at_least_one(value).map(|v| v as u64)
}

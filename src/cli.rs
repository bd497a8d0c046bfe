//! Command-line arguments for the `crawldoc` binary

use clap::Parser;
use std::path::PathBuf;

use crawldoc::DedupMode;
use crawldoc::utils::DEFAULT_GUARDRAIL_RATE_THRESHOLD;

/// Normalize raw crawl outcomes into canonical, deduplicated documents
#[derive(Parser, Debug)]
#[command(name = "crawldoc")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// JSON file holding one crawl outcome or an array of them (default: stdin)
    pub input: Option<PathBuf>,

    /// Section dedup mode: exact or off
    #[arg(long, env = "CRAWLDOC_DEDUP_MODE", default_value = "exact")]
    pub dedup_mode: DedupMode,

    /// Section removal rate above which the dedup guardrail triggers
    #[arg(long, env = "CRAWLDOC_GUARDRAIL_THRESHOLD", default_value_t = DEFAULT_GUARDRAIL_RATE_THRESHOLD)]
    pub guardrail_threshold: f64,

    /// Requested URL, overriding the one in the input (single outcome only)
    #[arg(long)]
    pub url: Option<String>,

    /// CSS selector for the main content when regenerating from HTML
    #[arg(long)]
    pub content_selector: Option<String>,

    /// Emit JSON instead of markdown
    #[arg(long)]
    pub json: bool,

    /// Output file, or directory when it ends with `/` or several documents are written
    #[arg(short, long)]
    pub output: Option<String>,

    /// Strip markdown links and bare URLs from the output
    #[arg(long)]
    pub remove_links: bool,

    /// Do not regenerate markdown from HTML when the input has none
    #[arg(long)]
    pub no_regenerate: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

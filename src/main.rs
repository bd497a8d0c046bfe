//! `crawldoc` - normalize raw crawl outcomes from the command line

mod cli;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::Cli;
use crawldoc::utils::is_valid_url;
use crawldoc::{BuildOptions, DocumentBuilder, OutputFormat, parse_outcomes, write_output};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) -> Result<()> {
    let default_level = if verbose { "crawldoc=debug" } else { "crawldoc=info" };
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;
    Ok(())
}

async fn read_input(cli: &Cli) -> Result<String> {
    match &cli.input {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut buffer = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buffer)
                .await
                .context("Failed to read stdin")?;
            Ok(buffer)
        }
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    if let Some(url) = &cli.url {
        if !is_valid_url(url) {
            bail!("--url must be an http(s) URL, got '{url}'");
        }
    }

    let mut options = BuildOptions::builder()
        .guardrail_threshold(cli.guardrail_threshold)
        .regenerate_from_html(!cli.no_regenerate);
    if let Some(selector) = &cli.content_selector {
        options = options.content_selector(selector.as_str());
    }
    let builder = DocumentBuilder::new(options.build()?)?;

    let input = read_input(&cli).await?;
    let outcomes = parse_outcomes(&input).context("Input is not a crawl outcome or an array of them")?;
    if outcomes.is_empty() {
        bail!("Input contains no crawl outcomes");
    }
    if cli.url.is_some() && outcomes.len() > 1 {
        bail!("--url can only be used with a single crawl outcome");
    }

    let mut docs = Vec::with_capacity(outcomes.len());
    for (position, raw) in outcomes.into_iter().enumerate() {
        let doc = builder
            .build(raw, cli.url.as_deref(), cli.dedup_mode)
            .with_context(|| format!("Crawl outcome #{} is unusable", position + 1))?;
        docs.push(doc);
    }

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Markdown
    };
    write_output(&docs, cli.output.as_deref(), format, cli.remove_links).await?;

    let failed = docs.iter().filter(|doc| doc.is_failed()).count();
    if failed > 0 {
        tracing::warn!("{} of {} documents failed", failed, docs.len());
    }
    if failed == docs.len() {
        for doc in &docs {
            if let Some(reason) = &doc.error_message {
                eprintln!("{}: {}", doc.request_url, reason);
            }
        }
        std::process::exit(1);
    }

    Ok(())
}

//! Writing rendered documents to stdout, a file, or a directory

use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

use super::{OutputFormat, document_to_json, render_document};
use crate::document::CanonicalDocument;
use crate::utils::{COMBINED_JSON_FILENAME, url_to_filename};

/// Write `docs` and return the paths written.
///
/// - one document, no target: stdout
/// - one document, target not ending in `/`: that file (parents created)
/// - otherwise: the target directory (default `.`), containing
///   `crawl_results.json` for JSON or one `<name>.md` per document
///
/// Failed documents have no markdown and are skipped in per-document
/// markdown output. When two documents map to the same name, later ones
/// get a `_2`, `_3`, ... suffix instead of overwriting.
///
/// # Errors
///
/// Returns an error if a directory or file cannot be written.
pub async fn write_output(
    docs: &[CanonicalDocument],
    target: Option<&str>,
    format: OutputFormat,
    strip_links: bool,
) -> Result<Vec<PathBuf>> {
    match (docs, target) {
        ([doc], None) => {
            let mut rendered = render_document(doc, format, strip_links);
            rendered.push('\n');
            let mut stdout = tokio::io::stdout();
            stdout.write_all(rendered.as_bytes()).await?;
            stdout.flush().await?;
            Ok(Vec::new())
        }
        ([doc], Some(file)) if !file.ends_with('/') => {
            let path = PathBuf::from(file);
            write_file(&path, render_document(doc, format, strip_links)).await?;
            Ok(vec![path])
        }
        _ => write_directory(docs, Path::new(target.unwrap_or(".")), format, strip_links).await,
    }
}

async fn write_directory(
    docs: &[CanonicalDocument],
    dir: &Path,
    format: OutputFormat,
    strip_links: bool,
) -> Result<Vec<PathBuf>> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    match format {
        OutputFormat::Json => {
            let all: Vec<Value> = docs.iter().map(|doc| document_to_json(doc, strip_links)).collect();
            let serialized = tokio::task::spawn_blocking(move || serde_json::to_string_pretty(&all))
                .await
                .context("JSON serialization task panicked")??;

            let path = dir.join(COMBINED_JSON_FILENAME);
            write_file(&path, serialized).await?;
            tracing::info!("Wrote {} documents to {}", docs.len(), path.display());
            Ok(vec![path])
        }
        OutputFormat::Markdown => {
            let mut written = Vec::with_capacity(docs.len());
            let mut used = HashSet::with_capacity(docs.len());
            for doc in docs {
                if doc.is_failed() {
                    tracing::warn!(url = %doc.request_url, "Skipping failed document");
                    continue;
                }
                let stem = url_to_filename(&doc.final_url);
                let mut name = stem.clone();
                let mut suffix = 2;
                while !used.insert(name.clone()) {
                    name = format!("{stem}_{suffix}");
                    suffix += 1;
                }
                if name != stem {
                    tracing::warn!(
                        url = %doc.final_url,
                        file = %name,
                        "Output filename already taken, writing under a suffixed name"
                    );
                }
                let path = dir.join(format!("{name}.md"));
                write_file(&path, render_document(doc, format, strip_links)).await?;
                written.push(path);
            }
            Ok(written)
        }
    }
}

async fn write_file(path: &Path, contents: String) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    tokio::fs::write(path, contents)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Wrote {}", path.display());
    Ok(())
}

use super::{
    collect_all_files,
    markdown::{extract_title, markdown_to_html},
    meta::SiteMeta,
    template::Template,
    transform::{PagePosition, TransformContext, transform_html},
};
use crate::{config::DocsConfig, log};
use anyhow::{Context, Result};
use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// Markdown pages
// ============================================================================

/// Render every `.md` file under `[build].content` through the base template.
///
/// `content/commands/init.md` lands at `<output>/commands/init.html`.
/// Returns the destination paths written, in the order they were written.
pub fn render_markdown_pages(config: &DocsConfig, meta: &SiteMeta) -> Result<Vec<PathBuf>> {
    let content = &config.build.content;
    let sources: Vec<_> = collect_all_files(content)
        .into_iter()
        .filter(|p| p.extension().is_some_and(|ext| ext == "md"))
        .collect();

    if sources.is_empty() {
        return Ok(Vec::new());
    }

    let template = Template::load(&config.build.base_template_path())?;

    sources
        .iter()
        .map(|src| render_markdown_page(src, &template, config, meta))
        .collect()
}

fn render_markdown_page(
    src: &Path,
    template: &Template,
    config: &DocsConfig,
    meta: &SiteMeta,
) -> Result<PathBuf> {
    let rel = src.strip_prefix(&config.build.content)?;
    let position = PagePosition::of(rel);
    let dest = config.build.output.join(rel.with_extension("html"));

    log!("content"; "{}", rel.display());

    let md = fs::read_to_string(src)
        .with_context(|| format!("Failed to read {}", src.display()))?;
    let body = markdown_to_html(&md);
    let title = extract_title(&md).unwrap_or(&config.build.title);

    let html = template.render(&body, title, position, &meta.version, meta.base_url());
    write_page(&dest, &html)?;
    Ok(dest)
}

// ============================================================================
// Static pages
// ============================================================================

/// Transform and copy the `[[build.pages]]` mapping.
///
/// Missing sources are skipped silently. Destinations already in `produced`
/// (written by the Markdown pass this run) are skipped so the Markdown
/// version wins. Returns the number of files written.
pub fn copy_static_pages(
    config: &DocsConfig,
    meta: &SiteMeta,
    produced: &HashSet<PathBuf>,
) -> Result<usize> {
    let mut copied = 0;

    for page in &config.build.pages {
        let src = config.build.source.join(&page.source);
        if !src.is_file() {
            continue;
        }

        let dest = config.build.output.join(&page.dest);
        if produced.contains(&dest) {
            log!("pages"; "{} (from markdown)", page.dest.display());
            continue;
        }

        let raw = fs::read_to_string(&src)
            .with_context(|| format!("Failed to read {}", src.display()))?;
        let ctx = TransformContext::new(&meta.version, PagePosition::of(&page.dest));
        write_page(&dest, &transform_html(&raw, &ctx, meta.base_url()))?;
        copied += 1;
    }

    Ok(copied)
}

fn write_page(dest: &Path, html: &str) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(dest, html).with_context(|| format!("Failed to write {}", dest.display()))
}

//! Site building orchestration.
//!
//! # Architecture
//!
//! ```text
//! build_site()
//!     │
//!     ├── ensure_output_dirs() ──► <output>/commands, <output>/img
//!     ├── mirror_images()      ──► additive copy into <output>/img
//!     ├── SiteMeta::resolve()  ──► version + optional base URL
//!     ├── render_markdown_pages()
//!     │       └── content/**.md → template → <output>/**.html
//!     └── copy_static_pages()
//!             └── [[build.pages]] → transform → <output>
//!                 (skips destinations the Markdown pass produced)
//! ```

use crate::{
    compiler::{
        SiteMeta, copy_static_pages, mirror_images, render_markdown_pages,
        transform::COMMANDS_DIR,
    },
    config::DocsConfig,
    log,
};
use anyhow::{Context, Result};
use std::{collections::HashSet, fs};

/// Counters for one build run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BuildReport {
    /// Static pages written from the mapping list.
    pub copied: usize,
    /// Every page that went through the transformer, Markdown pages included.
    pub transformed: usize,
}

/// Build the entire site.
pub fn build_site(config: &DocsConfig) -> Result<BuildReport> {
    ensure_output_dirs(config)?;

    let images = mirror_images(&config.build.images, &config.build.output_images())?;
    if images > 0 {
        log!("assets"; "copied {} new images", images);
    }

    let meta = SiteMeta::resolve(config);
    log!("build"; "version {}", meta.version);
    if let Some(base_url) = meta.base_url() {
        log!("build"; "base url {}", base_url);
    }

    if !config.build.content.is_dir() {
        log!(full "warn"; "content directory {} not found", config.build.content.display());
    }

    let produced = render_markdown_pages(config, &meta)?;
    let produced: HashSet<_> = produced.into_iter().collect();
    let copied = copy_static_pages(config, &meta, &produced)?;

    Ok(BuildReport {
        copied,
        transformed: produced.len() + copied,
    })
}

fn ensure_output_dirs(config: &DocsConfig) -> Result<()> {
    for dir in [
        config.build.output.join(COMMANDS_DIR),
        config.build.output_images(),
    ] {
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    Ok(())
}

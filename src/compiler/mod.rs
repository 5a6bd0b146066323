//! The page transform pipeline.
//!
//! - **meta**: Resolve the version string and optional base URL
//! - **markdown**: Convert the Markdown dialect to HTML fragments
//! - **transform**: Substitute placeholders and rewrite asset paths
//! - **template**: Wrap fragments in the base page template
//! - **pages**: Render Markdown pages and copy static pages
//! - **assets**: Mirror the image directory
//!
//! # Build Flow
//!
//! ```text
//! SiteMeta::resolve() ──► render_markdown_pages() ──► copy_static_pages()
//!        │                        │                          │
//!        ▼                        ▼                          ▼
//!  version, base_url      content/**.md → .html     mapped .html/.css
//! ```

pub mod assets;
pub mod markdown;
pub mod meta;
pub mod pages;
pub mod template;
pub mod transform;

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub use assets::mirror_images;
pub use meta::SiteMeta;
pub use pages::{copy_static_pages, render_markdown_pages};

/// Files to ignore during directory traversal
const IGNORED_FILES: &[&str] = &[".DS_Store"];

/// Collect all files from a directory recursively, in sorted order.
pub fn collect_all_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_str().unwrap_or_default();
            !IGNORED_FILES.contains(&name)
        })
        .map(walkdir::DirEntry::into_path)
        .collect()
}

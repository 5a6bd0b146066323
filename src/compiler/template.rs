//! Base page template for Markdown-rendered pages.

use super::transform::{
    PagePosition, REL_PLACEHOLDER, TransformContext, VERSION_PLACEHOLDER, transform_html,
};
use anyhow::{Context, Result};
use std::{fs, path::Path};

pub const TITLE_PLACEHOLDER: &str = "{{TITLE}}";
pub const CONTENT_PLACEHOLDER: &str = "{{CONTENT}}";

/// A loaded base template containing `{{TITLE}}`, `{{CONTENT}}`,
/// `{{REL}}` and `{{VERSION}}` placeholders.
#[derive(Debug, Clone)]
pub struct Template {
    source: String,
}

impl Template {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read base template {}", path.display()))?;
        Ok(Self::new(source))
    }

    /// Wrap a rendered body in the template.
    ///
    /// The filled page is passed through [`transform_html`] once more, since
    /// title and body may carry placeholders or image paths of their own.
    pub fn render(
        &self,
        content: &str,
        title: &str,
        position: PagePosition,
        version: &str,
        base_url: Option<&str>,
    ) -> String {
        let page = self
            .source
            .replace(TITLE_PLACEHOLDER, title)
            .replace(CONTENT_PLACEHOLDER, content)
            .replace(REL_PLACEHOLDER, position.rel())
            .replace(VERSION_PLACEHOLDER, version);

        let ctx = TransformContext::new(version, position);
        transform_html(&page, &ctx, base_url)
    }
}

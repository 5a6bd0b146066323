//! `[build]` section configuration.
//!
//! Contains source/output paths, the resolver inputs and the static page mapping.

use super::defaults;
use educe::Educe;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// `[build]` section in docs.toml - build pipeline configuration.
///
/// # Example
/// ```toml
/// [build]
/// content = "docs/webpage/content"   # Markdown tree
/// output = "docs"                    # Deployable site
/// version_file = "Cargo.toml"
///
/// [[build.pages]]
/// source = "index.html"
/// dest = "index.html"
/// ```
#[derive(Debug, Clone, Educe, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    /// Directory holding the hand-written static pages.
    #[serde(default = "defaults::build::source")]
    #[educe(Default = defaults::build::source())]
    pub source: PathBuf,

    /// HTML template directory.
    #[serde(default = "defaults::build::templates")]
    #[educe(Default = defaults::build::templates())]
    pub templates: PathBuf,

    /// Base page template, relative to `templates`.
    #[serde(default = "defaults::build::base_template")]
    #[educe(Default = defaults::build::base_template())]
    pub base_template: PathBuf,

    /// Markdown content root.
    #[serde(default = "defaults::build::content")]
    #[educe(Default = defaults::build::content())]
    pub content: PathBuf,

    /// Build output directory.
    #[serde(default = "defaults::build::output")]
    #[educe(Default = defaults::build::output())]
    pub output: PathBuf,

    /// Image directory mirrored into `<output>/img`.
    #[serde(default = "defaults::build::images")]
    #[educe(Default = defaults::build::images())]
    pub images: PathBuf,

    /// File scanned for a `version = "..."` line.
    #[serde(default = "defaults::build::version_file")]
    #[educe(Default = defaults::build::version_file())]
    pub version_file: PathBuf,

    /// One-line hostname file (GitHub Pages `CNAME`).
    #[serde(default = "defaults::build::domain_file")]
    #[educe(Default = defaults::build::domain_file())]
    pub domain_file: PathBuf,

    /// Page title used when a Markdown page has no `# ` heading.
    #[serde(default = "defaults::build::title")]
    #[educe(Default = defaults::build::title())]
    pub title: String,

    /// Static source → destination mapping.
    #[serde(default = "defaults::build::pages")]
    #[educe(Default = defaults::build::pages())]
    pub pages: Vec<StaticPage>,
}

/// One entry of the static page mapping.
///
/// `source` is relative to `[build].source`, `dest` to `[build].output`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StaticPage {
    pub source: PathBuf,
    pub dest: PathBuf,
}

impl StaticPage {
    /// Map a relative path onto the same relative path in the output.
    pub fn same(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        Self {
            source: path.clone(),
            dest: path,
        }
    }
}

impl BuildConfig {
    /// Absolute path of the base page template.
    pub fn base_template_path(&self) -> PathBuf {
        self.templates.join(&self.base_template)
    }

    /// Destination of the image mirror.
    pub fn output_images(&self) -> PathBuf {
        self.output.join("img")
    }
}

#[cfg(test)]
mod tests {
    use super::super::DocsConfig;
    use super::*;

    #[test]
    fn test_build_config_defaults() {
        let config: DocsConfig = toml::from_str("").unwrap();

        assert_eq!(config.build.source, PathBuf::from("docs/webpage"));
        assert_eq!(config.build.content, PathBuf::from("docs/webpage/content"));
        assert_eq!(config.build.output, PathBuf::from("docs"));
        assert_eq!(config.build.version_file, PathBuf::from("pyproject.toml"));
        assert_eq!(config.build.domain_file, PathBuf::from("docs/CNAME"));
        assert_eq!(config.build.title, "ChangeForge Docs");
        assert_eq!(config.build.pages.len(), 8);
        assert_eq!(config.build.pages[4], StaticPage::same("commands/init.html"));
    }

    #[test]
    fn test_build_config_custom_pages() {
        let config = r#"
            [build]
            output = "public"

            [[build.pages]]
            source = "home.html"
            dest = "index.html"
        "#;
        let config: DocsConfig = toml::from_str(config).unwrap();

        assert_eq!(config.build.output, PathBuf::from("public"));
        assert_eq!(
            config.build.pages,
            vec![StaticPage {
                source: "home.html".into(),
                dest: "index.html".into(),
            }]
        );
        // untouched fields keep their defaults
        assert_eq!(config.build.title, "ChangeForge Docs");
    }

    #[test]
    fn test_base_template_path() {
        let config = r#"
            [build]
            templates = "tpl"
            base_template = "page.html"
        "#;
        let config: DocsConfig = toml::from_str(config).unwrap();
        assert_eq!(
            config.build.base_template_path(),
            PathBuf::from("tpl/page.html")
        );
    }

    #[test]
    fn test_unknown_page_field_rejection() {
        let config = r#"
            [[build.pages]]
            source = "a.html"
            dest = "a.html"
            minify = true
        "#;
        let result: Result<DocsConfig, _> = toml::from_str(config);
        assert!(result.is_err());
    }
}

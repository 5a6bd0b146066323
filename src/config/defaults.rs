//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// [build] Section Defaults
// ============================================================================

pub mod build {
    use super::super::StaticPage;
    use std::path::PathBuf;

    pub fn source() -> PathBuf {
        "docs/webpage".into()
    }

    pub fn templates() -> PathBuf {
        "docs/webpage/templates".into()
    }

    pub fn base_template() -> PathBuf {
        "base.html".into()
    }

    pub fn content() -> PathBuf {
        "docs/webpage/content".into()
    }

    pub fn output() -> PathBuf {
        "docs".into()
    }

    pub fn images() -> PathBuf {
        "docs/img".into()
    }

    pub fn version_file() -> PathBuf {
        "pyproject.toml".into()
    }

    pub fn domain_file() -> PathBuf {
        "docs/CNAME".into()
    }

    pub fn title() -> String {
        "ChangeForge Docs".into()
    }

    /// Hand-written pages copied through the transformer, keyed by the
    /// same relative path on both sides.
    pub fn pages() -> Vec<StaticPage> {
        [
            "index.html",
            "styles.css",
            "getting-started.html",
            "configuration.html",
            "commands/init.html",
            "commands/create.html",
            "commands/list.html",
            "commands/bump.html",
        ]
        .into_iter()
        .map(StaticPage::same)
        .collect()
    }
}

// ============================================================================
// [serve] Section Defaults
// ============================================================================

pub mod serve {
    pub fn interface() -> String {
        "127.0.0.1".into()
    }

    pub fn port() -> u16 {
        8000
    }
}

//! Site-wide values resolved once per build.
//!
//! Two scalars feed every page transform:
//!
//! - the version string, scanned out of a version declaration file
//!   (`pyproject.toml`, `Cargo.toml`, ...)
//! - the optional base URL, derived from a one-line `CNAME` file
//!
//! Both degrade gracefully: a missing or unmatched file yields the default
//! version or no base URL rather than an error.

use crate::config::DocsConfig;
use regex::Regex;
use std::{fs, path::Path, sync::LazyLock};

/// Version used when no `version = "..."` line can be found.
pub const DEFAULT_VERSION: &str = "v0.0.0";

/// First `version = "<value>"` line, anchored to line start/end.
static RE_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?mi)^\s*version\s*=\s*"(.*?)"\s*$"#).unwrap());

/// Version and base URL shared by every page of one build run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteMeta {
    /// Always `v`-prefixed, e.g. `v1.2.3`.
    pub version: String,
    /// Absolute `scheme://host`, if a custom domain is configured.
    pub base_url: Option<String>,
}

impl SiteMeta {
    /// Resolve both values from the files named in `[build]`.
    pub fn resolve(config: &DocsConfig) -> Self {
        Self {
            version: read_version(&config.build.version_file),
            base_url: read_base_url(&config.build.domain_file),
        }
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }
}

/// Read the version from a declaration file, defaulting to [`DEFAULT_VERSION`].
pub fn read_version(path: &Path) -> String {
    match fs::read_to_string(path) {
        Ok(content) => parse_version(&content),
        Err(_) => DEFAULT_VERSION.to_owned(),
    }
}

/// Extract the first `version = "..."` value and normalize it to `v` form.
pub fn parse_version(content: &str) -> String {
    let Some(caps) = RE_VERSION.captures(content) else {
        return DEFAULT_VERSION.to_owned();
    };
    let version = caps[1].trim();
    if version.starts_with('v') {
        version.to_owned()
    } else {
        format!("v{version}")
    }
}

/// Read a hostname file and turn it into a base URL.
///
/// Returns `None` when the file is absent or its first line is blank.
pub fn read_base_url(path: &Path) -> Option<String> {
    let content = fs::read_to_string(path).ok()?;
    parse_base_url(&content)
}

/// Turn the first line of a hostname file into `https://host`.
///
/// Values already carrying `http://` or `https://` are kept as-is.
pub fn parse_base_url(content: &str) -> Option<String> {
    let domain = content.trim().lines().next()?.trim();
    if domain.is_empty() {
        return None;
    }
    if domain.starts_with("http://") || domain.starts_with("https://") {
        Some(domain.to_owned())
    } else {
        Some(format!("https://{domain}"))
    }
}

//! Errors raised while loading `docs.toml`.

use std::path::PathBuf;
use thiserror::Error;

/// Why `docs.toml` could not be turned into a usable [`DocsConfig`](super::DocsConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("cannot read docs config `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    /// Malformed TOML or an unknown section/field.
    #[error("invalid docs.toml: {0}")]
    Toml(#[from] toml::de::Error),

    /// Parsed, but a `[serve]` value is unusable.
    #[error("invalid docs.toml setting: {0}")]
    Validation(String),
}

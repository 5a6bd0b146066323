//! Site configuration management for `docs.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                           |
//! |-------------|---------------------------------------------------|
//! | `[build]`   | Source/output paths, resolver inputs, page map    |
//! | `[serve]`   | Development server (port, interface)              |
//!
//! The file is optional: without it every field takes its default.
//!
//! # Example
//!
//! ```toml
//! [build]
//! content = "docs/webpage/content"
//! output = "docs"
//! version_file = "pyproject.toml"
//!
//! [serve]
//! port = 8000
//! ```

mod build;
pub mod defaults;
mod error;
mod serve;

pub use build::StaticPage;
pub use error::ConfigError;

use build::BuildConfig;
use serve::ServeConfig;

use crate::cli::Cli;
use anyhow::Result;
use serde::Deserialize;
use std::{
    fs,
    net::IpAddr,
    path::{Path, PathBuf},
};

/// Root configuration structure representing docs.toml
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocsConfig {
    /// Build settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Development server settings
    #[serde(default)]
    pub serve: ServeConfig,
}

impl DocsConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Load the config named by the CLI, falling back to defaults when the
    /// file does not exist, then apply CLI overrides and anchor every path
    /// at the project root.
    pub fn load(cli: &Cli) -> Result<Self> {
        let root = cli
            .root
            .as_deref()
            .map(expand_tilde)
            .unwrap_or_else(|| PathBuf::from("./"));
        let config_path = root.join(&cli.config);

        let mut config = if config_path.is_file() {
            Self::from_path(&config_path)?
        } else {
            Self::default()
        };
        config.update_with_cli(cli);
        config.anchor_at(&root);
        Ok(config)
    }

    /// Apply CLI overrides (output dir, serve interface/port)
    pub fn update_with_cli(&mut self, cli: &Cli) {
        Self::update_option(&mut self.build.output, cli.output.as_ref());
        Self::update_option(&mut self.serve.interface, cli.interface());
        Self::update_option(&mut self.serve.port, cli.port().as_ref());
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Resolve every path against `root` and normalize to absolute paths
    pub fn anchor_at(&mut self, root: &Path) {
        let root = Self::normalize_path(root);
        let build = &mut self.build;

        build.source = Self::normalize_path(&root.join(&build.source));
        build.templates = Self::normalize_path(&root.join(&build.templates));
        build.content = Self::normalize_path(&root.join(&build.content));
        build.output = Self::normalize_path(&root.join(&build.output));
        build.images = Self::normalize_path(&root.join(&build.images));
        build.version_file = Self::normalize_path(&root.join(&build.version_file));
        build.domain_file = Self::normalize_path(&root.join(&build.domain_file));
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            // For non-existent paths, manually make them absolute
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Parsed `[serve].interface`
    pub fn interface(&self) -> Result<IpAddr, ConfigError> {
        self.serve.interface.parse().map_err(|_| {
            ConfigError::Validation(format!(
                "[serve.interface] `{}` is not an IP address",
                self.serve.interface
            ))
        })
    }

    /// Validate configuration for serving
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.interface()?;
        if self.serve.port == 0 {
            return Err(ConfigError::Validation(
                "[serve.port] must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

fn expand_tilde(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(raw) => PathBuf::from(shellexpand::tilde(raw).into_owned()),
        None => path.to_path_buf(),
    }
}

// ============================================================================
// Tests
// ============================================================================

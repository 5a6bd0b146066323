//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand, error::ErrorKind};
use std::path::PathBuf;

/// Static docs builder and dev server
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root directory
    #[arg(short, long, global = true)]
    pub root: Option<PathBuf>,

    /// Config file name, relative to root (default: docs.toml)
    #[arg(short = 'C', long, global = true, default_value = "docs.toml")]
    pub config: PathBuf,

    /// Output directory path (relative to project root)
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Build the site into the output directory
    Build,

    /// Build the site, then serve the output directory over HTTP
    Serve {
        /// Interface to bind on
        #[arg(short, long)]
        interface: Option<String>,

        /// Port to listen on (default: 8000)
        ///
        /// Kept as raw text: a malformed value falls back to the configured port.
        #[arg(short, long, num_args = 0..=1, default_missing_value = "")]
        port: Option<String>,
    },
}

impl Cli {
    /// Port given on the command line, if present and well-formed.
    pub fn port(&self) -> Option<u16> {
        match &self.command {
            Commands::Serve { port, .. } => port.as_deref().and_then(parse_port),
            Commands::Build => None,
        }
    }

    /// Interface given on the command line, if any.
    pub fn interface(&self) -> Option<&String> {
        match &self.command {
            Commands::Serve { interface, .. } => interface.as_ref(),
            Commands::Build => None,
        }
    }
}

/// How `main` reports a failed parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseFailure {
    /// No arguments at all: usage on stdout, success exit.
    Usage,
    /// `Unknown command: X` plus usage, failure exit.
    UnknownCommand,
    /// Left to clap (`--help`, `--version`, bad flags).
    Other,
}

impl ParseFailure {
    pub fn of(err: &clap::Error) -> Self {
        match err.kind() {
            ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => Self::Usage,
            ErrorKind::InvalidSubcommand => Self::UnknownCommand,
            _ => Self::Other,
        }
    }
}

/// Port 0 counts as malformed: the server needs a fixed port to announce.
fn parse_port(raw: &str) -> Option<u16> {
    raw.trim().parse::<u16>().ok().filter(|&port| port != 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_build_command() {
        let cli = parse(&["forge-docs", "build"]);
        assert!(matches!(cli.command, Commands::Build));
        assert_eq!(cli.port(), None);
        assert_eq!(cli.config, PathBuf::from("docs.toml"));
    }

    #[test]
    fn test_serve_port_short_and_long() {
        assert_eq!(parse(&["forge-docs", "serve", "-p", "5173"]).port(), Some(5173));
        assert_eq!(parse(&["forge-docs", "serve", "--port", "9000"]).port(), Some(9000));
    }

    #[test]
    fn test_serve_without_port() {
        let cli = parse(&["forge-docs", "serve"]);
        assert!(matches!(cli.command, Commands::Serve { .. }));
        assert_eq!(cli.port(), None);
    }

    #[test]
    fn test_malformed_port_is_ignored() {
        assert_eq!(parse(&["forge-docs", "serve", "-p", "abc"]).port(), None);
        assert_eq!(parse(&["forge-docs", "serve", "-p", "99999"]).port(), None);
        assert_eq!(parse(&["forge-docs", "serve", "-p"]).port(), None);
        assert_eq!(parse(&["forge-docs", "serve", "-p", "0"]).port(), None);
    }

    #[test]
    fn test_port_without_value_before_other_flags() {
        let cli = parse(&["forge-docs", "serve", "-p", "-i", "0.0.0.0"]);
        assert_eq!(cli.port(), None);
        assert_eq!(cli.interface().map(String::as_str), Some("0.0.0.0"));

        let cli = parse(&["forge-docs", "serve", "-p", "--root", "site"]);
        assert_eq!(cli.port(), None);
        assert_eq!(cli.root, Some(PathBuf::from("site")));
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = parse(&["forge-docs", "build", "--root", "site", "-o", "public"]);
        assert_eq!(cli.root, Some(PathBuf::from("site")));
        assert_eq!(cli.output, Some(PathBuf::from("public")));
    }

    #[test]
    fn test_unknown_command_is_reported() {
        let err = Cli::try_parse_from(["forge-docs", "deploy"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSubcommand);
        assert_eq!(ParseFailure::of(&err), ParseFailure::UnknownCommand);
    }

    #[test]
    fn test_no_arguments_shows_help() {
        let err = Cli::try_parse_from(["forge-docs"]).unwrap_err();
        assert_eq!(
            err.kind(),
            ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
        );
        assert_eq!(ParseFailure::of(&err), ParseFailure::Usage);
    }

    #[test]
    fn test_help_and_bad_flags_are_left_to_clap() {
        let err = Cli::try_parse_from(["forge-docs", "--help"]).unwrap_err();
        assert_eq!(ParseFailure::of(&err), ParseFailure::Other);

        let err = Cli::try_parse_from(["forge-docs", "build", "--bogus"]).unwrap_err();
        assert_eq!(ParseFailure::of(&err), ParseFailure::Other);
    }
}

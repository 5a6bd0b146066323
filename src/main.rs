//! forge-docs - static docs builder and dev server.

mod build;
mod cli;
mod compiler;
mod config;
mod serve;
mod utils;

use anyhow::Result;
use build::build_site;
use clap::{
    CommandFactory, Parser,
    error::{ContextKind, ContextValue},
};
use cli::{Cli, Commands, ParseFailure};
use config::DocsConfig;
use serve::serve_site;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match ParseFailure::of(&err) {
            ParseFailure::Usage => {
                Cli::command().print_help()?;
                return Ok(ExitCode::SUCCESS);
            }
            ParseFailure::UnknownCommand => {
                report_unknown_command(&err)?;
                return Ok(ExitCode::FAILURE);
            }
            ParseFailure::Other => err.exit(),
        },
    };
    let config = DocsConfig::load(&cli)?;

    match &cli.command {
        Commands::Build => {
            let report = build_site(&config)?;
            log!(
                full "build";
                "built {} files (transformed {}), output: {}",
                report.copied,
                report.transformed,
                config.build.output.display()
            );
        }
        Commands::Serve { .. } => serve_site(&config)?,
    }

    Ok(ExitCode::SUCCESS)
}

/// Print `Unknown command: X` followed by the usage text.
fn report_unknown_command(err: &clap::Error) -> Result<()> {
    let name = match err.get(ContextKind::InvalidSubcommand) {
        Some(ContextValue::String(name)) => name.as_str(),
        _ => "",
    };
    println!("Unknown command: {name}\n");
    Cli::command().print_help()?;
    Ok(())
}

// Copyright 2026 Cascade contributors
// SPDX-License-Identifier: Apache-2.0

//! Cascade stylesheet checker command-line interface.
//!
//! This is the main entry point for the `cascade` command.

use camino::Utf8PathBuf;
use cascade_core::source_analysis::Dialect;
use clap::{ArgAction, Parser, Subcommand};
use miette::Result;
use tracing_subscriber::EnvFilter;

mod commands;
mod diagnostic;
mod paths;

use commands::OutputFormat;

/// Cascade: an error-tolerant CSS, LESS and SCSS checker
#[derive(Debug, Parser)]
#[command(name = "cascade")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse stylesheets and report syntax errors
    Check {
        /// Stylesheet or directory to check
        #[arg(default_value = ".")]
        path: Utf8PathBuf,

        /// Dialect to parse as (default: from the file extension)
        #[arg(long)]
        dialect: Option<Dialect>,

        /// Output format: text or json
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },

    /// Print the token stream of a stylesheet
    Tokens {
        /// Stylesheet to tokenize
        path: Utf8PathBuf,

        /// Dialect to tokenize as (default: from the file extension)
        #[arg(long)]
        dialect: Option<Dialect>,

        /// Output format: text or json
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },

    /// Print the parse tree of a stylesheet
    Tree {
        /// Stylesheet to parse
        path: Utf8PathBuf,

        /// Dialect to parse as (default: from the file extension)
        #[arg(long)]
        dialect: Option<Dialect>,

        /// Print only the node at this path, e.g. `styleSheet/body/bodyItem|1`
        #[arg(long)]
        query: Option<String>,
    },
}

fn main() -> Result<()> {
    // Install miette's fancy error handler
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))?;

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(directive_for_verbosity(cli.verbose))),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Command::Check {
            path,
            dialect,
            format,
        } => commands::check::run(&path, dialect, format),
        Command::Tokens {
            path,
            dialect,
            format,
        } => commands::tokens::run(&path, dialect, format),
        Command::Tree {
            path,
            dialect,
            query,
        } => commands::tree::run(&path, dialect, query.as_deref()),
    };

    // Exit with appropriate code
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("{e:?}");
            std::process::exit(1);
        }
    }
}

/// Default log filter for a `-v` count.
fn directive_for_verbosity(v: u8) -> &'static str {
    match v {
        0 => "cascade=warn,cascade_core=warn",
        1 => "cascade=debug,cascade_core=debug",
        _ => "cascade=trace,cascade_core=trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn directive_defaults() {
        assert_eq!(directive_for_verbosity(0), "cascade=warn,cascade_core=warn");
        assert_eq!(directive_for_verbosity(1), "cascade=debug,cascade_core=debug");
        assert_eq!(directive_for_verbosity(5), "cascade=trace,cascade_core=trace");
    }

    #[test]
    fn parses_check_flags() {
        let cli = Cli::try_parse_from([
            "cascade", "-vv", "check", "site.less", "--dialect", "scss", "--format", "json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Check {
                path,
                dialect,
                format,
            } => {
                assert_eq!(path, Utf8PathBuf::from("site.less"));
                assert_eq!(dialect, Some(Dialect::Scss));
                assert_eq!(format, OutputFormat::Json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_dialect() {
        assert!(Cli::try_parse_from(["cascade", "tokens", "a.css", "--dialect", "sass"]).is_err());
    }
}

// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! cliguard command-line interface.
//!
//! This is the main entry point for the `cliguard` command.

use clap::{Parser, Subcommand};
use miette::Result;

mod commands;
mod diagnostic;
mod paths;

use commands::{CheckArgs, FixArgs};

/// cliguard: declaration checks for command settings classes
#[derive(Debug, Parser)]
#[command(name = "cliguard")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log analysis progress to stderr (overridden by `RUST_LOG`)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check settings classes for invalid option and argument declarations
    Check(CheckArgs),

    /// Add or repair explicit type arguments on binding attributes
    Fix(FixArgs),

    /// List the diagnostics cliguard can report
    Rules,
}

fn main() -> Result<()> {
    // Install miette's fancy error handler
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match &cli.command {
        Command::Check(args) => commands::check::run_check(args),
        Command::Fix(args) => commands::fix::run_fix(args),
        Command::Rules => {
            commands::rules::print_rules();
            Ok(())
        }
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

/// Initialize logging to stderr. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let default_directive = if verbose { "cliguard=debug" } else { "cliguard=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

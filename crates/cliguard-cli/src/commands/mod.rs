// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! CLI command implementations and their shared arguments.

pub mod check;
pub mod fix;
pub mod rules;

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, ValueEnum};
use cliguard_core::config::{AOT_ANALYZER_KEY, GlobalOptions, discover_config_file};
use miette::{IntoDiagnostic, Result};
use tracing::debug;

/// Where analyzer options come from.
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigArgs {
    /// Enable ahead-of-time analysis (`build_property.enableaotanalyzer = true`)
    #[arg(long)]
    pub aot: bool,

    /// Configuration file (default: nearest `cliguard.toml` above the first path)
    #[arg(long, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Set an option, overriding the configuration file
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub set: Vec<(String, String)>,
}

impl ConfigArgs {
    /// Loads the configuration file, then applies `--set` and `--aot`.
    pub fn load(&self, first_path: &Utf8Path) -> Result<GlobalOptions> {
        let file = match &self.config {
            Some(path) => Some(path.clone()),
            None => discover_config_file(&absolute(first_path)?),
        };
        let mut options = match &file {
            Some(path) => GlobalOptions::load(path)?,
            None => GlobalOptions::new(),
        };
        for (key, value) in &self.set {
            options.set(key.clone(), value.clone());
        }
        if self.aot {
            options.set(AOT_ANALYZER_KEY, "true");
        }
        options.validate()?;
        debug!(config = ?file, entries = options.len(), "options loaded");
        Ok(options)
    }
}

/// Output format for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output via miette (default).
    #[default]
    Text,
    /// Machine-readable JSON (one object per line).
    Json,
}

/// Arguments of `cliguard check`.
#[derive(Debug, Clone, Args)]
pub struct CheckArgs {
    /// Source files or directories to check
    #[arg(default_value = ".")]
    pub paths: Vec<Utf8PathBuf>,

    #[command(flatten)]
    pub config: ConfigArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Exit non-zero if any warning is reported
    #[arg(long)]
    pub deny_warnings: bool,
}

/// Arguments of `cliguard fix`.
#[derive(Debug, Clone, Args)]
pub struct FixArgs {
    /// Source files or directories to fix
    #[arg(default_value = ".")]
    pub paths: Vec<Utf8PathBuf>,

    #[command(flatten)]
    pub config: ConfigArgs,

    /// Print a diff instead of writing, and exit non-zero if any file would change
    #[arg(long)]
    pub check: bool,
}

fn parse_key_value(text: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = text
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, found '{text}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{text}'"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

fn absolute(path: &Utf8Path) -> Result<Utf8PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let current = std::env::current_dir().into_diagnostic()?;
    let current = Utf8PathBuf::from_path_buf(current).map_err(|_| miette::miette!("Non-UTF-8 path"))?;
    Ok(current.join(path))
}

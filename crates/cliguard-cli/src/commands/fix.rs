// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! `cliguard fix`: add or repair explicit type arguments.
//!
//! Ahead-of-time analysis is always on for this command, since only its
//! diagnostics have fixes. Files are rewritten in place; with `--check`,
//! a unified diff is printed instead and the command exits non-zero if any
//! file would change. Files with syntax errors are skipped.

use camino::Utf8PathBuf;
use cliguard_core::analysis::{Analyzer, CancellationToken};
use cliguard_core::ast::SyntaxTree;
use cliguard_core::config::AOT_ANALYZER_KEY;
use cliguard_core::fixes::fix_all;
use miette::{IntoDiagnostic, Result, WrapErr};
use similar::TextDiff;
use tracing::{debug, instrument, warn};

use super::FixArgs;
use crate::paths::collect_source_files;

#[instrument(skip_all, fields(paths = args.paths.len(), check = args.check))]
pub fn run_fix(args: &FixArgs) -> Result<()> {
    let files = collect_source_files(&args.paths)?;
    let mut options = args.config.load(&args.paths[0])?;
    options.set(AOT_ANALYZER_KEY, "true");
    let analyzer = Analyzer::new(&options);
    let cancel = CancellationToken::new();

    let mut changed_files: Vec<Utf8PathBuf> = Vec::new();
    let mut skipped_files: Vec<Utf8PathBuf> = Vec::new();

    for file in &files {
        let original = std::fs::read_to_string(file)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read '{file}'"))?;
        let tree = SyntaxTree::parse(original.as_str());
        if !tree.diagnostics().is_empty() {
            warn!(%file, "skipping file with syntax errors");
            eprintln!("warning: skipping '{file}' (has syntax errors)");
            skipped_files.push(file.clone());
            continue;
        }

        let diagnostics = analyzer.check(&tree, &cancel)?;
        let fixed = fix_all(&tree, &diagnostics, &cancel)?;
        if fixed.text() == original {
            continue;
        }
        debug!(%file, "fixed");
        changed_files.push(file.clone());

        if args.check {
            print_unified_diff(file.as_str(), &original, fixed.text());
        } else {
            std::fs::write(file, fixed.text())
                .into_diagnostic()
                .wrap_err_with(|| format!("Failed to write '{file}'"))?;
        }
    }

    if args.check {
        let mut parts: Vec<String> = Vec::new();
        if !changed_files.is_empty() {
            let count = changed_files.len();
            let plural = if count == 1 { "" } else { "s" };
            parts.push(format!("{count} file{plural} would be fixed"));
        }
        if !skipped_files.is_empty() {
            let count = skipped_files.len();
            let plural = if count == 1 { "" } else { "s" };
            parts.push(format!("{count} file{plural} could not be checked (syntax errors)"));
        }
        if !parts.is_empty() {
            miette::bail!("{}", parts.join("; "));
        }
    } else if !changed_files.is_empty() {
        let count = changed_files.len();
        let plural = if count == 1 { "" } else { "s" };
        eprintln!("fixed {count} file{plural}");
    }

    Ok(())
}

/// Print a unified diff between `original` and `fixed` for the given file
/// path. Output goes to stdout so it can be captured and piped.
fn print_unified_diff(path: &str, original: &str, fixed: &str) {
    let diff = TextDiff::from_lines(original, fixed);
    print!(
        "{}",
        diff.unified_diff()
            .header(&format!("a/{path}"), &format!("b/{path}"))
    );
}

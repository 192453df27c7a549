// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! `cliguard check`: report invalid declarations in settings classes.
//!
//! Each `.cs` file is parsed, bound and analyzed independently. Diagnostics
//! are printed as miette reports on stderr, or as JSON lines on stdout. The
//! command exits non-zero if any error is reported, or any warning with
//! `--deny-warnings`.

use camino::Utf8PathBuf;
use cliguard_core::analysis::{Analyzer, CancellationToken};
use cliguard_core::ast::SyntaxTree;
use cliguard_core::diagnostics::{Diagnostic, Severity};
use miette::{IntoDiagnostic, Result, WrapErr};
use tracing::{debug, instrument};

use super::{CheckArgs, OutputFormat};
use crate::diagnostic::{CheckDiagnostic, JsonDiagnostic};
use crate::paths::collect_source_files;

/// Diagnostics found in one file.
struct FileReport {
    file: Utf8PathBuf,
    source: String,
    diagnostics: Vec<Diagnostic>,
}

#[instrument(skip_all, fields(paths = args.paths.len()))]
pub fn run_check(args: &CheckArgs) -> Result<()> {
    let files = collect_source_files(&args.paths)?;
    let options = args.config.load(&args.paths[0])?;
    let analyzer = Analyzer::new(&options);
    let cancel = CancellationToken::new();

    let mut errors = 0usize;
    let mut warnings = 0usize;
    for file in &files {
        let report = check_file(&analyzer, &cancel, file.clone())?;
        for diagnostic in &report.diagnostics {
            match diagnostic.severity {
                Severity::Error => errors += 1,
                Severity::Warning => warnings += 1,
            }
            emit(&report, diagnostic, args.format)?;
        }
    }
    debug!(files = files.len(), errors, warnings, "check finished");

    if errors > 0 || (args.deny_warnings && warnings > 0) {
        let files_checked = files.len();
        miette::bail!(
            "{errors} error{} and {warnings} warning{} found in {files_checked} file(s)",
            plural(errors),
            plural(warnings)
        );
    }
    Ok(())
}

fn check_file(analyzer: &Analyzer, cancel: &CancellationToken, file: Utf8PathBuf) -> Result<FileReport> {
    let source = std::fs::read_to_string(&file)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read '{file}'"))?;
    let tree = SyntaxTree::parse(source.as_str());
    let diagnostics = analyzer.check(&tree, cancel)?;
    debug!(%file, diagnostics = diagnostics.len(), "checked");
    Ok(FileReport {
        file,
        source,
        diagnostics,
    })
}

fn emit(report: &FileReport, diagnostic: &Diagnostic, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            let rendered =
                CheckDiagnostic::from_core_diagnostic(diagnostic, report.file.as_str(), &report.source);
            eprintln!("{:?}", miette::Report::new(rendered));
        }
        OutputFormat::Json => {
            let json = JsonDiagnostic::new(diagnostic, report.file.as_str(), &report.source);
            println!("{}", serde_json::to_string(&json).into_diagnostic()?);
        }
    }
    Ok(())
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}

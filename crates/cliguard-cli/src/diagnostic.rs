// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Diagnostic rendering using miette.
//!
//! Converts cliguard-core diagnostics into miette reports with:
//! - Source code context and a label at the flagged name
//! - The rule id as the diagnostic code
//! - The rule's documentation link and the fix hint
//!
//! JSON output uses [`JsonDiagnostic`], one object per line.

use std::fmt::Display;

use cliguard_core::analysis::descriptors::descriptor;
use cliguard_core::diagnostics::{Diagnostic as CoreDiagnostic, Severity};
use miette::{LabeledSpan, SourceSpan};
use serde::Serialize;

/// A diagnostic with source context, ready to render.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct CheckDiagnostic {
    /// Rule id, shown as the diagnostic code
    pub id: String,
    pub severity: Severity,
    pub message: String,
    pub help: Option<String>,
    /// Documentation link for rule diagnostics
    pub url: Option<String>,
    pub src: miette::NamedSource<String>,
    pub span: SourceSpan,
    pub label: String,
}

impl CheckDiagnostic {
    /// Create a new diagnostic from a cliguard-core diagnostic.
    pub fn from_core_diagnostic(diagnostic: &CoreDiagnostic, source_path: &str, source: &str) -> Self {
        let label = match diagnostic.severity {
            Severity::Error => "error here",
            Severity::Warning => "warning here",
        };

        Self {
            id: diagnostic.id.to_string(),
            severity: diagnostic.severity,
            message: diagnostic.message.to_string(),
            help: diagnostic.hint.as_ref().map(ToString::to_string),
            url: descriptor(&diagnostic.id).map(|d| d.help_link()),
            src: miette::NamedSource::new(source_path, source.to_string()),
            span: diagnostic.span.into(),
            label: label.to_string(),
        }
    }
}

impl miette::Diagnostic for CheckDiagnostic {
    fn code<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        Some(Box::new(&self.id))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(match self.severity {
            Severity::Error => miette::Severity::Error,
            Severity::Warning => miette::Severity::Warning,
        })
    }

    fn help<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        self.help
            .as_ref()
            .map(|help| Box::new(help) as Box<dyn Display + 'a>)
    }

    fn url<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        self.url
            .as_ref()
            .map(|url| Box::new(url) as Box<dyn Display + 'a>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        Some(Box::new(std::iter::once(LabeledSpan::new_with_span(
            Some(self.label.clone()),
            self.span,
        ))))
    }
}

/// One line of `--format json` output.
#[derive(Debug, Serialize)]
pub struct JsonDiagnostic<'a> {
    pub file: &'a str,
    pub id: &'a str,
    pub severity: &'static str,
    pub message: &'a str,
    /// 1-based line of the span start
    pub line: usize,
    /// 1-based column of the span start, in characters
    pub column: usize,
    pub span_start: u32,
    pub span_end: u32,
    pub hint: Option<&'a str>,
    pub help_link: Option<String>,
}

impl<'a> JsonDiagnostic<'a> {
    pub fn new(diagnostic: &'a CoreDiagnostic, file: &'a str, source: &str) -> Self {
        let (line, column) = line_column(source, diagnostic.span.start() as usize);
        Self {
            file,
            id: &diagnostic.id,
            severity: diagnostic.severity.as_str(),
            message: &diagnostic.message,
            line,
            column,
            span_start: diagnostic.span.start(),
            span_end: diagnostic.span.end(),
            hint: diagnostic.hint.as_deref(),
            help_link: descriptor(&diagnostic.id).map(|d| d.help_link()),
        }
    }
}

/// 1-based line and column of byte `offset` in `source`.
fn line_column(source: &str, offset: usize) -> (usize, usize) {
    let prefix = source.get(..offset).unwrap_or(source);
    let line = prefix.matches('\n').count() + 1;
    let line_start = prefix.rfind('\n').map_or(0, |i| i + 1);
    (line, prefix[line_start..].chars().count() + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cliguard_core::source_analysis::Span;
    use miette::Diagnostic as _;

    #[test]
    fn test_from_core_diagnostic_rule() {
        let core_diag = CoreDiagnostic::warning("Spectre1050", "Types must be explicit", Span::new(10, 15))
            .with_hint("pass `typeof(System.IO.DirectoryInfo)` as the last argument");
        let source = "class S { DirInfo Dir }";
        let diag = CheckDiagnostic::from_core_diagnostic(&core_diag, "Settings.cs", source);

        assert_eq!(diag.code().unwrap().to_string(), "Spectre1050");
        assert_eq!(diag.severity(), Some(miette::Severity::Warning));
        assert_eq!(
            diag.url().unwrap().to_string(),
            "https://spectreconsole.net/analyzer/rules/spectre1050"
        );
        assert!(diag.help().is_some());
        assert_eq!(diag.span.offset(), 10);
        assert_eq!(diag.span.len(), 5);
        assert_eq!(diag.label, "warning here");
    }

    #[test]
    fn test_from_core_diagnostic_host_error() {
        let core_diag = CoreDiagnostic::error("CG0001", "expected `]`", Span::new(4, 4));
        let diag = CheckDiagnostic::from_core_diagnostic(&core_diag, "Settings.cs", "[Foo");

        assert_eq!(diag.severity(), Some(miette::Severity::Error));
        assert!(diag.url().is_none());
        assert!(diag.help().is_none());
        assert_eq!(diag.span.len(), 0);
    }

    #[test]
    fn test_json_line_and_column() {
        let source = "using X;\nclass S {\n  int P;\n}";
        let offset = u32::try_from(source.find('P').unwrap()).unwrap();
        let core_diag = CoreDiagnostic::error("S1052", "bad", Span::new(offset, offset + 1));
        let json = JsonDiagnostic::new(&core_diag, "a.cs", source);

        assert_eq!((json.line, json.column), (3, 7));
        assert_eq!(json.severity, "error");
        let value = serde_json::to_value(&json).unwrap();
        assert_eq!(value["id"], "S1052");
        assert_eq!(
            value["help_link"],
            "https://spectreconsole.net/analyzer/rules/s1052"
        );
    }

    #[test]
    fn test_line_column_at_start() {
        assert_eq!(line_column("abc", 0), (1, 1));
        assert_eq!(line_column("a\n", 2), (2, 1));
    }
}

// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Validation of command-settings declarations.
//!
//! **DDD Context:** Analysis
//!
//! The engine reads a [`SemanticModel`] and never touches syntax. Per pass:
//!
//! 1. [`scanner`] yields binding properties of settings classes in source
//!    order.
//! 2. Every rule in [`rules::all_rules`] checks each property. Rules consult
//!    [`classifier`] and return at most one [`Finding`] per property.
//! 3. [`Analyzer`] turns findings into diagnostics, applies configured
//!    severity overrides and hands them to a [`DiagnosticSink`].
//!
//! Classes are independent, so [`Analyzer::analyze_parallel`] may check them
//! concurrently. Nothing is cached between passes.
//!
//! ```
//! use cliguard_core::analysis::analyze_source;
//! use cliguard_core::config::GlobalOptions;
//!
//! let source = r#"
//! using System.IO;
//! using Spectre.Console.Cli;
//!
//! class Settings : CommandSettings {
//!     [CommandOption("--dir")]
//!     public DirectoryInfo Dir { get; set; }
//! }
//! "#;
//! let options = GlobalOptions::new().with("build_property.enableaotanalyzer", "true");
//! let diagnostics = analyze_source(source, &options);
//! assert_eq!(diagnostics.len(), 1);
//! assert_eq!(diagnostics[0].id, "Spectre1050");
//! ```

// Spurious warnings from miette derive macro expansion
#![allow(unused_assignments)]

pub mod classifier;
pub mod descriptors;
pub mod finding;
pub mod rules;
pub mod scanner;

#[cfg(test)]
mod property_tests;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use ecow::EcoString;
use parking_lot::Mutex;
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, trace, warn};

pub use descriptors::{Descriptor, supported_diagnostics};
pub use finding::{Finding, FindingKind, InvalidTypeReason};
pub use rules::{Rule, RuleContext};

use crate::ast::SyntaxTree;
use crate::config::{AnalyzerConfigOptions, SeverityOverride, aot_analysis_enabled, severity_key};
use crate::diagnostics::{Diagnostic, Severity, UNRESOLVED_ATTRIBUTE, UNRESOLVED_TYPE, sort_diagnostics};
use crate::semantic_analysis::{Compilation, SemanticModel, TypeId};

/// Host diagnostics whose severity can be overridden. Syntax errors cannot.
const CONFIGURABLE_HOST_IDS: [&str; 2] = [UNRESOLVED_TYPE, UNRESOLVED_ATTRIBUTE];

// ============================================================================
// Sinks and cancellation
// ============================================================================

/// A concurrency-safe collector of diagnostics.
pub trait DiagnosticSink: Sync {
    fn report(&self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Mutex<Vec<Diagnostic>> {
    fn report(&self, diagnostic: Diagnostic) {
        self.lock().push(diagnostic);
    }
}

/// Cooperative cancellation for an analysis pass. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Passes in progress stop at the next class.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Errors that abort an analysis pass.
#[derive(Debug, Error, miette::Diagnostic)]
pub enum AnalysisError {
    /// The pass was cancelled before it finished.
    #[error("analysis was cancelled")]
    #[diagnostic(code(cliguard::analysis::cancelled))]
    Cancelled,
}

// ============================================================================
// Analyzer
// ============================================================================

/// Runs every rule over a semantic model.
///
/// Configuration is read once, at construction.
pub struct Analyzer {
    rules: Vec<Box<dyn Rule>>,
    context: RuleContext,
    severities: BTreeMap<EcoString, SeverityOverride>,
}

impl std::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer")
            .field("rules", &self.rules.iter().map(|r| r.name()).collect::<Vec<_>>())
            .field("context", &self.context)
            .field("severities", &self.severities)
            .finish()
    }
}

impl Analyzer {
    /// Reads the AOT switch and severity overrides from `options`.
    ///
    /// Unknown severity values are ignored with a warning.
    #[must_use]
    pub fn new(options: &dyn AnalyzerConfigOptions) -> Self {
        let context = RuleContext {
            aot_enabled: aot_analysis_enabled(options),
        };
        let ids = supported_diagnostics()
            .iter()
            .map(|descriptor| descriptor.id)
            .chain(CONFIGURABLE_HOST_IDS);
        let mut severities = BTreeMap::new();
        for id in ids {
            let key = severity_key(id);
            let Some(value) = options.get(&key) else {
                continue;
            };
            match value.parse::<SeverityOverride>() {
                Ok(severity) => {
                    severities.insert(EcoString::from(id), severity);
                }
                Err(()) => warn!(%key, value, "ignoring unknown severity"),
            }
        }
        debug!(aot = context.aot_enabled, overrides = severities.len(), "analyzer configured");
        Self {
            rules: rules::all_rules(),
            context,
            severities,
        }
    }

    /// The per-pass settings handed to rules.
    #[must_use]
    pub fn context(&self) -> RuleContext {
        self.context
    }

    /// Applies the configured severity to `diagnostic`, or returns `None`
    /// if it is suppressed.
    #[must_use]
    pub fn apply_severity(&self, mut diagnostic: Diagnostic) -> Option<Diagnostic> {
        match self.severities.get(&diagnostic.id) {
            None => {}
            Some(SeverityOverride::None) => return None,
            Some(SeverityOverride::Error) => diagnostic.severity = Severity::Error,
            Some(SeverityOverride::Warning) => diagnostic.severity = Severity::Warning,
        }
        Some(diagnostic)
    }

    /// Checks every settings class in source order.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Cancelled`] if `cancel` fires; diagnostics
    /// for classes already checked stay in `sink`.
    pub fn analyze(
        &self,
        model: &dyn SemanticModel,
        sink: &dyn DiagnosticSink,
        cancel: &CancellationToken,
    ) -> Result<(), AnalysisError> {
        debug!(rules = self.rules.len(), aot = self.context.aot_enabled, "analysis pass");
        for class in scanner::settings_classes(model) {
            if cancel.is_cancelled() {
                return Err(AnalysisError::Cancelled);
            }
            self.analyze_class(model, class, sink);
        }
        Ok(())
    }

    /// Like [`Analyzer::analyze`], checking classes concurrently. The order
    /// in which diagnostics reach `sink` is unspecified.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Cancelled`] if `cancel` fires.
    pub fn analyze_parallel(
        &self,
        model: &dyn SemanticModel,
        sink: &dyn DiagnosticSink,
        cancel: &CancellationToken,
    ) -> Result<(), AnalysisError> {
        let classes: Vec<TypeId> = scanner::settings_classes(model).collect();
        debug!(classes = classes.len(), "parallel analysis pass");
        classes.par_iter().try_for_each(|class| {
            if cancel.is_cancelled() {
                return Err(AnalysisError::Cancelled);
            }
            self.analyze_class(model, *class, sink);
            Ok(())
        })
    }

    fn analyze_class(&self, model: &dyn SemanticModel, class: TypeId, sink: &dyn DiagnosticSink) {
        debug!(class = %model.display(class), "checking settings class");
        for property in scanner::binding_properties(model, class) {
            for rule in &self.rules {
                let Some(finding) = rule.check(model, &property, &self.context) else {
                    continue;
                };
                let diagnostic = finding.to_diagnostic(model);
                trace!(rule = rule.name(), id = %diagnostic.id, property = %finding.property, "finding");
                if let Some(diagnostic) = self.apply_severity(diagnostic) {
                    sink.report(diagnostic);
                }
            }
        }
    }

    /// Binds `tree` and returns its syntax and binding diagnostics together
    /// with rule diagnostics, sorted by span.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Cancelled`] if `cancel` fires.
    pub fn check(
        &self,
        tree: &SyntaxTree,
        cancel: &CancellationToken,
    ) -> Result<Vec<Diagnostic>, AnalysisError> {
        let compilation = Compilation::bind(tree);
        let sink: Mutex<Vec<Diagnostic>> = Mutex::new(Vec::new());
        for diagnostic in tree.diagnostics().iter().chain(compilation.diagnostics()) {
            if let Some(diagnostic) = self.apply_severity(diagnostic.clone()) {
                sink.report(diagnostic);
            }
        }
        self.analyze(&compilation, &sink, cancel)?;
        let mut diagnostics = sink.into_inner();
        sort_diagnostics(&mut diagnostics);
        Ok(diagnostics)
    }
}

/// Parses, binds and analyzes `text` in one call.
#[must_use]
pub fn analyze_source(text: &str, options: &dyn AnalyzerConfigOptions) -> Vec<Diagnostic> {
    Analyzer::new(options)
        .check(&SyntaxTree::parse(text), &CancellationToken::new())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AOT_ANALYZER_KEY, GlobalOptions};
    use crate::diagnostics::SYNTAX_ERROR;

    const SETTINGS: &str = r#"
using System.IO;
using System.Collections.Generic;
using Spectre.Console.Cli;

public sealed class FirstSettings : CommandSettings
{
    [CommandOption("--dir")]
    public DirectoryInfo Dir { get; set; }

    [CommandOption("--map")]
    public Dictionary<int, string> Map { get; set; }
}

public sealed class SecondSettings : CommandSettings
{
    [CommandArgument(0, "<file>")]
    public FileInfo File { get; set; }
}

public sealed class NotSettings
{
    [CommandOption("--ignored")]
    public Stream Ignored { get; set; }
}
"#;

    fn aot() -> GlobalOptions {
        GlobalOptions::new().with(AOT_ANALYZER_KEY, "true")
    }

    fn ids(diagnostics: &[Diagnostic]) -> Vec<&str> {
        diagnostics.iter().map(|d| d.id.as_str()).collect()
    }

    #[test]
    fn reports_in_source_order() {
        let diagnostics = analyze_source(SETTINGS, &aot());
        assert_eq!(
            ids(&diagnostics),
            ["Spectre1050", "S1052", "Spectre1050", "Spectre1050"]
        );
    }

    #[test]
    fn classes_outside_the_settings_hierarchy_are_ignored() {
        let diagnostics = analyze_source(SETTINGS, &aot());
        assert!(diagnostics.iter().all(|d| d.arguments[0] != "Ignored"));
    }

    #[test]
    fn severity_overrides_apply() {
        let options = aot()
            .with(severity_key("S1052"), "warning")
            .with(severity_key("Spectre1050"), "none");
        let diagnostics = analyze_source(SETTINGS, &options);
        assert_eq!(ids(&diagnostics), ["S1052"]);
        assert_eq!(diagnostics[0].severity, Severity::Warning);
    }

    #[test]
    fn unknown_severity_values_are_ignored() {
        let analyzer = Analyzer::new(&aot().with(severity_key("S1052"), "loud"));
        let diagnostic = Diagnostic::error("S1052", "m", crate::source_analysis::Span::default());
        assert_eq!(analyzer.apply_severity(diagnostic.clone()), Some(diagnostic));
    }

    #[test]
    fn syntax_errors_keep_their_severity() {
        let options = GlobalOptions::new().with(severity_key(SYNTAX_ERROR), "none");
        let diagnostics = analyze_source("class S : CommandSettings { public int }", &options);
        assert!(diagnostics.iter().any(|d| d.id == SYNTAX_ERROR && d.is_error()));
    }

    #[test]
    fn host_diagnostics_are_included_and_configurable() {
        let source = "using Spectre.Console.Cli;\nclass S : CommandSettings {\n[CommandOption(\"-x\")] public Missing X { get; set; }\n}";
        assert_eq!(ids(&analyze_source(source, &aot())), [UNRESOLVED_TYPE]);
        let options = aot().with(severity_key(UNRESOLVED_TYPE), "none");
        assert!(analyze_source(source, &options).is_empty());
    }

    #[test]
    fn cancelled_pass_returns_error() {
        let analyzer = Analyzer::new(&aot());
        let cancel = CancellationToken::new();
        cancel.clone().cancel();
        let result = analyzer.check(&SyntaxTree::parse(SETTINGS), &cancel);
        assert!(matches!(result, Err(AnalysisError::Cancelled)));
    }

    #[test]
    fn parallel_matches_sequential() {
        let compilation = Compilation::bind(&SyntaxTree::parse(SETTINGS));
        let analyzer = Analyzer::new(&aot());
        let cancel = CancellationToken::new();

        let sequential: Mutex<Vec<Diagnostic>> = Mutex::new(Vec::new());
        analyzer.analyze(&compilation, &sequential, &cancel).unwrap();
        let parallel: Mutex<Vec<Diagnostic>> = Mutex::new(Vec::new());
        analyzer.analyze_parallel(&compilation, &parallel, &cancel).unwrap();

        let mut sequential = sequential.into_inner();
        let mut parallel = parallel.into_inner();
        sort_diagnostics(&mut sequential);
        sort_diagnostics(&mut parallel);
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn aot_flag_is_read_once() {
        assert!(Analyzer::new(&aot()).context().aot_enabled);
        assert!(!Analyzer::new(&GlobalOptions::new()).context().aot_enabled);
    }
}

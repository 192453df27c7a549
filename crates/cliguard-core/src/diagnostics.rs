// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Diagnostics reported by the host and by the analysis rules.
//!
//! **DDD Context:** Shared Kernel
//!
//! A [`Diagnostic`] is an immutable record: a stable identifier, a severity,
//! the span it is anchored to, the rendered message and the message-format
//! arguments it was rendered from. Rule findings, syntax errors and binding
//! failures all travel as diagnostics; none of them are Rust errors.

use std::collections::BTreeMap;

use ecow::EcoString;

use crate::source_analysis::Span;

/// A syntax error found by the parser.
pub const SYNTAX_ERROR: &str = "CG0001";

/// A type name that could not be resolved.
pub const UNRESOLVED_TYPE: &str = "CG0002";

/// An attribute name that could not be resolved to an attribute class.
pub const UNRESOLVED_ATTRIBUTE: &str = "CG0003";

/// Diagnostic severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    /// A problem that should fail the build.
    Error,
    /// A problem that should be addressed.
    Warning,
}

impl Severity {
    /// Lowercase name used in configuration and machine-readable output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// A diagnostic message anchored to a source span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Stable identifier, e.g. `Spectre1050` or `CG0001`.
    pub id: EcoString,
    /// The severity of the diagnostic.
    pub severity: Severity,
    /// The rendered message.
    pub message: EcoString,
    /// The source location.
    pub span: Span,
    /// The message-format arguments, in format order.
    pub arguments: Vec<EcoString>,
    /// Extra facts for code fixes, keyed by name.
    pub properties: BTreeMap<EcoString, EcoString>,
    /// Optional hint for how to fix the issue.
    pub hint: Option<EcoString>,
}

impl Diagnostic {
    /// Creates a diagnostic with no arguments or properties.
    #[must_use]
    pub fn new(
        id: impl Into<EcoString>,
        severity: Severity,
        message: impl Into<EcoString>,
        span: Span,
    ) -> Self {
        Self {
            id: id.into(),
            severity,
            message: message.into(),
            span,
            arguments: Vec::new(),
            properties: BTreeMap::new(),
            hint: None,
        }
    }

    /// Creates a new error diagnostic.
    #[must_use]
    pub fn error(id: impl Into<EcoString>, message: impl Into<EcoString>, span: Span) -> Self {
        Self::new(id, Severity::Error, message, span)
    }

    /// Creates a new warning diagnostic.
    #[must_use]
    pub fn warning(id: impl Into<EcoString>, message: impl Into<EcoString>, span: Span) -> Self {
        Self::new(id, Severity::Warning, message, span)
    }

    /// Records the message-format arguments.
    #[must_use]
    pub fn with_arguments<I, S>(mut self, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<EcoString>,
    {
        self.arguments = arguments.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a named property for code fixes.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<EcoString>, value: impl Into<EcoString>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Attaches a hint.
    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<EcoString>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Returns the named property, if present.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(EcoString::as_str)
    }

    /// Returns `true` if this is an error.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Sorts diagnostics by position, then by id, so output is stable.
pub fn sort_diagnostics(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by(|a, b| {
        (a.span.start(), a.span.end(), &a.id).cmp(&(b.span.start(), b.span.end(), &b.id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_methods_fill_fields() {
        let diagnostic = Diagnostic::warning("Spectre1050", "missing type", Span::new(4, 9))
            .with_arguments(["ProjectPath"])
            .with_property("declared_type_is_reference", "true")
            .with_hint("add typeof(...)");

        assert_eq!(diagnostic.severity, Severity::Warning);
        assert_eq!(diagnostic.arguments, vec![EcoString::from("ProjectPath")]);
        assert_eq!(diagnostic.property("declared_type_is_reference"), Some("true"));
        assert_eq!(diagnostic.property("missing"), None);
        assert_eq!(diagnostic.hint.as_deref(), Some("add typeof(...)"));
        assert!(!diagnostic.is_error());
    }

    #[test]
    fn sort_orders_by_span_then_id() {
        let mut diagnostics = vec![
            Diagnostic::error("S1052", "b", Span::new(10, 12)),
            Diagnostic::warning("Spectre1050", "a", Span::new(10, 12)),
            Diagnostic::error(SYNTAX_ERROR, "c", Span::new(2, 3)),
        ];
        sort_diagnostics(&mut diagnostics);
        let ids: Vec<_> = diagnostics.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, ["CG0001", "S1052", "Spectre1050"]);
    }

    #[test]
    fn severity_names() {
        assert_eq!(Severity::Error.to_string(), "error");
        assert_eq!(Severity::Warning.as_str(), "warning");
    }
}

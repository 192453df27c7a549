// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Syntax errors produced while parsing declarations.
//!
//! Parsing never stops at the first problem: each [`ParseError`] is recorded
//! and surfaced as a `CG0001` [`Diagnostic`](crate::diagnostics::Diagnostic)
//! on the resulting syntax tree.

// Spurious warnings from miette derive macro expansion
#![allow(unused_assignments)]

use ecow::EcoString;
use miette::Diagnostic;
use thiserror::Error;

use super::Span;
use crate::diagnostics::{self, Severity};

/// A syntax error with the location it was found at.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("{kind}")]
#[diagnostic(code(CG0001))]
pub struct ParseError {
    /// What went wrong.
    #[source]
    pub kind: ParseErrorKind,
    /// The source location of the error.
    #[label("here")]
    pub span: Span,
}

impl ParseError {
    /// Creates a new syntax error.
    #[must_use]
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Creates an "expected X, found Y" error.
    #[must_use]
    pub fn expected(expected: impl Into<EcoString>, found: impl Into<EcoString>, span: Span) -> Self {
        Self::new(
            ParseErrorKind::Expected {
                expected: expected.into(),
                found: found.into(),
            },
            span,
        )
    }

    /// Converts the error into a host diagnostic.
    #[must_use]
    pub fn to_diagnostic(&self) -> diagnostics::Diagnostic {
        diagnostics::Diagnostic::new(
            diagnostics::SYNTAX_ERROR,
            Severity::Error,
            self.to_string(),
            self.span,
        )
    }
}

/// The kind of syntax error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// A specific token or construct was required.
    #[error("expected {expected}, found `{found}`")]
    Expected {
        /// Description of what was expected.
        expected: EcoString,
        /// The text that was found instead.
        found: EcoString,
    },

    /// A string or character literal ran to the end of its line or file.
    #[error("unterminated literal `{0}`")]
    UnterminatedLiteral(EcoString),

    /// A character that is not part of the language.
    #[error("unexpected character `{0}`")]
    UnexpectedCharacter(EcoString),

    /// An opening delimiter was never closed.
    #[error("unclosed `{0}`")]
    Unclosed(char),

    /// Nesting exceeded the parser's depth limit.
    #[error("nesting is too deep (maximum {0} levels)")]
    NestingTooDeep(usize),
}

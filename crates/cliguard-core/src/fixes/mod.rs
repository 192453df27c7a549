// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Code fixes for analysis diagnostics.
//!
//! **DDD Context:** Code Fixes
//!
//! A fix is a list of [`TextEdit`]s against the text of a [`SyntaxTree`].
//! Applying it yields new text that is reparsed into a fresh tree; the
//! input tree is never modified. Fixes fail closed: when the diagnostic
//! cannot be located, or the rewrite would introduce syntax errors, the
//! input is returned unchanged. [`fix_all`] checks its cancellation token
//! before each fix and stops with [`AnalysisError::Cancelled`].

mod attribute_arguments;

pub use attribute_arguments::AttributeArgumentFix;

use ecow::EcoString;
use tracing::{debug, warn};

use crate::analysis::{AnalysisError, CancellationToken};
use crate::ast::SyntaxTree;
use crate::diagnostics::Diagnostic;
use crate::source_analysis::Span;

/// Replace the text at `span` with `new_text`. An empty span inserts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextEdit {
    pub span: Span,
    pub new_text: EcoString,
}

impl TextEdit {
    #[must_use]
    pub fn replace(span: Span, new_text: impl Into<EcoString>) -> Self {
        Self {
            span,
            new_text: new_text.into(),
        }
    }

    #[must_use]
    pub fn insert(offset: u32, new_text: impl Into<EcoString>) -> Self {
        Self::replace(Span::at(offset), new_text)
    }
}

/// A fix offered for one diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeFix {
    /// Shown to the user.
    pub title: &'static str,
    /// Fixes with the same key can be applied together.
    pub equivalence_key: &'static str,
    /// Non-overlapping edits, in source order.
    pub edits: Vec<TextEdit>,
}

impl CodeFix {
    /// Applies the edits to `text`, last edit first.
    #[must_use]
    pub fn apply(&self, text: &str) -> String {
        let mut out = text.to_string();
        for edit in self.edits.iter().rev() {
            let range = edit.span.as_range();
            if out.get(range.clone()).is_some() {
                out.replace_range(range, &edit.new_text);
            }
        }
        out
    }
}

/// Returns true if some fix handles diagnostics with `id`.
#[must_use]
pub fn is_fixable(id: &str) -> bool {
    AttributeArgumentFix::fixable_ids().contains(&id)
}

/// The fix for `diagnostic`, if one applies.
#[must_use]
pub fn code_fix(tree: &SyntaxTree, diagnostic: &Diagnostic) -> Option<CodeFix> {
    if !is_fixable(&diagnostic.id) {
        return None;
    }
    AttributeArgumentFix.code_fix(tree, diagnostic)
}

/// Applies the fix for `diagnostic` and returns the rewritten tree, or a
/// copy of `tree` if no fix applies or the rewrite adds syntax errors.
#[must_use]
pub fn synthesize(tree: &SyntaxTree, diagnostic: &Diagnostic) -> SyntaxTree {
    let Some(fix) = code_fix(tree, diagnostic) else {
        debug!(id = %diagnostic.id, "no fix applies");
        return tree.clone();
    };
    let rewritten = SyntaxTree::parse(fix.apply(tree.text()));
    if rewritten.diagnostics().len() > tree.diagnostics().len() {
        warn!(id = %diagnostic.id, "fix introduced syntax errors; discarding");
        return tree.clone();
    }
    rewritten
}

/// Applies every fixable diagnostic in `diagnostics`, at most one per
/// location, working from the end of the file backwards so earlier spans
/// stay valid.
///
/// # Errors
///
/// Returns [`AnalysisError::Cancelled`] if `cancel` fires before every fix
/// has been applied. Partial rewrites are discarded.
pub fn fix_all(
    tree: &SyntaxTree,
    diagnostics: &[Diagnostic],
    cancel: &CancellationToken,
) -> Result<SyntaxTree, AnalysisError> {
    let mut pending: Vec<&Diagnostic> = diagnostics.iter().filter(|d| is_fixable(&d.id)).collect();
    pending.sort_by_key(|d| std::cmp::Reverse(d.span));
    pending.dedup_by_key(|d| d.span);

    let mut current = tree.clone();
    for diagnostic in pending {
        if cancel.is_cancelled() {
            debug!("fix pass cancelled");
            return Err(AnalysisError::Cancelled);
        }
        current = synthesize(&current, diagnostic);
    }
    debug!(changed = current.text() != tree.text(), "applied fixes");
    Ok(current)
}

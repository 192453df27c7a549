// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The diagnostic catalog.
//!
//! Each rule reports through a [`Descriptor`]: a stable id, default severity,
//! title, message format and help link. Message formats use positional
//! `{0}`, `{1}` placeholders filled from the diagnostic's arguments.

use ecow::EcoString;

use crate::diagnostics::{Diagnostic, Severity};
use crate::source_analysis::Span;

const HELP_LINK_BASE: &str = "https://spectreconsole.net/analyzer/rules/";

/// Static metadata for one diagnostic id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor {
    pub id: &'static str,
    pub title: &'static str,
    pub message_format: &'static str,
    pub category: &'static str,
    pub default_severity: Severity,
}

impl Descriptor {
    /// Documentation URL for this rule.
    #[must_use]
    pub fn help_link(&self) -> String {
        format!("{HELP_LINK_BASE}{}", self.id.to_lowercase())
    }

    /// Renders the message format with `arguments`. Placeholders without a
    /// matching argument are left as written.
    #[must_use]
    pub fn format_message(&self, arguments: &[EcoString]) -> EcoString {
        let mut out = String::with_capacity(self.message_format.len());
        let mut rest = self.message_format;
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let placeholder = after
                .find('}')
                .and_then(|close| Some((close, after[..close].parse::<usize>().ok()?)));
            match placeholder {
                Some((close, index)) if index < arguments.len() => {
                    out.push_str(&arguments[index]);
                    rest = &after[close + 1..];
                }
                _ => {
                    out.push('{');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out.into()
    }

    /// Builds a diagnostic at `span` with this descriptor's id, default
    /// severity and rendered message.
    #[must_use]
    pub fn diagnostic(&self, span: Span, arguments: Vec<EcoString>) -> Diagnostic {
        let message = self.format_message(&arguments);
        Diagnostic::new(self.id, self.default_severity, message, span).with_arguments(arguments)
    }
}

/// `Spectre1050`: AOT mode needs an explicit type argument.
pub const AOT_REQUIRES_TYPE: Descriptor = Descriptor {
    id: "Spectre1050",
    title: "Types must be explicitly defined when using non-intrinsic properties while publishing in AOT.",
    message_format: "Types must be explicitly defined on CommandArgument or CommandOption for '{0}' when using non-intrinsic properties while publishing in AOT.",
    category: "Usage",
    default_severity: Severity::Warning,
};

/// `Spectre1051`: the explicit type argument differs from the property type.
pub const AOT_REQUIRES_MATCH_TYPES: Descriptor = Descriptor {
    id: "Spectre1051",
    title: "Type must match the property type.",
    message_format: "Type must match the property type. {0} expected {1}, found {2}",
    category: "Usage",
    default_severity: Severity::Warning,
};

/// `S1052`: the property type cannot be bound at all.
pub const INVALID_PROPERTY_TYPE: Descriptor = Descriptor {
    id: "S1052",
    title: "Invalid property type for CommandArgument or CommandOption",
    message_format: "The property '{0}' of type '{1}' is not a valid option type for Spectre.Console commands. {2}",
    category: "Usage",
    default_severity: Severity::Error,
};

/// Every descriptor a rule can report, in id order.
#[must_use]
pub fn supported_diagnostics() -> &'static [Descriptor] {
    &[AOT_REQUIRES_TYPE, AOT_REQUIRES_MATCH_TYPES, INVALID_PROPERTY_TYPE]
}

/// Looks up a descriptor by id.
#[must_use]
pub fn descriptor(id: &str) -> Option<&'static Descriptor> {
    supported_diagnostics().iter().find(|d| d.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_links_use_lowercase_ids() {
        assert_eq!(
            AOT_REQUIRES_TYPE.help_link(),
            "https://spectreconsole.net/analyzer/rules/spectre1050"
        );
        assert_eq!(
            INVALID_PROPERTY_TYPE.help_link(),
            "https://spectreconsole.net/analyzer/rules/s1052"
        );
    }

    #[test]
    fn formats_positional_arguments() {
        let message = AOT_REQUIRES_MATCH_TYPES.format_message(&[
            "Dir".into(),
            "System.IO.DirectoryInfo".into(),
            "System.IO.FileInfo".into(),
        ]);
        assert_eq!(
            message,
            "Type must match the property type. Dir expected System.IO.DirectoryInfo, found System.IO.FileInfo"
        );
    }

    #[test]
    fn missing_arguments_leave_placeholders() {
        let message = INVALID_PROPERTY_TYPE.format_message(&["P".into()]);
        assert!(message.starts_with("The property 'P' of type '{1}'"));
        assert!(message.ends_with("commands. {2}"));
    }

    #[test]
    fn diagnostic_carries_default_severity_and_arguments() {
        let diagnostic = INVALID_PROPERTY_TYPE.diagnostic(
            Span::new(3, 7),
            vec!["P".into(), "int[]".into(), "reason".into()],
        );
        assert_eq!(diagnostic.id, "S1052");
        assert_eq!(diagnostic.severity, Severity::Error);
        assert_eq!(diagnostic.arguments.len(), 3);
    }

    #[test]
    fn catalog_lookup() {
        assert_eq!(descriptor("Spectre1051"), Some(&AOT_REQUIRES_MATCH_TYPES));
        assert_eq!(descriptor("CG0001"), None);
        assert_eq!(supported_diagnostics().len(), 3);
    }
}

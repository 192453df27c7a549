// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Adds or repairs the explicit type argument of binding attributes.
//!
//! **DDD Context:** Code Fixes
//!
//! For every binding attribute on the flagged property:
//!
//! - `[CommandOption("-d")]` gains a trailing `typeof(T)`.
//! - An existing `typeof(...)`, or the value of an `optionType:` /
//!   `argumentType:` argument, is replaced in place; the name is kept.
//! - `[CommandOption]` and `[CommandOption()]` get `(typeof(T))`.
//! - A new argument goes before the first `Name = value` argument, so the
//!   list stays well-formed.
//!
//! `T` is the property type as written. A trailing `?` is dropped for
//! reference types, whose nullable annotation is not part of the type.
//! Every other argument and all surrounding text are left untouched.

use tracing::trace;

use super::{CodeFix, TextEdit};
use crate::analysis::descriptors::{AOT_REQUIRES_MATCH_TYPES, AOT_REQUIRES_TYPE};
use crate::analysis::finding::DECLARED_TYPE_IS_REFERENCE_PROPERTY;
use crate::analysis::scanner::TYPE_ARGUMENT_NAMES;
use crate::ast::{
    ArgumentNameKind, Attribute, AttributeArgument, PropertyDeclaration, SyntaxTree, TypeSyntax,
};
use crate::diagnostics::Diagnostic;

/// Attribute names as they may be written, without the `Attribute` suffix.
const BINDING_ATTRIBUTE_NAMES: [&str; 2] = ["CommandOption", "CommandArgument"];

/// The code fix for `Spectre1050` and `Spectre1051`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributeArgumentFix;

impl AttributeArgumentFix {
    pub const TITLE: &'static str = "Add or fix type argument for explicit AOT usage";

    pub const EQUIVALENCE_KEY: &'static str = "AddOrUpdateTypeArgument";

    /// Diagnostic ids this fix handles.
    #[must_use]
    pub fn fixable_ids() -> &'static [&'static str] {
        &[AOT_REQUIRES_TYPE.id, AOT_REQUIRES_MATCH_TYPES.id]
    }

    /// Builds the edits for the property enclosing `diagnostic`.
    ///
    /// Returns `None` if no property encloses the diagnostic or the property
    /// has no binding attribute.
    #[must_use]
    pub fn code_fix(self, tree: &SyntaxTree, diagnostic: &Diagnostic) -> Option<CodeFix> {
        let property = tree.property_at(diagnostic.span.start())?;
        let drop_nullable = diagnostic.property(DECLARED_TYPE_IS_REFERENCE_PROPERTY) == Some("true");
        let type_of = format!("typeof({})", declared_type_text(tree, property, drop_nullable));

        let edits: Vec<TextEdit> = property
            .property_attributes()
            .filter(|attribute| is_binding_attribute(attribute))
            .map(|attribute| edit_for(attribute, &type_of))
            .inspect(|edit| trace!(span = ?edit.span, text = %edit.new_text, "type argument edit"))
            .collect();
        if edits.is_empty() {
            return None;
        }
        Some(CodeFix {
            title: Self::TITLE,
            equivalence_key: Self::EQUIVALENCE_KEY,
            edits,
        })
    }
}

fn is_binding_attribute(attribute: &Attribute) -> bool {
    let name = attribute.simple_name();
    let name = name.strip_suffix("Attribute").unwrap_or(name);
    BINDING_ATTRIBUTE_NAMES.contains(&name)
}

fn declared_type_text<'t>(
    tree: &'t SyntaxTree,
    property: &PropertyDeclaration,
    drop_nullable: bool,
) -> &'t str {
    let ty = match &property.ty {
        TypeSyntax::Nullable { inner, .. } if drop_nullable => inner.as_ref(),
        ty => ty,
    };
    tree.slice(ty.span()).trim()
}

/// The single edit that makes `attribute` carry `type_of`.
fn edit_for(attribute: &Attribute, type_of: &str) -> TextEdit {
    let Some(list) = &attribute.arguments else {
        return TextEdit::insert(attribute.name.span().end(), format!("({type_of})"));
    };
    if let Some(existing) = list.arguments.iter().find(|argument| is_type_argument(argument)) {
        return TextEdit::replace(existing.expression.span(), type_of);
    }
    let first_named = list
        .arguments
        .iter()
        .find(|argument| argument.name.as_ref().is_some_and(|n| n.kind == ArgumentNameKind::Equals));
    match (first_named, list.arguments.last()) {
        (Some(named), _) => TextEdit::insert(named.span.start(), format!("{type_of}, ")),
        (None, Some(last)) => TextEdit::insert(last.span.end(), format!(", {type_of}")),
        (None, None) => TextEdit::insert(list.close.start(), type_of),
    }
}

/// An argument already naming the binding type: an unnamed `typeof(...)`,
/// or any value given for `optionType` / `argumentType`.
fn is_type_argument(argument: &AttributeArgument) -> bool {
    match &argument.name {
        None => argument.expression.is_type_of(),
        Some(name) => TYPE_ARGUMENT_NAMES.contains(&name.name.name.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze_source;
    use crate::config::{AOT_ANALYZER_KEY, GlobalOptions};
    use crate::fixes::synthesize;

    fn wrap(property: &str) -> String {
        format!(
            "using System;\nusing System.IO;\nusing Spectre.Console.Cli;\n\
             class S : CommandSettings {{\n    {property}\n}}\n"
        )
    }

    /// Analyzes `property` in AOT mode, applies the fix for the first AOT
    /// diagnostic and returns the rewritten property line.
    fn fix(property: &str) -> String {
        let source = wrap(property);
        let options = GlobalOptions::new().with(AOT_ANALYZER_KEY, "true");
        let diagnostics = analyze_source(&source, &options);
        let diagnostic = diagnostics
            .iter()
            .find(|d| d.id.starts_with("Spectre105"))
            .unwrap_or_else(|| panic!("no AOT diagnostic for {property}: {diagnostics:?}"));
        let tree = synthesize(&SyntaxTree::parse(source.clone()), diagnostic);
        tree.text()
            .lines()
            .nth(4)
            .unwrap()
            .trim()
            .to_string()
    }

    #[test]
    fn appends_missing_type() {
        assert_eq!(
            fix("[CommandOption(\"--dir\")] public DirectoryInfo Dir { get; set; }"),
            "[CommandOption(\"--dir\", typeof(DirectoryInfo))] public DirectoryInfo Dir { get; set; }"
        );
    }

    #[test]
    fn replaces_mismatched_type() {
        assert_eq!(
            fix("[CommandOption(\"--dir\", typeof(FileInfo))] public DirectoryInfo Dir { get; set; }"),
            "[CommandOption(\"--dir\", typeof(DirectoryInfo))] public DirectoryInfo Dir { get; set; }"
        );
    }

    #[test]
    fn keeps_colon_name() {
        assert_eq!(
            fix("[CommandArgument(0, \"<f>\", argumentType: typeof(DirectoryInfo))] public FileInfo F { get; set; }"),
            "[CommandArgument(0, \"<f>\", argumentType: typeof(FileInfo))] public FileInfo F { get; set; }"
        );
    }

    #[test]
    fn creates_argument_list() {
        assert_eq!(
            fix("[CommandOptionAttribute] public Uri Link { get; set; }"),
            "[CommandOptionAttribute(typeof(Uri))] public Uri Link { get; set; }"
        );
    }

    #[test]
    fn fills_empty_argument_list() {
        assert_eq!(
            fix("[CommandOption()] public Uri Link { get; set; }"),
            "[CommandOption(typeof(Uri))] public Uri Link { get; set; }"
        );
    }

    #[test]
    fn inserts_before_named_arguments() {
        assert_eq!(
            fix("[CommandOption(\"-t\", IsHidden = true)] public TimeSpan Timeout { get; set; }"),
            "[CommandOption(\"-t\", typeof(TimeSpan), IsHidden = true)] public TimeSpan Timeout { get; set; }"
        );
    }

    #[test]
    fn keeps_value_type_nullable_annotation() {
        assert_eq!(
            fix("[CommandOption(\"-t\")] public TimeSpan? Timeout { get; set; }"),
            "[CommandOption(\"-t\", typeof(TimeSpan?))] public TimeSpan? Timeout { get; set; }"
        );
    }

    #[test]
    fn drops_reference_type_nullable_annotation() {
        assert_eq!(
            fix("[CommandOption(\"--dir\")] public DirectoryInfo? Dir { get; set; }"),
            "[CommandOption(\"--dir\", typeof(DirectoryInfo))] public DirectoryInfo? Dir { get; set; }"
        );
    }

    #[test]
    fn fixes_every_binding_attribute() {
        assert_eq!(
            fix("[CommandArgument(0, \"<d>\")][CommandOption(\"-d\")] public DirectoryInfo D { get; set; }"),
            "[CommandArgument(0, \"<d>\", typeof(DirectoryInfo))][CommandOption(\"-d\", typeof(DirectoryInfo))] public DirectoryInfo D { get; set; }"
        );
    }

    #[test]
    fn leaves_other_attributes_alone() {
        assert_eq!(
            fix("[Obsolete(\"x\")] [CommandOption(\"--dir\")] public DirectoryInfo Dir { get; set; }"),
            "[Obsolete(\"x\")] [CommandOption(\"--dir\", typeof(DirectoryInfo))] public DirectoryInfo Dir { get; set; }"
        );
    }

    #[test]
    fn skips_lists_targeting_something_else() {
        assert_eq!(
            fix("[field: CommandOption(\"--raw\")] [property: CommandOption(\"--dir\")] public DirectoryInfo Dir { get; set; }"),
            "[field: CommandOption(\"--raw\")] [property: CommandOption(\"--dir\", typeof(DirectoryInfo))] public DirectoryInfo Dir { get; set; }"
        );
    }

    #[test]
    fn field_targeted_binding_attribute_has_no_fix() {
        let tree = SyntaxTree::parse(wrap("[field: CommandOption(\"--dir\")] public DirectoryInfo Dir { get; set; }"));
        let offset = u32::try_from(tree.text().find("Dir {").unwrap()).unwrap();
        let diagnostic = Diagnostic::warning(
            "Spectre1050",
            "m",
            crate::source_analysis::Span::new(offset, offset + 3),
        );
        assert!(AttributeArgumentFix.code_fix(&tree, &diagnostic).is_none());
    }

    #[test]
    fn property_without_binding_attribute_has_no_fix() {
        let tree = SyntaxTree::parse(wrap("public DirectoryInfo Dir { get; set; }"));
        let offset = u32::try_from(tree.text().find("Dir {").unwrap()).unwrap();
        let diagnostic = Diagnostic::warning(
            "Spectre1050",
            "m",
            crate::source_analysis::Span::new(offset, offset + 3),
        );
        assert!(AttributeArgumentFix.code_fix(&tree, &diagnostic).is_none());
    }
}

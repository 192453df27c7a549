// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Rule: in AOT mode, binding attributes must name the property type.
//!
//! Without reflection the framework cannot discover how to bind a
//! non-intrinsic property, so the attribute has to say it explicitly:
//!
//! ```text
//! // Flagged (Spectre1050)
//! [CommandOption("--dir")]
//! public DirectoryInfo Dir { get; set; }
//!
//! // Flagged (Spectre1051): expected DirectoryInfo, found FileInfo
//! [CommandOption("--dir", typeof(FileInfo))]
//! public DirectoryInfo Dir { get; set; }
//!
//! // Good
//! [CommandOption("--dir", typeof(DirectoryInfo))]
//! public DirectoryInfo Dir { get; set; }
//! ```
//!
//! Intrinsic types and keyed collections with a text key are exempt.

use tracing::trace;

use super::{Rule, RuleContext};
use crate::analysis::classifier::binds_without_explicit_type;
use crate::analysis::finding::{Finding, FindingKind};
use crate::analysis::scanner::{BindingArguments, BindingProperty};
use crate::semantic_analysis::{AttributeData, SemanticModel, TypeId, TypeKind, TypedConstant};

pub(crate) struct AotExplicitTypeRule;

impl Rule for AotExplicitTypeRule {
    fn name(&self) -> &'static str {
        "aot-explicit-type"
    }

    fn check(
        &self,
        model: &dyn SemanticModel,
        property: &BindingProperty<'_>,
        context: &RuleContext,
    ) -> Option<Finding> {
        if !context.aot_enabled {
            return None;
        }
        let declared = property.property.ty;
        if model.kind(declared) == TypeKind::Error || binds_without_explicit_type(model, declared) {
            return None;
        }

        let kind = property
            .attributes
            .iter()
            .find_map(|attribute| check_attribute(attribute, declared))?;
        trace!(property = %property.property.name, ?kind, "explicit type finding");
        Some(Finding {
            kind,
            property: property.property.name.clone(),
            declared_type: declared,
            span: property.property.span,
        })
    }
}

/// The first problem with one binding attribute's type argument.
fn check_attribute(attribute: &AttributeData, declared: TypeId) -> Option<FindingKind> {
    match BindingArguments::of(attribute) {
        BindingArguments::Positional(arguments) => {
            compare(arguments.last().unwrap_or(&TypedConstant::Unknown), declared)
        }
        BindingArguments::Named(arguments) if arguments.is_empty() => {
            Some(FindingKind::MissingExplicitType)
        }
        BindingArguments::Named(arguments) => arguments
            .into_iter()
            .find_map(|(_, value)| compare(value, declared)),
    }
}

fn compare(value: &TypedConstant, declared: TypeId) -> Option<FindingKind> {
    match value.as_type() {
        Some(found) if found == declared => None,
        Some(found) => Some(FindingKind::TypeArgumentMismatch { found }),
        None => Some(FindingKind::MissingExplicitType),
    }
}

// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Rule findings and their conversion to diagnostics.
//!
//! **DDD Context:** Analysis
//!
//! Rules return a [`Finding`]; the driver turns it into a [`Diagnostic`]
//! through the matching descriptor. Diagnostics for fixable findings carry
//! the facts the code fix needs as properties.

use ecow::EcoString;

use super::descriptors::{
    AOT_REQUIRES_MATCH_TYPES, AOT_REQUIRES_TYPE, Descriptor, INVALID_PROPERTY_TYPE,
};
use crate::diagnostics::Diagnostic;
use crate::semantic_analysis::{SemanticModel, TypeId};
use crate::source_analysis::Span;

/// Diagnostic property holding the declared type's display name.
pub const DECLARED_TYPE_PROPERTY: &str = "declared_type";

/// Diagnostic property: `"true"` if the declared type is a reference type.
pub const DECLARED_TYPE_IS_REFERENCE_PROPERTY: &str = "declared_type_is_reference";

/// Diagnostic property holding the [`InvalidTypeReason::code`].
pub const REASON_PROPERTY: &str = "reason";

/// Why a property type cannot be bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvalidTypeReason {
    DictionaryKeyNotText,
    ValueTypeArray,
    NonIntrinsic,
}

impl InvalidTypeReason {
    /// Stable machine-readable code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::DictionaryKeyNotText => "dictionary-key-not-text",
            Self::ValueTypeArray => "value-type-array",
            Self::NonIntrinsic => "non-intrinsic",
        }
    }

    /// The sentence appended to the diagnostic message.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::DictionaryKeyNotText => "Dictionary types must have a string type for their key",
            Self::ValueTypeArray => "Arrays of structs are not supported",
            Self::NonIntrinsic => "Non-intrinsic types are not supported",
        }
    }
}

/// What a rule found wrong with a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindingKind {
    /// AOT mode is on and no explicit type argument was given.
    MissingExplicitType,
    /// The explicit type argument names a different type.
    TypeArgumentMismatch { found: TypeId },
    /// The type cannot be bound at all.
    InvalidPropertyType(InvalidTypeReason),
}

/// A problem with one binding property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub kind: FindingKind,
    /// The property name.
    pub property: EcoString,
    /// The property's declared type.
    pub declared_type: TypeId,
    /// The property's name token.
    pub span: Span,
}

impl Finding {
    /// The descriptor this finding reports through.
    #[must_use]
    pub fn descriptor(&self) -> &'static Descriptor {
        match self.kind {
            FindingKind::MissingExplicitType => &AOT_REQUIRES_TYPE,
            FindingKind::TypeArgumentMismatch { .. } => &AOT_REQUIRES_MATCH_TYPES,
            FindingKind::InvalidPropertyType(_) => &INVALID_PROPERTY_TYPE,
        }
    }

    /// Renders the finding as a diagnostic at the property name.
    #[must_use]
    pub fn to_diagnostic(&self, model: &dyn SemanticModel) -> Diagnostic {
        let declared = model.display(self.declared_type);
        let descriptor = self.descriptor();
        match self.kind {
            FindingKind::MissingExplicitType => descriptor
                .diagnostic(self.span, vec![self.property.clone()])
                .with_hint(format!("pass `typeof({declared})` as the last argument"))
                .with_property(DECLARED_TYPE_PROPERTY, declared)
                .with_property(
                    DECLARED_TYPE_IS_REFERENCE_PROPERTY,
                    is_reference(model, self.declared_type),
                ),
            FindingKind::TypeArgumentMismatch { found } => descriptor
                .diagnostic(
                    self.span,
                    vec![self.property.clone(), declared.clone(), model.display(found)],
                )
                .with_hint(format!("use `typeof({declared})`"))
                .with_property(DECLARED_TYPE_PROPERTY, declared)
                .with_property(
                    DECLARED_TYPE_IS_REFERENCE_PROPERTY,
                    is_reference(model, self.declared_type),
                ),
            FindingKind::InvalidPropertyType(reason) => descriptor
                .diagnostic(
                    self.span,
                    vec![self.property.clone(), declared, reason.message().into()],
                )
                .with_hint("use a supported type or add a [TypeConverter] attribute")
                .with_property(REASON_PROPERTY, reason.code()),
        }
    }
}

fn is_reference(model: &dyn SemanticModel, ty: TypeId) -> &'static str {
    if model.is_value_type(ty) { "false" } else { "true" }
}

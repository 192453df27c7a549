// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Rule: binding properties must have a type the framework can bind.
//!
//! A property type binds when it is intrinsic, constructible from a single
//! `string`, a keyed collection with a text key, or an array whose element
//! binds. Arrays of non-intrinsic structs never bind. Properties carrying a
//! `[TypeConverter]` are skipped.
//!
//! ```text
//! // Flagged (S1052): Dictionary types must have a string type for their key
//! [CommandOption("--map")]
//! public Dictionary<int, string> Map { get; set; }
//!
//! // Flagged (S1052): Non-intrinsic types are not supported
//! [CommandOption("--stream")]
//! public Stream Input { get; set; }
//! ```

use tracing::trace;

use super::{Rule, RuleContext};
use crate::analysis::classifier::{
    ClassifiedType, classify, is_constructible_from_text, is_text, unwrap_nullable,
};
use crate::analysis::finding::{Finding, FindingKind, InvalidTypeReason};
use crate::analysis::scanner::BindingProperty;
use crate::semantic_analysis::{SemanticModel, TypeId, TypeKind};

pub(crate) struct PropertyTypeRule;

impl Rule for PropertyTypeRule {
    fn name(&self) -> &'static str {
        "property-type"
    }

    fn check(
        &self,
        model: &dyn SemanticModel,
        property: &BindingProperty<'_>,
        _context: &RuleContext,
    ) -> Option<Finding> {
        let declared = property.property.ty;
        if model.kind(declared) == TypeKind::Error || property.has_type_converter(model) {
            return None;
        }
        let reason = invalid_reason(model, declared)?;
        trace!(property = %property.property.name, reason = reason.code(), "invalid property type");
        Some(Finding {
            kind: FindingKind::InvalidPropertyType(reason),
            property: property.property.name.clone(),
            declared_type: declared,
            span: property.property.span,
        })
    }
}

/// Why `ty` cannot be bound from the command line, or `None` if it can.
///
/// Looks through `Nullable<T>`.
#[must_use]
pub fn invalid_reason(model: &dyn SemanticModel, ty: TypeId) -> Option<InvalidTypeReason> {
    let ty = unwrap_nullable(model, ty);
    match classify(model, ty) {
        ClassifiedType::Intrinsic => return None,
        _ if is_constructible_from_text(model, ty) => return None,
        ClassifiedType::KeyedCollection { key } => {
            return (!is_text(model, key)).then_some(InvalidTypeReason::DictionaryKeyNotText);
        }
        ClassifiedType::Opaque => {}
    }

    let Some(element) = model.array_element(ty) else {
        return Some(InvalidTypeReason::NonIntrinsic);
    };
    if classify(model, element) == ClassifiedType::Intrinsic {
        None
    } else if model.is_value_type(element) {
        Some(InvalidTypeReason::ValueTypeArray)
    } else if is_constructible_from_text(model, element) {
        None
    } else {
        Some(InvalidTypeReason::NonIntrinsic)
    }
}

// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Symbols exposed by the semantic model: properties, constructors and
//! applied attributes.

use ecow::EcoString;

use super::TypeId;
use crate::source_analysis::Span;

/// A property declared on a source type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertySymbol {
    /// The property name.
    pub name: EcoString,
    /// The declared type. [`TypeKind::Error`](super::TypeKind::Error) if it
    /// failed to resolve.
    pub ty: TypeId,
    /// Location of the property's name token.
    pub span: Span,
    /// Location of the whole property declaration.
    pub declaration_span: Span,
    /// Attributes applied to the property, in source order.
    pub attributes: Vec<AttributeData>,
}

/// An instance constructor signature.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Constructor {
    /// Parameters in order.
    pub parameters: Vec<ParameterSymbol>,
}

impl Constructor {
    /// Creates a constructor from its parameters.
    #[must_use]
    pub fn new(parameters: Vec<ParameterSymbol>) -> Self {
        Self { parameters }
    }
}

/// A constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSymbol {
    /// The parameter name.
    pub name: EcoString,
    /// The parameter type.
    pub ty: TypeId,
}

/// An attribute as applied to a symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeData {
    /// The attribute class, or `None` if the name did not resolve.
    pub class: Option<TypeId>,
    /// The attribute name as written.
    pub name: EcoString,
    /// Constructor arguments in parameter order.
    pub constructor_arguments: Vec<TypedConstant>,
    /// `Name = value` arguments in source order.
    pub named_arguments: Vec<(EcoString, TypedConstant)>,
    /// Location of the attribute.
    pub span: Span,
}

impl AttributeData {
    /// Returns the named argument called `name`, if present.
    #[must_use]
    pub fn named_argument(&self, name: &str) -> Option<&TypedConstant> {
        self.named_arguments
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }
}

/// The value of an attribute argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypedConstant {
    /// `typeof(T)` that resolved to a type.
    Type(TypeId),
    /// A literal, kept as written.
    Literal(EcoString),
    /// Anything that could not be evaluated to a constant, including a
    /// `typeof` whose type did not resolve.
    Unknown,
}

impl TypedConstant {
    /// The referenced type, for type constants.
    #[must_use]
    pub fn as_type(&self) -> Option<TypeId> {
        match self {
            Self::Type(ty) => Some(*ty),
            _ => None,
        }
    }
}

// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Finds the properties subject to validation.
//!
//! **DDD Context:** Analysis
//!
//! A property is validated when its class derives (directly or indirectly)
//! from the command-settings marker type and it carries a binding
//! attribute. [`scan`] yields those properties lazily in source order.

use std::collections::HashSet;

use crate::semantic_analysis::{AttributeData, PropertySymbol, SemanticModel, TypeId, TypedConstant};

/// Fully qualified name of the settings base class.
pub const COMMAND_SETTINGS: &str = "Spectre.Console.Cli.CommandSettings";

pub const COMMAND_OPTION_ATTRIBUTE: &str = "Spectre.Console.Cli.CommandOptionAttribute";

pub const COMMAND_ARGUMENT_ATTRIBUTE: &str = "Spectre.Console.Cli.CommandArgumentAttribute";

/// Attributes that bind a property to the command line.
pub const BINDING_ATTRIBUTES: [&str; 2] = [COMMAND_OPTION_ATTRIBUTE, COMMAND_ARGUMENT_ATTRIBUTE];

/// Attribute that supplies a custom converter for a property.
pub const TYPE_CONVERTER_ATTRIBUTE: &str = "System.ComponentModel.TypeConverterAttribute";

/// Named arguments that carry the explicit binding type.
pub const TYPE_ARGUMENT_NAMES: [&str; 2] = ["optionType", "argumentType"];

/// A property with at least one binding attribute, on a settings class.
#[derive(Debug, Clone)]
pub struct BindingProperty<'m> {
    /// The declaring class.
    pub class: TypeId,
    pub property: &'m PropertySymbol,
    /// The binding attributes, in source order.
    pub attributes: Vec<&'m AttributeData>,
}

impl BindingProperty<'_> {
    /// Returns true if the property carries a `[TypeConverter]`.
    #[must_use]
    pub fn has_type_converter(&self, model: &dyn SemanticModel) -> bool {
        self.property
            .attributes
            .iter()
            .any(|attribute| attribute_is(model, attribute, TYPE_CONVERTER_ATTRIBUTE))
    }
}

/// How a binding attribute supplies its arguments, resolved once per
/// attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingArguments<'a> {
    /// Constructor arguments in parameter order. Never empty.
    Positional(&'a [TypedConstant]),
    /// No constructor arguments; the named type arguments that are present.
    Named(Vec<(&'a str, &'a TypedConstant)>),
}

impl<'a> BindingArguments<'a> {
    #[must_use]
    pub fn of(attribute: &'a AttributeData) -> Self {
        if attribute.constructor_arguments.is_empty() {
            Self::Named(
                attribute
                    .named_arguments
                    .iter()
                    .filter(|(name, _)| TYPE_ARGUMENT_NAMES.contains(&name.as_str()))
                    .map(|(name, value)| (name.as_str(), value))
                    .collect(),
            )
        } else {
            Self::Positional(&attribute.constructor_arguments)
        }
    }
}

/// Returns true if `attribute` resolved to the class displayed as `name`.
#[must_use]
pub fn attribute_is(model: &dyn SemanticModel, attribute: &AttributeData, name: &str) -> bool {
    attribute
        .class
        .is_some_and(|class| model.display(class) == name)
}

/// Returns true if `attribute` is one of the [`BINDING_ATTRIBUTES`].
#[must_use]
pub fn is_binding_attribute(model: &dyn SemanticModel, attribute: &AttributeData) -> bool {
    attribute.class.is_some_and(|class| {
        let display = model.display(class);
        BINDING_ATTRIBUTES.contains(&display.as_str())
    })
}

/// Returns true if some base of `class` is [`COMMAND_SETTINGS`].
///
/// The class itself is not considered. The walk stops at the first
/// repeated type so malformed hierarchies terminate.
#[must_use]
pub fn is_command_settings(model: &dyn SemanticModel, class: TypeId) -> bool {
    let mut visited = HashSet::from([class]);
    let mut current = model.base_type(class);
    while let Some(base) = current {
        if !visited.insert(base) {
            break; // Cycle detected
        }
        if model.display(base) == COMMAND_SETTINGS {
            return true;
        }
        current = model.base_type(base);
    }
    false
}

/// Source types deriving from the settings marker, in source order.
pub fn settings_classes(model: &dyn SemanticModel) -> impl Iterator<Item = TypeId> + '_ {
    model
        .named_types()
        .iter()
        .copied()
        .filter(move |class| is_command_settings(model, *class))
}

/// Binding properties declared on `class`, in source order.
pub fn binding_properties(
    model: &dyn SemanticModel,
    class: TypeId,
) -> impl Iterator<Item = BindingProperty<'_>> + '_ {
    model.properties(class).iter().filter_map(move |property| {
        let attributes: Vec<&AttributeData> = property
            .attributes
            .iter()
            .filter(|attribute| is_binding_attribute(model, attribute))
            .collect();
        (!attributes.is_empty()).then_some(BindingProperty {
            class,
            property,
            attributes,
        })
    })
}

/// Every binding property of every settings class.
pub fn scan(model: &dyn SemanticModel) -> impl Iterator<Item = BindingProperty<'_>> + '_ {
    settings_classes(model).flat_map(move |class| binding_properties(model, class))
}

// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Type classification for command binding.
//!
//! **DDD Context:** Analysis
//!
//! Decides how the command-line framework could bind a property type:
//! directly from text ([`ClassifiedType::Intrinsic`]), as a keyed collection
//! whose key must be text, or not at all without extra metadata
//! ([`ClassifiedType::Opaque`]). Results are computed on demand and never
//! cached.

use crate::semantic_analysis::{SemanticModel, SpecialType, TypeId};

/// Generic definitions treated as keyed collections, by display name.
pub const KEYED_COLLECTION_SHAPES: [&str; 3] = [
    "System.Collections.Generic.IDictionary<TKey, TValue>",
    "System.Linq.ILookup<TKey, TElement>",
    "System.Collections.Generic.IReadOnlyDictionary<TKey, TValue>",
];

/// How a property type binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifiedType {
    /// A special type: numerics, `bool`, `char`, `string`, `object`,
    /// `decimal`, `DateTime`.
    Intrinsic,
    /// A map or lookup; `key` is its first type argument.
    KeyedCollection { key: TypeId },
    /// Anything else.
    Opaque,
}

/// Classifies `ty`, looking through `Nullable<T>`.
///
/// A keyed collection matches on its own generic definition first, then on
/// each of its interfaces nearest first; the first match supplies the key.
#[must_use]
pub fn classify(model: &dyn SemanticModel, ty: TypeId) -> ClassifiedType {
    let ty = unwrap_nullable(model, ty);
    if model.special_type(ty).is_some() {
        return ClassifiedType::Intrinsic;
    }
    match keyed_collection_key(model, ty) {
        Some(key) => ClassifiedType::KeyedCollection { key },
        None => ClassifiedType::Opaque,
    }
}

/// `T` for `Nullable<T>`, otherwise `ty`.
#[must_use]
pub fn unwrap_nullable(model: &dyn SemanticModel, ty: TypeId) -> TypeId {
    model.nullable_underlying(ty).unwrap_or(ty)
}

/// Returns true for `string`.
#[must_use]
pub fn is_text(model: &dyn SemanticModel, ty: TypeId) -> bool {
    model.special_type(ty) == Some(SpecialType::String)
}

/// Returns true if `ty` has an instance constructor taking exactly one
/// `string`.
#[must_use]
pub fn is_constructible_from_text(model: &dyn SemanticModel, ty: TypeId) -> bool {
    model
        .constructors(ty)
        .iter()
        .any(|ctor| matches!(ctor.parameters.as_slice(), [only] if is_text(model, only.ty)))
}

/// Types the explicit-type rule leaves alone: intrinsic types and keyed
/// collections with a text key.
#[must_use]
pub fn binds_without_explicit_type(model: &dyn SemanticModel, ty: TypeId) -> bool {
    match classify(model, ty) {
        ClassifiedType::Intrinsic => true,
        ClassifiedType::KeyedCollection { key } => is_text(model, key),
        ClassifiedType::Opaque => false,
    }
}

fn keyed_collection_key(model: &dyn SemanticModel, ty: TypeId) -> Option<TypeId> {
    std::iter::once(ty)
        .chain(model.all_interfaces(ty).iter().copied())
        .find(|candidate| is_keyed_shape(model, *candidate))
        .and_then(|shape| model.type_arguments(shape).first().copied())
}

fn is_keyed_shape(model: &dyn SemanticModel, ty: TypeId) -> bool {
    let definition = model.display(model.constructed_from(ty));
    KEYED_COLLECTION_SHAPES.contains(&definition.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::SyntaxTree;
    use crate::semantic_analysis::Compilation;

    /// Binds a class `S` with one property per `(name, type)` and returns
    /// the compilation and the property types in order.
    fn property_types(usings: &str, properties: &[&str]) -> (Compilation, Vec<TypeId>) {
        let body: String = properties
            .iter()
            .enumerate()
            .map(|(i, ty)| format!("public {ty} P{i} {{ get; set; }}\n"))
            .collect();
        let source = format!("{usings}\nclass S {{\n{body}}}");
        let compilation = Compilation::bind(&SyntaxTree::parse(source));
        assert!(
            compilation.diagnostics().is_empty(),
            "{:?}",
            compilation.diagnostics()
        );
        let s = compilation.source_type("S").unwrap();
        let types = compilation.properties(s).iter().map(|p| p.ty).collect();
        (compilation, types)
    }

    #[test]
    fn special_types_are_intrinsic() {
        let (model, types) = property_types(
            "using System;",
            &["int", "string", "bool", "decimal", "DateTime", "object", "char", "double"],
        );
        for ty in types {
            assert_eq!(classify(&model, ty), ClassifiedType::Intrinsic, "{}", model.display(ty));
        }
    }

    #[test]
    fn nullable_value_types_unwrap() {
        let (model, types) = property_types("", &["int?", "long?"]);
        for ty in types {
            assert_eq!(classify(&model, ty), ClassifiedType::Intrinsic);
        }
    }

    #[test]
    fn keyed_collections_report_their_key() {
        let (model, types) = property_types(
            "using System.Collections.Generic;\nusing System.Linq;",
            &[
                "Dictionary<string, int>",
                "IDictionary<int, string>",
                "IReadOnlyDictionary<string, bool>",
                "ILookup<long, string>",
                "Lookup<string, string>",
                "SortedDictionary<int, int>",
            ],
        );
        let keys: Vec<_> = types
            .iter()
            .map(|ty| match classify(&model, *ty) {
                ClassifiedType::KeyedCollection { key } => model.display(key),
                other => panic!("{} classified as {other:?}", model.display(*ty)),
            })
            .collect();
        assert_eq!(keys, vec!["string", "int", "string", "long", "string", "int"]);
    }

    #[test]
    fn other_types_are_opaque() {
        let (model, types) = property_types(
            "using System.IO;\nusing System.Collections.Generic;",
            &["FileInfo", "List<string>", "int[]", "KeyValuePair<string, int>"],
        );
        for ty in types {
            assert_eq!(classify(&model, ty), ClassifiedType::Opaque, "{}", model.display(ty));
        }
    }

    #[test]
    fn custom_type_implementing_dictionary_is_keyed() {
        let (model, types) = property_types(
            "using System.Collections.Generic;\nclass Bag : Dictionary<int, string> {}\nclass Store<T> : IReadOnlyDictionary<T, int> {}",
            &["Bag", "Store<string>"],
        );
        let int = model.table().special(SpecialType::Int32).unwrap();
        let string = model.table().special(SpecialType::String).unwrap();
        assert_eq!(classify(&model, types[0]), ClassifiedType::KeyedCollection { key: int });
        assert_eq!(classify(&model, types[1]), ClassifiedType::KeyedCollection { key: string });
    }

    #[test]
    fn constructible_from_text() {
        let (model, types) = property_types(
            "using System;\nusing System.IO;\nclass Wrapper { public Wrapper(string value) {} }\nclass TwoArgs { public TwoArgs(string a, string b) {} }",
            &["FileInfo", "DirectoryInfo", "Uri", "Wrapper", "TwoArgs", "MemoryStream"],
        );
        let constructible: Vec<_> = types
            .iter()
            .map(|ty| is_constructible_from_text(&model, *ty))
            .collect();
        assert_eq!(constructible, vec![true, true, true, true, false, false]);
    }

    #[test]
    fn explicit_type_exemptions() {
        let (model, types) = property_types(
            "using System.IO;\nusing System.Collections.Generic;",
            &["int", "Dictionary<string, int>", "Dictionary<int, int>", "DirectoryInfo"],
        );
        let exempt: Vec<_> = types
            .iter()
            .map(|ty| binds_without_explicit_type(&model, *ty))
            .collect();
        assert_eq!(exempt, vec![true, true, false, false]);
    }
}

// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Semantic model over a parsed source file.
//!
//! **DDD Context:** Semantic Analysis
//!
//! The analysis engine never looks at syntax directly. It reads types,
//! properties and attributes through the [`SemanticModel`] trait, which is
//! object-safe so rules can be driven by the real [`Compilation`] or by a
//! hand-built model in tests.
//!
//! [`Compilation::bind`] produces a model from a [`SyntaxTree`]: it declares
//! every source type into a [`TypeTable`] preloaded with the built-in host
//! library, resolves base lists, constructors, property types and
//! attributes, then completes the table so it can be shared across threads.
//!
//! [`SyntaxTree`]: crate::ast::SyntaxTree

mod binder;
mod builtins;
mod symbols;
mod types;

pub use binder::Compilation;
pub use symbols::{AttributeData, Constructor, ParameterSymbol, PropertySymbol, TypedConstant};
pub use types::{SpecialType, TypeId, TypeKind, TypeTable};

use ecow::EcoString;

/// Read-only view of the types in a compilation.
///
/// All methods take a [`TypeId`] obtained from the same model. Walks over
/// `base_type` must be bounded by the caller; hosts may hand out cyclic
/// chains for malformed input.
pub trait SemanticModel: Sync {
    /// Source-declared named types, in source order, nested types after
    /// their container.
    fn named_types(&self) -> &[TypeId];

    fn kind(&self, ty: TypeId) -> TypeKind;

    /// Fully qualified display form, e.g. `System.Collections.Generic.IDictionary<TKey, TValue>`
    /// for a definition or `int?` for a nullable value type.
    fn display(&self, ty: TypeId) -> EcoString;

    fn special_type(&self, ty: TypeId) -> Option<SpecialType>;

    fn base_type(&self, ty: TypeId) -> Option<TypeId>;

    /// Every interface implemented by the type or its bases, nearest first.
    fn all_interfaces(&self, ty: TypeId) -> &[TypeId];

    /// The generic definition behind a constructed type, or the type itself.
    fn constructed_from(&self, ty: TypeId) -> TypeId;

    fn type_arguments(&self, ty: TypeId) -> &[TypeId];

    fn constructors(&self, ty: TypeId) -> &[Constructor];

    fn properties(&self, ty: TypeId) -> &[PropertySymbol];

    fn array_element(&self, ty: TypeId) -> Option<TypeId>;

    fn is_value_type(&self, ty: TypeId) -> bool;

    /// `T` when `ty` is `System.Nullable<T>`.
    fn nullable_underlying(&self, ty: TypeId) -> Option<TypeId>;
}

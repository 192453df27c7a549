// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Interned type table.
//!
//! **DDD Context:** Semantic Analysis
//!
//! Every type the binder sees gets a [`TypeId`]. Definitions are declared
//! once by metadata name; constructed generics and arrays are interned by
//! structure, so two mentions of `Dictionary<string, int>` share an id and
//! identity comparison is `==` on ids.
//!
//! Members of constructed types are produced by substituting the
//! definition's type parameters. [`TypeTable::complete`] does this eagerly
//! with a depth bound, after which the table is read-only and can be shared
//! across threads.

use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;

use ecow::EcoString;

use super::symbols::{Constructor, ParameterSymbol, PropertySymbol};

/// Instantiations nested deeper than this get no members.
const MAX_INSTANTIATION_DEPTH: u8 = 8;

const NULLABLE_METADATA_NAME: &str = "System.Nullable`1";
const ARRAY_METADATA_NAME: &str = "System.Array";

/// Opaque handle to a type in a [`TypeTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// The broad category of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
    Enum,
    Array,
    TypeParameter,
    /// A type that failed to resolve.
    Error,
}

/// Types the runtime treats as built in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialType {
    Object,
    Boolean,
    Char,
    SByte,
    Byte,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Decimal,
    Single,
    Double,
    String,
    IntPtr,
    UIntPtr,
    DateTime,
}

impl SpecialType {
    /// Every special type, for keyword lookup.
    pub const ALL: [Self; 18] = [
        Self::Object,
        Self::Boolean,
        Self::Char,
        Self::SByte,
        Self::Byte,
        Self::Int16,
        Self::UInt16,
        Self::Int32,
        Self::UInt32,
        Self::Int64,
        Self::UInt64,
        Self::Decimal,
        Self::Single,
        Self::Double,
        Self::String,
        Self::IntPtr,
        Self::UIntPtr,
        Self::DateTime,
    ];

    /// The language keyword that names this type, if it has one.
    #[must_use]
    pub fn keyword(self) -> Option<&'static str> {
        Some(match self {
            Self::Object => "object",
            Self::Boolean => "bool",
            Self::Char => "char",
            Self::SByte => "sbyte",
            Self::Byte => "byte",
            Self::Int16 => "short",
            Self::UInt16 => "ushort",
            Self::Int32 => "int",
            Self::UInt32 => "uint",
            Self::Int64 => "long",
            Self::UInt64 => "ulong",
            Self::Decimal => "decimal",
            Self::Single => "float",
            Self::Double => "double",
            Self::String => "string",
            Self::IntPtr => "nint",
            Self::UIntPtr => "nuint",
            Self::DateTime => return None,
        })
    }

    /// Looks up a special type by keyword.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|special| special.keyword() == Some(keyword))
    }
}

#[derive(Debug, Clone)]
struct Definition {
    name: EcoString,
    namespace: EcoString,
    metadata_name: EcoString,
    containing: Option<TypeId>,
    kind: TypeKind,
    type_parameters: Vec<TypeId>,
    special: Option<SpecialType>,
    properties: Vec<PropertySymbol>,
}

#[derive(Debug, Clone)]
enum Shape {
    Definition(Box<Definition>),
    Constructed {
        definition: TypeId,
        arguments: Vec<TypeId>,
    },
    Array {
        element: TypeId,
        rank: u8,
    },
    TypeParameter {
        name: EcoString,
    },
    Error {
        name: EcoString,
    },
}

#[derive(Debug, Clone, Default)]
struct Members {
    base: Option<TypeId>,
    interfaces: Vec<TypeId>,
    all_interfaces: Vec<TypeId>,
    constructors: Vec<Constructor>,
}

#[derive(Debug, Clone)]
struct Entry {
    shape: Shape,
    depth: u8,
    instantiated: bool,
    members: Members,
}

/// All types known to a compilation.
#[derive(Debug, Clone, Default)]
pub struct TypeTable {
    entries: Vec<Entry>,
    by_metadata_name: HashMap<EcoString, TypeId>,
    constructed: HashMap<(TypeId, Vec<TypeId>), TypeId>,
    arrays: HashMap<(TypeId, u8), TypeId>,
    errors: HashMap<EcoString, TypeId>,
    specials: HashMap<SpecialType, TypeId>,
    namespaces: HashSet<EcoString>,
}

impl TypeTable {
    /// Creates an empty table. See [`TypeTable::with_builtins`] for one
    /// preloaded with the host library.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Building
    // ========================================================================

    /// Declares a named type and its type parameters.
    ///
    /// `containing` makes this a nested type; its namespace is then ignored
    /// for naming. A later declaration with the same metadata name replaces
    /// the earlier one for lookups.
    pub fn declare(
        &mut self,
        namespace: &str,
        name: &str,
        kind: TypeKind,
        type_parameters: &[&str],
        containing: Option<TypeId>,
    ) -> TypeId {
        let metadata_name = match containing {
            Some(outer) => nested_metadata_name(
                self.metadata_name(outer).unwrap_or_default(),
                name,
                type_parameters.len(),
            ),
            None => metadata_name(namespace, name, type_parameters.len()),
        };
        let namespace: EcoString = match containing {
            Some(outer) => self.namespace_of(outer),
            None => namespace.into(),
        };
        self.register_namespace(&namespace);

        let parameters = type_parameters
            .iter()
            .map(|param| {
                self.push(
                    Shape::TypeParameter {
                        name: (*param).into(),
                    },
                    0,
                )
            })
            .collect();

        let id = self.push(
            Shape::Definition(Box::new(Definition {
                name: name.into(),
                namespace,
                metadata_name: metadata_name.clone(),
                containing,
                kind,
                type_parameters: parameters,
                special: None,
                properties: Vec::new(),
            })),
            0,
        );
        self.by_metadata_name.insert(metadata_name, id);
        id
    }

    /// Marks `id` as a special type.
    pub fn set_special(&mut self, id: TypeId, special: SpecialType) {
        if let Some(definition) = self.definition_mut(id) {
            definition.special = Some(special);
            self.specials.insert(special, id);
        }
    }

    /// Sets the direct base class.
    pub fn set_base(&mut self, id: TypeId, base: TypeId) {
        self.entries[id.index()].members.base = Some(base);
    }

    /// Adds a directly implemented interface.
    pub fn add_interface(&mut self, id: TypeId, interface: TypeId) {
        let interfaces = &mut self.entries[id.index()].members.interfaces;
        if !interfaces.contains(&interface) {
            interfaces.push(interface);
        }
    }

    /// Adds an instance constructor.
    pub fn add_constructor(&mut self, id: TypeId, parameters: Vec<ParameterSymbol>) {
        self.entries[id.index()]
            .members
            .constructors
            .push(Constructor::new(parameters));
    }

    /// Adds a property to a definition.
    pub fn add_property(&mut self, id: TypeId, property: PropertySymbol) {
        if let Some(definition) = self.definition_mut(id) {
            definition.properties.push(property);
        }
    }

    /// Interns `definition<arguments>`. Returns `definition` itself when
    /// `arguments` is empty.
    pub fn construct(&mut self, definition: TypeId, arguments: Vec<TypeId>) -> TypeId {
        self.construct_at(definition, arguments, 0)
    }

    /// Interns an array of `element` with the given rank.
    pub fn array(&mut self, element: TypeId, rank: u8) -> TypeId {
        self.array_at(element, rank.max(1), 0)
    }

    /// Interns `System.Nullable<underlying>`, or returns `underlying` if the
    /// nullable definition is not in the table.
    pub fn nullable(&mut self, underlying: TypeId) -> TypeId {
        match self.by_metadata_name.get(NULLABLE_METADATA_NAME).copied() {
            Some(definition) => self.construct(definition, vec![underlying]),
            None => underlying,
        }
    }

    /// An error type carrying the name that failed to resolve.
    pub fn error(&mut self, name: &str) -> TypeId {
        if let Some(id) = self.errors.get(name) {
            return *id;
        }
        let id = self.push(Shape::Error { name: name.into() }, 0);
        self.errors.insert(name.into(), id);
        id
    }

    /// Instantiates members of constructed types and computes interface
    /// closures. Safe to call more than once.
    pub fn complete(&mut self) {
        let mut index = 0;
        while index < self.entries.len() {
            if !self.entries[index].instantiated {
                self.instantiate_members(index);
            }
            index += 1;
        }
        for index in 0..self.entries.len() {
            let all = self.collect_all_interfaces(index);
            self.entries[index].members.all_interfaces = all;
        }
    }

    fn push(&mut self, shape: Shape, depth: u8) -> TypeId {
        let id = TypeId(u32::try_from(self.entries.len()).unwrap_or(u32::MAX));
        self.entries.push(Entry {
            shape,
            depth,
            instantiated: false,
            members: Members::default(),
        });
        id
    }

    fn register_namespace(&mut self, namespace: &str) {
        let mut prefix = String::new();
        for part in namespace.split('.').filter(|part| !part.is_empty()) {
            if !prefix.is_empty() {
                prefix.push('.');
            }
            prefix.push_str(part);
            self.namespaces.insert(prefix.as_str().into());
        }
    }

    fn definition_mut(&mut self, id: TypeId) -> Option<&mut Definition> {
        match &mut self.entries[id.index()].shape {
            Shape::Definition(definition) => Some(definition),
            _ => None,
        }
    }

    fn construct_at(&mut self, definition: TypeId, arguments: Vec<TypeId>, depth: u8) -> TypeId {
        if arguments.is_empty() {
            return definition;
        }
        let key = (definition, arguments);
        if let Some(id) = self.constructed.get(&key) {
            return *id;
        }
        let id = self.push(
            Shape::Constructed {
                definition,
                arguments: key.1.clone(),
            },
            depth,
        );
        self.constructed.insert(key, id);
        id
    }

    fn array_at(&mut self, element: TypeId, rank: u8, depth: u8) -> TypeId {
        if let Some(id) = self.arrays.get(&(element, rank)) {
            return *id;
        }
        let id = self.push(Shape::Array { element, rank }, depth);
        self.arrays.insert((element, rank), id);
        id
    }

    fn instantiate_members(&mut self, index: usize) {
        self.entries[index].instantiated = true;
        let depth = self.entries[index].depth;
        match self.entries[index].shape.clone() {
            Shape::Constructed {
                definition,
                arguments,
            } => {
                if depth >= MAX_INSTANTIATION_DEPTH {
                    return;
                }
                let parameters = self.type_parameters(definition).to_vec();
                let declared = self.entries[definition.index()].members.clone();
                let next = depth + 1;
                let substitution = Substitution {
                    parameters: &parameters,
                    arguments: &arguments,
                };

                let base = declared
                    .base
                    .map(|base| self.substitute(base, &substitution, next));
                let interfaces = declared
                    .interfaces
                    .iter()
                    .map(|interface| self.substitute(*interface, &substitution, next))
                    .collect();
                let constructors = declared
                    .constructors
                    .iter()
                    .map(|constructor| {
                        Constructor::new(
                            constructor
                                .parameters
                                .iter()
                                .map(|parameter| ParameterSymbol {
                                    name: parameter.name.clone(),
                                    ty: self.substitute(parameter.ty, &substitution, next),
                                })
                                .collect(),
                        )
                    })
                    .collect();

                let members = &mut self.entries[index].members;
                members.base = base;
                members.interfaces = interfaces;
                members.constructors = constructors;
            }
            Shape::Array { .. } => {
                let base = self.by_metadata_name.get(ARRAY_METADATA_NAME).copied();
                self.entries[index].members.base = base;
            }
            Shape::Definition(_) | Shape::TypeParameter { .. } | Shape::Error { .. } => {}
        }
    }

    fn substitute(&mut self, ty: TypeId, substitution: &Substitution<'_>, depth: u8) -> TypeId {
        if let Some(position) = substitution.parameters.iter().position(|p| *p == ty) {
            return substitution.arguments.get(position).copied().unwrap_or(ty);
        }
        match self.entries[ty.index()].shape.clone() {
            Shape::Constructed {
                definition,
                arguments,
            } => {
                let arguments = arguments
                    .into_iter()
                    .map(|argument| self.substitute(argument, substitution, depth))
                    .collect();
                self.construct_at(definition, arguments, depth)
            }
            Shape::Array { element, rank } => {
                let element = self.substitute(element, substitution, depth);
                self.array_at(element, rank, depth)
            }
            Shape::Definition(_) | Shape::TypeParameter { .. } | Shape::Error { .. } => ty,
        }
    }

    /// Interfaces from the whole base chain, each followed by the interfaces
    /// it extends, nearest first, without duplicates.
    fn collect_all_interfaces(&self, index: usize) -> Vec<TypeId> {
        let mut result = Vec::new();
        let mut seen = HashSet::new();
        let mut chain = HashSet::new();
        let mut current = Some(index);

        while let Some(at) = current {
            if !chain.insert(at) {
                break; // Cycle in the base chain
            }
            let members = &self.entries[at].members;
            for interface in &members.interfaces {
                let mut stack = vec![*interface];
                while let Some(next) = stack.pop() {
                    if !seen.insert(next) {
                        continue;
                    }
                    result.push(next);
                    stack.extend(self.entries[next.index()].members.interfaces.iter().rev());
                }
            }
            current = members.base.map(TypeId::index);
        }

        result
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Number of types in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table holds no types.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finds a definition by metadata name, e.g. ``System.Nullable`1`` or
    /// `App.Outer+Inner`.
    #[must_use]
    pub fn lookup(&self, metadata_name: &str) -> Option<TypeId> {
        self.by_metadata_name.get(metadata_name).copied()
    }

    /// Finds a type by name and arity in a namespace.
    #[must_use]
    pub fn lookup_in_namespace(&self, namespace: &str, name: &str, arity: usize) -> Option<TypeId> {
        self.lookup(&metadata_name(namespace, name, arity))
    }

    /// Finds a type nested directly in `containing`.
    #[must_use]
    pub fn lookup_nested(&self, containing: TypeId, name: &str, arity: usize) -> Option<TypeId> {
        let outer = self.metadata_name(containing)?;
        self.lookup(&nested_metadata_name(outer, name, arity))
    }

    /// Returns true if some declared type lives in `namespace` or below it.
    #[must_use]
    pub fn is_namespace(&self, namespace: &str) -> bool {
        self.namespaces.contains(namespace)
    }

    /// The type registered for a special type.
    #[must_use]
    pub fn special(&self, special: SpecialType) -> Option<TypeId> {
        self.specials.get(&special).copied()
    }

    /// All ids, in creation order.
    pub fn ids(&self) -> impl Iterator<Item = TypeId> + '_ {
        (0..self.entries.len()).map(|index| TypeId(u32::try_from(index).unwrap_or(u32::MAX)))
    }

    #[must_use]
    pub fn kind(&self, ty: TypeId) -> TypeKind {
        match &self.entries[ty.index()].shape {
            Shape::Definition(definition) => definition.kind,
            Shape::Constructed { definition, .. } => self.kind(*definition),
            Shape::Array { .. } => TypeKind::Array,
            Shape::TypeParameter { .. } => TypeKind::TypeParameter,
            Shape::Error { .. } => TypeKind::Error,
        }
    }

    /// The simple name, without namespace or type arguments.
    #[must_use]
    pub fn name(&self, ty: TypeId) -> EcoString {
        match &self.entries[ty.index()].shape {
            Shape::Definition(definition) => definition.name.clone(),
            Shape::Constructed { definition, .. } => self.name(*definition),
            Shape::Array { element, .. } => self.name(*element),
            Shape::TypeParameter { name } | Shape::Error { name } => name.clone(),
        }
    }

    #[must_use]
    pub fn special_type(&self, ty: TypeId) -> Option<SpecialType> {
        match &self.entries[ty.index()].shape {
            Shape::Definition(definition) => definition.special,
            _ => None,
        }
    }

    #[must_use]
    pub fn base_type(&self, ty: TypeId) -> Option<TypeId> {
        self.entries[ty.index()].members.base
    }

    #[must_use]
    pub fn interfaces(&self, ty: TypeId) -> &[TypeId] {
        &self.entries[ty.index()].members.interfaces
    }

    /// Requires [`TypeTable::complete`] to have run.
    #[must_use]
    pub fn all_interfaces(&self, ty: TypeId) -> &[TypeId] {
        &self.entries[ty.index()].members.all_interfaces
    }

    /// The generic definition a constructed type came from, or `ty` itself.
    #[must_use]
    pub fn constructed_from(&self, ty: TypeId) -> TypeId {
        match &self.entries[ty.index()].shape {
            Shape::Constructed { definition, .. } => *definition,
            _ => ty,
        }
    }

    #[must_use]
    pub fn type_arguments(&self, ty: TypeId) -> &[TypeId] {
        match &self.entries[ty.index()].shape {
            Shape::Constructed { arguments, .. } => arguments,
            _ => &[],
        }
    }

    #[must_use]
    pub fn type_parameters(&self, ty: TypeId) -> &[TypeId] {
        match &self.entries[ty.index()].shape {
            Shape::Definition(definition) => &definition.type_parameters,
            _ => &[],
        }
    }

    #[must_use]
    pub fn constructors(&self, ty: TypeId) -> &[Constructor] {
        &self.entries[ty.index()].members.constructors
    }

    /// Properties declared on the definition behind `ty`.
    #[must_use]
    pub fn properties(&self, ty: TypeId) -> &[PropertySymbol] {
        match &self.entries[self.constructed_from(ty).index()].shape {
            Shape::Definition(definition) => &definition.properties,
            _ => &[],
        }
    }

    #[must_use]
    pub fn array_element(&self, ty: TypeId) -> Option<TypeId> {
        match &self.entries[ty.index()].shape {
            Shape::Array { element, .. } => Some(*element),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_value_type(&self, ty: TypeId) -> bool {
        matches!(self.kind(ty), TypeKind::Struct | TypeKind::Enum)
    }

    /// `T` for `System.Nullable<T>`.
    #[must_use]
    pub fn nullable_underlying(&self, ty: TypeId) -> Option<TypeId> {
        match &self.entries[ty.index()].shape {
            Shape::Constructed {
                definition,
                arguments,
            } if self.metadata_name(*definition) == Some(NULLABLE_METADATA_NAME) => {
                arguments.first().copied()
            }
            _ => None,
        }
    }

    /// The type a nested type is declared in.
    #[must_use]
    pub fn containing_type(&self, ty: TypeId) -> Option<TypeId> {
        match &self.entries[ty.index()].shape {
            Shape::Definition(definition) => definition.containing,
            _ => None,
        }
    }

    fn metadata_name(&self, ty: TypeId) -> Option<&str> {
        match &self.entries[ty.index()].shape {
            Shape::Definition(definition) => Some(&definition.metadata_name),
            _ => None,
        }
    }

    fn namespace_of(&self, ty: TypeId) -> EcoString {
        match &self.entries[ty.index()].shape {
            Shape::Definition(definition) => definition.namespace.clone(),
            _ => EcoString::new(),
        }
    }

    /// Fully qualified display form: keyword aliases for special types,
    /// `T?` for nullable value types, `<A, B>` for type arguments.
    #[must_use]
    pub fn display(&self, ty: TypeId) -> EcoString {
        let mut out = String::new();
        self.write_display(ty, &mut out);
        out.into()
    }

    fn write_display(&self, ty: TypeId, out: &mut String) {
        match &self.entries[ty.index()].shape {
            Shape::Definition(definition) => {
                if let Some(keyword) = definition.special.and_then(SpecialType::keyword) {
                    out.push_str(keyword);
                    return;
                }
                self.write_qualified_name(definition, out);
                if !definition.type_parameters.is_empty() {
                    self.write_arguments(&definition.type_parameters, out);
                }
            }
            Shape::Constructed {
                definition,
                arguments,
            } => {
                if let Some(underlying) = self.nullable_underlying(ty) {
                    self.write_display(underlying, out);
                    out.push('?');
                    return;
                }
                if let Shape::Definition(definition) = &self.entries[definition.index()].shape {
                    self.write_qualified_name(definition, out);
                }
                self.write_arguments(arguments, out);
            }
            Shape::Array { element, rank } => {
                self.write_display(*element, out);
                out.push('[');
                for _ in 1..*rank {
                    out.push(',');
                }
                out.push(']');
            }
            Shape::TypeParameter { name } | Shape::Error { name } => out.push_str(name),
        }
    }

    fn write_qualified_name(&self, definition: &Definition, out: &mut String) {
        match definition.containing {
            Some(outer) => {
                self.write_display(outer, out);
                out.push('.');
            }
            None if !definition.namespace.is_empty() => {
                let _ = write!(out, "{}.", definition.namespace);
            }
            None => {}
        }
        out.push_str(&definition.name);
    }

    fn write_arguments(&self, arguments: &[TypeId], out: &mut String) {
        out.push('<');
        for (i, argument) in arguments.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.write_display(*argument, out);
        }
        out.push('>');
    }
}

struct Substitution<'a> {
    parameters: &'a [TypeId],
    arguments: &'a [TypeId],
}

fn metadata_name(namespace: &str, name: &str, arity: usize) -> EcoString {
    let mut out = String::new();
    if !namespace.is_empty() {
        out.push_str(namespace);
        out.push('.');
    }
    out.push_str(name);
    if arity > 0 {
        let _ = write!(out, "`{arity}");
    }
    out.into()
}

fn nested_metadata_name(outer: &str, name: &str, arity: usize) -> EcoString {
    let mut out = format!("{outer}+{name}");
    if arity > 0 {
        let _ = write!(out, "`{arity}");
    }
    out.into()
}

// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Built-in type definitions.
//!
//! **DDD Context:** Semantic Analysis
//!
//! The host library subset that source files can reference without
//! declaring: the special types, common `System` value types, the generic
//! collections, `System.ComponentModel` attributes and the command-line
//! framework's settings base and binding attributes. These are registered
//! before any source types.
//!
//! Signatures are written in source syntax (`IDictionary<TKey, TValue>`,
//! `byte[]`) and resolved against simple names of the other built-ins, so
//! simple names must be unique within this table.

use std::collections::HashMap;

use ecow::EcoString;

use super::symbols::ParameterSymbol;
use super::types::{SpecialType, TypeId, TypeKind, TypeTable};

#[derive(Debug, Clone, Copy)]
struct BuiltinType {
    namespace: &'static str,
    name: &'static str,
    kind: TypeKind,
    type_parameters: &'static [&'static str],
    special: Option<SpecialType>,
    base: Option<&'static str>,
    interfaces: &'static [&'static str],
    constructors: &'static [&'static [(&'static str, &'static str)]],
}

const fn class(namespace: &'static str, name: &'static str) -> BuiltinType {
    BuiltinType {
        namespace,
        name,
        kind: TypeKind::Class,
        type_parameters: &[],
        special: None,
        base: Some("Object"),
        interfaces: &[],
        constructors: &[&[]],
    }
}

const fn structure(namespace: &'static str, name: &'static str) -> BuiltinType {
    BuiltinType {
        kind: TypeKind::Struct,
        base: Some("ValueType"),
        ..class(namespace, name)
    }
}

const fn interface(namespace: &'static str, name: &'static str) -> BuiltinType {
    BuiltinType {
        kind: TypeKind::Interface,
        base: None,
        constructors: &[],
        ..class(namespace, name)
    }
}

const fn special(name: &'static str, special: SpecialType) -> BuiltinType {
    BuiltinType {
        special: Some(special),
        ..structure("System", name)
    }
}

impl BuiltinType {
    const fn generic(self, type_parameters: &'static [&'static str]) -> Self {
        Self {
            type_parameters,
            ..self
        }
    }

    const fn base(self, base: &'static str) -> Self {
        Self {
            base: Some(base),
            ..self
        }
    }

    const fn implements(self, interfaces: &'static [&'static str]) -> Self {
        Self { interfaces, ..self }
    }

    const fn constructors(self, constructors: &'static [&'static [(&'static str, &'static str)]]) -> Self {
        Self {
            constructors,
            ..self
        }
    }
}

const SYSTEM: &str = "System";
const IO: &str = "System.IO";
const COLLECTIONS: &str = "System.Collections";
const GENERIC: &str = "System.Collections.Generic";
const LINQ: &str = "System.Linq";
const COMPONENT_MODEL: &str = "System.ComponentModel";
const CLI: &str = "Spectre.Console.Cli";

const BUILTINS: &[BuiltinType] = &[
    // System
    BuiltinType {
        special: Some(SpecialType::Object),
        base: None,
        ..class(SYSTEM, "Object")
    },
    class(SYSTEM, "ValueType").constructors(&[]),
    class(SYSTEM, "Enum").base("ValueType").constructors(&[]),
    class(SYSTEM, "Array")
        .implements(&["IList", "ICollection", "IEnumerable"])
        .constructors(&[]),
    class(SYSTEM, "Attribute").constructors(&[]),
    class(SYSTEM, "Type").constructors(&[]),
    structure(SYSTEM, "Void").constructors(&[]),
    interface(SYSTEM, "IComparable"),
    interface(SYSTEM, "IEquatable").generic(&["T"]),
    interface(SYSTEM, "IFormattable"),
    BuiltinType {
        special: Some(SpecialType::String),
        ..class(SYSTEM, "String")
            .implements(&["IEnumerable<char>", "IComparable", "IEquatable<string>"])
            .constructors(&[&[("value", "char[]")]])
    },
    special("Boolean", SpecialType::Boolean).implements(&["IComparable", "IEquatable<bool>"]),
    special("Char", SpecialType::Char).implements(&["IComparable", "IEquatable<char>"]),
    special("SByte", SpecialType::SByte).implements(&["IComparable", "IFormattable"]),
    special("Byte", SpecialType::Byte).implements(&["IComparable", "IFormattable"]),
    special("Int16", SpecialType::Int16).implements(&["IComparable", "IFormattable"]),
    special("UInt16", SpecialType::UInt16).implements(&["IComparable", "IFormattable"]),
    special("Int32", SpecialType::Int32)
        .implements(&["IComparable", "IFormattable", "IEquatable<int>"]),
    special("UInt32", SpecialType::UInt32).implements(&["IComparable", "IFormattable"]),
    special("Int64", SpecialType::Int64).implements(&["IComparable", "IFormattable"]),
    special("UInt64", SpecialType::UInt64).implements(&["IComparable", "IFormattable"]),
    special("Single", SpecialType::Single).implements(&["IComparable", "IFormattable"]),
    special("Double", SpecialType::Double).implements(&["IComparable", "IFormattable"]),
    special("Decimal", SpecialType::Decimal)
        .implements(&["IComparable", "IFormattable"])
        .constructors(&[&[], &[("value", "int")], &[("value", "double")]]),
    special("IntPtr", SpecialType::IntPtr),
    special("UIntPtr", SpecialType::UIntPtr),
    special("DateTime", SpecialType::DateTime)
        .implements(&["IComparable", "IFormattable"])
        .constructors(&[&[], &[("ticks", "long")]]),
    structure(SYSTEM, "DateTimeOffset").constructors(&[&[], &[("dateTime", "DateTime")]]),
    structure(SYSTEM, "TimeSpan").constructors(&[&[], &[("ticks", "long")]]),
    structure(SYSTEM, "Guid").constructors(&[&[], &[("g", "string")], &[("b", "byte[]")]]),
    structure(SYSTEM, "Nullable")
        .generic(&["T"])
        .constructors(&[&[], &[("value", "T")]]),
    class(SYSTEM, "Uri").constructors(&[&[("uriString", "string")]]),
    class(SYSTEM, "Version").constructors(&[&[], &[("version", "string")]]),
    // System.IO
    class(IO, "FileSystemInfo").constructors(&[]),
    class(IO, "FileInfo")
        .base("FileSystemInfo")
        .constructors(&[&[("fileName", "string")]]),
    class(IO, "DirectoryInfo")
        .base("FileSystemInfo")
        .constructors(&[&[("path", "string")]]),
    class(IO, "Stream").constructors(&[]),
    class(IO, "MemoryStream").base("Stream").constructors(&[
        &[],
        &[("capacity", "int")],
        &[("buffer", "byte[]")],
    ]),
    // System.Collections
    interface(COLLECTIONS, "IEnumerable"),
    interface(COLLECTIONS, "ICollection").implements(&["IEnumerable"]),
    interface(COLLECTIONS, "IList").implements(&["ICollection"]),
    interface(COLLECTIONS, "IDictionary").implements(&["ICollection"]),
    // System.Collections.Generic
    interface(GENERIC, "IEnumerable")
        .generic(&["T"])
        .implements(&["IEnumerable"]),
    interface(GENERIC, "ICollection")
        .generic(&["T"])
        .implements(&["IEnumerable<T>"]),
    interface(GENERIC, "IList")
        .generic(&["T"])
        .implements(&["ICollection<T>"]),
    interface(GENERIC, "IReadOnlyCollection")
        .generic(&["T"])
        .implements(&["IEnumerable<T>"]),
    interface(GENERIC, "IReadOnlyList")
        .generic(&["T"])
        .implements(&["IReadOnlyCollection<T>"]),
    interface(GENERIC, "ISet")
        .generic(&["T"])
        .implements(&["ICollection<T>"]),
    structure(GENERIC, "KeyValuePair")
        .generic(&["TKey", "TValue"])
        .constructors(&[&[("key", "TKey"), ("value", "TValue")]]),
    interface(GENERIC, "IDictionary")
        .generic(&["TKey", "TValue"])
        .implements(&["ICollection<KeyValuePair<TKey, TValue>>"]),
    interface(GENERIC, "IReadOnlyDictionary")
        .generic(&["TKey", "TValue"])
        .implements(&["IReadOnlyCollection<KeyValuePair<TKey, TValue>>"]),
    class(GENERIC, "List")
        .generic(&["T"])
        .implements(&["IList<T>", "IReadOnlyList<T>", "IList"])
        .constructors(&[
            &[],
            &[("capacity", "int")],
            &[("collection", "IEnumerable<T>")],
        ]),
    class(GENERIC, "HashSet")
        .generic(&["T"])
        .implements(&["ISet<T>", "IReadOnlyCollection<T>"])
        .constructors(&[&[], &[("collection", "IEnumerable<T>")]]),
    class(GENERIC, "Dictionary")
        .generic(&["TKey", "TValue"])
        .implements(&[
            "IDictionary<TKey, TValue>",
            "IReadOnlyDictionary<TKey, TValue>",
            "IDictionary",
        ])
        .constructors(&[
            &[],
            &[("capacity", "int")],
            &[("dictionary", "IDictionary<TKey, TValue>")],
        ]),
    class(GENERIC, "SortedDictionary")
        .generic(&["TKey", "TValue"])
        .implements(&[
            "IDictionary<TKey, TValue>",
            "IReadOnlyDictionary<TKey, TValue>",
            "IDictionary",
        ])
        .constructors(&[&[], &[("dictionary", "IDictionary<TKey, TValue>")]]),
    // System.Linq
    interface(LINQ, "IGrouping")
        .generic(&["TKey", "TElement"])
        .implements(&["IEnumerable<TElement>"]),
    interface(LINQ, "ILookup")
        .generic(&["TKey", "TElement"])
        .implements(&["IEnumerable<IGrouping<TKey, TElement>>"]),
    class(LINQ, "Lookup")
        .generic(&["TKey", "TElement"])
        .implements(&["ILookup<TKey, TElement>"])
        .constructors(&[]),
    // System.ComponentModel
    class(COMPONENT_MODEL, "TypeConverter"),
    class(COMPONENT_MODEL, "TypeConverterAttribute")
        .base("Attribute")
        .constructors(&[&[], &[("type", "Type")], &[("typeName", "string")]]),
    class(COMPONENT_MODEL, "DescriptionAttribute")
        .base("Attribute")
        .constructors(&[&[], &[("description", "string")]]),
    class(COMPONENT_MODEL, "DefaultValueAttribute")
        .base("Attribute")
        .constructors(&[&[("value", "object")]]),
    // Spectre.Console.Cli
    class(CLI, "CommandSettings"),
    class(CLI, "CommandContext").constructors(&[]),
    class(CLI, "ValidationResult").constructors(&[]),
    interface(CLI, "ICommand"),
    interface(CLI, "IRemainingArguments"),
    interface(CLI, "IFlagValue"),
    class(CLI, "FlagValue")
        .generic(&["T"])
        .implements(&["IFlagValue"]),
    class(CLI, "Command")
        .generic(&["TSettings"])
        .implements(&["ICommand"]),
    class(CLI, "AsyncCommand")
        .generic(&["TSettings"])
        .implements(&["ICommand"]),
    class(CLI, "CommandApp"),
    class(CLI, "CommandOptionAttribute")
        .base("Attribute")
        .constructors(&[
            &[("template", "string")],
            &[("template", "string"), ("optionType", "Type")],
        ]),
    class(CLI, "CommandArgumentAttribute")
        .base("Attribute")
        .constructors(&[
            &[("position", "int"), ("template", "string")],
            &[
                ("position", "int"),
                ("template", "string"),
                ("argumentType", "Type"),
            ],
        ]),
];

impl TypeTable {
    /// A completed table holding the built-in host library.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut table = Self::new();
        install(&mut table);
        table.complete();
        table
    }
}

/// Declares every built-in into `table` without completing it.
pub(super) fn install(table: &mut TypeTable) {
    let mut by_name: HashMap<(&'static str, usize), TypeId> = HashMap::new();
    let mut declared = Vec::with_capacity(BUILTINS.len());

    for builtin in BUILTINS {
        let id = table.declare(
            builtin.namespace,
            builtin.name,
            builtin.kind,
            builtin.type_parameters,
            None,
        );
        if let Some(special) = builtin.special {
            table.set_special(id, special);
        }
        by_name.insert((builtin.name, builtin.type_parameters.len()), id);
        declared.push(id);
    }

    for (builtin, id) in BUILTINS.iter().zip(declared) {
        let mut resolver = SignatureResolver {
            table: &mut *table,
            by_name: &by_name,
            owner: id,
        };
        let base = builtin.base.map(|base| resolver.resolve(base));
        let interfaces: Vec<TypeId> = builtin
            .interfaces
            .iter()
            .map(|interface| resolver.resolve(interface))
            .collect();
        let constructors: Vec<Vec<ParameterSymbol>> = builtin
            .constructors
            .iter()
            .map(|parameters| {
                parameters
                    .iter()
                    .map(|(name, ty)| ParameterSymbol {
                        name: EcoString::from(*name),
                        ty: resolver.resolve(ty),
                    })
                    .collect()
            })
            .collect();

        if let Some(base) = base {
            table.set_base(id, base);
        }
        for interface in interfaces {
            table.add_interface(id, interface);
        }
        for parameters in constructors {
            table.add_constructor(id, parameters);
        }
    }
}

/// Resolves a signature like `IDictionary<TKey, TValue>[]` against the
/// built-in simple names and the owner's type parameters.
struct SignatureResolver<'a> {
    table: &'a mut TypeTable,
    by_name: &'a HashMap<(&'static str, usize), TypeId>,
    owner: TypeId,
}

impl SignatureResolver<'_> {
    fn resolve(&mut self, signature: &str) -> TypeId {
        let mut rest = signature.trim();
        let ty = self.parse(&mut rest);
        debug_assert!(rest.is_empty(), "trailing text in builtin signature {signature:?}");
        ty
    }

    fn parse(&mut self, rest: &mut &str) -> TypeId {
        let current = *rest;
        let end = current
            .find(|c: char| !(c.is_alphanumeric() || c == '_'))
            .unwrap_or(current.len());
        let name = &current[..end];
        *rest = current[end..].trim_start();

        let mut arguments = Vec::new();
        if let Some(after) = rest.strip_prefix('<') {
            *rest = after.trim_start();
            loop {
                arguments.push(self.parse(rest));
                let current = *rest;
                if let Some(after) = current.strip_prefix(',') {
                    *rest = after.trim_start();
                } else {
                    if let Some(after) = current.strip_prefix('>') {
                        *rest = after.trim_start();
                    }
                    break;
                }
            }
        }

        let mut ty = self.named(name, arguments);
        while let Some(after) = rest.strip_prefix("[]") {
            *rest = after.trim_start();
            ty = self.table.array(ty, 1);
        }
        ty
    }

    fn named(&mut self, name: &str, arguments: Vec<TypeId>) -> TypeId {
        if arguments.is_empty() {
            if let Some(special) = SpecialType::from_keyword(name) {
                if let Some(id) = self.table.special(special) {
                    return id;
                }
            }
            let owner_parameter = self
                .table
                .type_parameters(self.owner)
                .iter()
                .copied()
                .find(|param| self.table.name(*param) == name);
            if let Some(param) = owner_parameter {
                return param;
            }
        }
        let definition = self.by_name.get(&(name, arguments.len())).copied();
        debug_assert!(definition.is_some(), "unknown builtin type {name:?}");
        match definition {
            Some(definition) => self.table.construct(definition, arguments),
            None => self.table.error(name),
        }
    }
}

// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Syntax tree for the declaration subset of C#.
//!
//! The tree covers what the analysis needs to see: using directives,
//! namespaces, type declarations with their base lists and attribute lists,
//! properties and constructors. Method bodies, field initializers and other
//! executable code are skipped by the parser and appear only as
//! [`MemberDeclaration::Other`] spans.
//!
//! # Design
//!
//! - **All nodes have spans**, so diagnostics and code fixes can point at
//!   exact source text.
//! - **The source text is kept** alongside the tree in [`SyntaxTree`]. Fixes
//!   are expressed as text edits against it and produce a fresh tree; the
//!   original is never mutated.
//!
//! ```
//! use cliguard_core::ast::{MemberDeclaration, SyntaxTree};
//!
//! let tree = SyntaxTree::parse("class S : CommandSettings { public int Count { get; set; } }");
//! assert!(tree.diagnostics().is_empty());
//! let class = tree.root().type_declarations().next().unwrap();
//! assert_eq!(class.name.name, "S");
//! assert!(matches!(class.members[0], MemberDeclaration::Property(_)));
//! ```

use ecow::EcoString;

use crate::diagnostics::Diagnostic;
use crate::source_analysis::{Span, lex_with_eof, parse};

/// Parsed source text together with its syntax tree and syntax diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxTree {
    text: String,
    root: CompilationUnit,
    diagnostics: Vec<Diagnostic>,
}

impl SyntaxTree {
    /// Lexes and parses `text`. Always produces a tree; syntax errors are
    /// available from [`SyntaxTree::diagnostics`].
    #[must_use]
    pub fn parse(text: impl Into<String>) -> Self {
        let text = text.into();
        let (root, errors) = parse(lex_with_eof(&text));
        let diagnostics = errors.iter().map(|e| e.to_diagnostic()).collect();
        Self {
            text,
            root,
            diagnostics,
        }
    }

    /// The full source text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The root of the tree.
    #[must_use]
    pub fn root(&self) -> &CompilationUnit {
        &self.root
    }

    /// Syntax errors, as `CG0001` diagnostics.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Source text covered by `span`.
    #[must_use]
    pub fn slice(&self, span: Span) -> &str {
        self.text.get(span.as_range()).unwrap_or_default()
    }

    /// Finds the property declaration that contains `offset`.
    #[must_use]
    pub fn property_at(&self, offset: u32) -> Option<&PropertyDeclaration> {
        self.root.type_declarations().find_map(|ty| {
            ty.members.iter().find_map(|member| match member {
                MemberDeclaration::Property(property) if property.span.contains_offset(offset) => {
                    Some(property)
                }
                _ => None,
            })
        })
    }
}

/// A whole source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationUnit {
    /// Using directives at the top of the file.
    pub usings: Vec<UsingDirective>,
    /// Namespaces and types declared at the top level.
    pub members: Vec<NamespaceMember>,
    /// Source location spanning the whole file.
    pub span: Span,
}

impl CompilationUnit {
    /// Iterates over every type declaration in the file in source order,
    /// including types in namespaces and nested types.
    pub fn type_declarations(&self) -> impl Iterator<Item = &TypeDeclaration> {
        let mut stack: Vec<&TypeDeclaration> = Vec::new();
        push_namespace_members(&self.members, &mut stack);
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            for member in next.members.iter().rev() {
                if let MemberDeclaration::NestedType(nested) = member {
                    stack.push(nested);
                }
            }
            Some(next)
        })
    }
}

/// Pushes types in reverse so popping yields source order.
fn push_namespace_members<'a>(members: &'a [NamespaceMember], stack: &mut Vec<&'a TypeDeclaration>) {
    let mut ordered = Vec::new();
    collect_namespace_members(members, &mut ordered);
    stack.extend(ordered.into_iter().rev());
}

fn collect_namespace_members<'a>(members: &'a [NamespaceMember], out: &mut Vec<&'a TypeDeclaration>) {
    for member in members {
        match member {
            NamespaceMember::Namespace(namespace) => {
                collect_namespace_members(&namespace.members, out);
            }
            NamespaceMember::Type(ty) => out.push(ty),
        }
    }
}

/// A name with its source location.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    /// The name, without any `@` verbatim prefix.
    pub name: EcoString,
    /// Source location.
    pub span: Span,
}

impl Identifier {
    /// Creates a new identifier.
    #[must_use]
    pub fn new(name: impl Into<EcoString>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

/// `using System.IO;`, `using static X;`, `using Alias = X.Y;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsingDirective {
    /// Whether the directive is `global using`.
    pub is_global: bool,
    /// What kind of using this is.
    pub kind: UsingKind,
    /// The namespace or type being imported.
    pub target: TypeSyntax,
    /// Source location.
    pub span: Span,
}

/// The form of a using directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsingKind {
    /// `using Namespace;`
    Namespace,
    /// `using static Type;`
    Static,
    /// `using Alias = Target;`
    Alias(Identifier),
}

/// A member of a compilation unit or namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamespaceMember {
    /// A nested namespace block.
    Namespace(NamespaceDeclaration),
    /// A type declaration.
    Type(TypeDeclaration),
}

/// `namespace A.B { ... }` or `namespace A.B;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceDeclaration {
    /// The dotted namespace name.
    pub name: Vec<Identifier>,
    /// Whether this is a file-scoped namespace.
    pub file_scoped: bool,
    /// Using directives inside the namespace.
    pub usings: Vec<UsingDirective>,
    /// Namespaces and types declared inside.
    pub members: Vec<NamespaceMember>,
    /// Source location.
    pub span: Span,
}

impl NamespaceDeclaration {
    /// The dotted name as written.
    #[must_use]
    pub fn dotted_name(&self) -> EcoString {
        let mut name = EcoString::new();
        for (i, part) in self.name.iter().enumerate() {
            if i > 0 {
                name.push('.');
            }
            name.push_str(&part.name);
        }
        name
    }
}

/// The keyword that introduced a type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeDeclarationKind {
    /// `class`
    Class,
    /// `struct`
    Struct,
    /// `interface`
    Interface,
    /// `enum`
    Enum,
    /// `record` or `record class`
    Record,
    /// `record struct`
    RecordStruct,
}

/// A class, struct, interface, record or enum declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDeclaration {
    /// Attribute lists on the declaration.
    pub attributes: Vec<AttributeList>,
    /// Modifiers such as `public`, `sealed`, `partial`.
    pub modifiers: Vec<Identifier>,
    /// The declaration keyword.
    pub kind: TypeDeclarationKind,
    /// The type name.
    pub name: Identifier,
    /// Generic type parameter names.
    pub type_parameters: Vec<Identifier>,
    /// A primary constructor parameter list, if present.
    pub primary_parameters: Option<Vec<Parameter>>,
    /// The base class and interfaces, in declaration order.
    pub base_list: Vec<TypeSyntax>,
    /// Members in source order.
    pub members: Vec<MemberDeclaration>,
    /// Source location.
    pub span: Span,
}

/// A member of a type declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberDeclaration {
    /// A property.
    Property(PropertyDeclaration),
    /// An instance or static constructor.
    Constructor(ConstructorDeclaration),
    /// A nested type declaration.
    NestedType(TypeDeclaration),
    /// Any other member (field, method, event, indexer, operator, enum
    /// member). Only its extent is recorded.
    Other(Span),
}

/// `[Attr] public T Name { get; set; }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDeclaration {
    /// Attribute lists on the property.
    pub attributes: Vec<AttributeList>,
    /// Modifiers such as `public`, `required`.
    pub modifiers: Vec<Identifier>,
    /// The declared type.
    pub ty: TypeSyntax,
    /// The property name.
    pub name: Identifier,
    /// Source location, from the first attribute list to the end of the
    /// accessors or initializer.
    pub span: Span,
}

impl PropertyDeclaration {
    /// Iterates over every attribute in every attribute list.
    pub fn all_attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter().flat_map(|list| list.attributes.iter())
    }

    /// Attributes that apply to the property itself, skipping lists with
    /// another explicit target such as `[field: ...]`.
    pub fn property_attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes
            .iter()
            .filter(|list| list.applies_to_property())
            .flat_map(|list| list.attributes.iter())
    }
}

/// `public Name(string value) { ... }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorDeclaration {
    /// Modifiers such as `public`, `static`.
    pub modifiers: Vec<Identifier>,
    /// The constructor name (same as the type name).
    pub name: Identifier,
    /// Parameters in order.
    pub parameters: Vec<Parameter>,
    /// Source location.
    pub span: Span,
}

impl ConstructorDeclaration {
    /// Returns `true` for a `static` constructor.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.modifiers.iter().any(|m| m.name == "static")
    }
}

/// A constructor or primary-constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Modifiers such as `ref`, `params`, `this`.
    pub modifiers: Vec<Identifier>,
    /// The parameter type.
    pub ty: TypeSyntax,
    /// The parameter name.
    pub name: Identifier,
    /// Whether a default value is present.
    pub has_default: bool,
    /// Source location.
    pub span: Span,
}

/// `[target: A, B(args)]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeList {
    /// An explicit target such as `property` or `field`.
    pub target: Option<Identifier>,
    /// The attributes in the list.
    pub attributes: Vec<Attribute>,
    /// Source location including the brackets.
    pub span: Span,
}

impl AttributeList {
    /// True without a target or with `property:`.
    #[must_use]
    pub fn applies_to_property(&self) -> bool {
        self.target
            .as_ref()
            .is_none_or(|target| target.name == "property")
    }
}

/// A single attribute application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// The attribute name as written, e.g. `CommandOption` or
    /// `Cli.CommandOptionAttribute`.
    pub name: TypeSyntax,
    /// The argument list, if parentheses were written.
    pub arguments: Option<AttributeArgumentList>,
    /// Source location.
    pub span: Span,
}

impl Attribute {
    /// The last segment of the attribute name, as written.
    #[must_use]
    pub fn simple_name(&self) -> &str {
        self.name.simple_name().unwrap_or_default()
    }
}

/// `( ... )` after an attribute name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeArgumentList {
    /// The `(` token.
    pub open: Span,
    /// The `)` token.
    pub close: Span,
    /// Arguments in source order.
    pub arguments: Vec<AttributeArgument>,
}

/// One attribute argument, optionally named.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeArgument {
    /// `name:` or `Name =`, when present.
    pub name: Option<ArgumentName>,
    /// The argument value.
    pub expression: Expression,
    /// Source location including the name.
    pub span: Span,
}

/// The name part of a named attribute argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentName {
    /// The name.
    pub name: Identifier,
    /// Which syntax was used.
    pub kind: ArgumentNameKind,
}

/// How an attribute argument is named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgumentNameKind {
    /// `name: value` names a constructor parameter.
    Colon,
    /// `Name = value` sets a property or field of the attribute.
    Equals,
}

/// An attribute argument expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    /// `typeof(T)`
    TypeOf {
        /// The referenced type.
        ty: TypeSyntax,
        /// Source location of the whole expression.
        span: Span,
    },
    /// A literal value.
    Literal {
        /// What kind of literal.
        kind: LiteralKind,
        /// The literal as written.
        text: EcoString,
        /// Source location.
        span: Span,
    },
    /// Anything else (`nameof(...)`, constants, operators, ...).
    Other(Span),
}

impl Expression {
    /// Source location of the expression.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::TypeOf { span, .. } | Self::Literal { span, .. } | Self::Other(span) => *span,
        }
    }

    /// Returns `true` for `typeof(...)`.
    #[must_use]
    pub fn is_type_of(&self) -> bool {
        matches!(self, Self::TypeOf { .. })
    }
}

/// The kind of a literal expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    /// Integer literal.
    Integer,
    /// Real literal.
    Real,
    /// Any string literal.
    String,
    /// Character literal.
    Char,
    /// `true` or `false`.
    Boolean,
    /// `null`
    Null,
}

/// A reference to a type as written in source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSyntax {
    /// A possibly qualified, possibly generic name: `global::System.IO.FileInfo`,
    /// `Dictionary<string, int>`.
    Name(QualifiedName),
    /// `T[]`, `T[,]`
    Array {
        /// The element type.
        element: Box<TypeSyntax>,
        /// Number of dimensions.
        rank: u8,
        /// Source location.
        span: Span,
    },
    /// `T?`
    Nullable {
        /// The underlying type.
        inner: Box<TypeSyntax>,
        /// Source location.
        span: Span,
    },
    /// `(int, string)` and other forms the binder does not model.
    Unsupported(Span),
}

impl TypeSyntax {
    /// Source location of the type.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Name(name) => name.span,
            Self::Array { span, .. } | Self::Nullable { span, .. } | Self::Unsupported(span) => *span,
        }
    }

    /// The last name segment, for simple and qualified names.
    #[must_use]
    pub fn simple_name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => name.segments.last().map(|s| s.name.name.as_str()),
            _ => None,
        }
    }
}

/// `global::A.B<C>.D`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedName {
    /// Whether the name starts with `global::`.
    pub global: bool,
    /// The dotted segments, each with optional generic arguments.
    pub segments: Vec<NameSegment>,
    /// Source location.
    pub span: Span,
}

/// One segment of a qualified name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameSegment {
    /// The segment name.
    pub name: Identifier,
    /// Generic arguments written after the segment.
    pub type_arguments: Vec<TypeSyntax>,
}

// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Binds a syntax tree into a [`Compilation`].
//!
//! **DDD Context:** Semantic Analysis
//!
//! Binding runs in two passes. The first declares every source type so that
//! forward references resolve; the second resolves base lists,
//! constructors, property types and attributes. Names that fail to resolve
//! become error types and are reported as `CG0002`/`CG0003` warnings.

use std::collections::HashSet;

use ecow::EcoString;
use tracing::debug;

use super::symbols::{AttributeData, ParameterSymbol, PropertySymbol, TypedConstant};
use super::types::{SpecialType, TypeId, TypeKind, TypeTable};
use super::{Constructor, SemanticModel};
use crate::ast::{
    ArgumentNameKind, Attribute, ConstructorDeclaration, Expression,
    MemberDeclaration, NamespaceMember, Parameter, PropertyDeclaration, QualifiedName,
    SyntaxTree, TypeDeclaration, TypeDeclarationKind, TypeSyntax, UsingDirective, UsingKind,
};
use crate::diagnostics::{Diagnostic, Severity, UNRESOLVED_ATTRIBUTE, UNRESOLVED_TYPE};
use crate::source_analysis::Span;

/// A bound source file: the type table plus the source types declared in it.
#[derive(Debug, Clone)]
pub struct Compilation {
    table: TypeTable,
    named_types: Vec<TypeId>,
    diagnostics: Vec<Diagnostic>,
}

impl Compilation {
    /// Binds `tree` against the built-in host library.
    #[must_use]
    pub fn bind(tree: &SyntaxTree) -> Self {
        let mut binder = Binder::new(TypeTable::with_builtins());
        binder.declare_members(&tree.root().members, "", &tree.root().usings);
        binder.bind_declarations();
        binder.finish()
    }

    /// Wraps a hand-built table. `named_types` are the types analysis
    /// visits. The table is completed here.
    #[must_use]
    pub fn new(mut table: TypeTable, named_types: Vec<TypeId>) -> Self {
        table.complete();
        Self {
            table,
            named_types,
            diagnostics: Vec::new(),
        }
    }

    /// Binding diagnostics (`CG0002`, `CG0003`). Syntax errors live on the
    /// tree.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// The underlying type table.
    #[must_use]
    pub fn table(&self) -> &TypeTable {
        &self.table
    }

    /// Finds a source type by its display name.
    #[must_use]
    pub fn source_type(&self, display: &str) -> Option<TypeId> {
        self.named_types
            .iter()
            .copied()
            .find(|ty| self.table.display(*ty) == display)
    }
}

impl SemanticModel for Compilation {
    fn named_types(&self) -> &[TypeId] {
        &self.named_types
    }

    fn kind(&self, ty: TypeId) -> TypeKind {
        self.table.kind(ty)
    }

    fn display(&self, ty: TypeId) -> EcoString {
        self.table.display(ty)
    }

    fn special_type(&self, ty: TypeId) -> Option<SpecialType> {
        self.table.special_type(ty)
    }

    fn base_type(&self, ty: TypeId) -> Option<TypeId> {
        self.table.base_type(ty)
    }

    fn all_interfaces(&self, ty: TypeId) -> &[TypeId] {
        self.table.all_interfaces(ty)
    }

    fn constructed_from(&self, ty: TypeId) -> TypeId {
        self.table.constructed_from(ty)
    }

    fn type_arguments(&self, ty: TypeId) -> &[TypeId] {
        self.table.type_arguments(ty)
    }

    fn constructors(&self, ty: TypeId) -> &[Constructor] {
        self.table.constructors(ty)
    }

    fn properties(&self, ty: TypeId) -> &[PropertySymbol] {
        self.table.properties(ty)
    }

    fn array_element(&self, ty: TypeId) -> Option<TypeId> {
        self.table.array_element(ty)
    }

    fn is_value_type(&self, ty: TypeId) -> bool {
        self.table.is_value_type(ty)
    }

    fn nullable_underlying(&self, ty: TypeId) -> Option<TypeId> {
        self.table.nullable_underlying(ty)
    }
}

// ============================================================================
// Binder
// ============================================================================

/// Using directives declared at one namespace level.
#[derive(Debug, Clone)]
struct UsingScope<'a> {
    namespace: EcoString,
    usings: &'a [UsingDirective],
}

/// Where a declaration sits: its namespace, the using scopes in effect
/// (innermost first) and the enclosing types (innermost first).
#[derive(Debug, Clone, Default)]
struct Context {
    namespace: EcoString,
    scopes: Vec<usize>,
    enclosing: Vec<TypeId>,
}

impl Context {
    /// `A.B.C`, `A.B`, `A`, then the global namespace.
    fn namespace_chain(&self) -> Vec<&str> {
        let mut chain = Vec::new();
        let mut current = self.namespace.as_str();
        while !current.is_empty() {
            chain.push(current);
            current = current.rsplit_once('.').map_or("", |(parent, _)| parent);
        }
        chain.push("");
        chain
    }
}

struct Declared<'a> {
    id: TypeId,
    syntax: &'a TypeDeclaration,
    context: Context,
}

/// Result of resolving a name prefix.
enum Resolved {
    Namespace(EcoString),
    Type(TypeId),
}

struct Binder<'a> {
    table: TypeTable,
    scopes: Vec<UsingScope<'a>>,
    declared: Vec<Declared<'a>>,
    named_types: Vec<TypeId>,
    source_types: HashSet<TypeId>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Binder<'a> {
    fn new(table: TypeTable) -> Self {
        Self {
            table,
            scopes: Vec::new(),
            declared: Vec::new(),
            named_types: Vec::new(),
            source_types: HashSet::new(),
            diagnostics: Vec::new(),
        }
    }

    fn finish(mut self) -> Compilation {
        self.table.complete();
        Compilation {
            table: self.table,
            named_types: self.named_types,
            diagnostics: self.diagnostics,
        }
    }

    // ========================================================================
    // Declaration pass
    // ========================================================================

    fn declare_members(
        &mut self,
        members: &'a [NamespaceMember],
        namespace: &str,
        usings: &'a [UsingDirective],
    ) {
        let scope = self.push_scope(namespace, usings);
        let context = Context {
            namespace: namespace.into(),
            scopes: vec![scope],
            enclosing: Vec::new(),
        };
        self.declare_namespace_members(members, &context);
    }

    fn push_scope(&mut self, namespace: &str, usings: &'a [UsingDirective]) -> usize {
        self.scopes.push(UsingScope {
            namespace: namespace.into(),
            usings,
        });
        self.scopes.len() - 1
    }

    fn declare_namespace_members(&mut self, members: &'a [NamespaceMember], context: &Context) {
        for member in members {
            match member {
                NamespaceMember::Namespace(namespace) => {
                    let name = namespace.dotted_name();
                    let full: EcoString = if context.namespace.is_empty() {
                        name
                    } else {
                        format!("{}.{name}", context.namespace).into()
                    };
                    let scope = self.push_scope(&full, &namespace.usings);
                    let mut scopes = vec![scope];
                    scopes.extend(&context.scopes);
                    let inner = Context {
                        namespace: full,
                        scopes,
                        enclosing: Vec::new(),
                    };
                    self.declare_namespace_members(&namespace.members, &inner);
                }
                NamespaceMember::Type(declaration) => {
                    self.declare_type(declaration, context, None);
                }
            }
        }
    }

    fn declare_type(
        &mut self,
        syntax: &'a TypeDeclaration,
        context: &Context,
        containing: Option<TypeId>,
    ) {
        let arity = syntax.type_parameters.len();
        let existing = match containing {
            Some(outer) => self.table.lookup_nested(outer, &syntax.name.name, arity),
            None => self
                .table
                .lookup_in_namespace(&context.namespace, &syntax.name.name, arity),
        };

        let id = match existing {
            Some(id) if self.source_types.contains(&id) => id,
            _ => {
                let parameters: Vec<&str> = syntax
                    .type_parameters
                    .iter()
                    .map(|param| param.name.as_str())
                    .collect();
                let id = self.table.declare(
                    &context.namespace,
                    &syntax.name.name,
                    declared_kind(syntax.kind),
                    &parameters,
                    containing,
                );
                self.source_types.insert(id);
                self.named_types.push(id);
                id
            }
        };

        let mut enclosing = vec![id];
        enclosing.extend(&context.enclosing);
        let inner = Context {
            namespace: context.namespace.clone(),
            scopes: context.scopes.clone(),
            enclosing,
        };

        for member in &syntax.members {
            if let MemberDeclaration::NestedType(nested) = member {
                self.declare_type(nested, &inner, Some(id));
            }
        }

        self.declared.push(Declared {
            id,
            syntax,
            context: inner,
        });
    }

    // ========================================================================
    // Binding pass
    // ========================================================================

    fn bind_declarations(&mut self) {
        let declared = std::mem::take(&mut self.declared);
        for declaration in &declared {
            self.bind_base_list(declaration);
            self.bind_members(declaration);
        }
        debug!(
            types = self.named_types.len(),
            diagnostics = self.diagnostics.len(),
            "bound source types"
        );
    }

    fn bind_base_list(&mut self, declaration: &Declared<'_>) {
        let Declared {
            id,
            syntax,
            context,
        } = declaration;
        let mut has_base = self.table.base_type(*id).is_some();

        if syntax.kind != TypeDeclarationKind::Enum {
            for (index, entry) in syntax.base_list.iter().enumerate() {
                let ty = self.bind_type(entry, context);
                match self.table.kind(ty) {
                    TypeKind::Interface => self.table.add_interface(*id, ty),
                    TypeKind::Class | TypeKind::Error
                        if index == 0 && declared_kind(syntax.kind) == TypeKind::Class =>
                    {
                        self.table.set_base(*id, ty);
                        has_base = true;
                    }
                    _ => {}
                }
            }
        }

        if !has_base {
            let default_base = match declared_kind(syntax.kind) {
                TypeKind::Class => self.table.special(SpecialType::Object),
                TypeKind::Struct => self.table.lookup_in_namespace("System", "ValueType", 0),
                TypeKind::Enum => self.table.lookup_in_namespace("System", "Enum", 0),
                _ => None,
            };
            if let Some(base) = default_base {
                self.table.set_base(*id, base);
            }
        }
    }

    fn bind_members(&mut self, declaration: &Declared<'_>) {
        let Declared {
            id,
            syntax,
            context,
        } = declaration;
        let kind = declared_kind(syntax.kind);
        let mut has_instance_constructor = false;

        if let Some(parameters) = &syntax.primary_parameters {
            let parameters = self.bind_parameters(parameters, context);
            self.table.add_constructor(*id, parameters);
            has_instance_constructor = true;
        }

        for member in &syntax.members {
            match member {
                MemberDeclaration::Property(property) => {
                    let symbol = self.bind_property(property, context);
                    self.table.add_property(*id, symbol);
                }
                MemberDeclaration::Constructor(constructor) if !constructor.is_static() => {
                    self.bind_constructor(*id, constructor, context);
                    has_instance_constructor = true;
                }
                MemberDeclaration::Constructor(_)
                | MemberDeclaration::NestedType(_)
                | MemberDeclaration::Other(_) => {}
            }
        }

        let implicit_constructor = match kind {
            TypeKind::Class => !has_instance_constructor,
            TypeKind::Struct => true,
            _ => false,
        };
        if implicit_constructor && self.table.constructors(*id).iter().all(|c| !c.parameters.is_empty()) {
            self.table.add_constructor(*id, Vec::new());
        }
    }

    fn bind_constructor(&mut self, id: TypeId, syntax: &ConstructorDeclaration, context: &Context) {
        let parameters = self.bind_parameters(&syntax.parameters, context);
        self.table.add_constructor(id, parameters);
    }

    fn bind_parameters(&mut self, parameters: &[Parameter], context: &Context) -> Vec<ParameterSymbol> {
        parameters
            .iter()
            .map(|parameter| ParameterSymbol {
                name: parameter.name.name.clone(),
                ty: self.bind_type(&parameter.ty, context),
            })
            .collect()
    }

    fn bind_property(&mut self, syntax: &PropertyDeclaration, context: &Context) -> PropertySymbol {
        let ty = self.bind_type(&syntax.ty, context);
        let attributes = syntax
            .attributes
            .iter()
            .filter(|list| list.applies_to_property())
            .flat_map(|list| &list.attributes)
            .map(|attribute| self.bind_attribute(attribute, context))
            .collect();
        PropertySymbol {
            name: syntax.name.name.clone(),
            ty,
            span: syntax.name.span,
            declaration_span: syntax.span,
            attributes,
        }
    }

    // ========================================================================
    // Attributes
    // ========================================================================

    fn bind_attribute(&mut self, syntax: &Attribute, context: &Context) -> AttributeData {
        let name: EcoString = syntax.simple_name().into();
        let class = match &syntax.name {
            TypeSyntax::Name(qualified) => {
                let arguments = self.bind_segment_arguments(qualified, context);
                let suffixed = format!("{name}Attribute");
                self.lookup(qualified, &arguments, Some(suffixed.as_str()), context)
                    .or_else(|| self.lookup(qualified, &arguments, None, context))
            }
            _ => None,
        };
        if class.is_none() {
            self.report(
                UNRESOLVED_ATTRIBUTE,
                format!("the attribute `{name}` could not be found"),
                syntax.name.span(),
            );
        }

        let mut positional: Vec<(Option<&str>, TypedConstant)> = Vec::new();
        let mut named_arguments = Vec::new();
        for argument in syntax.arguments.iter().flat_map(|list| &list.arguments) {
            let value = self.bind_constant(&argument.expression, context);
            match &argument.name {
                Some(argument_name) if argument_name.kind == ArgumentNameKind::Equals => {
                    named_arguments.push((argument_name.name.name.clone(), value));
                }
                Some(argument_name) => positional.push((Some(argument_name.name.name.as_str()), value)),
                None => positional.push((None, value)),
            }
        }

        let constructor_arguments = match class {
            Some(class) => self.order_by_parameters(class, positional),
            None => positional.into_iter().map(|(_, value)| value).collect(),
        };

        AttributeData {
            class,
            name,
            constructor_arguments,
            named_arguments,
            span: syntax.span,
        }
    }

    /// Places `name:` arguments at their parameter's position. Falls back to
    /// source order when no constructor accepts the names.
    fn order_by_parameters(
        &self,
        class: TypeId,
        positional: Vec<(Option<&str>, TypedConstant)>,
    ) -> Vec<TypedConstant> {
        if positional.iter().all(|(name, _)| name.is_none()) {
            return positional.into_iter().map(|(_, value)| value).collect();
        }

        let slots = self.table.constructors(class).iter().find_map(|constructor| {
            if constructor.parameters.len() != positional.len() {
                return None;
            }
            let mut slots: Vec<Option<usize>> = vec![None; positional.len()];
            for (index, (name, _)) in positional.iter().enumerate() {
                let target = match name {
                    Some(name) => constructor
                        .parameters
                        .iter()
                        .position(|p| p.name.as_str() == *name)?,
                    None => index,
                };
                if slots[target].is_some() {
                    return None;
                }
                slots[target] = Some(index);
            }
            slots.into_iter().collect::<Option<Vec<usize>>>()
        });

        let mut values: Vec<Option<TypedConstant>> =
            positional.into_iter().map(|(_, value)| Some(value)).collect();
        match slots {
            Some(order) => order
                .into_iter()
                .map(|index| values[index].take().unwrap_or(TypedConstant::Unknown))
                .collect(),
            None => values.into_iter().flatten().collect(),
        }
    }

    fn bind_constant(&mut self, expression: &Expression, context: &Context) -> TypedConstant {
        match expression {
            Expression::TypeOf { ty, .. } => {
                let ty = self.bind_type(ty, context);
                if self.table.kind(ty) == TypeKind::Error {
                    TypedConstant::Unknown
                } else {
                    TypedConstant::Type(ty)
                }
            }
            Expression::Literal { text, .. } => TypedConstant::Literal(text.clone()),
            Expression::Other(_) => TypedConstant::Unknown,
        }
    }

    // ========================================================================
    // Types and name lookup
    // ========================================================================

    fn bind_type(&mut self, syntax: &TypeSyntax, context: &Context) -> TypeId {
        match syntax {
            TypeSyntax::Name(name) => {
                let arguments = self.bind_segment_arguments(name, context);
                let text = qualified_text(name);
                let has_error = arguments
                    .iter()
                    .flatten()
                    .any(|argument| self.table.kind(*argument) == TypeKind::Error);
                if has_error {
                    return self.table.error(&text);
                }
                match self.lookup(name, &arguments, None, context) {
                    Some(ty) => ty,
                    None => {
                        self.report(
                            UNRESOLVED_TYPE,
                            format!("the type or namespace name `{text}` could not be found"),
                            name.span,
                        );
                        self.table.error(&text)
                    }
                }
            }
            TypeSyntax::Array { element, rank, .. } => {
                let element = self.bind_type(element, context);
                if self.table.kind(element) == TypeKind::Error {
                    element
                } else {
                    self.table.array(element, *rank)
                }
            }
            TypeSyntax::Nullable { inner, .. } => {
                let inner = self.bind_type(inner, context);
                if self.table.is_value_type(inner) && self.table.nullable_underlying(inner).is_none() {
                    self.table.nullable(inner)
                } else {
                    inner
                }
            }
            TypeSyntax::Unsupported(_) => self.table.error("?"),
        }
    }

    fn bind_segment_arguments(&mut self, name: &QualifiedName, context: &Context) -> Vec<Vec<TypeId>> {
        name.segments
            .iter()
            .map(|segment| {
                segment
                    .type_arguments
                    .iter()
                    .map(|argument| self.bind_type(argument, context))
                    .collect()
            })
            .collect()
    }

    /// Resolves a qualified name left to right. `last_name` replaces the
    /// final segment's name, for attribute suffix lookup.
    fn lookup(
        &mut self,
        name: &QualifiedName,
        arguments: &[Vec<TypeId>],
        last_name: Option<&str>,
        context: &Context,
    ) -> Option<TypeId> {
        let last = name.segments.len().checked_sub(1)?;
        let mut current: Option<Resolved> = None;

        for (index, segment) in name.segments.iter().enumerate() {
            let segment_name = match last_name {
                Some(replacement) if index == last => replacement,
                _ => segment.name.name.as_str(),
            };
            let segment_arguments = arguments.get(index).cloned().unwrap_or_default();
            let arity = segment_arguments.len();

            let resolved = match current {
                None if name.global => self.lookup_global(segment_name, arity),
                None => self.lookup_first(segment_name, arity, context),
                Some(Resolved::Namespace(namespace)) => {
                    self.lookup_in_namespace(&namespace, segment_name, arity)
                }
                Some(Resolved::Type(outer)) => {
                    let definition = self.table.constructed_from(outer);
                    self.table
                        .lookup_nested(definition, segment_name, arity)
                        .map(Resolved::Type)
                }
            }?;

            current = Some(match resolved {
                Resolved::Type(definition) if arity > 0 => {
                    Resolved::Type(self.table.construct(definition, segment_arguments))
                }
                other => other,
            });
        }

        match current? {
            Resolved::Type(ty) => Some(ty),
            Resolved::Namespace(_) => None,
        }
    }

    fn lookup_first(&mut self, name: &str, arity: usize, context: &Context) -> Option<Resolved> {
        if arity == 0 {
            if let Some(special) = SpecialType::from_keyword(name) {
                return self.table.special(special).map(Resolved::Type);
            }
            if name == "dynamic" {
                return self.table.special(SpecialType::Object).map(Resolved::Type);
            }
        }

        for outer in &context.enclosing {
            if arity == 0 {
                let parameter = self
                    .table
                    .type_parameters(*outer)
                    .iter()
                    .copied()
                    .find(|param| self.table.name(*param) == name);
                if let Some(parameter) = parameter {
                    return Some(Resolved::Type(parameter));
                }
            }
            if let Some(nested) = self.table.lookup_nested(*outer, name, arity) {
                return Some(Resolved::Type(nested));
            }
        }

        for namespace in context.namespace_chain() {
            if let Some(found) = self.lookup_in_namespace(namespace, name, arity) {
                return Some(found);
            }
            let usings: Vec<&'a [UsingDirective]> = context
                .scopes
                .iter()
                .map(|index| &self.scopes[*index])
                .filter(|scope| scope.namespace == namespace)
                .map(|scope| scope.usings)
                .collect();
            for usings in usings {
                if let Some(found) = self.lookup_in_usings(usings, name, arity) {
                    return Some(found);
                }
            }
        }

        None
    }

    fn lookup_in_usings(
        &mut self,
        usings: &[UsingDirective],
        name: &str,
        arity: usize,
    ) -> Option<Resolved> {
        for using in usings {
            if let UsingKind::Alias(alias) = &using.kind {
                if arity == 0 && alias.name == name {
                    return self.resolve_alias_target(&using.target);
                }
            }
        }
        for using in usings {
            if using.kind != UsingKind::Namespace {
                continue;
            }
            let TypeSyntax::Name(target) = &using.target else {
                continue;
            };
            let namespace = qualified_text(target);
            if let Some(ty) = self.table.lookup_in_namespace(&namespace, name, arity) {
                return Some(Resolved::Type(ty));
            }
        }
        None
    }

    /// Alias targets are fully qualified.
    fn resolve_alias_target(&mut self, target: &TypeSyntax) -> Option<Resolved> {
        let TypeSyntax::Name(name) = target else {
            return None;
        };
        let text = qualified_text(name);
        if name.segments.iter().all(|s| s.type_arguments.is_empty()) && self.table.is_namespace(&text) {
            return Some(Resolved::Namespace(text.into()));
        }
        let global = Context::default();
        let arguments = self.bind_segment_arguments(name, &global);
        self.lookup(name, &arguments, None, &global).map(Resolved::Type)
    }

    fn lookup_global(&mut self, name: &str, arity: usize) -> Option<Resolved> {
        self.lookup_in_namespace("", name, arity)
    }

    fn lookup_in_namespace(&mut self, namespace: &str, name: &str, arity: usize) -> Option<Resolved> {
        if let Some(ty) = self.table.lookup_in_namespace(namespace, name, arity) {
            return Some(Resolved::Type(ty));
        }
        let nested: EcoString = if namespace.is_empty() {
            name.into()
        } else {
            format!("{namespace}.{name}").into()
        };
        (arity == 0 && self.table.is_namespace(&nested)).then_some(Resolved::Namespace(nested))
    }

    fn report(&mut self, id: &str, message: String, span: Span) {
        debug!(%id, %message, ?span, "binding failure");
        self.diagnostics
            .push(Diagnostic::new(id, Severity::Warning, message, span));
    }
}

fn declared_kind(kind: TypeDeclarationKind) -> TypeKind {
    match kind {
        TypeDeclarationKind::Class | TypeDeclarationKind::Record => TypeKind::Class,
        TypeDeclarationKind::Struct | TypeDeclarationKind::RecordStruct => TypeKind::Struct,
        TypeDeclarationKind::Interface => TypeKind::Interface,
        TypeDeclarationKind::Enum => TypeKind::Enum,
    }
}

/// `A.B.C`, ignoring generic arguments.
fn qualified_text(name: &QualifiedName) -> String {
    let mut text = String::new();
    for (index, segment) in name.segments.iter().enumerate() {
        if index > 0 {
            text.push('.');
        }
        text.push_str(&segment.name.name);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bind(source: &str) -> Compilation {
        Compilation::bind(&SyntaxTree::parse(source))
    }

    fn property<'c>(compilation: &'c Compilation, class: &str, name: &str) -> &'c PropertySymbol {
        let ty = compilation.source_type(class).unwrap();
        compilation
            .properties(ty)
            .iter()
            .find(|p| p.name == name)
            .unwrap()
    }

    fn property_display(compilation: &Compilation, class: &str, name: &str) -> EcoString {
        compilation.display(property(compilation, class, name).ty)
    }

    #[test]
    fn resolves_through_usings() {
        let compilation = bind(
            "using System.IO;\nusing Spectre.Console.Cli;\n\
             class Settings : CommandSettings { public DirectoryInfo Dir { get; set; } }",
        );
        assert!(compilation.diagnostics().is_empty(), "{:?}", compilation.diagnostics());
        let settings = compilation.source_type("Settings").unwrap();
        let base = compilation.base_type(settings).unwrap();
        assert_eq!(compilation.display(base), "Spectre.Console.Cli.CommandSettings");
        assert_eq!(
            property_display(&compilation, "Settings", "Dir"),
            "System.IO.DirectoryInfo"
        );
    }

    #[test]
    fn keyword_aliases_and_shapes() {
        let compilation = bind(
            "using System.Collections.Generic;\n\
             class S { public int? A { get; set; } public string? B { get; set; } \
             public Dictionary<string, int> C { get; set; } public byte[,] D { get; set; } }",
        );
        assert_eq!(property_display(&compilation, "S", "A"), "int?");
        assert_eq!(property_display(&compilation, "S", "B"), "string");
        assert_eq!(
            property_display(&compilation, "S", "C"),
            "System.Collections.Generic.Dictionary<string, int>"
        );
        assert_eq!(property_display(&compilation, "S", "D"), "byte[,]");
    }

    #[test]
    fn same_type_written_twice_is_one_identity() {
        let compilation = bind(
            "using System.IO;\nclass S { public FileInfo A { get; set; } public System.IO.FileInfo B { get; set; } \
             public global::System.IO.FileInfo C { get; set; } }",
        );
        let a = property(&compilation, "S", "A").ty;
        assert_eq!(property(&compilation, "S", "B").ty, a);
        assert_eq!(property(&compilation, "S", "C").ty, a);
    }

    #[test]
    fn resolves_namespaces_nested_types_and_aliases() {
        let compilation = bind(
            "using Cli = Spectre.Console.Cli;\nusing Dir = System.IO.DirectoryInfo;\n\
             namespace App.Commands {\n\
               class Outer { public struct Point {} }\n\
               class S : Cli.CommandSettings {\n\
                 public Outer.Point P { get; set; }\n\
                 public Dir D { get; set; }\n\
               }\n\
             }",
        );
        assert!(compilation.diagnostics().is_empty(), "{:?}", compilation.diagnostics());
        assert_eq!(
            property_display(&compilation, "App.Commands.S", "P"),
            "App.Commands.Outer.Point"
        );
        assert_eq!(
            property_display(&compilation, "App.Commands.S", "D"),
            "System.IO.DirectoryInfo"
        );
    }

    #[test]
    fn inner_namespace_sees_parent_namespace_types() {
        let compilation = bind(
            "namespace App { struct Shared {} }\nnamespace App.Inner { class S { public Shared X { get; set; } } }",
        );
        assert_eq!(
            property_display(&compilation, "App.Inner.S", "X"),
            "App.Shared"
        );
    }

    #[test]
    fn attribute_suffix_and_arguments() {
        let compilation = bind(
            "using System.IO;\nusing Spectre.Console.Cli;\n\
             class S : CommandSettings {\n\
               [CommandArgument(template: \"<dir>\", position: 0, argumentType: typeof(DirectoryInfo))]\n\
               [CommandOption(\"--x\", optionType: null)]\n\
               public DirectoryInfo Dir { get; set; }\n\
             }",
        );
        assert!(compilation.diagnostics().is_empty(), "{:?}", compilation.diagnostics());
        let dir = property(&compilation, "S", "Dir");
        let argument = &dir.attributes[0];
        assert_eq!(
            compilation.display(argument.class.unwrap()),
            "Spectre.Console.Cli.CommandArgumentAttribute"
        );
        assert_eq!(argument.constructor_arguments.len(), 3);
        assert_eq!(argument.constructor_arguments[0], TypedConstant::Literal("0".into()));
        assert_eq!(
            argument.constructor_arguments[2],
            TypedConstant::Type(dir.ty)
        );
        let option = &dir.attributes[1];
        assert_eq!(option.constructor_arguments[1], TypedConstant::Literal("null".into()));
    }

    #[test]
    fn named_equals_arguments_are_named() {
        let compilation = bind(
            "using Spectre.Console.Cli;\nclass S : CommandSettings { \
             [CommandOption(\"-v\", IsHidden = true)] public int V { get; set; } }",
        );
        let v = property(&compilation, "S", "V");
        assert_eq!(v.attributes[0].constructor_arguments.len(), 1);
        assert_eq!(
            v.attributes[0].named_argument("IsHidden"),
            Some(&TypedConstant::Literal("true".into()))
        );
    }

    #[test]
    fn unresolved_names_are_reported_and_become_error_types() {
        let compilation = bind(
            "class S { [Missing] public Nope P { get; set; } public Nope[] Q { get; set; } }",
        );
        let ids: Vec<_> = compilation.diagnostics().iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec![UNRESOLVED_TYPE, UNRESOLVED_ATTRIBUTE, UNRESOLVED_TYPE]);
        let p = property(&compilation, "S", "P");
        assert_eq!(compilation.kind(p.ty), TypeKind::Error);
        assert_eq!(p.attributes[0].class, None);
        let q = property(&compilation, "S", "Q");
        assert_eq!(compilation.kind(q.ty), TypeKind::Error);
    }

    #[test]
    fn unresolved_typeof_is_unknown_constant() {
        let compilation = bind(
            "using Spectre.Console.Cli;\nclass S : CommandSettings { \
             [CommandOption(\"-v\", typeof(Nope))] public int V { get; set; } }",
        );
        let v = property(&compilation, "S", "V");
        assert_eq!(v.attributes[0].constructor_arguments[1], TypedConstant::Unknown);
    }

    #[test]
    fn generic_source_types_substitute_members() {
        let compilation = bind(
            "using System.Collections.Generic;\n\
             class Bag<T> : Dictionary<string, T> {}\n\
             class S { public Bag<int> B { get; set; } }",
        );
        let b = property(&compilation, "S", "B").ty;
        let base = compilation.base_type(b).unwrap();
        assert_eq!(
            compilation.display(base),
            "System.Collections.Generic.Dictionary<string, int>"
        );
        let interfaces: Vec<_> = compilation
            .all_interfaces(b)
            .iter()
            .map(|i| compilation.display(*i))
            .collect();
        assert_eq!(
            interfaces[0],
            "System.Collections.Generic.IDictionary<string, int>"
        );
    }

    #[test]
    fn constructors_are_bound() {
        let compilation = bind(
            "class A { public A(string value) {} static A() {} }\nclass B {}\nrecord R(string Name);\nstruct P { public P(int x) {} }",
        );
        let shapes = |name: &str| -> Vec<usize> {
            let ty = compilation.source_type(name).unwrap();
            compilation
                .constructors(ty)
                .iter()
                .map(|c| c.parameters.len())
                .collect()
        };
        assert_eq!(shapes("A"), vec![1]);
        assert_eq!(shapes("B"), vec![0]);
        assert_eq!(shapes("R"), vec![1]);
        assert_eq!(shapes("P"), vec![1, 0]);
    }

    #[test]
    fn partial_classes_merge() {
        let compilation = bind(
            "partial class S { public int A { get; set; } }\npartial class S { public int B { get; set; } }",
        );
        assert_eq!(compilation.named_types().len(), 1);
        let s = compilation.source_type("S").unwrap();
        assert_eq!(compilation.properties(s).len(), 2);
    }

    #[test]
    fn type_parameters_resolve_inside_generic_types() {
        let compilation = bind("class Box<T> { public T Value { get; set; } }");
        let value = property(&compilation, "Box<T>", "Value");
        assert_eq!(compilation.kind(value.ty), TypeKind::TypeParameter);
        assert!(compilation.diagnostics().is_empty());
    }

    #[test]
    fn named_types_are_in_source_order() {
        let compilation = bind("class A { class B {} }\nnamespace N { class C {} }");
        let names: Vec<_> = compilation
            .named_types()
            .iter()
            .map(|t| compilation.display(*t))
            .collect();
        assert_eq!(names, vec!["A", "A.B", "N.C"]);
    }

    #[test]
    fn tuples_bind_to_error_silently() {
        let compilation = bind("class S { public (int, string) P { get; set; } }");
        assert!(compilation.diagnostics().is_empty());
        assert_eq!(compilation.kind(property(&compilation, "S", "P").ty), TypeKind::Error);
    }
}

// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Type declarations, members, attributes and type syntax.
//!
//! This module contains the declaration-level parsing methods for the
//! [`Parser`]. Member bodies are never parsed, only skipped.

use ecow::{EcoString, eco_format};

use super::Parser;
use crate::ast::{
    ArgumentName, ArgumentNameKind, Attribute, AttributeArgument, AttributeArgumentList,
    AttributeList, ConstructorDeclaration, Expression, Identifier, LiteralKind, MemberDeclaration,
    NameSegment, Parameter, PropertyDeclaration, QualifiedName, TypeDeclaration,
    TypeDeclarationKind, TypeSyntax,
};
use crate::source_analysis::{ParseError, ParseErrorKind, Span, TokenKind};

/// Words that may precede a type or member declaration.
const MODIFIERS: &[&str] = &[
    "public",
    "private",
    "protected",
    "internal",
    "file",
    "static",
    "sealed",
    "abstract",
    "virtual",
    "override",
    "readonly",
    "partial",
    "new",
    "extern",
    "unsafe",
    "volatile",
    "async",
    "required",
    "const",
    "fixed",
    "ref",
];

/// Words that may precede a parameter.
const PARAMETER_MODIFIERS: &[&str] = &["this", "ref", "out", "in", "params", "scoped", "readonly"];

fn is_modifier(kind: &TokenKind) -> bool {
    kind.as_identifier().is_some_and(|w| MODIFIERS.contains(&w))
}

impl Parser {
    // ========================================================================
    // Type Declarations
    // ========================================================================

    /// Returns true if attribute lists and modifiers at the cursor are
    /// followed by a type declaration keyword.
    pub(super) fn at_type_declaration(&self) -> bool {
        let mut offset = 0;
        while matches!(self.peek_at(offset), TokenKind::LeftBracket) {
            offset = self.offset_after_group(offset);
        }
        while is_modifier(self.peek_at(offset)) {
            offset += 1;
        }
        self.is_type_keyword_at(offset)
    }

    /// Offset of the first token after the bracket group starting at `offset`.
    fn offset_after_group(&self, mut offset: usize) -> usize {
        let mut depth = 0usize;
        loop {
            match self.peek_at(offset) {
                TokenKind::LeftParen | TokenKind::LeftBracket | TokenKind::LeftBrace => depth += 1,
                TokenKind::RightParen | TokenKind::RightBracket | TokenKind::RightBrace => {
                    depth = depth.saturating_sub(1);
                }
                TokenKind::Eof => return offset,
                _ => {}
            }
            offset += 1;
            if depth == 0 {
                return offset;
            }
        }
    }

    fn is_type_keyword_at(&self, offset: usize) -> bool {
        let kind = self.peek_at(offset);
        match kind.as_identifier() {
            Some("class" | "struct" | "interface" | "enum") => true,
            Some("record") => self.peek_at(offset + 1).as_identifier().is_some(),
            _ => false,
        }
    }

    /// Parses a complete type declaration including attributes and modifiers.
    pub(super) fn parse_type_declaration(&mut self) -> Option<TypeDeclaration> {
        let start = self.current_span();
        let attributes = self.parse_attribute_lists();
        let modifiers = self.parse_modifiers();
        self.finish_type_declaration(start, attributes, modifiers)
    }

    fn finish_type_declaration(
        &mut self,
        start: Span,
        attributes: Vec<AttributeList>,
        modifiers: Vec<Identifier>,
    ) -> Option<TypeDeclaration> {
        if !self.enter_nesting() {
            self.recover_member();
            return None;
        }
        let declaration = self.parse_type_declaration_body(start, attributes, modifiers);
        self.leave_nesting();
        declaration
    }

    fn parse_type_declaration_body(
        &mut self,
        start: Span,
        attributes: Vec<AttributeList>,
        modifiers: Vec<Identifier>,
    ) -> Option<TypeDeclaration> {
        let kind = if self.eat_word("class").is_some() {
            TypeDeclarationKind::Class
        } else if self.eat_word("struct").is_some() {
            TypeDeclarationKind::Struct
        } else if self.eat_word("interface").is_some() {
            TypeDeclarationKind::Interface
        } else if self.eat_word("enum").is_some() {
            TypeDeclarationKind::Enum
        } else if self.eat_word("record").is_some() {
            if self.eat_word("struct").is_some() {
                TypeDeclarationKind::RecordStruct
            } else {
                self.eat_word("class");
                TypeDeclarationKind::Record
            }
        } else {
            self.error_expected("a type declaration");
            self.recover_member();
            return None;
        };

        let Some(name) = self.parse_identifier("a type name") else {
            self.recover_member();
            return None;
        };
        let type_parameters = self.parse_type_parameter_list();
        let primary_parameters = self
            .check(&TokenKind::LeftParen)
            .then(|| self.parse_parameter_list());
        let base_list = if self.eat(&TokenKind::Colon).is_some() {
            self.parse_base_list()
        } else {
            Vec::new()
        };
        self.skip_constraint_clauses();

        let members = if let Some(open) = self.eat(&TokenKind::LeftBrace) {
            let members = if kind == TypeDeclarationKind::Enum {
                self.skip_enum_members();
                Vec::new()
            } else {
                self.parse_type_members(&name.name)
            };
            if self.eat(&TokenKind::RightBrace).is_none() {
                self.errors
                    .push(ParseError::new(ParseErrorKind::Unclosed('{'), open));
            }
            members
        } else if self.check(&TokenKind::Semicolon) {
            Vec::new()
        } else {
            self.error_expected("`{`");
            self.recover_member();
            Vec::new()
        };
        self.eat(&TokenKind::Semicolon);

        Some(TypeDeclaration {
            attributes,
            modifiers,
            kind,
            name,
            type_parameters,
            primary_parameters,
            base_list,
            members,
            span: self.span_from(start),
        })
    }

    fn parse_modifiers(&mut self) -> Vec<Identifier> {
        let mut modifiers = Vec::new();
        while is_modifier(self.current_kind()) {
            if let Some(modifier) = self.parse_identifier("a modifier") {
                modifiers.push(modifier);
            }
        }
        modifiers
    }

    /// `<T, in U, out V>` after a type name.
    fn parse_type_parameter_list(&mut self) -> Vec<Identifier> {
        let mut parameters = Vec::new();
        if self.eat(&TokenKind::Less).is_none() {
            return parameters;
        }
        loop {
            self.parse_attribute_lists();
            if self.check_word("in") || self.check_word("out") {
                self.advance();
            }
            match self.parse_identifier("a type parameter name") {
                Some(parameter) => parameters.push(parameter),
                None => break,
            }
            if self.eat(&TokenKind::Comma).is_none() {
                break;
            }
        }
        if self.expect(&TokenKind::Greater, "`>`").is_none() {
            while !self.is_at_end()
                && !matches!(
                    self.current_kind(),
                    TokenKind::Greater | TokenKind::LeftBrace | TokenKind::Semicolon
                )
            {
                self.advance();
            }
            self.eat(&TokenKind::Greater);
        }
        parameters
    }

    fn parse_base_list(&mut self) -> Vec<TypeSyntax> {
        let mut bases = Vec::new();
        loop {
            bases.push(self.parse_type());
            // `record R(int X) : Base(X)`
            if self.check(&TokenKind::LeftParen) {
                self.skip_group();
            }
            if self.eat(&TokenKind::Comma).is_none() {
                break;
            }
        }
        bases
    }

    fn skip_constraint_clauses(&mut self) {
        while self.check_word("where") {
            self.advance();
            while !self.is_at_end()
                && !self.check_word("where")
                && !matches!(
                    self.current_kind(),
                    TokenKind::LeftBrace | TokenKind::Semicolon | TokenKind::FatArrow
                )
            {
                if self.check(&TokenKind::LeftParen) {
                    self.skip_group();
                } else {
                    self.advance();
                }
            }
        }
    }

    fn skip_enum_members(&mut self) {
        while !self.is_at_end() && !self.check(&TokenKind::RightBrace) {
            if self.at_group_open() {
                self.skip_group();
            } else {
                self.advance();
            }
        }
    }

    // ========================================================================
    // Members
    // ========================================================================

    fn parse_type_members(&mut self, type_name: &str) -> Vec<MemberDeclaration> {
        let mut members = Vec::new();
        while !self.is_at_end() && !self.check(&TokenKind::RightBrace) {
            if self.eat(&TokenKind::Semicolon).is_some() {
                continue;
            }
            let before = self.current_span();
            if let Some(member) = self.parse_member(type_name) {
                members.push(member);
            }
            if self.current_span() == before && !self.is_at_end() {
                self.advance();
            }
        }
        members
    }

    fn parse_member(&mut self, type_name: &str) -> Option<MemberDeclaration> {
        let start = self.current_span();
        let attributes = self.parse_attribute_lists();
        let modifiers = self.parse_modifiers();

        if self.is_type_keyword_at(0) {
            return self
                .finish_type_declaration(start, attributes, modifiers)
                .map(MemberDeclaration::NestedType);
        }

        if self.check_word("event")
            || self.check_word("delegate")
            || matches!(self.current_kind(), TokenKind::Operator('~'))
        {
            self.skip_body();
            return Some(MemberDeclaration::Other(self.span_from(start)));
        }

        if self.check_word(type_name) && matches!(self.peek_at(1), TokenKind::LeftParen) {
            return Some(MemberDeclaration::Constructor(
                self.parse_constructor(start, modifiers, type_name),
            ));
        }

        let ty = self.parse_type();
        if matches!(ty, TypeSyntax::Unsupported(span) if span.is_empty()) {
            self.recover_member();
            return Some(MemberDeclaration::Other(self.span_from(start)));
        }

        if self.check_word("operator") || self.check_word("this") {
            self.skip_body();
            return Some(MemberDeclaration::Other(self.span_from(start)));
        }
        if matches!(ty.simple_name(), Some("implicit" | "explicit")) {
            self.skip_body();
            return Some(MemberDeclaration::Other(self.span_from(start)));
        }

        let Some(name) = self.parse_member_name() else {
            self.recover_member();
            return Some(MemberDeclaration::Other(self.span_from(start)));
        };

        match self.current_kind() {
            TokenKind::LeftBrace => {
                self.skip_group();
                if self.eat(&TokenKind::Equals).is_some() {
                    self.skip_through_semicolon();
                }
            }
            TokenKind::FatArrow => self.skip_through_semicolon(),
            TokenKind::LeftParen | TokenKind::Less => {
                self.skip_body();
                return Some(MemberDeclaration::Other(self.span_from(start)));
            }
            TokenKind::Equals | TokenKind::Semicolon | TokenKind::Comma => {
                self.skip_through_semicolon();
                return Some(MemberDeclaration::Other(self.span_from(start)));
            }
            _ => {
                self.error_expected("`{`, `(`, `;` or `=`");
                self.recover_member();
                return Some(MemberDeclaration::Other(self.span_from(start)));
            }
        }

        Some(MemberDeclaration::Property(PropertyDeclaration {
            attributes,
            modifiers,
            ty,
            name,
            span: self.span_from(start),
        }))
    }

    /// A member name, including explicit interface qualification
    /// (`IOptions.Name`); the last segment is returned.
    fn parse_member_name(&mut self) -> Option<Identifier> {
        let mut name = self.parse_identifier("a member name")?;
        if self.check(&TokenKind::Less) && matches!(self.peek_at(2), TokenKind::Greater) {
            // `IFoo<T>.Bar` or a generic method name.
            if matches!(self.peek_at(3), TokenKind::Dot) {
                self.advance();
                self.advance();
                self.advance();
            }
        }
        while self.check(&TokenKind::Dot) && self.peek_at(1).as_identifier().is_some() {
            self.advance();
            name = self.parse_identifier("a member name")?;
        }
        Some(name)
    }

    fn parse_constructor(
        &mut self,
        start: Span,
        modifiers: Vec<Identifier>,
        type_name: &str,
    ) -> ConstructorDeclaration {
        let name = self
            .parse_identifier("a constructor name")
            .unwrap_or_else(|| Identifier::new(type_name, start));
        let parameters = self.parse_parameter_list();
        self.skip_body();
        ConstructorDeclaration {
            modifiers,
            name,
            parameters,
            span: self.span_from(start),
        }
    }

    /// Skips the rest of a member: initializers, parameter lists and a
    /// block body, an expression body or a terminating `;`.
    fn skip_body(&mut self) {
        while !self.is_at_end() {
            match self.current_kind() {
                TokenKind::LeftBrace => {
                    self.skip_group();
                    return;
                }
                TokenKind::FatArrow => {
                    self.skip_through_semicolon();
                    return;
                }
                TokenKind::Semicolon => {
                    self.advance();
                    return;
                }
                TokenKind::RightBrace => return,
                TokenKind::LeftParen | TokenKind::LeftBracket => self.skip_group(),
                _ => {
                    self.advance();
                }
            }
        }
    }

    // ========================================================================
    // Parameters
    // ========================================================================

    /// `( [attrs] [modifiers] Type name [= default], ... )`
    pub(super) fn parse_parameter_list(&mut self) -> Vec<Parameter> {
        let mut parameters = Vec::new();
        if self.expect(&TokenKind::LeftParen, "`(`").is_none() {
            return parameters;
        }
        if self.eat(&TokenKind::RightParen).is_some() {
            return parameters;
        }

        loop {
            let start = self.current_span();
            self.parse_attribute_lists();
            let mut modifiers = Vec::new();
            while self
                .current_kind()
                .as_identifier()
                .is_some_and(|w| PARAMETER_MODIFIERS.contains(&w))
            {
                if let Some(modifier) = self.parse_identifier("a parameter modifier") {
                    modifiers.push(modifier);
                }
            }
            let ty = self.parse_type();
            match self.parse_identifier("a parameter name") {
                Some(name) => {
                    let has_default = self.eat(&TokenKind::Equals).is_some();
                    if has_default {
                        self.skip_argument();
                    }
                    parameters.push(Parameter {
                        modifiers,
                        ty,
                        name,
                        has_default,
                        span: self.span_from(start),
                    });
                }
                None => self.skip_argument(),
            }

            if self.eat(&TokenKind::Comma).is_some() {
                continue;
            }
            if self.expect(&TokenKind::RightParen, "`)`").is_none() {
                self.skip_argument();
                self.eat(&TokenKind::RightParen);
            }
            return parameters;
        }
    }

    /// Skips to the next `,` or `)` at this nesting level without consuming it.
    fn skip_argument(&mut self) {
        while !self.at_argument_end()
            && !matches!(
                self.current_kind(),
                TokenKind::Semicolon | TokenKind::LeftBrace | TokenKind::RightBrace
            )
        {
            if self.at_group_open() {
                self.skip_group();
            } else {
                self.advance();
            }
        }
    }

    fn at_argument_end(&self) -> bool {
        matches!(
            self.current_kind(),
            TokenKind::Comma | TokenKind::RightParen | TokenKind::RightBracket | TokenKind::Eof
        )
    }

    // ========================================================================
    // Attributes
    // ========================================================================

    /// Parses consecutive `[...]` attribute lists.
    pub(super) fn parse_attribute_lists(&mut self) -> Vec<AttributeList> {
        let mut lists = Vec::new();
        while self.check(&TokenKind::LeftBracket) {
            lists.push(self.parse_attribute_list());
        }
        lists
    }

    fn parse_attribute_list(&mut self) -> AttributeList {
        let start = self.advance();
        let target = if self.current_kind().as_identifier().is_some()
            && matches!(self.peek_at(1), TokenKind::Colon)
        {
            let target = self.parse_identifier("an attribute target");
            self.advance();
            target
        } else {
            None
        };

        let mut attributes = Vec::new();
        while !self.check(&TokenKind::RightBracket) && !self.is_at_end() {
            let Some(attribute) = self.parse_attribute() else {
                break;
            };
            attributes.push(attribute);
            if self.eat(&TokenKind::Comma).is_none() {
                break;
            }
        }

        if self.expect(&TokenKind::RightBracket, "`]`").is_none() {
            while !self.is_at_end()
                && !matches!(
                    self.current_kind(),
                    TokenKind::RightBracket | TokenKind::LeftBrace | TokenKind::Semicolon
                )
            {
                if self.check(&TokenKind::LeftParen) {
                    self.skip_group();
                } else {
                    self.advance();
                }
            }
            self.eat(&TokenKind::RightBracket);
        }

        AttributeList {
            target,
            attributes,
            span: self.span_from(start),
        }
    }

    fn parse_attribute(&mut self) -> Option<Attribute> {
        let start = self.current_span();
        if self.current_kind().as_identifier().is_none() {
            self.error_expected("an attribute name");
            return None;
        }
        let name = TypeSyntax::Name(self.parse_qualified_name());
        let arguments = self
            .check(&TokenKind::LeftParen)
            .then(|| self.parse_attribute_arguments());
        Some(Attribute {
            name,
            arguments,
            span: self.span_from(start),
        })
    }

    fn parse_attribute_arguments(&mut self) -> AttributeArgumentList {
        let open = self.advance();
        let mut arguments = Vec::new();

        while !self.check(&TokenKind::RightParen) && !self.is_at_end() {
            let start = self.current_span();
            let name = self.parse_argument_name();
            let expression = self.parse_attribute_expression();
            arguments.push(AttributeArgument {
                name,
                expression,
                span: self.span_from(start),
            });
            if self.eat(&TokenKind::Comma).is_none() {
                break;
            }
        }

        let close = match self.expect(&TokenKind::RightParen, "`)`") {
            Some(close) => close,
            None => Span::at(self.previous_end()),
        };
        AttributeArgumentList {
            open,
            close,
            arguments,
        }
    }

    fn parse_argument_name(&mut self) -> Option<ArgumentName> {
        self.current_kind().as_identifier()?;
        let kind = match self.peek_at(1) {
            TokenKind::Colon => ArgumentNameKind::Colon,
            TokenKind::Equals => ArgumentNameKind::Equals,
            _ => return None,
        };
        let name = self.parse_identifier("an argument name")?;
        self.advance();
        Some(ArgumentName { name, kind })
    }

    /// `typeof(T)`, a single literal, or an opaque expression.
    fn parse_attribute_expression(&mut self) -> Expression {
        let start = self.current_span();

        if self.check_word("typeof") && matches!(self.peek_at(1), TokenKind::LeftParen) {
            self.advance();
            self.advance();
            let ty = self.parse_type();
            if self.expect(&TokenKind::RightParen, "`)`").is_some() && self.at_argument_end() {
                return Expression::TypeOf {
                    ty,
                    span: self.span_from(start),
                };
            }
            self.skip_argument();
            return Expression::Other(self.span_from(start));
        }

        if let Some((kind, text)) = self.literal_at_cursor() {
            let tokens = if text.starts_with('-') { 2 } else { 1 };
            for _ in 0..tokens {
                self.advance();
            }
            if self.at_argument_end() {
                return Expression::Literal {
                    kind,
                    text,
                    span: self.span_from(start),
                };
            }
        }

        if self.at_argument_end() && self.current_span() == start {
            self.error_expected("an expression");
            return Expression::Other(Span::at(start.start()));
        }
        self.skip_argument();
        Expression::Other(self.span_from(start))
    }

    fn literal_at_cursor(&self) -> Option<(LiteralKind, EcoString)> {
        let literal = |kind: &TokenKind| match kind {
            TokenKind::Integer(text) => Some((LiteralKind::Integer, text.clone())),
            TokenKind::Real(text) => Some((LiteralKind::Real, text.clone())),
            TokenKind::String(text) => Some((LiteralKind::String, text.clone())),
            TokenKind::Char(text) => Some((LiteralKind::Char, text.clone())),
            TokenKind::Identifier(word) if word == "true" || word == "false" => {
                Some((LiteralKind::Boolean, word.clone()))
            }
            TokenKind::Identifier(word) if word == "null" => Some((LiteralKind::Null, word.clone())),
            _ => None,
        };

        if matches!(self.current_kind(), TokenKind::Operator('-')) {
            return match literal(self.peek_at(1))? {
                (kind @ (LiteralKind::Integer | LiteralKind::Real), text) => {
                    Some((kind, eco_format!("-{text}")))
                }
                _ => None,
            };
        }
        literal(self.current_kind())
    }

    // ========================================================================
    // Types
    // ========================================================================

    /// Parses a type. Reports an error and returns an empty
    /// [`TypeSyntax::Unsupported`] without consuming input if no type starts here.
    pub(super) fn parse_type(&mut self) -> TypeSyntax {
        let start = self.current_span();
        if !self.enter_nesting() {
            self.skip_argument();
            return TypeSyntax::Unsupported(self.span_from(start));
        }
        let ty = self.parse_type_inner(start);
        self.leave_nesting();
        ty
    }

    fn parse_type_inner(&mut self, start: Span) -> TypeSyntax {
        let mut ty = if self.check(&TokenKind::LeftParen) {
            self.skip_group();
            TypeSyntax::Unsupported(self.span_from(start))
        } else if self.current_kind().as_identifier().is_some() {
            TypeSyntax::Name(self.parse_qualified_name())
        } else {
            self.error_expected("a type");
            return TypeSyntax::Unsupported(Span::at(start.start()));
        };

        loop {
            if self.eat(&TokenKind::Question).is_some() {
                ty = TypeSyntax::Nullable {
                    inner: Box::new(ty),
                    span: self.span_from(start),
                };
            } else if self.check(&TokenKind::LeftBracket)
                && matches!(self.peek_at(1), TokenKind::RightBracket | TokenKind::Comma)
            {
                self.advance();
                let mut rank: u8 = 1;
                while self.eat(&TokenKind::Comma).is_some() {
                    rank = rank.saturating_add(1);
                }
                self.expect(&TokenKind::RightBracket, "`]`");
                ty = TypeSyntax::Array {
                    element: Box::new(ty),
                    rank,
                    span: self.span_from(start),
                };
            } else if matches!(self.current_kind(), TokenKind::Operator('*')) {
                self.advance();
                ty = TypeSyntax::Unsupported(self.span_from(start));
            } else {
                return ty;
            }
        }
    }

    /// `global::A.B<C>.D`; an `Alias::Name` qualifier is kept as a segment.
    pub(super) fn parse_qualified_name(&mut self) -> QualifiedName {
        let start = self.current_span();
        let global = self.check_word("global") && matches!(self.peek_at(1), TokenKind::ColonColon);
        if global {
            self.advance();
            self.advance();
        }

        let mut segments = Vec::new();
        while let Some(name) = self.parse_identifier("a type name") {
            let type_arguments = if self.check(&TokenKind::Less) {
                self.parse_type_argument_list()
            } else {
                Vec::new()
            };
            segments.push(NameSegment {
                name,
                type_arguments,
            });
            let separator = matches!(self.current_kind(), TokenKind::Dot | TokenKind::ColonColon);
            if separator && self.peek_at(1).as_identifier().is_some() {
                self.advance();
            } else {
                break;
            }
        }

        QualifiedName {
            global,
            segments,
            span: self.span_from(start),
        }
    }

    /// `<A, B>`, or `<,>` for an unbound generic.
    fn parse_type_argument_list(&mut self) -> Vec<TypeSyntax> {
        let open = self.advance();
        let mut arguments = Vec::new();

        if matches!(self.current_kind(), TokenKind::Comma | TokenKind::Greater) {
            arguments.push(TypeSyntax::Unsupported(Span::at(open.end())));
            while let Some(comma) = self.eat(&TokenKind::Comma) {
                arguments.push(TypeSyntax::Unsupported(Span::at(comma.end())));
            }
        } else {
            loop {
                arguments.push(self.parse_type());
                if self.eat(&TokenKind::Comma).is_none() {
                    break;
                }
            }
        }

        if self.expect(&TokenKind::Greater, "`>`").is_none() {
            self.errors
                .push(ParseError::new(ParseErrorKind::Unclosed('<'), open));
        }
        arguments
    }

    /// Consumes an identifier, or reports that `what` was expected.
    pub(super) fn parse_identifier(&mut self, what: &str) -> Option<Identifier> {
        if let TokenKind::Identifier(name) = self.current_kind() {
            let name = name.clone();
            let span = self.advance();
            Some(Identifier::new(name, span))
        } else {
            self.error_expected(what);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{
        ArgumentNameKind, CompilationUnit, Expression, LiteralKind, MemberDeclaration,
        PropertyDeclaration, TypeDeclaration, TypeSyntax,
    };
    use crate::source_analysis::{lex_with_eof, parse};

    fn parse_ok(source: &str) -> CompilationUnit {
        let (unit, errors) = parse(lex_with_eof(source));
        assert!(errors.is_empty(), "unexpected errors for {source:?}: {errors:?}");
        unit
    }

    fn first_type(unit: &CompilationUnit) -> &TypeDeclaration {
        unit.type_declarations().next().unwrap()
    }

    fn properties(ty: &TypeDeclaration) -> Vec<&PropertyDeclaration> {
        ty.members
            .iter()
            .filter_map(|m| match m {
                MemberDeclaration::Property(p) => Some(p),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn parse_settings_class() {
        let source = r#"
sealed class Settings : CommandSettings
{
    [CommandOption("-p|--project <PROJECTPATH>")]
    public DirectoryInfo ProjectPath { get; set; }
}
"#;
        let unit = parse_ok(source);
        let class = first_type(&unit);
        assert_eq!(class.name.name, "Settings");
        assert_eq!(class.base_list[0].simple_name(), Some("CommandSettings"));
        assert_eq!(class.modifiers[0].name, "sealed");

        let props = properties(class);
        assert_eq!(props.len(), 1);
        assert_eq!(props[0].name.name, "ProjectPath");
        assert_eq!(props[0].ty.simple_name(), Some("DirectoryInfo"));
        let attribute = &props[0].attributes[0].attributes[0];
        assert_eq!(attribute.simple_name(), "CommandOption");
        let args = attribute.arguments.as_ref().unwrap();
        assert_eq!(args.arguments.len(), 1);
        assert!(matches!(
            args.arguments[0].expression,
            Expression::Literal {
                kind: LiteralKind::String,
                ..
            }
        ));
    }

    #[test]
    fn parse_attribute_argument_names() {
        let unit = parse_ok(
            r#"class S { [CommandOption(optionType: typeof(FileInfo), template: "-p", IsHidden = true)] public FileInfo F { get; set; } }"#,
        );
        let props = properties(first_type(&unit));
        let args = &props[0].attributes[0].attributes[0]
            .arguments
            .as_ref()
            .unwrap()
            .arguments;
        assert_eq!(args.len(), 3);
        let first = args[0].name.as_ref().unwrap();
        assert_eq!(first.name.name, "optionType");
        assert_eq!(first.kind, ArgumentNameKind::Colon);
        assert!(args[0].expression.is_type_of());
        assert_eq!(args[2].name.as_ref().unwrap().kind, ArgumentNameKind::Equals);
        assert!(matches!(
            args[2].expression,
            Expression::Literal {
                kind: LiteralKind::Boolean,
                ..
            }
        ));
    }

    #[test]
    fn parse_opaque_attribute_expressions() {
        let unit = parse_ok(
            r#"class S { [CommandArgument(Position + 1, nameof(X), -3, Flags.A | Flags.B)] public int X { get; set; } }"#,
        );
        let props = properties(first_type(&unit));
        let args = &props[0].attributes[0].attributes[0]
            .arguments
            .as_ref()
            .unwrap()
            .arguments;
        assert_eq!(args.len(), 4);
        assert!(matches!(args[0].expression, Expression::Other(_)));
        assert!(matches!(args[1].expression, Expression::Other(_)));
        assert!(matches!(
            &args[2].expression,
            Expression::Literal { kind: LiteralKind::Integer, text, .. } if text == "-3"
        ));
        assert!(matches!(args[3].expression, Expression::Other(_)));
    }

    #[test]
    fn parse_attribute_without_arguments_and_multiple_lists() {
        let unit = parse_ok(
            "class S { [Description(\"d\")][property: CommandOption] [A, B()] public Uri Endpoint { get; init; } = null!; }",
        );
        let props = properties(first_type(&unit));
        let property = props[0];
        assert_eq!(property.attributes.len(), 3);
        assert_eq!(
            property.attributes[1].target.as_ref().map(|t| t.name.as_str()),
            Some("property")
        );
        let option = &property.attributes[1].attributes[0];
        assert!(option.arguments.is_none());
        let b = &property.attributes[2].attributes[1];
        assert!(b.arguments.as_ref().unwrap().arguments.is_empty());
        assert_eq!(property.all_attributes().count(), 4);
    }

    #[test]
    fn parse_type_shapes() {
        let unit = parse_ok(
            "class S { public global::System.Collections.Generic.Dictionary<string, List<int?>>? Map { get; set; } public MyStruct[,][] Grid { get; set; } }",
        );
        let props = properties(first_type(&unit));
        let TypeSyntax::Nullable { inner, .. } = &props[0].ty else {
            panic!("expected nullable, got {:?}", props[0].ty);
        };
        let TypeSyntax::Name(name) = inner.as_ref() else {
            panic!("expected name");
        };
        assert!(name.global);
        assert_eq!(name.segments.len(), 4);
        assert_eq!(name.segments[3].type_arguments.len(), 2);

        let TypeSyntax::Array { element, rank, .. } = &props[1].ty else {
            panic!("expected array");
        };
        assert_eq!(*rank, 1);
        assert!(matches!(element.as_ref(), TypeSyntax::Array { rank: 2, .. }));
    }

    #[test]
    fn parse_members_are_classified() {
        let unit = parse_ok(
            r#"
public class Settings : CommandSettings, IValidatable
{
    private readonly int _count = 3, _other;
    public const string Name = "x";
    public event EventHandler Changed;
    public Settings() : base() { }
    public Settings(string value) => _value = value;
    static Settings() { }
    public override ValidationResult Validate() { return ValidationResult.Success(); }
    public T Get<T>() where T : new() => new T();
    public int this[int index] => index;
    public static implicit operator string(Settings s) => s.ToString();
    public string Computed => $"{Name}!";
    int IValidatable.Order { get; }
    ~Settings() { }
    public enum Mode { A = 1, B }
    public record Nested(int X);
}
"#,
        );
        let class = first_type(&unit);
        let kinds: Vec<&str> = class
            .members
            .iter()
            .map(|m| match m {
                MemberDeclaration::Property(_) => "property",
                MemberDeclaration::Constructor(_) => "ctor",
                MemberDeclaration::NestedType(_) => "type",
                MemberDeclaration::Other(_) => "other",
            })
            .collect();
        assert_eq!(
            kinds,
            [
                "other", "other", "other", "ctor", "ctor", "ctor", "other", "other", "other",
                "other", "property", "property", "other", "type", "type"
            ]
        );
        let MemberDeclaration::Constructor(ctor) = &class.members[4] else {
            panic!("expected constructor");
        };
        assert_eq!(ctor.parameters.len(), 1);
        assert_eq!(ctor.parameters[0].name.name, "value");
        let MemberDeclaration::Constructor(cctor) = &class.members[5] else {
            panic!("expected constructor");
        };
        assert!(cctor.is_static());
        let MemberDeclaration::Property(explicit) = &class.members[11] else {
            panic!("expected property");
        };
        assert_eq!(explicit.name.name, "Order");
    }

    #[test]
    fn parse_generic_type_declaration() {
        let unit = parse_ok(
            "public sealed class Lookup<TKey, out TElement> : ILookup<TKey, TElement> where TKey : notnull { public Lookup(string text) { } }",
        );
        let ty = first_type(&unit);
        assert_eq!(ty.type_parameters.len(), 2);
        assert_eq!(ty.base_list.len(), 1);
    }

    #[test]
    fn deeply_nested_generics_do_not_overflow() {
        let mut source = String::from("class S { public ");
        for _ in 0..200 {
            source.push_str("A<");
        }
        source.push_str("int");
        for _ in 0..200 {
            source.push('>');
        }
        source.push_str(" X { get; } }");
        let (unit, errors) = parse(lex_with_eof(&source));
        assert!(!errors.is_empty());
        assert_eq!(unit.type_declarations().count(), 1);
    }
}

// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Recursive descent parser for declaration source files.
//!
//! The parser builds a [`CompilationUnit`] from a token stream. It only
//! models declarations: executable code (method bodies, accessor bodies,
//! initializers, top-level statements) is skipped as balanced token groups.
//!
//! # Design Philosophy
//!
//! - **Error recovery is mandatory** - the parser always produces a tree
//! - **Multiple errors** - every error is reported, not just the first
//! - **Synchronization points** - recovery happens at member and declaration
//!   boundaries: the next `;` or the end of a balanced `{ ... }` group
//!
//! # Usage
//!
//! ```
//! use cliguard_core::source_analysis::{lex_with_eof, parse};
//!
//! let (unit, errors) = parse(lex_with_eof("namespace App; class Settings {}"));
//! assert!(errors.is_empty());
//! assert_eq!(unit.type_declarations().count(), 1);
//! ```

use crate::ast::{CompilationUnit, NamespaceDeclaration, NamespaceMember, UsingDirective, UsingKind};
use crate::source_analysis::{ParseError, ParseErrorKind, Span, Token, TokenKind};

mod declarations;


/// Maximum nesting depth of types, generic arguments and namespaces.
///
/// Guards the recursive parts of the parser against stack overflow on
/// adversarial input such as `A<A<A<...>>>`.
const MAX_NESTING_DEPTH: usize = 64;

/// Parses a token stream into a compilation unit.
///
/// Always returns a tree, even if there are syntax errors.
#[must_use]
pub fn parse(tokens: Vec<Token>) -> (CompilationUnit, Vec<ParseError>) {
    let mut parser = Parser::new(tokens);
    let unit = parser.parse_compilation_unit();
    (unit, parser.errors)
}

/// The parser state.
pub(super) struct Parser {
    /// The tokens being parsed, always terminated by an EOF token.
    tokens: Vec<Token>,
    /// Current token index.
    current: usize,
    /// Accumulated syntax errors.
    pub(super) errors: Vec<ParseError>,
    /// Current nesting depth.
    depth: usize,
}

impl Parser {
    fn new(mut tokens: Vec<Token>) -> Self {
        if !tokens.last().is_some_and(|t| t.kind().is_eof()) {
            let end = tokens.last().map_or(0, |t| t.span().end());
            tokens.push(Token::new(TokenKind::Eof, Span::at(end)));
        }

        let errors = tokens
            .iter()
            .filter_map(|token| match token.kind() {
                TokenKind::Error(text) => {
                    let kind = if text.starts_with(['"', '\'', '@', '$']) {
                        ParseErrorKind::UnterminatedLiteral(text.clone())
                    } else {
                        ParseErrorKind::UnexpectedCharacter(text.clone())
                    };
                    Some(ParseError::new(kind, token.span()))
                }
                _ => None,
            })
            .collect();

        Self {
            tokens,
            current: 0,
            errors,
            depth: 0,
        }
    }

    // ========================================================================
    // Token Management
    // ========================================================================

    /// Returns the current token (the EOF token once the end is reached).
    pub(super) fn current_token(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.current.min(last)]
    }

    /// Returns the current token kind.
    pub(super) fn current_kind(&self) -> &TokenKind {
        self.current_token().kind()
    }

    /// Returns the current token's span.
    pub(super) fn current_span(&self) -> Span {
        self.current_token().span()
    }

    /// Peeks `offset` tokens ahead of the current one.
    pub(super) fn peek_at(&self, offset: usize) -> &TokenKind {
        let last = self.tokens.len() - 1;
        self.tokens[(self.current + offset).min(last)].kind()
    }

    /// Checks if we're at the end of input.
    pub(super) fn is_at_end(&self) -> bool {
        self.current_kind().is_eof()
    }

    /// Advances past the current token and returns its span.
    pub(super) fn advance(&mut self) -> Span {
        let span = self.current_span();
        if !self.is_at_end() {
            self.current += 1;
        }
        span
    }

    /// End offset of the most recently consumed token.
    pub(super) fn previous_end(&self) -> u32 {
        match self.current.checked_sub(1) {
            Some(index) => self.tokens[index].span().end(),
            None => self.current_span().start(),
        }
    }

    /// Span from the start of `start` to the end of the last consumed token.
    pub(super) fn span_from(&self, start: Span) -> Span {
        Span::new(start.start(), self.previous_end().max(start.start()))
    }

    /// Checks if the current token has the same kind as `kind`, ignoring payloads.
    pub(super) fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.current_kind()) == std::mem::discriminant(kind)
    }

    /// Checks if the current token is the identifier `word`.
    pub(super) fn check_word(&self, word: &str) -> bool {
        self.current_kind().is_word(word)
    }

    /// Consumes the current token if it matches `kind`.
    pub(super) fn eat(&mut self, kind: &TokenKind) -> Option<Span> {
        self.check(kind).then(|| self.advance())
    }

    /// Consumes the current token if it is the identifier `word`.
    pub(super) fn eat_word(&mut self, word: &str) -> Option<Span> {
        self.check_word(word).then(|| self.advance())
    }

    /// Consumes a token of `kind`, or reports that `what` was expected.
    pub(super) fn expect(&mut self, kind: &TokenKind, what: &str) -> Option<Span> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            self.error_expected(what);
            None
        }
    }

    // ========================================================================
    // Error Handling & Recovery
    // ========================================================================

    /// Reports that `what` was expected at the current token.
    pub(super) fn error_expected(&mut self, what: &str) {
        let found = self.current_kind().to_string();
        let span = self.current_span();
        self.errors.push(ParseError::expected(what, found, span));
    }

    /// Enters one nesting level, reporting an error if the limit is exceeded.
    pub(super) fn enter_nesting(&mut self) -> bool {
        if self.depth >= MAX_NESTING_DEPTH {
            let span = self.current_span();
            self.errors.push(ParseError::new(
                ParseErrorKind::NestingTooDeep(MAX_NESTING_DEPTH),
                span,
            ));
            return false;
        }
        self.depth += 1;
        true
    }

    /// Leaves one nesting level (pair with [`Parser::enter_nesting`]).
    pub(super) fn leave_nesting(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Consumes a balanced group starting at the current `(`, `[` or `{`.
    ///
    /// Nested groups of any bracket kind are skipped as a unit. Reports an
    /// error if the input ends before the group is closed.
    pub(super) fn skip_group(&mut self) {
        let mut stack: Vec<(char, Span)> = Vec::new();
        loop {
            let span = self.current_span();
            match self.current_kind() {
                TokenKind::LeftParen => stack.push((')', span)),
                TokenKind::LeftBracket => stack.push((']', span)),
                TokenKind::LeftBrace => stack.push(('}', span)),
                TokenKind::RightParen | TokenKind::RightBracket | TokenKind::RightBrace => {
                    stack.pop();
                }
                TokenKind::Eof => {
                    if let Some(&(closer, opener)) = stack.first() {
                        let open = match closer {
                            ')' => '(',
                            ']' => '[',
                            _ => '{',
                        };
                        self.errors
                            .push(ParseError::new(ParseErrorKind::Unclosed(open), opener));
                    }
                    return;
                }
                _ => {}
            }
            self.advance();
            if stack.is_empty() {
                return;
            }
        }
    }

    /// Returns `true` if the current token opens a bracketed group.
    pub(super) fn at_group_open(&self) -> bool {
        matches!(
            self.current_kind(),
            TokenKind::LeftParen | TokenKind::LeftBracket | TokenKind::LeftBrace
        )
    }

    /// Skips to and consumes the next `;`, stepping over balanced groups.
    /// Stops without consuming at a `}` that closes the enclosing block.
    pub(super) fn skip_through_semicolon(&mut self) {
        while !self.is_at_end() {
            if self.at_group_open() {
                self.skip_group();
                continue;
            }
            match self.current_kind() {
                TokenKind::Semicolon => {
                    self.advance();
                    return;
                }
                TokenKind::RightBrace => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Synchronizes after an error inside a type body: skips to the end of
    /// the current member, either a `;` or a balanced `{ ... }` block.
    pub(super) fn recover_member(&mut self) {
        while !self.is_at_end() {
            match self.current_kind() {
                TokenKind::Semicolon => {
                    self.advance();
                    return;
                }
                TokenKind::RightBrace => return,
                TokenKind::LeftBrace => {
                    self.skip_group();
                    self.eat(&TokenKind::Semicolon);
                    return;
                }
                TokenKind::LeftParen | TokenKind::LeftBracket => self.skip_group(),
                _ => {
                    self.advance();
                }
            }
        }
    }

    // ========================================================================
    // Compilation Unit
    // ========================================================================

    fn parse_compilation_unit(&mut self) -> CompilationUnit {
        let start = self.current_span();
        let (mut usings, mut members) = self.parse_namespace_body();

        while !self.is_at_end() {
            // A stray `}` left over after recovery.
            let span = self.advance();
            self.errors
                .push(ParseError::expected("a declaration", "}", span));
            let (more_usings, more_members) = self.parse_namespace_body();
            usings.extend(more_usings);
            members.extend(more_members);
        }

        CompilationUnit {
            usings,
            members,
            span: Span::new(start.start(), self.current_span().end()),
        }
    }

    /// Parses usings and members until a `}` or the end of file.
    fn parse_namespace_body(&mut self) -> (Vec<UsingDirective>, Vec<NamespaceMember>) {
        let mut usings = Vec::new();
        let mut members = Vec::new();

        loop {
            if self.is_at_end() || self.check(&TokenKind::RightBrace) {
                break;
            }
            if self.eat(&TokenKind::Semicolon).is_some() {
                continue;
            }
            if self.at_using_directive() {
                if let Some(using) = self.parse_using_directive() {
                    usings.push(using);
                }
                continue;
            }
            if self.check_word("extern") && self.peek_at(1).is_word("alias") {
                self.skip_through_semicolon();
                continue;
            }
            if self.check_word("namespace") {
                if let Some(namespace) = self.parse_namespace() {
                    members.push(NamespaceMember::Namespace(namespace));
                }
                continue;
            }
            if self.at_assembly_attribute() {
                self.skip_group();
                continue;
            }
            if self.at_type_declaration() {
                if let Some(ty) = self.parse_type_declaration() {
                    members.push(NamespaceMember::Type(ty));
                }
                continue;
            }
            // Top-level statements and local functions.
            self.skip_statement();
        }

        (usings, members)
    }

    fn skip_statement(&mut self) {
        let before = self.current;
        if self.check(&TokenKind::LeftBrace) {
            self.skip_group();
        } else {
            self.skip_through_semicolon();
        }
        if self.current == before {
            self.advance();
        }
    }

    fn at_using_directive(&self) -> bool {
        let offset = usize::from(self.check_word("global"));
        if !self.peek_at(offset).is_word("using") {
            return false;
        }
        // `using (...)` and `using var` are statements.
        let next = self.peek_at(offset + 1);
        !matches!(next, TokenKind::LeftParen) && !next.is_word("var") && !next.is_word("await")
    }

    fn at_assembly_attribute(&self) -> bool {
        self.check(&TokenKind::LeftBracket)
            && (self.peek_at(1).is_word("assembly") || self.peek_at(1).is_word("module"))
            && matches!(self.peek_at(2), TokenKind::Colon)
    }

    fn parse_using_directive(&mut self) -> Option<UsingDirective> {
        let start = self.current_span();
        let is_global = self.eat_word("global").is_some();
        self.eat_word("using");

        let kind = if self.eat_word("static").is_some() {
            UsingKind::Static
        } else if self.current_kind().as_identifier().is_some()
            && matches!(self.peek_at(1), TokenKind::Equals)
        {
            let alias = self.parse_identifier("an alias name")?;
            self.advance();
            UsingKind::Alias(alias)
        } else {
            UsingKind::Namespace
        };

        let target = self.parse_type();
        if self.expect(&TokenKind::Semicolon, "`;`").is_none() {
            self.skip_through_semicolon();
        }

        Some(UsingDirective {
            is_global,
            kind,
            target,
            span: self.span_from(start),
        })
    }

    fn parse_namespace(&mut self) -> Option<NamespaceDeclaration> {
        let start = self.advance();
        let mut name = vec![self.parse_identifier("a namespace name")?];
        while self.eat(&TokenKind::Dot).is_some() {
            name.push(self.parse_identifier("a namespace name")?);
        }

        if self.eat(&TokenKind::Semicolon).is_some() {
            let (usings, members) = self.parse_namespace_body();
            return Some(NamespaceDeclaration {
                name,
                file_scoped: true,
                usings,
                members,
                span: self.span_from(start),
            });
        }

        if self.expect(&TokenKind::LeftBrace, "`{` or `;`").is_none() {
            self.recover_member();
            return None;
        }
        if !self.enter_nesting() {
            self.skip_to_block_end();
            return None;
        }
        let (usings, members) = self.parse_namespace_body();
        self.leave_nesting();
        if self.expect(&TokenKind::RightBrace, "`}`").is_none() {
            self.errors
                .push(ParseError::new(ParseErrorKind::Unclosed('{'), start));
        }
        self.eat(&TokenKind::Semicolon);

        Some(NamespaceDeclaration {
            name,
            file_scoped: false,
            usings,
            members,
            span: self.span_from(start),
        })
    }

    /// Skips everything up to and including the `}` closing the current block.
    pub(super) fn skip_to_block_end(&mut self) {
        while !self.is_at_end() {
            if self.at_group_open() {
                self.skip_group();
            } else if self.eat(&TokenKind::RightBrace).is_some() {
                return;
            } else {
                self.advance();
            }
        }
    }
}

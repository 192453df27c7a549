// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Token types for the declaration lexer.
//!
//! Each [`Token`] pairs a [`TokenKind`] with its [`Span`] and the trivia that
//! precedes it. Keywords are not distinguished from identifiers here: the
//! parser only cares about a handful of contextual words and checks them by
//! text, which keeps `record`, `required` and friends usable as names.

use ecow::EcoString;

use super::Span;

/// The kind of token, not including source location or trivia.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// An identifier or keyword: `class`, `Settings`, `@event` (stored without `@`).
    Identifier(EcoString),

    /// An integer literal, including suffixes: `42`, `0xFF`, `10UL`.
    Integer(EcoString),

    /// A real literal: `3.14`, `1e10`, `2.5m`.
    Real(EcoString),

    /// Any string literal form; holds the raw source text including quotes.
    String(EcoString),

    /// A character literal, raw source text including quotes.
    Char(EcoString),

    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `:`
    Colon,
    /// `::`
    ColonColon,
    /// `.`
    Dot,
    /// `=`
    Equals,
    /// `=>`
    FatArrow,
    /// `?`
    Question,

    /// Any other operator character (`+`, `!`, `&`, ...).
    Operator(char),

    /// End of file.
    Eof,

    /// Unlexable input, kept for error recovery.
    Error(EcoString),
}

impl TokenKind {
    /// Returns the identifier text if this is an identifier.
    #[must_use]
    pub fn as_identifier(&self) -> Option<&str> {
        match self {
            Self::Identifier(name) => Some(name),
            _ => None,
        }
    }

    /// Returns true if this is the identifier `word`.
    #[must_use]
    pub fn is_word(&self, word: &str) -> bool {
        self.as_identifier() == Some(word)
    }

    /// Returns `true` if this token is a literal value.
    #[must_use]
    pub const fn is_literal(&self) -> bool {
        matches!(
            self,
            Self::Integer(_) | Self::Real(_) | Self::String(_) | Self::Char(_)
        )
    }

    /// Returns `true` if this is the end-of-file marker.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::Eof)
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identifier(s)
            | Self::Integer(s)
            | Self::Real(s)
            | Self::String(s)
            | Self::Char(s) => write!(f, "{s}"),
            Self::Error(s) => write!(f, "<error: {s}>"),
            Self::LeftParen => write!(f, "("),
            Self::RightParen => write!(f, ")"),
            Self::LeftBracket => write!(f, "["),
            Self::RightBracket => write!(f, "]"),
            Self::LeftBrace => write!(f, "{{"),
            Self::RightBrace => write!(f, "}}"),
            Self::Less => write!(f, "<"),
            Self::Greater => write!(f, ">"),
            Self::Comma => write!(f, ","),
            Self::Semicolon => write!(f, ";"),
            Self::Colon => write!(f, ":"),
            Self::ColonColon => write!(f, "::"),
            Self::Dot => write!(f, "."),
            Self::Equals => write!(f, "="),
            Self::FatArrow => write!(f, "=>"),
            Self::Question => write!(f, "?"),
            Self::Operator(c) => write!(f, "{c}"),
            Self::Eof => write!(f, "<eof>"),
        }
    }
}

/// Non-semantic source text between tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Trivia {
    /// Spaces, tabs and newlines.
    Whitespace(EcoString),
    /// `// ...`
    LineComment(EcoString),
    /// `/* ... */`
    BlockComment(EcoString),
    /// `/// ...`
    DocComment(EcoString),
    /// `#nullable enable`, `#region Options`, ...
    Directive(EcoString),
}

impl Trivia {
    /// Returns the text content of this trivia.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Whitespace(s)
            | Self::LineComment(s)
            | Self::BlockComment(s)
            | Self::DocComment(s)
            | Self::Directive(s) => s,
        }
    }

    /// Returns `true` if this is a comment of any kind.
    #[must_use]
    pub const fn is_comment(&self) -> bool {
        matches!(
            self,
            Self::LineComment(_) | Self::BlockComment(_) | Self::DocComment(_)
        )
    }
}

/// A token with its location and leading trivia.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    span: Span,
    leading_trivia: Vec<Trivia>,
}

impl Token {
    /// Creates a token with no trivia.
    #[must_use]
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self {
            kind,
            span,
            leading_trivia: Vec::new(),
        }
    }

    /// Creates a token carrying the trivia that preceded it.
    #[must_use]
    pub fn with_trivia(kind: TokenKind, span: Span, leading_trivia: Vec<Trivia>) -> Self {
        Self {
            kind,
            span,
            leading_trivia,
        }
    }

    /// The token kind.
    #[must_use]
    pub const fn kind(&self) -> &TokenKind {
        &self.kind
    }

    /// The token's source location (trivia excluded).
    #[must_use]
    pub const fn span(&self) -> Span {
        self.span
    }

    /// Whitespace and comments before this token.
    #[must_use]
    pub fn leading_trivia(&self) -> &[Trivia] {
        &self.leading_trivia
    }

    /// Consumes the token, returning its kind.
    #[must_use]
    pub fn into_kind(self) -> TokenKind {
        self.kind
    }
}

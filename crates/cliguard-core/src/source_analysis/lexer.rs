// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lexical analysis for declaration source files.
//!
//! The lexer is hand-written and never fails: anything it cannot make sense
//! of becomes a [`TokenKind::Error`] token so the parser can recover and
//! report it. Whitespace, comments and preprocessor lines are kept as trivia
//! on the following token so edits can be made without disturbing them.
//!
//! ```
//! use cliguard_core::source_analysis::{Lexer, TokenKind};
//!
//! let kinds: Vec<_> = Lexer::new("[CommandOption(\"-v\")]")
//!     .map(|t| t.into_kind())
//!     .collect();
//! assert_eq!(kinds.len(), 6);
//! assert_eq!(kinds[0], TokenKind::LeftBracket);
//! ```

use std::iter::Peekable;
use std::str::CharIndices;

use ecow::EcoString;

use super::{Span, Token, TokenKind, Trivia};

/// A lexer over one source file.
pub struct Lexer<'src> {
    source: &'src str,
    chars: Peekable<CharIndices<'src>>,
    position: usize,
    pending_trivia: Vec<Trivia>,
    finished: bool,
}

impl std::fmt::Debug for Lexer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexer")
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given source text.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            position: 0,
            pending_trivia: Vec::new(),
            finished: false,
        }
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn peek_char_n(&self, n: usize) -> Option<char> {
        self.source[self.position..].chars().nth(n)
    }

    fn advance(&mut self) -> Option<char> {
        let (pos, c) = self.chars.next()?;
        self.position = pos + c.len_utf8();
        Some(c)
    }

    fn advance_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.peek_char().is_some_and(&predicate) {
            self.advance();
        }
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "source files over 4GB are not supported"
    )]
    fn current_position(&self) -> u32 {
        self.position as u32
    }

    fn span_from(&self, start: u32) -> Span {
        Span::new(start, self.current_position())
    }

    fn text_for(&self, span: Span) -> &'src str {
        &self.source[span.as_range()]
    }

    /// True if only spaces or tabs separate the cursor from the start of its line.
    fn at_line_start(&self) -> bool {
        self.source[..self.position]
            .chars()
            .rev()
            .take_while(|&c| c != '\n')
            .all(|c| c == ' ' || c == '\t')
    }

    fn skip_trivia(&mut self) {
        loop {
            let start = self.current_position();
            match self.peek_char() {
                Some(c) if c.is_whitespace() => {
                    self.advance_while(char::is_whitespace);
                    let text = self.text_for(self.span_from(start));
                    self.pending_trivia.push(Trivia::Whitespace(text.into()));
                }
                Some('/') if self.peek_char_n(1) == Some('/') => {
                    self.advance_while(|c| c != '\n');
                    let text = self.text_for(self.span_from(start));
                    let is_doc = text.starts_with("///") && !text.starts_with("////");
                    self.pending_trivia.push(if is_doc {
                        Trivia::DocComment(text.into())
                    } else {
                        Trivia::LineComment(text.into())
                    });
                }
                Some('/') if self.peek_char_n(1) == Some('*') => {
                    self.advance();
                    self.advance();
                    while let Some(c) = self.advance() {
                        if c == '*' && self.peek_char() == Some('/') {
                            self.advance();
                            break;
                        }
                    }
                    let text = self.text_for(self.span_from(start));
                    self.pending_trivia.push(Trivia::BlockComment(text.into()));
                }
                Some('#') if self.at_line_start() => {
                    self.advance_while(|c| c != '\n');
                    let text = self.text_for(self.span_from(start));
                    self.pending_trivia.push(Trivia::Directive(text.into()));
                }
                _ => break,
            }
        }
    }

    fn lex_token(&mut self) -> Token {
        self.skip_trivia();
        let trivia = std::mem::take(&mut self.pending_trivia);
        let start = self.current_position();

        let Some(c) = self.peek_char() else {
            return Token::with_trivia(TokenKind::Eof, self.span_from(start), trivia);
        };

        let kind = match c {
            c if is_identifier_start(c) => self.lex_identifier(),
            '@' if self.peek_char_n(1).is_some_and(is_identifier_start) => {
                self.advance();
                self.lex_identifier()
            }
            '@' | '$' => self.lex_prefixed_string(),
            '"' => self.lex_string(0, false),
            '\'' => self.lex_char(),
            '0'..='9' => self.lex_number(),
            '.' if self.peek_char_n(1).is_some_and(|c| c.is_ascii_digit()) => self.lex_number(),
            _ => self.lex_punctuation(c),
        };

        Token::with_trivia(kind, self.span_from(start), trivia)
    }

    fn lex_identifier(&mut self) -> TokenKind {
        let start = self.current_position();
        self.advance_while(is_identifier_continue);
        TokenKind::Identifier(self.text_for(self.span_from(start)).into())
    }

    fn lex_number(&mut self) -> TokenKind {
        let start = self.current_position();
        let mut is_real = false;

        if self.peek_char() == Some('0') && matches!(self.peek_char_n(1), Some('x' | 'X' | 'b' | 'B'))
        {
            self.advance();
            self.advance();
            self.advance_while(|c| c.is_ascii_hexdigit() || c == '_');
        } else {
            self.advance_while(|c| c.is_ascii_digit() || c == '_');
            if self.peek_char() == Some('.') && self.peek_char_n(1).is_some_and(|c| c.is_ascii_digit())
            {
                is_real = true;
                self.advance();
                self.advance_while(|c| c.is_ascii_digit() || c == '_');
            }
            if matches!(self.peek_char(), Some('e' | 'E')) {
                let sign_or_digit = self.peek_char_n(1);
                let digit_after_sign = self.peek_char_n(2);
                let has_exponent = sign_or_digit.is_some_and(|c| c.is_ascii_digit())
                    || (matches!(sign_or_digit, Some('+' | '-'))
                        && digit_after_sign.is_some_and(|c| c.is_ascii_digit()));
                if has_exponent {
                    is_real = true;
                    self.advance();
                    if matches!(self.peek_char(), Some('+' | '-')) {
                        self.advance();
                    }
                    self.advance_while(|c| c.is_ascii_digit());
                }
            }
        }

        if matches!(self.peek_char(), Some('f' | 'F' | 'd' | 'D' | 'm' | 'M')) {
            is_real = true;
        }
        self.advance_while(|c| matches!(c, 'u' | 'U' | 'l' | 'L' | 'f' | 'F' | 'd' | 'D' | 'm' | 'M'));

        let text: EcoString = self.text_for(self.span_from(start)).into();
        if is_real {
            TokenKind::Real(text)
        } else {
            TokenKind::Integer(text)
        }
    }

    /// Lexes `@"..."`, `$"..."`, `$@"..."`, `@$"..."` and `$"""..."""`.
    fn lex_prefixed_string(&mut self) -> TokenKind {
        let start = self.current_position();
        let mut verbatim = false;
        let mut interpolated = false;
        while let Some(c @ ('@' | '$')) = self.peek_char() {
            self.advance();
            if c == '@' {
                verbatim = true;
            } else {
                interpolated = true;
            }
        }
        if self.peek_char() != Some('"') {
            return TokenKind::Error(self.text_for(self.span_from(start)).into());
        }
        let holes = if interpolated { 1 } else { 0 };
        match self.lex_string(holes, verbatim) {
            TokenKind::String(_) => TokenKind::String(self.text_for(self.span_from(start)).into()),
            TokenKind::Error(_) => TokenKind::Error(self.text_for(self.span_from(start)).into()),
            other => other,
        }
    }

    /// Lexes a string starting at `"`. `holes > 0` means `{...}` regions are
    /// interpolation holes to be skipped as a unit.
    fn lex_string(&mut self, holes: usize, verbatim: bool) -> TokenKind {
        let start = self.current_position();
        let quote_run = self.source[self.position..]
            .chars()
            .take_while(|&c| c == '"')
            .count();

        if quote_run >= 3 {
            return self.lex_raw_string(start, quote_run);
        }

        self.advance();
        let mut depth = 0usize;
        loop {
            match self.advance() {
                None => return TokenKind::Error(self.text_for(self.span_from(start)).into()),
                Some('\n') if !verbatim && depth == 0 => {
                    return TokenKind::Error(self.text_for(self.span_from(start)).into());
                }
                Some('\\') if !verbatim => {
                    self.advance();
                }
                Some('{') if holes > 0 => {
                    if depth == 0 && self.peek_char() == Some('{') {
                        self.advance();
                    } else {
                        depth += 1;
                    }
                }
                Some('}') if holes > 0 && depth > 0 => depth -= 1,
                Some('"') if depth == 0 => {
                    if verbatim && self.peek_char() == Some('"') {
                        self.advance();
                        continue;
                    }
                    break;
                }
                Some(_) => {}
            }
        }
        TokenKind::String(self.text_for(self.span_from(start)).into())
    }

    fn lex_raw_string(&mut self, start: u32, quote_run: usize) -> TokenKind {
        for _ in 0..quote_run {
            self.advance();
        }
        let mut closing = 0usize;
        while let Some(c) = self.advance() {
            if c == '"' {
                closing += 1;
                if closing == quote_run {
                    return TokenKind::String(self.text_for(self.span_from(start)).into());
                }
            } else {
                closing = 0;
            }
        }
        TokenKind::Error(self.text_for(self.span_from(start)).into())
    }

    fn lex_char(&mut self) -> TokenKind {
        let start = self.current_position();
        self.advance();
        loop {
            match self.advance() {
                None | Some('\n') => {
                    return TokenKind::Error(self.text_for(self.span_from(start)).into());
                }
                Some('\\') => {
                    self.advance();
                }
                Some('\'') => break,
                Some(_) => {}
            }
        }
        TokenKind::Char(self.text_for(self.span_from(start)).into())
    }

    fn lex_punctuation(&mut self, c: char) -> TokenKind {
        self.advance();
        match c {
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '[' => TokenKind::LeftBracket,
            ']' => TokenKind::RightBracket,
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            '<' => TokenKind::Less,
            '>' => TokenKind::Greater,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            '.' => TokenKind::Dot,
            '?' => TokenKind::Question,
            ':' if self.peek_char() == Some(':') => {
                self.advance();
                TokenKind::ColonColon
            }
            ':' => TokenKind::Colon,
            '=' if self.peek_char() == Some('>') => {
                self.advance();
                TokenKind::FatArrow
            }
            '=' => TokenKind::Equals,
            '+' | '-' | '*' | '/' | '%' | '&' | '|' | '^' | '!' | '~' | '#' => {
                TokenKind::Operator(c)
            }
            other => TokenKind::Error(other.to_string().into()),
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let token = self.lex_token();
        if token.kind().is_eof() {
            self.finished = true;
            return None;
        }
        Some(token)
    }
}

fn is_identifier_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_identifier_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

/// Lexes `source` into tokens, excluding the end-of-file marker.
#[must_use]
pub fn lex(source: &str) -> Vec<Token> {
    Lexer::new(source).collect()
}

/// Lexes `source` into tokens terminated by a single [`TokenKind::Eof`]
/// token, which carries any trailing trivia.
#[must_use]
pub fn lex_with_eof(source: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.lex_token();
        let done = token.kind().is_eof();
        tokens.push(token);
        if done {
            return tokens;
        }
    }
}

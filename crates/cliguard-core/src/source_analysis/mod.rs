// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lexing and parsing of C# declaration source.
//!
//! **DDD Context:** Source Analysis
//!
//! # Lexical Analysis
//!
//! The [`Lexer`] converts source text into a stream of [`Token`]s. Each token
//! carries its source location via [`Span`] and the trivia (whitespace,
//! comments, preprocessor lines) that precedes it.
//!
//! ```
//! use cliguard_core::source_analysis::{Lexer, TokenKind};
//!
//! let tokens: Vec<_> = Lexer::new("int? Count").collect();
//! assert_eq!(tokens.len(), 3); // int, ?, Count
//! ```
//!
//! # Parsing
//!
//! The [`parse`] function converts tokens into a
//! [`CompilationUnit`](crate::ast::CompilationUnit). Most callers want
//! [`SyntaxTree::parse`](crate::ast::SyntaxTree::parse), which keeps the
//! source text next to the tree.
//!
//! # Error Handling
//!
//! Neither stage stops at the first problem. The lexer turns unlexable input
//! into [`TokenKind::Error`] tokens; the parser reports those and its own
//! problems as [`ParseError`]s and resynchronizes at member boundaries.

mod error;
mod lexer;
mod parser;
mod span;
mod token;

pub use error::{ParseError, ParseErrorKind};
pub use lexer::{Lexer, lex, lex_with_eof};
pub use parser::parse;
pub use span::Span;
pub use token::{Token, TokenKind, Trivia};

// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Declaration checks for strongly-typed command settings classes.
//!
//! This crate contains:
//! - Lexical analysis and parsing of C# declarations
//! - A binder that resolves declarations into a semantic model
//! - The analysis engine: type classification, settings-class scanning and
//!   the validation rules
//! - Code fixes that add or repair explicit binding type arguments
//!
//! ```
//! use cliguard_core::prelude::*;
//!
//! let source = r#"
//! using System.IO;
//! using Spectre.Console.Cli;
//!
//! class Settings : CommandSettings {
//!     [CommandOption("--dir")]
//!     public DirectoryInfo Dir { get; set; }
//! }
//! "#;
//! let options = GlobalOptions::new().with("build_property.enableaotanalyzer", "true");
//! let diagnostics = analyze_source(source, &options);
//!
//! let fixed = fix_all(&SyntaxTree::parse(source), &diagnostics, &CancellationToken::new()).unwrap();
//! assert!(fixed.text().contains(r#"[CommandOption("--dir", typeof(DirectoryInfo))]"#));
//! assert!(analyze_source(fixed.text(), &options).is_empty());
//! ```

pub mod analysis;
pub mod ast;
pub mod config;
pub mod diagnostics;
pub mod fixes;
pub mod semantic_analysis;
pub mod source_analysis;

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::analysis::{Analyzer, CancellationToken, analyze_source};
    pub use crate::ast::SyntaxTree;
    pub use crate::config::{AnalyzerConfigOptions, GlobalOptions};
    pub use crate::diagnostics::{Diagnostic, Severity};
    pub use crate::fixes::{fix_all, synthesize};
    pub use crate::source_analysis::Span;
}

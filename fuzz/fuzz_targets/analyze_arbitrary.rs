// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for end-to-end crash safety.
//!
//! Feeds arbitrary text through parse, bind, analyze and fix, with the
//! ahead-of-time switch on so every rule runs. Success is no panic:
//! diagnostics are expected for most inputs.
//!
//! # Corpus Seeding
//!
//! Seed `fuzz/corpus/analyze_arbitrary/` with settings classes, e.g. the
//! sources used in `crates/cliguard-core/tests/`.

#![no_main]

use cliguard_core::analysis::{CancellationToken, analyze_source};
use cliguard_core::ast::SyntaxTree;
use cliguard_core::config::{AOT_ANALYZER_KEY, GlobalOptions};
use cliguard_core::fixes::fix_all;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // The host hands the analyzer text, never raw bytes
    if let Ok(source) = std::str::from_utf8(data) {
        let options = GlobalOptions::new().with(AOT_ANALYZER_KEY, "true");
        let diagnostics = analyze_source(source, &options);
        for diagnostic in &diagnostics {
            assert!(diagnostic.span.end() as usize <= source.len());
        }

        let cancel = CancellationToken::new();
        if let Ok(fixed) = fix_all(&SyntaxTree::parse(source), &diagnostics, &cancel) {
            let _ = analyze_source(fixed.text(), &options);
        }
    }
});

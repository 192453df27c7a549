// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Code fix round-trips: analyze, fix, re-analyze.

use cliguard_core::config::{AOT_ANALYZER_KEY, GlobalOptions};
use cliguard_core::fixes::{AttributeArgumentFix, code_fix};
use cliguard_core::prelude::*;

fn aot() -> GlobalOptions {
    GlobalOptions::new().with(AOT_ANALYZER_KEY, "true")
}

fn aot_diagnostics(text: &str) -> Vec<Diagnostic> {
    analyze_source(text, &aot())
        .into_iter()
        .filter(|d| d.id.starts_with("Spectre"))
        .collect()
}

/// Fixes every AOT diagnostic in `source` and returns the new text.
fn fix(source: &str) -> String {
    let tree = SyntaxTree::parse(source);
    fix_all(&tree, &aot_diagnostics(source), &CancellationToken::new())
        .unwrap()
        .text()
        .to_string()
}

const SETTINGS: &str = r#"using System;
using System.IO;
using Spectre.Console.Cli;

public sealed class BuildSettings : CommandSettings
{
    [CommandOption("-p|--project <PROJECTPATH>")]
    public DirectoryInfo ProjectPath { get; set; }

    [CommandOption(optionType: typeof(DirectoryInfo), template: "-o|--output <FILE>")]
    public FileInfo Output { get; set; }

    [CommandArgument(0, "<target>", typeof(FileInfo))]
    public Uri Target { get; set; }

    [CommandOption("-r|--run <ID>", IsHidden = true)]
    public Guid? RunId { get; set; }

    [CommandOption("-v|--verbose")]
    public bool Verbose { get; set; }
}
"#;

#[test]
fn fix_all_rewrites_every_flagged_property() {
    insta::assert_snapshot!(fix(SETTINGS), @r#"
    using System;
    using System.IO;
    using Spectre.Console.Cli;

    public sealed class BuildSettings : CommandSettings
    {
        [CommandOption("-p|--project <PROJECTPATH>", typeof(DirectoryInfo))]
        public DirectoryInfo ProjectPath { get; set; }

        [CommandOption(optionType: typeof(FileInfo), template: "-o|--output <FILE>")]
        public FileInfo Output { get; set; }

        [CommandArgument(0, "<target>", typeof(Uri))]
        public Uri Target { get; set; }

        [CommandOption("-r|--run <ID>", typeof(Guid?), IsHidden = true)]
        public Guid? RunId { get; set; }

        [CommandOption("-v|--verbose")]
        public bool Verbose { get; set; }
    }
    "#);
}

#[test]
fn fixed_source_is_clean() {
    let fixed = fix(SETTINGS);
    assert_eq!(aot_diagnostics(SETTINGS).len(), 4);
    assert!(analyze_source(&fixed, &aot()).is_empty());
}

#[test]
fn fixing_twice_is_a_no_op() {
    let once = fix(SETTINGS);
    assert_eq!(fix(&once), once);
}

#[test]
fn each_diagnostic_fixes_only_its_property() {
    let tree = SyntaxTree::parse(SETTINGS);
    let diagnostics = aot_diagnostics(SETTINGS);
    let fixed = synthesize(&tree, &diagnostics[0]);
    assert_eq!(aot_diagnostics(fixed.text()).len(), diagnostics.len() - 1);
}

#[test]
fn code_fix_describes_itself() {
    let tree = SyntaxTree::parse(SETTINGS);
    let diagnostics = aot_diagnostics(SETTINGS);
    let fix = code_fix(&tree, &diagnostics[0]).unwrap();
    assert_eq!(fix.title, "Add or fix type argument for explicit AOT usage");
    assert_eq!(fix.equivalence_key, "AddOrUpdateTypeArgument");
    assert_eq!(fix.edits.len(), 1);
    assert_eq!(AttributeArgumentFix::fixable_ids(), ["Spectre1050", "Spectre1051"]);
}

#[test]
fn comments_and_layout_are_preserved() {
    let source = r#"using System.IO;
using Spectre.Console.Cli;

class S : CommandSettings
{
    /// <summary>Where to build.</summary>
    [CommandOption(
        "--dir", // the directory
        typeof(FileInfo))]
    public DirectoryInfo  Dir { get; init; } = null!;
}
"#;
    insta::assert_snapshot!(fix(source), @r#"
    using System.IO;
    using Spectre.Console.Cli;

    class S : CommandSettings
    {
        /// <summary>Where to build.</summary>
        [CommandOption(
            "--dir", // the directory
            typeof(DirectoryInfo))]
        public DirectoryInfo  Dir { get; init; } = null!;
    }
    "#);
}

#[test]
fn s1052_is_not_fixed() {
    let source = r#"using System.Collections.Generic;
using Spectre.Console.Cli;

class S : CommandSettings
{
    [CommandOption("--map")]
    public Dictionary<int, string> Map { get; set; }
}
"#;
    let tree = SyntaxTree::parse(source);
    let diagnostics = analyze_source(source, &aot());
    let s1052 = diagnostics.iter().find(|d| d.id == "S1052").unwrap();
    assert_eq!(synthesize(&tree, s1052), tree);

    let fixed = fix_all(&tree, &diagnostics, &CancellationToken::new()).unwrap();
    assert!(fixed.text().contains("typeof(Dictionary<int, string>)"));
    let remaining: Vec<_> = analyze_source(fixed.text(), &aot())
        .into_iter()
        .map(|d| d.id.to_string())
        .collect();
    assert_eq!(remaining, ["S1052"]);
}

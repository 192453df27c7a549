// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! End-to-end analysis of settings classes: parse, bind, check.

use cliguard_core::analysis::finding::REASON_PROPERTY;
use cliguard_core::config::{AOT_ANALYZER_KEY, GlobalOptions};
use cliguard_core::prelude::*;

fn aot() -> GlobalOptions {
    GlobalOptions::new().with(AOT_ANALYZER_KEY, "true")
}

/// `(id, flagged text)` for every diagnostic whose id starts with `prefix`.
fn findings<'a>(source: &'a str, options: &GlobalOptions, prefix: &str) -> Vec<(String, &'a str)> {
    analyze_source(source, options)
        .into_iter()
        .filter(|d| d.id.starts_with(prefix))
        .map(|d| (d.id.to_string(), d.span.slice(source)))
        .collect()
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn missing_type_argument_on_directory_option() {
    let source = r#"
using Spectre.Console.Cli;
using System.IO;

sealed class Settings : CommandSettings
{
    [CommandOption("-p|--project <PROJECTPATH>")]
    public DirectoryInfo ProjectPath { get; set; }
}
"#;
    assert_eq!(
        findings(source, &aot(), ""),
        [("Spectre1050".to_string(), "ProjectPath")]
    );
}

#[test]
fn mismatched_type_argument_names_both_types() {
    let source = r#"
using Spectre.Console.Cli;
using System.IO;

sealed class Settings : CommandSettings
{
    [CommandOption("-p|--project <PROJECTPATH>", typeof(FileInfo))]
    public DirectoryInfo ProjectPath { get; set; }
}
"#;
    let diagnostics = analyze_source(source, &aot());
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].id, "Spectre1051");
    assert_eq!(diagnostics[0].severity, Severity::Warning);
    assert_eq!(
        diagnostics[0].message,
        "Type must match the property type. ProjectPath expected System.IO.DirectoryInfo, found System.IO.FileInfo"
    );
}

#[test]
fn text_keyed_dictionary_needs_no_type_argument() {
    let source = r#"
using Spectre.Console.Cli;
using System.Collections.Generic;

sealed class Settings : CommandSettings
{
    [CommandOption("-p|--project <PROJECTPATH>")]
    public IDictionary<string, int> Data { get; set; }

    [CommandOption("--values")]
    public Dictionary<string, int> Values { get; set; }
}
"#;
    assert!(analyze_source(source, &aot()).is_empty());
}

#[test]
fn struct_array_is_rejected_in_both_modes() {
    let source = r#"
using Spectre.Console.Cli;

sealed class Settings : CommandSettings
{
    [CommandArgument(1, "<PROGRAM>")]
    public MyStruct[] StructArray { get; set; }
}

struct MyStruct
{
}
"#;
    for options in [aot(), GlobalOptions::new()] {
        let diagnostics: Vec<_> = analyze_source(source, &options)
            .into_iter()
            .filter(|d| d.id == "S1052")
            .collect();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].property(REASON_PROPERTY), Some("value-type-array"));
        assert_eq!(diagnostics[0].span.slice(source), "StructArray");
        assert!(diagnostics[0].is_error());
    }
}

#[test]
fn type_converter_exempts_unsupported_type() {
    let source = r#"
using Spectre.Console.Cli;
using System.ComponentModel;
using System.IO;

sealed class Settings : CommandSettings
{
    [CommandArgument(1, "<PROGRAM>")]
    [TypeConverter(typeof(MyCustomConverter))]
    public Stream PropertyWithConverter { get; set; }
}

class MyCustomConverter : TypeConverter { }
"#;
    assert!(findings(source, &GlobalOptions::new(), "S1052").is_empty());
}

// ============================================================================
// Property types
// ============================================================================

#[test]
fn invalid_setting_types() {
    let source = r#"
using Spectre.Console.Cli;
using System.IO;
using System.Linq;

sealed class Settings : CommandSettings
{
    [CommandArgument(1, "<PROGRAM>")]
    public ILookup<int, int> Ba4r { get; set; }

    [CommandArgument(2, "<PROGRAM>")]
    public MemoryStream Stream { get; set; }

    [CommandArgument(3, "<PROGRAM>")]
    public int Ok { get; set; }

    [CommandArgument(4, "<PROGRAM>")]
    public string AlsoOk { get; set; }

    [CommandArgument(5, "<PROGRAM>")]
    public string StillOk { get; set; }
}
"#;
    assert_eq!(
        findings(source, &aot(), "S1052"),
        [("S1052".to_string(), "Ba4r"), ("S1052".to_string(), "Stream")]
    );
}

#[test]
fn invalid_dictionary_key() {
    let source = r#"
using Spectre.Console.Cli;
using System.Collections.Generic;

sealed class Settings : CommandSettings
{
    [CommandArgument(1, "<PROGRAM>")]
    public IDictionary<int, string> InvalidDictionary { get; set; }

    [CommandArgument(2, "<PROGRAM>")]
    public IDictionary<string, string> ValidDictionary { get; set; }
}
"#;
    let diagnostics = analyze_source(source, &aot());
    let s1052: Vec<_> = diagnostics.iter().filter(|d| d.id == "S1052").collect();
    assert_eq!(s1052.len(), 1);
    assert_eq!(s1052[0].span.slice(source), "InvalidDictionary");
    assert_eq!(
        s1052[0].property(REASON_PROPERTY),
        Some("dictionary-key-not-text")
    );
}

#[test]
fn inherited_settings_are_checked() {
    let source = r#"
using Spectre.Console.Cli;
using System.IO;

namespace App.Commands
{
    public abstract class BaseSettings : CommandSettings
    {
        [CommandOption("--verbose")]
        public bool Verbose { get; set; }
    }

    public sealed class BuildSettings : BaseSettings
    {
        [CommandOption("--output")]
        public DirectoryInfo Output { get; set; }
    }
}
"#;
    assert_eq!(
        findings(source, &aot(), "Spectre"),
        [("Spectre1050".to_string(), "Output")]
    );
}

// ============================================================================
// Named arguments
// ============================================================================

#[test]
fn named_type_argument_mismatch() {
    let source = r#"
using Spectre.Console.Cli;
using System.IO;

sealed class Settings : CommandSettings
{
    [CommandOption(optionType: typeof(FileInfo), template: "-p|--project <PROJECTPATH>")]
    public DirectoryInfo ProjectPath { get; set; }
}
"#;
    assert_eq!(
        findings(source, &aot(), ""),
        [("Spectre1051".to_string(), "ProjectPath")]
    );
}

#[test]
fn named_type_argument_match() {
    let source = r#"
using Spectre.Console.Cli;
using System.IO;

sealed class Settings : CommandSettings
{
    [CommandOption(optionType: typeof(DirectoryInfo), template: "-p|--project <PROJECTPATH>")]
    public DirectoryInfo ProjectPath { get; set; }

    [CommandOption("-f|--file <FILE>", typeof(FileInfo))]
    public FileInfo File { get; set; }
}
"#;
    assert!(analyze_source(source, &aot()).is_empty());
}

#[test]
fn fully_qualified_names_resolve() {
    let source = r#"
sealed class Settings : Spectre.Console.Cli.CommandSettings
{
    [Spectre.Console.Cli.CommandOptionAttribute("--dir", typeof(global::System.IO.DirectoryInfo))]
    public System.IO.DirectoryInfo Dir { get; set; }
}
"#;
    assert!(analyze_source(source, &aot()).is_empty());
}

#[test]
fn broken_class_does_not_stop_others() {
    let source = r#"
using Spectre.Console.Cli;
using System.IO;

sealed class Broken : CommandSettings
{
    [CommandOption("--a"
    public DirectoryInfo A { get; set; }
}

sealed class Fine : CommandSettings
{
    [CommandOption("--b")]
    public DirectoryInfo B { get; set; }
}
"#;
    let diagnostics = analyze_source(source, &aot());
    assert!(diagnostics.iter().any(|d| d.id == "CG0001"));
    assert!(
        diagnostics
            .iter()
            .any(|d| d.id == "Spectre1050" && d.span.slice(source) == "B")
    );
}

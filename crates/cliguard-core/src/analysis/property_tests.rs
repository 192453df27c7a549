// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for the analysis engine.
//!
//! 1. **Intrinsic types are always valid**: no `S1052` for any intrinsic
//!    property type, nullable or not
//! 2. **Keyed collections follow their key**: text keys pass, other keys
//!    fail with `dictionary-key-not-text`
//! 3. **Struct arrays are rejected**: `value-type-array` for every array of a
//!    non-intrinsic struct; intrinsic arrays pass
//! 4. **AOT off is silent**: no `Spectre1050`/`Spectre1051` without the switch
//! 5. **Matching type arguments are clean**: positional and named forms
//! 6. **Analysis never panics** on near-valid settings classes
//! 7. **Fixing is idempotent**: one `fix_all` pass clears every AOT finding
//!    and a second pass changes nothing
//!
//! **DDD Context:** Analysis

use proptest::prelude::*;

use super::{CancellationToken, analyze_source};
use crate::config::{AOT_ANALYZER_KEY, GlobalOptions};
use crate::ast::SyntaxTree;
use crate::diagnostics::Diagnostic;
use crate::fixes::fix_all;

fn proptest_config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

// ============================================================================
// Generators
// ============================================================================

const PREAMBLE: &str = "using System;\nusing System.IO;\nusing System.Collections.Generic;\n\
                        using System.Linq;\nusing System.ComponentModel;\nusing Spectre.Console.Cli;\n\
                        public struct Point { public int X { get; set; } }\n";

const INTRINSIC: &[&str] = &[
    "bool", "byte", "sbyte", "short", "ushort", "int", "uint", "long", "ulong", "float",
    "double", "decimal", "char", "string", "object", "DateTime",
];

const NON_TEXT_KEYS: &[&str] = &["int", "long", "bool", "Guid", "FileInfo", "Point"];

const KEYED: &[&str] = &["Dictionary", "IDictionary", "IReadOnlyDictionary", "SortedDictionary"];

const STRUCTS: &[&str] = &["TimeSpan", "Guid", "Point", "DateTimeOffset"];

/// Types that need an explicit type argument in AOT mode.
const EXPLICIT: &[&str] = &[
    "FileInfo",
    "DirectoryInfo",
    "Uri",
    "TimeSpan",
    "Stream",
    "List<string>",
    "Point[]",
    "Dictionary<int, string>",
];

fn intrinsic() -> impl Strategy<Value = String> {
    (prop::sample::select(INTRINSIC), any::<bool>()).prop_map(|(ty, nullable)| {
        if nullable { format!("{ty}?") } else { ty.to_string() }
    })
}

fn keyed(key: impl Strategy<Value = &'static str>) -> impl Strategy<Value = String> {
    (prop::sample::select(KEYED), key, prop::sample::select(INTRINSIC))
        .prop_map(|(shape, key, value)| format!("{shape}<{key}, {value}>"))
}

fn property_type() -> impl Strategy<Value = String> {
    prop_oneof![
        intrinsic(),
        keyed(prop::sample::select(NON_TEXT_KEYS)),
        keyed(Just("string")),
        prop::sample::select(STRUCTS).prop_map(|ty| format!("{ty}[]")),
        prop::sample::select(EXPLICIT).prop_map(str::to_string),
        Just("Unknown".to_string()),
    ]
}

/// A binding attribute in one of the shapes the rules distinguish.
fn attribute(ty: &str, style: u8) -> String {
    match style {
        0 => "[CommandOption(\"--value\")]".to_string(),
        1 => format!("[CommandOption(\"--value\", typeof({ty}))]"),
        2 => format!("[CommandOption(\"--value\", optionType: typeof({ty}))]"),
        3 => format!("[CommandArgument(0, \"<value>\", typeof({ty}))]"),
        _ => "[CommandArgument(0, \"<value>\")]".to_string(),
    }
}

fn settings(properties: &[(String, String)]) -> String {
    let body: String = properties
        .iter()
        .enumerate()
        .map(|(i, (attribute, ty))| format!("    {attribute}\n    public {ty} P{i} {{ get; set; }}\n"))
        .collect();
    format!("{PREAMBLE}public sealed class Settings : CommandSettings\n{{\n{body}}}\n")
}

fn single(ty: &str) -> String {
    settings(&[(attribute(ty, 0), ty.to_string())])
}

fn aot() -> GlobalOptions {
    GlobalOptions::new().with(AOT_ANALYZER_KEY, "true")
}

fn reasons(diagnostics: &[Diagnostic]) -> Vec<Option<&str>> {
    diagnostics
        .iter()
        .filter(|d| d.id == "S1052")
        .map(|d| d.property("reason"))
        .collect()
}

/// A settings class with up to three binding properties.
fn valid_settings() -> impl Strategy<Value = String> {
    prop::collection::vec((property_type(), 0u8..5), 0..4).prop_map(|props| {
        let properties: Vec<_> = props
            .into_iter()
            .map(|(ty, style)| (attribute(&ty, style), ty))
            .collect();
        settings(&properties)
    })
}

/// Near-valid settings sources: valid declarations with truncation and
/// stray tokens spliced in.
fn near_valid_settings() -> impl Strategy<Value = String> {
    prop_oneof![
        valid_settings(),
        (valid_settings(), any::<prop::sample::Index>())
            .prop_map(|(source, cut)| source.chars().take(cut.index(source.len() + 1)).collect()),
        (
            valid_settings(),
            any::<prop::sample::Index>(),
            prop::sample::select(&["[", "]", "(", ")", "<", ">", "typeof(", ",", "?", "{", "}"][..])
        )
            .prop_map(|(source, at, junk)| {
                let chars: Vec<char> = source.chars().collect();
                let at = at.index(chars.len() + 1);
                let mut out: String = chars[..at].iter().collect();
                out.push_str(junk);
                out.extend(&chars[at..]);
                out
            }),
    ]
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(proptest_config())]

    #[test]
    fn intrinsic_types_are_always_valid(ty in intrinsic(), aot_on in any::<bool>()) {
        let options = if aot_on { aot() } else { GlobalOptions::new() };
        let diagnostics = analyze_source(&single(&ty), &options);
        prop_assert!(diagnostics.is_empty(), "{ty}: {diagnostics:?}");
    }

    #[test]
    fn non_text_keys_are_rejected(ty in keyed(prop::sample::select(NON_TEXT_KEYS))) {
        let diagnostics = analyze_source(&single(&ty), &GlobalOptions::new());
        prop_assert_eq!(reasons(&diagnostics), vec![Some("dictionary-key-not-text")]);
    }

    #[test]
    fn text_keys_are_accepted(ty in keyed(Just("string")), aot_on in any::<bool>()) {
        let options = if aot_on { aot() } else { GlobalOptions::new() };
        let diagnostics = analyze_source(&single(&ty), &options);
        prop_assert!(diagnostics.is_empty(), "{ty}: {diagnostics:?}");
    }

    #[test]
    fn struct_arrays_are_rejected(element in prop::sample::select(STRUCTS)) {
        let diagnostics = analyze_source(&single(&format!("{element}[]")), &GlobalOptions::new());
        prop_assert_eq!(reasons(&diagnostics), vec![Some("value-type-array")]);
    }

    #[test]
    fn intrinsic_arrays_are_accepted(element in prop::sample::select(INTRINSIC)) {
        let diagnostics = analyze_source(&single(&format!("{element}[]")), &GlobalOptions::new());
        prop_assert!(reasons(&diagnostics).is_empty(), "{diagnostics:?}");
    }

    #[test]
    fn aot_rules_are_silent_when_disabled(
        props in prop::collection::vec((property_type(), 0u8..5), 1..4),
    ) {
        let properties: Vec<_> = props
            .into_iter()
            .map(|(ty, style)| (attribute(&ty, style), ty))
            .collect();
        let diagnostics = analyze_source(&settings(&properties), &GlobalOptions::new());
        prop_assert!(diagnostics.iter().all(|d| !d.id.starts_with("Spectre")), "{diagnostics:?}");
    }

    #[test]
    fn matching_type_arguments_are_clean(
        ty in prop::sample::select(EXPLICIT),
        style in 1u8..4,
    ) {
        let source = settings(&[(attribute(ty, style), ty.to_string())]);
        let diagnostics = analyze_source(&source, &aot());
        prop_assert!(diagnostics.iter().all(|d| !d.id.starts_with("Spectre")), "{diagnostics:?}");
    }

    #[test]
    fn analysis_never_panics(source in near_valid_settings(), aot_on in any::<bool>()) {
        let options = if aot_on { aot() } else { GlobalOptions::new() };
        let diagnostics = analyze_source(&source, &options);
        for diagnostic in &diagnostics {
            prop_assert!(diagnostic.span.end() as usize <= source.len());
            prop_assert!(diagnostic.span.start() <= diagnostic.span.end());
        }
    }

    #[test]
    fn fixing_is_idempotent(source in valid_settings()) {
        let options = aot();
        let cancel = CancellationToken::new();
        let fixed = fix_all(&SyntaxTree::parse(source.as_str()), &analyze_source(&source, &options), &cancel)
            .expect("fix pass is never cancelled");
        let remaining = analyze_source(fixed.text(), &options);
        prop_assert!(remaining.iter().all(|d| !d.id.starts_with("Spectre")), "{remaining:?}");

        let again = fix_all(&fixed, &remaining, &cancel).expect("fix pass is never cancelled");
        prop_assert_eq!(again.text(), fixed.text());
    }
}

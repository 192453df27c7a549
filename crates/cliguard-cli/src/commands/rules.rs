// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! `cliguard rules`: print the diagnostic catalog.

use cliguard_core::analysis::descriptors::{Descriptor, supported_diagnostics};
use cliguard_core::fixes::is_fixable;

pub fn print_rules() {
    for descriptor in supported_diagnostics() {
        println!("{}", format_rule(descriptor));
    }
}

fn format_rule(descriptor: &Descriptor) -> String {
    let fix = if is_fixable(descriptor.id) { " (fixable)" } else { "" };
    format!(
        "{:<12} {:<8} {}{fix}\n{:<12} {}",
        descriptor.id,
        descriptor.default_severity,
        descriptor.title,
        "",
        descriptor.help_link()
    )
}

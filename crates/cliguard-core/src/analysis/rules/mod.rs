// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Validation rules over binding properties.
//!
//! **DDD Context:** Analysis
//!
//! # Adding a New Rule
//!
//! 1. Create `crates/cliguard-core/src/analysis/rules/<your_rule>.rs`.
//! 2. Declare `pub(crate) struct YourRule;` implementing [`Rule`].
//! 3. Add `mod your_rule;` below (keep alphabetical).
//! 4. Push `Box::new(your_rule::YourRule)` into [`all_rules`] (keep alphabetical).
//! 5. Add its descriptor to [`supported_diagnostics`](super::descriptors::supported_diagnostics).

mod aot_explicit_type;
mod property_type;

pub use property_type::invalid_reason;

use super::finding::Finding;
use super::scanner::BindingProperty;
use crate::semantic_analysis::SemanticModel;

/// Settings shared by every rule for one analysis pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuleContext {
    /// Whether `build_property.enableaotanalyzer` is `"true"`.
    pub aot_enabled: bool,
}

/// A single validation rule.
///
/// Rules are stateless. `check` sees one binding property at a time and
/// returns at most one finding for it.
pub trait Rule: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn check(
        &self,
        model: &dyn SemanticModel,
        property: &BindingProperty<'_>,
        context: &RuleContext,
    ) -> Option<Finding>;
}

/// Construct the ordered list of all rules.
#[must_use]
pub fn all_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(aot_explicit_type::AotExplicitTypeRule),
        Box::new(property_type::PropertyTypeRule),
    ]
}

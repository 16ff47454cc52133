// SPDX-License-Identifier: PMPL-1.0-or-later
//! Form accessibility - WCAG 3.3.2 Labels or Instructions (Level A), 1.3.1
//!
//! - `form-label`: every form control has a `<label>` (by `for`/`id` or by
//!   wrapping), an `aria-label` or an `aria-labelledby`
//! - `fieldset-legend`: every `<fieldset>` has a `<legend>`

use super::{has_aria_name, Rule, RuleContext};
use crate::violation::{Severity, Violation};

/// Form controls without an associated label
pub struct FormLabel;

impl Rule for FormLabel {
    fn id(&self) -> &'static str {
        "form-label"
    }

    fn description(&self) -> &'static str {
        "Form elements are missing associated labels."
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Violation> {
        let nodes = ctx
            .select("input, textarea, select, button")
            .iter()
            .filter(|control| control.labels().is_empty() && !has_aria_name(control))
            .map(|control| ctx.affected(control, "Form control is missing an associated label"))
            .collect();
        self.violation(nodes)
    }
}

/// Fieldsets without a legend
pub struct FieldsetLegend;

impl Rule for FieldsetLegend {
    fn id(&self) -> &'static str {
        "fieldset-legend"
    }

    fn description(&self) -> &'static str {
        "Fieldsets are missing legends."
    }

    fn severity(&self) -> Severity {
        Severity::Minor
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Violation> {
        let nodes = ctx
            .select("fieldset")
            .iter()
            .filter(|fieldset| !fieldset.has_descendant("legend"))
            .map(|fieldset| ctx.affected(fieldset, "Fieldset is missing a legend"))
            .collect();
        self.violation(nodes)
    }
}

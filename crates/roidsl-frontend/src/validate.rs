//! # Semantic Validation
//!
//! This module performs semantic validation on a parsed document, checking:
//!
//! - **Mandatory fields**: at least one goal and metric and a declared output
//! - **Naming**: duplicate goal/metric/derived-metric names, PascalCase names
//! - **References**: derived-metric formulas and trigger conditions only name
//!   declared metrics
//! - **Shapes**: trigger conditions are `<metric> <comparator> <number>` and
//!   actions look like `name("arg")`
//! - **Output advice**: hints for output kinds that work best with optional
//!   sections
//!
//! ## Findings
//!
//! Every check runs unconditionally and records its findings in a
//! [`ValidationReport`]. Errors block acceptance; warnings are advisory.
//! Validation never fails and never mutates the document.

use std::collections::HashSet;

use crate::ast::*;
use crate::errors::FrontendError;
use crate::parser::{extract, match_rule, Rule};

/// Capitalized words that may appear in a formula without naming a metric.
pub const RESERVED_OPERATORS: [&str; 4] = ["AND", "OR", "NOT", "IF"];

/// Comparators accepted in trigger conditions.
pub const COMPARATORS: [&str; 6] = [">", "<", ">=", "<=", "==", "!="];

/// Classified validation findings, in check order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// A document is valid iff there are no errors. Warnings never block.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Keeps the report (and its warnings) if valid, otherwise converts the
    /// errors into [`FrontendError::Validation`].
    pub fn into_result(self) -> Result<Self, FrontendError> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(FrontendError::Validation {
                errors: self.errors,
            })
        }
    }

    fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

/// Performs semantic validation on a parsed document.
///
/// # Example
///
/// ```rust
/// use roidsl_frontend::{parse_program, validate_program};
///
/// let ast = parse_program("GOAL Cost: \"Avoid $2M/mo burn\"\nMETRIC Risk: 0.7\nOUTPUT MintSite").unwrap();
/// let report = validate_program(&ast);
/// assert!(report.is_valid());
/// ```
pub fn validate_program(ast: &ProgramAst) -> ValidationReport {
    let mut report = ValidationReport::default();

    validate_mandatory_fields(ast, &mut report);
    validate_persona(ast, &mut report);
    validate_goals(&ast.goals, &mut report);
    validate_metrics(&ast.metrics, &mut report);
    validate_derived_metrics(ast, &mut report);
    validate_triggers(ast, &mut report);
    validate_variants(&ast.variants, &mut report);
    validate_output(ast, &mut report);
    sweep_derived_metric_references(ast, &mut report);

    #[cfg(feature = "tracing")]
    tracing::debug!(
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        "validated ROI-DSL document"
    );
    report
}

fn validate_mandatory_fields(ast: &ProgramAst, report: &mut ValidationReport) {
    if ast.goals.is_empty() {
        report.error("At least 1 GOAL is required");
    }
    if ast.metrics.is_empty() {
        report.error("At least 1 METRIC is required");
    }
    if ast.output.is_none() {
        report.error("OUTPUT declaration is required");
    }
    if ast.personas.is_empty() {
        report.warn("PERSONA is recommended but not mandatory");
    }
}

fn validate_persona(ast: &ProgramAst, report: &mut ValidationReport) {
    let Some(persona) = ast.primary_persona() else {
        return;
    };
    if persona.description.is_empty() {
        report.error("PERSONA value cannot be empty");
    }
    if persona.description.chars().count() < 3 {
        report.warn("PERSONA value is very short - consider more detail");
    }
}

fn validate_goals(goals: &[Goal], report: &mut ValidationReport) {
    let mut seen = HashSet::new();
    for goal in goals {
        if !seen.insert(goal.name.as_str()) {
            report.error(format!("Duplicate GOAL name: {}", goal.name));
        }
        if !starts_uppercase(&goal.name) {
            report.warn(format!(
                "GOAL name '{}' should start with uppercase (PascalCase)",
                goal.name
            ));
        }
        if goal.description.is_empty() {
            report.error(format!("GOAL {} has empty value", goal.name));
        }
        if !goal
            .description
            .contains(|c: char| matches!(c, '$' | '%' | 'M' | 'K'))
        {
            report.warn(format!(
                "GOAL {} lacks quantifiable metric - consider adding dollar/percentage value",
                goal.name
            ));
        }
    }
}

fn validate_metrics(metrics: &[Metric], report: &mut ValidationReport) {
    let mut seen = HashSet::new();
    for metric in metrics {
        if !seen.insert(metric.name.as_str()) {
            report.error(format!("Duplicate METRIC name: {}", metric.name));
        }
        if !starts_uppercase(&metric.name) {
            report.warn(format!(
                "METRIC name '{}' should start with uppercase (PascalCase)",
                metric.name
            ));
        }
        if metric.value < 0.0 {
            report.warn(format!(
                "METRIC {} has negative value: {}",
                metric.name, metric.value
            ));
        }
        if metric.value > 1.0 && metric.name.contains("Risk") {
            report.warn(format!(
                "METRIC {} appears to be a risk/drift metric but value > 1.0",
                metric.name
            ));
        }
    }
}

fn validate_derived_metrics(ast: &ProgramAst, report: &mut ValidationReport) {
    let metric_names: HashSet<&str> = ast.metrics.iter().map(|m| m.name.as_str()).collect();
    // Derived metrics declared so far, including the one being checked.
    let mut declared: HashSet<&str> = HashSet::new();

    for derived in &ast.derived_metrics {
        if !declared.insert(derived.name.as_str()) {
            report.error(format!("Duplicate RMetric name: {}", derived.name));
        }
        if !starts_uppercase(&derived.name) {
            report.warn(format!(
                "RMetric name '{}' should start with uppercase (PascalCase)",
                derived.name
            ));
        }

        for token in capitalized_tokens(&derived.expression) {
            if is_reserved(token) || metric_names.contains(token) || declared.contains(token) {
                continue;
            }
            report.error(format!(
                "RMetric {} references undefined METRIC: {}",
                derived.name, token
            ));
        }

        // Plain textual containment: `Timeline` inside `TimelineRisk` counts.
        if !derived.name.is_empty() && derived.expression.contains(derived.name.as_str()) {
            report.error(format!(
                "RMetric {} contains circular reference to itself",
                derived.name
            ));
        }
    }
}

fn validate_triggers(ast: &ProgramAst, report: &mut ValidationReport) {
    let metric_names: HashSet<&str> = ast.metrics.iter().map(|m| m.name.as_str()).collect();

    for trigger in &ast.triggers {
        let Some((metric, comparator)) = split_condition(&trigger.condition) else {
            report.error(format!(
                "Invalid trigger condition syntax: {}",
                trigger.condition
            ));
            continue;
        };

        if !metric_names.contains(metric.as_str()) {
            report.error(format!("Trigger references undefined METRIC: {}", metric));
        }
        if !COMPARATORS.contains(&comparator.as_str()) {
            report.error(format!("Invalid comparator '{}' in trigger", comparator));
        }
        if match_rule(Rule::trigger_action, &trigger.action).is_none() {
            report.warn(format!(
                "Action '{}' may have invalid syntax",
                trigger.action
            ));
        }
    }
}

fn validate_variants(variants: &[Variant], report: &mut ValidationReport) {
    for variant in variants {
        if variant.value.is_empty() {
            report.error(format!("VARIANT {} has empty value", variant.kind));
        }
    }
}

fn validate_output(ast: &ProgramAst, report: &mut ValidationReport) {
    // Membership in the closed vocabulary is guaranteed by `OutputKind`.
    let Some(output) = ast.output else {
        return;
    };
    match output {
        OutputKind::MintSite => {
            if ast.personas.is_empty() {
                report.warn("MintSite output works best with PERSONA defined");
            }
            if ast.variants.is_empty() {
                report.warn("MintSite output can use VARIANTs for page variants");
            }
        }
        OutputKind::SmsCampaign if ast.goals.is_empty() => {
            report.warn("SMS_CAMPAIGN output needs GOALs for message content");
        }
        OutputKind::Agent if ast.triggers.is_empty() => {
            report.warn("AGENT output can use triggers for automation logic");
        }
        _ => {}
    }
}

/// Second, weaker pass over formulas: anything that is not a base metric is
/// worth a warning, even when it names another derived metric.
fn sweep_derived_metric_references(ast: &ProgramAst, report: &mut ValidationReport) {
    let metric_names: HashSet<&str> = ast.metrics.iter().map(|m| m.name.as_str()).collect();

    for derived in &ast.derived_metrics {
        for token in capitalized_tokens(&derived.expression) {
            if is_reserved(token) || metric_names.contains(token) {
                continue;
            }
            report.warn(format!(
                "RMetric {} references '{}' which is not a declared METRIC",
                derived.name, token
            ));
        }
    }
}

/// Splits `<ident> <comparator> <number>` into its identifier and comparator.
///
/// The comparator is any run of `<>=!`; whether it is one of
/// [`COMPARATORS`] is checked by the caller.
fn split_condition(condition: &str) -> Option<(String, String)> {
    let pair = match_rule(Rule::trigger_condition, condition)?;
    let mut inner = pair.into_inner();
    let metric = extract(&mut inner, Rule::ident)?;
    let comparator = extract(&mut inner, Rule::comparator)?;
    Some((metric, comparator))
}

fn starts_uppercase(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

fn is_reserved(token: &str) -> bool {
    RESERVED_OPERATORS.contains(&token)
}

/// Maximal runs of word characters (alphanumerics and `_`).
fn word_tokens(expr: &str) -> impl Iterator<Item = &str> {
    expr.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| !w.is_empty())
}

/// Distinct words that start with an ASCII uppercase letter and have at
/// least two characters, in order of first appearance.
fn capitalized_tokens(expr: &str) -> Vec<&str> {
    let mut seen = HashSet::new();
    word_tokens(expr)
        .filter(|w| w.starts_with(|c: char| c.is_ascii_uppercase()) && w.chars().count() >= 2)
        .filter(|w| seen.insert(*w))
        .collect()
}

//! # ROI-DSL Parser
//!
//! This module implements the line-oriented parser for ROI-DSL using the Pest
//! parser generator.
//!
//! ## Overview
//!
//! Source text is split into lines. Each line is trimmed; blank lines and
//! comment lines (`#` or `//`) are skipped. Every remaining line is
//! classified by its leading keyword ([`DirectiveKind::classify`]) and then
//! matched against that directive's grammar rule. Parsing is all-or-nothing:
//! the first bad line aborts the parse and no partial document is returned.
//!
//! ## Error Handling
//!
//! Errors carry the 1-based line number in the input (blank and
//! comment lines are counted) together with the trimmed line text.
//!
//! ## Grammar
//!
//! The per-line grammar is defined in `grammar.pest` using Pest's PEG syntax.

use std::path::Path;

use pest::iterators::{Pair, Pairs};
use pest::Parser;
use pest_derive::Parser;

use crate::ast::*;
use crate::errors::FrontendError;

#[derive(Parser)]
#[grammar = "../grammar.pest"]
pub struct RoiDslParser;

/// Parses ROI-DSL source into a document.
///
/// This is a pure syntactic parser that does not perform semantic validation.
/// Use [`crate::validate::validate_program`] on the result before handing it
/// to downstream consumers.
///
/// # Example
///
/// ```rust
/// use roidsl_frontend::parse_program;
///
/// let ast = parse_program("GOAL Cost: \"Avoid $2M/mo burn\"\nOUTPUT MintSite").unwrap();
/// assert_eq!(ast.goals.len(), 1);
/// ```
pub fn parse_program(source: &str) -> Result<ProgramAst, FrontendError> {
    let mut builder = DocumentBuilder::default();

    for (idx, raw) in source.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || is_comment(line) {
            continue;
        }
        let line_no = idx + 1;
        let directive = parse_directive(line, line_no)?;
        builder.apply(directive);
    }

    let ast = builder.finish();
    #[cfg(feature = "tracing")]
    tracing::debug!(
        personas = ast.personas.len(),
        goals = ast.goals.len(),
        metrics = ast.metrics.len(),
        derived_metrics = ast.derived_metrics.len(),
        triggers = ast.triggers.len(),
        output = ?ast.output,
        "parsed ROI-DSL document"
    );
    Ok(ast)
}

/// Reads a UTF-8 file and parses it with [`parse_program`].
pub fn parse_file(path: impl AsRef<Path>) -> Result<ProgramAst, FrontendError> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|source| FrontendError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_program(&source)
}

/// Parses a single trimmed, non-comment line.
///
/// `line_no` is only used for diagnostics.
pub fn parse_directive(line: &str, line_no: usize) -> Result<Directive, FrontendError> {
    let kind = DirectiveKind::classify(line).ok_or_else(|| FrontendError::UnknownDirective {
        line: line_no,
        text: line.to_string(),
    })?;
    let malformed = || FrontendError::MalformedDirective {
        line: line_no,
        directive: kind,
        text: line.to_string(),
    };

    let pair = RoiDslParser::parse(line_rule(kind), line)
        .map_err(|_| malformed())?
        .next()
        .ok_or_else(malformed)?;

    #[cfg(feature = "tracing")]
    tracing::debug!(line = line_no, directive = %kind, "matched directive");

    let mut inner = pair.into_inner();
    let directive = match kind {
        DirectiveKind::Persona => {
            let (name, description) = keyed_text(&mut inner).ok_or_else(malformed)?;
            Directive::Persona(Persona { name, description })
        }
        DirectiveKind::Goal => {
            let (name, description) = keyed_text(&mut inner).ok_or_else(malformed)?;
            Directive::Goal(Goal { name, description })
        }
        DirectiveKind::Metric => {
            let name = extract(&mut inner, Rule::ident).ok_or_else(malformed)?;
            let value = extract(&mut inner, Rule::number)
                .and_then(|n| n.parse::<f64>().ok())
                .ok_or_else(malformed)?;
            Directive::Metric(Metric { name, value })
        }
        DirectiveKind::RMetric => {
            let (name, expression) = keyed_text(&mut inner).ok_or_else(malformed)?;
            Directive::DerivedMetric(DerivedMetric { name, expression })
        }
        DirectiveKind::When => {
            let condition = extract(&mut inner, Rule::condition).ok_or_else(malformed)?;
            let action = extract(&mut inner, Rule::action).ok_or_else(malformed)?;
            Directive::Trigger(Trigger {
                condition: condition.trim().to_string(),
                action: action.trim().to_string(),
            })
        }
        DirectiveKind::Variant => {
            let (kind, value) = keyed_text(&mut inner).ok_or_else(malformed)?;
            Directive::Variant(Variant { kind, value })
        }
        DirectiveKind::SkTag => {
            let value = extract_string(&mut inner).ok_or_else(malformed)?;
            Directive::Tag(value)
        }
        DirectiveKind::Output => {
            let keyword = extract(&mut inner, Rule::ident).ok_or_else(malformed)?;
            let output =
                OutputKind::from_keyword(&keyword).ok_or_else(|| FrontendError::InvalidOutput {
                    line: line_no,
                    kind: keyword,
                    text: line.to_string(),
                })?;
            Directive::Output(output)
        }
        fact => {
            let table = fact.fact_table().ok_or_else(malformed)?;
            let (key, value) = keyed_text(&mut inner).ok_or_else(malformed)?;
            Directive::Fact { table, key, value }
        }
    };
    Ok(directive)
}

fn is_comment(line: &str) -> bool {
    line.starts_with('#') || line.starts_with("//")
}

fn line_rule(kind: DirectiveKind) -> Rule {
    match kind {
        DirectiveKind::Persona => Rule::persona_line,
        DirectiveKind::Goal => Rule::goal_line,
        DirectiveKind::Metric => Rule::metric_line,
        DirectiveKind::RMetric => Rule::rmetric_line,
        DirectiveKind::When => Rule::trigger_line,
        DirectiveKind::Variant => Rule::variant_line,
        DirectiveKind::Credential => Rule::credential_line,
        DirectiveKind::CaseStudy => Rule::case_study_line,
        DirectiveKind::Service => Rule::service_line,
        DirectiveKind::Training => Rule::training_line,
        DirectiveKind::VroiInput => Rule::vroi_input_line,
        DirectiveKind::VroiOutput => Rule::vroi_output_line,
        DirectiveKind::Stat => Rule::stat_line,
        DirectiveKind::MicroTraining => Rule::microtraining_line,
        DirectiveKind::Seo => Rule::seo_line,
        DirectiveKind::Contact => Rule::contact_line,
        DirectiveKind::SkTag => Rule::sk_tag_line,
        DirectiveKind::Output => Rule::output_line,
    }
}

/// Helper to extract a string literal without quotes
fn unquote_string(s: &str) -> String {
    s.trim_matches('"').to_string()
}

/// Helper to extract the text of the first pair of the given rule
pub(crate) fn extract(iter: &mut Pairs<Rule>, rule: Rule) -> Option<String> {
    iter.find(|p| p.as_rule() == rule)
        .map(|p| p.as_str().to_string())
}

/// Helper to extract the first string literal from an iterator
fn extract_string(iter: &mut Pairs<Rule>) -> Option<String> {
    iter.find(|p| p.as_rule() == Rule::string)
        .map(|p| unquote_string(p.as_str()))
}

/// `<Id>: "<text>"` and the prefixed `SEO_<Field>: "<text>"` forms.
fn keyed_text(iter: &mut Pairs<Rule>) -> Option<(String, String)> {
    let key = extract(iter, Rule::ident)?;
    let value = extract_string(iter)?;
    Some((key, value))
}

/// Matches `source` against a single grammar rule, returning the top pair.
pub(crate) fn match_rule(rule: Rule, source: &str) -> Option<Pair<'_, Rule>> {
    RoiDslParser::parse(rule, source).ok()?.next()
}

/// Accumulates directives into a fresh document.
///
/// The document only leaves the builder through [`DocumentBuilder::finish`],
/// so callers never observe a partially built AST.
#[derive(Debug, Default)]
struct DocumentBuilder {
    ast: ProgramAst,
}

impl DocumentBuilder {
    fn apply(&mut self, directive: Directive) {
        match directive {
            Directive::Persona(p) => self.ast.personas.push(p),
            Directive::Goal(g) => self.ast.goals.push(g),
            Directive::Metric(m) => self.ast.metrics.push(m),
            Directive::DerivedMetric(d) => self.ast.derived_metrics.push(d),
            Directive::Trigger(t) => self.ast.triggers.push(t),
            Directive::Variant(v) => self.ast.variants.push(v),
            Directive::Fact { table, key, value } => {
                // Last write wins; the key keeps its first position.
                self.ast.fact_table_mut(table).insert(key, value);
            }
            Directive::Tag(tag) => self.ast.sk_tags.push(tag),
            Directive::Output(kind) => self.ast.output = Some(kind),
        }
    }

    fn finish(self) -> ProgramAst {
        self.ast
    }
}

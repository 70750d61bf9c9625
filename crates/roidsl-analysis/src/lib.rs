//! # ROI-DSL Analysis
//!
//! Heuristic business-value insights over a finished ROI-DSL document:
//! primary goal selection, risk scoring, urgency classification, dollar
//! extraction and completeness scoring.
//!
//! Everything here is keyword matching over the AST's free text. The analysis
//! never mutates the document and never fails; run it on documents that
//! passed [`roidsl_frontend::validate_program`].

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use roidsl_frontend::ast::{Goal, OutputKind, ProgramAst};

/// Goal wording that marks cost avoidance, checked when picking the primary goal.
const PRIMARY_GOAL_WORDS: [&str; 4] = ["avoid", "save", "reduce", "prevent"];

/// Metric name fragments that mark a metric as risk-like.
const RISK_METRIC_WORDS: [&str; 4] = ["risk", "drift", "delay", "variance"];

/// Goal markers for a high-cost exposure.
const HIGH_COST_MARKERS: [&str; 4] = ["$", "M/", "million", "delay"];

const PAIN_WORDS: [&str; 10] = [
    "avoid", "prevent", "reduce", "eliminate", "fix", "stop", "control", "regain", "restore",
    "recover",
];

/// `$2M`, `$1.8 M`, `$500K`
static DOLLAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$(\d+\.?\d*)\s*([MK])").expect("valid dollar pattern"));

/// Urgency derived from the risk score and high-cost goals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum Urgency {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Urgency::Low => "LOW",
            Urgency::Medium => "MEDIUM",
            Urgency::High => "HIGH",
            Urgency::Critical => "CRITICAL",
        };
        f.write_str(s)
    }
}

/// Bundled result of [`Analyzer::analyze`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Analysis {
    /// `"<name>: <description>"` of the primary persona
    pub persona: String,
    /// `"<name>: <description>"` of the primary goal
    pub primary_goal: Option<String>,
    pub secondary_goals: Vec<String>,
    pub risk_score: f64,
    pub urgency: Urgency,
    pub value_proposition: Option<String>,
    pub automation_triggers: usize,
    pub output: Option<OutputKind>,
    /// 0.0 to 1.0
    pub completeness: f64,
}

/// Read-only view over a document that computes heuristics on demand.
#[derive(Debug, Clone, Copy)]
pub struct Analyzer<'a> {
    ast: &'a ProgramAst,
}

impl<'a> Analyzer<'a> {
    pub fn new(ast: &'a ProgramAst) -> Self {
        Self { ast }
    }

    pub fn analyze(&self) -> Analysis {
        Analysis {
            persona: self.persona_summary(),
            primary_goal: self.primary_goal().map(goal_label),
            secondary_goals: self.secondary_goals().into_iter().map(goal_label).collect(),
            risk_score: self.risk_score(),
            urgency: self.urgency(),
            value_proposition: self.value_proposition().map(str::to_string),
            automation_triggers: self.ast.triggers.len(),
            output: self.ast.output,
            completeness: self.completeness(),
        }
    }

    pub fn persona_summary(&self) -> String {
        match self.ast.primary_persona() {
            Some(p) => format!("{}: {}", p.name, p.description),
            None => "No persona defined".to_string(),
        }
    }

    /// First cost-avoidance goal, else the first goal.
    pub fn primary_goal(&self) -> Option<&'a Goal> {
        self.ast
            .goals
            .iter()
            .find(|g| contains_any(&g.description.to_lowercase(), &PRIMARY_GOAL_WORDS))
            .or_else(|| self.ast.goals.first())
    }

    /// Goals other than the primary one, compared by name.
    pub fn secondary_goals(&self) -> Vec<&'a Goal> {
        if self.ast.goals.len() <= 1 {
            return Vec::new();
        }
        let Some(primary) = self.primary_goal() else {
            return Vec::new();
        };
        self.ast
            .goals
            .iter()
            .filter(|g| g.name != primary.name)
            .collect()
    }

    /// Mean of risk-like metrics, or of all metrics when none look risk-like.
    pub fn risk_score(&self) -> f64 {
        if self.ast.metrics.is_empty() {
            return 0.0;
        }
        let risky: Vec<f64> = self
            .ast
            .metrics
            .iter()
            .filter(|m| contains_any(&m.name.to_lowercase(), &RISK_METRIC_WORDS))
            .map(|m| m.value)
            .collect();
        let values = if risky.is_empty() {
            self.ast.metrics.iter().map(|m| m.value).collect()
        } else {
            risky
        };
        round2(values.iter().sum::<f64>() / values.len() as f64)
    }

    pub fn urgency(&self) -> Urgency {
        let risk = self.risk_score();
        let high_cost = self
            .ast
            .goals
            .iter()
            .any(|g| contains_any(&g.description, &HIGH_COST_MARKERS));

        if risk > 0.6 && high_cost {
            Urgency::Critical
        } else if risk > 0.5 || high_cost {
            Urgency::High
        } else if risk > 0.3 {
            Urgency::Medium
        } else {
            Urgency::Low
        }
    }

    /// First goal mentioning a dollar amount, else the first goal.
    pub fn value_proposition(&self) -> Option<&'a str> {
        self.ast
            .goals
            .iter()
            .find(|g| g.description.contains('$'))
            .or_else(|| self.ast.goals.first())
            .map(|g| g.description.as_str())
    }

    /// Weighted checklist of optional sections, normalised to 0.0..=1.0.
    pub fn completeness(&self) -> f64 {
        const TOTAL_CHECKS: f64 = 7.0;
        let ast = self.ast;
        let checks = [
            (!ast.personas.is_empty(), 1.0),
            (!ast.goals.is_empty(), 1.0),
            (ast.goals.len() >= 2, 0.5),
            (!ast.metrics.is_empty(), 1.0),
            (!ast.derived_metrics.is_empty(), 0.5),
            (!ast.triggers.is_empty(), 1.0),
            (!ast.variants.is_empty(), 0.5),
            (ast.output.is_some(), 1.0),
        ];
        let score: f64 = checks
            .iter()
            .filter(|(hit, _)| *hit)
            .map(|(_, weight)| weight)
            .sum();
        round2(score / TOTAL_CHECKS)
    }

    /// Dollar amounts such as `$2M` or `$500K` found in goal descriptions.
    pub fn dollar_values(&self) -> Vec<f64> {
        self.ast
            .goals
            .iter()
            .flat_map(|g| DOLLAR_RE.captures_iter(&g.description))
            .filter_map(|caps| {
                let amount: f64 = caps[1].parse().ok()?;
                let multiplier = if &caps[2] == "M" { 1_000_000.0 } else { 1_000.0 };
                Some(amount * multiplier)
            })
            .collect()
    }

    pub fn total_value(&self) -> f64 {
        self.dollar_values().iter().sum()
    }

    /// Goal descriptions that read as pain points.
    pub fn pain_points(&self) -> Vec<&'a str> {
        self.ast
            .goals
            .iter()
            .filter(|g| contains_any(&g.description.to_lowercase(), &PAIN_WORDS))
            .map(|g| g.description.as_str())
            .collect()
    }

    /// Hints for making the document more useful to downstream renderers.
    pub fn suggestions(&self) -> Vec<&'static str> {
        let ast = self.ast;
        let mut out = Vec::new();
        if ast.personas.is_empty() {
            out.push("Add PERSONA to better target messaging");
        }
        if ast.goals.len() < 2 {
            out.push("Add secondary goals for richer value narrative");
        }
        if ast.metrics.len() < 2 {
            out.push("Add more metrics for better risk assessment");
        }
        if ast.derived_metrics.is_empty() {
            out.push("Add RMetrics to compute composite scores");
        }
        if ast.triggers.is_empty() {
            out.push("Add WHEN/THEN triggers for automation");
        }
        if ast.variants.is_empty() {
            out.push("Add VARIANTs for A/B testing different messaging");
        }
        if self.dollar_values().is_empty() {
            out.push("Add quantified dollar values to goals for stronger impact");
        }
        out
    }

    /// Human-readable multi-line report.
    pub fn summary(&self) -> String {
        let a = self.analyze();
        let mut lines = vec![
            "=== ROI-DSL Analysis Summary ===".to_string(),
            String::new(),
            format!("Persona: {}", a.persona),
            format!(
                "Primary Goal: {}",
                a.primary_goal.as_deref().unwrap_or("No goals defined")
            ),
        ];
        if !a.secondary_goals.is_empty() {
            lines.push(format!("Secondary Goals: {}", a.secondary_goals.len()));
        }
        lines.push(String::new());
        lines.push(format!("Risk Score: {}", a.risk_score));
        lines.push(format!("Urgency Level: {}", a.urgency));
        lines.push(format!(
            "Value Proposition: {}",
            a.value_proposition
                .as_deref()
                .unwrap_or("No value proposition defined")
        ));
        if a.automation_triggers > 0 {
            lines.push(String::new());
            lines.push(format!(
                "Automation: {} trigger(s) defined",
                a.automation_triggers
            ));
        }
        lines.push(String::new());
        lines.push(format!(
            "Output Type: {}",
            a.output.map_or("None", OutputKind::as_str)
        ));
        lines.push(format!(
            "Completeness: {}%",
            (a.completeness * 100.0).round() as i64
        ));
        lines.join("\n")
    }
}

fn goal_label(goal: &Goal) -> String {
    format!("{}: {}", goal.name, goal.description)
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

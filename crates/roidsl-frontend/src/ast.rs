//! # Abstract Syntax Tree
//!
//! This module defines the document produced by one successful parse of an
//! ROI-DSL source file.
//!
//! ## Structure
//!
//! A document consists of:
//! - **Personas**: who the value model is written for (the first is primary)
//! - **Goals**: named business outcomes, in declaration order
//! - **Metrics**: named numeric inputs
//! - **Derived metrics** (`RMetric`): named formulas over metrics, kept as text
//! - **Triggers**: `WHEN <condition> THEN <action>` pairs
//! - **Variants**: tagged content alternatives (Hero, CTA, ...)
//! - **Fact tables**: keyed free-text sections (credentials, stats, SEO, ...)
//! - **Tags**: an append-only list of `SK_TAG` strings
//! - **Output**: the single declared rendering target
//!
//! Formulas, conditions and actions are stored verbatim. The AST carries no
//! evaluation semantics; the validator only checks that identifiers resolve.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;

use crate::errors::UnknownOutputKind;

/// Keyed free-text section. Iterates in first-insertion order; inserting an
/// existing key replaces its value in place.
pub type FactTable = IndexMap<String, String>;

/// Comma-separated OUTPUT vocabulary, in declaration order.
pub const OUTPUT_VOCABULARY: &str = "SMS_CAMPAIGN, AGENT, RMetrics, vROI, MintSite, SK_SKILL";

/// The root of a parsed ROI-DSL document.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProgramAst {
    /// All personas in declaration order; the first one is primary
    pub personas: Vec<Persona>,
    /// Goals in declaration order
    pub goals: Vec<Goal>,
    /// Base metrics in declaration order
    pub metrics: Vec<Metric>,
    /// Derived metrics (`RMetric`) in declaration order
    pub derived_metrics: Vec<DerivedMetric>,
    /// Triggers in declaration order
    pub triggers: Vec<Trigger>,
    /// Content variants in declaration order
    pub variants: Vec<Variant>,
    /// `CREDENTIAL <Key>: "..."`
    pub credentials: FactTable,
    /// `CASE_STUDY <Key>: "..."`
    pub case_studies: FactTable,
    /// `SERVICE <Key>: "..."`
    pub services: FactTable,
    /// `TRAINING <Key>: "..."`
    pub training: FactTable,
    /// `VROI_INPUT <Key>: "..."` field labels
    pub vroi_inputs: FactTable,
    /// `VROI_OUTPUT <Key>: "..."` field labels
    pub vroi_outputs: FactTable,
    /// `STAT <Key>: "..."`
    pub stats: FactTable,
    /// `MICROTRAINING <Key>: "..."`
    pub microtraining: FactTable,
    /// `SEO_<Field>: "..."`, keyed by `<Field>`
    pub seo: FactTable,
    /// `CONTACT_<Field>: "..."`, keyed by `<Field>`
    pub contact: FactTable,
    /// `SK_TAG: "..."` values, duplicates kept
    pub sk_tags: Vec<String>,
    /// Declared output intent; a later declaration overwrites an earlier one
    pub output: Option<OutputKind>,
}

impl ProgramAst {
    /// The first declared persona.
    pub fn primary_persona(&self) -> Option<&Persona> {
        self.personas.first()
    }

    /// Metric values by name. Later duplicates shadow earlier ones.
    pub fn metrics_map(&self) -> HashMap<&str, f64> {
        self.metrics
            .iter()
            .map(|m| (m.name.as_str(), m.value))
            .collect()
    }

    /// Goal descriptions by name. Later duplicates shadow earlier ones.
    pub fn goals_map(&self) -> HashMap<&str, &str> {
        self.goals
            .iter()
            .map(|g| (g.name.as_str(), g.description.as_str()))
            .collect()
    }

    pub fn metric(&self, name: &str) -> Option<&Metric> {
        self.metrics.iter().find(|m| m.name == name)
    }

    pub fn derived_metric(&self, name: &str) -> Option<&DerivedMetric> {
        self.derived_metrics.iter().find(|m| m.name == name)
    }

    /// First variant of the given kind, which is the one renderers use.
    pub fn first_variant(&self, kind: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.kind == kind)
    }

    /// All variants of the given kind, in declaration order.
    pub fn variants_of<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a Variant> + 'a {
        self.variants.iter().filter(move |v| v.kind == kind)
    }

    pub fn fact_table(&self, kind: FactTableKind) -> &FactTable {
        match kind {
            FactTableKind::Credentials => &self.credentials,
            FactTableKind::CaseStudies => &self.case_studies,
            FactTableKind::Services => &self.services,
            FactTableKind::Training => &self.training,
            FactTableKind::VroiInputs => &self.vroi_inputs,
            FactTableKind::VroiOutputs => &self.vroi_outputs,
            FactTableKind::Stats => &self.stats,
            FactTableKind::MicroTraining => &self.microtraining,
            FactTableKind::Seo => &self.seo,
            FactTableKind::Contact => &self.contact,
        }
    }

    pub(crate) fn fact_table_mut(&mut self, kind: FactTableKind) -> &mut FactTable {
        match kind {
            FactTableKind::Credentials => &mut self.credentials,
            FactTableKind::CaseStudies => &mut self.case_studies,
            FactTableKind::Services => &mut self.services,
            FactTableKind::Training => &mut self.training,
            FactTableKind::VroiInputs => &mut self.vroi_inputs,
            FactTableKind::VroiOutputs => &mut self.vroi_outputs,
            FactTableKind::Stats => &mut self.stats,
            FactTableKind::MicroTraining => &mut self.microtraining,
            FactTableKind::Seo => &mut self.seo,
            FactTableKind::Contact => &mut self.contact,
        }
    }
}

/// `PERSONA <Name>: "<description>"`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Persona {
    pub name: String,
    pub description: String,
}

/// `GOAL <Name>: "<description>"`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Goal {
    pub name: String,
    pub description: String,
}

/// `METRIC <Name>: <number>`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Metric {
    pub name: String,
    pub value: f64,
}

/// `RMetric <Name>: "<expression>"`
///
/// The expression is opaque text, e.g. `"TimelineRisk * 1.2 + VendorDrift"`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DerivedMetric {
    pub name: String,
    pub expression: String,
}

/// `WHEN <condition> THEN <action>`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trigger {
    /// Expected shape: `<metric> <comparator> <threshold>`
    pub condition: String,
    /// Expected shape: `name("arg")`; never executed here
    pub action: String,
}

/// `VARIANT <Kind>: "<value>"`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Variant {
    /// Free-form tag such as `Hero`, `Resume` or `CTA`
    pub kind: String,
    pub value: String,
}

/// The closed set of rendering targets accepted by `OUTPUT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OutputKind {
    #[cfg_attr(feature = "serde", serde(rename = "SMS_CAMPAIGN"))]
    SmsCampaign,
    #[cfg_attr(feature = "serde", serde(rename = "AGENT"))]
    Agent,
    #[cfg_attr(feature = "serde", serde(rename = "RMetrics"))]
    RMetrics,
    #[cfg_attr(feature = "serde", serde(rename = "vROI"))]
    VRoi,
    #[cfg_attr(feature = "serde", serde(rename = "MintSite"))]
    MintSite,
    #[cfg_attr(feature = "serde", serde(rename = "SK_SKILL"))]
    SkSkill,
}

impl OutputKind {
    pub const ALL: [OutputKind; 6] = [
        OutputKind::SmsCampaign,
        OutputKind::Agent,
        OutputKind::RMetrics,
        OutputKind::VRoi,
        OutputKind::MintSite,
        OutputKind::SkSkill,
    ];

    /// Source spelling of the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            OutputKind::SmsCampaign => "SMS_CAMPAIGN",
            OutputKind::Agent => "AGENT",
            OutputKind::RMetrics => "RMetrics",
            OutputKind::VRoi => "vROI",
            OutputKind::MintSite => "MintSite",
            OutputKind::SkSkill => "SK_SKILL",
        }
    }

    /// Case-sensitive lookup by source spelling.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == keyword)
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputKind {
    type Err = UnknownOutputKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_keyword(s).ok_or_else(|| UnknownOutputKind(s.to_string()))
    }
}

/// Which fact table a keyed directive writes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FactTableKind {
    Credentials,
    CaseStudies,
    Services,
    Training,
    VroiInputs,
    VroiOutputs,
    Stats,
    MicroTraining,
    Seo,
    Contact,
}

/// Directive keywords, one per recognized line form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectiveKind {
    Persona,
    Goal,
    Metric,
    RMetric,
    When,
    Variant,
    Credential,
    CaseStudy,
    Service,
    Training,
    VroiInput,
    VroiOutput,
    Stat,
    MicroTraining,
    Seo,
    Contact,
    SkTag,
    Output,
}

impl DirectiveKind {
    /// Keywords in dispatch priority order. No keyword is a prefix of another.
    pub const DISPATCH_ORDER: [DirectiveKind; 18] = [
        DirectiveKind::Persona,
        DirectiveKind::Goal,
        DirectiveKind::Metric,
        DirectiveKind::RMetric,
        DirectiveKind::When,
        DirectiveKind::Variant,
        DirectiveKind::Credential,
        DirectiveKind::CaseStudy,
        DirectiveKind::Service,
        DirectiveKind::Training,
        DirectiveKind::VroiInput,
        DirectiveKind::VroiOutput,
        DirectiveKind::Stat,
        DirectiveKind::MicroTraining,
        DirectiveKind::Seo,
        DirectiveKind::Contact,
        DirectiveKind::SkTag,
        DirectiveKind::Output,
    ];

    /// The literal prefix a line must start with.
    pub fn keyword(self) -> &'static str {
        match self {
            DirectiveKind::Persona => "PERSONA",
            DirectiveKind::Goal => "GOAL",
            DirectiveKind::Metric => "METRIC",
            DirectiveKind::RMetric => "RMetric",
            DirectiveKind::When => "WHEN",
            DirectiveKind::Variant => "VARIANT",
            DirectiveKind::Credential => "CREDENTIAL",
            DirectiveKind::CaseStudy => "CASE_STUDY",
            DirectiveKind::Service => "SERVICE",
            DirectiveKind::Training => "TRAINING",
            DirectiveKind::VroiInput => "VROI_INPUT",
            DirectiveKind::VroiOutput => "VROI_OUTPUT",
            DirectiveKind::Stat => "STAT",
            DirectiveKind::MicroTraining => "MICROTRAINING",
            DirectiveKind::Seo => "SEO_",
            DirectiveKind::Contact => "CONTACT_",
            DirectiveKind::SkTag => "SK_TAG",
            DirectiveKind::Output => "OUTPUT",
        }
    }

    /// Classifies a trimmed line by its leading keyword. First match wins.
    pub fn classify(line: &str) -> Option<Self> {
        Self::DISPATCH_ORDER
            .into_iter()
            .find(|kind| line.starts_with(kind.keyword()))
    }

    /// Target table for keyed fact directives.
    pub fn fact_table(self) -> Option<FactTableKind> {
        match self {
            DirectiveKind::Credential => Some(FactTableKind::Credentials),
            DirectiveKind::CaseStudy => Some(FactTableKind::CaseStudies),
            DirectiveKind::Service => Some(FactTableKind::Services),
            DirectiveKind::Training => Some(FactTableKind::Training),
            DirectiveKind::VroiInput => Some(FactTableKind::VroiInputs),
            DirectiveKind::VroiOutput => Some(FactTableKind::VroiOutputs),
            DirectiveKind::Stat => Some(FactTableKind::Stats),
            DirectiveKind::MicroTraining => Some(FactTableKind::MicroTraining),
            DirectiveKind::Seo => Some(FactTableKind::Seo),
            DirectiveKind::Contact => Some(FactTableKind::Contact),
            _ => None,
        }
    }
}

impl fmt::Display for DirectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectiveKind::When => f.write_str("WHEN/THEN"),
            DirectiveKind::Seo => f.write_str("SEO"),
            DirectiveKind::Contact => f.write_str("CONTACT"),
            other => f.write_str(other.keyword()),
        }
    }
}

/// One successfully parsed source line.
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    Persona(Persona),
    Goal(Goal),
    Metric(Metric),
    DerivedMetric(DerivedMetric),
    Trigger(Trigger),
    Variant(Variant),
    Fact {
        table: FactTableKind,
        key: String,
        value: String,
    },
    Tag(String),
    Output(OutputKind),
}

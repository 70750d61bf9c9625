//! Error types for parsing and validation.

use std::path::PathBuf;

use thiserror::Error;

use crate::ast::{DirectiveKind, OUTPUT_VOCABULARY};

/// Errors that can occur while reading, parsing, or accepting a document.
///
/// The first three variants are syntax errors: they abort the parse and carry
/// the 1-based source line plus the offending (trimmed) line text.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum FrontendError {
    /// A significant line starts with no known directive keyword.
    #[error("syntax error at line {line}: unknown directive: {text}")]
    UnknownDirective { line: usize, text: String },

    /// A line starts with a known keyword but does not match its grammar.
    #[error("syntax error at line {line}: invalid {directive} syntax: {text}")]
    MalformedDirective {
        line: usize,
        directive: DirectiveKind,
        text: String,
    },

    /// `OUTPUT` names a kind outside the closed vocabulary.
    #[error(
        "syntax error at line {line}: invalid OUTPUT type '{kind}' in '{text}'. Must be one of: {vocabulary}",
        vocabulary = OUTPUT_VOCABULARY
    )]
    InvalidOutput {
        line: usize,
        kind: String,
        text: String,
    },

    /// The validator reported at least one error.
    #[error("validation failed with {} error(s): {}", .errors.len(), .errors.join("; "))]
    Validation { errors: Vec<String> },

    /// The source file could not be read.
    #[error("failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FrontendError {
    /// Returns true for errors raised by the parser.
    pub fn is_syntax(&self) -> bool {
        matches!(
            self,
            Self::UnknownDirective { .. } | Self::MalformedDirective { .. } | Self::InvalidOutput { .. }
        )
    }

    /// 1-based source line of a syntax error.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::UnknownDirective { line, .. }
            | Self::MalformedDirective { line, .. }
            | Self::InvalidOutput { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// Offending line text of a syntax error.
    pub fn source_text(&self) -> Option<&str> {
        match self {
            Self::UnknownDirective { text, .. }
            | Self::MalformedDirective { text, .. }
            | Self::InvalidOutput { text, .. } => Some(text),
            _ => None,
        }
    }
}

/// Returned by `OutputKind::from_str` for a kind outside the vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid OUTPUT type '{0}'. Must be one of: {vocabulary}", vocabulary = OUTPUT_VOCABULARY)]
pub struct UnknownOutputKind(pub String);

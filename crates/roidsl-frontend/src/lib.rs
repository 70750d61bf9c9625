//! # ROI-DSL Frontend
//!
//! Parser, AST, and validation for the ROI-DSL value-framework language.
//!
//! ```rust
//! let src = r#"
//! GOAL Cost: "Avoid $2M/mo burn"
//! METRIC Risk: 0.7
//! OUTPUT MintSite
//! "#;
//! let (ast, report) = roidsl_frontend::parse_and_validate(src).unwrap();
//! assert_eq!(ast.goals[0].name, "Cost");
//! assert!(report.warnings.iter().any(|w| w.contains("PERSONA")));
//! ```

pub mod ast;
pub mod errors;
pub mod parser;
pub mod validate;

// Re-export commonly used types
pub use ast::*;
pub use errors::FrontendError;
pub use parser::{parse_file, parse_program};
pub use validate::{validate_program, ValidationReport};

/// Parse and validate an ROI-DSL document.
///
/// Syntax errors and validation errors both come back as `Err`. On success the
/// report is returned alongside the AST so callers can surface warnings.
pub fn parse_and_validate(source: &str) -> Result<(ProgramAst, ValidationReport), FrontendError> {
    let ast = parse_program(source)?;
    let report = validate_program(&ast).into_result()?;
    Ok((ast, report))
}

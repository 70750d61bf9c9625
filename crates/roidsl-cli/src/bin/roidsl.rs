//! ROI-DSL CLI - Command-line interface for the ROI-DSL value-framework language
//!
//! Usage:
//!   roidsl <file>                       # Validate a .roi file
//!   roidsl <file> --analyze             # Validate and print business-value analysis
//!   roidsl <file> -o json --analyze     # Output AST and analysis as JSON
//!   roidsl <file> --strict              # Treat warnings as failures

use clap::{Parser, ValueEnum};
use roidsl_analysis::Analyzer;
use roidsl_frontend::{parse_file, validate_program, ProgramAst, ValidationReport};
use serde_json::json;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "roidsl")]
#[command(version)]
#[command(about = "ROI-DSL - value-framework language CLI")]
#[command(long_about = "Parse and validate ROI-DSL documents describing personas, goals, metrics and triggers")]
struct Cli {
    /// Input .roi file
    #[arg(value_name = "FILE")]
    file: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Summary, value_name = "FORMAT")]
    output: OutputFormat,

    /// Also run the business-value analysis
    #[arg(short, long)]
    analyze: bool,

    /// Fail when the validator reports warnings
    #[arg(long)]
    strict: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Summary,
    Json,
    Debug,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let program = match parse_file(&cli.file) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Parse error: {}", e);
            process::exit(1);
        }
    };

    let report = validate_program(&program);
    for warning in &report.warnings {
        eprintln!("warning: {}", warning);
    }
    if !report.is_valid() {
        for error in &report.errors {
            eprintln!("error: {}", error);
        }
        eprintln!(
            "Validation failed with {} error(s)",
            report.errors.len()
        );
        process::exit(1);
    }
    tracing::debug!(file = %cli.file, warnings = report.warnings.len(), "document accepted");

    match cli.output {
        OutputFormat::Json => {
            let mut value = json!({
                "ast": &program,
                "warnings": &report.warnings,
            });
            if cli.analyze {
                value["analysis"] = json!(Analyzer::new(&program).analyze());
            }
            match serde_json::to_string_pretty(&value) {
                Ok(out) => println!("{}", out),
                Err(e) => {
                    eprintln!("Error serializing to JSON: {}", e);
                    process::exit(1);
                }
            }
        }
        OutputFormat::Debug => {
            println!("{:#?}", program);
            if cli.analyze {
                println!("{:#?}", Analyzer::new(&program).analyze());
            }
        }
        OutputFormat::Summary => {
            print_summary(&cli.file, &program, &report);
            if cli.analyze {
                println!("\n{}", Analyzer::new(&program).summary());
            }
        }
    }

    if cli.strict && !report.warnings.is_empty() {
        eprintln!(
            "Strict mode: {} warning(s) treated as errors",
            report.warnings.len()
        );
        process::exit(1);
    }
}

fn print_summary(file: &str, program: &ProgramAst, report: &ValidationReport) {
    println!("✓ '{}' validated successfully", file);
    if !report.warnings.is_empty() {
        println!("  ({} warning(s))", report.warnings.len());
    }
    println!();

    let counts = [
        ("Personas", program.personas.len()),
        ("Goals", program.goals.len()),
        ("Metrics", program.metrics.len()),
        ("RMetrics", program.derived_metrics.len()),
        ("Triggers", program.triggers.len()),
        ("Variants", program.variants.len()),
    ];
    for (label, n) in counts {
        if n > 0 {
            println!("{:<10} {}", format!("{}:", label), n);
        }
    }

    match program.output {
        Some(kind) => println!("\nOutput: {}", kind),
        None => println!("\nOutput: none declared"),
    }
}

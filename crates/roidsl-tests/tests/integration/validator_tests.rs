use roidsl_frontend::{parse_and_validate, parse_program, validate_program, FrontendError};

#[test]
fn minimal_document_is_valid_with_persona_warning() {
    let src = "GOAL Cost: \"Avoid $2M/mo burn\"\nMETRIC Risk: 0.7\nOUTPUT MintSite";
    let ast = parse_program(src).expect("parse");
    let report = validate_program(&ast);
    assert!(report.is_valid(), "unexpected errors: {:?}", report.errors);
    assert!(report
        .warnings
        .iter()
        .any(|w| w == "PERSONA is recommended but not mandatory"));
}

#[test]
fn missing_goal_and_undefined_reference() {
    let src = "METRIC Risk: 0.7\nRMetric Health: \"Risk * 1.2 + Unknown\"\nOUTPUT AGENT";
    let ast = parse_program(src).expect("parse");
    let report = validate_program(&ast);
    assert!(!report.is_valid());
    assert!(report
        .errors
        .contains(&"At least 1 GOAL is required".to_string()));
    assert!(report
        .errors
        .contains(&"RMetric Health references undefined METRIC: Unknown".to_string()));
}

#[test]
fn cns_trial_fixture_is_valid() {
    let (ast, report) =
        parse_and_validate(include_str!("../../fixtures/cns_trial.roi")).expect("valid fixture");
    assert_eq!(ast.derived_metrics.len(), 2);
    assert!(report.errors.is_empty());
    // Exposure builds on another derived metric, which the sweep flags.
    assert_eq!(
        report.warnings,
        vec!["RMetric Exposure references 'StudyHealth' which is not a declared METRIC"]
    );
}

#[test]
fn agent_fixture_is_valid() {
    let (ast, report) =
        parse_and_validate(include_str!("../../fixtures/sdr_agent.roi")).expect("valid fixture");
    assert_eq!(ast.triggers.len(), 1);
    assert_eq!(
        report.warnings,
        vec!["PERSONA is recommended but not mandatory"]
    );
}

#[test]
fn duplicate_metric_reported_once() {
    let mut src = String::from("GOAL Cost: \"Save $1M\"\nOUTPUT AGENT\n");
    for i in 0..20 {
        src.push_str(&format!("METRIC M{}: 0.{}\n", i, i % 10));
    }
    src.push_str("METRIC M7: 0.9\n");
    let report = validate_program(&parse_program(&src).expect("parse"));
    let duplicates: Vec<&String> = report
        .errors
        .iter()
        .filter(|e| e.starts_with("Duplicate METRIC name"))
        .collect();
    assert_eq!(duplicates, vec!["Duplicate METRIC name: M7"]);
}

#[test]
fn trigger_checks() {
    let src = concat!(
        "GOAL Cost: \"Save $1M\"\n",
        "METRIC Risk: 0.4\n",
        "WHEN Risk => 0.5 THEN escalate(\"a\")\n",
        "WHEN Missing > 1 THEN escalate(\"a\")\n",
        "WHEN Risk is high THEN escalate(\"a\")\n",
        "WHEN Risk < 0.2 THEN page the team\n",
        "OUTPUT AGENT\n",
    );
    let report = validate_program(&parse_program(src).expect("parse"));
    assert_eq!(
        report.errors,
        vec![
            "Invalid comparator '=>' in trigger",
            "Trigger references undefined METRIC: Missing",
            "Invalid trigger condition syntax: Risk is high",
        ]
    );
    assert!(report
        .warnings
        .contains(&"Action 'page the team' may have invalid syntax".to_string()));
}

#[test]
fn validation_errors_surface_through_parse_and_validate() {
    let err = parse_and_validate("METRIC Risk: 0.7").unwrap_err();
    match err {
        FrontendError::Validation { errors } => {
            assert_eq!(
                errors,
                vec!["At least 1 GOAL is required", "OUTPUT declaration is required"]
            );
        }
        other => panic!("expected Validation, got {other:?}"),
    }
}

#[test]
fn syntax_errors_surface_before_validation() {
    let err = parse_and_validate("OUTPUT Widget").unwrap_err();
    assert!(err.is_syntax());
    assert_eq!(err.line(), Some(1));
}

#[test]
fn validation_does_not_mutate_document() {
    let ast = parse_program(include_str!("../../fixtures/cns_trial.roi")).expect("parse");
    let before = ast.clone();
    let first = validate_program(&ast);
    let second = validate_program(&ast);
    assert_eq!(ast, before);
    assert_eq!(first, second);
}

#[test]
fn derived_metric_named_inside_its_formula_is_circular() {
    let src = concat!(
        "GOAL Cost: \"Avoid $2M\"\n",
        "METRIC TimelineRisk: 0.5\n",
        "RMetric Timeline: \"TimelineRisk * 2\"\n",
        "OUTPUT AGENT\n",
    );
    let report = validate_program(&parse_program(src).expect("parse"));
    assert_eq!(
        report.errors,
        vec!["RMetric Timeline contains circular reference to itself"]
    );
}

use roidsl_frontend::{parse_program, DirectiveKind, FactTableKind, FrontendError, OutputKind};

#[test]
fn parses_minimal_document() {
    let src = "GOAL Cost: \"Avoid $2M/mo burn\"\nMETRIC Risk: 0.7\nOUTPUT MintSite";
    let ast = parse_program(src).expect("parse minimal document");
    assert_eq!(ast.goals.len(), 1);
    assert_eq!(ast.goals[0].name, "Cost");
    assert_eq!(ast.goals[0].description, "Avoid $2M/mo burn");
    assert_eq!(ast.metrics.len(), 1);
    assert_eq!(ast.metrics[0].name, "Risk");
    assert_eq!(ast.metrics[0].value, 0.7);
    assert_eq!(ast.output, Some(OutputKind::MintSite));
}

#[test]
fn parses_cns_trial_fixture() {
    let src = include_str!("../../fixtures/cns_trial.roi");
    let ast = parse_program(src).expect("parse");

    assert_eq!(ast.personas.len(), 2);
    assert_eq!(ast.primary_persona().unwrap().name, "Sponsor");

    let goals: Vec<&str> = ast.goals.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(goals, vec!["DelayCost", "Enrollment", "Vendors"]);

    assert_eq!(ast.metric("ActiveSites").unwrap().value, 40.0);
    assert_eq!(
        ast.derived_metric("StudyHealth").unwrap().expression,
        "TimelineRisk * 1.2 + VendorDrift"
    );

    assert_eq!(ast.triggers.len(), 2);
    assert_eq!(ast.triggers[0].condition, "VendorDrift > 0.40");
    assert_eq!(ast.triggers[0].action, "escalate(\"vendor_review\")");
    assert_eq!(ast.triggers[1].action, "notify('sponsor')");

    assert_eq!(ast.variants_of("Hero").count(), 2);
    assert_eq!(
        ast.first_variant("Hero").unwrap().value,
        "Stop losing $2M a month to enrollment drift"
    );

    assert_eq!(
        ast.fact_table(FactTableKind::Credentials)["Experience"],
        "15 years in CNS trial operations"
    );
    assert_eq!(ast.case_studies.len(), 1);
    assert_eq!(ast.services.len(), 1);
    assert_eq!(ast.training.len(), 1);
    assert_eq!(ast.vroi_inputs["Sites"], "Number of active sites");
    assert_eq!(ast.vroi_outputs["Savings"], "Projected monthly savings");
    assert_eq!(ast.stats["Speed"], "3x faster activation");
    assert_eq!(ast.microtraining.len(), 1);
    let seo_keys: Vec<&str> = ast.seo.keys().map(String::as_str).collect();
    assert_eq!(seo_keys, vec!["Title", "Description"]);
    assert_eq!(ast.contact["Email"], "team@example.com");
    assert_eq!(ast.sk_tags, vec!["cns", "rescue"]);
    assert_eq!(ast.output, Some(OutputKind::MintSite));
}

#[test]
fn goals_keep_declaration_order() {
    let names = ["Zeta", "Alpha", "Mid", "Beta", "Omega"];
    let src: String = names
        .iter()
        .map(|n| format!("GOAL {}: \"Save 10%\"\n", n))
        .collect();
    let ast = parse_program(&src).expect("parse");
    let parsed: Vec<&str> = ast.goals.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(parsed, names);
}

#[test]
fn unknown_directive_reports_line_and_text() {
    let err = parse_program("FOO Bar: \"baz\"").unwrap_err();
    assert!(matches!(err, FrontendError::UnknownDirective { line: 1, .. }));
    let msg = err.to_string();
    assert!(msg.contains("line 1"));
    assert!(msg.contains("FOO Bar: \"baz\""));
}

#[test]
fn invalid_output_fixture_lists_vocabulary() {
    let err = parse_program(include_str!("../../fixtures/broken_output.roi")).unwrap_err();
    match &err {
        FrontendError::InvalidOutput { line, kind, .. } => {
            assert_eq!(*line, 4);
            assert_eq!(kind, "Widget");
        }
        other => panic!("expected InvalidOutput, got {other:?}"),
    }
    let msg = err.to_string();
    for kind in OutputKind::ALL {
        assert!(msg.contains(kind.as_str()), "missing {kind} in {msg}");
    }
}

#[test]
fn first_bad_line_wins() {
    let src = "GOAL Cost: \"Avoid $2M\"\n\n# comment\nMETRIC Risk: high\nFOO Bar: \"baz\"\nOUTPUT Widget";
    let err = parse_program(src).unwrap_err();
    match err {
        FrontendError::MalformedDirective {
            line,
            directive,
            text,
        } => {
            assert_eq!(line, 4);
            assert_eq!(directive, DirectiveKind::Metric);
            assert_eq!(text, "METRIC Risk: high");
        }
        other => panic!("expected MalformedDirective, got {other:?}"),
    }
}

#[test]
fn malformed_trigger_without_then() {
    let err = parse_program("WHEN Risk > 0.5 escalate(\"x\")").unwrap_err();
    assert!(err.is_syntax());
    assert!(err.to_string().contains("invalid WHEN/THEN syntax"));
}

#[test]
fn comments_and_indentation_are_ignored() {
    let src = "  # heading\n\t// note\n   GOAL Cost: \"Save $1M\"   \n\n";
    let ast = parse_program(src).expect("parse");
    assert_eq!(ast.goals.len(), 1);
    assert!(ast.output.is_none());
}

#[test]
fn empty_source_yields_empty_document() {
    let ast = parse_program("").expect("parse");
    assert!(ast.goals.is_empty());
    assert!(ast.metrics.is_empty());
    assert!(ast.output.is_none());
}

#[test]
fn fact_table_redeclaration_replaces_in_place() {
    let src = "STAT A: \"one\"\nSTAT B: \"two\"\nSTAT A: \"three\"";
    let ast = parse_program(src).expect("parse");
    let entries: Vec<(&str, &str)> = ast
        .stats
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    assert_eq!(entries, vec![("A", "three"), ("B", "two")]);
}

#[test]
fn later_output_overwrites_earlier() {
    let ast = parse_program("OUTPUT AGENT\nOUTPUT vROI").expect("parse");
    assert_eq!(ast.output, Some(OutputKind::VRoi));
}

#[test]
fn parsing_is_deterministic() {
    let src = include_str!("../../fixtures/cns_trial.roi");
    assert_eq!(parse_program(src).unwrap(), parse_program(src).unwrap());
}

#[test]
fn non_ascii_names_parse() {
    let ast = parse_program("GOAL Coût: \"Save $1M\"\nOUTPUT MintSite").expect("parse");
    assert_eq!(ast.goals[0].name, "Coût");
}

use roidsl_analysis::{Analyzer, Urgency};
use roidsl_frontend::{parse_and_validate, OutputKind};

#[test]
fn analyzes_cns_trial() {
    let (ast, _) = parse_and_validate(include_str!("../../fixtures/cns_trial.roi")).expect("valid");
    let analyzer = Analyzer::new(&ast);

    assert_eq!(analyzer.primary_goal().unwrap().name, "DelayCost");
    assert_eq!(analyzer.risk_score(), 0.6);
    assert_eq!(analyzer.urgency(), Urgency::High);
    assert_eq!(analyzer.total_value(), 2_500_000.0);
    assert_eq!(analyzer.completeness(), 0.93);
    assert_eq!(
        analyzer.pain_points(),
        vec![
            "Avoid $2M/mo burn from enrollment delays",
            "Regain control of $500K vendor spend",
        ]
    );
    assert!(analyzer.suggestions().is_empty());

    let analysis = analyzer.analyze();
    assert_eq!(analysis.persona, "Sponsor: CNS Phase III Director");
    assert_eq!(analysis.automation_triggers, 2);
    assert_eq!(analysis.output, Some(OutputKind::MintSite));
}

#[test]
fn analyzes_agent_fixture() {
    let (ast, _) = parse_and_validate(include_str!("../../fixtures/sdr_agent.roi")).expect("valid");
    let analyzer = Analyzer::new(&ast);

    assert_eq!(analyzer.persona_summary(), "No persona defined");
    assert_eq!(analyzer.risk_score(), 0.35);
    assert_eq!(analyzer.urgency(), Urgency::Medium);
    assert!(analyzer.dollar_values().is_empty());
    assert!(analyzer.secondary_goals().is_empty());

    let summary = analyzer.summary();
    assert!(summary.contains("Output Type: AGENT"));
    assert!(summary.contains("Urgency Level: MEDIUM"));
}

//! Validation of whole changelogs.

use relnotes_content::{Rule, ValidationOptions, parse};

use crate::common::{entry, praxis};

#[test]
fn test_praxis_history_is_valid() {
    let report = praxis().validate(&ValidationOptions {
        strict: true,
        require_source_commit: true,
    });
    assert!(report.issues.is_empty(), "{:?}", report.issues);
}

#[test]
fn test_out_of_order_history() {
    let content = entry("0.2.0", "20221114") + &entry("0.3.0", "20230201");
    let report = parse(&content)
        .unwrap()
        .validate(&ValidationOptions::default());
    let rules: Vec<Rule> = report.issues.iter().map(|i| i.rule).collect();
    assert_eq!(rules, vec![Rule::VersionOrder, Rule::DateOrder]);
    assert!(!report.is_ok());
}

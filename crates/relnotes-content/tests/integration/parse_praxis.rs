//! Parsing the Praxis release history.

use relnotes_content::SectionKind;
use semver::Version;

use crate::common::praxis;

#[test]
fn test_praxis_0_2_0_entry() {
    let changelog = praxis();
    let release = changelog.get(&Version::new(0, 2, 0)).unwrap();

    assert_eq!(release.build_date().unwrap().as_str(), "20221114");
    assert_eq!(
        release.source_commit(),
        Some("413da1ad8148f27faebca119f8c5deedca66228b")
    );
    assert_eq!(
        release.features().first().copied(),
        Some("Preparatory work for Fiddle integration")
    );
    assert!(release.deprecations().is_empty());
}

#[test]
fn test_every_entry_has_version_and_note() {
    let changelog = praxis();
    assert_eq!(changelog.len(), 4);
    for release in changelog.releases() {
        assert!(!release.version().to_string().is_empty());
        assert!(release.note().is_some(), "{} has no Note", release.version());
        assert!(release.build_date().is_some());
    }
}

#[test]
fn test_versions_strictly_decreasing() {
    let changelog = praxis();
    let versions: Vec<&Version> = changelog.releases().iter().map(|r| r.version()).collect();
    assert!(versions.windows(2).all(|w| w[0] > w[1]));
}

#[test]
fn test_build_dates_non_increasing() {
    let changelog = praxis();
    let dates: Vec<_> = changelog
        .releases()
        .iter()
        .filter_map(|r| r.build_date().and_then(|d| d.date()))
        .collect();
    assert_eq!(dates.len(), 4);
    assert!(dates.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn test_legacy_commit_key_on_first_release() {
    let changelog = praxis();
    let first = changelog.releases().last().unwrap();
    assert_eq!(first.version(), &Version::new(0, 1, 0));
    assert_eq!(
        first.source_commit(),
        Some("546370f5323ef8b27d38ddc32445d7d3d1e4da9a")
    );
    assert!(first.features().is_empty());
}

#[test]
fn test_nested_items_stay_with_parent() {
    let changelog = praxis();
    let release = changelog.get(&Version::new(0, 2, 0)).unwrap();
    let features = &release.sections()[0];
    assert_eq!(features.kind, SectionKind::Features);

    let optimizers = features
        .items()
        .find(|i| i.text.starts_with("Optimizer additions"))
        .unwrap();
    assert_eq!(optimizers.children.len(), 4);
    assert_eq!(
        optimizers.children[2].text,
        "ShardedStaticAccumulator optimizer wrappers to do a fixed number of gradient accumulations"
    );
}

#[test]
fn test_deprecations_of_latest() {
    let changelog = praxis();
    let latest = changelog.latest().unwrap();
    assert_eq!(latest.version(), &Version::new(0, 3, 0));
    assert_eq!(
        latest.deprecations(),
        vec!["`BaseHParams`-style layer templates; use Fiddle configs instead"]
    );
}

#[test]
fn test_queries_over_history() {
    let changelog = praxis();

    let since: Vec<String> = changelog
        .since(&Version::new(0, 2, 0))
        .iter()
        .map(|r| r.version().to_string())
        .collect();
    assert_eq!(since, vec!["0.3.0", "0.2.1"]);

    let hits = changelog.search("fiddle");
    let versions: Vec<String> = hits.iter().map(|h| h.version.to_string()).collect();
    assert_eq!(versions, vec!["0.3.0", "0.3.0", "0.3.0", "0.2.0"]);
}

#[test]
fn test_records_json() {
    let json = serde_json::to_value(praxis().records()).unwrap();
    assert_eq!(json[2]["version"], "0.2.0");
    assert_eq!(json[2]["build_date"], "20221114");
    assert_eq!(json[0]["deprecations"].as_array().unwrap().len(), 1);
    assert!(json[1].get("deprecations").is_none());
}

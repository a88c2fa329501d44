//! Rendering and file round trips.

use relnotes_content::{
    ParseOptions, is_round_trip_stable, load_changelog, parse, write_changelog,
};
use relnotes_core::normalize_whitespace;
use tempfile::TempDir;

use crate::common::{PRAXIS_CHANGELOG, fixture_path, praxis};

#[test]
fn test_praxis_round_trip_modulo_whitespace() {
    let rendered = praxis().render();
    assert_eq!(
        normalize_whitespace(&rendered),
        normalize_whitespace(PRAXIS_CHANGELOG)
    );
    assert!(is_round_trip_stable(PRAXIS_CHANGELOG, &ParseOptions::default()).unwrap());
}

#[test]
fn test_render_is_idempotent() {
    let once = praxis().render();
    let twice = parse(&once).unwrap().render();
    assert_eq!(once, twice);
}

#[tokio::test]
async fn test_load_fixture_and_rewrite() {
    let changelog = load_changelog(fixture_path(), &ParseOptions::default())
        .await
        .unwrap();
    assert_eq!(changelog.records(), praxis().records());

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("RELEASE.md");
    write_changelog(&out, &changelog).await.unwrap();
    let reloaded = load_changelog(&out, &ParseOptions::default()).await.unwrap();
    assert_eq!(reloaded.records(), changelog.records());
    assert_eq!(reloaded.render(), changelog.render());
}

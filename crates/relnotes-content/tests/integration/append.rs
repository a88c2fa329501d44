//! Appending the next release.

use relnotes_content::{
    Error, ParseOptions, ReleaseNoteBuilder, RenderOptions, ValidationOptions, parse,
};
use semver::Version;

use crate::common::{entry, praxis};

#[test]
fn test_prepend_next_release_to_history() {
    let mut changelog = praxis();
    let release = ReleaseNoteBuilder::new("0.4.0")
        .unwrap()
        .build_date("20230315")
        .source_commit("0123456789abcdef0123456789abcdef01234567")
        .feature("Layer-wise quantization configs")
        .build(&ParseOptions::default(), &RenderOptions::default())
        .unwrap();
    changelog.prepend(release).unwrap();

    assert_eq!(changelog.latest().unwrap().version(), &Version::new(0, 4, 0));
    let reparsed = parse(&changelog.render()).unwrap();
    assert_eq!(reparsed.len(), 5);
    assert!(
        reparsed
            .validate(&ValidationOptions::default())
            .issues
            .is_empty()
    );
}

#[test]
fn test_prepend_refuses_to_rewrite_history() {
    let mut changelog = parse(&entry("0.2.0", "20221114")).unwrap();
    let older = ReleaseNoteBuilder::new("0.1.0")
        .unwrap()
        .build_date("20220702")
        .build(&ParseOptions::default(), &RenderOptions::default())
        .unwrap();

    assert!(matches!(changelog.prepend(older), Err(Error::Ordering { .. })));
    assert_eq!(changelog.len(), 1);
}

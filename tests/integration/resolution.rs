use vcs_resolver::core::ResolveError;
use vcs_resolver::resolver::Resolver;
use vcs_resolver::test_utils::{StaticLister, init_test_logging};
use vcs_resolver::version::{Criteria, Version};

const URI: &str = "https://github.com/example/widgets.git";

fn resolver(refs: &[(&'static str, &'static str)]) -> Resolver<StaticLister> {
    init_test_logging(None);
    Resolver::with_lister(StaticLister::new(refs.iter().copied()))
}

#[tokio::test]
async fn test_wildcard_selects_newest_release() {
    let resolver = resolver(&[
        ("a", "refs/tags/v1.0.0"),
        ("b", "refs/tags/v2.0.0"),
        ("c", "refs/tags/v1.1.0"),
    ]);

    let version = resolver.resolve(URI, &[Criteria::constraint("*")]).await.unwrap();
    assert_eq!(version, Version::from_tag("b", "v2.0.0").unwrap());
}

#[tokio::test]
async fn test_prerelease_track_isolation() {
    let resolver = resolver(&[
        ("a", "refs/tags/v1.1.0"),
        ("b", "refs/tags/v1.2.0-alpha.1"),
        ("c", "refs/tags/v1.2.0-beta.1"),
    ]);

    let version = resolver.resolve(URI, &[Criteria::constraint("1.2.0-alpha")]).await.unwrap();
    assert_eq!(version.tag(), Some("v1.2.0-alpha.1"));
}

#[tokio::test]
async fn test_stable_range_skips_prereleases() {
    let resolver = resolver(&[
        ("a", "refs/tags/v1.1.0"),
        ("b", "refs/tags/v1.2.0-beta.1"),
    ]);

    let version = resolver.resolve(URI, &[Criteria::constraint(">=1.0.0")]).await.unwrap();
    assert_eq!(version.tag(), Some("v1.1.0"));
}

#[tokio::test]
async fn test_branch_pin_wins_over_tags() {
    let resolver = resolver(&[("t", "refs/tags/v9.9.9"), ("m", "refs/heads/main")]);

    let version = resolver.resolve(URI, &[Criteria::branch("main")]).await.unwrap();
    assert_eq!(version, Version::from_branch("m", "main"));
    assert_eq!(version.git_ref(), "refs/heads/main");
}

#[tokio::test]
async fn test_branch_pin_makes_constraints_vacuous() {
    let resolver = resolver(&[("t", "refs/tags/v1.0.0"), ("m", "refs/heads/main")]);

    let version = resolver
        .resolve(URI, &[Criteria::branch("main"), Criteria::constraint(">=5.0.0")])
        .await
        .unwrap();
    assert_eq!(version.branch(), Some("main"));
}

#[tokio::test]
async fn test_missing_branch_is_unsatisfiable() {
    let resolver = resolver(&[("t", "refs/tags/v1.0.0"), ("m", "refs/heads/main")]);

    let err = resolver.resolve(URI, &[Criteria::branch("release")]).await.unwrap_err();
    assert!(matches!(err, ResolveError::UnableToSatisfy { .. }));
}

#[tokio::test]
async fn test_no_match() {
    let resolver = resolver(&[
        ("a", "refs/tags/v1.0.0"),
        ("b", "refs/tags/v1.9.9"),
        ("c", "refs/heads/main"),
    ]);

    let err = resolver.resolve(URI, &[Criteria::constraint(">=2.0.0")]).await.unwrap_err();
    match err {
        ResolveError::UnableToSatisfy { uri } => assert_eq!(uri, URI),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_conflicting_branches_never_list() {
    let resolver = resolver(&[("m", "refs/heads/main")]);

    let err = resolver
        .resolve(URI, &[Criteria::branch("a"), Criteria::branch("b")])
        .await
        .unwrap_err();

    assert!(err.is_input_error());
    assert_eq!(err.to_string(), "Unable to satisfy multiple branch constraints (a, b)");
    assert_eq!(resolver.lister().calls(), 0);
}

#[tokio::test]
async fn test_invalid_constraint_never_lists() {
    let resolver = resolver(&[("a", "refs/tags/v1.0.0")]);

    let err = resolver.resolve(URI, &[Criteria::constraint(">= one")]).await.unwrap_err();
    assert!(matches!(err, ResolveError::InvalidConstraint { .. }));
    assert_eq!(resolver.lister().calls(), 0);
}

#[tokio::test]
async fn test_non_semver_tags_are_never_candidates() {
    let resolver = resolver(&[
        ("a", "refs/tags/latest"),
        ("b", "refs/tags/release-2024-01"),
        ("c", "refs/tags/v0.3.0"),
        ("d", "refs/tags/v0.3.0^{}"),
        ("e", "refs/pull/12/head"),
    ]);

    let versions = resolver.versions(URI).await.unwrap();
    assert_eq!(versions.len(), 1);
    assert_eq!(versions[0].tag(), Some("v0.3.0"));
    assert_eq!(versions[0].commit(), "c");
}

#[tokio::test]
async fn test_lenient_tag_forms() {
    let resolver = resolver(&[("a", "refs/tags/v2"), ("b", "refs/tags/1.5")]);

    let version = resolver.resolve(URI, &[Criteria::constraint("~1.5")]).await.unwrap();
    assert_eq!(version.tag(), Some("1.5"));

    let version = resolver.resolve(URI, &[Criteria::constraint("^2")]).await.unwrap();
    assert_eq!(version.tag(), Some("v2"));
}

#[tokio::test]
async fn test_resolution_is_deterministic() {
    let refs = [
        ("m", "refs/heads/main"),
        ("a", "refs/tags/v1.0.0"),
        ("d", "refs/heads/develop"),
        ("b", "refs/tags/v1.4.2"),
        ("c", "refs/tags/v1.4.2-rc.1"),
    ];
    let criteria = [Criteria::constraint(">=1.0.0, <2.0.0")];

    let first = resolver(&refs).resolve(URI, &criteria).await.unwrap();
    for _ in 0..5 {
        let again = resolver(&refs).resolve(URI, &criteria).await.unwrap();
        assert_eq!(again, first);
    }
    assert_eq!(first.tag(), Some("v1.4.2"));
}

#[tokio::test]
async fn test_prerelease_track_widens_partial_lower_bounds() {
    for partial in [">=1", ">=1.5"] {
        let resolver = resolver(&[("s", "refs/tags/v1.5.0"), ("b", "refs/tags/v1.5.0-beta.1")]);
        let version = resolver
            .resolve(URI, &[Criteria::constraint("1.5.0-beta"), Criteria::constraint(partial)])
            .await
            .unwrap();
        assert_eq!(version.tag(), Some("v1.5.0"), "{partial}");
    }

    let resolver = resolver(&[("b", "refs/tags/v1.6.0-beta.2"), ("s", "refs/tags/v1.4.0")]);
    let version = resolver
        .resolve(URI, &[Criteria::constraint("1.6.0-beta"), Criteria::constraint(">=1.5")])
        .await
        .unwrap();
    assert_eq!(version.tag(), Some("v1.6.0-beta.2"));
}

#[tokio::test]
async fn test_prerelease_track_widens_partial_tilde() {
    let resolver = resolver(&[
        ("a", "refs/tags/v1.3.0"),
        ("b", "refs/tags/v1.2.4-rc.1"),
        ("c", "refs/tags/v1.2.3"),
    ]);

    let version = resolver
        .resolve(URI, &[Criteria::constraint("1.2.4-rc"), Criteria::constraint("~1.2")])
        .await
        .unwrap();
    assert_eq!(version.tag(), Some("v1.2.4-rc.1"));

    let version = resolver
        .resolve(URI, &[Criteria::constraint("1.2.0-rc"), Criteria::constraint("~1.2")])
        .await
        .unwrap();
    assert_eq!(version.tag(), Some("v1.2.4-rc.1"));
}

#[tokio::test]
async fn test_trailing_separator_survives_widening() {
    let resolver = resolver(&[("s", "refs/tags/v1.5.0"), ("b", "refs/tags/v1.5.0-beta.1")]);

    let version = resolver
        .resolve(URI, &[Criteria::constraint("1.5.0-beta"), Criteria::constraint(">=1.0.0,")])
        .await
        .unwrap();
    assert_eq!(version.tag(), Some("v1.5.0"));
}

#[tokio::test]
async fn test_blank_constraint_is_invalid() {
    let resolver = resolver(&[("a", "refs/tags/v1.0.0")]);

    let err = resolver.resolve(URI, &[Criteria::constraint("  ")]).await.unwrap_err();
    assert!(matches!(err, ResolveError::InvalidConstraint { .. }));
    assert!(err.is_input_error());
    assert_eq!(resolver.lister().calls(), 0);
}

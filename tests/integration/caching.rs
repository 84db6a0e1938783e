use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use vcs_resolver::core::ResolveError;
use vcs_resolver::resolver::Resolver;
use vcs_resolver::test_utils::StaticLister;
use vcs_resolver::version::Criteria;

fn listing() -> StaticLister {
    StaticLister::new([
        ("a", "refs/tags/v1.0.0"),
        ("b", "refs/tags/v1.1.0"),
        ("m", "refs/heads/main"),
    ])
}

#[tokio::test]
async fn test_uri_listed_once_across_resolutions() {
    let resolver = Resolver::with_lister(listing());
    let uri = "https://gitlab.com/group/project.git";

    resolver.resolve(uri, &[Criteria::constraint("^1")]).await.unwrap();
    resolver.resolve(uri, &[Criteria::branch("main")]).await.unwrap();
    let _ = resolver.resolve(uri, &[Criteria::constraint(">=3")]).await;

    assert_eq!(resolver.lister().calls(), 1);
}

#[tokio::test]
async fn test_cache_is_per_resolver() {
    let uri = "https://gitlab.com/group/project.git";
    let first = Resolver::with_lister(listing());
    let second = Resolver::with_lister(listing());

    first.resolve(uri, &[Criteria::constraint("*")]).await.unwrap();
    second.resolve(uri, &[Criteria::constraint("*")]).await.unwrap();

    assert_eq!(first.lister().calls(), 1);
    assert_eq!(second.lister().calls(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_resolutions_list_once() {
    let resolver = Arc::new(Resolver::with_lister(
        listing().with_delay(Duration::from_millis(50)),
    ));
    let uri = "https://github.com/example/shared.git";

    let tasks = (0..16).map(|i| {
        let resolver = Arc::clone(&resolver);
        tokio::spawn(async move {
            let criteria = if i % 2 == 0 {
                Criteria::constraint("^1.0.0")
            } else {
                Criteria::branch("main")
            };
            resolver.resolve(uri, &[criteria]).await
        })
    });

    for (i, result) in join_all(tasks).await.into_iter().enumerate() {
        let version = result.unwrap().unwrap();
        if i % 2 == 0 {
            assert_eq!(version.tag(), Some("v1.1.0"));
        } else {
            assert_eq!(version.branch(), Some("main"));
        }
    }
    assert_eq!(resolver.lister().calls(), 1);
}

#[tokio::test]
async fn test_failed_listing_is_retried_by_next_call() {
    let resolver = Resolver::with_lister(StaticLister::failing("authentication required"));
    let uri = "https://github.com/example/private.git";

    for expected_calls in 1..=2 {
        let err = resolver.resolve(uri, &[Criteria::constraint("*")]).await.unwrap_err();
        assert!(matches!(err, ResolveError::Listing { .. }));
        assert!(!err.is_input_error());
        assert_eq!(resolver.lister().calls(), expected_calls);
    }
}

#[tokio::test]
async fn test_dropped_resolution_caches_nothing() {
    let resolver = Resolver::with_lister(listing().with_delay(Duration::from_millis(200)));
    let uri = "https://github.com/example/slow.git";

    let attempt = tokio::time::timeout(
        Duration::from_millis(20),
        resolver.resolve(uri, &[Criteria::constraint("*")]),
    )
    .await;
    assert!(attempt.is_err());
    assert_eq!(resolver.lister().calls(), 1);

    let version = resolver.resolve(uri, &[Criteria::constraint("*")]).await.unwrap();
    assert_eq!(version.tag(), Some("v1.1.0"));
    assert_eq!(resolver.lister().calls(), 2);
}

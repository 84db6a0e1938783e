use anyhow::Result;
use std::time::Duration;
use tempfile::TempDir;
use vcs_resolver::config::ResolverConfig;
use vcs_resolver::core::{GitError, ResolveError};
use vcs_resolver::git::GitLister;
use vcs_resolver::resolver::Resolver;
use vcs_resolver::test_utils::{TestGit, init_test_logging};
use vcs_resolver::version::Criteria;

/// A repository with releases on `main` and a `develop` branch ahead of them.
///
/// Returns the commits of `v1.1.0` and the `develop` head.
fn release_repo(git: &TestGit) -> Result<(String, String)> {
    git.init()?;
    git.config_user()?;

    git.commit_empty("first release")?;
    git.tag_annotated("v1.0.0", "Release 1.0.0")?;

    git.commit_empty("second release")?;
    git.tag("v1.1.0")?;
    git.tag("v2.0.0-beta.1")?;
    git.tag("nightly")?;
    let v110 = git.rev_parse_head()?;

    git.create_branch("develop")?;
    git.commit_empty("work in progress")?;
    let develop = git.rev_parse_head()?;
    git.checkout("main")?;

    Ok((v110, develop))
}

#[tokio::test]
async fn test_resolve_against_local_repository() {
    init_test_logging(None);
    let temp = TempDir::new().unwrap();
    let git = TestGit::new(temp.path());
    let (v110, develop) = release_repo(&git).unwrap();

    let resolver = Resolver::new();
    let uri = git.uri();

    let version = resolver.resolve(&uri, &[Criteria::constraint("^1.0")]).await.unwrap();
    assert_eq!(version.tag(), Some("v1.1.0"));
    assert_eq!(version.commit(), v110);

    // Annotated tags are listed twice; only the unpeeled entry becomes a version
    let version = resolver.resolve(&uri, &[Criteria::constraint("<1.1.0")]).await.unwrap();
    assert_eq!(version.tag(), Some("v1.0.0"));
    assert!(!version.commit().is_empty());

    let version = resolver.resolve(&uri, &[Criteria::constraint("2.0.0-beta")]).await.unwrap();
    assert_eq!(version.tag(), Some("v2.0.0-beta.1"));

    let version = resolver.resolve(&uri, &[Criteria::branch("develop")]).await.unwrap();
    assert_eq!(version.commit(), develop);
    assert_eq!(version.git_ref(), "refs/heads/develop");
}

#[tokio::test]
async fn test_lister_reports_every_reference() {
    let temp = TempDir::new().unwrap();
    let git = TestGit::new(temp.path());
    release_repo(&git).unwrap();

    let refs = GitLister::new().list_remote(&git.uri()).await.unwrap();
    let names: Vec<&str> = refs.iter().map(|r| r.name.as_str()).collect();

    for expected in [
        "HEAD",
        "refs/heads/main",
        "refs/heads/develop",
        "refs/tags/v1.0.0",
        "refs/tags/v1.0.0^{}",
        "refs/tags/v1.1.0",
        "refs/tags/nightly",
    ] {
        assert!(names.contains(&expected), "missing {expected} in {names:?}");
    }
}

#[tokio::test]
async fn test_missing_repository_is_a_listing_error() {
    let temp = TempDir::new().unwrap();
    let uri = temp.path().join("does-not-exist").display().to_string();

    let resolver = Resolver::new();
    let err = resolver.resolve(&uri, &[Criteria::constraint("*")]).await.unwrap_err();

    match err {
        ResolveError::Listing { uri: listed, source } => {
            assert_eq!(listed, uri);
            assert!(matches!(
                source.downcast_ref::<GitError>(),
                Some(GitError::CommandFailed { .. })
            ));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_lister_from_config_file() {
    let temp = TempDir::new().unwrap();
    let repo_dir = temp.path().join("repo");
    std::fs::create_dir_all(&repo_dir).unwrap();
    let git = TestGit::new(&repo_dir);
    release_repo(&git).unwrap();

    let config_path = temp.path().join("config.toml");
    tokio::fs::write(&config_path, "[git]\ntimeout_secs = 30\n\n[git.env]\nGIT_CONFIG_NOSYSTEM = \"1\"\n")
        .await
        .unwrap();
    let config = ResolverConfig::load_with_optional(Some(config_path)).await.unwrap();

    let lister = GitLister::from_config(&config.git);
    assert_eq!(lister.timeout(), Some(Duration::from_secs(30)));

    let resolver = Resolver::with_lister(lister);
    let version = resolver.resolve(&git.uri(), &[Criteria::branch("main")]).await.unwrap();
    assert_eq!(version.branch(), Some("main"));
}

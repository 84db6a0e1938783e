//! Version resolution against remote repositories.
//!
//! [`Resolver::resolve`] answers "which concrete version of this repository
//! satisfies all of these criteria?". It works in three phases:
//!
//! 1. **Validation**: every criterion is parsed and the branch and pre-release
//!    track requested by the criteria are unified. Contradictions are reported
//!    before any network access.
//! 2. **Discovery**: the references of the URI are listed once per resolver and
//!    cached as a sorted candidate list (see [`sort_versions`]).
//! 3. **Selection**: candidates are walked in order and the first one that
//!    satisfies every criterion wins. Tags are sorted newest first, so the
//!    newest matching release is returned.
//!
//! # Caching
//!
//! Each [`Resolver`] owns its cache; nothing is shared between instances and
//! entries are never invalidated. A single async mutex is held while checking,
//! fetching, and storing, so concurrent resolutions of the same URI list it
//! exactly once. Listings of different URIs are serialized as a consequence.
//! Failed listings are not cached.
//!
//! # Examples
//!
//! ```rust,no_run
//! use vcs_resolver::resolver::Resolver;
//! use vcs_resolver::version::Criteria;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let resolver = Resolver::new();
//! let uri = "https://github.com/example/repo.git";
//!
//! let release = resolver.resolve(uri, &[Criteria::constraint(">=1.0.0, <2.0.0")]).await?;
//! println!("{release} -> {}", release.git_ref());
//!
//! // The second resolution reuses the listing
//! let head = resolver.resolve(uri, &[Criteria::branch("main")]).await?;
//! println!("{head}");
//! # Ok(())
//! # }
//! ```

pub mod lister;

pub use lister::{RefLister, RemoteRef, versions_from_refs};

use crate::core::ResolveError;
use crate::git::{GitLister, strip_auth_from_url};
use crate::version::{Criteria, Version, sort_versions};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Resolves criteria to concrete versions, caching reference listings per URI.
///
/// `Resolver` is `Send + Sync`; share one instance (for example behind an
/// `Arc`) to share its cache.
pub struct Resolver<L: RefLister = GitLister> {
    lister: L,
    cache: Mutex<HashMap<String, Arc<[Version]>>>,
}

impl Resolver<GitLister> {
    /// Creates a resolver that lists references with the system `git`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_lister(GitLister::new())
    }
}

impl Default for Resolver<GitLister> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: RefLister> Resolver<L> {
    /// Creates a resolver backed by a custom reference lister.
    pub fn with_lister(lister: L) -> Self {
        Self {
            lister,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// The reference lister this resolver queries.
    pub const fn lister(&self) -> &L {
        &self.lister
    }

    /// Resolves the newest version of `uri` that satisfies every criterion.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::NoCriteria`] if `criteria` is empty
    /// - [`ResolveError::ConflictingBranch`] / [`ResolveError::ConflictingPrerelease`]
    ///   if the criteria pin different branches or pre-release tracks
    /// - [`ResolveError::UnsupportedConstraint`] / [`ResolveError::InvalidConstraint`]
    ///   if a constraint does not parse
    /// - [`ResolveError::Listing`] if the references of `uri` could not be listed
    /// - [`ResolveError::UnableToSatisfy`] if no candidate satisfies all criteria
    ///
    /// Input errors are returned before the URI is listed.
    pub async fn resolve(&self, uri: &str, criteria: &[Criteria]) -> Result<Version, ResolveError> {
        if criteria.is_empty() {
            return Err(ResolveError::NoCriteria);
        }

        let mut branch: Option<&str> = None;
        let mut track: Option<String> = None;
        let mut parsed = Vec::with_capacity(criteria.len());

        for criterion in criteria {
            if let Some(wanted) = criterion.branch_name() {
                match branch {
                    Some(existing) if existing != wanted => {
                        return Err(ResolveError::ConflictingBranch {
                            first: existing.to_string(),
                            second: wanted.to_string(),
                        });
                    }
                    _ => branch = Some(wanted),
                }
            }

            let criterion = criterion.parse()?;

            if let (Some(_), Some(wanted)) = (criterion.range(), criterion.prerelease()) {
                match track.as_deref() {
                    Some(existing) if existing != wanted => {
                        return Err(ResolveError::ConflictingPrerelease {
                            first: existing.to_string(),
                            second: wanted.to_string(),
                        });
                    }
                    _ => track = Some(wanted.to_string()),
                }
            }

            parsed.push(criterion);
        }

        let prepared = parsed
            .iter()
            .map(|criterion| criterion.for_track(track.as_deref()))
            .collect::<Result<Vec<_>, _>>()?;

        let versions = self.versions(uri).await?;

        let selected = versions.iter().find(|version| {
            prepared
                .iter()
                .all(|criterion| criterion.check(version, track.as_deref(), branch))
        });

        let safe_uri = strip_auth_from_url(uri);
        match selected {
            Some(version) => {
                tracing::debug!(target: "resolver", "Resolved {safe_uri} to {version}");
                Ok(version.clone())
            }
            None => Err(ResolveError::UnableToSatisfy {
                uri: safe_uri,
            }),
        }
    }

    /// Returns the sorted candidates of `uri`, listing it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Listing`] if the lister fails. Nothing is cached
    /// in that case, so a later call lists again.
    pub async fn versions(&self, uri: &str) -> Result<Arc<[Version]>, ResolveError> {
        let mut cache = self.cache.lock().await;
        let safe_uri = strip_auth_from_url(uri);
        if let Some(versions) = cache.get(uri) {
            tracing::trace!(target: "resolver", "Cache hit for {safe_uri}");
            return Ok(Arc::clone(versions));
        }

        tracing::debug!(target: "resolver", "Listing references for {safe_uri}");
        let refs = match self.lister.list_refs(uri).await {
            Ok(refs) => refs,
            Err(source) => {
                return Err(ResolveError::Listing {
                    uri: safe_uri,
                    source,
                });
            }
        };

        let mut versions = versions_from_refs(refs);
        sort_versions(&mut versions);
        tracing::debug!(
            target: "resolver",
            "Found {} candidate versions for {safe_uri}",
            versions.len()
        );

        let versions: Arc<[Version]> = versions.into();
        cache.insert(uri.to_string(), Arc::clone(&versions));
        Ok(versions)
    }
}

//! The reference listing collaborator.
//!
//! The resolver never talks to a remote itself. It asks a [`RefLister`] for the
//! `(commit, reference name)` pairs a URI advertises and turns those into
//! [`Version`] candidates with [`versions_from_refs`].

use crate::constants::PEELED_TAG_SUFFIX;
use crate::version::{Reference, Version};
use anyhow::Result;
use std::future::Future;
use std::pin::Pin;

/// One entry of a remote's reference advertisement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRef {
    /// Commit the reference points at.
    pub commit: String,
    /// Fully-qualified reference name, e.g. `refs/tags/v1.0.0`.
    pub name: String,
}

impl RemoteRef {
    /// Creates a listing entry.
    pub fn new(commit: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            commit: commit.into(),
            name: name.into(),
        }
    }
}

/// Lists the references a source URI advertises.
///
/// Implemented by [`GitLister`](crate::git::GitLister) for real remotes and by
/// in-memory listers in tests. Implementations may fail for any reason (network,
/// authentication, missing executable); the resolver reports such failures as
/// [`ResolveError::Listing`](crate::core::ResolveError::Listing) without retrying.
pub trait RefLister: Send + Sync {
    /// Returns the references of `uri` in the order the remote reports them.
    fn list_refs<'a>(
        &'a self,
        uri: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RemoteRef>>> + Send + 'a>>;
}

/// Turns a reference listing into resolution candidates.
///
/// - `refs/tags/<name>` becomes a tagged version unless it is a peeled entry
///   (`^{}`) or `<name>` is not a semantic version
/// - `refs/heads/<name>` always becomes a branch version
/// - every other reference is ignored
///
/// Listing order is preserved.
#[must_use]
pub fn versions_from_refs(refs: Vec<RemoteRef>) -> Vec<Version> {
    refs.into_iter()
        .filter_map(|remote| match Reference::parse(&remote.name)? {
            Reference::Tag(tag) if tag.ends_with(PEELED_TAG_SUFFIX) => None,
            Reference::Tag(tag) => {
                let version = Version::from_tag(remote.commit, tag);
                if version.is_none() {
                    tracing::trace!(target: "resolver", "Skipping non-version tag {}", remote.name);
                }
                version
            }
            Reference::Branch(branch) => Some(Version::from_branch(remote.commit, branch)),
            Reference::Commit(_) | Reference::Virtual => None,
        })
        .collect()
}

//! Git reference names.

use crate::constants::{BRANCH_REF_PREFIX, TAG_REF_PREFIX, VIRTUAL_GIT_REF};
use std::fmt;

/// What a [`Version`](super::Version) points at, in git's naming scheme.
///
/// The `Display` form is what [`Version::git_ref`](super::Version::git_ref)
/// returns; [`Reference::parse`] reads fully-qualified tag and branch names
/// back.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Reference {
    /// `refs/tags/<name>`
    Tag(String),
    /// `refs/heads/<name>`
    Branch(String),
    /// A bare commit identifier.
    Commit(String),
    /// A virtual version; displays as a sentinel git will never accept.
    Virtual,
}

impl Reference {
    /// Parses a fully-qualified tag or branch reference.
    ///
    /// Other namespaces (`refs/pull/...`, `HEAD`) yield `None`.
    ///
    /// ```rust
    /// use vcs_resolver::version::Reference;
    ///
    /// assert_eq!(Reference::parse("refs/heads/main"), Some(Reference::Branch("main".into())));
    /// assert_eq!(Reference::parse("refs/tags/v1.0.0"), Some(Reference::Tag("v1.0.0".into())));
    /// assert_eq!(Reference::parse("refs/pull/1/head"), None);
    /// ```
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        if let Some(tag) = name.strip_prefix(TAG_REF_PREFIX) {
            Some(Self::Tag(tag.to_string()))
        } else {
            name.strip_prefix(BRANCH_REF_PREFIX)
                .map(|branch| Self::Branch(branch.to_string()))
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag(tag) => write!(f, "{TAG_REF_PREFIX}{tag}"),
            Self::Branch(branch) => write!(f, "{BRANCH_REF_PREFIX}{branch}"),
            Self::Commit(commit) => f.write_str(commit),
            Self::Virtual => f.write_str(VIRTUAL_GIT_REF),
        }
    }
}

//! Versions discovered in remote repositories and the criteria that select them.
//!
//! # Module Organization
//!
//! - [`Version`] - a concrete, checkout-able state of a repository (tag, branch, or commit)
//! - [`criteria`] - caller-supplied selection rules and their parsed form
//! - [`range`] - the version range expression language used by constraints
//! - [`reference`] - the `refs/tags/...` / `refs/heads/...` naming scheme
//!
//! # Tag Parsing
//!
//! Tags are accepted as semantic versions leniently, the way release tags are
//! written in practice:
//!
//! - a leading `v` or `V` is dropped (`v1.2.3` → `1.2.3`)
//! - missing minor and patch components are filled with zero (`v2` → `2.0.0`)
//! - pre-release and build suffixes are kept (`1.0-rc.1` → `1.0.0-rc.1`)
//!
//! Tags that still do not parse (`release-2023-01`, `nightly`) are not versions
//! and never become candidates for resolution.
//!
//! # Candidate Order
//!
//! [`sort_versions`] puts candidates in the order resolution walks them:
//! tagged versions newest first, then branches by name.
//!
//! # Examples
//!
//! ```rust
//! use vcs_resolver::version::{Version, sort_versions};
//!
//! let mut versions = vec![
//!     Version::from_branch("c3", "main"),
//!     Version::from_tag("c1", "v1.0.0").unwrap(),
//!     Version::from_tag("c2", "v1.2.0").unwrap(),
//! ];
//! sort_versions(&mut versions);
//!
//! assert_eq!(versions[0].tag(), Some("v1.2.0"));
//! assert_eq!(versions[2].branch(), Some("main"));
//! ```

pub mod criteria;
pub mod range;
pub mod reference;

pub use criteria::{Criteria, ParsedCriteria};
pub use range::{RangeError, VersionRange};
pub use reference::Reference;

use semver::{BuildMetadata, Prerelease};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A concrete state of a repository that resolution can return.
///
/// Exactly one of the following describes a `Version`:
///
/// - **virtual**: a placeholder for content injected from outside version control;
///   it carries only a label and is never produced by resolution
/// - **tag**: a release tag whose name parsed as a semantic version
/// - **branch**: the head of a branch
/// - **commit**: a bare commit identifier
///
/// Equality and hashing consider the commit, tag, and branch. The parsed semantic
/// version is derived from the tag and the virtual label is informational.
///
/// # Serialization
///
/// Serializes to a map with optional `commit`, `tag`, `virtual`, and `branch`
/// fields; empty fields are omitted. The semantic version is recomputed from the
/// tag on deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "VersionRecord", into = "VersionRecord")]
pub struct Version {
    commit: String,
    tag: Option<String>,
    branch: Option<String>,
    virtual_source: Option<String>,
    semver: Option<semver::Version>,
}

impl Version {
    /// Creates a tagged version, or `None` if the tag is not a semantic version.
    #[must_use]
    pub fn from_tag(commit: impl Into<String>, tag: impl Into<String>) -> Option<Self> {
        let tag = tag.into();
        let semver = parse_tag(&tag)?;
        Some(Self {
            commit: commit.into(),
            tag: Some(tag),
            branch: None,
            virtual_source: None,
            semver: Some(semver),
        })
    }

    /// Creates a version pointing at the head of `branch`.
    #[must_use]
    pub fn from_branch(commit: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            commit: commit.into(),
            tag: None,
            branch: Some(branch.into()),
            virtual_source: None,
            semver: None,
        }
    }

    /// Creates a version identified only by its commit.
    #[must_use]
    pub fn from_commit(commit: impl Into<String>) -> Self {
        Self {
            commit: commit.into(),
            tag: None,
            branch: None,
            virtual_source: None,
            semver: None,
        }
    }

    /// Creates a virtual version for content that did not come from version control.
    ///
    /// `source` is a human-readable label such as a local path.
    #[must_use]
    pub fn new_virtual(source: impl Into<String>) -> Self {
        Self {
            commit: String::new(),
            tag: None,
            branch: None,
            virtual_source: Some(source.into()),
            semver: None,
        }
    }

    /// Builds the version a remote reference names.
    ///
    /// Returns `None` for tags that are not semantic versions and for
    /// [`Reference::Virtual`], which does not name a commit.
    #[must_use]
    pub fn from_reference(commit: impl Into<String>, reference: Reference) -> Option<Self> {
        match reference {
            Reference::Tag(tag) => Self::from_tag(commit, tag),
            Reference::Branch(branch) => Some(Self::from_branch(commit, branch)),
            Reference::Commit(id) => Some(Self::from_commit(id)),
            Reference::Virtual => None,
        }
    }

    /// The commit identifier; empty for virtual versions.
    #[must_use]
    pub fn commit(&self) -> &str {
        &self.commit
    }

    /// The tag name exactly as listed by the remote.
    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// The branch name.
    #[must_use]
    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    /// The label of a virtual version.
    #[must_use]
    pub fn virtual_source(&self) -> Option<&str> {
        self.virtual_source.as_deref()
    }

    /// The semantic version parsed from the tag.
    #[must_use]
    pub const fn semver(&self) -> Option<&semver::Version> {
        self.semver.as_ref()
    }

    /// The pre-release track of a tagged version (`beta` for `1.0.0-beta.2`).
    #[must_use]
    pub fn prerelease_track(&self) -> Option<&str> {
        self.semver.as_ref().and_then(prerelease_track)
    }

    /// Returns `true` for virtual versions.
    #[must_use]
    pub const fn is_virtual(&self) -> bool {
        self.virtual_source.is_some()
    }

    /// The reference that names this version.
    ///
    /// Priority is virtual, then tag, then branch, then commit.
    #[must_use]
    pub fn reference(&self) -> Reference {
        if self.virtual_source.is_some() {
            Reference::Virtual
        } else if let Some(tag) = &self.tag {
            Reference::Tag(tag.clone())
        } else if let Some(branch) = &self.branch {
            Reference::Branch(branch.clone())
        } else {
            Reference::Commit(self.commit.clone())
        }
    }

    /// The git reference string for this version.
    ///
    /// Tags and branches are fully qualified (`refs/tags/v1.0.0`,
    /// `refs/heads/main`), commits are returned as-is, and virtual versions
    /// yield a sentinel that is never a valid git reference.
    #[must_use]
    pub fn git_ref(&self) -> String {
        self.reference().to_string()
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.virtual_source {
            write!(f, "virtual (source: {source})")
        } else if let Some(tag) = &self.tag {
            write!(f, "tag {tag} ({})", self.commit)
        } else if let Some(branch) = &self.branch {
            write!(f, "branch {branch} ({})", self.commit)
        } else {
            f.write_str(&self.commit)
        }
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.commit == other.commit && self.tag == other.tag && self.branch == other.branch
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.commit.hash(state);
        self.tag.hash(state);
        self.branch.hash(state);
    }
}

#[derive(Serialize, Deserialize)]
struct VersionRecord {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    commit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tag: Option<String>,
    #[serde(default, rename = "virtual", skip_serializing_if = "Option::is_none")]
    virtual_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    branch: Option<String>,
}

impl From<VersionRecord> for Version {
    fn from(record: VersionRecord) -> Self {
        let semver = record.tag.as_deref().and_then(parse_tag);
        Self {
            commit: record.commit,
            tag: record.tag,
            branch: record.branch,
            virtual_source: record.virtual_source,
            semver,
        }
    }
}

impl From<Version> for VersionRecord {
    fn from(version: Version) -> Self {
        Self {
            commit: version.commit,
            tag: version.tag,
            virtual_source: version.virtual_source,
            branch: version.branch,
        }
    }
}

/// Parses a release tag as a semantic version.
///
/// See the [module documentation](self#tag-parsing) for the accepted forms.
///
/// # Examples
///
/// ```rust
/// use vcs_resolver::version::parse_tag;
///
/// assert_eq!(parse_tag("v1.2").unwrap().to_string(), "1.2.0");
/// assert_eq!(parse_tag("V3.0.0-rc.1").unwrap().pre.as_str(), "rc.1");
/// assert!(parse_tag("release-2023-01").is_none());
/// ```
#[must_use]
pub fn parse_tag(tag: &str) -> Option<semver::Version> {
    let (core, pre, build) = split_version_text(tag);

    let mut numbers = [0u64; 3];
    for (i, part) in core.split('.').enumerate() {
        if i >= numbers.len() {
            return None;
        }
        numbers[i] = parse_numeric(part)?;
    }

    let pre = match pre {
        Some(pre) if !pre.is_empty() => Prerelease::new(pre).ok()?,
        Some(_) => return None,
        None => Prerelease::EMPTY,
    };
    let build = match build {
        Some(build) if !build.is_empty() => BuildMetadata::new(build).ok()?,
        Some(_) => return None,
        None => BuildMetadata::EMPTY,
    };

    Some(semver::Version {
        major: numbers[0],
        minor: numbers[1],
        patch: numbers[2],
        pre,
        build,
    })
}

/// The first dot-separated identifier of a version's pre-release, if any.
#[must_use]
pub fn prerelease_track(version: &semver::Version) -> Option<&str> {
    version.pre.as_str().split('.').next().filter(|track| !track.is_empty())
}

/// Sorts candidates into resolution order.
///
/// Tagged versions come first, newest semantic version first. Untagged
/// versions follow, ordered by branch name. The sort is stable, so versions
/// that compare equal keep their listing order.
pub fn sort_versions(versions: &mut [Version]) {
    versions.sort_by(compare_candidates);
}

fn compare_candidates(a: &Version, b: &Version) -> Ordering {
    match (a.semver(), b.semver()) {
        (Some(x), Some(y)) => y.cmp(x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.branch().unwrap_or_default().cmp(b.branch().unwrap_or_default()),
    }
}

/// Splits `[v]core[-pre][+build]` into its parts.
///
/// Build metadata is cut at the first `+` before the pre-release is cut at the
/// first `-`, so hyphens inside the pre-release survive.
pub(crate) fn split_version_text(text: &str) -> (&str, Option<&str>, Option<&str>) {
    let text = text.strip_prefix(['v', 'V']).unwrap_or(text);
    let (rest, build) = match text.split_once('+') {
        Some((rest, build)) => (rest, Some(build)),
        None => (text, None),
    };
    match rest.split_once('-') {
        Some((core, pre)) => (core, Some(pre), build),
        None => (rest, None, build),
    }
}

/// Parses an all-digit version component.
pub(crate) fn parse_numeric(part: &str) -> Option<u64> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

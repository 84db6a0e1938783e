//! Constants shared by the resolver, the git lister, and configuration.

use std::time::Duration;

/// Timeout for `git ls-remote` (60 seconds).
///
/// Listing only transfers the ref advertisement, so a minute is generous
/// even for repositories with many tags.
pub const GIT_LIST_REMOTE_TIMEOUT: Duration = Duration::from_secs(60);

/// Git operations slower than this are reported at info level under `git::perf`.
pub const SLOW_GIT_OPERATION: Duration = Duration::from_secs(1);

/// Prefix of tag references in a remote listing.
pub const TAG_REF_PREFIX: &str = "refs/tags/";

/// Prefix of branch references in a remote listing.
pub const BRANCH_REF_PREFIX: &str = "refs/heads/";

/// Suffix git appends to the peeled entry of an annotated tag.
pub const PEELED_TAG_SUFFIX: &str = "^{}";

/// Value returned by [`Version::git_ref`](crate::version::Version::git_ref) for
/// virtual versions, which have no reference that git could check out.
pub const VIRTUAL_GIT_REF: &str = "NOT_A_VALID_GIT_VERSION";

/// Environment variable that overrides the configured git timeout, in seconds.
pub const GIT_TIMEOUT_ENV: &str = "VCS_RESOLVER_GIT_TIMEOUT";

//! vcs-resolver - version resolution for remote git repositories
//!
//! Given the URI of a git repository and one or more selection criteria, the
//! resolver lists the repository's tags and branches and returns the single
//! concrete version (tag, branch, or commit) that satisfies all of them.
//!
//! # Criteria
//!
//! A criterion is either a version range or a branch pin:
//!
//! - `>=1.0.0, <2.0.0`, `^1.2`, `~1.2.3`, `1.x`, `*` select release tags
//! - `branch = "main"` selects the head of a branch
//!
//! Release tags are matched as semantic versions (`v1.2.3`, `1.2`, `v2` are all
//! accepted); tags that are not versions are ignored. Pre-releases are only
//! considered when a constraint names a pre-release track such as `1.3.0-beta`,
//! and then only releases on that same track.
//!
//! # Architecture
//!
//! - [`resolver`] - the [`Resolver`](resolver::Resolver), its per-URI cache, and
//!   the [`RefLister`](resolver::RefLister) collaborator
//! - [`version`] - versions, criteria, and the range language
//! - [`git`] - the default lister, backed by `git ls-remote`
//! - [`config`] - optional TOML configuration for the git lister
//! - [`core`] - error types
//!
//! # Example
//!
//! ```rust,no_run
//! use vcs_resolver::resolver::Resolver;
//! use vcs_resolver::version::Criteria;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let resolver = Resolver::new();
//! let version = resolver
//!     .resolve("https://github.com/example/repo.git", &[Criteria::constraint("^1.4")])
//!     .await?;
//!
//! println!("Using {version}, checkout {}", version.git_ref());
//! # Ok(())
//! # }
//! ```
//!
//! # Logging
//!
//! The crate logs through `tracing` under the targets `resolver`, `git`, and
//! `git::perf`. It never installs a subscriber itself.

// Core functionality modules
pub mod config;
pub mod constants;
pub mod core;
pub mod resolver;
pub mod version;

// Git integration
pub mod git;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

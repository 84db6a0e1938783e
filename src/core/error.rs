//! Error types for version resolution.
//!
//! Errors are split by the layer that produces them:
//! - [`ResolveError`] - everything [`Resolver::resolve`](crate::resolver::Resolver::resolve)
//!   and criteria parsing can return
//! - [`GitError`] - failures of the `git` executable used by the default reference lister
//!
//! Resolution errors fall into three groups so callers can tell "the input was
//! malformed" apart from "no such version exists":
//! - **Input errors**: [`ResolveError::UnsupportedConstraint`], [`ResolveError::InvalidConstraint`],
//!   [`ResolveError::ConflictingBranch`], [`ResolveError::ConflictingPrerelease`],
//!   [`ResolveError::NoCriteria`]
//! - **Collaborator errors**: [`ResolveError::Listing`]
//! - **Outcome errors**: [`ResolveError::UnableToSatisfy`]
//!
//! [`ResolveError::WidenedConstraint`] sits outside those groups: it signals that the
//! resolver built a constraint string it could not parse, which is a bug rather than
//! a problem with the caller's input.
//!
//! # Examples
//!
//! ```rust,no_run
//! use vcs_resolver::core::ResolveError;
//! use vcs_resolver::resolver::Resolver;
//! use vcs_resolver::version::Criteria;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let resolver = Resolver::new();
//! match resolver.resolve("https://github.com/example/repo", &[Criteria::constraint(">=9.0.0")]).await {
//!     Ok(version) => println!("resolved {version}"),
//!     Err(ResolveError::UnableToSatisfy { .. }) => println!("nothing matched"),
//!     Err(e) => return Err(e.into()),
//! }
//! # Ok(())
//! # }
//! ```

use thiserror::Error;

/// Errors returned while parsing criteria or resolving a version.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// The constraint used a logical combinator (`||` or `&&`).
    ///
    /// Conjunctions are expressed by passing several criteria to a single
    /// resolution instead.
    #[error("Complex constraints are not supported: {constraint}")]
    UnsupportedConstraint {
        /// The rejected constraint text
        constraint: String,
    },

    /// The constraint is not a valid version range expression.
    #[error("Invalid version constraint '{constraint}': {reason}")]
    InvalidConstraint {
        /// The constraint text that failed to parse
        constraint: String,
        /// Why the parser rejected it
        reason: String,
    },

    /// Two criteria in the same resolution pin different branches.
    #[error("Unable to satisfy multiple branch constraints ({first}, {second})")]
    ConflictingBranch {
        /// Branch seen first
        first: String,
        /// Branch that disagreed with it
        second: String,
    },

    /// Two criteria in the same resolution ask for different pre-release tracks.
    #[error("Unable to satisfy multiple pre-release constraints ({first}, {second})")]
    ConflictingPrerelease {
        /// Track seen first
        first: String,
        /// Track that disagreed with it
        second: String,
    },

    /// `resolve` was called without any criteria.
    #[error("No criteria provided")]
    NoCriteria,

    /// The reference listing for a URI could not be obtained.
    ///
    /// The collaborator's error is kept as the source, unchanged.
    #[error("Failed to list references for {uri}")]
    Listing {
        /// Source URI that was being listed
        uri: String,
        /// Underlying collaborator error
        #[source]
        source: anyhow::Error,
    },

    /// Every discovered version was checked and none satisfied all criteria.
    #[error("No versions found that satisfy criteria for {uri}")]
    UnableToSatisfy {
        /// Source URI that was searched
        uri: String,
    },

    /// Appending a pre-release track to an already-parsed constraint produced an
    /// unparseable range. This is an internal invariant violation.
    #[error("Internal error: widened constraint '{constraint}' failed to parse: {reason}")]
    WidenedConstraint {
        /// The widened constraint text
        constraint: String,
        /// Parser message
        reason: String,
    },
}

impl ResolveError {
    /// Returns `true` for errors caused by malformed or contradictory criteria.
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedConstraint { .. }
                | Self::InvalidConstraint { .. }
                | Self::ConflictingBranch { .. }
                | Self::ConflictingPrerelease { .. }
                | Self::NoCriteria
        )
    }
}

/// Failures of a `git` subprocess.
#[derive(Error, Debug)]
pub enum GitError {
    /// Git exited with a non-zero status.
    #[error("Git operation failed: {operation}")]
    CommandFailed {
        /// The git operation that failed (e.g. "ls-remote")
        operation: String,
        /// Standard error captured from git
        stderr: String,
    },

    /// The git executable could not be spawned.
    #[error("Git is not installed or not found in PATH")]
    NotFound,

    /// Git did not finish before the configured timeout.
    #[error("Git {operation} timed out after {seconds} seconds")]
    Timeout {
        /// The git operation that timed out
        operation: String,
        /// Timeout that was exceeded
        seconds: u64,
    },
}

//! Selection criteria for resolution.
//!
//! A [`Criteria`] is what a caller asks for: a version range, a branch, or
//! both. Before it can be checked against candidates it is parsed into a
//! [`ParsedCriteria`], which owns the compiled [`VersionRange`] and the
//! pre-release track the constraint pins (if any).
//!
//! # Pre-release Tracks
//!
//! A constraint whose own version carries a pre-release (`1.2.0-beta`) pins
//! the `beta` track. Within one resolution all criteria share that track:
//! constraints that name no pre-release are widened by appending `-beta`, so
//! `>=1.0.0 <2.0.0` becomes `>=1.0.0 <2.0.0-beta` and starts admitting beta
//! builds, while versions from other tracks (`alpha`, `rc`) stay excluded.

use super::range::VersionRange;
use super::{Version, parse_tag, prerelease_track};
use crate::core::ResolveError;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// A caller-supplied rule a resolved version must satisfy.
///
/// # Examples
///
/// ```rust
/// use vcs_resolver::version::Criteria;
///
/// let stable = Criteria::constraint(">=1.0.0, <2.0.0");
/// let pinned = Criteria::branch("main");
///
/// assert_eq!(stable.to_string(), ">=1.0.0, <2.0.0");
/// assert_eq!(pinned.to_string(), "branch main");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Criteria {
    /// Version range expression, e.g. `>=1.0.0 <2.0.0` or `*`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint: Option<String>,

    /// Branch the version must be on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

impl Criteria {
    /// Criteria satisfied by versions in the given range.
    #[must_use]
    pub fn constraint(constraint: impl Into<String>) -> Self {
        Self {
            constraint: Some(constraint.into()),
            branch: None,
        }
    }

    /// Criteria satisfied only by the head of `branch`.
    #[must_use]
    pub fn branch(branch: impl Into<String>) -> Self {
        Self {
            constraint: None,
            branch: Some(branch.into()),
        }
    }

    /// The branch pin, ignoring an empty string.
    #[must_use]
    pub fn branch_name(&self) -> Option<&str> {
        self.branch.as_deref().filter(|b| !b.is_empty())
    }

    /// The constraint text, ignoring an empty string.
    ///
    /// Blank text is kept so that parsing rejects it.
    #[must_use]
    pub fn constraint_text(&self) -> Option<&str> {
        self.constraint.as_deref().filter(|c| !c.is_empty())
    }

    /// Compiles the constraint.
    ///
    /// A criterion without a constraint parses to one without a range, which
    /// only its branch pin (if any) can satisfy.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::UnsupportedConstraint`] if the constraint uses `||` or `&&`
    /// - [`ResolveError::InvalidConstraint`] if it is not a valid range expression
    pub fn parse(&self) -> Result<ParsedCriteria, ResolveError> {
        let Some(constraint) = self.constraint_text() else {
            return Ok(ParsedCriteria {
                criteria: self.clone(),
                range: None,
                prerelease: None,
            });
        };

        if constraint.contains("||") || constraint.contains("&&") {
            return Err(ResolveError::UnsupportedConstraint {
                constraint: constraint.to_string(),
            });
        }

        let prerelease = constraint_track(constraint);
        let range =
            VersionRange::parse(constraint).map_err(|e| ResolveError::InvalidConstraint {
                constraint: constraint.to_string(),
                reason: e.to_string(),
            })?;

        Ok(ParsedCriteria {
            criteria: self.clone(),
            range: Some(range),
            prerelease,
        })
    }
}

impl fmt::Display for Criteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.branch_name(), self.constraint_text()) {
            (Some(branch), _) => write!(f, "branch {branch}"),
            (None, Some(constraint)) => f.write_str(constraint),
            (None, None) => Ok(()),
        }
    }
}

/// The pre-release track of the version a constraint starts with.
///
/// Leading operator characters are dropped; if what remains is a single
/// version (`1.2.0-beta` in `^1.2.0-beta`), its track is returned.
fn constraint_track(constraint: &str) -> Option<String> {
    let version = constraint.trim_start_matches(|c: char| c != 'v' && !c.is_ascii_digit());
    parse_tag(version)
        .as_ref()
        .and_then(prerelease_track)
        .map(str::to_string)
}

/// A [`Criteria`] whose constraint has been compiled.
///
/// Obtained from [`Criteria::parse`]. Parsing is deterministic, so parsing the
/// same criteria twice yields equal values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCriteria {
    criteria: Criteria,
    range: Option<VersionRange>,
    prerelease: Option<String>,
}

impl ParsedCriteria {
    /// The criteria this was parsed from; for a widened value, the widened text.
    #[must_use]
    pub const fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    /// The compiled range, absent when the criteria had no constraint.
    #[must_use]
    pub const fn range(&self) -> Option<&VersionRange> {
        self.range.as_ref()
    }

    /// The pre-release track this criterion pins.
    #[must_use]
    pub fn prerelease(&self) -> Option<&str> {
        self.prerelease.as_deref()
    }

    /// The branch pin.
    #[must_use]
    pub fn branch(&self) -> Option<&str> {
        self.criteria.branch_name()
    }

    /// Derives the criterion to use when resolution pins pre-release `track`.
    ///
    /// Returns `self` unchanged when there is no track, when the criterion
    /// already pins a track of its own, or when it has no range. Otherwise the
    /// constraint is widened to `<constraint>-<track>` and re-parsed. Trailing
    /// separators are dropped first, so `>=1.0.0,` widens to `>=1.0.0-<track>`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::WidenedConstraint`] if the widened text does
    /// not parse. This cannot happen for a well-formed pre-release track.
    pub fn for_track(&self, track: Option<&str>) -> Result<Cow<'_, Self>, ResolveError> {
        let (Some(track), None, Some(constraint)) =
            (track, self.prerelease.as_deref(), self.criteria.constraint_text())
        else {
            return Ok(Cow::Borrowed(self));
        };

        let last = constraint.trim_end_matches(|c: char| c == ',' || c.is_whitespace());
        let widened = format!("{last}-{track}");
        let range =
            VersionRange::parse(&widened).map_err(|e| ResolveError::WidenedConstraint {
                constraint: widened.clone(),
                reason: e.to_string(),
            })?;

        Ok(Cow::Owned(Self {
            criteria: Criteria {
                constraint: Some(widened),
                branch: self.criteria.branch.clone(),
            },
            range: Some(range),
            prerelease: Some(track.to_string()),
        }))
    }

    /// Returns `true` if `version` satisfies this criterion.
    ///
    /// `prerelease` is the track the whole resolution pins and `branch` the
    /// branch it requests. Rules, in order:
    ///
    /// 1. A branch pin is satisfied by a version on that branch.
    /// 2. When the resolution requests a branch, a criterion without a branch
    ///    pin is vacuously satisfied.
    /// 3. A range is checked against tagged versions only. A version or
    ///    criterion on a different pre-release track than the resolution's
    ///    never matches; a criterion without its own track is evaluated in
    ///    its [widened](Self::for_track) form.
    ///
    /// # Panics
    ///
    /// Panics if widening fails, which requires passing a `prerelease` that is
    /// not a valid pre-release identifier. [`Resolver`](crate::resolver::Resolver)
    /// widens criteria up front and never reaches this.
    #[must_use]
    pub fn check(&self, version: &Version, prerelease: Option<&str>, branch: Option<&str>) -> bool {
        if let Some(pinned) = self.branch() {
            if version.branch() == Some(pinned) {
                return true;
            }
        }

        if branch.is_some() && self.branch().is_none() {
            return true;
        }

        let (Some(range), Some(semver)) = (self.range.as_ref(), version.semver()) else {
            return false;
        };

        if self.prerelease.is_some() && self.prerelease.as_deref() != prerelease {
            return false;
        }

        let Some(track) = prerelease else {
            return range.matches(semver);
        };

        if prerelease_track(semver).is_some_and(|own| own != track) {
            return false;
        }

        if self.prerelease.is_none() {
            return match self.for_track(Some(track)) {
                Ok(widened) => widened.range.as_ref().is_some_and(|r| r.matches(semver)),
                Err(e) => panic!("{e}"),
            };
        }

        range.matches(semver)
    }
}

impl fmt::Display for ParsedCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.criteria.fmt(f)
    }
}

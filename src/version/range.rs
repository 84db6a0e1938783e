//! Version range expressions.
//!
//! A [`VersionRange`] is a list of comparators that must all hold. The syntax is
//! the one dependency manifests commonly use for git-hosted releases:
//!
//! | Syntax | Meaning |
//! |--------|---------|
//! | `>=1.0.0 <2.0.0` | whitespace or commas separate comparators (AND) |
//! | `1.2.0`, `^1.2.0` | caret: compatible within the left-most non-zero component |
//! | `~1.2.0`, `~>1.2.0` | tilde: compatible within the minor version |
//! | `=1.2`, `!=1.2.3` | exact / excluded (partial versions match any omitted part) |
//! | `1.x`, `1.2.*` | wildcards |
//! | `*` | anything |
//! | `1.2 - 1.4` | hyphen range, `>=1.2 <=1.4` |
//!
//! Versions may carry a `v` prefix and build metadata (ignored).
//!
//! # Pre-releases
//!
//! Unlike `semver::VersionReq`, which only admits pre-releases sharing the exact
//! `major.minor.patch` of a comparator, a range here admits pre-release versions
//! as soon as any of its comparators carries a pre-release suffix, and excludes
//! them otherwise. Appending `-beta` to `>=1.0.0 <2.0.0` therefore turns it into a
//! range that also accepts `1.4.0-beta.2`. The pre-release suffix may be attached
//! to partial and wildcard versions too (`*-beta`, `1.x-rc`). On a partial
//! lower bound the missing parts count as 0, so `>=1-beta` means `>=1.0.0-beta`.

use semver::{Comparator, Op, Prerelease, Version};
use std::cmp::Ordering;
use thiserror::Error;

/// Reasons a range expression is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    /// The expression contains no comparators.
    #[error("empty version range")]
    Empty,

    /// An operator was not followed by a version.
    #[error("operator '{op}' is missing a version")]
    MissingVersion {
        /// The dangling operator
        op: String,
    },

    /// A hyphen range is missing one of its bounds.
    #[error("hyphen range is missing a bound")]
    IncompleteHyphenRange,

    /// A version inside the expression is malformed.
    #[error("invalid version '{text}': {reason}")]
    InvalidVersion {
        /// The offending text
        text: String,
        /// What is wrong with it
        reason: String,
    },
}

/// Operators accepted in front of a version, longest spellings first.
const OPERATORS: &[(&str, RangeOp)] = &[
    (">=", RangeOp::GreaterEq),
    ("=>", RangeOp::GreaterEq),
    ("<=", RangeOp::LessEq),
    ("=<", RangeOp::LessEq),
    ("!=", RangeOp::NotEqual),
    ("~>", RangeOp::Tilde),
    (">", RangeOp::Greater),
    ("<", RangeOp::Less),
    ("=", RangeOp::Exact),
    ("~", RangeOp::Tilde),
    ("^", RangeOp::Caret),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RangeOp {
    Bare,
    Exact,
    NotEqual,
    Greater,
    GreaterEq,
    Less,
    LessEq,
    Tilde,
    Caret,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Predicate {
    Any,
    Matches(Comparator),
    Excludes(Comparator),
}

/// A parsed version range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRange {
    predicates: Vec<Predicate>,
    allows_prerelease: bool,
}

/// A version as written inside a range: possibly partial, possibly wildcarded.
struct Pattern {
    major: Option<u64>,
    minor: Option<u64>,
    patch: Option<u64>,
    pre: Prerelease,
    wildcard: bool,
}

impl VersionRange {
    /// Parses a range expression.
    ///
    /// # Errors
    ///
    /// Returns a [`RangeError`] describing the first malformed part of `input`.
    pub fn parse(input: &str) -> Result<Self, RangeError> {
        let tokens: Vec<&str> = input
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .collect();
        if tokens.is_empty() {
            return Err(RangeError::Empty);
        }

        let mut predicates = Vec::with_capacity(tokens.len());
        let mut allows_prerelease = false;
        let mut i = 0;
        while i < tokens.len() {
            let token = tokens[i];
            if token == "-" {
                return Err(RangeError::IncompleteHyphenRange);
            }

            if tokens.get(i + 1) == Some(&"-") {
                let upper = tokens.get(i + 2).ok_or(RangeError::IncompleteHyphenRange)?;
                let lower = parse_pattern(token)?;
                let upper = parse_pattern(upper)?;
                allows_prerelease |= !lower.pre.is_empty() || !upper.pre.is_empty();
                predicates.push(build_predicate(RangeOp::GreaterEq, lower, token)?);
                predicates.push(build_predicate(RangeOp::LessEq, upper, tokens[i + 2])?);
                i += 3;
                continue;
            }

            let (op, spelled, rest) = split_operator(token);
            let text = if rest.is_empty() {
                i += 1;
                *tokens.get(i).ok_or_else(|| RangeError::MissingVersion {
                    op: spelled.to_string(),
                })?
            } else {
                rest
            };

            let pattern = parse_pattern(text)?;
            allows_prerelease |= !pattern.pre.is_empty();
            predicates.push(build_predicate(op, pattern, text)?);
            i += 1;
        }

        Ok(Self {
            predicates,
            allows_prerelease,
        })
    }

    /// Returns `true` if the range admits pre-release versions at all.
    #[must_use]
    pub const fn allows_prerelease(&self) -> bool {
        self.allows_prerelease
    }

    /// Returns `true` if `version` satisfies every comparator of the range.
    #[must_use]
    pub fn matches(&self, version: &Version) -> bool {
        if !version.pre.is_empty() && !self.allows_prerelease {
            return false;
        }

        self.predicates.iter().all(|predicate| match predicate {
            Predicate::Any => true,
            Predicate::Matches(cmp) => matches_comparator(cmp, version),
            Predicate::Excludes(cmp) => !matches_comparator(cmp, version),
        })
    }
}

fn split_operator(token: &str) -> (RangeOp, &str, &str) {
    for (spelling, op) in OPERATORS {
        if let Some(rest) = token.strip_prefix(spelling) {
            return (*op, *spelling, rest);
        }
    }
    (RangeOp::Bare, "", token)
}

fn invalid(text: &str, reason: impl Into<String>) -> RangeError {
    RangeError::InvalidVersion {
        text: text.to_string(),
        reason: reason.into(),
    }
}

fn parse_pattern(text: &str) -> Result<Pattern, RangeError> {
    let (core, pre, _build) = super::split_version_text(text);
    if core.is_empty() {
        return Err(invalid(text, "missing version number"));
    }

    let pre = match pre {
        Some("") => return Err(invalid(text, "empty pre-release")),
        Some(pre) => Prerelease::new(pre).map_err(|e| invalid(text, e.to_string()))?,
        None => Prerelease::EMPTY,
    };

    let parts: Vec<&str> = core.split('.').collect();
    if parts.len() > 3 {
        return Err(invalid(text, "too many version components"));
    }

    let mut numbers = [None; 3];
    let mut wildcard = false;
    for (slot, part) in numbers.iter_mut().zip(&parts) {
        if matches!(*part, "x" | "X" | "*") {
            wildcard = true;
            continue;
        }
        if wildcard {
            return Err(invalid(text, "number after wildcard"));
        }
        *slot = Some(super::parse_numeric(part).ok_or_else(|| {
            invalid(text, format!("'{part}' is not a number"))
        })?);
    }

    Ok(Pattern {
        major: numbers[0],
        minor: numbers[1],
        patch: numbers[2],
        pre,
        wildcard,
    })
}

fn build_predicate(op: RangeOp, pattern: Pattern, text: &str) -> Result<Predicate, RangeError> {
    let Some(major) = pattern.major else {
        return match op {
            RangeOp::NotEqual | RangeOp::Greater | RangeOp::Less => {
                Err(invalid(text, "wildcard cannot be used with this operator"))
            }
            _ => Ok(Predicate::Any),
        };
    };

    let excludes = op == RangeOp::NotEqual;
    let op = match op {
        RangeOp::Bare | RangeOp::Exact if pattern.wildcard => Op::Wildcard,
        RangeOp::Bare | RangeOp::Caret => Op::Caret,
        RangeOp::Exact | RangeOp::NotEqual => Op::Exact,
        RangeOp::Greater => Op::Greater,
        RangeOp::GreaterEq => Op::GreaterEq,
        RangeOp::Less => Op::Less,
        RangeOp::LessEq => Op::LessEq,
        RangeOp::Tilde => Op::Tilde,
    };

    let cmp = Comparator {
        op,
        major,
        minor: pattern.minor,
        patch: pattern.patch,
        pre: pattern.pre,
    };

    Ok(if excludes {
        Predicate::Excludes(cmp)
    } else {
        Predicate::Matches(cmp)
    })
}

fn matches_comparator(cmp: &Comparator, ver: &Version) -> bool {
    match cmp.op {
        Op::Exact => matches_exact(cmp, ver),
        Op::Wildcard => matches_wildcard(cmp, ver),
        Op::Greater => matches_greater(cmp, ver),
        Op::GreaterEq => at_least(cmp, ver),
        Op::Less => matches_less(cmp, ver),
        Op::LessEq => {
            let partial = cmp.minor.is_none() || cmp.patch.is_none();
            let at_bound = if partial {
                matches_wildcard(cmp, ver)
            } else {
                matches_exact(cmp, ver)
            };
            at_bound || matches_less(cmp, ver)
        }
        Op::Tilde => matches_tilde(cmp, ver),
        Op::Caret => matches_caret(cmp, ver),
        _ => false,
    }
}

/// Orders `ver` against the lowest version `cmp` names, missing parts as 0.
fn cmp_floor(cmp: &Comparator, ver: &Version) -> Ordering {
    (ver.major, ver.minor, ver.patch)
        .cmp(&(cmp.major, cmp.minor.unwrap_or(0), cmp.patch.unwrap_or(0)))
        .then_with(|| ver.pre.cmp(&cmp.pre))
}

fn at_least(cmp: &Comparator, ver: &Version) -> bool {
    cmp_floor(cmp, ver) != Ordering::Less
}

fn matches_wildcard(cmp: &Comparator, ver: &Version) -> bool {
    ver.major == cmp.major
        && cmp.minor.is_none_or(|minor| ver.minor == minor)
        && cmp.patch.is_none_or(|patch| ver.patch == patch)
}

fn matches_exact(cmp: &Comparator, ver: &Version) -> bool {
    matches_wildcard(cmp, ver) && ver.pre == cmp.pre
}

fn matches_greater(cmp: &Comparator, ver: &Version) -> bool {
    if ver.major != cmp.major {
        return ver.major > cmp.major;
    }
    let Some(minor) = cmp.minor else {
        return false;
    };
    if ver.minor != minor {
        return ver.minor > minor;
    }
    let Some(patch) = cmp.patch else {
        return false;
    };
    if ver.patch != patch {
        return ver.patch > patch;
    }
    ver.pre > cmp.pre
}

fn matches_less(cmp: &Comparator, ver: &Version) -> bool {
    if !cmp.pre.is_empty() {
        return cmp_floor(cmp, ver) == Ordering::Less;
    }
    if ver.major != cmp.major {
        return ver.major < cmp.major;
    }
    let Some(minor) = cmp.minor else {
        return false;
    };
    if ver.minor != minor {
        return ver.minor < minor;
    }
    let Some(patch) = cmp.patch else {
        return false;
    };
    if ver.patch != patch {
        return ver.patch < patch;
    }
    ver.pre < cmp.pre
}

fn matches_tilde(cmp: &Comparator, ver: &Version) -> bool {
    ver.major == cmp.major
        && cmp.minor.is_none_or(|minor| ver.minor == minor)
        && at_least(cmp, ver)
}

fn matches_caret(cmp: &Comparator, ver: &Version) -> bool {
    if ver.major != cmp.major {
        return false;
    }
    let Some(minor) = cmp.minor else {
        return at_least(cmp, ver);
    };
    let Some(patch) = cmp.patch else {
        let compatible = if cmp.major > 0 {
            ver.minor >= minor
        } else {
            ver.minor == minor
        };
        return compatible && at_least(cmp, ver);
    };

    if cmp.major > 0 {
        if ver.minor != minor {
            return ver.minor > minor;
        } else if ver.patch != patch {
            return ver.patch > patch;
        }
    } else if minor > 0 {
        if ver.minor != minor {
            return false;
        } else if ver.patch != patch {
            return ver.patch > patch;
        }
    } else if ver.minor != minor || ver.patch != patch {
        return false;
    }

    ver.pre >= cmp.pre
}

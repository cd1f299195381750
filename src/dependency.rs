//! Package dependencies declared by catalog variants.
//!
//! Constraints use npm range syntax (`^2.3`, `~1.4.0`, `>=1.0 <2.0`, `latest`).
//! Each constraint is reduced to a half-open version interval so that two
//! declarations of the same package can be intersected. Pre-release tags are
//! ignored when computing intervals.

use std::cmp::Ordering;
use std::fmt;

use indexmap::IndexMap;
use log::debug;
use semver::{Comparator, Op, Version, VersionReq};

use crate::error::{Error, Result};

/// Constraints that accept any published version.
const ANY_CONSTRAINTS: [&str; 4] = ["", "*", "x", "latest"];

/// A version constraint as written in a manifest, plus the interval it denotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    raw: String,
    kind: Kind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Kind {
    Any,
    Range(Bounds),
}

/// `lower <= v < upper`; a missing upper bound is unbounded.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Bounds {
    lower: Version,
    upper: Option<Version>,
}

impl Bounds {
    fn full() -> Self {
        Bounds { lower: Version::new(0, 0, 0), upper: None }
    }

    fn is_empty(&self) -> bool {
        matches!(&self.upper, Some(upper) if *upper <= self.lower)
    }

    fn is_within(&self, other: &Bounds) -> bool {
        self.lower >= other.lower && upper_cmp(&self.upper, &other.upper) != Ordering::Greater
    }

    fn intersect(&self, other: &Bounds) -> Bounds {
        let lower = std::cmp::max(&self.lower, &other.lower).clone();
        let upper = match upper_cmp(&self.upper, &other.upper) {
            Ordering::Greater => other.upper.clone(),
            _ => self.upper.clone(),
        };
        Bounds { lower, upper }
    }
}

fn upper_cmp(a: &Option<Version>, b: &Option<Version>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl Constraint {
    /// Parses an npm-style constraint declared for package `name`.
    ///
    /// # Errors
    /// * `Error::InvalidConstraint` for unions (`||`), unparseable ranges and
    ///   ranges that match no version
    pub fn parse(name: &str, raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let invalid = |reason: String| Error::InvalidConstraint {
            name: name.to_string(),
            constraint: raw.to_string(),
            reason,
        };

        if ANY_CONSTRAINTS.contains(&raw) {
            let raw = if raw.is_empty() { "*" } else { raw };
            return Ok(Constraint { raw: raw.to_string(), kind: Kind::Any });
        }
        if raw.contains("||") {
            return Err(invalid("union ranges are not supported".to_string()));
        }

        let req = VersionReq::parse(&normalize(raw)).map_err(|e| invalid(e.to_string()))?;
        let mut bounds = Bounds::full();
        for comparator in &req.comparators {
            bounds = bounds.intersect(&comparator_bounds(comparator).map_err(invalid)?);
        }
        if bounds.is_empty() {
            return Err(invalid("range matches no version".to_string()));
        }

        Ok(Constraint { raw: raw.to_string(), kind: Kind::Range(bounds) })
    }

    /// The constraint as it will appear in the manifest.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_any(&self) -> bool {
        matches!(self.kind, Kind::Any)
    }

    /// Returns the most restrictive constraint accepted by both `self` and
    /// `other`, or `None` when the two ranges do not overlap.
    ///
    /// When one range contains the other, the narrower one is returned
    /// unchanged. Equal ranges keep `self`. Partially overlapping ranges yield
    /// an explicit `>=L <U` range.
    pub fn intersect(&self, other: &Constraint) -> Option<Constraint> {
        match (&self.kind, &other.kind) {
            (Kind::Any, Kind::Any) | (Kind::Range(_), Kind::Any) => Some(self.clone()),
            (Kind::Any, Kind::Range(_)) => Some(other.clone()),
            (Kind::Range(a), Kind::Range(b)) => {
                if a.is_within(b) {
                    Some(self.clone())
                } else if b.is_within(a) {
                    Some(other.clone())
                } else {
                    let bounds = a.intersect(b);
                    if bounds.is_empty() {
                        None
                    } else {
                        Some(Constraint::from_bounds(bounds))
                    }
                }
            }
        }
    }

    fn from_bounds(bounds: Bounds) -> Self {
        let raw = match &bounds.upper {
            Some(upper) => format!(">={} <{}", bounds.lower, upper),
            None => format!(">={}", bounds.lower),
        };
        Constraint { raw, kind: Kind::Range(bounds) }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Rewrites npm's whitespace-separated comparators into the comma-separated
/// form understood by `semver`, keeping `>= 1.2` style operators attached.
/// A bare full version is exact in npm but caret in `semver`, so it gets an
/// explicit `=`.
fn normalize(raw: &str) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut pending_op = String::new();
    for token in raw.split_whitespace() {
        let token = token.trim_end_matches(',');
        if token.chars().all(|c| matches!(c, '<' | '>' | '=' | '~' | '^')) {
            pending_op.push_str(token);
            continue;
        }
        let is_bare_version = token.split('.').count() == 3
            && token.split('.').all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()));
        if pending_op.is_empty() && is_bare_version {
            pending_op.push('=');
        }
        parts.push(format!("{}{}", std::mem::take(&mut pending_op), token));
    }
    if !pending_op.is_empty() {
        parts.push(pending_op);
    }
    parts.join(", ")
}

fn comparator_bounds(c: &Comparator) -> std::result::Result<Bounds, String> {
    let overflow = || format!("version component overflows in '{}'", c);
    let bump = |n: u64| n.checked_add(1).ok_or_else(overflow);

    let major = c.major;
    let minor = c.minor.unwrap_or(0);
    let patch = c.patch.unwrap_or(0);
    let floor = Version::new(major, minor, patch);
    // Smallest version above everything the comparator's partial version names.
    let next = || -> std::result::Result<Version, String> {
        Ok(match (c.minor, c.patch) {
            (Some(minor), Some(patch)) => Version::new(major, minor, bump(patch)?),
            (Some(minor), None) => Version::new(major, bump(minor)?, 0),
            _ => Version::new(bump(major)?, 0, 0),
        })
    };

    let bounds = match c.op {
        Op::Exact | Op::Wildcard => Bounds { lower: floor, upper: Some(next()?) },
        Op::Greater => Bounds { lower: next()?, upper: None },
        Op::GreaterEq => Bounds { lower: floor, upper: None },
        Op::Less => Bounds { lower: Version::new(0, 0, 0), upper: Some(floor) },
        Op::LessEq => Bounds { lower: Version::new(0, 0, 0), upper: Some(next()?) },
        Op::Tilde => {
            let upper = match c.minor {
                Some(minor) => Version::new(major, bump(minor)?, 0),
                None => Version::new(bump(major)?, 0, 0),
            };
            Bounds { lower: floor, upper: Some(upper) }
        }
        Op::Caret => {
            let upper = match (major, c.minor, c.patch) {
                (0, None, _) => Version::new(1, 0, 0),
                (0, Some(0), None) => Version::new(0, 1, 0),
                (0, Some(0), Some(patch)) => Version::new(0, 0, bump(patch)?),
                (0, Some(minor), _) => Version::new(0, bump(minor)?, 0),
                (major, _, _) => Version::new(bump(major)?, 0, 0),
            };
            Bounds { lower: floor, upper: Some(upper) }
        }
        _ => return Err(format!("unsupported operator in '{}'", c)),
    };
    Ok(bounds)
}

/// A dependency entry together with the catalog entry that introduced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredDependency {
    pub constraint: Constraint,
    pub origin: String,
}

/// Dependencies merged across the selected variants, keyed by package name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencySet {
    entries: IndexMap<String, DeclaredDependency>,
}

impl DependencySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a declaration, narrowing any existing constraint for the package.
    ///
    /// # Errors
    /// * `Error::DependencyConflict` if the two constraints do not overlap
    pub fn merge(&mut self, name: &str, constraint: &Constraint, origin: &str) -> Result<()> {
        let Some(existing) = self.entries.get_mut(name) else {
            self.entries.insert(
                name.to_string(),
                DeclaredDependency { constraint: constraint.clone(), origin: origin.to_string() },
            );
            return Ok(());
        };

        let merged = existing.constraint.intersect(constraint).ok_or_else(|| {
            Error::DependencyConflict {
                name: name.to_string(),
                first: existing.constraint.to_string(),
                first_origin: existing.origin.clone(),
                second: constraint.to_string(),
                second_origin: origin.to_string(),
            }
        })?;

        if merged != existing.constraint {
            debug!(
                "Narrowed '{}' from '{}' ({}) to '{}' with '{}' ({})",
                name, existing.constraint, existing.origin, merged, constraint, origin
            );
            existing.origin = if merged == *constraint {
                origin.to_string()
            } else {
                format!("{} + {}", existing.origin, origin)
            };
            existing.constraint = merged;
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&DeclaredDependency> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in the order packages were first declared.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DeclaredDependency)> {
        self.entries.iter().map(|(name, dep)| (name.as_str(), dep))
    }

    /// Returns the `package -> constraint` fragment of a manifest, sorted by name.
    pub fn to_manifest(&self) -> IndexMap<String, String> {
        let mut manifest: IndexMap<String, String> = self
            .entries
            .iter()
            .map(|(name, dep)| (name.clone(), dep.constraint.to_string()))
            .collect();
        manifest.sort_keys();
        manifest
    }
}

//! Filter sets and the keep/skip decision for a single entry.
//!
//! Two families of patterns take part in a decision:
//!
//! - **Always-include** patterns are matched against the bare basename and win
//!   over everything else
//! - **Ignore** patterns are matched against the type-qualified name
//!   (`name` for files, `name/` for directories)

use crate::entry::Entry;
use crate::pattern::{candidate_name, GlobPattern};

/// An ordered set of glob patterns.
///
/// Order follows insertion but does not affect matching: any match counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    patterns: Vec<GlobPattern>,
}

impl FilterSet {
    /// Create an empty filter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a filter set from pattern strings, compiling them leniently.
    pub fn from_patterns<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        set.extend(patterns);
        set
    }

    /// Union more patterns into the set. Duplicates are not added twice.
    pub fn extend<I, S>(&mut self, patterns: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for pattern in patterns {
            self.insert(GlobPattern::new(pattern.as_ref()));
        }
    }

    /// Add a compiled pattern unless one with the same text is present.
    pub fn insert(&mut self, pattern: GlobPattern) {
        if !self.patterns.contains(&pattern) {
            self.patterns.push(pattern);
        }
    }

    /// A new set holding these patterns followed by `patterns`.
    pub fn with_patterns<I, S>(&self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = self.clone();
        set.extend(patterns);
        set
    }

    /// Return the first pattern matching `candidate`, if any.
    pub fn find_match(&self, candidate: &str) -> Option<&GlobPattern> {
        self.patterns.iter().find(|p| p.matches(candidate))
    }

    /// Check whether any pattern matches `candidate`.
    pub fn matches(&self, candidate: &str) -> bool {
        self.find_match(candidate).is_some()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Pattern sources, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(GlobPattern::as_str)
    }
}

/// Outcome of classifying one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// No rule applied
    Keep,
    /// An always-include pattern matched
    ForceKeep { pattern: String },
    /// An ignore pattern matched
    Skip { pattern: String },
}

impl Decision {
    pub fn is_kept(&self) -> bool {
        !matches!(self, Decision::Skip { .. })
    }
}

/// Decide whether a name survives the filters.
///
/// Always-include patterns see only the basename, even for directories; the
/// ignore check sees `basename/` for directories.
pub fn classify_name(
    basename: &str,
    is_dir: bool,
    ignore: &FilterSet,
    always_include: &FilterSet,
) -> Decision {
    if let Some(pattern) = always_include.find_match(basename) {
        return Decision::ForceKeep {
            pattern: pattern.as_str().to_string(),
        };
    }

    match ignore.find_match(&candidate_name(basename, is_dir)) {
        Some(pattern) => Decision::Skip {
            pattern: pattern.as_str().to_string(),
        },
        None => Decision::Keep,
    }
}

/// Decide whether an entry survives the filters.
pub fn classify(entry: &Entry, ignore: &FilterSet, always_include: &FilterSet) -> Decision {
    classify_name(&entry.basename, entry.is_dir(), ignore, always_include)
}

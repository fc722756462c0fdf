//! Glob pattern matching against single path segments.
//!
//! Patterns follow shell-glob conventions (`*`, `**`, `?`, `[...]`) with a few
//! ignore-file rules layered on top:
//!
//! - Wildcards never match `/` and never match a leading `.`
//! - Directory candidates carry a trailing `/` (see [`candidate_name`]), so a
//!   pattern such as `build/` only matches directories
//! - A pattern without a trailing `/` matches a directory candidate too
//! - Brace alternatives (`*.{js,ts}`) are expanded before matching
//! - minimatch spellings are accepted: `**` inside a segment acts as `*`,
//!   `[^...]` negates a class, and a backslash escapes the next character

use std::fmt;

use glob::{MatchOptions, Pattern};
use tracing::debug;

use crate::error::DirwalkError;
use crate::Result;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// A compiled glob pattern.
///
/// Keeps the source text around so decisions can be reported by the rule
/// that produced them.
#[derive(Clone)]
pub struct GlobPattern {
    source: String,
    alternatives: Vec<Pattern>,
}

impl GlobPattern {
    /// Compile a pattern leniently.
    ///
    /// Alternatives that fail to compile are dropped; a pattern with no
    /// valid alternative never matches anything.
    pub fn new(source: &str) -> Self {
        let alternatives = expand_braces(source)
            .iter()
            .filter_map(|alt| match Pattern::new(&normalize(alt)) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    debug!(pattern = source, error = %e, "dropping malformed glob pattern");
                    None
                }
            })
            .collect();

        Self {
            source: source.to_string(),
            alternatives,
        }
    }

    /// Compile a pattern strictly, rejecting anything malformed.
    pub fn parse(source: &str) -> Result<Self> {
        let mut alternatives = Vec::new();
        for alt in expand_braces(source) {
            let pattern = Pattern::new(&normalize(&alt)).map_err(|e| DirwalkError::InvalidGlob {
                pattern: source.to_string(),
                message: e.to_string(),
            })?;
            alternatives.push(pattern);
        }

        Ok(Self {
            source: source.to_string(),
            alternatives,
        })
    }

    /// The pattern as it was written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Check a candidate name (see [`candidate_name`]) against this pattern.
    pub fn matches(&self, candidate: &str) -> bool {
        self.alternatives.iter().any(|pattern| {
            if pattern.matches_with(candidate, MATCH_OPTIONS) {
                return true;
            }
            // `foo` also matches the directory `foo/`
            !pattern.as_str().ends_with('/')
                && candidate
                    .strip_suffix('/')
                    .is_some_and(|bare| pattern.matches_with(bare, MATCH_OPTIONS))
        })
    }
}

impl fmt::Debug for GlobPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("GlobPattern").field(&self.source).finish()
    }
}

impl fmt::Display for GlobPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl PartialEq for GlobPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for GlobPattern {}

/// Build the name a pattern is matched against.
///
/// Directories get a trailing `/` so patterns can target them specifically.
pub fn candidate_name(basename: &str, is_dir: bool) -> String {
    if is_dir {
        format!("{basename}/")
    } else {
        basename.to_string()
    }
}

/// Match a candidate name against a pattern string.
///
/// Malformed patterns never match.
pub fn glob_match(candidate: &str, pattern: &str) -> bool {
    GlobPattern::new(pattern).matches(candidate)
}

/// Rewrite minimatch-only syntax into what `glob::Pattern` understands.
///
/// A run of `*` that is not a whole segment collapses to `*`; `[^` becomes
/// `[!`; an escaped wildcard becomes a one-character class and any other
/// escaped character stands for itself.
fn normalize(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len());
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '\\' if i + 1 < chars.len() => {
                let c = chars[i + 1];
                if matches!(c, '*' | '?' | '[' | ']') {
                    out.push('[');
                    out.push(c);
                    out.push(']');
                } else {
                    out.push(c);
                }
                i += 2;
            }
            '[' if chars.get(i + 1) == Some(&'^') => {
                out.push_str("[!");
                i += 2;
            }
            '*' => {
                let start = i;
                while chars.get(i) == Some(&'*') {
                    i += 1;
                }
                let whole_segment = (start == 0 || chars[start - 1] == '/')
                    && (i == chars.len() || chars[i] == '/');
                if i - start > 1 && whole_segment {
                    out.push_str("**");
                } else {
                    out.push('*');
                }
            }
            c => {
                out.push(c);
                i += 1;
            }
        }
    }

    out
}

/// Expand brace alternatives: `*.{js,ts}` becomes `*.js` and `*.ts`.
///
/// Only groups containing a top-level comma are expanded; `{a}`, escaped
/// braces and unbalanced braces are kept literally.
pub fn expand_braces(pattern: &str) -> Vec<String> {
    let chars: Vec<char> = pattern.chars().collect();

    let mut depth = 0usize;
    let mut open = None;
    let mut group = None;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '{' => {
                if depth == 0 {
                    open = Some(i);
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    if let Some(start) = open.take() {
                        let inner: String = chars[start + 1..i].iter().collect();
                        if split_alternatives(&inner).len() > 1 {
                            group = Some((start, i));
                            break;
                        }
                    }
                }
            }
            _ => {}
        }
    }

    let Some((start, end)) = group else {
        return vec![pattern.to_string()];
    };

    let prefix: String = chars[..start].iter().collect();
    let suffix: String = chars[end + 1..].iter().collect();
    let inner: String = chars[start + 1..end].iter().collect();

    split_alternatives(&inner)
        .into_iter()
        .flat_map(|alt| expand_braces(&format!("{prefix}{alt}{suffix}")))
        .collect()
}

/// Split brace content on top-level commas.
fn split_alternatives(content: &str) -> Vec<String> {
    let mut alternatives = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut escaped = false;

    for c in content.chars() {
        if escaped {
            escaped = false;
            current.push(c);
            continue;
        }
        match c {
            '\\' => {
                escaped = true;
                current.push(c);
            }
            '{' => {
                depth += 1;
                current.push(c);
            }
            '}' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            ',' if depth == 0 => alternatives.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    alternatives.push(current);

    alternatives
}

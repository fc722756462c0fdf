//! Ignore-file discovery and parsing.
//!
//! An ignore-file spec names one or more alternative files, e.g.
//! `".npmignore, .gitignore"`: the first one that exists in a directory is
//! loaded and the rest are ignored. Several specs are resolved independently
//! and their patterns concatenated in declaration order.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

/// A fallback chain of ignore-file names.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IgnoreFileSpec {
    candidates: Vec<String>,
}

impl IgnoreFileSpec {
    /// Parse a spec string; names are separated by commas and/or whitespace.
    pub fn parse(spec: &str) -> Self {
        let candidates = spec
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();

        Self { candidates }
    }

    /// Build a spec from an explicit list of candidate names.
    pub fn from_candidates<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            candidates: candidates.into_iter().map(Into::into).collect(),
        }
    }

    /// Candidate file names, in fallback order.
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Find the first candidate present in `dir`.
    pub fn resolve(&self, dir: &Path) -> Option<PathBuf> {
        self.candidates
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
    }
}

impl FromStr for IgnoreFileSpec {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for IgnoreFileSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.candidates.join(", "))
    }
}

impl Serialize for IgnoreFileSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for IgnoreFileSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let spec = String::deserialize(deserializer)?;
        Ok(Self::parse(&spec))
    }
}

/// Split ignore-file text into patterns.
///
/// Carriage returns are stripped, lines trimmed, and blank or `#` comment
/// lines dropped.
pub fn parse_ignore_text(text: &str) -> Vec<String> {
    text.replace('\r', "")
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Read one ignore file. Unreadable files yield no patterns.
pub fn load_ignore_file(path: &Path) -> Vec<String> {
    match fs::read(path) {
        Ok(bytes) => {
            let patterns = parse_ignore_text(&String::from_utf8_lossy(&bytes));
            debug!(path = %path.display(), count = patterns.len(), "loaded ignore file");
            patterns
        }
        Err(e) => {
            debug!(path = %path.display(), error = %e, "ignore file unreadable, skipping");
            Vec::new()
        }
    }
}

/// Load the patterns every spec contributes for `dir`.
pub fn load_ignore_files(dir: &Path, specs: &[IgnoreFileSpec]) -> Vec<String> {
    if specs.is_empty() {
        return Vec::new();
    }

    specs
        .iter()
        .filter_map(|spec| spec.resolve(dir))
        .flat_map(|path| load_ignore_file(&path))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_spec_separators() {
        let spec = IgnoreFileSpec::parse(".npmignore, .gitignore");
        assert_eq!(spec.candidates(), [".npmignore", ".gitignore"]);

        let spec = IgnoreFileSpec::parse("  .a .b,.c ,, ");
        assert_eq!(spec.candidates(), [".a", ".b", ".c"]);

        assert!(IgnoreFileSpec::parse("   ").candidates().is_empty());
    }

    #[test]
    fn test_spec_display_round_trips() {
        let spec: IgnoreFileSpec = ".npmignore,.gitignore".parse().unwrap();
        assert_eq!(spec.to_string(), ".npmignore, .gitignore");
        assert_eq!(IgnoreFileSpec::parse(&spec.to_string()), spec);
    }

    #[test]
    fn test_parse_ignore_text_strips_comments_and_blanks() {
        assert_eq!(
            parse_ignore_text("\n# comment\nfoo\n\nbar\n"),
            vec!["foo", "bar"]
        );
    }

    #[test]
    fn test_parse_ignore_text_handles_crlf() {
        assert_eq!(
            parse_ignore_text("foo\r\n  # indented comment\r\n\r\nbar  \r\n"),
            vec!["foo", "bar"]
        );
    }

    #[test]
    fn test_fallback_prefers_first_existing() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join(".gitignore"), "from-git\n").unwrap();

        let specs = vec![IgnoreFileSpec::parse(".npmignore, .gitignore")];
        assert_eq!(load_ignore_files(temp.path(), &specs), vec!["from-git"]);

        fs::write(temp.path().join(".npmignore"), "from-npm\n").unwrap();
        assert_eq!(load_ignore_files(temp.path(), &specs), vec!["from-npm"]);
    }

    #[test]
    fn test_missing_files_yield_nothing() {
        let temp = tempdir().unwrap();
        let specs = vec![IgnoreFileSpec::parse(".npmignore, .gitignore")];

        assert!(load_ignore_files(temp.path(), &specs).is_empty());
    }

    #[test]
    fn test_specs_concatenate_in_order() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join(".ignore"), "first\n").unwrap();
        fs::write(temp.path().join(".gitignore"), "second\nthird\n").unwrap();

        let specs = vec![
            IgnoreFileSpec::parse(".ignore"),
            IgnoreFileSpec::parse(".npmignore .gitignore"),
        ];
        assert_eq!(
            load_ignore_files(temp.path(), &specs),
            vec!["first", "second", "third"]
        );
    }

    #[test]
    fn test_unreadable_candidate_is_silent() {
        let temp = tempdir().unwrap();
        // A directory exists under the name, so it is selected but cannot be read
        fs::create_dir(temp.path().join(".npmignore")).unwrap();
        fs::write(temp.path().join(".gitignore"), "never-read\n").unwrap();

        let specs = vec![IgnoreFileSpec::parse(".npmignore, .gitignore")];
        assert!(load_ignore_files(temp.path(), &specs).is_empty());
    }

    #[test]
    fn test_no_specs_no_patterns() {
        assert!(load_ignore_files(Path::new("/nonexistent/path"), &[]).is_empty());
    }

    #[test]
    fn test_spec_deserializes_from_string() {
        let specs: Vec<IgnoreFileSpec> =
            serde_json::from_str(r#"[".ignore", ".npmignore, .gitignore"]"#).unwrap();
        assert_eq!(specs[1].candidates(), [".npmignore", ".gitignore"]);
    }
}

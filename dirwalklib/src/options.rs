//! Walker configuration and per-walk options.
//!
//! [`WalkerConfig`] is fixed when a walker is built; [`WalkOptions`] is passed
//! to each walk.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DirwalkError;
use crate::ignore_file::IgnoreFileSpec;
use crate::pattern::GlobPattern;
use crate::Result;

/// Construction-time ignore policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkerConfig {
    /// Basenames matching any of these are always kept
    #[serde(default, alias = "neverIgnore")]
    pub never_ignore: Vec<String>,
    /// Ignore patterns applied in every directory
    #[serde(default, alias = "defaultIgnore")]
    pub default_ignore: Vec<String>,
    /// Per-directory ignore files, each a fallback chain
    #[serde(default, alias = "ignoreFiles")]
    pub ignore_files: Vec<IgnoreFileSpec>,
}

impl WalkerConfig {
    /// Create an empty config: nothing ignored, no ignore files.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rules `npm publish` applies when packing a directory.
    pub fn npm() -> Self {
        Self {
            never_ignore: ["package.json", "README.*"].map(String::from).to_vec(),
            default_ignore: [
                "node_modules/",
                ".*.swp",
                "_*",
                "DS_Store",
                ".git",
                ".hg",
                ".lock-wscript",
                ".svn",
                ".wafpickle-*",
                "CVS",
                "npm-debug.log",
            ]
            .map(String::from)
            .to_vec(),
            ignore_files: vec![IgnoreFileSpec::parse(".npmignore, .gitignore")],
        }
    }

    /// Look up a named preset.
    pub fn preset(name: &str) -> Result<Self> {
        name.parse::<Preset>().map(Preset::config)
    }

    /// Add an always-include pattern.
    pub fn never_ignore(mut self, pattern: &str) -> Result<Self> {
        GlobPattern::parse(pattern)?;
        self.never_ignore.push(pattern.to_string());
        Ok(self)
    }

    /// Add a default ignore pattern.
    pub fn default_ignore(mut self, pattern: &str) -> Result<Self> {
        GlobPattern::parse(pattern)?;
        self.default_ignore.push(pattern.to_string());
        Ok(self)
    }

    /// Add an ignore-file spec such as `".npmignore, .gitignore"`.
    pub fn ignore_file(mut self, spec: &str) -> Self {
        self.ignore_files.push(IgnoreFileSpec::parse(spec));
        self
    }

    /// Add multiple always-include patterns.
    pub fn never_ignore_many(mut self, patterns: &[&str]) -> Result<Self> {
        for pattern in patterns {
            self = self.never_ignore(pattern)?;
        }
        Ok(self)
    }

    /// Add multiple default ignore patterns.
    pub fn default_ignore_many(mut self, patterns: &[&str]) -> Result<Self> {
        for pattern in patterns {
            self = self.default_ignore(pattern)?;
        }
        Ok(self)
    }

    /// Check every configured pattern compiles.
    pub fn validate(&self) -> Result<()> {
        for pattern in self.never_ignore.iter().chain(&self.default_ignore) {
            GlobPattern::parse(pattern)?;
        }
        Ok(())
    }

    /// Parse a JSON config without validating its patterns.
    pub fn from_json_str(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load and validate a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| DirwalkError::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config = Self::from_json_str(&text).map_err(|e| DirwalkError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }
}

/// Named, ready-made configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// See [`WalkerConfig::npm`]
    Npm,
}

impl Preset {
    pub fn config(self) -> WalkerConfig {
        match self {
            Preset::Npm => WalkerConfig::npm(),
        }
    }
}

impl FromStr for Preset {
    type Err = DirwalkError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "npm" => Ok(Preset::Npm),
            _ => Err(DirwalkError::UnknownPreset(s.to_string())),
        }
    }
}

/// Options for a single walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkOptions {
    /// Descend into subdirectories
    #[serde(default, alias = "recursive")]
    pub recurse: bool,
    /// Process each directory's children in file-name order
    #[serde(default)]
    pub sort: bool,
}

impl WalkOptions {
    /// Only the root directory's direct children (default)
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk the whole tree
    pub fn recursive() -> Self {
        Self {
            recurse: true,
            sort: false,
        }
    }

    /// Builder: set recursion
    pub fn with_recurse(mut self, recurse: bool) -> Self {
        self.recurse = recurse;
        self
    }

    /// Builder: set sorted listings
    pub fn with_sort(mut self, sort: bool) -> Self {
        self.sort = sort;
        self
    }
}

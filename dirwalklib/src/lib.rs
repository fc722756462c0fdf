//! # dirwalklib
//!
//! Recursive directory enumeration with git/npm-style ignore rules.
//!
//! ## Overview
//!
//! A walk lists a directory tree and reports the regular files that survive a
//! layered ignore policy:
//!
//! - **Default ignore** patterns apply in every directory
//! - **Ignore files** (`.gitignore`, `.npmignore`, ...) add patterns for the
//!   directory they live in and everything below it, never for siblings
//! - **Never-ignore** patterns force a basename to be kept, whatever else says
//!
//! An ignore-file spec can name alternatives: `".npmignore, .gitignore"` loads
//! `.npmignore` when present and falls back to `.gitignore` otherwise.
//!
//! Patterns are shell globs matched against a single name. Directories are
//! matched as `name/`, so `build/` ignores a directory but not a file called
//! `build`.
//!
//! Listing and stat failures are reported as events and never abort the walk;
//! every walk ends with exactly one completion event.
//!
//! ## Example
//!
//! ```rust
//! use dirwalklib::{DirWalker, WalkOptions, WalkerConfig};
//! use std::fs;
//! use tempfile::tempdir;
//!
//! let dir = tempdir().unwrap();
//! fs::write(dir.path().join("package.json"), "{}").unwrap();
//! fs::write(dir.path().join(".gitignore"), "# build output\ndist/\n").unwrap();
//! fs::create_dir(dir.path().join("dist")).unwrap();
//! fs::write(dir.path().join("dist/bundle.js"), "").unwrap();
//! fs::create_dir(dir.path().join("lib")).unwrap();
//! fs::write(dir.path().join("lib/index.js"), "").unwrap();
//!
//! let walker = DirWalker::new(WalkerConfig::npm());
//! let report = walker.collect(dir.path(), WalkOptions::recursive());
//!
//! assert!(report.is_clean());
//! assert_eq!(report.relnames(), vec![".gitignore", "lib/index.js", "package.json"]);
//! ```

pub mod entry;
pub mod error;
pub mod filter;
pub mod ignore_file;
pub mod options;
pub mod pattern;
pub mod walker;

pub use entry::{Entry, EntryType};
pub use error::{DirwalkError, WalkError};
pub use filter::{classify, classify_name, Decision, FilterSet};
pub use ignore_file::{load_ignore_files, parse_ignore_text, IgnoreFileSpec};
pub use options::{Preset, WalkOptions, WalkerConfig};
pub use pattern::{candidate_name, glob_match, GlobPattern};
pub use walker::{DirWalker, Walk, WalkEvent, WalkHandler, WalkReport};

/// Result type for dirwalklib operations
pub type Result<T> = std::result::Result<T, DirwalkError>;

//! Error types for dirwalklib

use std::io;
use std::path::{Path, PathBuf};

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Errors raised while building a walker or loading its configuration
#[derive(Error, Debug)]
pub enum DirwalkError {
    /// Invalid glob pattern
    #[error("invalid glob pattern '{pattern}': {message}")]
    InvalidGlob { pattern: String, message: String },

    /// Failed to read a configuration file
    #[error("failed to read config '{path}': {source}")]
    ConfigRead { path: PathBuf, source: io::Error },

    /// Configuration file is not valid JSON for a walker config
    #[error("failed to parse config '{path}': {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// Unknown preset name
    #[error("unknown preset: {0}")]
    UnknownPreset(String),
}

/// Recoverable failures reported while a walk is in progress.
///
/// These never abort the walk; they are delivered alongside entries and the
/// consumer decides whether any of them matter.
#[derive(Error, Debug)]
pub enum WalkError {
    /// A directory's children could not be listed
    #[error("failed to read directory '{path}': {source}")]
    ReadDir { path: PathBuf, source: io::Error },

    /// A path could not be stat-ed
    #[error("failed to stat '{path}': {source}")]
    Metadata { path: PathBuf, source: io::Error },
}

impl WalkError {
    /// Path the failing operation was issued against.
    pub fn path(&self) -> &Path {
        match self {
            WalkError::ReadDir { path, .. } | WalkError::Metadata { path, .. } => path,
        }
    }

    /// The underlying IO error.
    pub fn io_error(&self) -> &io::Error {
        match self {
            WalkError::ReadDir { source, .. } | WalkError::Metadata { source, .. } => source,
        }
    }

    /// Short machine-readable tag for the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            WalkError::ReadDir { .. } => "read_dir",
            WalkError::Metadata { .. } => "metadata",
        }
    }
}

impl Serialize for WalkError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("WalkError", 3)?;
        state.serialize_field("kind", self.kind())?;
        state.serialize_field("path", &self.path().to_string_lossy())?;
        state.serialize_field("message", &self.io_error().to_string())?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walk_error_accessors() {
        let err = WalkError::Metadata {
            path: PathBuf::from("/tmp/missing"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };

        assert_eq!(err.path(), Path::new("/tmp/missing"));
        assert_eq!(err.kind(), "metadata");
        assert_eq!(err.io_error().kind(), io::ErrorKind::NotFound);
        assert_eq!(err.to_string(), "failed to stat '/tmp/missing': gone");
    }

    #[test]
    fn test_invalid_glob_message() {
        let err = DirwalkError::InvalidGlob {
            pattern: "[x".to_string(),
            message: "bad range".to_string(),
        };
        assert_eq!(err.to_string(), "invalid glob pattern '[x': bad range");
    }
}

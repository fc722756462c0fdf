//! Discovered filesystem entries.

use std::ffi::OsStr;
use std::fs::Metadata;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize, Serializer};

/// Kind of a discovered entry, as reported by stat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    File,
    Directory,
}

/// One filesystem object found during a walk.
///
/// Entries are built fresh from each listing result and never change after
/// they are handed to a consumer.
#[derive(Debug, Clone, Serialize)]
pub struct Entry {
    /// File name without any directory part
    pub basename: String,
    /// Directory the entry was listed from
    #[serde(serialize_with = "serialize_lossy")]
    pub dirname: PathBuf,
    /// Full path used for I/O (`dirname` joined with `basename`)
    #[serde(serialize_with = "serialize_lossy")]
    pub pathname: PathBuf,
    /// Path relative to the walk root; stable across runs
    #[serde(serialize_with = "serialize_lossy")]
    pub relname: PathBuf,
    /// File or directory, following symlinks
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    /// Size in bytes from stat
    pub size: u64,
    /// Raw stat result
    #[serde(skip)]
    pub stats: Metadata,
}

impl Entry {
    /// Build an entry for `file_name` listed in `dirname`.
    ///
    /// `parent_relname` is the directory's path relative to the walk root.
    pub(crate) fn new(
        file_name: &OsStr,
        dirname: &Path,
        parent_relname: &Path,
        stats: Metadata,
    ) -> Self {
        let entry_type = if stats.is_dir() {
            EntryType::Directory
        } else {
            EntryType::File
        };

        Self {
            basename: file_name.to_string_lossy().into_owned(),
            dirname: dirname.to_path_buf(),
            pathname: dirname.join(file_name),
            relname: parent_relname.join(file_name),
            entry_type,
            size: stats.len(),
            stats,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.entry_type == EntryType::Directory
    }

    /// True only for regular files; sockets, fifos and the like are neither.
    pub fn is_file(&self) -> bool {
        self.stats.is_file()
    }

    /// `relname` rendered with forward slashes on every platform.
    pub fn relname_slash(&self) -> String {
        self.relname
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Paths that are not valid UTF-8 are written with replacement characters.
fn serialize_lossy<S: Serializer>(path: &Path, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&path.to_string_lossy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_entry_from_file() {
        let temp = tempdir().unwrap();
        fs::create_dir(temp.path().join("lib")).unwrap();
        fs::write(temp.path().join("lib/index.js"), "module.exports = 1;").unwrap();

        let dirname = temp.path().join("lib");
        let stats = fs::metadata(dirname.join("index.js")).unwrap();
        let entry = Entry::new(OsStr::new("index.js"), &dirname, Path::new("lib"), stats);

        assert_eq!(entry.pathname, dirname.join("index.js"));
        assert_eq!(entry.entry_type, EntryType::File);
        assert!(entry.is_file());
        assert!(!entry.is_dir());
        assert_eq!(entry.size, 19);
        assert_eq!(entry.relname_slash(), "lib/index.js");
    }

    #[test]
    fn test_entry_from_directory() {
        let temp = tempdir().unwrap();
        fs::create_dir(temp.path().join("build")).unwrap();

        let stats = fs::metadata(temp.path().join("build")).unwrap();
        let entry = Entry::new(OsStr::new("build"), temp.path(), Path::new(""), stats);

        assert_eq!(entry.entry_type, EntryType::Directory);
        assert_eq!(entry.relname, PathBuf::from("build"));
        assert!(entry.is_dir());
        assert!(!entry.is_file());
    }

    #[test]
    fn test_entry_serializes_without_stats() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("a.txt"), "hi").unwrap();

        let stats = fs::metadata(temp.path().join("a.txt")).unwrap();
        let entry = Entry::new(OsStr::new("a.txt"), temp.path(), Path::new(""), stats);

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["basename"], "a.txt");
        assert_eq!(value["relname"], "a.txt");
        assert_eq!(value["type"], "file");
        assert_eq!(value["size"], 2);
        assert!(value.get("stats").is_none());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_non_utf8_name_serializes_lossily() {
        use std::os::unix::ffi::OsStrExt;

        let temp = tempdir().unwrap();
        let name = OsStr::from_bytes(b"bad\xff.txt");
        fs::write(temp.path().join(name), "").unwrap();

        let stats = fs::metadata(temp.path().join(name)).unwrap();
        let entry = Entry::new(name, temp.path(), Path::new("lib"), stats);

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["basename"], "bad\u{fffd}.txt");
        assert_eq!(value["relname"], "lib/bad\u{fffd}.txt");
        assert!(value["pathname"]
            .as_str()
            .unwrap()
            .ends_with("bad\u{fffd}.txt"));
    }
}

//! Directory traversal with layered ignore rules.
//!
//! A [`DirWalker`] is built once from a [`WalkerConfig`] and can run any number
//! of walks. Each walk is a lazy [`Walk`] iterator of [`WalkEvent`]s:
//!
//! - `Entry` for every kept regular file
//! - `Error` for every directory that could not be listed and every path that
//!   could not be stat-ed
//! - `Complete`, exactly once, as the last event
//!
//! Filters are inherited top-down. Each directory sees the default ignore
//! patterns plus the patterns of every ignore file between the root and
//! itself; a directory's own ignore file never leaks into its siblings.
//!
//! Listing or stat failures do not stop the walk. A failed stat abandons the
//! rest of that directory's listing, and the walk resumes with the parent.
//!
//! ## Example
//!
//! ```rust
//! use dirwalklib::{DirWalker, WalkEvent, WalkOptions, WalkerConfig};
//! use std::fs;
//! use tempfile::tempdir;
//!
//! let dir = tempdir().unwrap();
//! fs::write(dir.path().join("index.js"), "").unwrap();
//! fs::write(dir.path().join("debug.log"), "").unwrap();
//!
//! let walker = DirWalker::new(WalkerConfig::new().default_ignore("*.log").unwrap());
//! let files: Vec<String> = walker
//!     .walk(dir.path(), WalkOptions::recursive())
//!     .filter_map(|event| match event {
//!         WalkEvent::Entry(entry) => Some(entry.basename),
//!         _ => None,
//!     })
//!     .collect();
//!
//! assert_eq!(files, vec!["index.js"]);
//! ```

use std::ffi::OsString;
use std::fs;
use std::iter::FusedIterator;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::vec;

use tracing::{debug, trace};

use crate::entry::Entry;
use crate::error::WalkError;
use crate::filter::{classify, FilterSet};
use crate::ignore_file::{load_ignore_files, IgnoreFileSpec};
use crate::options::{WalkOptions, WalkerConfig};

/// One notification from a walk.
#[derive(Debug)]
pub enum WalkEvent {
    /// A kept regular file
    Entry(Entry),
    /// A recoverable failure; the walk goes on
    Error(WalkError),
    /// The walk is over. Always last, always exactly once.
    Complete,
}

/// Push-style consumer for [`DirWalker::walk_with`].
pub trait WalkHandler {
    /// Called for each kept file. `Break` stops the walk.
    fn on_entry(&mut self, entry: Entry) -> ControlFlow<()>;

    /// Called for each recoverable failure. `Break` stops the walk.
    fn on_error(&mut self, _error: WalkError) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    /// Called once, after everything else.
    fn on_complete(&mut self) {}
}

/// Everything a walk produced.
#[derive(Debug, Default)]
pub struct WalkReport {
    pub entries: Vec<Entry>,
    pub errors: Vec<WalkError>,
}

impl WalkReport {
    /// Relative names of all entries, slash-separated and sorted.
    pub fn relnames(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.iter().map(Entry::relname_slash).collect();
        names.sort();
        names
    }

    /// True when no errors were reported.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

impl WalkHandler for WalkReport {
    fn on_entry(&mut self, entry: Entry) -> ControlFlow<()> {
        self.entries.push(entry);
        ControlFlow::Continue(())
    }

    fn on_error(&mut self, error: WalkError) -> ControlFlow<()> {
        self.errors.push(error);
        ControlFlow::Continue(())
    }
}

/// A configured directory walker.
///
/// Immutable once built; walks never share mutable state, so one walker can
/// serve several threads at once.
#[derive(Debug, Clone)]
pub struct DirWalker {
    config: WalkerConfig,
    default_ignore: Arc<FilterSet>,
    never_ignore: FilterSet,
    ignore_files: Vec<IgnoreFileSpec>,
}

impl DirWalker {
    /// Build a walker. Malformed patterns are kept but never match.
    pub fn new(config: WalkerConfig) -> Self {
        Self {
            default_ignore: Arc::new(FilterSet::from_patterns(&config.default_ignore)),
            never_ignore: FilterSet::from_patterns(&config.never_ignore),
            ignore_files: config.ignore_files.clone(),
            config,
        }
    }

    pub fn config(&self) -> &WalkerConfig {
        &self.config
    }

    /// Start a walk rooted at `root`. Nothing touches the filesystem until
    /// the first event is pulled.
    pub fn walk(&self, root: impl AsRef<Path>, options: WalkOptions) -> Walk<'_> {
        Walk {
            walker: self,
            options,
            root: Some(root.as_ref().to_path_buf()),
            stack: Vec::new(),
            state: WalkState::Running,
        }
    }

    /// Run a walk, pushing every event into `handler`.
    pub fn walk_with<H>(&self, root: impl AsRef<Path>, options: WalkOptions, handler: &mut H)
    where
        H: WalkHandler + ?Sized,
    {
        let mut walk = self.walk(root, options);

        while let Some(event) = walk.next() {
            let flow = match event {
                WalkEvent::Entry(entry) => handler.on_entry(entry),
                WalkEvent::Error(error) => handler.on_error(error),
                WalkEvent::Complete => {
                    handler.on_complete();
                    ControlFlow::Continue(())
                }
            };

            if flow.is_break() {
                walk.stop();
            }
        }
    }

    /// Run a walk to completion and gather its entries and errors.
    pub fn collect(&self, root: impl AsRef<Path>, options: WalkOptions) -> WalkReport {
        let mut report = WalkReport::default();
        self.walk_with(root, options, &mut report);
        report
    }

    /// Load a directory's ignore files and list it.
    fn open_dir(
        &self,
        dir: PathBuf,
        relname: PathBuf,
        inherited: &Arc<FilterSet>,
        sort: bool,
    ) -> Result<DirFrame, WalkError> {
        let local = load_ignore_files(&dir, &self.ignore_files);
        let filters = if local.is_empty() {
            Arc::clone(inherited)
        } else {
            Arc::new(inherited.with_patterns(&local))
        };

        let mut children = fs::read_dir(&dir)
            .and_then(|entries| {
                entries
                    .map(|entry| entry.map(|e| e.file_name()))
                    .collect::<std::io::Result<Vec<OsString>>>()
            })
            .map_err(|source| WalkError::ReadDir {
                path: dir.clone(),
                source,
            })?;

        if sort {
            children.sort();
        }

        debug!(
            dir = %dir.display(),
            children = children.len(),
            filters = filters.len(),
            "entering directory"
        );

        Ok(DirFrame {
            dir,
            relname,
            filters,
            children: children.into_iter(),
        })
    }
}

/// Traversal state for one directory that is still being processed.
struct DirFrame {
    dir: PathBuf,
    relname: PathBuf,
    filters: Arc<FilterSet>,
    children: vec::IntoIter<OsString>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WalkState {
    Running,
    Completing,
    Done,
}

/// A walk in progress. See [`DirWalker::walk`].
///
/// Directories are processed depth-first: a subtree finishes before the next
/// sibling of its root is looked at.
pub struct Walk<'a> {
    walker: &'a DirWalker,
    options: WalkOptions,
    root: Option<PathBuf>,
    stack: Vec<DirFrame>,
    state: WalkState,
}

impl Walk<'_> {
    /// End the walk early. The next event is `Complete`, and no more
    /// filesystem operations are issued.
    pub fn stop(&mut self) {
        self.root = None;
        self.stack.clear();
        if self.state == WalkState::Running {
            self.state = WalkState::Completing;
        }
    }

    /// Number of directories currently open.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    fn descend(
        &mut self,
        dir: PathBuf,
        relname: PathBuf,
        inherited: &Arc<FilterSet>,
    ) -> Option<WalkError> {
        match self.walker.open_dir(dir, relname, inherited, self.options.sort) {
            Ok(frame) => {
                self.stack.push(frame);
                None
            }
            Err(e) => Some(e),
        }
    }

    fn surface(&self, error: WalkError) -> Option<WalkEvent> {
        debug!(error = %error, "walk error");
        Some(WalkEvent::Error(error))
    }
}

impl Iterator for Walk<'_> {
    type Item = WalkEvent;

    fn next(&mut self) -> Option<WalkEvent> {
        loop {
            match self.state {
                WalkState::Done => return None,
                WalkState::Completing => {
                    self.state = WalkState::Done;
                    debug!("walk complete");
                    return Some(WalkEvent::Complete);
                }
                WalkState::Running => {}
            }

            if let Some(root) = self.root.take() {
                let defaults = Arc::clone(&self.walker.default_ignore);
                if let Some(error) = self.descend(root, PathBuf::new(), &defaults) {
                    return self.surface(error);
                }
                continue;
            }

            let Some(frame) = self.stack.last_mut() else {
                self.state = WalkState::Completing;
                continue;
            };

            let Some(name) = frame.children.next() else {
                trace!(dir = %frame.dir.display(), "directory complete");
                self.stack.pop();
                continue;
            };

            let path = frame.dir.join(&name);
            let stats = match fs::metadata(&path) {
                Ok(stats) => stats,
                Err(source) => {
                    // Abandon the rest of this directory; the parent carries on
                    self.stack.pop();
                    return self.surface(WalkError::Metadata { path, source });
                }
            };

            let entry = Entry::new(&name, &frame.dir, &frame.relname, stats);
            let decision = classify(&entry, &frame.filters, &self.walker.never_ignore);
            trace!(relname = %entry.relname.display(), ?decision, "classified");

            if !decision.is_kept() {
                continue;
            }

            if entry.is_dir() {
                if self.options.recurse {
                    let inherited = Arc::clone(&frame.filters);
                    if let Some(error) = self.descend(entry.pathname, entry.relname, &inherited) {
                        return self.surface(error);
                    }
                }
                continue;
            }

            if entry.is_file() {
                return Some(WalkEvent::Entry(entry));
            }
        }
    }
}

impl FusedIterator for Walk<'_> {}

// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Depth-first directory walk with empty-directory cleanup

use std::cmp::Ordering;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::Result;

/// Receives every file found by [`walk`]
pub trait FileVisitor {
    /// Handle one file. `Break` stops the walk and leaves the remaining
    /// files untouched; an error aborts it.
    fn visit_file(&mut self, path: &Path) -> Result<ControlFlow<()>>;

    /// Directories for which this returns true are neither entered nor removed
    fn skip_dir(&self, _dir: &Path) -> bool {
        false
    }
}

/// What a walk did
#[derive(Debug, Default, Clone)]
pub struct WalkOutcome {
    pub files_visited: usize,
    pub removed_dirs: Vec<PathBuf>,
    /// The visitor asked to stop early
    pub stopped: bool,
}

/// Visit every file under `root`.
///
/// A directory's own files come first, then its subdirectories, each in
/// name order. Once a directory has been fully processed it is removed if
/// nothing is left in it. `root` itself is never removed.
pub fn walk<V: FileVisitor>(root: &Path, visitor: &mut V) -> Result<WalkOutcome> {
    let mut outcome = WalkOutcome::default();
    // Directories entered but not finished yet, innermost last
    let mut open_dirs: Vec<(usize, PathBuf)> = Vec::new();

    let mut entries = WalkDir::new(root)
        .follow_links(false)
        .sort_by(files_first)
        .into_iter();

    while let Some(entry) = entries.next() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        let depth = entry.depth();
        close_dirs(&mut open_dirs, depth, &mut outcome);
        if depth == 0 {
            continue;
        }

        let path = entry.path();
        let file_type = entry.file_type();

        if file_type.is_dir() {
            if visitor.skip_dir(path) {
                debug!("Skipping destination dir {:?}", path);
                entries.skip_current_dir();
                continue;
            }
            debug!("Walking {:?}", path);
            open_dirs.push((depth, path.to_path_buf()));
        } else if file_type.is_file() || (file_type.is_symlink() && path.is_file()) {
            outcome.files_visited += 1;
            if visitor.visit_file(path)?.is_break() {
                outcome.stopped = true;
                return Ok(outcome);
            }
        } else {
            debug!("Ignoring special entry {:?}", path);
        }
    }

    close_dirs(&mut open_dirs, 1, &mut outcome);
    Ok(outcome)
}

/// Regular files before directories, then by name
fn files_first(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}

/// Finish every open directory at `depth` or deeper, innermost first
fn close_dirs(open_dirs: &mut Vec<(usize, PathBuf)>, depth: usize, outcome: &mut WalkOutcome) {
    while open_dirs.last().map_or(false, |(d, _)| *d >= depth) {
        if let Some((_, dir)) = open_dirs.pop() {
            remove_if_empty(&dir, outcome);
        }
    }
}

/// Remove `dir` when nothing is left in it.
///
/// A directory that cannot be read or removed is kept.
fn remove_if_empty(dir: &Path, outcome: &mut WalkOutcome) {
    match is_empty_dir(dir) {
        Ok(true) => {}
        Ok(false) => return,
        Err(e) => {
            warn!("Keeping dir {:?}: {}", dir, e);
            return;
        }
    }

    info!("Deleting empty dir: {:?}", dir);
    match std::fs::remove_dir(dir) {
        Ok(()) => outcome.removed_dirs.push(dir.to_path_buf()),
        Err(e) => warn!("Cannot remove empty dir {:?}: {}", dir, e),
    }
}

fn is_empty_dir(dir: &Path) -> std::io::Result<bool> {
    Ok(std::fs::read_dir(dir)?.next().is_none())
}

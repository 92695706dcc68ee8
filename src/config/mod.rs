// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Run configuration for image-recovery

use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

use crate::{RecoveryError, Result};

/// Suffix appended to the skip prefix for images without usable metadata
pub const SKIP_IMAGES_SUFFIX: &str = "Images";

/// Suffix appended to the skip prefix for files that are not images
pub const SKIP_FILES_SUFFIX: &str = "Files";

/// What to do when a date field is present but does not parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampPolicy {
    /// Abort the whole run (exit code 3)
    #[default]
    Strict,
    /// Quarantine the image and keep going
    Lenient,
}

/// A single organizing run, resolved from the command line
#[derive(Debug, Clone, Serialize)]
pub struct ScanTask {
    /// Tree to scan
    pub input_dir: PathBuf,

    /// Root of the camera/year/month tree
    pub output_dir: PathBuf,

    /// Images that could not be classified
    pub skip_images_dir: PathBuf,

    /// Everything that is not an image
    pub skip_files_dir: PathBuf,

    pub verbose: bool,

    /// Stop after this many images have been placed
    pub max_files: Option<usize>,

    pub timestamp_policy: TimestampPolicy,
}

impl ScanTask {
    /// Resolve and validate the run directories.
    ///
    /// All paths are made absolute. The input directory must exist; the
    /// output and both quarantine directories are created when missing.
    pub fn resolve(
        input_dir: &Path,
        output_dir: &Path,
        skip_dir_prefix: &Path,
        verbose: bool,
    ) -> Result<Self> {
        let input_dir = absolutize(input_dir)?;
        debug!("input_dir: {:?}", input_dir);
        if !input_dir.is_dir() {
            return Err(RecoveryError::InputDirMissing(input_dir));
        }

        let output_dir = absolutize(output_dir)?;
        let skip_images_dir = absolutize(&with_suffix(skip_dir_prefix, SKIP_IMAGES_SUFFIX))?;
        let skip_files_dir = absolutize(&with_suffix(skip_dir_prefix, SKIP_FILES_SUFFIX))?;

        for dir in [&output_dir, &skip_images_dir, &skip_files_dir] {
            if *dir == input_dir {
                return Err(RecoveryError::Config(format!(
                    "{:?} cannot be both the input and a destination directory",
                    dir
                )));
            }
        }

        for dir in [&output_dir, &skip_images_dir, &skip_files_dir] {
            mkdir_if_missing(dir)?;
        }

        Ok(Self {
            input_dir,
            output_dir,
            skip_images_dir,
            skip_files_dir,
            verbose,
            max_files: None,
            timestamp_policy: TimestampPolicy::default(),
        })
    }

    /// Cap the number of placed images; `None` means unlimited
    pub fn with_max_files(mut self, max_files: Option<usize>) -> Self {
        self.max_files = max_files;
        self
    }

    pub fn with_timestamp_policy(mut self, policy: TimestampPolicy) -> Self {
        self.timestamp_policy = policy;
        self
    }

    /// Whether `dir` is one of our destinations nested inside the input tree.
    ///
    /// Such directories must not be walked, or placed files would be
    /// picked up again.
    pub fn is_destination(&self, dir: &Path) -> bool {
        [&self.output_dir, &self.skip_images_dir, &self.skip_files_dir]
            .into_iter()
            .filter(|d| d.starts_with(&self.input_dir))
            .any(|d| dir.starts_with(d))
    }
}

/// Create a directory (and parents) if it does not exist yet
pub fn mkdir_if_missing(dir: &Path) -> Result<()> {
    debug!("target_dir: {:?}", dir);
    if !dir.is_dir() {
        info!("Creating dir: {:?}", dir);
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// Append a literal suffix to the last path component, e.g. `/x/skip` -> `/x/skipImages`
fn with_suffix(prefix: &Path, suffix: &str) -> PathBuf {
    let mut joined: OsString = prefix.as_os_str().to_owned();
    joined.push(suffix);
    PathBuf::from(joined)
}

/// Make a path absolute and lexically normalize `.` and `..`
fn absolutize(path: &Path) -> Result<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    Ok(normalized)
}

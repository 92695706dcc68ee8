// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Moving files into place without overwriting anything

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::mkdir_if_missing;
use crate::{RecoveryError, Result};

/// Highest collision suffix tried (`-999`)
pub const MAX_COLLISION_SUFFIX: u32 = 999;

/// Move `source` into `dst_dir`, creating the directory on demand.
///
/// With `file_name` unset the original name is kept. Taken names get a
/// `-001`, `-002`, ... suffix before the extension. Returns the final path.
pub fn place(source: &Path, dst_dir: &Path, file_name: Option<&OsStr>) -> Result<PathBuf> {
    let file_name = match file_name.or_else(|| source.file_name()) {
        Some(name) => name,
        None => {
            return Err(RecoveryError::Config(format!(
                "Cannot determine file name of {:?}",
                source
            )))
        }
    };

    mkdir_if_missing(dst_dir)?;
    let dst_path = nonconflicting_path(&dst_dir.join(file_name))?;

    info!("Moving {:?} to {:?}", source, dst_path);
    std::fs::rename(source, &dst_path)?;
    Ok(dst_path)
}

/// First free path among `dst_path`, `name-001.ext`, `name-002.ext`, ...
pub fn nonconflicting_path(dst_path: &Path) -> Result<PathBuf> {
    if !exists(dst_path) {
        return Ok(dst_path.to_path_buf());
    }

    let stem = dst_path.file_stem().unwrap_or_default();
    let ext = dst_path.extension();

    for counter in 1..=MAX_COLLISION_SUFFIX {
        let mut name = OsString::from(stem);
        name.push(format!("-{:03}", counter));
        if let Some(ext) = ext {
            name.push(".");
            name.push(ext);
        }

        let candidate = dst_path.with_file_name(name);
        if !exists(&candidate) {
            debug!("Name collision, using {:?}", candidate);
            return Ok(candidate);
        }
    }

    Err(RecoveryError::CollisionLimit {
        path: dst_path.to_path_buf(),
        attempts: MAX_COLLISION_SUFFIX,
    })
}

/// Like `Path::exists`, but a dangling symlink still counts as taken
fn exists(path: &Path) -> bool {
    std::fs::symlink_metadata(path).is_ok()
}

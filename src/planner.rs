// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Destination paths for classified images

use chrono::NaiveDateTime;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// File name layout, e.g. `2020-05-01_10-15-30`
pub const FILE_NAME_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Where a classified image should go
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    /// `{output}/{model}/{YYYY}/{MM}`
    pub dir: PathBuf,
    /// `{YYYY-MM-DD_HH-MM-SS}{ext}`
    pub file_name: OsString,
}

impl Destination {
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }
}

/// Build `{output_dir}/{model}/{YYYY}/{MM}/{YYYY-MM-DD_HH-MM-SS}{ext}`.
///
/// `model` must already be sanitized. The extension is copied from `source`
/// as is, including its case.
pub fn plan_destination(
    output_dir: &Path,
    model: &str,
    taken: &NaiveDateTime,
    source: &Path,
) -> Destination {
    let dir = output_dir
        .join(model)
        .join(taken.format("%Y").to_string())
        .join(taken.format("%m").to_string());

    let mut file_name = OsString::from(taken.format(FILE_NAME_FORMAT).to_string());
    if let Some(ext) = source.extension() {
        file_name.push(".");
        file_name.push(ext);
    }

    Destination { dir, file_name }
}

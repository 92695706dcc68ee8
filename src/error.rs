// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Error types for image-recovery

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for image-recovery operations
pub type Result<T> = std::result::Result<T, RecoveryError>;

/// image-recovery error types
#[derive(Error, Debug)]
pub enum RecoveryError {
    #[error("Input directory does not exist: {0}")]
    InputDirMissing(PathBuf),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("EXIF error: {0}")]
    Exif(#[from] exif::Error),

    #[error("No EXIF metadata in {0}")]
    NoMetadata(PathBuf),

    #[error("No camera model in EXIF metadata of {0}")]
    MissingModel(PathBuf),

    #[error("Malformed {field} value {value:?} in {path}")]
    MalformedTimestamp {
        path: PathBuf,
        field: String,
        value: String,
    },

    #[error("No free name for {path} after {attempts} attempts")]
    CollisionLimit { path: PathBuf, attempts: u32 },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RecoveryError {
    /// Process exit code reported when this error ends the run
    pub fn exit_code(&self) -> u8 {
        match self {
            RecoveryError::MalformedTimestamp { .. } => 3,
            _ => 1,
        }
    }

    /// Whether a failure on a single file should divert it to quarantine
    /// rather than abort the run.
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            RecoveryError::Image(_)
                | RecoveryError::Exif(_)
                | RecoveryError::NoMetadata(_)
                | RecoveryError::MissingModel(_)
        )
    }
}

// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! image-recovery: sort recovered images by camera and capture date
//!
//! Walks a directory tree, reads the EXIF camera model and timestamp of
//! every image and moves it to `{output}/{model}/{YYYY}/{MM}/`. Images
//! without usable metadata and non-image files go to separate quarantine
//! directories; emptied source directories are removed.

pub mod analyzers;
pub mod config;
pub mod error;
pub mod organizer;
pub mod placer;
pub mod planner;
pub mod walker;

pub use config::{ScanTask, TimestampPolicy};
pub use error::{RecoveryError, Result};
pub use organizer::{Organizer, Outcome, RunStats, RunSummary};

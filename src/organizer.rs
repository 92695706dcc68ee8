// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! The organizing run: classify each file and move it where it belongs

use image::ImageFormat;
use serde::Serialize;
use std::fmt;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::analyzers::{self, decode, read_metadata, resolve_timestamp, FileKind};
use crate::config::{ScanTask, TimestampPolicy};
use crate::planner::{plan_destination, Destination};
use crate::placer::place;
use crate::walker::{self, FileVisitor};
use crate::{RecoveryError, Result};

/// Where a single file ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Sorted into the camera/year/month tree
    Placed(PathBuf),
    /// Image without usable metadata
    QuarantinedImage(PathBuf),
    /// Not an image at all
    QuarantinedFile(PathBuf),
    /// Left in place
    Failed,
}

/// Per-run counters
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub placed: usize,
    pub quarantined_images: usize,
    pub quarantined_files: usize,
    pub failed: usize,
}

impl RunStats {
    fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Placed(_) => self.placed += 1,
            Outcome::QuarantinedImage(_) => self.quarantined_images += 1,
            Outcome::QuarantinedFile(_) => self.quarantined_files += 1,
            Outcome::Failed => self.failed += 1,
        }
    }
}

/// End-of-run report
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    #[serde(flatten)]
    pub stats: RunStats,
    pub files_seen: usize,
    pub removed_dirs: usize,
    /// The run stopped at `max_files`
    pub limit_reached: bool,
    pub elapsed_ms: u128,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Files seen:          {}", self.files_seen)?;
        writeln!(f, "Placed:              {}", self.stats.placed)?;
        writeln!(f, "Quarantined images:  {}", self.stats.quarantined_images)?;
        writeln!(f, "Quarantined files:   {}", self.stats.quarantined_files)?;
        writeln!(f, "Failed:              {}", self.stats.failed)?;
        writeln!(f, "Removed dirs:        {}", self.removed_dirs)?;
        if self.limit_reached {
            writeln!(f, "Stopped at file limit")?;
        }
        write!(f, "Elapsed:             {} ms", self.elapsed_ms)
    }
}

/// Drives one run over a [`ScanTask`]
pub struct Organizer {
    task: ScanTask,
    stats: RunStats,
}

impl Organizer {
    pub fn new(task: ScanTask) -> Self {
        Self {
            task,
            stats: RunStats::default(),
        }
    }

    /// Walk the input tree and process every file.
    ///
    /// Files already moved stay moved when a fatal error ends the run.
    pub fn run(mut self) -> Result<RunSummary> {
        let start = Instant::now();
        let root = self.task.input_dir.clone();
        info!("Scanning {:?}", root);

        let walked = walker::walk(&root, &mut self)?;

        Ok(RunSummary {
            stats: self.stats,
            files_seen: walked.files_visited,
            removed_dirs: walked.removed_dirs.len(),
            limit_reached: walked.stopped,
            elapsed_ms: start.elapsed().as_millis(),
        })
    }

    /// Classify one file and move it to its destination or a quarantine dir
    pub fn process_file(&self, path: &Path) -> Result<Outcome> {
        let kind = match analyzers::sniff(path) {
            Ok(kind) => kind,
            Err(e) => {
                warn!("Cannot read {:?}: {}", path, e);
                return Ok(Outcome::Failed);
            }
        };

        let format = match kind {
            FileKind::Image(format) => format,
            FileKind::Other => {
                debug!("Not an image: {:?}", path);
                return relocate(path, &self.task.skip_files_dir, None, Outcome::QuarantinedFile);
            }
        };

        match self.plan_image(path, format) {
            Ok(dest) => relocate(path, &dest.dir, Some(&dest), Outcome::Placed),
            Err(e) if e.is_per_file() => {
                info!("Cannot classify {:?}: {}", path, e);
                self.quarantine_image(path)
            }
            Err(e @ RecoveryError::MalformedTimestamp { .. })
                if self.task.timestamp_policy == TimestampPolicy::Lenient =>
            {
                warn!("{}", e);
                self.quarantine_image(path)
            }
            Err(e) => Err(e),
        }
    }

    /// Decode, read metadata and resolve the capture time
    fn plan_image(&self, path: &Path, format: ImageFormat) -> Result<Destination> {
        decode(path, format)?;

        let metadata = read_metadata(path)?;
        if metadata.is_empty() {
            return Err(RecoveryError::NoMetadata(path.to_path_buf()));
        }

        let model = match metadata.model() {
            Some(model) => model,
            None => {
                debug!("exif: {:?}", metadata);
                return Err(RecoveryError::MissingModel(path.to_path_buf()));
            }
        };

        info!("Processing: {:?} img_type: {:?}", path, format);

        let taken = resolve_timestamp(path, &metadata)?;
        info!("model: {} created: {} ({})", model, taken.value, taken.source);

        Ok(plan_destination(&self.task.output_dir, &model, &taken.value, path))
    }

    fn quarantine_image(&self, path: &Path) -> Result<Outcome> {
        relocate(path, &self.task.skip_images_dir, None, Outcome::QuarantinedImage)
    }

    fn limit_reached(&self) -> bool {
        self.task
            .max_files
            .map_or(false, |max| self.stats.placed >= max)
    }
}

/// Move a file and turn the result into an [`Outcome`].
///
/// Running out of collision suffixes only fails this file.
fn relocate(
    path: &Path,
    dir: &Path,
    dest: Option<&Destination>,
    outcome: fn(PathBuf) -> Outcome,
) -> Result<Outcome> {
    let file_name = dest.map(|d| d.file_name.as_os_str());
    match place(path, dir, file_name) {
        Ok(placed) => Ok(outcome(placed)),
        Err(e @ RecoveryError::CollisionLimit { .. }) => {
            warn!("Leaving {:?} in place: {}", path, e);
            Ok(Outcome::Failed)
        }
        Err(e) => Err(e),
    }
}

impl FileVisitor for Organizer {
    fn visit_file(&mut self, path: &Path) -> Result<ControlFlow<()>> {
        if self.limit_reached() {
            info!("File limit of {} already reached, stopping", self.stats.placed);
            return Ok(ControlFlow::Break(()));
        }

        let outcome = self.process_file(path)?;
        self.stats.record(&outcome);

        if matches!(outcome, Outcome::Placed(_)) && self.limit_reached() {
            info!(
                "Reached limit of {} placed images, stopping",
                self.stats.placed
            );
            return Ok(ControlFlow::Break(()));
        }
        Ok(ControlFlow::Continue(()))
    }

    fn skip_dir(&self, dir: &Path) -> bool {
        self.task.is_destination(dir)
    }
}

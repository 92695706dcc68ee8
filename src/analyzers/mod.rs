// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! File classification: header sniffing, image decoding and metadata

pub mod image;
pub mod timestamp;

use ::image::ImageFormat;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::Result;

pub use self::image::{decode, read_metadata, sanitize, ImageMetadata};
pub use self::timestamp::{parse_exif_datetime, resolve_timestamp, ResolvedTimestamp, TimestampSource};

/// Number of header bytes inspected when sniffing a file
pub const SNIFF_LEN: u64 = 64;

/// What a file's header says it is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Image(ImageFormat),
    Other,
}

impl FileKind {
    pub fn is_image(&self) -> bool {
        matches!(self, FileKind::Image(_))
    }
}

/// Decide whether a file holds image data by looking at its magic bytes.
///
/// The extension is never consulted: recovered files often have none, or
/// the wrong one.
pub fn sniff(path: &Path) -> Result<FileKind> {
    let mut header = Vec::with_capacity(SNIFF_LEN as usize);
    File::open(path)?.take(SNIFF_LEN).read_to_end(&mut header)?;

    Ok(match ::image::guess_format(&header) {
        Ok(format) => FileKind::Image(format),
        Err(_) => FileKind::Other,
    })
}

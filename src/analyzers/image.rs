// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Image decoding and EXIF metadata extraction

use exif::{Exif, In, Reader, Value};
use image::{GenericImageView, ImageFormat, ImageReader};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

use crate::Result;

/// EXIF field holding the camera model
pub const MODEL_FIELD: &str = "Model";

/// Metadata decoded from a single image, keyed by EXIF field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageMetadata {
    fields: BTreeMap<String, String>,
}

impl ImageMetadata {
    /// Collect primary-image fields (including the EXIF sub-IFD).
    ///
    /// Thumbnail fields are skipped so they cannot shadow the main image's
    /// values.
    pub fn from_exif(exif: &Exif) -> Self {
        let mut fields = BTreeMap::new();
        for field in exif.fields() {
            if field.ifd_num != In::PRIMARY {
                continue;
            }
            let value = match field.value {
                Value::Ascii(ref parts) => parts
                    .iter()
                    .map(|p| String::from_utf8_lossy(p))
                    .collect::<String>(),
                _ => field.display_value().to_string(),
            };
            fields.entry(field.tag.to_string()).or_insert(value);
        }
        Self { fields }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Sanitized camera model, or `None` when missing or blank.
    ///
    /// The result is always a single normal path component.
    pub fn model(&self) -> Option<String> {
        self.get(MODEL_FIELD)
            .map(sanitize)
            .filter(|model| !matches!(model.as_str(), "" | "." | ".."))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ImageMetadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Clean an EXIF text value for use in a path.
///
/// Surrounding whitespace is trimmed, then NULs are dropped. Spaces and path
/// separators become `_`.
pub fn sanitize(text: &str) -> String {
    text.trim()
        .replace('\0', "")
        .replace([' ', '/', '\\'], "_")
}

/// Fully decode an image to make sure its data is usable.
///
/// Decoding runs under the `image` crate's default limits, so oversized
/// images fail here instead of exhausting memory.
pub fn decode(path: &Path, format: ImageFormat) -> Result<(u32, u32)> {
    let mut reader = ImageReader::open(path)?;
    reader.set_format(format);
    let img = reader.decode()?;
    let dimensions = img.dimensions();
    debug!("Decoded {:?}: {}x{}", path, dimensions.0, dimensions.1);
    Ok(dimensions)
}

/// Read EXIF metadata from an image container.
///
/// A container without any EXIF block yields empty metadata; a block that
/// cannot be parsed is an error.
pub fn read_metadata(path: &Path) -> Result<ImageMetadata> {
    let mut reader = BufReader::new(File::open(path)?);
    match Reader::new().read_from_container(&mut reader) {
        Ok(exif) => Ok(ImageMetadata::from_exif(&exif)),
        Err(exif::Error::NotFound(_)) => Ok(ImageMetadata::default()),
        Err(e) => Err(e.into()),
    }
}

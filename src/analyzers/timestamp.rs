// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Capture timestamp resolution

use chrono::{DateTime, Local, NaiveDateTime};
use std::fmt;
use std::path::Path;
use tracing::debug;

use super::ImageMetadata;
use crate::{RecoveryError, Result};

/// Fixed EXIF date layout: `YYYY:MM:DD HH:MM:SS`
pub const EXIF_DATETIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Date fields in order of preference
pub const DATE_FIELDS: [&str; 2] = ["DateTimeOriginal", "DateTime"];

/// Where a resolved timestamp came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampSource {
    Exif(&'static str),
    ChangeTime,
}

impl fmt::Display for TimestampSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimestampSource::Exif(field) => write!(f, "{}", field),
            TimestampSource::ChangeTime => write!(f, "ctime"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedTimestamp {
    pub value: NaiveDateTime,
    pub source: TimestampSource,
}

/// Parse an EXIF date string, tolerating surrounding whitespace and NULs
pub fn parse_exif_datetime(raw: &str) -> Option<NaiveDateTime> {
    let cleaned = raw.replace('\0', "");
    NaiveDateTime::parse_from_str(cleaned.trim(), EXIF_DATETIME_FORMAT).ok()
}

/// Pick the capture time for an image.
///
/// `DateTimeOriginal` wins over `DateTime`; with neither present the file's
/// change time is used. A date field that is present but malformed is an
/// error, never a silent fallback.
pub fn resolve_timestamp(path: &Path, metadata: &ImageMetadata) -> Result<ResolvedTimestamp> {
    for field in DATE_FIELDS {
        if let Some(raw) = metadata.get(field) {
            return match parse_exif_datetime(raw) {
                Some(value) => Ok(ResolvedTimestamp {
                    value,
                    source: TimestampSource::Exif(field),
                }),
                None => Err(RecoveryError::MalformedTimestamp {
                    path: path.to_path_buf(),
                    field: field.to_string(),
                    value: raw.to_string(),
                }),
            };
        }
    }

    debug!("No date fields in {:?}, using change time", path);
    Ok(ResolvedTimestamp {
        value: change_time(path)?,
        source: TimestampSource::ChangeTime,
    })
}

/// Filesystem change time in local time (modification time off Unix)
pub fn change_time(path: &Path) -> Result<NaiveDateTime> {
    let metadata = std::fs::metadata(path)?;

    #[cfg(unix)]
    let changed = {
        use std::os::unix::fs::MetadataExt;
        DateTime::from_timestamp(metadata.ctime(), metadata.ctime_nsec() as u32)
            .ok_or_else(|| {
                RecoveryError::Config(format!("Change time of {:?} is out of range", path))
            })?
            .with_timezone(&Local)
    };

    #[cfg(not(unix))]
    let changed: DateTime<Local> = metadata.modified()?.into();

    Ok(changed.naive_local())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate};
    use tempfile::TempDir;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_parse_exif_datetime() {
        assert_eq!(
            parse_exif_datetime("2020:05:01 10:15:30"),
            Some(at(2020, 5, 1, 10, 15, 30))
        );
        assert_eq!(
            parse_exif_datetime(" 2020:05:01 10:15:30\0"),
            Some(at(2020, 5, 1, 10, 15, 30))
        );
        assert_eq!(parse_exif_datetime("2020/05/01"), None);
        assert_eq!(parse_exif_datetime("2020:05:01"), None);
        assert_eq!(parse_exif_datetime("0000:00:00 00:00:00"), None);
        assert_eq!(parse_exif_datetime(""), None);
    }

    #[test]
    fn test_original_wins_over_datetime() {
        let meta: ImageMetadata = [
            ("DateTime", "2021:01:01 00:00:00"),
            ("DateTimeOriginal", "2020:05:01 10:15:30"),
        ]
        .into_iter()
        .collect();

        let ts = resolve_timestamp(Path::new("a.jpg"), &meta).unwrap();
        assert_eq!(ts.value, at(2020, 5, 1, 10, 15, 30));
        assert_eq!(ts.source, TimestampSource::Exif("DateTimeOriginal"));
    }

    #[test]
    fn test_datetime_fallback() {
        let meta: ImageMetadata = [("DateTime", "2019:12:31 23:59:59")].into_iter().collect();
        let ts = resolve_timestamp(Path::new("a.jpg"), &meta).unwrap();
        assert_eq!(ts.source, TimestampSource::Exif("DateTime"));
        assert_eq!(ts.value, at(2019, 12, 31, 23, 59, 59));
    }

    #[test]
    fn test_malformed_field_is_error() {
        // A malformed preferred field does not fall through to the next one
        let meta: ImageMetadata = [
            ("DateTimeOriginal", "2020/05/01"),
            ("DateTime", "2019:12:31 23:59:59"),
        ]
        .into_iter()
        .collect();

        match resolve_timestamp(Path::new("a.jpg"), &meta) {
            Err(RecoveryError::MalformedTimestamp { field, value, .. }) => {
                assert_eq!(field, "DateTimeOriginal");
                assert_eq!(value, "2020/05/01");
            }
            other => panic!("Expected MalformedTimestamp, got {:?}", other),
        }
    }

    #[test]
    fn test_change_time_fallback() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a.jpg");
        std::fs::write(&path, b"x").unwrap();

        let meta: ImageMetadata = [("Model", "X")].into_iter().collect();
        let ts = resolve_timestamp(&path, &meta).unwrap();
        assert_eq!(ts.source, TimestampSource::ChangeTime);
        assert!(ts.value.year() >= 2020);
    }
}

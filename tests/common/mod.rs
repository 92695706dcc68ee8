// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Shared fixtures for the end-to-end tests

#![allow(dead_code)]

use exif::experimental::Writer;
use exif::{Field, In, Tag, Value};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use image_recovery::ScanTask;

/// A scratch layout: `in/`, `out/`, `skipImages/`, `skipFiles/`
pub struct Workspace {
    pub tmp: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("in")).unwrap();
        Self { tmp }
    }

    pub fn input(&self) -> PathBuf {
        self.tmp.path().join("in")
    }

    pub fn output(&self) -> PathBuf {
        self.tmp.path().join("out")
    }

    pub fn skip_prefix(&self) -> PathBuf {
        self.tmp.path().join("skip")
    }

    pub fn skip_images(&self) -> PathBuf {
        self.tmp.path().join("skipImages")
    }

    pub fn skip_files(&self) -> PathBuf {
        self.tmp.path().join("skipFiles")
    }

    pub fn task(&self) -> ScanTask {
        ScanTask::resolve(&self.input(), &self.output(), &self.skip_prefix(), false).unwrap()
    }

    /// Write `bytes` to `in/<relative>`, creating parent dirs
    pub fn add(&self, relative: &str, bytes: &[u8]) -> PathBuf {
        let path = self.input().join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, bytes).unwrap();
        path
    }
}

/// Encode a small JPEG, tinted by `seed` so fixtures differ byte-wise
pub fn plain_jpeg(seed: u8) -> Vec<u8> {
    let img = RgbImage::from_pixel(8, 8, Rgb([seed, 128, 255 - seed]));
    let mut out = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut out), ImageFormat::Jpeg)
        .unwrap();
    out
}

pub fn plain_png() -> Vec<u8> {
    let mut out = Vec::new();
    DynamicImage::ImageRgb8(RgbImage::new(4, 4))
        .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .unwrap();
    out
}

/// A well-formed PNG header declaring a `width` x `height` RGB image
/// with no real pixel data behind it
pub fn png_declaring(width: u32, height: u32) -> Vec<u8> {
    let mut ihdr = Vec::new();
    ihdr.extend(width.to_be_bytes());
    ihdr.extend(height.to_be_bytes());
    // bit depth 8, truecolor, deflate, adaptive filter, no interlace
    ihdr.extend([8, 2, 0, 0, 0]);

    let mut out = b"\x89PNG\r\n\x1a\n".to_vec();
    png_chunk(&mut out, b"IHDR", &ihdr);
    // zlib stream of a single empty stored block
    png_chunk(&mut out, b"IDAT", &[0x78, 0x01, 0x01, 0x00, 0x00, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x01]);
    png_chunk(&mut out, b"IEND", &[]);
    out
}

fn png_chunk(out: &mut Vec<u8>, kind: &[u8; 4], data: &[u8]) {
    out.extend((data.len() as u32).to_be_bytes());
    let start = out.len();
    out.extend(kind);
    out.extend(data);
    let crc = crc32(&out[start..]);
    out.extend(crc.to_be_bytes());
}

fn crc32(bytes: &[u8]) -> u32 {
    let mut crc = 0xFFFF_FFFFu32;
    for &byte in bytes {
        crc ^= u32::from(byte);
        for _ in 0..8 {
            let mask = (crc & 1).wrapping_neg();
            crc = (crc >> 1) ^ (0xEDB8_8320 & mask);
        }
    }
    !crc
}

/// A JPEG carrying the given ASCII EXIF fields in an APP1 segment
pub fn jpeg_with_exif(seed: u8, fields: &[(Tag, &str)]) -> Vec<u8> {
    let jpeg = plain_jpeg(seed);

    let owned: Vec<Field> = fields
        .iter()
        .map(|(tag, value)| Field {
            tag: *tag,
            ifd_num: In::PRIMARY,
            value: Value::Ascii(vec![value.as_bytes().to_vec()]),
        })
        .collect();
    let mut writer = Writer::new();
    for field in &owned {
        writer.push_field(field);
    }
    let mut tiff = Cursor::new(Vec::new());
    writer.write(&mut tiff, false).unwrap();

    let mut app1 = b"Exif\0\0".to_vec();
    app1.extend(tiff.into_inner());

    let mut out = vec![0xFF, 0xD8, 0xFF, 0xE1];
    out.extend(((app1.len() + 2) as u16).to_be_bytes());
    out.extend(app1);
    out.extend(&jpeg[2..]);
    out
}

pub fn camera_jpeg(seed: u8, model: &str, taken: &str) -> Vec<u8> {
    jpeg_with_exif(seed, &[(Tag::Model, model), (Tag::DateTimeOriginal, taken)])
}

/// All regular files under `dir`, relative to it, sorted
pub fn list_files(dir: &Path) -> Vec<PathBuf> {
    fn collect(base: &Path, dir: &Path, out: &mut Vec<PathBuf>) {
        let Ok(entries) = std::fs::read_dir(dir) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                collect(base, &path, out);
            } else {
                out.push(path.strip_prefix(base).unwrap().to_path_buf());
            }
        }
    }

    let mut out = Vec::new();
    collect(dir, dir, &mut out);
    out.sort();
    out
}

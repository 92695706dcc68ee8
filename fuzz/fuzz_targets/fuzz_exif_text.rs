// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

#![no_main]

use libfuzzer_sys::fuzz_target;
use std::path::{Component, Path};

use image_recovery::analyzers::{parse_exif_datetime, sanitize, ImageMetadata};
use image_recovery::planner::plan_destination;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);

    let model = sanitize(&text);
    assert!(!model.contains('\0'));
    assert!(!model.contains(' '));
    assert!(!model.contains('/'));

    let meta: ImageMetadata = [("Model", &*text)].into_iter().collect();
    if let Some(model) = meta.model() {
        let mut components = Path::new(&model).components();
        assert!(matches!(components.next(), Some(Component::Normal(_))));
        assert!(components.next().is_none());
    }

    if let Some(taken) = parse_exif_datetime(&text) {
        let dest = plan_destination(Path::new("/out"), "model", &taken, Path::new("a.jpg"));
        assert!(dest.path().starts_with("/out/model"));
    }
});

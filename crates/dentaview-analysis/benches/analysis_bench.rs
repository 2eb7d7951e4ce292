// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the dentaview-analysis crate: full feature
// detection and the dental-mode enhancement pipeline on a synthetic smile.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use dentaview_analysis::{detect_features, enhance, match_camera_profile};
use dentaview_core::{EnhancementOptions, ImageBuffer};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// 160x120 synthetic smile: dark lips, four tooth-coloured blocks and a
/// gum band underneath.
fn synthetic_smile() -> ImageBuffer {
    let (width, height) = (160u32, 120u32);
    let mut img = ImageBuffer::from_pixel(width, height, [40, 20, 25, 255])
        .expect("non-empty fixture");
    for tooth in 0..4u32 {
        let x0 = 20 + tooth * 32;
        for y in 30..70 {
            for x in x0..x0 + 24 {
                img.set_pixel(x, y, [232, 220, 196, 255]);
            }
        }
    }
    for y in 72..90 {
        for x in 10..150 {
            img.set_pixel(x, y, [190, 110, 100, 255]);
        }
    }
    img
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_detect_features(c: &mut Criterion) {
    let img = synthetic_smile();
    c.bench_function("detect_features (160x120)", |b| {
        b.iter(|| black_box(detect_features(black_box(&img))));
    });
}

/// Dental mode runs every stage, including the bilateral filter.
fn bench_enhance(c: &mut Criterion) {
    let img = synthetic_smile();
    let detection = detect_features(&img);
    let options = EnhancementOptions::dental_mode();
    c.bench_function("enhance dental_mode (160x120)", |b| {
        b.iter(|| black_box(enhance(black_box(&img), Some(&detection), &options)));
    });
}

fn bench_camera_profile(c: &mut Criterion) {
    let img = synthetic_smile();
    c.bench_function("match_camera_profile (160x120)", |b| {
        b.iter(|| black_box(match_camera_profile(black_box(&img))));
    });
}

criterion_group!(
    benches,
    bench_detect_features,
    bench_enhance,
    bench_camera_profile
);
criterion_main!(benches);

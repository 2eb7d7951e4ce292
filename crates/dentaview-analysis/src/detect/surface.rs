// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Plaque and restoration detection on a sparse sampling grid.

use dentaview_core::{ImageBuffer, SamplePoint, SurfaceDetection};
use tracing::{debug, instrument};

use crate::color::{brightness, channel_std_dev};

/// Grid spacing in pixels.
const SAMPLE_STRIDE: usize = 10;
/// Radius attached to each flagged sample.
const SAMPLE_RADIUS: u32 = 5;

const PLAQUE_CONFIDENCE: f32 = 0.7;
const RESTORATION_CONFIDENCE: f32 = 0.6;

/// Bright, yellow-tinted surface: brightness above 150 and a yellow tint
/// `(r+g)/2 − b` between 10 and 40.
pub fn is_plaque_sample(r: u8, g: u8, b: u8) -> bool {
    let yellow = (r as f32 + g as f32) / 2.0 - b as f32;
    brightness(r, g, b) > 150.0 && (10.0..=40.0).contains(&yellow)
}

/// Very bright and uniform (ceramic/composite), or medium-bright with a
/// strong channel spread (metal alloys).
pub fn is_restoration_sample(r: u8, g: u8, b: u8) -> bool {
    let bright = brightness(r, g, b);
    let variance = channel_std_dev(r, g, b);
    (bright > 220.0 && variance < 10.0) || (bright > 100.0 && bright <= 220.0 && variance > 30.0)
}

#[instrument(skip(img), fields(width = img.width(), height = img.height()))]
pub fn detect_plaque(img: &ImageBuffer) -> SurfaceDetection {
    let detection = sample_grid(img, is_plaque_sample, PLAQUE_CONFIDENCE);
    debug!(samples = detection.points.len(), "Plaque sampling complete");
    detection
}

#[instrument(skip(img), fields(width = img.width(), height = img.height()))]
pub fn detect_restorations(img: &ImageBuffer) -> SurfaceDetection {
    let detection = sample_grid(img, is_restoration_sample, RESTORATION_CONFIDENCE);
    debug!(samples = detection.points.len(), "Restoration sampling complete");
    detection
}

fn sample_grid(
    img: &ImageBuffer,
    classify: impl Fn(u8, u8, u8) -> bool,
    confidence: f32,
) -> SurfaceDetection {
    let mut points = Vec::new();
    for y in (0..img.height()).step_by(SAMPLE_STRIDE) {
        for x in (0..img.width()).step_by(SAMPLE_STRIDE) {
            let [r, g, b, _] = img.pixel(x, y);
            if classify(r, g, b) {
                points.push(SamplePoint {
                    x,
                    y,
                    radius: SAMPLE_RADIUS,
                });
            }
        }
    }

    let confidence = if points.is_empty() { 0.0 } else { confidence };
    SurfaceDetection { points, confidence }
}

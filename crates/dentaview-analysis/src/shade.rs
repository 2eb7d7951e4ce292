// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// VITA classical shade guide: nearest-shade lookup, tooth-pixel test and
// shade-aware whitening.

use dentaview_core::ImageBuffer;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::color::{brightness, color_distance, rgb_to_hsv};

/// One tab of the VITA classical shade guide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VitaShade {
    pub code: &'static str,
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub label: &'static str,
}

impl VitaShade {
    const fn new(code: &'static str, r: u8, g: u8, b: u8, label: &'static str) -> Self {
        Self {
            code,
            r,
            g,
            b,
            label,
        }
    }

    pub fn rgb(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Mean channel value.
    pub fn lightness(&self) -> f32 {
        brightness(self.r, self.g, self.b)
    }
}

/// The 16 classical shades, grouped by hue family.
///
/// Family A is reddish-brown, B reddish-yellow, C grey, D reddish-grey.
pub static VITA_SHADES: [VitaShade; 16] = [
    VitaShade::new("A1", 255, 248, 240, "Reddish-brown, very light"),
    VitaShade::new("A2", 238, 228, 212, "Reddish-brown, light"),
    VitaShade::new("A3", 224, 205, 180, "Reddish-brown, medium"),
    VitaShade::new("A3.5", 212, 190, 165, "Reddish-brown, medium dark"),
    VitaShade::new("A4", 200, 175, 145, "Reddish-brown, dark"),
    VitaShade::new("B1", 255, 252, 245, "Reddish-yellow, lightest"),
    VitaShade::new("B2", 245, 238, 225, "Reddish-yellow, light"),
    VitaShade::new("B3", 220, 198, 165, "Reddish-yellow, medium"),
    VitaShade::new("B4", 208, 186, 155, "Reddish-yellow, dark"),
    VitaShade::new("C1", 232, 224, 212, "Grey, light"),
    VitaShade::new("C2", 222, 212, 198, "Grey, medium"),
    VitaShade::new("C3", 196, 182, 165, "Grey, medium dark"),
    VitaShade::new("C4", 185, 168, 150, "Grey, darkest"),
    VitaShade::new("D2", 240, 232, 220, "Reddish-grey, light"),
    VitaShade::new("D3", 215, 200, 182, "Reddish-grey, medium"),
    VitaShade::new("D4", 218, 206, 190, "Reddish-grey, medium light"),
];

/// Whitening sequence, darkest to lightest (value-oriented ordering).
/// Catalog lightness strictly increases along this list.
pub const WHITENING_ORDER: [&str; 16] = [
    "C4", "A4", "C3", "B4", "A3.5", "B3", "D3", "A3", "D4", "C2", "C1", "A2", "D2", "B2", "A1",
    "B1",
];

/// Look up a shade by its code.
pub fn find_shade(code: &str) -> Option<&'static VitaShade> {
    VITA_SHADES.iter().find(|shade| shade.code == code)
}

/// Nearest catalog shade by Euclidean RGB distance. Ties go to the earlier
/// catalog entry.
pub fn find_closest_shade(r: u8, g: u8, b: u8) -> &'static VitaShade {
    let target = [r, g, b];
    let mut best = &VITA_SHADES[0];
    let mut best_dist = color_distance(target, best.rgb());
    for shade in &VITA_SHADES[1..] {
        let dist = color_distance(target, shade.rgb());
        if dist < best_dist {
            best = shade;
            best_dist = dist;
        }
    }
    best
}

/// Tooth enamel test: hue 20–80°, saturation ≤ 0.3, value 0.7–1.0.
pub fn is_tooth_pixel(r: u8, g: u8, b: u8) -> bool {
    let hsv = rgb_to_hsv(r, g, b);
    (20.0..=80.0).contains(&hsv.h) && hsv.s <= 0.3 && (0.7..=1.0).contains(&hsv.v)
}

/// Pick the whitening endpoint for `current` at `factor` (0..=1).
///
/// Moves `floor(factor * remaining)` steps up [`WHITENING_ORDER`], so the
/// result is never darker than `current` and always a catalog shade.
pub fn whiten_toward_target(current: &VitaShade, factor: f32) -> &'static VitaShade {
    let factor = factor.clamp(0.0, 1.0);
    let last = WHITENING_ORDER.len() - 1;
    let current_index = WHITENING_ORDER
        .iter()
        .position(|code| *code == current.code)
        .unwrap_or(0);
    let steps = (factor * (last - current_index) as f32).floor() as usize;
    let target_index = (current_index + steps).min(last);

    // Every WHITENING_ORDER code is present in the catalog (see tests).
    find_shade(WHITENING_ORDER[target_index]).unwrap_or(current_static(current))
}

fn current_static(current: &VitaShade) -> &'static VitaShade {
    find_shade(current.code).unwrap_or(&VITA_SHADES[0])
}

/// Whiten one pixel: interpolate from the source colour toward its
/// whitening target by `factor`.
///
/// The channel sum of the result is the rounded interpolated sum, and that
/// sum never falls below the source's. Channels are rounded with the
/// largest-remainder rule so they add up to exactly that sum, which keeps
/// output brightness non-decreasing in `factor`.
pub fn whiten_pixel(r: u8, g: u8, b: u8, factor: f32) -> [u8; 3] {
    let factor = factor.clamp(0.0, 1.0) as f64;
    let source = [r, g, b];
    let target = whiten_toward_target(find_closest_shade(r, g, b), factor as f32).rgb();

    let source_sum = channel_sum(source) as f64;
    let target_sum = channel_sum(target) as f64;
    let wanted = source_sum + (target_sum - source_sum) * factor;
    if wanted < source_sum {
        return source;
    }
    let wanted = wanted.round() as u32;

    let mut out = [0u8; 3];
    let mut remainders = [0.0f64; 3];
    for c in 0..3 {
        let v = (source[c] as f64 + (target[c] as f64 - source[c] as f64) * factor)
            .clamp(0.0, 255.0);
        out[c] = v.floor() as u8;
        remainders[c] = v - v.floor();
    }

    // Floors never overshoot `wanted`; hand the shortfall to the largest remainders.
    let mut order = [0usize, 1, 2];
    order.sort_by(|&a, &b| remainders[b].total_cmp(&remainders[a]));
    let mut sum = channel_sum(out);
    for c in order {
        if sum >= wanted {
            break;
        }
        if out[c] < 255 {
            out[c] += 1;
            sum += 1;
        }
    }
    out
}

fn channel_sum(rgb: [u8; 3]) -> u32 {
    rgb.iter().map(|&c| c as u32).sum()
}

// -- Whole-image shade analysis -----------------------------------------------

/// Number of tooth pixels matched to one shade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShadeCount {
    pub code: &'static str,
    pub pixels: usize,
}

/// Shade distribution over every tooth pixel of an image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShadeAnalysis {
    /// Most frequent shade; ties go to catalog order.
    pub dominant: &'static VitaShade,
    /// Per-shade pixel counts in catalog order.
    pub histogram: Vec<ShadeCount>,
    pub mean_color: [u8; 3],
    pub tooth_pixels: usize,
}

/// Classify every tooth pixel to its nearest shade. `None` when the image
/// has no tooth pixels.
#[instrument(skip(img), fields(width = img.width(), height = img.height()))]
pub fn analyze_shade(img: &ImageBuffer) -> Option<ShadeAnalysis> {
    let mut counts = [0usize; 16];
    let mut sums = [0u64; 3];
    let mut tooth_pixels = 0usize;

    for px in img.data().chunks_exact(ImageBuffer::CHANNELS) {
        let (r, g, b) = (px[0], px[1], px[2]);
        if !is_tooth_pixel(r, g, b) {
            continue;
        }
        let shade = find_closest_shade(r, g, b);
        if let Some(i) = VITA_SHADES.iter().position(|s| s.code == shade.code) {
            counts[i] += 1;
        }
        sums[0] += r as u64;
        sums[1] += g as u64;
        sums[2] += b as u64;
        tooth_pixels += 1;
    }

    if tooth_pixels == 0 {
        debug!("No tooth pixels found for shade analysis");
        return None;
    }

    let mut dominant_index = 0;
    for (i, &count) in counts.iter().enumerate() {
        if count > counts[dominant_index] {
            dominant_index = i;
        }
    }

    let n = tooth_pixels as u64;
    let mean_color = [
        (sums[0] / n) as u8,
        (sums[1] / n) as u8,
        (sums[2] / n) as u8,
    ];

    let histogram = VITA_SHADES
        .iter()
        .zip(counts.iter())
        .map(|(shade, &pixels)| ShadeCount {
            code: shade.code,
            pixels,
        })
        .collect();

    let dominant = &VITA_SHADES[dominant_index];
    debug!(dominant = dominant.code, tooth_pixels, "Shade analysis complete");

    Some(ShadeAnalysis {
        dominant,
        histogram,
        mean_color,
        tooth_pixels,
    })
}

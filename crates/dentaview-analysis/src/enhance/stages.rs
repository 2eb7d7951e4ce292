// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Individual enhancement stages. Each works in place on an RGBA buffer,
// clamps its parameter instead of rejecting it, and leaves alpha alone.

use dentaview_core::ImageBuffer;
use tracing::debug;

use crate::color::{brightness, to_byte};
use crate::enhance::regions::{ContrastRegion, factor_map};
use crate::shade::{is_tooth_pixel, whiten_pixel};

/// Bilateral filter spatial sigma (pixels).
const SPATIAL_SIGMA: f32 = 1.0;
/// Bilateral filter intensity sigma (8-bit levels).
const RANGE_SIGMA: f32 = 30.0;
/// Average brightness above which a pixel counts as a highlight.
const SPECULAR_THRESHOLD: f32 = 200.0;
const SPECULAR_SPAN: f32 = 255.0 - SPECULAR_THRESHOLD;

fn unit_strength(strength: f32) -> f32 {
    strength.clamp(0.0, 100.0) / 100.0
}

/// Shade-aware whitening of every tooth pixel at `strength` (0..=100).
pub fn whiten(img: &mut ImageBuffer, strength: f32) {
    let factor = unit_strength(strength);
    if factor == 0.0 {
        return;
    }
    let mut whitened = 0usize;
    for px in img.data_mut().chunks_exact_mut(ImageBuffer::CHANNELS) {
        if is_tooth_pixel(px[0], px[1], px[2]) {
            let [r, g, b] = whiten_pixel(px[0], px[1], px[2], factor);
            px[0] = r;
            px[1] = g;
            px[2] = b;
            whitened += 1;
        }
    }
    debug!(whitened, factor, "Whitening applied");
}

/// Region-dependent contrast stretch around mid-grey:
/// `v' = (v − 128)·(1 + strength/100·factor) + 128`.
///
/// Every region's result is computed from the stage input; where regions
/// overlap, the later region in `regions` wins.
pub fn adaptive_contrast(img: &mut ImageBuffer, strength: f32, regions: &[ContrastRegion]) {
    let s = unit_strength(strength);
    let factors = factor_map(regions, img.width(), img.height());

    for (px, &factor) in img
        .data_mut()
        .chunks_exact_mut(ImageBuffer::CHANNELS)
        .zip(factors.iter())
    {
        let gain = 1.0 + s * factor;
        for channel in &mut px[..3] {
            *channel = to_byte((*channel as f32 - 128.0) * gain + 128.0);
        }
    }
    debug!(regions = regions.len(), strength = s, "Adaptive contrast applied");
}

/// 3x3 bilateral filter (spatial σ = 1, intensity σ = 30) blended with the
/// original by `strength/100`. The window is clipped at the image border.
pub fn reduce_noise(img: &mut ImageBuffer, strength: f32) {
    let s = unit_strength(strength);
    if s == 0.0 {
        return;
    }
    let source = img.clone();
    let (w, h) = (img.width(), img.height());
    let kernel = BilateralKernel::new();

    for y in 0..h {
        for x in 0..w {
            let original = source.pixel(x, y);
            let mut out = original;
            for c in 0..3 {
                let filtered = kernel.filter(&source, x, y, c);
                let v = original[c] as f32;
                out[c] = to_byte(v * (1.0 - s) + filtered * s);
            }
            img.set_pixel(x, y, out);
        }
    }
    debug!(strength = s, "Bilateral noise reduction applied");
}

/// Scale highlights (average brightness > 200) by
/// `1 − level/100 · (brightness − 200)/55`, uniformly across RGB.
pub fn control_specular(img: &mut ImageBuffer, level: f32) {
    let l = level.clamp(-100.0, 100.0) / 100.0;
    if l == 0.0 {
        return;
    }
    let mut adjusted = 0usize;
    for px in img.data_mut().chunks_exact_mut(ImageBuffer::CHANNELS) {
        let bright = brightness(px[0], px[1], px[2]);
        if bright <= SPECULAR_THRESHOLD {
            continue;
        }
        let scale = 1.0 - l * (bright - SPECULAR_THRESHOLD) / SPECULAR_SPAN;
        for channel in &mut px[..3] {
            *channel = to_byte(*channel as f32 * scale);
        }
        adjusted += 1;
    }
    debug!(adjusted, level = l, "Specular control applied");
}

/// Gray-world white balance: each channel is scaled by the mean of all
/// three channel means divided by its own mean.
pub fn correct_color(img: &mut ImageBuffer) {
    let gains = gray_world_gains(img);
    for px in img.data_mut().chunks_exact_mut(ImageBuffer::CHANNELS) {
        for (channel, gain) in px[..3].iter_mut().zip(gains.iter()) {
            *channel = to_byte(*channel as f32 * gain);
        }
    }
    debug!(?gains, "Gray-world colour correction applied");
}

/// Per-channel gray-world gains. A channel whose mean is zero keeps gain 1.
pub fn gray_world_gains(img: &ImageBuffer) -> [f32; 3] {
    let mut sums = [0u64; 3];
    for px in img.data().chunks_exact(ImageBuffer::CHANNELS) {
        sums[0] += px[0] as u64;
        sums[1] += px[1] as u64;
        sums[2] += px[2] as u64;
    }
    let n = img.pixel_count() as f64;
    let means = sums.map(|s| s as f64 / n);
    let gray = (means[0] + means[1] + means[2]) / 3.0;
    means.map(|m| if m > 0.0 { (gray / m) as f32 } else { 1.0 })
}

/// Precomputed bilateral weights.
struct BilateralKernel {
    /// Spatial weight indexed by `(dy + 1) * 3 + (dx + 1)`.
    spatial: [f32; 9],
    /// Range weight indexed by absolute intensity difference.
    range: [f32; 256],
}

impl BilateralKernel {
    fn new() -> Self {
        let mut spatial = [0.0f32; 9];
        for dy in -1i32..=1 {
            for dx in -1i32..=1 {
                let d2 = (dx * dx + dy * dy) as f32;
                spatial[((dy + 1) * 3 + (dx + 1)) as usize] =
                    (-d2 / (2.0 * SPATIAL_SIGMA * SPATIAL_SIGMA)).exp();
            }
        }
        let mut range = [0.0f32; 256];
        for (diff, weight) in range.iter_mut().enumerate() {
            let d = diff as f32;
            *weight = (-(d * d) / (2.0 * RANGE_SIGMA * RANGE_SIGMA)).exp();
        }
        Self { spatial, range }
    }

    /// Fully filtered value of channel `c` at `(x, y)`.
    fn filter(&self, src: &ImageBuffer, x: u32, y: u32, c: usize) -> f32 {
        let center = src.pixel(x, y)[c];
        let (w, h) = (src.width() as i64, src.height() as i64);
        let mut weighted = 0.0f32;
        let mut total = 0.0f32;

        for dy in -1i64..=1 {
            for dx in -1i64..=1 {
                let nx = x as i64 + dx;
                let ny = y as i64 + dy;
                if nx < 0 || ny < 0 || nx >= w || ny >= h {
                    continue;
                }
                let value = src.pixel(nx as u32, ny as u32)[c];
                let weight = self.spatial[((dy + 1) * 3 + (dx + 1)) as usize]
                    * self.range[center.abs_diff(value) as usize];
                weighted += weight * value as f32;
                total += weight;
            }
        }

        // The centre pixel always contributes weight 1.
        weighted / total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enhance::regions::{GUM_FACTOR, RegionKind, TOOTH_FACTOR};
    use dentaview_core::{EnhancementOptions, Rect};

    fn noisy_image() -> ImageBuffer {
        let mut img = ImageBuffer::from_pixel(6, 6, [120, 120, 120, 255]).expect("valid");
        img.set_pixel(2, 2, [140, 100, 125, 255]);
        img.set_pixel(3, 4, [110, 135, 118, 200]);
        img
    }

    #[test]
    fn noise_strength_zero_is_identity() {
        let img = noisy_image();
        let mut out = img.clone();
        reduce_noise(&mut out, 0.0);
        assert_eq!(out, img);
    }

    #[test]
    fn noise_strength_full_is_pure_bilateral() {
        let img = noisy_image();
        let kernel = BilateralKernel::new();
        let mut out = img.clone();
        reduce_noise(&mut out, 100.0);
        for y in 0..6 {
            for x in 0..6 {
                let px = out.pixel(x, y);
                for c in 0..3 {
                    assert_eq!(px[c], to_byte(kernel.filter(&img, x, y, c)));
                }
                assert_eq!(px[3], img.pixel(x, y)[3]);
            }
        }
    }

    #[test]
    fn bilateral_preserves_strong_edges() {
        let mut img = ImageBuffer::from_pixel(8, 8, [0, 0, 0, 255]).expect("valid");
        for y in 0..8 {
            for x in 4..8 {
                img.set_pixel(x, y, [200, 200, 200, 255]);
            }
        }
        let mut out = img.clone();
        reduce_noise(&mut out, 100.0);
        assert_eq!(out.pixel(3, 4), [0, 0, 0, 255]);
        assert_eq!(out.pixel(4, 4), [200, 200, 200, 255]);
    }

    #[test]
    fn contrast_uses_region_factor() {
        let mut img = ImageBuffer::from_pixel(10, 10, [100, 100, 100, 255]).expect("valid");
        let regions = [
            ContrastRegion {
                kind: RegionKind::Tooth,
                rect: Rect::new(0.0, 0.0, 4.0, 4.0),
                factor: TOOTH_FACTOR,
            },
            ContrastRegion {
                kind: RegionKind::Gum,
                rect: Rect::new(6.0, 6.0, 3.0, 3.0),
                factor: GUM_FACTOR,
            },
        ];
        adaptive_contrast(&mut img, 50.0, &regions);
        // (100 − 128)·(1 + 0.5·f) + 128
        assert_eq!(img.pixel(1, 1)[0], 83); // tooth: 83.2
        assert_eq!(img.pixel(7, 7)[0], 85); // gum: 84.6
        assert_eq!(img.pixel(5, 0)[0], 86); // background: 86.0
    }

    #[test]
    fn contrast_clamps_extremes() {
        let mut img = ImageBuffer::from_pixel(2, 2, [250, 5, 128, 255]).expect("valid");
        adaptive_contrast(&mut img, 500.0, &[]);
        assert_eq!(img.pixel(0, 0), [255, 0, 128, 255]);
    }

    #[test]
    fn specular_positive_level_dims_highlights() {
        let mut img = ImageBuffer::from_pixel(2, 1, [255, 255, 255, 255]).expect("valid");
        img.set_pixel(1, 0, [150, 150, 150, 255]);
        control_specular(&mut img, 50.0);
        // scale = 1 − 0.5·(255 − 200)/55 = 0.5
        assert_eq!(img.pixel(0, 0), [128, 128, 128, 255]);
        // Not a highlight.
        assert_eq!(img.pixel(1, 0), [150, 150, 150, 255]);
    }

    #[test]
    fn negative_specular_level_lifts_highlights() {
        let mut img = ImageBuffer::from_pixel(2, 1, [230, 220, 210, 255]).expect("valid");
        img.set_pixel(1, 0, [150, 150, 150, 255]);
        control_specular(&mut img, -30.0);
        // scale = 1 + 0.3·(220 − 200)/55 ≈ 1.109
        let [r, g, b, _] = img.pixel(0, 0);
        assert_eq!(r, 255);
        assert!(g > 220 && b > 210, "{:?}", img.pixel(0, 0));
        assert_eq!(img.pixel(1, 0), [150, 150, 150, 255]);
    }

    #[test]
    fn general_presets_lift_and_glare_presets_dim() {
        let highlight = [240u8, 235, 230, 255];
        for (level, lifts) in [
            (EnhancementOptions::smart_enhance().specular_level, true),
            (EnhancementOptions::dental_mode().specular_level, true),
            (EnhancementOptions::clinical_mode().specular_level, true),
            (50.0, false),
        ] {
            let mut img = ImageBuffer::from_pixel(1, 1, highlight).expect("valid");
            control_specular(&mut img, level);
            let [r, g, b, _] = img.pixel(0, 0);
            let after = brightness(r, g, b);
            let before = brightness(highlight[0], highlight[1], highlight[2]);
            assert_eq!(after > before, lifts, "level {level}: {before} -> {after}");
        }
    }

    #[test]
    fn specular_preserves_hue_ratio() {
        let mut img = ImageBuffer::from_pixel(1, 1, [250, 230, 210, 255]).expect("valid");
        control_specular(&mut img, 100.0);
        let [r, g, b, _] = img.pixel(0, 0);
        assert!(r > g && g > b);
        assert!(brightness(r, g, b) < 230.0);
    }

    #[test]
    fn gray_world_balances_channel_means() {
        let mut img = ImageBuffer::from_pixel(4, 4, [200, 100, 60, 255]).expect("valid");
        correct_color(&mut img);
        // Means 200/100/60 → gray 120 → gains 0.6 / 1.2 / 2.0
        assert_eq!(img.pixel(0, 0), [120, 120, 120, 255]);
    }

    #[test]
    fn gray_world_gain_is_one_for_uniform_white() {
        let img = ImageBuffer::from_pixel(4, 4, [255, 255, 255, 255]).expect("valid");
        assert_eq!(gray_world_gains(&img), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn zero_channel_keeps_unit_gain() {
        let img = ImageBuffer::from_pixel(2, 2, [90, 90, 0, 255]).expect("valid");
        assert_eq!(gray_world_gains(&img)[2], 1.0);
    }

    #[test]
    fn whitening_skips_non_tooth_pixels() {
        let mut img = ImageBuffer::from_pixel(3, 3, [190, 110, 100, 255]).expect("valid");
        let before = img.clone();
        whiten(&mut img, 100.0);
        assert_eq!(img, before);
    }
}

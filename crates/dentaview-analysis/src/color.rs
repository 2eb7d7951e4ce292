// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Colour-space utilities: RGB-to-HSV conversion, luma, colour distance and
// per-pixel channel statistics shared by every classifier.

/// HSV colour.
/// - `h`: hue in degrees, 0.0..360.0
/// - `s`: saturation, 0.0..=1.0
/// - `v`: value, 0.0..=1.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub h: f32,
    pub s: f32,
    pub v: f32,
}

/// Convert 8-bit RGB to HSV.
#[inline]
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> Hsv {
    let r = r as f32 / 255.0;
    let g = g as f32 / 255.0;
    let b = b as f32 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let s = if max > 0.0 { delta / max } else { 0.0 };

    // Achromatic
    if delta < 1e-6 {
        return Hsv { h: 0.0, s, v: max };
    }

    let h = if max == r {
        60.0 * ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };

    Hsv {
        h: h % 360.0,
        s,
        v: max,
    }
}

/// Rec. 601 luma, 0.0..=255.0.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> f32 {
    0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32
}

/// Plain channel average, 0.0..=255.0.
#[inline]
pub fn brightness(r: u8, g: u8, b: u8) -> f32 {
    (r as f32 + g as f32 + b as f32) / 3.0
}

/// Euclidean distance between two RGB triples.
#[inline]
pub fn color_distance(a: [u8; 3], b: [u8; 3]) -> f32 {
    let dr = a[0] as f32 - b[0] as f32;
    let dg = a[1] as f32 - b[1] as f32;
    let db = a[2] as f32 - b[2] as f32;
    (dr * dr + dg * dg + db * db).sqrt()
}

/// Standard deviation of the three channels around their mean.
#[inline]
pub fn channel_std_dev(r: u8, g: u8, b: u8) -> f32 {
    let mean = brightness(r, g, b);
    let var = [r, g, b]
        .iter()
        .map(|&c| (c as f32 - mean).powi(2))
        .sum::<f32>()
        / 3.0;
    var.sqrt()
}

/// Spread between the largest and smallest channel.
#[inline]
pub fn channel_range(r: u8, g: u8, b: u8) -> u8 {
    r.max(g).max(b) - r.min(g).min(b)
}

/// Round and clamp a float to a byte.
#[inline]
pub fn to_byte(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primaries_have_expected_hue() {
        assert_eq!(rgb_to_hsv(255, 0, 0).h, 0.0);
        assert!((rgb_to_hsv(0, 255, 0).h - 120.0).abs() < 1e-3);
        assert!((rgb_to_hsv(0, 0, 255).h - 240.0).abs() < 1e-3);
    }

    #[test]
    fn gray_is_achromatic() {
        let hsv = rgb_to_hsv(128, 128, 128);
        assert_eq!(hsv.h, 0.0);
        assert_eq!(hsv.s, 0.0);
        assert!((hsv.v - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn black_has_zero_saturation() {
        let hsv = rgb_to_hsv(0, 0, 0);
        assert_eq!(hsv.s, 0.0);
        assert_eq!(hsv.v, 0.0);
    }

    #[test]
    fn magenta_hue_wraps_below_360() {
        let hsv = rgb_to_hsv(255, 0, 128);
        assert!(hsv.h > 300.0 && hsv.h < 360.0, "hue {}", hsv.h);
    }

    #[test]
    fn distance_is_euclidean() {
        assert!((color_distance([0, 0, 0], [3, 4, 0]) - 5.0).abs() < 1e-6);
        assert_eq!(color_distance([9, 9, 9], [9, 9, 9]), 0.0);
    }

    #[test]
    fn channel_statistics() {
        assert_eq!(channel_range(200, 180, 190), 20);
        assert_eq!(channel_std_dev(50, 50, 50), 0.0);
        assert!(channel_std_dev(0, 0, 255) > 100.0);
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Gum line detection: HSV colour segmentation and a least-squares line fit.

use dentaview_core::{GumDetection, GumLine, ImageBuffer, Point};
use tracing::{info, instrument, warn};

use crate::color::rgb_to_hsv;

/// Confidence reported whenever a line was fitted.
const GUM_CONFIDENCE: f32 = 0.85;

/// Gum tissue test: hue 0–30°, saturation above 0.2, and a value strictly
/// between 50 and 200 on the 0–255 scale.
pub fn is_gum_pixel(r: u8, g: u8, b: u8) -> bool {
    let hsv = rgb_to_hsv(r, g, b);
    let value = hsv.v * 255.0;
    (0.0..=30.0).contains(&hsv.h) && hsv.s > 0.2 && value > 50.0 && value < 200.0
}

/// Classify gum pixels and fit `y = slope·x + intercept` through them.
///
/// Fewer than two points, or points that all share one column, cannot
/// define a non-vertical line: the result then has no line and confidence 0.
#[instrument(skip(img), fields(width = img.width(), height = img.height()))]
pub fn detect_gum_line(img: &ImageBuffer) -> GumDetection {
    let mut points = Vec::new();
    for y in 0..img.height() {
        for x in 0..img.width() {
            let [r, g, b, _] = img.pixel(x, y);
            if is_gum_pixel(r, g, b) {
                points.push(Point::new(x as f32, y as f32));
            }
        }
    }

    match fit_line(&points) {
        Some((slope, intercept)) => {
            info!(
                points = points.len(),
                slope, intercept, "Gum line fitted"
            );
            GumDetection {
                line: Some(GumLine {
                    slope,
                    intercept,
                    source_points: points,
                }),
                confidence: GUM_CONFIDENCE,
            }
        }
        None => {
            if !points.is_empty() {
                warn!(points = points.len(), "Degenerate gum line fit");
            }
            GumDetection {
                line: None,
                confidence: 0.0,
            }
        }
    }
}

/// Ordinary least squares over `points`. `None` when the fit is degenerate.
fn fit_line(points: &[Point]) -> Option<(f64, f64)> {
    if points.len() < 2 {
        return None;
    }
    let n = points.len() as f64;
    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_xx) = (0.0f64, 0.0f64, 0.0f64, 0.0f64);
    for p in points {
        let (x, y) = (p.x as f64, p.y as f64);
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
    }

    let denom = n * sum_xx - sum_x * sum_x;
    if denom.abs() < 1e-9 {
        return None;
    }
    let slope = (n * sum_xy - sum_x * sum_y) / denom;
    let intercept = (sum_y - slope * sum_x) / n;
    Some((slope, intercept))
}

#[cfg(test)]
mod tests {
    use super::*;

    const GUM: [u8; 4] = [190, 110, 100, 255];

    #[test]
    fn gum_colour_classification() {
        assert!(is_gum_pixel(190, 110, 100));
        // Bright enamel is not gum.
        assert!(!is_gum_pixel(230, 215, 190));
        // Too bright a red.
        assert!(!is_gum_pixel(250, 120, 110));
        // Too dark.
        assert!(!is_gum_pixel(40, 10, 5));
    }

    #[test]
    fn horizontal_band_fits_flat_line() {
        let mut img = ImageBuffer::from_pixel(40, 40, [255, 255, 255, 255]).expect("valid");
        for y in 20..24 {
            for x in 0..40 {
                img.set_pixel(x, y, GUM);
            }
        }
        let result = detect_gum_line(&img);
        let line = result.line.expect("line fitted");
        assert!(line.slope.abs() < 1e-9);
        assert!((line.intercept - 21.5).abs() < 1e-9);
        assert_eq!(line.source_points.len(), 160);
        assert_eq!(result.confidence, 0.85);
    }

    #[test]
    fn diagonal_pixels_fit_unit_slope() {
        let mut img = ImageBuffer::from_pixel(30, 30, [255, 255, 255, 255]).expect("valid");
        for i in 0..30 {
            img.set_pixel(i, i, GUM);
        }
        let line = detect_gum_line(&img).line.expect("line fitted");
        assert!((line.slope - 1.0).abs() < 1e-9);
        assert!(line.intercept.abs() < 1e-9);
        assert!((line.y_at(10.0) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn no_gum_pixels_means_no_line() {
        let img = ImageBuffer::from_pixel(4, 4, [255, 255, 255, 255]).expect("valid");
        let result = detect_gum_line(&img);
        assert!(result.line.is_none());
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn single_column_is_degenerate() {
        let mut img = ImageBuffer::from_pixel(10, 10, [255, 255, 255, 255]).expect("valid");
        for y in 0..10 {
            img.set_pixel(4, y, GUM);
        }
        let result = detect_gum_line(&img);
        assert!(result.line.is_none());
        assert_eq!(result.confidence, 0.0);
    }
}

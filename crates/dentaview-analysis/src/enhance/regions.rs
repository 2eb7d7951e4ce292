// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Contrast regions: the ordered list of rectangles adaptive contrast
// treats differently from the background.

use dentaview_core::{DetectionResult, Rect};

/// Contrast multiplier for pixels outside every region.
pub const BACKGROUND_FACTOR: f32 = 1.0;
pub const TOOTH_FACTOR: f32 = 1.2;
pub const GUM_FACTOR: f32 = 1.1;

/// Which feature a region came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionKind {
    Tooth,
    Gum,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContrastRegion {
    pub kind: RegionKind,
    pub rect: Rect,
    pub factor: f32,
}

/// Build the region list in application order: every tooth bounding box,
/// then the gum rectangle. Later entries win where regions overlap.
pub fn contrast_regions(
    detection: Option<&DetectionResult>,
    width: u32,
    height: u32,
) -> Vec<ContrastRegion> {
    let mut regions: Vec<ContrastRegion> = detection
        .map(|d| d.tooth_boundaries())
        .unwrap_or(&[])
        .iter()
        .map(|tooth| ContrastRegion {
            kind: RegionKind::Tooth,
            rect: tooth.bounding_box,
            factor: TOOTH_FACTOR,
        })
        .collect();

    regions.push(ContrastRegion {
        kind: RegionKind::Gum,
        rect: gum_rect(detection, width, height),
        factor: GUM_FACTOR,
    });

    regions
}

/// Tolerance for snapping fractional band edges onto pixel rows.
const EDGE_EPSILON: f64 = 1e-6;

/// The gum band. Without a fitted line it is the fixed estimate
/// x∈[0.1w, 0.9w], y∈[0.6h, 0.9h]; with a line it spans the line's rows
/// across the same columns, padded by 5% of the height. Edges are snapped
/// to the whole pixels inside the band.
pub fn gum_rect(detection: Option<&DetectionResult>, width: u32, height: u32) -> Rect {
    let w = width as f64;
    let h = height as f64;
    let x0 = snap_up(0.1 * w);
    let x1 = snap_down(0.9 * w);

    let (top, bottom) = match detection.and_then(|d| d.gum_line()) {
        Some(line) => {
            let ya = line.y_at(0.1 * w);
            let yb = line.y_at(0.9 * w);
            let pad = 0.05 * h;
            (
                snap_up((ya.min(yb) - pad).clamp(0.0, h)),
                snap_down((ya.max(yb) + pad).clamp(0.0, h)),
            )
        }
        None => (snap_up(0.6 * h), snap_down(0.9 * h)),
    };

    Rect::new(
        x0 as f32,
        top as f32,
        (x1 - x0).max(0.0) as f32,
        (bottom - top).max(0.0) as f32,
    )
}

/// First whole pixel at or after `v`.
fn snap_up(v: f64) -> f64 {
    (v - EDGE_EPSILON).ceil()
}

/// Last whole pixel at or before `v`.
fn snap_down(v: f64) -> f64 {
    (v + EDGE_EPSILON).floor()
}

/// Per-pixel contrast factor map for a `width x height` image.
pub fn factor_map(regions: &[ContrastRegion], width: u32, height: u32) -> Vec<f32> {
    let (w, h) = (width as usize, height as usize);
    let mut map = vec![BACKGROUND_FACTOR; w * h];

    for region in regions {
        let rect = region.rect;
        let x_start = rect.x.ceil().max(0.0) as usize;
        let y_start = rect.y.ceil().max(0.0) as usize;
        let x_end = (rect.right().floor() as i64).min(w as i64 - 1);
        let y_end = (rect.bottom().floor() as i64).min(h as i64 - 1);
        if x_end < x_start as i64 || y_end < y_start as i64 {
            continue;
        }
        for y in y_start..=y_end as usize {
            let row = y * w;
            map[row + x_start..=row + x_end as usize].fill(region.factor);
        }
    }

    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use dentaview_core::{GumDetection, GumLine, Point, ToothBoundary, ToothDetection};

    fn detection_with_tooth(rect: Rect) -> DetectionResult {
        DetectionResult {
            teeth: Some(ToothDetection {
                boundaries: vec![ToothBoundary {
                    points: Vec::new(),
                    bounding_box: rect,
                    center: Point::new(rect.x + rect.width / 2.0, rect.y + rect.height / 2.0),
                }],
                count: 1,
                confidence: 0.6,
            }),
            ..DetectionResult::empty()
        }
    }

    #[test]
    fn teeth_come_before_gums() {
        let detection = detection_with_tooth(Rect::new(1.0, 1.0, 2.0, 2.0));
        let regions = contrast_regions(Some(&detection), 10, 10);
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].kind, RegionKind::Tooth);
        assert_eq!(regions[1].kind, RegionKind::Gum);
    }

    #[test]
    fn estimated_gum_rect_without_line() {
        let rect = gum_rect(None, 100, 200);
        assert_eq!(rect, Rect::new(10.0, 120.0, 80.0, 60.0));
    }

    #[test]
    fn gum_rect_follows_fitted_line() {
        let detection = DetectionResult {
            gums: Some(GumDetection {
                line: Some(GumLine {
                    slope: 0.0,
                    intercept: 50.0,
                    source_points: Vec::new(),
                }),
                confidence: 0.85,
            }),
            ..DetectionResult::empty()
        };
        let rect = gum_rect(Some(&detection), 100, 100);
        assert_eq!(rect, Rect::new(10.0, 45.0, 80.0, 10.0));
    }

    #[test]
    fn estimated_band_covers_its_first_and_last_rows() {
        for (w, h) in [(100u32, 200u32), (100, 100), (37, 53), (640, 480), (7, 7), (41, 10)] {
            let map = factor_map(&contrast_regions(None, w, h), w, h);
            let first = (6 * h).div_ceil(10);
            let last = 9 * h / 10;
            let x = w / 2;
            let at = |y: u32| map[(y * w + x) as usize];

            assert_eq!(at(first), GUM_FACTOR, "{w}x{h} row {first}");
            assert_eq!(at(last.min(h - 1)), GUM_FACTOR, "{w}x{h} row {last}");
            if first > 0 {
                assert_eq!(at(first - 1), BACKGROUND_FACTOR, "{w}x{h} row {}", first - 1);
            }
            if last + 1 < h {
                assert_eq!(at(last + 1), BACKGROUND_FACTOR, "{w}x{h} row {}", last + 1);
            }
        }
    }

    #[test]
    fn later_regions_overwrite_earlier_ones() {
        let regions = [
            ContrastRegion {
                kind: RegionKind::Tooth,
                rect: Rect::new(0.0, 0.0, 4.0, 4.0),
                factor: TOOTH_FACTOR,
            },
            ContrastRegion {
                kind: RegionKind::Gum,
                rect: Rect::new(2.0, 2.0, 5.0, 5.0),
                factor: GUM_FACTOR,
            },
        ];
        let map = factor_map(&regions, 8, 8);
        assert_eq!(map[0], TOOTH_FACTOR);
        assert_eq!(map[3 * 8 + 3], GUM_FACTOR);
        assert_eq!(map[7 * 8 + 7], GUM_FACTOR);
        assert_eq!(map[7 * 8], BACKGROUND_FACTOR);
    }

    #[test]
    fn regions_outside_the_image_are_ignored() {
        let regions = [ContrastRegion {
            kind: RegionKind::Tooth,
            rect: Rect::new(50.0, 50.0, 5.0, 5.0),
            factor: TOOTH_FACTOR,
        }];
        let map = factor_map(&regions, 8, 8);
        assert!(map.iter().all(|&f| f == BACKGROUND_FACTOR));
    }
}

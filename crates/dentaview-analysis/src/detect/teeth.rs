// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tooth contour detection: Sobel edge map, connected components, border
// following and a geometric (area + circularity) filter.

use dentaview_core::{ImageBuffer, Point, Rect, ToothBoundary, ToothDetection};
use image::{GrayImage, Luma};
use imageproc::contours::{BorderType, find_contours};
use imageproc::gradients::{horizontal_sobel, vertical_sobel};
use tracing::{debug, info, instrument};

use crate::color::luma;

/// Sobel magnitude above which a pixel is an edge.
const EDGE_THRESHOLD: f32 = 50.0;
/// Components with fewer edge pixels are noise.
const MIN_CONTOUR_POINTS: usize = 10;
/// Accepted polygon area range (exclusive), in square pixels.
const MIN_AREA: f64 = 500.0;
const MAX_AREA: f64 = 50_000.0;
/// Accepted circularity range (exclusive).
const MIN_CIRCULARITY: f64 = 0.3;
const MAX_CIRCULARITY: f64 = 0.8;

/// Detect tooth-like closed contours.
///
/// ## Pipeline
///
/// 1. Rec. 601 grayscale
/// 2. 3x3 Sobel magnitude on interior pixels, thresholded at 50
/// 3. 4-neighbour flood fill over edge pixels; components under 10 pixels
///    are dropped
/// 4. Each surviving component's outer border is traced in order and
///    scored: accepted iff `500 < area < 50000` and
///    `0.3 < 4π·area/perimeter² < 0.8`
#[instrument(skip(img), fields(width = img.width(), height = img.height()))]
pub fn detect_teeth(img: &ImageBuffer) -> ToothDetection {
    let gray = to_gray(img);
    let edges = edge_map(&gray);
    let (labels, component_sizes) = label_components(&edges);
    debug!(components = component_sizes.len(), "Edge components labelled");

    let width = edges.width() as usize;
    let mut claimed = vec![false; component_sizes.len()];
    let mut boundaries = Vec::new();

    for contour in find_contours::<i32>(&edges) {
        if contour.border_type != BorderType::Outer {
            continue;
        }
        let Some(first) = contour.points.first() else {
            continue;
        };
        let label = labels[first.y as usize * width + first.x as usize];
        if label == 0 {
            continue;
        }
        let component = (label - 1) as usize;
        if claimed[component] || component_sizes[component] < MIN_CONTOUR_POINTS {
            continue;
        }
        claimed[component] = true;

        let polygon: Vec<Point> = contour
            .points
            .iter()
            .map(|p| Point::new(p.x as f32, p.y as f32))
            .collect();

        let area = polygon_area(&polygon);
        let perimeter = polygon_perimeter(&polygon);
        if perimeter <= 0.0 {
            continue;
        }
        let circularity = 4.0 * std::f64::consts::PI * area / (perimeter * perimeter);

        if is_tooth_shaped(area, circularity) {
            debug!(area, perimeter, circularity, "Tooth-shaped contour accepted");
            boundaries.push(boundary_from_polygon(polygon));
        }
    }

    let count = boundaries.len();
    let confidence = tooth_confidence(count);
    info!(count, confidence, "Tooth contour detection complete");

    ToothDetection {
        boundaries,
        count,
        confidence,
    }
}

/// Fixed lookup of detection confidence by tooth count. Not a calibrated
/// probability.
pub fn tooth_confidence(count: usize) -> f32 {
    match count {
        0 => 0.0,
        1..=3 => 0.6,
        4..=7 => 0.8,
        _ => 0.9,
    }
}

fn is_tooth_shaped(area: f64, circularity: f64) -> bool {
    area > MIN_AREA
        && area < MAX_AREA
        && circularity > MIN_CIRCULARITY
        && circularity < MAX_CIRCULARITY
}

fn to_gray(img: &ImageBuffer) -> GrayImage {
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        let [r, g, b, _] = img.pixel(x, y);
        Luma([luma(r, g, b).round() as u8])
    })
}

/// Binary edge map (0 / 255). The outermost ring of pixels is never an
/// edge.
fn edge_map(gray: &GrayImage) -> GrayImage {
    let (w, h) = gray.dimensions();
    let gx = horizontal_sobel(gray);
    let gy = vertical_sobel(gray);
    let mut edges = GrayImage::new(w, h);
    let mut edge_pixels = 0usize;

    for y in 1..h.saturating_sub(1) {
        for x in 1..w.saturating_sub(1) {
            let dx = gx.get_pixel(x, y).0[0] as f32;
            let dy = gy.get_pixel(x, y).0[0] as f32;
            if (dx * dx + dy * dy).sqrt() > EDGE_THRESHOLD {
                edges.put_pixel(x, y, Luma([255]));
                edge_pixels += 1;
            }
        }
    }

    debug!(edge_pixels, "Sobel edge map built");
    edges
}

/// Label 4-connected edge components. Returns the per-pixel label map
/// (0 = background, `n` = component `n - 1`) and each component's size.
fn label_components(edges: &GrayImage) -> (Vec<u32>, Vec<usize>) {
    let (w, h) = edges.dimensions();
    let (w, h) = (w as usize, h as usize);
    let raw = edges.as_raw();
    let mut labels = vec![0u32; w * h];
    let mut sizes = Vec::new();
    let mut stack = Vec::new();

    for start in 0..w * h {
        if raw[start] == 0 || labels[start] != 0 {
            continue;
        }
        let label = sizes.len() as u32 + 1;
        labels[start] = label;
        stack.push(start);
        let mut size = 0usize;

        while let Some(idx) = stack.pop() {
            size += 1;
            let (x, y) = (idx % w, idx / w);
            let mut visit = |n: usize| {
                if raw[n] != 0 && labels[n] == 0 {
                    labels[n] = label;
                    stack.push(n);
                }
            };
            if x > 0 {
                visit(idx - 1);
            }
            if x + 1 < w {
                visit(idx + 1);
            }
            if y > 0 {
                visit(idx - w);
            }
            if y + 1 < h {
                visit(idx + w);
            }
        }
        sizes.push(size);
    }

    (labels, sizes)
}

/// Shoelace area of a closed polygon (vertices in order, CW or CCW).
fn polygon_area(points: &[Point]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut area = 0.0f64;
    for i in 0..n {
        let j = (i + 1) % n;
        area += points[i].x as f64 * points[j].y as f64;
        area -= points[j].x as f64 * points[i].y as f64;
    }
    area.abs() / 2.0
}

/// Closed perimeter: sum of segment lengths including the closing edge.
fn polygon_perimeter(points: &[Point]) -> f64 {
    let n = points.len();
    if n < 2 {
        return 0.0;
    }
    (0..n)
        .map(|i| {
            let a = points[i];
            let b = points[(i + 1) % n];
            ((b.x - a.x) as f64).hypot((b.y - a.y) as f64)
        })
        .sum()
}

fn boundary_from_polygon(points: Vec<Point>) -> ToothBoundary {
    let (mut min_x, mut min_y) = (f32::MAX, f32::MAX);
    let (mut max_x, mut max_y) = (f32::MIN, f32::MIN);
    let (mut sum_x, mut sum_y) = (0.0f64, 0.0f64);

    for p in &points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
        sum_x += p.x as f64;
        sum_y += p.y as f64;
    }

    let n = points.len().max(1) as f64;
    ToothBoundary {
        bounding_box: Rect::new(min_x, min_y, max_x - min_x, max_y - min_y),
        center: Point::new((sum_x / n) as f32, (sum_y / n) as f32),
        points,
    }
}

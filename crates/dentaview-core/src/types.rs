// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Dentaview photo analysis engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DentaviewError, Result};

// -- Image buffer -------------------------------------------------------------

/// An RGBA8 image: `width * height` pixels, row-major, 4 bytes per pixel.
///
/// The length invariant `data.len() == width * height * 4` is checked on
/// construction and cannot be broken afterwards, so every buffer handed to
/// the analysis code is well-formed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl ImageBuffer {
    /// Bytes per pixel.
    pub const CHANNELS: usize = 4;

    /// Wrap raw RGBA bytes, rejecting zero dimensions and size mismatches.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = expected_len(width, height)?;
        if data.len() != expected {
            return Err(DentaviewError::InvalidImage(format!(
                "expected {expected} bytes for {width}x{height} RGBA, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Create an image filled with a single RGBA colour.
    pub fn from_pixel(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self> {
        let expected = expected_len(width, height)?;
        let data = rgba.iter().copied().cycle().take(expected).collect();
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Borrow the raw RGBA bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable access to the raw bytes. The slice length is fixed, so the
    /// size invariant still holds.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Byte offset of pixel `(x, y)`.
    #[inline]
    pub fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * Self::CHANNELS
    }

    /// Read pixel `(x, y)`. Panics if out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.offset(x, y);
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Write pixel `(x, y)`. Panics if out of bounds.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let i = self.offset(x, y);
        self.data[i..i + 4].copy_from_slice(&rgba);
    }
}

fn expected_len(width: u32, height: u32) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(DentaviewError::InvalidImage(format!(
            "zero dimension ({width}x{height})"
        )));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(ImageBuffer::CHANNELS))
        .ok_or_else(|| {
            DentaviewError::InvalidImage(format!("{width}x{height} image is too large"))
        })
}

// -- Geometry -----------------------------------------------------------------

/// A point in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

// -- Detection results --------------------------------------------------------

/// Outline of one tooth-like contour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToothBoundary {
    /// Ordered outer border of the contour.
    pub points: Vec<Point>,
    pub bounding_box: Rect,
    pub center: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToothDetection {
    pub boundaries: Vec<ToothBoundary>,
    /// Always `boundaries.len()`.
    pub count: usize,
    pub confidence: f32,
}

/// Least-squares gum line `y = slope * x + intercept`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GumLine {
    pub slope: f64,
    pub intercept: f64,
    pub source_points: Vec<Point>,
}

impl GumLine {
    /// Evaluate the line at column `x`.
    pub fn y_at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GumDetection {
    pub line: Option<GumLine>,
    pub confidence: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PosteriorZones {
    pub left: Rect,
    pub right: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmileZones {
    pub anterior: Rect,
    pub posterior: PosteriorZones,
    pub confidence: f32,
}

/// A sparse sample location flagged by a surface detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplePoint {
    pub x: u32,
    pub y: u32,
    pub radius: u32,
}

/// Output of the plaque and restoration detectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceDetection {
    pub points: Vec<SamplePoint>,
    pub confidence: f32,
}

/// Aggregate of per-feature findings. Absent features mean "nothing
/// detected". Built once per detection call and consumed read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub teeth: Option<ToothDetection>,
    pub gums: Option<GumDetection>,
    pub smile_zones: Option<SmileZones>,
    pub plaque: Option<SurfaceDetection>,
    pub restorations: Option<SurfaceDetection>,
    pub timestamp: DateTime<Utc>,
}

impl DetectionResult {
    /// A result with no findings at all, stamped now.
    pub fn empty() -> Self {
        Self {
            teeth: None,
            gums: None,
            smile_zones: None,
            plaque: None,
            restorations: None,
            timestamp: Utc::now(),
        }
    }

    /// Tooth boundaries, or an empty slice when teeth were not detected.
    pub fn tooth_boundaries(&self) -> &[ToothBoundary] {
        self.teeth
            .as_ref()
            .map(|t| t.boundaries.as_slice())
            .unwrap_or(&[])
    }

    /// The fitted gum line, if any.
    pub fn gum_line(&self) -> Option<&GumLine> {
        self.gums.as_ref().and_then(|g| g.line.as_ref())
    }
}

// -- Enhancement options ------------------------------------------------------

/// Knobs for the enhancement pipeline. Each stage runs only when its flag
/// is set; out-of-range strengths are clamped by the stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnhancementOptions {
    pub whitening: bool,
    /// 0..=100
    pub whitening_strength: f32,
    pub contrast: bool,
    /// 0..=100
    pub contrast_strength: f32,
    pub noise_reduction: bool,
    /// 0..=100
    pub noise_reduction_strength: f32,
    pub specular_control: bool,
    /// -100..=100. Pixels brighter than 200 are scaled by
    /// `1 - level/100 * (b - 200)/55`, so a positive level dims highlights and
    /// a negative level lifts them. The general-purpose constructors below
    /// use small negative levels to add sparkle; camera profiles and the
    /// glare-oriented presets use positive levels to tame flash reflections.
    pub specular_level: f32,
    pub color_correction: bool,
}

impl Default for EnhancementOptions {
    fn default() -> Self {
        Self::none()
    }
}

impl EnhancementOptions {
    /// Every stage disabled: the pipeline returns its input unchanged.
    pub const fn none() -> Self {
        Self {
            whitening: false,
            whitening_strength: 0.0,
            contrast: false,
            contrast_strength: 0.0,
            noise_reduction: false,
            noise_reduction_strength: 0.0,
            specular_control: false,
            specular_level: 0.0,
            color_correction: false,
        }
    }

    /// General-purpose enhancement.
    pub const fn smart_enhance() -> Self {
        Self {
            whitening: true,
            whitening_strength: 30.0,
            contrast: true,
            contrast_strength: 25.0,
            noise_reduction: true,
            noise_reduction_strength: 35.0,
            specular_control: true,
            specular_level: -15.0,
            color_correction: true,
        }
    }

    /// Stronger structure emphasis for dental photography.
    pub const fn dental_mode() -> Self {
        Self {
            whitening: true,
            whitening_strength: 20.0,
            contrast: true,
            contrast_strength: 40.0,
            noise_reduction: true,
            noise_reduction_strength: 50.0,
            specular_control: true,
            specular_level: -25.0,
            color_correction: true,
        }
    }

    /// Shade-preserving documentation: whitening never runs.
    pub const fn clinical_mode() -> Self {
        Self {
            whitening: false,
            whitening_strength: 0.0,
            contrast: true,
            contrast_strength: 15.0,
            noise_reduction: true,
            noise_reduction_strength: 60.0,
            specular_control: true,
            specular_level: -30.0,
            color_correction: true,
        }
    }

    /// True when no stage is enabled.
    pub fn is_noop(&self) -> bool {
        !(self.whitening
            || self.contrast
            || self.noise_reduction
            || self.specular_control
            || self.color_correction)
    }
}

// -- Camera profiles ----------------------------------------------------------

/// Identifier of a camera profile in the static catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(pub String);

impl ProfileId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProfileId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl std::fmt::Display for ProfileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_rejects_size_mismatch() {
        let err = ImageBuffer::new(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(err, DentaviewError::InvalidImage(_)));
    }

    #[test]
    fn buffer_rejects_zero_dimensions() {
        assert!(ImageBuffer::new(0, 4, Vec::new()).is_err());
        assert!(ImageBuffer::from_pixel(4, 0, [0, 0, 0, 255]).is_err());
    }

    #[test]
    fn from_pixel_fills_every_pixel() {
        let img = ImageBuffer::from_pixel(3, 2, [10, 20, 30, 255]).expect("valid");
        assert_eq!(img.data().len(), 3 * 2 * 4);
        assert_eq!(img.pixel(2, 1), [10, 20, 30, 255]);
    }

    #[test]
    fn set_pixel_round_trips() {
        let mut img = ImageBuffer::from_pixel(4, 4, [0, 0, 0, 255]).expect("valid");
        img.set_pixel(3, 2, [1, 2, 3, 4]);
        assert_eq!(img.pixel(3, 2), [1, 2, 3, 4]);
        assert_eq!(img.pixel(2, 3), [0, 0, 0, 255]);
    }

    #[test]
    fn none_options_are_noop() {
        assert!(EnhancementOptions::none().is_noop());
        assert!(EnhancementOptions::default().is_noop());
        assert!(!EnhancementOptions::clinical_mode().is_noop());
        assert!(!EnhancementOptions::clinical_mode().whitening);
    }

    #[test]
    fn empty_detection_has_no_boundaries() {
        let result = DetectionResult::empty();
        assert!(result.tooth_boundaries().is_empty());
        assert!(result.gum_line().is_none());
    }
}

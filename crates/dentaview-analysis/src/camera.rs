// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Camera profile matching: a hand-tuned heuristic that maps noise, colour
// cast and specular statistics to one of a fixed set of capture setups.

use dentaview_core::error::Result;
use dentaview_core::{DentaviewError, EnhancementOptions, ImageBuffer, ProfileId};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::color::{brightness, channel_range, luma};

/// Grid spacing of noise samples.
const NOISE_SAMPLE_STRIDE: usize = 20;
/// Half-width of the 5x5 noise window.
const NOISE_WINDOW_RADIUS: u32 = 2;

/// Ordinal level used for noise and specular tendencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Low,
    Medium,
    High,
}

impl Level {
    fn rank(self) -> i32 {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
        }
    }

    /// Mean local luma variance: Low < 15 ≤ Medium < 60 ≤ High.
    pub fn from_noise(variance: f32) -> Self {
        if variance < 15.0 {
            Self::Low
        } else if variance < 60.0 {
            Self::Medium
        } else {
            Self::High
        }
    }

    /// Specular pixel ratio: Low < 0.02 ≤ Medium < 0.08 ≤ High.
    pub fn from_specular_ratio(ratio: f32) -> Self {
        if ratio < 0.02 {
            Self::Low
        } else if ratio < 0.08 {
            Self::Medium
        } else {
            Self::High
        }
    }
}

/// Overall colour cast of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorCast {
    Neutral,
    Warm,
    Cool,
}

impl ColorCast {
    /// Warm when mean red exceeds mean blue by more than 10, cool when blue
    /// exceeds red by more than 10.
    pub fn from_means(mean_rgb: [f32; 3]) -> Self {
        let warmth = mean_rgb[0] - mean_rgb[2];
        if warmth > 10.0 {
            Self::Warm
        } else if warmth < -10.0 {
            Self::Cool
        } else {
            Self::Neutral
        }
    }
}

/// Options a profile overrides. `None` leaves the caller's value alone.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ProfileOptimizations {
    pub whitening_strength: Option<f32>,
    pub contrast_strength: Option<f32>,
    pub noise_reduction_strength: Option<f32>,
    pub specular_level: Option<f32>,
    pub color_correction: Option<bool>,
}

impl ProfileOptimizations {
    /// Overlay these overrides on `base`. Every overridden strength also
    /// switches its stage on.
    pub fn apply_to(&self, base: EnhancementOptions) -> EnhancementOptions {
        let mut options = base;
        if let Some(strength) = self.whitening_strength {
            options.whitening = true;
            options.whitening_strength = strength;
        }
        if let Some(strength) = self.contrast_strength {
            options.contrast = true;
            options.contrast_strength = strength;
        }
        if let Some(strength) = self.noise_reduction_strength {
            options.noise_reduction = true;
            options.noise_reduction_strength = strength;
        }
        if let Some(level) = self.specular_level {
            options.specular_control = true;
            options.specular_level = level;
        }
        if let Some(enabled) = self.color_correction {
            options.color_correction = enabled;
        }
        options
    }
}

/// A capture setup with its typical image characteristics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraProfile {
    pub id: &'static str,
    pub name: &'static str,
    pub noise_pattern: Level,
    pub color_profile: ColorCast,
    pub specular_tendency: Level,
    pub optimizations: ProfileOptimizations,
}

impl CameraProfile {
    pub fn profile_id(&self) -> ProfileId {
        ProfileId::from(self.id)
    }
}

pub static CAMERA_PROFILES: [CameraProfile; 5] = [
    CameraProfile {
        id: "dslr-ring-flash",
        name: "DSLR with ring flash",
        noise_pattern: Level::Low,
        color_profile: ColorCast::Neutral,
        specular_tendency: Level::High,
        optimizations: ProfileOptimizations {
            whitening_strength: None,
            contrast_strength: None,
            noise_reduction_strength: Some(20.0),
            specular_level: Some(40.0),
            color_correction: None,
        },
    },
    CameraProfile {
        id: "dslr-twin-flash",
        name: "DSLR with twin flash",
        noise_pattern: Level::Low,
        color_profile: ColorCast::Warm,
        specular_tendency: Level::Medium,
        optimizations: ProfileOptimizations {
            whitening_strength: None,
            contrast_strength: None,
            noise_reduction_strength: None,
            specular_level: Some(20.0),
            color_correction: Some(true),
        },
    },
    CameraProfile {
        id: "intraoral-camera",
        name: "Intraoral camera (LED)",
        noise_pattern: Level::High,
        color_profile: ColorCast::Cool,
        specular_tendency: Level::Medium,
        optimizations: ProfileOptimizations {
            whitening_strength: None,
            contrast_strength: Some(30.0),
            noise_reduction_strength: Some(70.0),
            specular_level: None,
            color_correction: Some(true),
        },
    },
    CameraProfile {
        id: "smartphone",
        name: "Smartphone, ambient light",
        noise_pattern: Level::Medium,
        color_profile: ColorCast::Warm,
        specular_tendency: Level::Low,
        optimizations: ProfileOptimizations {
            whitening_strength: None,
            contrast_strength: Some(20.0),
            noise_reduction_strength: Some(45.0),
            specular_level: None,
            color_correction: Some(true),
        },
    },
    CameraProfile {
        id: "smartphone-flash",
        name: "Smartphone with flash",
        noise_pattern: Level::Medium,
        color_profile: ColorCast::Neutral,
        specular_tendency: Level::High,
        optimizations: ProfileOptimizations {
            whitening_strength: None,
            contrast_strength: None,
            noise_reduction_strength: Some(40.0),
            specular_level: Some(50.0),
            color_correction: None,
        },
    },
];

/// Every profile, in catalog (tie-break) order.
pub fn list_profiles() -> &'static [CameraProfile] {
    &CAMERA_PROFILES
}

pub fn find_profile(id: &str) -> Result<&'static CameraProfile> {
    CAMERA_PROFILES
        .iter()
        .find(|profile| profile.id == id)
        .ok_or_else(|| DentaviewError::UnknownProfile(id.to_owned()))
}

// -- Statistics ---------------------------------------------------------------

/// The three scalars the matcher scores against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ImageStatistics {
    /// Mean luma variance over 5x5 windows sampled on a 20 px grid.
    pub noise: f32,
    pub mean_rgb: [f32; 3],
    /// Fraction of all pixels that are bright (> 200) and near-neutral
    /// (channel range < 20).
    pub specular_ratio: f32,
}

impl ImageStatistics {
    pub fn noise_level(&self) -> Level {
        Level::from_noise(self.noise)
    }

    pub fn color_cast(&self) -> ColorCast {
        ColorCast::from_means(self.mean_rgb)
    }

    pub fn specular_level(&self) -> Level {
        Level::from_specular_ratio(self.specular_ratio)
    }
}

#[instrument(skip(img), fields(width = img.width(), height = img.height()))]
pub fn image_statistics(img: &ImageBuffer) -> ImageStatistics {
    let noise = local_noise(img);

    let mut sums = [0u64; 3];
    let mut specular = 0usize;
    for px in img.data().chunks_exact(ImageBuffer::CHANNELS) {
        let (r, g, b) = (px[0], px[1], px[2]);
        sums[0] += r as u64;
        sums[1] += g as u64;
        sums[2] += b as u64;
        if brightness(r, g, b) > 200.0 && channel_range(r, g, b) < 20 {
            specular += 1;
        }
    }

    let n = img.pixel_count() as f64;
    let stats = ImageStatistics {
        noise,
        mean_rgb: sums.map(|s| (s as f64 / n) as f32),
        specular_ratio: (specular as f64 / n) as f32,
    };
    debug!(?stats, "Image statistics computed");
    stats
}

fn local_noise(img: &ImageBuffer) -> f32 {
    let r = NOISE_WINDOW_RADIUS;
    let (w, h) = (img.width(), img.height());
    if w < 2 * r + 1 || h < 2 * r + 1 {
        return 0.0;
    }

    let mut total = 0.0f64;
    let mut samples = 0usize;
    for cy in (r..h - r).step_by(NOISE_SAMPLE_STRIDE) {
        for cx in (r..w - r).step_by(NOISE_SAMPLE_STRIDE) {
            let mut sum = 0.0f64;
            let mut sum_sq = 0.0f64;
            for y in cy - r..=cy + r {
                for x in cx - r..=cx + r {
                    let [pr, pg, pb, _] = img.pixel(x, y);
                    let v = luma(pr, pg, pb) as f64;
                    sum += v;
                    sum_sq += v * v;
                }
            }
            let count = ((2 * r + 1) * (2 * r + 1)) as f64;
            let mean = sum / count;
            total += (sum_sq / count - mean * mean).max(0.0);
            samples += 1;
        }
    }

    if samples == 0 {
        0.0
    } else {
        (total / samples as f64) as f32
    }
}

// -- Scoring ------------------------------------------------------------------

/// A profile's averaged score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProfileScore {
    pub id: &'static str,
    pub score: f32,
}

/// Sub-scores are kept in tenths so ties compare exactly.
fn level_points(observed: Level, expected: Level) -> u32 {
    match (observed.rank() - expected.rank()).abs() {
        0 => 9,
        1 => 6,
        _ => 3,
    }
}

fn color_points(observed: ColorCast, expected: ColorCast) -> u32 {
    if observed == expected {
        9
    } else if observed == ColorCast::Neutral || expected == ColorCast::Neutral {
        6
    } else {
        3
    }
}

fn profile_points(stats: &ImageStatistics, profile: &CameraProfile) -> u32 {
    level_points(stats.noise_level(), profile.noise_pattern)
        + color_points(stats.color_cast(), profile.color_profile)
        + level_points(stats.specular_level(), profile.specular_tendency)
}

/// Average of the three sub-scores for every profile, in catalog order.
pub fn score_profiles(stats: &ImageStatistics) -> Vec<ProfileScore> {
    CAMERA_PROFILES
        .iter()
        .map(|profile| ProfileScore {
            id: profile.id,
            score: profile_points(stats, profile) as f32 / 30.0,
        })
        .collect()
}

/// Highest-scoring profile; ties go to the earlier catalog entry.
#[instrument(skip(img), fields(width = img.width(), height = img.height()))]
pub fn detect_profile(img: &ImageBuffer) -> &'static CameraProfile {
    let stats = image_statistics(img);
    let mut best = &CAMERA_PROFILES[0];
    let mut best_points = profile_points(&stats, best);
    for profile in &CAMERA_PROFILES[1..] {
        let points = profile_points(&stats, profile);
        debug!(profile = profile.id, points, "Profile scored");
        if points > best_points {
            best = profile;
            best_points = points;
        }
    }
    info!(
        profile = best.id,
        score = best_points as f32 / 30.0,
        "Camera profile matched"
    );
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkerboard(size: u32, a: [u8; 4], b: [u8; 4]) -> ImageBuffer {
        let mut img = ImageBuffer::from_pixel(size, size, a).expect("valid");
        for y in 0..size {
            for x in 0..size {
                if (x + y) % 2 == 1 {
                    img.set_pixel(x, y, b);
                }
            }
        }
        img
    }

    #[test]
    fn bright_neutral_flat_image_is_ring_flash() {
        let img = ImageBuffer::from_pixel(60, 60, [250, 250, 250, 255]).expect("valid");
        let stats = image_statistics(&img);
        assert_eq!(stats.noise_level(), Level::Low);
        assert_eq!(stats.specular_level(), Level::High);
        assert_eq!(detect_profile(&img).id, "dslr-ring-flash");
    }

    #[test]
    fn noisy_cool_image_is_intraoral() {
        let img = checkerboard(60, [90, 110, 150, 255], [130, 150, 190, 255]);
        let stats = image_statistics(&img);
        assert_eq!(stats.noise_level(), Level::High);
        assert_eq!(stats.color_cast(), ColorCast::Cool);
        assert_eq!(detect_profile(&img).id, "intraoral-camera");
    }

    #[test]
    fn mildly_noisy_warm_image_is_smartphone() {
        let img = checkerboard(60, [200, 150, 120, 255], [210, 160, 130, 255]);
        let stats = image_statistics(&img);
        assert_eq!(stats.noise_level(), Level::Medium);
        assert_eq!(stats.color_cast(), ColorCast::Warm);
        assert_eq!(stats.specular_level(), Level::Low);
        assert_eq!(detect_profile(&img).id, "smartphone");
    }

    #[test]
    fn ties_resolve_to_catalog_order() {
        // Flat mid-grey: ring flash, twin flash and smartphone all score 0.7.
        let img = ImageBuffer::from_pixel(40, 40, [128, 128, 128, 255]).expect("valid");
        let scores = score_profiles(&image_statistics(&img));
        assert_eq!(scores[0].score, scores[1].score);
        assert_eq!(scores[0].score, scores[3].score);
        assert_eq!(detect_profile(&img).id, "dslr-ring-flash");
    }

    #[test]
    fn scores_stay_in_heuristic_range() {
        let img = checkerboard(45, [10, 200, 30, 255], [240, 20, 200, 255]);
        for score in score_profiles(&image_statistics(&img)) {
            assert!((0.3..=0.9).contains(&score.score), "{score:?}");
        }
    }

    #[test]
    fn tiny_image_has_zero_noise() {
        let img = ImageBuffer::from_pixel(3, 3, [1, 2, 3, 255]).expect("valid");
        assert_eq!(image_statistics(&img).noise, 0.0);
    }

    #[test]
    fn optimizations_override_and_enable() {
        let profile = find_profile("intraoral-camera").expect("profile");
        let options = profile.optimizations.apply_to(EnhancementOptions::none());
        assert!(options.noise_reduction);
        assert_eq!(options.noise_reduction_strength, 70.0);
        assert!(options.contrast);
        assert!(options.color_correction);
        assert!(!options.whitening);
        assert!(!options.specular_control);
    }

    #[test]
    fn unknown_profile_is_an_error() {
        assert!(matches!(
            find_profile("pinhole"),
            Err(DentaviewError::UnknownProfile(_))
        ));
    }
}

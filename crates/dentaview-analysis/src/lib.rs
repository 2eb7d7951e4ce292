// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Dentaview analysis: region detection, VITA shade classification, the
// enhancement pipeline, camera profile matching and the preset catalog.

pub mod camera;
pub mod color;
pub mod detect;
pub mod enhance;
pub mod photo;
pub mod presets;
pub mod shade;

pub use camera::{CameraProfile, ImageStatistics, detect_profile, find_profile, list_profiles};
pub use detect::detect_features;
pub use enhance::Enhancer;
pub use presets::{Preset, PresetCategory, find_preset, list_presets, presets_in};
pub use shade::{VitaShade, analyze_shade, find_closest_shade, find_shade};

use dentaview_core::error::Result;
use dentaview_core::{DetectionResult, EngineConfig, EnhancementOptions, ImageBuffer, ProfileId};
use tracing::{info, instrument};

/// Run the enhancement pipeline over a copy of `img`.
///
/// `detection` steers region-dependent stages; without it adaptive contrast
/// falls back to the estimated gum band.
#[instrument(skip(img, detection, options), fields(width = img.width(), height = img.height()))]
pub fn enhance(
    img: &ImageBuffer,
    detection: Option<&DetectionResult>,
    options: &EnhancementOptions,
) -> ImageBuffer {
    Enhancer::new(img.clone(), detection)
        .apply(options)
        .into_image()
}

/// Id of the best-matching camera profile.
pub fn match_camera_profile(img: &ImageBuffer) -> ProfileId {
    detect_profile(img).profile_id()
}

/// What [`auto_enhance`] decided and produced.
#[derive(Debug, Clone)]
pub struct AutoEnhanceOutcome {
    pub image: ImageBuffer,
    pub preset: &'static str,
    /// Matched profile, when profile matching was enabled.
    pub profile: Option<ProfileId>,
    pub options: EnhancementOptions,
    pub detection: Option<DetectionResult>,
}

/// One-shot enhancement driven by the engine configuration: expand the
/// default preset, overlay the matched camera profile's optimizations,
/// detect features, then enhance.
#[instrument(skip(img, config), fields(width = img.width(), height = img.height()))]
pub fn auto_enhance(img: &ImageBuffer, config: &EngineConfig) -> Result<AutoEnhanceOutcome> {
    let preset = find_preset(&config.default_preset)?;
    let mut options = preset.settings;

    let profile = if config.auto_camera_profile {
        let matched = detect_profile(img);
        options = matched.optimizations.apply_to(options);
        Some(matched.profile_id())
    } else {
        None
    };

    let detection = config.detect_before_enhance.then(|| detect_features(img));
    let image = enhance(img, detection.as_ref(), &options);

    info!(
        preset = preset.id,
        profile = profile.as_ref().map(ProfileId::as_str),
        detected = detection.is_some(),
        "Auto-enhance complete"
    );

    Ok(AutoEnhanceOutcome {
        image,
        preset: preset.id,
        profile,
        options,
        detection,
    })
}

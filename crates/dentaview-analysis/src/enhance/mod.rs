// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Enhancement pipeline: whitening, adaptive contrast, bilateral noise
// reduction, specular control and gray-world colour correction, applied in
// that fixed order.

pub mod regions;
pub mod stages;

use dentaview_core::{DetectionResult, EnhancementOptions, ImageBuffer};
use tracing::{info, instrument};

use regions::contrast_regions;

/// Enhancement pipeline over a working copy of one image.
///
/// Each stage consumes `self` and returns the updated pipeline, so stages
/// can be chained individually; [`Enhancer::apply`] runs the enabled stages
/// of an options record in the canonical order. Later stages see earlier
/// stages' output.
///
/// ```ignore
/// let out = Enhancer::new(image, Some(&detection))
///     .whiten(30.0)
///     .adaptive_contrast(25.0)
///     .into_image();
/// ```
pub struct Enhancer<'a> {
    /// The working image.
    image: ImageBuffer,
    /// Findings that steer region-dependent stages.
    detection: Option<&'a DetectionResult>,
}

impl<'a> Enhancer<'a> {
    // -- Construction ---------------------------------------------------------

    pub fn new(image: ImageBuffer, detection: Option<&'a DetectionResult>) -> Self {
        Self { image, detection }
    }

    // -- Accessors ------------------------------------------------------------

    /// Consume the pipeline and return the working image.
    pub fn into_image(self) -> ImageBuffer {
        self.image
    }

    // -- Stages ---------------------------------------------------------------

    #[instrument(skip(self), fields(width = self.image.width(), height = self.image.height()))]
    pub fn whiten(mut self, strength: f32) -> Self {
        info!(strength, "Whitening tooth pixels");
        stages::whiten(&mut self.image, strength);
        self
    }

    #[instrument(skip(self), fields(width = self.image.width(), height = self.image.height()))]
    pub fn adaptive_contrast(mut self, strength: f32) -> Self {
        let regions = contrast_regions(self.detection, self.image.width(), self.image.height());
        info!(strength, regions = regions.len(), "Applying adaptive contrast");
        stages::adaptive_contrast(&mut self.image, strength, &regions);
        self
    }

    #[instrument(skip(self), fields(width = self.image.width(), height = self.image.height()))]
    pub fn reduce_noise(mut self, strength: f32) -> Self {
        info!(strength, "Applying bilateral noise reduction");
        stages::reduce_noise(&mut self.image, strength);
        self
    }

    #[instrument(skip(self), fields(width = self.image.width(), height = self.image.height()))]
    pub fn control_specular(mut self, level: f32) -> Self {
        info!(level, "Controlling specular highlights");
        stages::control_specular(&mut self.image, level);
        self
    }

    #[instrument(skip(self), fields(width = self.image.width(), height = self.image.height()))]
    pub fn correct_color(mut self) -> Self {
        info!("Applying gray-world colour correction");
        stages::correct_color(&mut self.image);
        self
    }

    // -- Full pipeline --------------------------------------------------------

    /// Run every enabled stage of `options` in the canonical order:
    ///
    /// 1. Whitening
    /// 2. Adaptive contrast
    /// 3. Noise reduction
    /// 4. Specular control
    /// 5. Colour correction
    pub fn apply(self, options: &EnhancementOptions) -> Self {
        if options.is_noop() {
            info!("No enhancement stage enabled; image unchanged");
            return self;
        }

        let mut pipeline = self;
        if options.whitening {
            pipeline = pipeline.whiten(options.whitening_strength);
        }
        if options.contrast {
            pipeline = pipeline.adaptive_contrast(options.contrast_strength);
        }
        if options.noise_reduction {
            pipeline = pipeline.reduce_noise(options.noise_reduction_strength);
        }
        if options.specular_control {
            pipeline = pipeline.control_specular(options.specular_level);
        }
        if options.color_correction {
            pipeline = pipeline.correct_color();
        }
        pipeline
    }
}

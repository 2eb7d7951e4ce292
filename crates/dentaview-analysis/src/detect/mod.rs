// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Region detectors: tooth contours, gum line, smile zones, plaque and
// restorations. Each consumes an `ImageBuffer` and never fails for
// "nothing found".

pub mod gums;
pub mod surface;
pub mod teeth;
pub mod zones;

use dentaview_core::{DetectionResult, ImageBuffer};
use tracing::{info, instrument};

pub use gums::detect_gum_line;
pub use surface::{detect_plaque, detect_restorations};
pub use teeth::detect_teeth;
pub use zones::classify_smile_zones;

/// Run every detector and collect the findings.
#[instrument(skip(img), fields(width = img.width(), height = img.height()))]
pub fn detect_features(img: &ImageBuffer) -> DetectionResult {
    let teeth = detect_teeth(img);
    let gums = detect_gum_line(img);
    let smile_zones = classify_smile_zones(img);
    let plaque = detect_plaque(img);
    let restorations = detect_restorations(img);

    info!(
        teeth = teeth.count,
        gum_line = gums.line.is_some(),
        plaque = plaque.points.len(),
        restorations = restorations.points.len(),
        "Feature detection complete"
    );

    DetectionResult {
        teeth: Some(teeth),
        gums: Some(gums),
        smile_zones: Some(smile_zones),
        plaque: Some(plaque),
        restorations: Some(restorations),
        ..DetectionResult::empty()
    }
}

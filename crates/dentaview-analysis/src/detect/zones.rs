// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Smile zone partition: purely geometric, no pixels are read.

use dentaview_core::{ImageBuffer, PosteriorZones, Rect, SmileZones};
use tracing::instrument;

const ZONE_CONFIDENCE: f32 = 0.8;

/// Split the frame into thirds: the anterior zone is the centre cell, the
/// posterior zones are the left and right cells of the middle row.
#[instrument(skip(img), fields(width = img.width(), height = img.height()))]
pub fn classify_smile_zones(img: &ImageBuffer) -> SmileZones {
    let w = img.width() as f32;
    let h = img.height() as f32;
    let third_w = w / 3.0;
    let third_h = h / 3.0;

    SmileZones {
        anterior: Rect::new(third_w, third_h, third_w, third_h),
        posterior: PosteriorZones {
            left: Rect::new(0.0, third_h, third_w, third_h),
            right: Rect::new(2.0 * third_w, third_h, third_w, third_h),
        },
        confidence: ZONE_CONFIDENCE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thirds_partition() {
        let img = ImageBuffer::from_pixel(300, 150, [0, 0, 0, 255]).expect("valid");
        let zones = classify_smile_zones(&img);
        assert_eq!(zones.anterior, Rect::new(100.0, 50.0, 100.0, 50.0));
        assert_eq!(zones.posterior.left, Rect::new(0.0, 50.0, 100.0, 50.0));
        assert_eq!(zones.posterior.right, Rect::new(200.0, 50.0, 100.0, 50.0));
        assert_eq!(zones.confidence, 0.8);
    }
}

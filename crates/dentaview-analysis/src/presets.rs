// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Preset catalog: named enhancement option bundles grouped by category.

use std::fmt;
use std::str::FromStr;

use dentaview_core::error::Result;
use dentaview_core::{DentaviewError, EnhancementOptions};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetCategory {
    /// Faithful documentation for patient records.
    Clinical,
    /// Cosmetic before/after presentation.
    Aesthetic,
    /// Emphasises surface detail for examination.
    Diagnostic,
}

impl PresetCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Clinical => "clinical",
            Self::Aesthetic => "aesthetic",
            Self::Diagnostic => "diagnostic",
        }
    }
}

impl fmt::Display for PresetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PresetCategory {
    type Err = DentaviewError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "clinical" => Ok(Self::Clinical),
            "aesthetic" => Ok(Self::Aesthetic),
            "diagnostic" => Ok(Self::Diagnostic),
            other => Err(DentaviewError::Config(format!(
                "unknown preset category '{other}' (expected clinical, aesthetic or diagnostic)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Preset {
    pub id: &'static str,
    pub name: &'static str,
    pub category: PresetCategory,
    pub settings: EnhancementOptions,
}

pub static PRESETS: [Preset; 8] = [
    Preset {
        id: "smart-enhance",
        name: "Smart Enhance",
        category: PresetCategory::Aesthetic,
        settings: EnhancementOptions::smart_enhance(),
    },
    Preset {
        id: "cosmetic-whitening",
        name: "Cosmetic Whitening",
        category: PresetCategory::Aesthetic,
        settings: EnhancementOptions {
            whitening: true,
            whitening_strength: 70.0,
            contrast: true,
            contrast_strength: 30.0,
            specular_control: true,
            specular_level: 20.0,
            color_correction: true,
            ..EnhancementOptions::none()
        },
    },
    Preset {
        id: "natural-smile",
        name: "Natural Smile",
        category: PresetCategory::Aesthetic,
        settings: EnhancementOptions {
            whitening: true,
            whitening_strength: 15.0,
            noise_reduction: true,
            noise_reduction_strength: 25.0,
            color_correction: true,
            ..EnhancementOptions::none()
        },
    },
    Preset {
        id: "dental-mode",
        name: "Dental Mode",
        category: PresetCategory::Clinical,
        settings: EnhancementOptions::dental_mode(),
    },
    Preset {
        id: "clinical-documentation",
        name: "Clinical Documentation",
        category: PresetCategory::Clinical,
        settings: EnhancementOptions::clinical_mode(),
    },
    Preset {
        id: "color-accurate",
        name: "Colour Accurate",
        category: PresetCategory::Clinical,
        settings: EnhancementOptions {
            color_correction: true,
            ..EnhancementOptions::none()
        },
    },
    Preset {
        id: "plaque-visibility",
        name: "Plaque Visibility",
        category: PresetCategory::Diagnostic,
        settings: EnhancementOptions {
            contrast: true,
            contrast_strength: 60.0,
            specular_control: true,
            specular_level: 50.0,
            ..EnhancementOptions::none()
        },
    },
    Preset {
        id: "restoration-check",
        name: "Restoration Check",
        category: PresetCategory::Diagnostic,
        settings: EnhancementOptions {
            contrast: true,
            contrast_strength: 45.0,
            noise_reduction: true,
            noise_reduction_strength: 30.0,
            specular_control: true,
            specular_level: 70.0,
            color_correction: true,
            ..EnhancementOptions::none()
        },
    },
];

/// Every preset in catalog order.
pub fn list_presets() -> &'static [Preset] {
    &PRESETS
}

pub fn find_preset(id: &str) -> Result<&'static Preset> {
    PRESETS
        .iter()
        .find(|preset| preset.id == id)
        .ok_or_else(|| DentaviewError::UnknownPreset(id.to_owned()))
}

pub fn presets_in(category: PresetCategory) -> impl Iterator<Item = &'static Preset> {
    PRESETS.iter().filter(move |preset| preset.category == category)
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for front ends (chairside staff, not
// engineers).
//
// Every technical error is mapped to plain English with a clear suggestion.

use crate::error::DentaviewError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Disk hiccup or locked file; trying again may work.
    Transient,
    /// User must do something (pick another file, fix a setting).
    ActionRequired,
    /// Retrying the same input will fail the same way.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether retrying without changes can succeed.
    pub retriable: bool,
    /// Severity level (drives icon/colour in UI).
    pub severity: Severity,
}

/// Convert a `DentaviewError` into a `HumanError`.
pub fn humanize_error(err: &DentaviewError) -> HumanError {
    match err {
        DentaviewError::InvalidImage(detail) => HumanError {
            message: "This photo can't be analysed.".into(),
            suggestion: format!(
                "The image data looks damaged or empty. Try exporting the photo again. ({detail})"
            ),
            retriable: false,
            severity: Severity::Permanent,
        },

        DentaviewError::ImageError(detail) => HumanError {
            message: "We couldn't open or save this photo.".into(),
            suggestion: format!("Use a JPEG or PNG file and try again. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        DentaviewError::UnknownPreset(id) => HumanError {
            message: "That enhancement preset doesn't exist.".into(),
            suggestion: format!(
                "Choose one of the listed presets instead of \"{id}\"."
            ),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        DentaviewError::UnknownProfile(id) => HumanError {
            message: "That camera profile doesn't exist.".into(),
            suggestion: format!(
                "Pick a listed camera profile or let the camera be detected automatically (\"{id}\" is unknown)."
            ),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        DentaviewError::Config(detail) => HumanError {
            message: "The settings file has a mistake in it.".into(),
            suggestion: format!("Fix or delete the settings file, then try again. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        DentaviewError::Io(io_err) => humanize_io_error(io_err),

        DentaviewError::Serialization(detail) => HumanError {
            message: "Saved data couldn't be read.".into(),
            suggestion: format!("The file may be from a newer version. ({detail})"),
            retriable: false,
            severity: Severity::Permanent,
        },
    }
}

fn humanize_io_error(err: &std::io::Error) -> HumanError {
    use std::io::ErrorKind;

    match err.kind() {
        ErrorKind::NotFound => HumanError {
            message: "The file couldn't be found.".into(),
            suggestion: "Check the file name and folder, then try again.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },
        ErrorKind::PermissionDenied => HumanError {
            message: "We aren't allowed to use that file.".into(),
            suggestion: "Choose a folder you can write to, or ask your administrator for access."
                .into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },
        _ => HumanError {
            message: "Something went wrong reading or writing a file.".into(),
            suggestion: format!("Try again in a moment. ({err})"),
            retriable: true,
            severity: Severity::Transient,
        },
    }
}

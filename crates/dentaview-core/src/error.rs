// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Dentaview.

use thiserror::Error;

/// Top-level error type for all Dentaview operations.
///
/// "Nothing detected" is never an error: detectors report it as an empty
/// result with confidence 0.
#[derive(Debug, Error)]
pub enum DentaviewError {
    // -- Input errors --
    #[error("invalid image buffer: {0}")]
    InvalidImage(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    // -- Catalog lookups --
    #[error("unknown preset: {0}")]
    UnknownPreset(String),

    #[error("unknown camera profile: {0}")]
    UnknownProfile(String),

    // -- Configuration / persistence --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DentaviewError>;

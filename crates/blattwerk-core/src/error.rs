// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Blattwerk.

use thiserror::Error;

/// Top-level error type for all Blattwerk operations.
#[derive(Debug, Error)]
pub enum BlattwerkError {
    // -- Layout engine errors --
    #[error("layout engine failed: {0}")]
    Engine(String),

    // -- Image errors --
    #[error("image processing failed: {0}")]
    Image(String),

    // -- Page description errors --
    #[error("page document error: {0}")]
    PageModel(String),

    // -- Workspace / workflow errors --
    #[error("workspace error: {0}")]
    Workspace(String),

    #[error("invalid parameter: {0}")]
    Parameter(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BlattwerkError>;

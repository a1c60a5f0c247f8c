// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Blattwerk preprocessing toolkit.

use serde::{Deserialize, Serialize};

/// MIME type of page description documents (PAGE XML).
pub const MIMETYPE_PAGE: &str = "application/vnd.prima.page+xml";

/// A clockwise rotation by a multiple of 90 degrees.
///
/// Orientation detection reports corrections as cardinal rotations; the
/// residual skew within (-45, 45] degrees is handled separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardinalRotation {
    None,
    Clockwise90,
    Clockwise180,
    Clockwise270,
}

impl CardinalRotation {
    /// Rotation amount in degrees clockwise (0, 90, 180 or 270).
    pub fn degrees(&self) -> u32 {
        match self {
            Self::None => 0,
            Self::Clockwise90 => 90,
            Self::Clockwise180 => 180,
            Self::Clockwise270 => 270,
        }
    }

    /// Parse a rotation from degrees. Accepts any multiple of 90.
    pub fn from_degrees(degrees: u32) -> Option<Self> {
        match degrees % 360 {
            0 => Some(Self::None),
            90 => Some(Self::Clockwise90),
            180 => Some(Self::Clockwise180),
            270 => Some(Self::Clockwise270),
            _ => None,
        }
    }
}

/// Reading direction of text within a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReadingDirection {
    LeftToRight,
    RightToLeft,
    TopToBottom,
    BottomToTop,
}

impl ReadingDirection {
    /// PAGE `readingDirection` vocabulary keyword.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::LeftToRight => "left-to-right",
            Self::RightToLeft => "right-to-left",
            Self::TopToBottom => "top-to-bottom",
            Self::BottomToTop => "bottom-to-top",
        }
    }
}

/// Order in which the text lines of a segment follow each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextLineOrder {
    TopToBottom,
    BottomToTop,
    LeftToRight,
    RightToLeft,
}

impl TextLineOrder {
    /// PAGE `textLineOrder` vocabulary keyword.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::TopToBottom => "top-to-bottom",
            Self::BottomToTop => "bottom-to-top",
            Self::LeftToRight => "left-to-right",
            Self::RightToLeft => "right-to-left",
        }
    }
}

/// Supported input image formats for workspace files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageKind {
    Png,
    Jpeg,
    Tiff,
}

impl ImageKind {
    /// MIME type string recorded in the workspace manifest.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Tiff => "image/tiff",
        }
    }

    /// Infer the image kind from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "tif" | "tiff" => Some(Self::Tiff),
            _ => None,
        }
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pixel geometry shared by the page model, the layout engine adapter and the
// processors. Coordinates are page-global unless a frame offset says otherwise.

/// A pixel position in page coordinates. The origin is the top-left corner of
/// the page image; y grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in pixel coordinates.
///
/// `left`/`top` are inclusive, `right`/`bottom` exclusive, so `width` and
/// `height` are plain differences. A box with non-positive extent on either
/// axis is degenerate and carries no area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl BoundingBox {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// A box is degenerate when it spans no pixels on at least one axis.
    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Smallest box containing both `self` and `other`.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Shift the box by the given offsets.
    pub fn translate(&self, dx: i32, dy: i32) -> BoundingBox {
        BoundingBox {
            left: self.left + dx,
            top: self.top + dy,
            right: self.right + dx,
            bottom: self.bottom + dy,
        }
    }

    /// Grow the box by `padding` pixels on every side, then clamp it to an
    /// image of `max_width` x `max_height` pixels.
    pub fn pad_clamped(&self, padding: i32, max_width: u32, max_height: u32) -> BoundingBox {
        BoundingBox {
            left: (self.left - padding).max(0),
            top: (self.top - padding).max(0),
            right: (self.right + padding).min(max_width as i32),
            bottom: (self.bottom + padding).min(max_height as i32),
        }
    }

    /// Clamp the box to an image of `max_width` x `max_height` pixels.
    pub fn clamped(&self, max_width: u32, max_height: u32) -> BoundingBox {
        BoundingBox {
            left: self.left.clamp(0, max_width as i32),
            top: self.top.clamp(0, max_height as i32),
            right: self.right.clamp(0, max_width as i32),
            bottom: self.bottom.clamp(0, max_height as i32),
        }
    }

    /// The four corners as a polygon: top-left, top-right, bottom-right,
    /// bottom-left.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.left, self.top),
            Point::new(self.right, self.top),
            Point::new(self.right, self.bottom),
            Point::new(self.left, self.bottom),
        ]
    }
}

// -- Angles and resolution ----------------------------------------------------

/// Map an angle in degrees to the interval `(-180, 180]`.
///
/// Segment orientations are stored clockwise-positive in this interval, so a
/// 270 degree correction becomes -90.
pub fn normalize_degrees(angle: f32) -> f32 {
    180.0 - (180.0 - angle).rem_euclid(360.0)
}

/// Scale factor relating pixel-size heuristics to the image resolution.
///
/// Thresholds in this codebase are calibrated for 300 DPI; dividing them by
/// the zoom adapts them to the actual resolution. Unknown or zero DPI maps to
/// a neutral 1.0.
pub fn detection_zoom(dpi: Option<u32>) -> f32 {
    match dpi {
        Some(dpi) if dpi > 0 => 300.0 / dpi as f32,
        _ => 1.0,
    }
}

// -- Tests --------------------------------------------------------------------

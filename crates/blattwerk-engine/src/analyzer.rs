// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The layout analysis seam. Processors depend on this trait; the concrete
// engine behind it stays swappable (and stubbable in tests).

use blattwerk_core::error::Result;
use blattwerk_core::geometry::{BoundingBox, Point};
use blattwerk_core::types::{CardinalRotation, ReadingDirection, TextLineOrder};
use image::DynamicImage;

/// A detected text element as a quadrilateral in image coordinates.
///
/// Corner order follows the engine: the first two corners span one long edge
/// of the text. Coordinates may be fractional; conversions to the page model
/// round conservatively outwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextQuad {
    pub corners: [(f32, f32); 4],
}

impl TextQuad {
    pub fn from_corners(corners: [(f32, f32); 4]) -> Self {
        Self { corners }
    }

    /// Build an axis-aligned quad from a bounding box.
    pub fn from_bbox(bbox: &BoundingBox) -> Self {
        let c = bbox.corners();
        Self {
            corners: [
                (c[0].x as f32, c[0].y as f32),
                (c[1].x as f32, c[1].y as f32),
                (c[2].x as f32, c[2].y as f32),
                (c[3].x as f32, c[3].y as f32),
            ],
        }
    }

    /// Axis-aligned bounding box, rounded outwards to whole pixels.
    pub fn bounding_box(&self) -> BoundingBox {
        let xs = self.corners.map(|c| c.0);
        let ys = self.corners.map(|c| c.1);
        let left = xs.iter().copied().fold(f32::INFINITY, f32::min);
        let right = xs.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let top = ys.iter().copied().fold(f32::INFINITY, f32::min);
        let bottom = ys.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        BoundingBox::new(
            left.floor() as i32,
            top.floor() as i32,
            right.ceil() as i32,
            bottom.ceil() as i32,
        )
    }

    /// Corner polygon rounded to whole pixels.
    pub fn polygon(&self) -> Vec<Point> {
        self.corners
            .iter()
            .map(|c| Point::new(c.0.round() as i32, c.1.round() as i32))
            .collect()
    }

    /// Centroid of the four corners.
    pub fn center(&self) -> (f32, f32) {
        let (sx, sy) = self
            .corners
            .iter()
            .fold((0.0, 0.0), |(sx, sy), c| (sx + c.0, sy + c.1));
        (sx / 4.0, sy / 4.0)
    }

    /// Area via the shoelace formula.
    pub fn area(&self) -> f32 {
        let n = self.corners.len();
        let mut area = 0.0f32;
        for i in 0..n {
            let j = (i + 1) % n;
            area += self.corners[i].0 * self.corners[j].1;
            area -= self.corners[j].0 * self.corners[i].1;
        }
        area.abs() / 2.0
    }

    /// Angle of the longer quad edge against the x axis, in image coordinates
    /// (y down), folded into (-45, 45] degrees.
    ///
    /// Cardinal orientation is detected separately, so only the residual skew
    /// within a quarter turn is of interest here.
    pub fn edge_angle_degrees(&self) -> f32 {
        let [a, b, c, _] = self.corners;
        let e1 = (b.0 - a.0, b.1 - a.1);
        let e2 = (c.0 - b.0, c.1 - b.1);
        let (dx, dy) = if e1.0 * e1.0 + e1.1 * e1.1 >= e2.0 * e2.0 + e2.1 * e2.1 {
            e1
        } else {
            e2
        };
        let mut angle = dy.atan2(dx).to_degrees();
        // Fold the edge direction ambiguity away.
        if angle > 90.0 {
            angle -= 180.0;
        } else if angle <= -90.0 {
            angle += 180.0;
        }
        if angle > 45.0 {
            angle -= 90.0;
        } else if angle <= -45.0 {
            angle += 90.0;
        }
        angle
    }
}

/// Result of orientation detection on a segment image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientationDetection {
    /// Clockwise rotation that corrects the segment.
    pub rotation: CardinalRotation,
    /// Score ratio between the winning rotation and the runner-up. Values
    /// near 1.0 mean the detection is ambiguous; callers gate on this.
    pub confidence: f32,
}

/// Result of layout analysis on a (cardinally corrected) segment image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutAnalysis {
    /// Clockwise correction angle for the residual skew, within (-45, 45].
    pub skew_degrees: f32,
    pub reading_direction: ReadingDirection,
    pub line_order: TextLineOrder,
}

/// Layout analysis operations the processors need.
///
/// All geometric analysis is delegated through this trait: implementations
/// wrap an external engine and translate its output, they do not analyse
/// pixels themselves.
pub trait LayoutAnalyzer {
    /// Detect text blocks for page cropping.
    fn detect_blocks(&self, image: &DynamicImage) -> Result<Vec<TextQuad>>;

    /// Detect text lines in reading order, one quad per line.
    fn detect_lines(&self, image: &DynamicImage) -> Result<Vec<TextQuad>>;

    /// Detect which cardinal rotation makes the text upright. `None` when the
    /// engine finds no text in any rotation.
    fn detect_orientation(&self, image: &DynamicImage) -> Result<Option<OrientationDetection>>;

    /// Measure residual skew and text directions. `None` when the engine
    /// finds no text.
    fn analyze_layout(&self, image: &DynamicImage) -> Result<Option<LayoutAnalysis>>;
}

// -- Tests --------------------------------------------------------------------

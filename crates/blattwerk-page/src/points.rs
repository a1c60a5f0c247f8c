// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PAGE `points` attribute codec. Polygons are stored as a space-separated
// list of comma-separated pixel pairs: "x1,y1 x2,y2 ...".

use blattwerk_core::error::{BlattwerkError, Result};
use blattwerk_core::geometry::{BoundingBox, Point};

/// Format a polygon as a PAGE points string.
pub fn format_points(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse a PAGE points string into a polygon.
///
/// Fails on empty input, missing commas and non-integer coordinates.
pub fn parse_points(s: &str) -> Result<Vec<Point>> {
    let mut points = Vec::new();
    for pair in s.split_whitespace() {
        let (x, y) = pair.split_once(',').ok_or_else(|| {
            BlattwerkError::PageModel(format!("malformed coordinate pair '{}' in points", pair))
        })?;
        let x = x.trim().parse::<i32>().map_err(|err| {
            BlattwerkError::PageModel(format!("invalid x coordinate '{}': {}", x, err))
        })?;
        let y = y.trim().parse::<i32>().map_err(|err| {
            BlattwerkError::PageModel(format!("invalid y coordinate '{}': {}", y, err))
        })?;
        points.push(Point::new(x, y));
    }
    if points.is_empty() {
        return Err(BlattwerkError::PageModel(
            "points string contains no coordinates".into(),
        ));
    }
    Ok(points)
}

/// Render a bounding box as the four-corner polygon string used for Border
/// and Coords elements.
pub fn points_from_bbox(bbox: &BoundingBox) -> String {
    format_points(&bbox.corners())
}

/// Axis-aligned bounding box of the polygon in a points string.
pub fn bbox_from_points(s: &str) -> Result<BoundingBox> {
    let points = parse_points(s)?;
    let mut bbox = BoundingBox::new(points[0].x, points[0].y, points[0].x, points[0].y);
    for p in &points[1..] {
        bbox.left = bbox.left.min(p.x);
        bbox.top = bbox.top.min(p.y);
        bbox.right = bbox.right.max(p.x);
        bbox.bottom = bbox.bottom.max(p.y);
    }
    Ok(bbox)
}

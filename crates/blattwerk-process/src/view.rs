// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Viewports over page images. Coordinates in a page document are always
// page-global, while each processor works on a pixel window (the cropped
// page, a single region). A Frame records where that window sits on the page
// and which provenance tags already apply, so detected geometry can be
// translated back and derived images inherit their history.

use blattwerk_core::error::Result;
use blattwerk_core::geometry::{BoundingBox, Point};
use blattwerk_page::PcGts;
use blattwerk_workspace::Workspace;
use image::DynamicImage;
use tracing::{debug, warn};

use crate::raster;

/// Placement of an image window within the page coordinate system.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Page coordinates of the window's top-left pixel.
    pub origin: Point,
    /// Provenance tags of the image behind the window.
    pub comments: Vec<String>,
}

/// The working image of a page and its frame.
///
/// Prefers the most recently derived image, which reflects all prior
/// processing. Without one, the original image is used, cropped to the
/// Border when the page has one.
pub fn page_view(workspace: &Workspace, doc: &PcGts) -> Result<(DynamicImage, Frame)> {
    if let Some(alt) = doc.page.latest_alternative_image() {
        let image = workspace.load_image_path(&alt.filename)?;
        let comments: Vec<String> = alt.features().map(str::to_string).collect();
        let origin = if comments.iter().any(|tag| tag == "cropped") {
            match doc.page.border_bbox()? {
                Some(border) => {
                    let clamped = border.clamped(doc.page.image_width, doc.page.image_height);
                    Point::new(clamped.left, clamped.top)
                }
                None => Point::ZERO,
            }
        } else {
            Point::ZERO
        };
        debug!(filename = alt.filename, x = origin.x, y = origin.y, "Using derived page image");
        return Ok((image, Frame { origin, comments }));
    }

    let image = workspace.load_page_image(doc)?;
    match doc.page.border_bbox()? {
        Some(border) => {
            let clamped = border.clamped(image.width(), image.height());
            if clamped.is_degenerate() {
                warn!(?border, "Border spans no pixels, using the full page");
                return Ok((
                    image,
                    Frame {
                        origin: Point::ZERO,
                        comments: Vec::new(),
                    },
                ));
            }
            let cropped = raster::crop_bbox(&image, &clamped);
            debug!(
                left = clamped.left,
                top = clamped.top,
                width = clamped.width(),
                height = clamped.height(),
                "Cropped page image to border"
            );
            Ok((
                cropped,
                Frame {
                    origin: Point::new(clamped.left, clamped.top),
                    comments: vec!["cropped".to_string()],
                },
            ))
        }
        None => Ok((
            image,
            Frame {
                origin: Point::ZERO,
                comments: Vec::new(),
            },
        )),
    }
}

/// Cut a region's window out of the page view.
///
/// `bbox` is the region outline in page coordinates. A region window is a
/// crop by definition, so the returned frame always carries the `cropped`
/// tag. Returns `None` when the region lies outside the page window, which
/// callers skip with a warning.
pub fn region_view(
    page_image: &DynamicImage,
    frame: &Frame,
    bbox: &BoundingBox,
) -> Option<(DynamicImage, Frame)> {
    let local = bbox
        .translate(-frame.origin.x, -frame.origin.y)
        .clamped(page_image.width(), page_image.height());
    if local.is_degenerate() {
        return None;
    }

    let image = raster::crop_bbox(page_image, &local);
    let origin = Point::new(frame.origin.x + local.left, frame.origin.y + local.top);
    let mut comments = frame.comments.clone();
    if !comments.iter().any(|tag| tag == "cropped") {
        comments.push("cropped".to_string());
    }
    Some((image, Frame { origin, comments }))
}

// -- Tests --------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::fixture_workspace;

    #[test]
    fn page_view_of_plain_page_is_full_image() {
        let (_dir, ws, entry) = fixture_workspace();
        let doc = ws.read_page(&entry).unwrap();

        let (image, frame) = page_view(&ws, &doc).unwrap();
        assert_eq!((image.width(), image.height()), (200, 300));
        assert_eq!(frame.origin, Point::ZERO);
        assert!(frame.comments.is_empty());
    }

    #[test]
    fn page_view_crops_to_border() {
        let (_dir, ws, entry) = fixture_workspace();
        let mut doc = ws.read_page(&entry).unwrap();
        doc.page.set_border_bbox(&BoundingBox::new(20, 30, 120, 180));

        let (image, frame) = page_view(&ws, &doc).unwrap();
        assert_eq!((image.width(), image.height()), (100, 150));
        assert_eq!(frame.origin, Point::new(20, 30));
        assert_eq!(frame.comments, vec!["cropped".to_string()]);
    }

    #[test]
    fn page_view_prefers_derived_image() {
        let (_dir, mut ws, entry) = fixture_workspace();
        let mut doc = ws.read_page(&entry).unwrap();
        doc.page.set_border_bbox(&BoundingBox::new(20, 30, 120, 180));

        let derived = DynamicImage::new_rgb8(100, 150);
        let relative = ws
            .save_derived_image(&derived, "IMG-CROP_0001", "IMG-CROP", Some("P_0001"), Some(300))
            .unwrap();
        doc.page
            .add_alternative_image(relative, Some("cropped".to_string()));

        let (image, frame) = page_view(&ws, &doc).unwrap();
        assert_eq!((image.width(), image.height()), (100, 150));
        assert_eq!(frame.origin, Point::new(20, 30));
        assert_eq!(frame.comments, vec!["cropped".to_string()]);
    }

    #[test]
    fn page_view_ignores_degenerate_border() {
        let (_dir, ws, entry) = fixture_workspace();
        let mut doc = ws.read_page(&entry).unwrap();
        doc.page.set_border_bbox(&BoundingBox::new(50, 50, 50, 80));

        let (image, frame) = page_view(&ws, &doc).unwrap();
        assert_eq!((image.width(), image.height()), (200, 300));
        assert_eq!(frame.origin, Point::ZERO);
    }

    #[test]
    fn region_view_translates_into_frame() {
        let (_dir, ws, entry) = fixture_workspace();
        let doc = ws.read_page(&entry).unwrap();
        let (image, _) = page_view(&ws, &doc).unwrap();
        let frame = Frame {
            origin: Point::new(10, 20),
            comments: vec!["cropped".to_string()],
        };

        let bbox = BoundingBox::new(30, 50, 80, 100);
        let (region_image, region_frame) = region_view(&image, &frame, &bbox).unwrap();
        assert_eq!((region_image.width(), region_image.height()), (50, 50));
        assert_eq!(region_frame.origin, Point::new(30, 50));
        // Already tagged cropped; no duplicate.
        assert_eq!(region_frame.comments, vec!["cropped".to_string()]);
    }

    #[test]
    fn region_view_tags_the_crop() {
        let (_dir, ws, entry) = fixture_workspace();
        let doc = ws.read_page(&entry).unwrap();
        let (image, frame) = page_view(&ws, &doc).unwrap();
        assert!(frame.comments.is_empty());

        let (_, region_frame) =
            region_view(&image, &frame, &BoundingBox::new(10, 10, 50, 50)).unwrap();
        assert_eq!(region_frame.comments, vec!["cropped".to_string()]);
    }

    #[test]
    fn region_view_outside_frame_is_none() {
        let (_dir, ws, entry) = fixture_workspace();
        let doc = ws.read_page(&entry).unwrap();
        let (image, _) = page_view(&ws, &doc).unwrap();
        let frame = Frame {
            origin: Point::ZERO,
            comments: Vec::new(),
        };

        assert!(region_view(&image, &frame, &BoundingBox::new(-50, -50, -10, -10)).is_none());
        assert!(region_view(&image, &frame, &BoundingBox::new(500, 500, 600, 600)).is_none());
    }
}

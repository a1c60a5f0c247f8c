// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster operations shared by the processors. Rotations are clockwise for
// positive angles. Cardinal rotations are lossless; arbitrary angles warp
// with bilinear interpolation onto an expanded white canvas so no page
// content is clipped.

use blattwerk_core::geometry::BoundingBox;
use blattwerk_core::types::CardinalRotation;
use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use tracing::debug;

/// Rotations below this magnitude are treated as zero.
const MIN_ROTATION_DEGREES: f32 = 0.01;

/// Rotate by a multiple of 90 degrees, losslessly.
pub fn rotate_cardinal(image: &DynamicImage, rotation: CardinalRotation) -> DynamicImage {
    match rotation {
        CardinalRotation::None => image.clone(),
        CardinalRotation::Clockwise90 => image.rotate90(),
        CardinalRotation::Clockwise180 => image.rotate180(),
        CardinalRotation::Clockwise270 => image.rotate270(),
    }
}

/// Rotate clockwise by an arbitrary angle in degrees, expanding the canvas to
/// hold the whole rotated image and filling the corners with white.
pub fn rotate_expanded(image: &DynamicImage, degrees: f32) -> DynamicImage {
    if degrees.abs() < MIN_ROTATION_DEGREES {
        return image.clone();
    }

    let radians = degrees.to_radians();
    let (sin, cos) = (radians.sin().abs(), radians.cos().abs());
    let (width, height) = (image.width() as f32, image.height() as f32);
    let out_width = (width * cos + height * sin).ceil() as u32;
    let out_height = (width * sin + height * cos).ceil() as u32;

    // Rotate about the image center, then recenter on the expanded canvas.
    let projection = Projection::translate(out_width as f32 / 2.0, out_height as f32 / 2.0)
        * Projection::rotate(radians)
        * Projection::translate(-width / 2.0, -height / 2.0);

    let rgba = image.to_rgba8();
    let default_pixel = Rgba([255u8, 255, 255, 255]);
    let mut output = RgbaImage::new(out_width, out_height);
    warp_into(&rgba, &projection, Interpolation::Bilinear, default_pixel, &mut output);

    debug!(degrees, out_width, out_height, "Rotated with canvas expansion");
    DynamicImage::ImageRgba8(output)
}

/// Cut out a bounding box, clamped to the image bounds.
pub fn crop_bbox(image: &DynamicImage, bbox: &BoundingBox) -> DynamicImage {
    let clamped = bbox.clamped(image.width(), image.height());
    image.crop_imm(
        clamped.left as u32,
        clamped.top as u32,
        clamped.width().max(0) as u32,
        clamped.height().max(0) as u32,
    )
}

// -- Tests --------------------------------------------------------------------

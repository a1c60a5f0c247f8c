// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! The Blattwerk preprocessing processors.
//!
//! Three page-at-a-time processors implementing the workspace
//! [`Processor`](blattwerk_workspace::Processor) contract:
//!
//! - [`CropProcessor`] detects the text extent of a page, sets the Border
//!   and derives a cropped page image.
//! - [`DeskewProcessor`] corrects orientation (quarter turns) and residual
//!   skew at page or region level, annotating angles and reading order.
//! - [`SegmentLineProcessor`] splits text regions into TextLine elements.
//!
//! All processors work on a viewport over the page image ([`view`]) so they
//! honour images derived by earlier steps, and translate detected geometry
//! back into page coordinates.

pub mod crop;
pub mod deskew;
pub mod raster;
pub mod segment_lines;
pub mod view;

#[cfg(test)]
pub(crate) mod testutil;

pub use crop::{CropParams, CropProcessor};
pub use deskew::{DeskewParams, DeskewProcessor, OperationLevel};
pub use segment_lines::{SegmentLineParams, SegmentLineProcessor};
pub use view::{Frame, page_view, region_view};

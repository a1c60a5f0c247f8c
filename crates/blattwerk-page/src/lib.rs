// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// blattwerk-page: PAGE XML page description model.
//
// Models the subset of the PAGE content schema that the preprocessing tools
// produce and consume, plus the points-string codec and file serialization.

pub mod io;
pub mod model;
pub mod points;

pub use model::{
    AlternativeImage, Border, Coords, Label, Labels, Metadata, MetadataItem, PAGE_NAMESPACE,
    Page, PcGts, TableRegion, TextLine, TextRegion,
};
pub use points::{bbox_from_points, format_points, parse_points, points_from_bbox};

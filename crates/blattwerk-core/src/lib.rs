// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Blattwerk: core geometry, domain types and error definitions shared across
// all crates.

pub mod error;
pub mod geometry;
pub mod types;

pub use error::{BlattwerkError, Result};
pub use geometry::{BoundingBox, Point, detection_zoom, normalize_degrees};
pub use types::*;

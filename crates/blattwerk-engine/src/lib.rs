// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! Layout analysis engine for Blattwerk.
//!
//! Wraps the `ocrs` crate, a pure-Rust text detection engine backed by neural
//! network models executed via `rten`, behind the [`LayoutAnalyzer`] trait,
//! the seam the processors work against. The trait reports geometry only
//! (text quads, orientation, skew, reading order); recognition is out of
//! scope.
//!
//! # Example
//!
//! ```no_run
//! use blattwerk_engine::{LayoutAnalyzer, OcrsAnalyzer};
//!
//! # fn main() -> blattwerk_core::Result<()> {
//! let analyzer = OcrsAnalyzer::with_defaults()?;
//! let image = image::open("page.png")
//!     .map_err(|err| blattwerk_core::BlattwerkError::Image(err.to_string()))?;
//! for line in analyzer.detect_lines(&image)? {
//!     println!("line at {:?}", line.bounding_box());
//! }
//! # Ok(())
//! # }
//! ```

pub mod analyzer;
pub mod config;
pub mod ocrs_backend;

pub use analyzer::{LayoutAnalysis, LayoutAnalyzer, OrientationDetection, TextQuad};
pub use config::EngineConfig;
pub use ocrs_backend::OcrsAnalyzer;

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shared fixtures for the processor tests: a canned layout analyzer and a
// workspace seeded with one white page scan.

use blattwerk_core::error::Result;
use blattwerk_core::geometry::BoundingBox;
use blattwerk_engine::{LayoutAnalysis, LayoutAnalyzer, OrientationDetection, TextQuad};
use blattwerk_workspace::{FileEntry, Workspace};
use image::{DynamicImage, Rgb, RgbImage};
use tempfile::TempDir;

/// Analyzer returning fixed results, so processor behaviour can be tested
/// without model files.
#[derive(Default)]
pub(crate) struct StubAnalyzer {
    pub blocks: Vec<TextQuad>,
    pub lines: Vec<TextQuad>,
    pub orientation: Option<OrientationDetection>,
    pub layout: Option<LayoutAnalysis>,
}

impl LayoutAnalyzer for StubAnalyzer {
    fn detect_blocks(&self, _image: &DynamicImage) -> Result<Vec<TextQuad>> {
        Ok(self.blocks.clone())
    }

    fn detect_lines(&self, _image: &DynamicImage) -> Result<Vec<TextQuad>> {
        Ok(self.lines.clone())
    }

    fn detect_orientation(&self, _image: &DynamicImage) -> Result<Option<OrientationDetection>> {
        Ok(self.orientation)
    }

    fn analyze_layout(&self, _image: &DynamicImage) -> Result<Option<LayoutAnalysis>> {
        Ok(self.layout)
    }
}

pub(crate) fn quad(left: i32, top: i32, right: i32, bottom: i32) -> TextQuad {
    TextQuad::from_bbox(&BoundingBox::new(left, top, right, bottom))
}

/// A workspace holding one white 200x300 scan in group `IMG` at 300 DPI.
///
/// The TempDir must stay alive for the workspace to remain usable.
pub(crate) fn fixture_workspace() -> (TempDir, Workspace, FileEntry) {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("scan.png");
    RgbImage::from_pixel(200, 300, Rgb([255, 255, 255]))
        .save(&source)
        .unwrap();

    let mut workspace = Workspace::init(dir.path().join("ws")).unwrap();
    let entry = workspace
        .import_image(&source, "IMG", "IMG_0001", Some("P_0001"), Some(300))
        .unwrap();
    (dir, workspace, entry)
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page cropping. Detects the extent of all text on the page, sets the Border
// to the padded union and derives a cropped page image. Always works on the
// original page image; an existing Border is replaced.

use blattwerk_core::error::Result;
use blattwerk_core::geometry::{BoundingBox, detection_zoom};
use blattwerk_engine::LayoutAnalyzer;
use blattwerk_page::PcGts;
use blattwerk_workspace::{FileEntry, Processor, RunContext};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

use crate::raster;

/// Blocks with a side shorter than this (in pixels at 300 DPI) are noise.
const MIN_BLOCK_EXTENT: f32 = 25.0;

/// Parameters of the crop processor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CropParams {
    /// Pixels added around the detected text extent.
    pub padding: u32,
}

impl Default for CropParams {
    fn default() -> Self {
        Self { padding: 4 }
    }
}

/// Crops pages to their text extent.
pub struct CropProcessor<'a> {
    params: CropParams,
    analyzer: &'a dyn LayoutAnalyzer,
}

impl<'a> CropProcessor<'a> {
    pub fn new(params: CropParams, analyzer: &'a dyn LayoutAnalyzer) -> Self {
        Self { params, analyzer }
    }
}

impl Processor for CropProcessor<'_> {
    fn tool_name(&self) -> &'static str {
        "blattwerk-crop"
    }

    fn step(&self) -> &'static str {
        "preprocessing/optimization/cropping"
    }

    fn parameters(&self) -> Vec<(String, String)> {
        vec![("padding".to_string(), self.params.padding.to_string())]
    }

    #[instrument(skip_all, fields(file_id = %input.id))]
    fn process_page(
        &self,
        doc: &mut PcGts,
        input: &FileEntry,
        seq: usize,
        ctx: &mut RunContext<'_>,
    ) -> Result<()> {
        if let Some(border) = doc.page.border_bbox()? {
            warn!(
                left = border.left,
                top = border.top,
                right = border.right,
                bottom = border.bottom,
                "Overwriting existing Border"
            );
        }
        if !doc.page.text_regions.is_empty() {
            let mut extent: Option<BoundingBox> = None;
            for region in &doc.page.text_regions {
                let bbox = region.bbox()?;
                extent = Some(match extent {
                    Some(acc) => acc.union(&bbox),
                    None => bbox,
                });
            }
            if let Some(extent) = extent {
                warn!(
                    left = extent.left,
                    top = extent.top,
                    right = extent.right,
                    bottom = extent.bottom,
                    "Ignoring extent of existing text regions"
                );
            }
        }

        let image = ctx.workspace.load_page_image(doc)?;
        let zoom = detection_zoom(input.dpi);
        let min_extent = MIN_BLOCK_EXTENT / zoom;

        let blocks = self.analyzer.detect_blocks(&image)?;
        let mut extent: Option<BoundingBox> = None;
        for (index, block) in blocks.iter().enumerate() {
            let region_id = format!("region{:04}", index);
            let bbox = block.bounding_box();
            if bbox.is_degenerate() {
                debug!(region_id, "Ignoring empty block");
                continue;
            }
            if (bbox.width() as f32) < min_extent || (bbox.height() as f32) < min_extent {
                debug!(
                    region_id,
                    width = bbox.width(),
                    height = bbox.height(),
                    "Ignoring undersized block"
                );
                continue;
            }
            debug!(
                region_id,
                left = bbox.left,
                top = bbox.top,
                right = bbox.right,
                bottom = bbox.bottom,
                "Detected text block"
            );
            extent = Some(match extent {
                Some(acc) => acc.union(&bbox),
                None => bbox,
            });
        }

        match extent {
            Some(extent) => {
                let padded =
                    extent.pad_clamped(self.params.padding as i32, image.width(), image.height());
                info!(
                    left = padded.left,
                    top = padded.top,
                    right = padded.right,
                    bottom = padded.bottom,
                    "Cropping page to detected text extent"
                );
                doc.page.set_border_bbox(&padded);

                let cropped = raster::crop_bbox(&image, &padded);
                let image_id = ctx.derived_image_id(input, seq);
                let relative = ctx.workspace.save_derived_image(
                    &cropped,
                    &image_id,
                    ctx.image_group,
                    input.page_id.as_deref(),
                    input.dpi,
                )?;
                doc.page
                    .add_alternative_image(relative, Some("cropped".to_string()));
            }
            None => {
                error!("Cannot find a valid extent to crop to");
            }
        }
        Ok(())
    }
}

// -- Tests --------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{StubAnalyzer, fixture_workspace, quad};
    use blattwerk_page::{Coords, TextRegion};

    fn run_on_fixture(analyzer: &StubAnalyzer) -> (tempfile::TempDir, blattwerk_workspace::Workspace, PcGts) {
        let (dir, mut ws, entry) = fixture_workspace();
        let mut doc = ws.read_page(&entry).unwrap();
        let processor = CropProcessor::new(CropParams::default(), analyzer);
        {
            let mut ctx = RunContext {
                workspace: &mut ws,
                input_group: "IMG",
                image_group: "IMG-CROP",
            };
            processor.process_page(&mut doc, &entry, 0, &mut ctx).unwrap();
        }
        (dir, ws, doc)
    }

    #[test]
    fn crop_sets_border_and_derives_image() {
        let analyzer = StubAnalyzer {
            blocks: vec![quad(40, 60, 160, 240)],
            ..Default::default()
        };
        let (_dir, ws, doc) = run_on_fixture(&analyzer);

        // Padding of 4 around the block, within the 200x300 page.
        assert_eq!(
            doc.page.border_bbox().unwrap(),
            Some(BoundingBox::new(36, 56, 164, 244))
        );
        let alt = doc.page.latest_alternative_image().unwrap();
        assert_eq!(alt.filename, "IMG-CROP/IMG-CROP_0001.png");
        assert_eq!(alt.comments.as_deref(), Some("cropped"));

        let cropped = ws.load_image_path(&alt.filename).unwrap();
        assert_eq!((cropped.width(), cropped.height()), (128, 188));
        assert!(ws.find_file("IMG-CROP_0001").is_some());
    }

    #[test]
    fn crop_unions_multiple_blocks() {
        let analyzer = StubAnalyzer {
            blocks: vec![quad(40, 60, 100, 100), quad(120, 200, 160, 240)],
            ..Default::default()
        };
        let (_dir, _ws, doc) = run_on_fixture(&analyzer);

        assert_eq!(
            doc.page.border_bbox().unwrap(),
            Some(BoundingBox::new(36, 56, 164, 244))
        );
    }

    #[test]
    fn undersized_and_degenerate_blocks_are_ignored() {
        let analyzer = StubAnalyzer {
            // 10px wide, zero-width, and one valid block.
            blocks: vec![quad(0, 0, 10, 100), quad(5, 5, 5, 50), quad(40, 60, 160, 240)],
            ..Default::default()
        };
        let (_dir, _ws, doc) = run_on_fixture(&analyzer);

        assert_eq!(
            doc.page.border_bbox().unwrap(),
            Some(BoundingBox::new(36, 56, 164, 244))
        );
    }

    #[test]
    fn no_usable_blocks_leaves_page_unchanged() {
        let analyzer = StubAnalyzer::default();
        let (_dir, ws, doc) = run_on_fixture(&analyzer);

        assert_eq!(doc.page.border_bbox().unwrap(), None);
        assert!(doc.page.latest_alternative_image().is_none());
        assert!(ws.find_file("IMG-CROP_0001").is_none());
    }

    #[test]
    fn minimum_extent_scales_with_dpi() {
        let (_dir, mut ws, entry) = fixture_workspace();
        let mut doc = ws.read_page(&entry).unwrap();
        // At 600 DPI the 25px threshold becomes 50px, so a 30px block is noise.
        let mut input = entry.clone();
        input.dpi = Some(600);

        let analyzer = StubAnalyzer {
            blocks: vec![quad(40, 60, 70, 240)],
            ..Default::default()
        };
        let processor = CropProcessor::new(CropParams::default(), &analyzer);
        let mut ctx = RunContext {
            workspace: &mut ws,
            input_group: "IMG",
            image_group: "IMG-CROP",
        };
        processor.process_page(&mut doc, &input, 0, &mut ctx).unwrap();

        assert_eq!(doc.page.border_bbox().unwrap(), None);
    }

    #[test]
    fn existing_border_is_replaced() {
        let (_dir, mut ws, entry) = fixture_workspace();
        let mut doc = ws.read_page(&entry).unwrap();
        doc.page.set_border_bbox(&BoundingBox::new(0, 0, 50, 50));
        doc.page.text_regions.push(TextRegion {
            id: "r1".to_string(),
            orientation: None,
            reading_direction: None,
            text_line_order: None,
            alternative_images: Vec::new(),
            coords: Coords {
                points: "0,0 10,0 10,10 0,10".to_string(),
            },
            text_lines: Vec::new(),
        });

        let analyzer = StubAnalyzer {
            blocks: vec![quad(40, 60, 160, 240)],
            ..Default::default()
        };
        let processor = CropProcessor::new(CropParams::default(), &analyzer);
        let mut ctx = RunContext {
            workspace: &mut ws,
            input_group: "IMG",
            image_group: "IMG-CROP",
        };
        processor.process_page(&mut doc, &entry, 0, &mut ctx).unwrap();

        assert_eq!(
            doc.page.border_bbox().unwrap(),
            Some(BoundingBox::new(36, 56, 164, 244))
        );
    }

    #[test]
    fn default_parameters_are_recorded() {
        let analyzer = StubAnalyzer::default();
        let processor = CropProcessor::new(CropParams::default(), &analyzer);
        assert_eq!(processor.tool_name(), "blattwerk-crop");
        assert_eq!(
            processor.parameters(),
            vec![("padding".to_string(), "4".to_string())]
        );
    }
}

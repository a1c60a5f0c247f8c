// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text line segmentation. Detects the lines within every text region and
// adds them as TextLine elements in page coordinates. Line ids number the
// detections per region in detection order; a skipped detection leaves a gap
// so ids keep matching the detection sequence.

use blattwerk_core::error::Result;
use blattwerk_core::geometry::Point;
use blattwerk_engine::LayoutAnalyzer;
use blattwerk_page::{Coords, PcGts, TextLine, format_points};
use blattwerk_workspace::{FileEntry, Processor, RunContext};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::view;

/// Parameters of the line segmentation processor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentLineParams {
    /// Replace existing TextLines. When false, regions that already carry
    /// lines are left untouched.
    pub overwrite_lines: bool,
}

impl Default for SegmentLineParams {
    fn default() -> Self {
        Self {
            overwrite_lines: true,
        }
    }
}

/// Segments text regions into text lines.
pub struct SegmentLineProcessor<'a> {
    params: SegmentLineParams,
    analyzer: &'a dyn LayoutAnalyzer,
}

impl<'a> SegmentLineProcessor<'a> {
    pub fn new(params: SegmentLineParams, analyzer: &'a dyn LayoutAnalyzer) -> Self {
        Self { params, analyzer }
    }
}

impl Processor for SegmentLineProcessor<'_> {
    fn tool_name(&self) -> &'static str {
        "blattwerk-segment-lines"
    }

    fn step(&self) -> &'static str {
        "layout/segmentation/line"
    }

    fn parameters(&self) -> Vec<(String, String)> {
        vec![(
            "overwrite_lines".to_string(),
            self.params.overwrite_lines.to_string(),
        )]
    }

    #[instrument(skip_all, fields(file_id = %input.id))]
    fn process_page(
        &self,
        doc: &mut PcGts,
        input: &FileEntry,
        _seq: usize,
        ctx: &mut RunContext<'_>,
    ) -> Result<()> {
        let (page_image, frame) = view::page_view(ctx.workspace, doc)?;

        for index in 0..doc.page.text_regions.len() {
            let (region_id, bbox, has_lines) = {
                let region = &doc.page.text_regions[index];
                (region.id.clone(), region.bbox()?, !region.text_lines.is_empty())
            };
            if has_lines {
                if self.params.overwrite_lines {
                    info!(region_id, "Removing existing text lines");
                    doc.page.text_regions[index].text_lines.clear();
                } else {
                    warn!(region_id, "Keeping existing text lines");
                    continue;
                }
            }

            debug!(region_id, "Detecting lines");
            if bbox.is_degenerate() {
                warn!(region_id, "Skipping region with degenerate outline");
                continue;
            }
            let (region_image, region_frame) = match view::region_view(&page_image, &frame, &bbox)
            {
                Some(windowed) => windowed,
                None => {
                    warn!(region_id, "Region lies outside the page image");
                    continue;
                }
            };

            let lines = self.analyzer.detect_lines(&region_image)?;
            let region = &mut doc.page.text_regions[index];
            for (line_no, quad) in lines.iter().enumerate() {
                let line_id = format!("{}_line{:04}", region_id, line_no);
                if quad.bounding_box().is_degenerate() {
                    warn!(line_id, "Skipping degenerate line detection");
                    continue;
                }
                let points: Vec<Point> = quad
                    .polygon()
                    .into_iter()
                    .map(|p| Point::new(p.x + region_frame.origin.x, p.y + region_frame.origin.y))
                    .collect();
                region.text_lines.push(TextLine {
                    id: line_id,
                    coords: Coords {
                        points: format_points(&points),
                    },
                });
            }
            debug!(
                region_id,
                line_count = region.text_lines.len(),
                "Lines detected"
            );
        }
        Ok(())
    }
}

// -- Tests --------------------------------------------------------------------

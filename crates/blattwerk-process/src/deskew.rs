// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Orientation and skew correction. At page level the whole page is treated
// as one segment; at region level every text and table region is corrected
// individually. Cardinal rotations (quarter turns) are detected first and
// applied losslessly, then the residual skew is measured on the corrected
// image and applied as an expanding rotation. The segment's `orientation`
// attribute records the total clockwise correction.
//
// A corrected image is saved and referenced for every processed segment,
// also when no rotation was applied, so downstream steps always find a
// derived image reflecting this step.

use std::str::FromStr;

use blattwerk_core::error::{BlattwerkError, Result};
use blattwerk_core::geometry::normalize_degrees;
use blattwerk_core::types::{CardinalRotation, ReadingDirection, TextLineOrder};
use blattwerk_engine::LayoutAnalyzer;
use blattwerk_page::PcGts;
use blattwerk_workspace::{FileEntry, Processor, RunContext};
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::raster;
use crate::view::{self, Frame};

/// Segment granularity of the deskew processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationLevel {
    Page,
    Region,
}

impl OperationLevel {
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Region => "region",
        }
    }
}

impl FromStr for OperationLevel {
    type Err = BlattwerkError;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "page" => Ok(Self::Page),
            "region" => Ok(Self::Region),
            other => Err(BlattwerkError::Parameter(format!(
                "unknown operation level: {}",
                other
            ))),
        }
    }
}

/// Parameters of the deskew processor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeskewParams {
    /// Whether to correct whole pages or individual regions.
    pub operation_level: OperationLevel,
    /// Orientation results below this confidence are ignored. Confidence is
    /// the detection score ratio between the best and second-best quarter
    /// turn, so 1.0 means indistinguishable.
    pub min_orientation_confidence: f32,
}

impl Default for DeskewParams {
    fn default() -> Self {
        Self {
            operation_level: OperationLevel::Page,
            min_orientation_confidence: 1.5,
        }
    }
}

/// What one segment analysis decided.
struct SegmentAnnotation {
    /// Total clockwise correction in (-180, 180], absent when nothing was
    /// rotated.
    orientation: Option<f32>,
    reading_direction: Option<ReadingDirection>,
    line_order: Option<TextLineOrder>,
    image: DynamicImage,
    comments: Option<String>,
}

/// Corrects page or region orientation and skew.
pub struct DeskewProcessor<'a> {
    params: DeskewParams,
    analyzer: &'a dyn LayoutAnalyzer,
}

impl<'a> DeskewProcessor<'a> {
    pub fn new(params: DeskewParams, analyzer: &'a dyn LayoutAnalyzer) -> Self {
        Self { params, analyzer }
    }

    /// Analyze and correct one segment image.
    fn analyze_segment(&self, image: DynamicImage, frame: &Frame) -> Result<SegmentAnnotation> {
        let mut tags = frame.comments.clone();
        let mut image = image;
        let mut cardinal = CardinalRotation::None;

        match self.analyzer.detect_orientation(&image)? {
            Some(detection) => {
                if detection.confidence < self.params.min_orientation_confidence {
                    info!(
                        degrees = detection.rotation.degrees(),
                        confidence = detection.confidence,
                        "Ignoring orientation result due to low confidence"
                    );
                } else {
                    info!(
                        degrees = detection.rotation.degrees(),
                        confidence = detection.confidence,
                        "Applying orientation result"
                    );
                    if detection.rotation != CardinalRotation::None {
                        cardinal = detection.rotation;
                        image = raster::rotate_cardinal(&image, cardinal);
                        tags.push(format!("rotated-{}", cardinal.degrees()));
                    }
                }
            }
            None => warn!("No orientation result"),
        }

        let mut skew = 0.0f32;
        let mut reading_direction = None;
        let mut line_order = None;
        match self.analyzer.analyze_layout(&image)? {
            Some(layout) => {
                skew = layout.skew_degrees;
                info!(
                    skew_degrees = skew,
                    reading_direction = layout.reading_direction.keyword(),
                    line_order = layout.line_order.keyword(),
                    "Layout analysis"
                );
                // Sub-degree skew is corrected but not worth a provenance tag.
                if skew.trunc() != 0.0 {
                    tags.push("deskewed".to_string());
                }
                reading_direction = Some(layout.reading_direction);
                line_order = Some(layout.line_order);
            }
            None => warn!("No layout result, skipping deskew"),
        }

        let total = cardinal.degrees() as f32 + skew;
        let orientation = if total != 0.0 {
            debug!(degrees = total, "Rotating segment clockwise");
            if skew != 0.0 {
                image = raster::rotate_expanded(&image, skew);
            }
            Some(normalize_degrees(total))
        } else {
            None
        };

        let comments = if tags.is_empty() {
            None
        } else {
            Some(tags.join(","))
        };
        Ok(SegmentAnnotation {
            orientation,
            reading_direction,
            line_order,
            image,
            comments,
        })
    }
}

impl Processor for DeskewProcessor<'_> {
    fn tool_name(&self) -> &'static str {
        "blattwerk-deskew"
    }

    fn step(&self) -> &'static str {
        "preprocessing/optimization/deskewing"
    }

    fn parameters(&self) -> Vec<(String, String)> {
        vec![
            (
                "operation_level".to_string(),
                self.params.operation_level.keyword().to_string(),
            ),
            (
                "min_orientation_confidence".to_string(),
                self.params.min_orientation_confidence.to_string(),
            ),
        ]
    }

    #[instrument(skip_all, fields(file_id = %input.id, level = self.params.operation_level.keyword()))]
    fn process_page(
        &self,
        doc: &mut PcGts,
        input: &FileEntry,
        seq: usize,
        ctx: &mut RunContext<'_>,
    ) -> Result<()> {
        let (page_image, frame) = view::page_view(ctx.workspace, doc)?;
        let base_id = ctx.derived_image_id(input, seq);

        match self.params.operation_level {
            OperationLevel::Page => {
                let annotation = self.analyze_segment(page_image, &frame)?;
                let relative = ctx.workspace.save_derived_image(
                    &annotation.image,
                    &base_id,
                    ctx.image_group,
                    input.page_id.as_deref(),
                    input.dpi,
                )?;
                if let Some(orientation) = annotation.orientation {
                    doc.page.orientation = Some(orientation);
                }
                if let Some(direction) = annotation.reading_direction {
                    doc.page.reading_direction = Some(direction);
                }
                if let Some(order) = annotation.line_order {
                    doc.page.text_line_order = Some(order);
                }
                doc.page.add_alternative_image(relative, annotation.comments);
            }
            OperationLevel::Region => {
                if doc.page.text_regions.is_empty() && doc.page.table_regions.is_empty() {
                    warn!("Page contains no regions to deskew");
                }

                for index in 0..doc.page.text_regions.len() {
                    let (region_id, bbox) = {
                        let region = &doc.page.text_regions[index];
                        (region.id.clone(), region.bbox()?)
                    };
                    if bbox.is_degenerate() {
                        warn!(region_id, "Skipping region with degenerate outline");
                        continue;
                    }
                    let (region_image, region_frame) =
                        match view::region_view(&page_image, &frame, &bbox) {
                            Some(windowed) => windowed,
                            None => {
                                warn!(region_id, "Region lies outside the page image");
                                continue;
                            }
                        };

                    let annotation = self.analyze_segment(region_image, &region_frame)?;
                    let relative = ctx.workspace.save_derived_image(
                        &annotation.image,
                        &format!("{}_{}", base_id, region_id),
                        ctx.image_group,
                        input.page_id.as_deref(),
                        input.dpi,
                    )?;
                    let region = &mut doc.page.text_regions[index];
                    if let Some(orientation) = annotation.orientation {
                        region.orientation = Some(orientation);
                    }
                    if let Some(direction) = annotation.reading_direction {
                        region.reading_direction = Some(direction);
                    }
                    if let Some(order) = annotation.line_order {
                        region.text_line_order = Some(order);
                    }
                    region.add_alternative_image(relative, annotation.comments);
                }

                // Tables are corrected too, but carry no reading order.
                for index in 0..doc.page.table_regions.len() {
                    let (region_id, bbox) = {
                        let region = &doc.page.table_regions[index];
                        (region.id.clone(), region.bbox()?)
                    };
                    if bbox.is_degenerate() {
                        warn!(region_id, "Skipping region with degenerate outline");
                        continue;
                    }
                    let (region_image, region_frame) =
                        match view::region_view(&page_image, &frame, &bbox) {
                            Some(windowed) => windowed,
                            None => {
                                warn!(region_id, "Region lies outside the page image");
                                continue;
                            }
                        };

                    let annotation = self.analyze_segment(region_image, &region_frame)?;
                    let relative = ctx.workspace.save_derived_image(
                        &annotation.image,
                        &format!("{}_{}", base_id, region_id),
                        ctx.image_group,
                        input.page_id.as_deref(),
                        input.dpi,
                    )?;
                    let region = &mut doc.page.table_regions[index];
                    if let Some(orientation) = annotation.orientation {
                        region.orientation = Some(orientation);
                    }
                    region.add_alternative_image(relative, annotation.comments);
                }
            }
        }
        Ok(())
    }
}

// -- Tests --------------------------------------------------------------------

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PAGE XML document model (PcGts), restricted to the subset the preprocessing
// tools read and write: metadata with processing steps, the page frame with
// Border and AlternativeImages, text/table regions and their text lines.
//
// Documents are only ever mutated additively: derived elements are appended
// and previously absent attributes are set. Region order is preserved within
// each region type.

use blattwerk_core::error::Result;
use blattwerk_core::geometry::BoundingBox;
use blattwerk_core::types::{ReadingDirection, TextLineOrder};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::points::{bbox_from_points, points_from_bbox};

/// XML namespace of the PAGE content schema this model targets.
pub const PAGE_NAMESPACE: &str =
    "http://schema.primaresearch.org/PAGE/gts/pagecontent/2019-07-15";

fn default_namespace() -> String {
    PAGE_NAMESPACE.to_string()
}

/// Root element of a page description document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PcGts {
    #[serde(rename = "@xmlns", default = "default_namespace")]
    pub xmlns: String,
    #[serde(rename = "@pcGtsId", skip_serializing_if = "Option::is_none")]
    pub pc_gts_id: Option<String>,
    #[serde(rename = "Metadata", default)]
    pub metadata: Metadata,
    #[serde(rename = "Page")]
    pub page: Page,
}

impl PcGts {
    /// Build a skeleton document for a bare page image, the way the workflow
    /// wraps plain image inputs that carry no page description yet.
    pub fn for_image(filename: &str, width: u32, height: u32) -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            xmlns: default_namespace(),
            pc_gts_id: None,
            metadata: Metadata {
                creator: format!("Blattwerk {}", env!("CARGO_PKG_VERSION")),
                created: now.clone(),
                last_change: now,
                items: Vec::new(),
            },
            page: Page {
                image_filename: filename.to_string(),
                image_width: width,
                image_height: height,
                orientation: None,
                reading_direction: None,
                text_line_order: None,
                alternative_images: Vec::new(),
                border: None,
                text_regions: Vec::new(),
                table_regions: Vec::new(),
            },
        }
    }

    /// Record a processing step in the metadata, with the tool's parameters
    /// as labels, and refresh the last-change timestamp.
    pub fn append_processing_step(
        &mut self,
        step: &str,
        tool: &str,
        parameters: &[(String, String)],
    ) {
        let labels = Labels {
            entries: parameters
                .iter()
                .map(|(name, value)| Label {
                    label_type: Some(name.clone()),
                    value: value.clone(),
                })
                .collect(),
        };
        self.metadata.items.push(MetadataItem {
            item_type: "processingStep".to_string(),
            name: step.to_string(),
            value: tool.to_string(),
            labels: vec![labels],
        });
        self.metadata.last_change = Utc::now().to_rfc3339();
    }
}

/// Document metadata: provenance and the chain of processing steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(rename = "Creator", default)]
    pub creator: String,
    #[serde(rename = "Created", default)]
    pub created: String,
    #[serde(rename = "LastChange", default)]
    pub last_change: String,
    #[serde(rename = "MetadataItem", default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<MetadataItem>,
}

/// One metadata entry; processing steps use `type="processingStep"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataItem {
    #[serde(rename = "@type")]
    pub item_type: String,
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "@value")]
    pub value: String,
    #[serde(rename = "Labels", default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<Labels>,
}

/// A group of labels attached to a metadata item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Labels {
    #[serde(rename = "Label", default)]
    pub entries: Vec<Label>,
}

/// A single key/value label; processor parameters are stored as
/// `type=<parameter name>` with the value serialized into `value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    #[serde(rename = "@value")]
    pub value: String,
    #[serde(rename = "@type", skip_serializing_if = "Option::is_none")]
    pub label_type: Option<String>,
}

/// The page frame: source image, optional print-space Border, derived images
/// and the region hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    #[serde(rename = "@imageFilename")]
    pub image_filename: String,
    #[serde(rename = "@imageWidth")]
    pub image_width: u32,
    #[serde(rename = "@imageHeight")]
    pub image_height: u32,
    /// Clockwise correction angle in degrees within (-180, 180], set once the
    /// page has been deskewed.
    #[serde(rename = "@orientation", skip_serializing_if = "Option::is_none")]
    pub orientation: Option<f32>,
    #[serde(rename = "@readingDirection", skip_serializing_if = "Option::is_none")]
    pub reading_direction: Option<ReadingDirection>,
    #[serde(rename = "@textLineOrder", skip_serializing_if = "Option::is_none")]
    pub text_line_order: Option<TextLineOrder>,
    #[serde(
        rename = "AlternativeImage",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub alternative_images: Vec<AlternativeImage>,
    #[serde(rename = "Border", skip_serializing_if = "Option::is_none")]
    pub border: Option<Border>,
    #[serde(rename = "TextRegion", default, skip_serializing_if = "Vec::is_empty")]
    pub text_regions: Vec<TextRegion>,
    #[serde(rename = "TableRegion", default, skip_serializing_if = "Vec::is_empty")]
    pub table_regions: Vec<TableRegion>,
}

impl Page {
    /// The most recently derived image, if any. Derived images are appended
    /// in processing order, so the last entry reflects all prior steps.
    pub fn latest_alternative_image(&self) -> Option<&AlternativeImage> {
        self.alternative_images.last()
    }

    /// Reference a derived image file for this page.
    pub fn add_alternative_image(&mut self, filename: String, comments: Option<String>) {
        self.alternative_images.push(AlternativeImage { filename, comments });
    }

    /// Replace the Border with the given bounding box.
    pub fn set_border_bbox(&mut self, bbox: &BoundingBox) {
        self.border = Some(Border {
            coords: Coords {
                points: points_from_bbox(bbox),
            },
        });
    }

    /// Bounding box of the Border, if one is set.
    pub fn border_bbox(&self) -> Result<Option<BoundingBox>> {
        match &self.border {
            Some(border) => Ok(Some(bbox_from_points(&border.coords.points)?)),
            None => Ok(None),
        }
    }
}

/// A reference to a derived image file, with comma-separated provenance tags
/// (`cropped`, `rotated-<degrees>`, `deskewed`) in `comments`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeImage {
    #[serde(rename = "@filename")]
    pub filename: String,
    #[serde(rename = "@comments", skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

impl AlternativeImage {
    /// Iterate the provenance tags in `comments`.
    pub fn features(&self) -> impl Iterator<Item = &str> {
        self.comments
            .as_deref()
            .unwrap_or("")
            .split(',')
            .filter(|tag| !tag.is_empty())
    }
}

/// The print space of the page, excluding scanner margins and facing pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Border {
    #[serde(rename = "Coords")]
    pub coords: Coords,
}

/// Polygon outline of an element, in page coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coords {
    #[serde(rename = "@points")]
    pub points: String,
}

/// A text region on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRegion {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@orientation", skip_serializing_if = "Option::is_none")]
    pub orientation: Option<f32>,
    #[serde(rename = "@readingDirection", skip_serializing_if = "Option::is_none")]
    pub reading_direction: Option<ReadingDirection>,
    #[serde(rename = "@textLineOrder", skip_serializing_if = "Option::is_none")]
    pub text_line_order: Option<TextLineOrder>,
    #[serde(
        rename = "AlternativeImage",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub alternative_images: Vec<AlternativeImage>,
    #[serde(rename = "Coords")]
    pub coords: Coords,
    #[serde(rename = "TextLine", default, skip_serializing_if = "Vec::is_empty")]
    pub text_lines: Vec<TextLine>,
}

impl TextRegion {
    /// Axis-aligned bounding box of the region outline.
    pub fn bbox(&self) -> Result<BoundingBox> {
        bbox_from_points(&self.coords.points)
    }

    /// Reference a derived image file for this region.
    pub fn add_alternative_image(&mut self, filename: String, comments: Option<String>) {
        self.alternative_images.push(AlternativeImage { filename, comments });
    }
}

/// A table region. Tables take part in deskewing but carry no text lines or
/// reading order here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRegion {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@orientation", skip_serializing_if = "Option::is_none")]
    pub orientation: Option<f32>,
    #[serde(
        rename = "AlternativeImage",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub alternative_images: Vec<AlternativeImage>,
    #[serde(rename = "Coords")]
    pub coords: Coords,
}

impl TableRegion {
    /// Axis-aligned bounding box of the region outline.
    pub fn bbox(&self) -> Result<BoundingBox> {
        bbox_from_points(&self.coords.points)
    }

    /// Reference a derived image file for this region.
    pub fn add_alternative_image(&mut self, filename: String, comments: Option<String>) {
        self.alternative_images.push(AlternativeImage { filename, comments });
    }
}

/// A single text line within a text region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLine {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "Coords")]
    pub coords: Coords,
}

// -- Tests --------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn for_image_builds_skeleton() {
        let doc = PcGts::for_image("IMG/page.png", 2481, 3508);
        assert_eq!(doc.xmlns, PAGE_NAMESPACE);
        assert_eq!(doc.page.image_filename, "IMG/page.png");
        assert_eq!(doc.page.image_width, 2481);
        assert_eq!(doc.page.image_height, 3508);
        assert!(doc.metadata.creator.starts_with("Blattwerk"));
        assert!(!doc.metadata.created.is_empty());
        assert!(doc.page.border.is_none());
        assert!(doc.page.text_regions.is_empty());
    }

    #[test]
    fn append_processing_step_records_parameters() {
        let mut doc = PcGts::for_image("a.png", 100, 100);
        let before = doc.metadata.last_change.clone();
        doc.append_processing_step(
            "preprocessing/optimization/cropping",
            "blattwerk-crop",
            &[("padding".to_string(), "4".to_string())],
        );

        assert_eq!(doc.metadata.items.len(), 1);
        let item = &doc.metadata.items[0];
        assert_eq!(item.item_type, "processingStep");
        assert_eq!(item.name, "preprocessing/optimization/cropping");
        assert_eq!(item.value, "blattwerk-crop");
        let label = &item.labels[0].entries[0];
        assert_eq!(label.label_type.as_deref(), Some("padding"));
        assert_eq!(label.value, "4");
        // Timestamps are second-resolution at worst; equality would only hold
        // if the clock never advanced, which is fine either way.
        assert!(doc.metadata.last_change >= before);
    }

    #[test]
    fn border_bbox_round_trip() {
        let mut doc = PcGts::for_image("a.png", 500, 700);
        assert!(doc.page.border_bbox().unwrap().is_none());

        let bbox = BoundingBox::new(10, 20, 480, 650);
        doc.page.set_border_bbox(&bbox);
        assert_eq!(doc.page.border_bbox().unwrap(), Some(bbox));
    }

    #[test]
    fn latest_alternative_image_is_last_added() {
        let mut doc = PcGts::for_image("a.png", 100, 100);
        assert!(doc.page.latest_alternative_image().is_none());

        doc.page
            .add_alternative_image("IMG-CROP/a.png".into(), Some("cropped".into()));
        doc.page
            .add_alternative_image("IMG-DESKEW/a.png".into(), Some("cropped,deskewed".into()));

        let latest = doc.page.latest_alternative_image().unwrap();
        assert_eq!(latest.filename, "IMG-DESKEW/a.png");
        let features: Vec<&str> = latest.features().collect();
        assert_eq!(features, vec!["cropped", "deskewed"]);
    }

    #[test]
    fn features_of_empty_comments() {
        let alt = AlternativeImage {
            filename: "x.png".into(),
            comments: None,
        };
        assert_eq!(alt.features().count(), 0);
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PAGE XML serialization. Expects documents that declare the PAGE content
// schema as their default (unprefixed) namespace, which is how the reference
// ground-truth corpora ship them.

use std::path::Path;

use blattwerk_core::error::{BlattwerkError, Result};
use quick_xml::se::Serializer;
use serde::Serialize;
use tracing::debug;

use crate::model::PcGts;

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

/// Parse a page description document from an XML string.
pub fn from_xml(xml: &str) -> Result<PcGts> {
    quick_xml::de::from_str::<PcGts>(xml).map_err(|err| {
        BlattwerkError::PageModel(format!("failed to parse page XML: {}", err))
    })
}

/// Serialize a page description document, with XML declaration and two-space
/// indentation.
pub fn to_xml(doc: &PcGts) -> Result<String> {
    let mut body = String::new();
    let mut ser = Serializer::with_root(&mut body, Some("PcGts")).map_err(|err| {
        BlattwerkError::PageModel(format!("failed to serialize page XML: {}", err))
    })?;
    ser.indent(' ', 2);
    doc.serialize(ser).map_err(|err| {
        BlattwerkError::PageModel(format!("failed to serialize page XML: {}", err))
    })?;

    let mut xml = String::with_capacity(XML_DECLARATION.len() + body.len() + 1);
    xml.push_str(XML_DECLARATION);
    xml.push_str(&body);
    xml.push('\n');
    Ok(xml)
}

/// Read and parse a page description file.
pub fn read_file(path: impl AsRef<Path>) -> Result<PcGts> {
    let path = path.as_ref();
    debug!(path = %path.display(), "reading page XML");
    let xml = std::fs::read_to_string(path)?;
    from_xml(&xml)
}

/// Serialize a document and write it to a file.
pub fn write_file(path: impl AsRef<Path>, doc: &PcGts) -> Result<()> {
    let path = path.as_ref();
    debug!(path = %path.display(), "writing page XML");
    let xml = to_xml(doc)?;
    std::fs::write(path, xml)?;
    Ok(())
}

// -- Tests --------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Coords, TextLine, TextRegion};
    use blattwerk_core::geometry::BoundingBox;
    use blattwerk_core::types::{ReadingDirection, TextLineOrder};

    fn sample_doc() -> PcGts {
        let mut doc = PcGts::for_image("IMG/p0001.png", 2481, 3508);
        doc.pc_gts_id = Some("IMG_0001".into());
        doc.append_processing_step(
            "preprocessing/optimization/cropping",
            "blattwerk-crop",
            &[("padding".to_string(), "4".to_string())],
        );
        doc.page.set_border_bbox(&BoundingBox::new(80, 120, 2400, 3400));
        doc.page
            .add_alternative_image("IMG-CROP/IMG_0001.png".into(), Some("cropped".into()));
        doc.page.orientation = Some(-1.5);
        doc.page.reading_direction = Some(ReadingDirection::LeftToRight);
        doc.page.text_line_order = Some(TextLineOrder::TopToBottom);
        doc.page.text_regions.push(TextRegion {
            id: "r0001".into(),
            orientation: None,
            reading_direction: None,
            text_line_order: None,
            alternative_images: Vec::new(),
            coords: Coords {
                points: "100,150 2380,150 2380,900 100,900".into(),
            },
            text_lines: vec![TextLine {
                id: "r0001_line0000".into(),
                coords: Coords {
                    points: "100,150 2380,150 2380,200 100,200".into(),
                },
            }],
        });
        doc
    }

    #[test]
    fn to_xml_emits_declaration_and_namespace() {
        let xml = to_xml(&sample_doc()).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
        assert!(xml.contains("<PcGts"));
        assert!(xml.contains(crate::model::PAGE_NAMESPACE));
        assert!(xml.contains("<Border>"));
        assert!(xml.contains("readingDirection=\"left-to-right\""));
        assert!(xml.contains("comments=\"cropped\""));
    }

    #[test]
    fn round_trip_preserves_document() {
        let doc = sample_doc();
        let xml = to_xml(&doc).unwrap();
        let parsed = from_xml(&xml).unwrap();
        assert_eq!(parsed, doc);
    }

    /// Attributes outside the modelled subset (schema location etc.) must not
    /// break parsing.
    #[test]
    fn parse_tolerates_foreign_attributes() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<PcGts xmlns="http://schema.primaresearch.org/PAGE/gts/pagecontent/2019-07-15"
       xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
       xsi:schemaLocation="http://schema.primaresearch.org/PAGE/gts/pagecontent/2019-07-15 pagecontent.xsd">
  <Metadata>
    <Creator>someone else</Creator>
    <Created>2026-01-01T00:00:00Z</Created>
    <LastChange>2026-01-01T00:00:00Z</LastChange>
  </Metadata>
  <Page imageFilename="scan.tif" imageWidth="1000" imageHeight="1500" orientation="-90">
    <TextRegion id="r1" custom="readingOrder {index:0;}">
      <Coords points="10,10 990,10 990,700 10,700"/>
    </TextRegion>
  </Page>
</PcGts>
"#;
        let doc = from_xml(xml).unwrap();
        assert_eq!(doc.page.image_filename, "scan.tif");
        assert_eq!(doc.page.orientation, Some(-90.0));
        assert_eq!(doc.page.text_regions.len(), 1);
        assert_eq!(
            doc.page.text_regions[0].bbox().unwrap(),
            BoundingBox::new(10, 10, 990, 700)
        );
    }

    #[test]
    fn parse_rejects_non_page_xml() {
        assert!(from_xml("<foo/>").is_err());
        assert!(from_xml("not xml at all").is_err());
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("p0001.xml");
        let doc = sample_doc();
        write_file(&path, &doc).unwrap();
        let read_back = read_file(&path).unwrap();
        assert_eq!(read_back, doc);
    }

    #[test]
    fn read_file_missing_is_io_error() {
        let err = read_file("/nonexistent/p.xml").unwrap_err();
        assert!(matches!(err, BlattwerkError::Io(_)));
    }
}
